mod seed;
mod summary;

pub use seed::cmd_seed;
pub use summary::cmd_summary;

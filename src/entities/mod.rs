pub mod prelude;

pub mod sale_records;

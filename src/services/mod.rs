pub mod seed_service;
pub use seed_service::{SeedError, SeedReport, SeedService};

pub mod transaction_service;
pub use transaction_service::{
    CategoryCount, CombinedData, ListQuery, MonthlyStatistics, TransactionError, TransactionPage,
    TransactionService,
};

pub mod transaction_service_impl;
pub use transaction_service_impl::SeaOrmTransactionService;

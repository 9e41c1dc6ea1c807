pub use super::sale_records::Entity as SaleRecords;

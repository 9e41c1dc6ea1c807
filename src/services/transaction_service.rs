//! Domain service for querying sale records.
//!
//! Handlers only translate HTTP parameters into [`ListQuery`] and
//! [`MonthSelection`] values; every query rule lives behind this trait so the
//! store can be swapped for a mock in tests.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{MonthSelection, PriceHistogram};
use crate::models::sale::SaleRecord;

/// Errors returned by [`TransactionService`] operations.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for TransactionError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for TransactionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Parameters of a paginated listing. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub page: u64,
    pub per_page: u64,
    pub month: Option<MonthSelection>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            per_page: 10,
            month: None,
        }
    }
}

/// One page of listing results.
///
/// # Examples
///
/// ```
/// use salesboard::services::TransactionPage;
///
/// let page = TransactionPage { products: vec![], total: 0, page: 1, per_page: 10 };
/// let json = serde_json::to_value(&page).unwrap();
/// assert!(json.get("Products").is_some());
/// assert_eq!(json["perPage"], 10);
/// ```
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionPage {
    #[serde(rename = "Products")]
    pub products: Vec<SaleRecord>,
    pub total: u64,
    pub page: u64,
    #[serde(rename = "perPage")]
    pub per_page: u64,
}

/// Sold/not-sold totals for a month window.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStatistics {
    pub total_sale_amount: f64,
    pub total_sold_items: u64,
    pub total_not_sold_items: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// The three month aggregates in one payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CombinedData {
    pub statistics: MonthlyStatistics,
    pub barchart: PriceHistogram,
    pub piechart: Vec<CategoryCount>,
}

#[async_trait::async_trait]
pub trait TransactionService: Send + Sync {
    /// Filters by search term (and optionally month), then pages in
    /// insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::Validation`] for a zero page or page size,
    /// [`TransactionError::Database`] on store failures.
    async fn list_transactions(&self, query: ListQuery)
    -> Result<TransactionPage, TransactionError>;

    /// Sum of sold prices and sold/not-sold counts in the month window.
    /// An empty window yields all zeros.
    async fn statistics(
        &self,
        selection: MonthSelection,
    ) -> Result<MonthlyStatistics, TransactionError>;

    /// Price histogram of every record in the month window.
    async fn price_histogram(
        &self,
        selection: MonthSelection,
    ) -> Result<PriceHistogram, TransactionError>;

    /// Record count per category in the month window, sorted by category.
    async fn category_histogram(
        &self,
        selection: MonthSelection,
    ) -> Result<Vec<CategoryCount>, TransactionError>;

    /// The three aggregates above, queried concurrently.
    async fn combined(&self, selection: MonthSelection) -> Result<CombinedData, TransactionError> {
        let (statistics, barchart, piechart) = tokio::try_join!(
            self.statistics(selection),
            self.price_histogram(selection),
            self.category_histogram(selection),
        )?;

        Ok(CombinedData {
            statistics,
            barchart,
            piechart,
        })
    }
}

//! `SeaORM` implementation of the `TransactionService` trait.

#![allow(
    clippy::cast_sign_loss,
    reason = "SQL COUNT results are never negative"
)]

use tracing::debug;

use crate::db::Store;
use crate::domain::{MonthSelection, MonthWindow, PriceHistogram, YearRange};
use crate::models::sale::SaleRecord;
use crate::services::transaction_service::{
    CategoryCount, ListQuery, MonthlyStatistics, TransactionError, TransactionPage,
    TransactionService,
};

/// SeaORM-based implementation of the `TransactionService` trait.
pub struct SeaOrmTransactionService {
    store: Store,
    default_years: YearRange,
}

impl SeaOrmTransactionService {
    /// `default_years` is the span used when a month query carries no year.
    #[must_use]
    pub const fn new(store: Store, default_years: YearRange) -> Self {
        Self {
            store,
            default_years,
        }
    }

    fn window(&self, selection: MonthSelection) -> Result<MonthWindow, TransactionError> {
        selection.window(self.default_years).ok_or_else(|| {
            TransactionError::Validation(format!(
                "No dates can be selected for month {}",
                selection.month
            ))
        })
    }
}

#[async_trait::async_trait]
impl TransactionService for SeaOrmTransactionService {
    async fn list_transactions(
        &self,
        query: ListQuery,
    ) -> Result<TransactionPage, TransactionError> {
        if query.page == 0 {
            return Err(TransactionError::Validation(
                "page must be at least 1".to_string(),
            ));
        }
        if query.per_page == 0 {
            return Err(TransactionError::Validation(
                "perPage must be at least 1".to_string(),
            ));
        }

        let window = query.month.map(|m| self.window(m)).transpose()?;

        let (rows, total) = self
            .store
            .list_sale_records(&query.search, window.as_ref(), query.page, query.per_page)
            .await?;

        debug!(
            search = %query.search,
            page = query.page,
            per_page = query.per_page,
            total,
            "Listed transactions"
        );

        Ok(TransactionPage {
            products: rows.into_iter().map(SaleRecord::from).collect(),
            total,
            page: query.page,
            per_page: query.per_page,
        })
    }

    async fn statistics(
        &self,
        selection: MonthSelection,
    ) -> Result<MonthlyStatistics, TransactionError> {
        let window = self.window(selection)?;
        let rows = self.store.sold_summary(&window).await?;

        let mut stats = MonthlyStatistics::default();
        for (sold, count, total) in rows {
            if sold {
                stats.total_sold_items += count as u64;
                stats.total_sale_amount += total.unwrap_or(0.0);
            } else {
                stats.total_not_sold_items += count as u64;
            }
        }

        Ok(stats)
    }

    async fn price_histogram(
        &self,
        selection: MonthSelection,
    ) -> Result<PriceHistogram, TransactionError> {
        let window = self.window(selection)?;
        let prices = self.store.sale_prices_in_window(&window).await?;
        Ok(prices.into_iter().collect())
    }

    async fn category_histogram(
        &self,
        selection: MonthSelection,
    ) -> Result<Vec<CategoryCount>, TransactionError> {
        let window = self.window(selection)?;
        let rows = self.store.category_counts(&window).await?;

        Ok(rows
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category,
                count: count as u64,
            })
            .collect())
    }
}

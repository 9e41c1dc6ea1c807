//! One-shot import of the seed feed into the record store.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::clients::feed::{FeedClient, FeedError};
use crate::config::SeedMode;
use crate::db::Store;
use crate::models::sale::SaleRecord;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("Feed rejected: {0}")]
    InvalidFeed(String),

    #[error("Duplicate record id: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for SeedError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) => Self::Duplicate(msg),
            _ => Self::Database(err.to_string()),
        }
    }
}

/// Outcome of a successful seed run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SeedReport {
    pub fetched: usize,
    pub inserted: u64,
    pub mode: SeedMode,
}

pub struct SeedService {
    store: Store,
    feed: Arc<FeedClient>,
    mode: SeedMode,
}

impl SeedService {
    #[must_use]
    pub const fn new(store: Store, feed: Arc<FeedClient>, mode: SeedMode) -> Self {
        Self { store, feed, mode }
    }

    /// Fetches the feed and writes every record.
    ///
    /// # Errors
    ///
    /// - [`SeedError::Feed`] if the feed cannot be fetched or decoded.
    /// - [`SeedError::InvalidFeed`] if a record fails validation; nothing is written.
    /// - [`SeedError::Duplicate`] in append mode when an `id` is already stored.
    ///   Chunks written before the failing one are kept.
    /// - [`SeedError::Database`] on other store failures.
    pub async fn seed(&self) -> Result<SeedReport, SeedError> {
        info!(url = %self.feed.url(), mode = %self.mode, "Seeding sale records");

        let records = self.feed.fetch_records().await.inspect_err(|e| {
            warn!(error = %e, "Seed feed fetch failed");
        })?;

        validate_feed(&records)?;

        let inserted = match self.mode {
            SeedMode::Append => self.store.insert_sale_records(&records).await?,
            SeedMode::Upsert => self.store.upsert_sale_records(&records).await?,
        };

        info!(fetched = records.len(), inserted, "Seed completed");

        Ok(SeedReport {
            fetched: records.len(),
            inserted,
            mode: self.mode,
        })
    }
}

/// Rejects negative or non-finite prices and ids repeated within the feed.
pub fn validate_feed(records: &[SaleRecord]) -> Result<(), SeedError> {
    let mut ids = HashSet::with_capacity(records.len());

    for record in records {
        if !record.price.is_finite() || record.price < 0.0 {
            return Err(SeedError::InvalidFeed(format!(
                "record {} has invalid price {}",
                record.id, record.price
            )));
        }

        if !ids.insert(record.id) {
            return Err(SeedError::InvalidFeed(format!(
                "record id {} appears more than once",
                record.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, price: f64) -> SaleRecord {
        SaleRecord {
            id,
            title: "t".to_string(),
            price,
            description: "d".to_string(),
            category: "c".to_string(),
            image: "i".to_string(),
            sold: false,
            date_of_sale: None,
        }
    }

    #[test]
    fn accepts_well_formed_feed() {
        assert!(validate_feed(&[record(1, 0.0), record(2, 10.5)]).is_ok());
        assert!(validate_feed(&[]).is_ok());
    }

    #[test]
    fn rejects_negative_price() {
        let err = validate_feed(&[record(1, -1.0)]).unwrap_err();
        assert!(matches!(err, SeedError::InvalidFeed(_)));
    }

    #[test]
    fn rejects_repeated_id() {
        let err = validate_feed(&[record(1, 1.0), record(1, 2.0)]).unwrap_err();
        assert!(err.to_string().contains("appears more than once"));
    }

    #[test]
    fn report_serializes_inserted_count() {
        let report = SeedReport {
            fetched: 3,
            inserted: 2,
            mode: SeedMode::Upsert,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({"fetched": 3, "inserted": 2, "mode": "upsert"}));
    }

    #[tokio::test]
    async fn duplicate_insert_maps_to_duplicate_error() {
        let store = Store::in_memory().await.unwrap();
        store.insert_sale_records(&[record(1, 1.0)]).await.unwrap();

        let err: SeedError = store
            .insert_sale_records(&[record(1, 1.0)])
            .await
            .unwrap_err()
            .into();
        assert!(matches!(err, SeedError::Duplicate(_)));
    }

    #[tokio::test]
    async fn upsert_overwrites_existing_ids() {
        let store = Store::in_memory().await.unwrap();
        store.insert_sale_records(&[record(1, 1.0)]).await.unwrap();

        store
            .upsert_sale_records(&[record(1, 7.0), record(2, 3.0)])
            .await
            .unwrap();

        assert_eq!(store.count_sale_records().await.unwrap(), 2);
    }
}

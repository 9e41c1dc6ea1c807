use crate::domain::MonthWindow;
use crate::models::sale::SaleRecord;
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use crate::entities::sale_records::Model as SaleRecordRow;
pub use repositories::sales::SoldSummaryRow;

const MEMORY_URL: &str = "sqlite::memory:";

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    /// A private in-memory database holding its own single connection.
    pub async fn in_memory() -> Result<Self> {
        Self::with_pool_options(MEMORY_URL, 1, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        if in_memory {
            // Every connection to :memory: is a separate database
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn sales_repo(&self) -> repositories::sales::SalesRepository {
        repositories::sales::SalesRepository::new(self.conn.clone())
    }

    pub async fn insert_sale_records(&self, records: &[SaleRecord]) -> Result<u64, sea_orm::DbErr> {
        self.sales_repo().insert_many(records).await
    }

    pub async fn upsert_sale_records(&self, records: &[SaleRecord]) -> Result<u64, sea_orm::DbErr> {
        self.sales_repo().upsert_many(records).await
    }

    pub async fn count_sale_records(&self) -> Result<u64> {
        self.sales_repo().count().await
    }

    pub async fn list_sale_records(
        &self,
        search: &str,
        window: Option<&MonthWindow>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<SaleRecordRow>, u64)> {
        self.sales_repo()
            .list(search, window, page, per_page)
            .await
    }

    pub async fn sale_prices_in_window(&self, window: &MonthWindow) -> Result<Vec<f64>> {
        self.sales_repo().prices_in_window(window).await
    }

    pub async fn sold_summary(&self, window: &MonthWindow) -> Result<Vec<SoldSummaryRow>> {
        self.sales_repo().sold_summary(window).await
    }

    pub async fn category_counts(&self, window: &MonthWindow) -> Result<Vec<(String, i64)>> {
        self.sales_repo().category_counts(window).await
    }
}

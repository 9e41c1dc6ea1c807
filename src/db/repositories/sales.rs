use crate::domain::MonthWindow;
use crate::entities::{prelude::*, sale_records};
use crate::models::sale::SaleRecord;
use anyhow::Result;
use sea_orm::sea_query::{Expr, LikeExpr, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// Rows per `INSERT` statement; keeps bound parameters well under SQLite's limit.
const INSERT_CHUNK_SIZE: usize = 500;

/// Sold/not-sold split of a month window: `(sold, count, price_sum)`.
pub type SoldSummaryRow = (bool, i64, Option<f64>);

pub struct SalesRepository {
    conn: DatabaseConnection,
}

impl SalesRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn to_active_model(record: &SaleRecord) -> sale_records::ActiveModel {
        sale_records::ActiveModel {
            id: Set(record.id),
            title: Set(record.title.clone()),
            price: Set(record.price),
            description: Set(record.description.clone()),
            category: Set(record.category.clone()),
            image: Set(record.image.clone()),
            sold: Set(record.sold),
            date_of_sale: Set(record.date_of_sale),
            title_folded: Set(fold_case(&record.title)),
            description_folded: Set(fold_case(&record.description)),
            ..Default::default()
        }
    }

    /// Appends records in chunks. A duplicate `id` fails the chunk it is in;
    /// earlier chunks stay written.
    pub async fn insert_many(&self, records: &[SaleRecord]) -> Result<u64, sea_orm::DbErr> {
        let mut inserted = 0;

        for chunk in records.chunks(INSERT_CHUNK_SIZE) {
            inserted += SaleRecords::insert_many(chunk.iter().map(Self::to_active_model))
                .exec_without_returning(&self.conn)
                .await?;
        }

        Ok(inserted)
    }

    /// Inserts new records and overwrites existing ones with the same `id`.
    pub async fn upsert_many(&self, records: &[SaleRecord]) -> Result<u64, sea_orm::DbErr> {
        let mut written = 0;

        for chunk in records.chunks(INSERT_CHUNK_SIZE) {
            written += SaleRecords::insert_many(chunk.iter().map(Self::to_active_model))
                .on_conflict(
                    OnConflict::column(sale_records::Column::Id)
                        .update_columns([
                            sale_records::Column::Title,
                            sale_records::Column::Price,
                            sale_records::Column::Description,
                            sale_records::Column::Category,
                            sale_records::Column::Image,
                            sale_records::Column::Sold,
                            sale_records::Column::DateOfSale,
                            sale_records::Column::TitleFolded,
                            sale_records::Column::DescriptionFolded,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(&self.conn)
                .await?;
        }

        Ok(written)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(SaleRecords::find().count(&self.conn).await?)
    }

    /// Returns one page of matching records in insertion order plus the total
    /// number of matches. `page` is 1-based; a page whose offset does not fit
    /// in SQL `OFFSET` is empty.
    pub async fn list(
        &self,
        search: &str,
        window: Option<&MonthWindow>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<sale_records::Model>, u64)> {
        let mut query = SaleRecords::find().order_by_asc(sale_records::Column::Seq);

        if let Some(condition) = search_condition(search) {
            query = query.filter(condition);
        }

        if let Some(window) = window {
            query = query.filter(window_condition(window));
        }

        let page_index = page.saturating_sub(1);
        let paginator = query.paginate(&self.conn, per_page);
        let total = paginator.num_items().await?;

        if page_offset(page_index, per_page).is_none() {
            return Ok((Vec::new(), total));
        }
        let items = paginator.fetch_page(page_index).await?;

        Ok((items, total))
    }

    pub async fn prices_in_window(&self, window: &MonthWindow) -> Result<Vec<f64>> {
        let prices: Vec<f64> = SaleRecords::find()
            .select_only()
            .column(sale_records::Column::Price)
            .filter(window_condition(window))
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(prices)
    }

    pub async fn sold_summary(&self, window: &MonthWindow) -> Result<Vec<SoldSummaryRow>> {
        let rows: Vec<SoldSummaryRow> = SaleRecords::find()
            .select_only()
            .column(sale_records::Column::Sold)
            .column_as(sale_records::Column::Seq.count(), "count")
            .column_as(sale_records::Column::Price.sum(), "total")
            .filter(window_condition(window))
            .group_by(sale_records::Column::Sold)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// `(category, count)` for every category present, sorted by category.
    pub async fn category_counts(&self, window: &MonthWindow) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = SaleRecords::find()
            .select_only()
            .column(sale_records::Column::Category)
            .column_as(sale_records::Column::Seq.count(), "count")
            .filter(window_condition(window))
            .group_by(sale_records::Column::Category)
            .order_by_asc(sale_records::Column::Category)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows)
    }
}

/// Matches any of the window's date ranges. Records without a sale date
/// never match.
fn window_condition(window: &MonthWindow) -> Condition {
    window
        .ranges()
        .iter()
        .fold(Condition::any(), |condition, range| {
            condition.add(
                Condition::all()
                    .add(sale_records::Column::DateOfSale.gte(range.start))
                    .add(sale_records::Column::DateOfSale.lt(range.end)),
            )
        })
}

/// Case-insensitive substring match on title or description, or an exact
/// price match when the term is numeric. `None` for a blank term.
fn search_condition(search: &str) -> Option<Condition> {
    let term = search.trim();
    if term.is_empty() {
        return None;
    }

    let pattern = format!("%{}%", escape_like(&fold_case(term)));
    let contains = |column: sale_records::Column| {
        Expr::col(column).like(LikeExpr::new(pattern.clone()).escape('\\'))
    };

    let mut condition = Condition::any()
        .add(contains(sale_records::Column::TitleFolded))
        .add(contains(sale_records::Column::DescriptionFolded));

    if let Some(price) = parse_price(term) {
        condition = condition.add(sale_records::Column::Price.eq(price));
    }

    Some(condition)
}

/// Case folding shared by stored search columns and search terms.
fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Row offset of a 0-based page, or `None` when it overflows SQLite's `i64`.
fn page_offset(page_index: u64, per_page: u64) -> Option<u64> {
    page_index
        .checked_mul(per_page)
        .filter(|offset| i64::try_from(*offset).is_ok())
}

fn parse_price(term: &str) -> Option<f64> {
    term.parse::<f64>().ok().filter(|p| p.is_finite())
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn numeric_terms_parse_as_prices() {
        assert_eq!(parse_price("50"), Some(50.0));
        assert_eq!(parse_price("329.85"), Some(329.85));
        assert_eq!(parse_price("shirt"), None);
        assert_eq!(parse_price("inf"), None);
        assert_eq!(parse_price("NaN"), None);
    }

    #[test]
    fn blank_search_has_no_condition() {
        assert!(search_condition("").is_none());
        assert!(search_condition("   ").is_none());
        assert!(search_condition("bag").is_some());
    }

    #[test]
    fn page_offset_rejects_overflow() {
        assert_eq!(page_offset(0, 10), Some(0));
        assert_eq!(page_offset(2, 10), Some(20));
        assert_eq!(page_offset(u64::MAX - 1, 10), None);
        assert_eq!(page_offset(u64::MAX / 10, 10), None);
    }

    fn record(id: i64, title: &str, description: &str) -> SaleRecord {
        SaleRecord {
            id,
            title: title.to_string(),
            price: 10.0,
            description: description.to_string(),
            category: "c".to_string(),
            image: "i".to_string(),
            sold: false,
            date_of_sale: None,
        }
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let repo = SalesRepository::new(crate::db::Store::in_memory().await.unwrap().conn);
        repo.insert_many(&[
            record(1, "ÉCLAIR Café", "Pâtisserie"),
            record(2, "Plain bread", "ÜBER fresh"),
        ])
        .await
        .unwrap();

        let (rows, total) = repo.list("éclair", None, 1, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].id, 1);

        let (_, total) = repo.list("CAFÉ", None, 1, 10).await.unwrap();
        assert_eq!(total, 1);

        let (rows, _) = repo.list("über", None, 1, 10).await.unwrap();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2]);
    }

    #[tokio::test]
    async fn upsert_refreshes_folded_columns() {
        let repo = SalesRepository::new(crate::db::Store::in_memory().await.unwrap().conn);
        repo.insert_many(&[record(1, "Old name", "x")]).await.unwrap();
        repo.upsert_many(&[record(1, "NOUVEAU Nom", "x")]).await.unwrap();

        let (_, total) = repo.list("old", None, 1, 10).await.unwrap();
        assert_eq!(total, 0);
        let (_, total) = repo.list("nouveau", None, 1, 10).await.unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn out_of_range_page_is_empty_with_real_total() {
        let repo = SalesRepository::new(crate::db::Store::in_memory().await.unwrap().conn);
        repo.insert_many(&[record(1, "a", "b")]).await.unwrap();

        let (rows, total) = repo.list("", None, u64::MAX, 10).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(total, 1);
    }
}

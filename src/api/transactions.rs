//! Transaction listing endpoint.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::validation::{
    validate_optional_month_selection, validate_page, validate_per_page,
};
use crate::api::{ApiError, AppState};
use crate::services::{ListQuery, TransactionError, TransactionPage};

/// Raw query string; parsed by the validators so malformed values produce
/// the usual error envelope.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    pub search: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

impl From<TransactionError> for ApiError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::Validation(msg) => Self::validation(msg),
            TransactionError::Database(msg) => Self::database(msg),
        }
    }
}

/// `GET /transactions?search=&page=&perPage=&month=&year=`
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<TransactionPage>, ApiError> {
    let list_query = ListQuery {
        search: query.search.unwrap_or_default(),
        page: validate_page(query.page.as_deref())?,
        per_page: validate_per_page(query.per_page.as_deref())?,
        month: validate_optional_month_selection(query.month.as_deref(), query.year.as_deref())?,
    };

    let page = state
        .transaction_service()
        .list_transactions(list_query)
        .await?;

    Ok(Json(page))
}

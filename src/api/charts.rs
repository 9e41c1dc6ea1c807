//! Month aggregate endpoints backing the statistics panel and both charts.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::validation::validate_month_selection;
use crate::api::{ApiError, AppState};
use crate::domain::{MonthSelection, PriceHistogram};
use crate::services::{CategoryCount, CombinedData, MonthlyStatistics};

#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

impl MonthQuery {
    fn selection(&self) -> Result<MonthSelection, ApiError> {
        validate_month_selection(self.month.as_deref(), self.year.as_deref())
    }
}

/// `GET /statistics?month=&year=`
pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlyStatistics>, ApiError> {
    let selection = query.selection()?;
    let stats = state.transaction_service().statistics(selection).await?;
    Ok(Json(stats))
}

/// `GET /barchart?month=&year=`
pub async fn get_bar_chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<PriceHistogram>, ApiError> {
    let selection = query.selection()?;
    let histogram = state
        .transaction_service()
        .price_histogram(selection)
        .await?;
    Ok(Json(histogram))
}

/// `GET /piechart?month=&year=`
pub async fn get_pie_chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    let selection = query.selection()?;
    let categories = state
        .transaction_service()
        .category_histogram(selection)
        .await?;
    Ok(Json(categories))
}

/// `GET /combinedData?month=&year=`
pub async fn get_combined(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CombinedData>, ApiError> {
    let selection = query.selection()?;
    let combined = state.transaction_service().combined(selection).await?;
    Ok(Json(combined))
}

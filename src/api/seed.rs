use axum::{extract::State, http::StatusCode};
use std::sync::Arc;

use crate::api::{ApiError, AppState};
use crate::clients::feed::FeedError;
use crate::services::SeedError;

impl From<SeedError> for ApiError {
    fn from(err: SeedError) -> Self {
        match err {
            SeedError::Feed(e @ FeedError::Decode(_)) => {
                Self::feed_error(format!("malformed payload: {e}"))
            }
            SeedError::Feed(e) => Self::feed_error(e.to_string()),
            SeedError::InvalidFeed(msg) => Self::feed_error(msg),
            SeedError::Duplicate(msg) => Self::Conflict(format!("Records already seeded ({msg})")),
            SeedError::Database(msg) => Self::database(msg),
        }
    }
}

/// `GET /initialize`
///
/// Imports the seed feed. Responds with plain text on success.
pub async fn initialize(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, String), ApiError> {
    let report = state.seed_service().seed().await?;

    Ok((
        StatusCode::OK,
        format!(
            "Database initialized with seed data ({} records)",
            report.inserted
        ),
    ))
}

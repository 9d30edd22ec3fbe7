//! Smart insights feed handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, SuccessResponse};
use envis_core::{InsightKind, SmartInsight};

/// Query parameters for the feed
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// subscription, spending, goal or cashflow
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// GET /api/insights - Undismissed insights, optionally of one type
pub async fn list_insights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<Vec<SmartInsight>>, AppError> {
    let kind = match params.kind.as_deref() {
        None | Some("") => None,
        Some(s) => Some(
            s.parse::<InsightKind>()
                .map_err(|e| AppError::bad_request(&e))?,
        ),
    };

    let household = state.read()?;
    Ok(Json(household.insight_feed.of_kind(kind)))
}

/// POST /api/insights/:id/dismiss - Dismiss an insight
pub async fn dismiss_insight(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.update(|household| {
        let (feed, _) = household.insight_feed.dismiss(&id)?;
        let mut next = household.clone();
        next.insight_feed = feed;
        Ok((next, ()))
    })?;

    Ok(SuccessResponse::ok())
}

//! Dashboard handler

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{AppError, AppState};
use envis_core::Dashboard;

/// GET /api/dashboard - Balances, recent transactions, goal progress
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Dashboard>, AppError> {
    let today = state.today();
    let household = state.read()?;
    Ok(Json(household.dashboard(today)))
}

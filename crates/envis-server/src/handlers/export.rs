//! Transaction export handler

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Response, StatusCode},
};
use serde::Deserialize;
use tracing::info;

use super::ViewQuery;
use crate::{AppError, AppState};
use envis_core::export::{export_transactions as export_rows, export_transactions_csv};

/// Output format for the export
#[derive(Debug, Deserialize)]
pub struct ExportFormatQuery {
    /// csv (default) or json
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "csv".to_string()
}

/// GET /api/export/transactions - Export the filtered view as CSV or JSON
pub async fn export_transactions(
    State(state): State<Arc<AppState>>,
    Query(view): Query<ViewQuery>,
    Query(params): Query<ExportFormatQuery>,
) -> Result<Response<Body>, AppError> {
    let filter = view.filter(&state)?;
    let household = state.read()?;

    match params.format.as_str() {
        "csv" => {
            let csv = export_transactions_csv(&household.categories, &filter)?;
            let lines = csv.lines().count().saturating_sub(1);
            info!("Exported {} transactions to CSV", lines);

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
                .header(
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"envis-transactions.csv\"",
                )
                .body(Body::from(csv))
                .map_err(|e| AppError::internal(&e.to_string()))
        }
        "json" => {
            let rows = export_rows(&household.categories, &filter);
            let json = serde_json::to_string_pretty(&rows)
                .map_err(|e| AppError::internal(&e.to_string()))?;
            info!("Exported {} transactions to JSON", rows.len());

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "application/json")
                .header(
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"envis-transactions.json\"",
                )
                .body(Body::from(json))
                .map_err(|e| AppError::internal(&e.to_string()))
        }
        _ => Err(AppError::bad_request("Invalid format. Use 'csv' or 'json'")),
    }
}

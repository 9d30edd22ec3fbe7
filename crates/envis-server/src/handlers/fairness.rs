//! Fairness calculator handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{AppError, AppState};
use envis_core::{calculate, seed, FairnessData, FairnessSettings, PartnerData};

/// One partner's inputs; `hourly_value` defaults to the configured rate
#[derive(Debug, Deserialize)]
pub struct PartnerInput {
    pub name: String,
    pub gross_income: f64,
    pub unpaid_hours: f64,
    pub hourly_value: Option<f64>,
}

impl PartnerInput {
    fn into_partner(self, settings: &FairnessSettings) -> Result<PartnerData, AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("Partner name cannot be empty"));
        }

        let hourly_value = self.hourly_value.unwrap_or(settings.default_hourly_value);
        for (field, value) in [
            ("gross_income", self.gross_income),
            ("unpaid_hours", self.unpaid_hours),
            ("hourly_value", hourly_value),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::bad_request(&format!(
                    "{} must be a non-negative number",
                    field
                )));
            }
        }

        Ok(PartnerData::new(
            name,
            self.gross_income,
            self.unpaid_hours,
            hourly_value,
        ))
    }
}

/// Request body for the calculator
#[derive(Debug, Deserialize)]
pub struct FairnessRequest {
    pub partner1: PartnerInput,
    pub partner2: PartnerInput,
}

impl FairnessRequest {
    fn calculate(self, settings: &FairnessSettings) -> Result<FairnessData, AppError> {
        let p1 = self.partner1.into_partner(settings)?;
        let p2 = self.partner2.into_partner(settings)?;
        Ok(calculate(p1, p2, settings.weeks_per_year))
    }
}

/// POST /api/fairness/calculate - Run the calculator without saving
pub async fn calculate_fairness(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FairnessRequest>,
) -> Result<Json<FairnessData>, AppError> {
    Ok(Json(req.calculate(&state.config.fairness)?))
}

/// GET /api/fairness - Saved result, or the demo partners if none is saved
pub async fn get_fairness(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FairnessData>, AppError> {
    let settings = &state.config.fairness;
    let household = state.read()?;

    let data = match &household.fairness {
        Some(data) => data.clone(),
        None => {
            let (p1, p2) = seed::partners(settings);
            calculate(p1, p2, settings.weeks_per_year)
        }
    };
    Ok(Json(data))
}

/// PUT /api/fairness - Calculate and store the result
pub async fn save_fairness(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FairnessRequest>,
) -> Result<Json<FairnessData>, AppError> {
    let data = req.calculate(&state.config.fairness)?;

    let data = state.update(|household| {
        let mut next = household.clone();
        next.fairness = Some(data.clone());
        Ok((next, data))
    })?;

    tracing::info!(
        before = ?data.before_ratio,
        after = ?data.after_ratio,
        "Saved fairness calculation"
    );
    Ok(Json(data))
}

//! Savings goal handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{AppError, AppState, SuccessResponse};
use envis_core::{Goal, GoalSummary, GoalUpdate, NewGoal};

fn summarize(goal: Goal, today: NaiveDate) -> GoalSummary {
    let progress = goal.progress(today);
    GoalSummary { goal, progress }
}

/// GET /api/goals - All goals with progress
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GoalSummary>>, AppError> {
    let today = state.today();
    let household = state.read()?;
    Ok(Json(household.goal_summaries(today)))
}

/// GET /api/goals/:id - One goal with progress
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GoalSummary>, AppError> {
    let today = state.today();
    let household = state.read()?;
    let goal = household.goals.require(&id)?.clone();
    Ok(Json(summarize(goal, today)))
}

/// POST /api/goals - Create a goal
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewGoal>,
) -> Result<Json<GoalSummary>, AppError> {
    let goal = state.update(|household| {
        let (goals, goal) = household.goals.create(req)?;
        let mut next = household.clone();
        next.goals = goals;
        Ok((next, goal))
    })?;

    Ok(Json(summarize(goal, state.today())))
}

/// PATCH /api/goals/:id - Update name, target, date or linked accounts
pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<GoalUpdate>,
) -> Result<Json<GoalSummary>, AppError> {
    let goal = state.update(|household| {
        let (goals, goal) = household.goals.update(&id, req)?;
        let mut next = household.clone();
        next.goals = goals;
        Ok((next, goal))
    })?;

    Ok(Json(summarize(goal, state.today())))
}

/// DELETE /api/goals/:id - Delete a goal
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.update(|household| {
        let mut next = household.clone();
        next.goals = household.goals.delete(&id)?;
        Ok((next, ()))
    })?;

    Ok(SuccessResponse::ok())
}

/// Request body for a contribution
#[derive(Debug, Deserialize)]
pub struct ContributeRequest {
    /// Pounds to add (negative to withdraw)
    pub amount: f64,
}

/// POST /api/goals/:id/contribute - Add savings to a goal
pub async fn contribute_to_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ContributeRequest>,
) -> Result<Json<GoalSummary>, AppError> {
    let goal = state.update(|household| {
        let (goals, goal) = household.goals.contribute(&id, req.amount)?;
        let mut next = household.clone();
        next.goals = goals;
        Ok((next, goal))
    })?;

    Ok(Json(summarize(goal, state.today())))
}

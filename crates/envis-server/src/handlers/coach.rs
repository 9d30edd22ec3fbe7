//! Coach replies and the pathway checklist

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{AppError, AppState};
use envis_core::coach::{pathway_progress, toggle_step};
use envis_core::{CoachReply, PathwayStep, Topic};

/// GET /api/coach/topics - Topics the coach can answer
pub async fn list_topics() -> Json<&'static [Topic]> {
    Json(Topic::all())
}

/// GET /api/coach/:goal_id/:topic - Scripted reply for a goal
pub async fn get_coach_reply(
    State(state): State<Arc<AppState>>,
    Path((goal_id, topic)): Path<(String, String)>,
) -> Result<Json<CoachReply>, AppError> {
    let topic: Topic = topic.parse()?;
    {
        let household = state.read()?;
        household.goals.require(&goal_id)?;
    }

    Ok(Json(state.coach.reply(&goal_id, topic)?))
}

/// Pathway steps with completion counts
#[derive(Debug, Serialize)]
pub struct PathwayResponse {
    pub steps: Vec<PathwayStep>,
    pub completed: usize,
    pub total: usize,
}

impl PathwayResponse {
    fn new(steps: Vec<PathwayStep>) -> Self {
        let (completed, total) = pathway_progress(&steps);
        Self {
            steps,
            completed,
            total,
        }
    }
}

/// GET /api/pathway - The suggested pathway
pub async fn get_pathway(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PathwayResponse>, AppError> {
    let household = state.read()?;
    Ok(Json(PathwayResponse::new(household.pathway.clone())))
}

/// POST /api/pathway/:id/toggle - Mark a step done or not done
pub async fn toggle_pathway_step(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PathwayResponse>, AppError> {
    let steps = state.update(|household| {
        let steps = toggle_step(&household.pathway, &id)?;
        let mut next = household.clone();
        next.pathway = steps.clone();
        Ok((next, steps))
    })?;

    Ok(Json(PathwayResponse::new(steps)))
}

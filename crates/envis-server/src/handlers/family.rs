//! Family member and invitation handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{AppError, AppState, SuccessResponse};
use envis_core::{Family, FamilyInvite};

/// GET /api/family - Members and invitations
///
/// Invitations past their expiry date are reported as expired.
pub async fn get_family(State(state): State<Arc<AppState>>) -> Result<Json<Family>, AppError> {
    let today = state.today();
    let household = state.read()?;
    Ok(Json(household.family.expire_invites(today)))
}

/// Request body for an invitation
#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub email: String,
}

/// POST /api/family/invites - Invite someone by e-mail
pub async fn create_invite(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InviteRequest>,
) -> Result<Json<FamilyInvite>, AppError> {
    let today = state.today();
    let invite = state.update(|household| {
        let (family, invite) = household
            .family
            .expire_invites(today)
            .invite(&req.email, today)?;
        let mut next = household.clone();
        next.family = family;
        Ok((next, invite))
    })?;

    info!(invite = %invite.id, "Sent family invitation");
    Ok(Json(invite))
}

/// DELETE /api/family/invites/:id - Cancel an invitation
pub async fn cancel_invite(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.update(|household| {
        let (family, _) = household.family.cancel_invite(&id)?;
        let mut next = household.clone();
        next.family = family;
        Ok((next, ()))
    })?;

    Ok(SuccessResponse::ok())
}

/// DELETE /api/family/members/:id - Remove a member
pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.update(|household| {
        let (family, _) = household.family.remove_member(&id)?;
        let mut next = household.clone();
        next.family = family;
        Ok((next, ()))
    })?;

    Ok(SuccessResponse::ok())
}

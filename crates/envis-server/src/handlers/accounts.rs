//! Connected and statement-uploaded account handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::{AppError, AppState, SuccessResponse};
use envis_core::accounts::{self, sync_age};
use envis_core::{ConnectedAccount, NewUploadedAccount, UploadedAccount};

/// An account with a readable sync age
#[derive(Debug, Serialize)]
pub struct AccountView {
    #[serde(flatten)]
    pub account: ConnectedAccount,
    /// "Just now", "5 min ago", ...
    pub synced: String,
}

impl AccountView {
    fn new(account: ConnectedAccount, now: DateTime<Utc>) -> Self {
        let synced = sync_age(account.last_synced, now);
        Self { account, synced }
    }
}

/// Response for the account list
#[derive(Debug, Serialize)]
pub struct AccountsResponse {
    pub accounts: Vec<AccountView>,
    /// Balance across linked accounts
    pub total_balance: f64,
    pub uploaded: Vec<UploadedAccount>,
}

/// GET /api/accounts - Connected accounts
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AccountsResponse>, AppError> {
    let now = state.now();
    let household = state.read()?;

    Ok(Json(AccountsResponse {
        total_balance: accounts::total_balance(&household.accounts),
        accounts: household
            .accounts
            .iter()
            .cloned()
            .map(|a| AccountView::new(a, now))
            .collect(),
        uploaded: household.uploaded_accounts.clone(),
    }))
}

/// POST /api/accounts/:id/refresh - Refresh an account connection
pub async fn refresh_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AccountView>, AppError> {
    let now = state.now();
    let account = state.update(|household| {
        let updated = accounts::refresh_account(&household.accounts, &id, now)?;
        let account = updated
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| AppError::internal("Account not found after refresh"))?;

        let mut next = household.clone();
        next.accounts = updated;
        Ok((next, account))
    })?;

    Ok(Json(AccountView::new(account, now)))
}

/// DELETE /api/accounts/:id - Disconnect an account
pub async fn remove_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.update(|household| {
        let mut next = household.clone();
        next.accounts = accounts::remove_account(&household.accounts, &id)?;
        Ok((next, ()))
    })?;

    Ok(SuccessResponse::ok())
}

/// GET /api/uploads - Accounts tracked from uploaded statements
pub async fn list_uploaded_accounts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UploadedAccount>>, AppError> {
    let household = state.read()?;
    Ok(Json(household.uploaded_accounts.clone()))
}

/// POST /api/uploads - Add an account from a statement
pub async fn add_uploaded_account(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewUploadedAccount>,
) -> Result<Json<UploadedAccount>, AppError> {
    let now = state.now();
    let account = state.update(|household| {
        let (next, account) = household.add_uploaded_account(req, now)?;
        Ok((next, account))
    })?;

    info!(account = %account.id, "Added uploaded account via API");
    Ok(Json(account))
}

/// DELETE /api/uploads/:id - Remove an uploaded account
pub async fn remove_uploaded_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.update(|household| {
        let (uploaded, _) = accounts::remove_uploaded_account(&household.uploaded_accounts, &id)?;
        let mut next = household.clone();
        next.uploaded_accounts = uploaded;
        Ok((next, ()))
    })?;

    Ok(SuccessResponse::ok())
}

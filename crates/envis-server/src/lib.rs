//! Envis Web Server
//!
//! Axum-based REST API for the Envis family finance coach.
//!
//! The household lives in memory behind a lock. Every mutating request
//! computes a new aggregate from the current one, writes the snapshot (when a
//! state path is configured) and only then swaps the new aggregate in.
//!
//! Security features:
//! - Restrictive CORS policy
//! - Security headers (CSP, nosniff, frame denial)
//! - Sanitized error responses
//!
//! There is no authentication. Bind to localhost only.

use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard};

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use envis_core::dates::noon_utc;
use envis_core::{seed, CoachScript, EnvisConfig, Household};

mod handlers;

/// Runtime options that are not part of the config file
#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    /// Snapshot written after every change (None = keep changes in memory)
    pub state_path: Option<PathBuf>,
    /// Fixed "today" for timeline windows (None = local date per request)
    pub today: Option<NaiveDate>,
    /// Directory containing static files to serve
    pub static_dir: Option<PathBuf>,
}

/// Shared application state
pub struct AppState {
    pub household: RwLock<Household>,
    pub config: EnvisConfig,
    pub coach: CoachScript,
    pub options: ServerOptions,
}

impl AppState {
    pub fn new(household: Household, config: EnvisConfig, options: ServerOptions) -> Self {
        Self {
            household: RwLock::new(household),
            config,
            coach: seed::coach_script(),
            options,
        }
    }

    /// The date timeline windows and goal progress are evaluated against
    pub fn today(&self) -> NaiveDate {
        self.options
            .today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Clock for sync times; follows the pinned day when there is one
    pub fn now(&self) -> DateTime<Utc> {
        self.options.today.map(noon_utc).unwrap_or_else(Utc::now)
    }

    /// Read access to the current household
    pub fn read(&self) -> Result<RwLockReadGuard<'_, Household>, AppError> {
        self.household
            .read()
            .map_err(|_| AppError::internal("Household state is unavailable"))
    }

    /// Apply a change to the household
    ///
    /// `change` receives the current household and returns its replacement
    /// together with a value for the response. The replacement is persisted
    /// before it becomes visible; if persisting fails nothing changes.
    pub fn update<T>(
        &self,
        change: impl FnOnce(&Household) -> Result<(Household, T), AppError>,
    ) -> Result<T, AppError> {
        let mut guard = self
            .household
            .write()
            .map_err(|_| AppError::internal("Household state is unavailable"))?;

        let (next, value) = change(&guard)?;
        if let Some(path) = &self.options.state_path {
            next.save(path)?;
        }
        *guard = next;
        Ok(value)
    }
}

/// Generic success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Create the application router
pub fn create_router(household: Household, config: EnvisConfig, options: ServerOptions) -> Router {
    let allowed_origins = config.server.allowed_origins.clone();
    let static_dir = options.static_dir.clone();
    let state = Arc::new(AppState::new(household, config, options));

    let api_routes = Router::new()
        // Dashboard
        .route("/dashboard", get(handlers::get_dashboard))
        // Categories
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route("/categories/move", post(handlers::move_transactions))
        .route(
            "/categories/:id/insight",
            get(handlers::get_category_insight)
                .put(handlers::update_category_insight)
                .delete(handlers::clear_category_insight),
        )
        .route("/timelines", get(handlers::list_timelines))
        // Fairness
        .route(
            "/fairness",
            get(handlers::get_fairness).put(handlers::save_fairness),
        )
        .route("/fairness/calculate", post(handlers::calculate_fairness))
        // Goals
        .route("/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route(
            "/goals/:id",
            get(handlers::get_goal)
                .patch(handlers::update_goal)
                .delete(handlers::delete_goal),
        )
        .route("/goals/:id/contribute", post(handlers::contribute_to_goal))
        // Coach
        .route("/coach/topics", get(handlers::list_topics))
        .route("/coach/:goal_id/:topic", get(handlers::get_coach_reply))
        .route("/pathway", get(handlers::get_pathway))
        .route("/pathway/:id/toggle", post(handlers::toggle_pathway_step))
        // Accounts
        .route("/accounts", get(handlers::list_accounts))
        .route("/accounts/:id", delete(handlers::remove_account))
        .route("/accounts/:id/refresh", post(handlers::refresh_account))
        .route(
            "/uploads",
            get(handlers::list_uploaded_accounts).post(handlers::add_uploaded_account),
        )
        .route("/uploads/:id", delete(handlers::remove_uploaded_account))
        // Insights feed
        .route("/insights", get(handlers::list_insights))
        .route("/insights/:id/dismiss", post(handlers::dismiss_insight))
        // Notifications
        .route("/notifications", get(handlers::list_notifications))
        .route(
            "/notifications/read-all",
            post(handlers::mark_all_notifications_read),
        )
        .route(
            "/notifications/:id",
            delete(handlers::remove_notification),
        )
        .route(
            "/notifications/:id/read",
            post(handlers::mark_notification_read),
        )
        // Family
        .route("/family", get(handlers::get_family))
        .route("/family/invites", post(handlers::create_invite))
        .route("/family/invites/:id", delete(handlers::cancel_invite))
        .route("/family/members/:id", delete(handlers::remove_member))
        // Export
        .route("/export/transactions", get(handlers::export_transactions));

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    // Build CORS layer
    let cors = if allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    };

    // CSP: restrict scripts to same-origin, allow inline styles, allow data: for images
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'"
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    household: Household,
    config: EnvisConfig,
    options: ServerOptions,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    if options.state_path.is_none() {
        warn!("No snapshot path configured - changes will be lost on exit");
    }
    if let Some(today) = options.today {
        info!(%today, "Evaluating timelines against a fixed date");
    }

    let app = create_router(household, config, options);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Domain errors carry messages meant for the user
        if let Some(core) = err.downcast_ref::<envis_core::Error>() {
            let message = core.to_string();
            if core.is_not_found() {
                return Self::not_found(&message);
            }
            if core.is_conflict() {
                return Self::conflict(&message);
            }
            if matches!(
                core,
                envis_core::Error::InvalidData(_) | envis_core::Error::DateParse(_)
            ) {
                return Self::bad_request(&message);
            }
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;

//! Category view, creation, moves and insights

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState, SuccessResponse};
use envis_core::{
    CategoryFilter, CategoryInsight, InsightSheet, Metric, MetricParser, OwnershipFilter,
    TimelineFilter, TransactionCategory,
};

/// Query parameters shared by the category view and the export
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    /// Timeline id (defaults to the configured timeline)
    pub timeline: Option<String>,
    /// all, individual or joint
    pub ownership: Option<String>,
    /// Merchant or category name
    pub search: Option<String>,
    /// Ignore the timeline entirely
    #[serde(default)]
    pub all_time: bool,
}

impl ViewQuery {
    fn timeline(&self, default: TimelineFilter) -> Result<Option<TimelineFilter>, AppError> {
        if self.all_time {
            return Ok(None);
        }
        match self.timeline.as_deref() {
            None | Some("") => Ok(Some(default)),
            Some("all-time") => Ok(None),
            Some(s) => s.parse().map(Some).map_err(|e: String| AppError::bad_request(&e)),
        }
    }

    fn ownership(&self) -> Result<OwnershipFilter, AppError> {
        match self.ownership.as_deref() {
            None | Some("") => Ok(OwnershipFilter::All),
            Some(s) => s.parse().map_err(|e: String| AppError::bad_request(&e)),
        }
    }

    /// Build the view filter, evaluated against the server's "today"
    pub fn filter(&self, state: &AppState) -> Result<CategoryFilter<'_>, AppError> {
        Ok(CategoryFilter::new(state.today())
            .timeline(self.timeline(state.config.default_timeline)?)
            .ownership(self.ownership()?)
            .search(self.search.as_deref()))
    }
}

/// Response for the category view
#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    /// Applied timeline (null = all time)
    pub timeline: Option<TimelineFilter>,
    pub ownership: OwnershipFilter,
    pub categories: Vec<TransactionCategory>,
}

/// GET /api/categories - Filtered category view
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ViewQuery>,
) -> Result<Json<CategoryListResponse>, AppError> {
    let filter = params.filter(&state)?;
    let household = state.read()?;

    Ok(Json(CategoryListResponse {
        timeline: filter.timeline,
        ownership: filter.ownership,
        categories: household.categories.view(&filter),
    }))
}

/// Request body for creating a category
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    /// Explicit id; taken ids are a conflict instead of being suffixed
    #[serde(default)]
    pub id: Option<String>,
}

/// POST /api/categories - Create an empty category
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<Json<TransactionCategory>, AppError> {
    let category = state.update(|household| {
        let (categories, id) = match req.id.as_deref() {
            Some(id) => household.categories.create_category_with_id(id, &req.name)?,
            None => household.categories.create_category(&req.name)?,
        };
        let category = categories
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::internal("Category not found after creation"))?;

        let mut next = household.clone();
        next.categories = categories;
        Ok((next, category))
    })?;

    info!(category = %category.id, "Created category via API");
    Ok(Json(category))
}

/// Request body for moving transactions
#[derive(Debug, Deserialize)]
pub struct MoveTransactionsRequest {
    pub transaction_ids: Vec<String>,
    pub target_category_id: String,
}

/// Response for a move
#[derive(Debug, Serialize)]
pub struct MoveTransactionsResponse {
    /// Number of transactions that changed category
    pub moved: usize,
    pub categories: Vec<TransactionCategory>,
}

/// POST /api/categories/move - Move transactions into a category
pub async fn move_transactions(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MoveTransactionsRequest>,
) -> Result<Json<MoveTransactionsResponse>, AppError> {
    if req.transaction_ids.is_empty() {
        return Err(AppError::bad_request("No transactions selected"));
    }

    let response = state.update(|household| {
        let moved = household
            .categories
            .count_movable(&req.transaction_ids, &req.target_category_id);
        let categories = household
            .categories
            .move_transactions(&req.transaction_ids, &req.target_category_id)?;

        let response = MoveTransactionsResponse {
            moved,
            categories: categories.categories().to_vec(),
        };
        let mut next = household.clone();
        next.categories = categories;
        Ok((next, response))
    })?;

    Ok(Json(response))
}

/// GET /api/categories/:id/insight - Insight and savings projection
pub async fn get_category_insight(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<InsightSheet>, AppError> {
    let household = state.read()?;
    let sheet = household.insight_sheet(&id, &state.config.projection)?;
    Ok(Json(sheet))
}

/// A metric value: typed, or a legacy display string such as "£50-£80"
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Typed(Metric),
    Legacy(String),
}

#[derive(Debug, Deserialize)]
pub struct MetricInput {
    pub label: String,
    pub value: MetricValue,
}

/// Request body for attaching an insight
#[derive(Debug, Deserialize)]
pub struct UpdateInsightRequest {
    pub headline: String,
    pub body: String,
    #[serde(default)]
    pub metrics: Vec<MetricInput>,
}

/// PUT /api/categories/:id/insight - Attach or replace a category insight
pub async fn update_category_insight(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateInsightRequest>,
) -> Result<Json<InsightSheet>, AppError> {
    if req.headline.trim().is_empty() {
        return Err(AppError::bad_request("Insight headline cannot be empty"));
    }

    let parser = MetricParser::new()?;
    let insight = req
        .metrics
        .into_iter()
        .fold(CategoryInsight::new(req.headline.trim(), req.body), |insight, m| {
            let value = match m.value {
                MetricValue::Typed(metric) => metric,
                MetricValue::Legacy(s) => parser.parse(&s),
            };
            insight.with_metric(m.label, value)
        });

    let rates = state.config.projection;
    let sheet = state.update(|household| {
        let category_id = household.categories.require_resolved(&id)?.id.clone();
        let mut next = household.clone();
        next.categories = household
            .categories
            .attach_insight(&category_id, Some(insight))?;
        let sheet = next.insight_sheet(&category_id, &rates)?;
        Ok((next, sheet))
    })?;

    Ok(Json(sheet))
}

/// DELETE /api/categories/:id/insight - Remove a category insight
pub async fn clear_category_insight(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.update(|household| {
        let category_id = household.categories.require_resolved(&id)?.id.clone();
        let mut next = household.clone();
        next.categories = household.categories.attach_insight(&category_id, None)?;
        Ok((next, ()))
    })?;

    Ok(SuccessResponse::ok())
}

/// A timeline option for pickers
#[derive(Debug, Serialize)]
pub struct TimelineOption {
    pub id: TimelineFilter,
    pub label: &'static str,
    pub is_default: bool,
}

/// GET /api/timelines - Available timeline windows
pub async fn list_timelines(State(state): State<Arc<AppState>>) -> Json<Vec<TimelineOption>> {
    let options = TimelineFilter::all()
        .iter()
        .map(|&timeline| TimelineOption {
            id: timeline,
            label: timeline.label(),
            is_default: timeline == state.config.default_timeline,
        })
        .collect();
    Json(options)
}

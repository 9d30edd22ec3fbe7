//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{TimeZone, Utc};
use envis_core::FairnessSettings;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 28).unwrap()
}

fn test_household() -> Household {
    let now = Utc.with_ymd_and_hms(2025, 9, 28, 12, 0, 0).unwrap();
    seed::household(now, &FairnessSettings::default())
}

fn app_on(today: NaiveDate) -> Router {
    let options = ServerOptions {
        today: Some(today),
        ..Default::default()
    };
    create_router(test_household(), EnvisConfig::default(), options)
}

fn setup_test_app() -> Router {
    let options = ServerOptions {
        today: Some(test_today()),
        ..Default::default()
    };
    create_router(test_household(), EnvisConfig::default(), options)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_body_text(response: axum::response::Response) -> String {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn without_body(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// ========== Dashboard Tests ==========

#[tokio::test]
async fn test_get_dashboard() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["summary"]["total_balance"], 23450.75);
    assert!((json["summary"]["monthly_net_flow"].as_f64().unwrap() - 1464.15).abs() < 1e-6);
    assert_eq!(json["summary"]["active_goals"], 2);
    assert_eq!(json["summary"]["pending_alerts"], 2);
    assert_eq!(json["recent_transactions"].as_array().unwrap().len(), 10);
    assert_eq!(json["recent_transactions"][0]["merchant_name"], "Tesco");
    assert_eq!(json["goals"][0]["name"], "House Deposit");
    assert_eq!(json["goals"][0]["progress"]["percent"], 28);
    assert!(json["fairness_summary"].as_str().is_some());
}

#[tokio::test]
async fn test_dashboard_alerts_match_family_after_expiry() {
    let today = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap();

    let response = app_on(today).oneshot(get("/api/family")).await.unwrap();
    let family = get_body_json(response).await;
    assert_eq!(family["invites"][0]["status"], "expired");

    let response = app_on(today).oneshot(get("/api/dashboard")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["summary"]["pending_alerts"], 1);
}

// ========== CORS Tests ==========

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri("/api/dashboard")
        .header("origin", origin)
        .header("access-control-request-method", "GET")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_cors_same_origin_only_by_default() {
    let response = setup_test_app()
        .oneshot(preflight("http://localhost:3000"))
        .await
        .unwrap();
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let mut config = EnvisConfig::default();
    config.server.allowed_origins = vec!["http://localhost:5173".to_string()];
    let options = ServerOptions {
        today: Some(test_today()),
        ..Default::default()
    };
    let app = create_router(test_household(), config, options);

    let response = app
        .clone()
        .oneshot(preflight("http://localhost:5173"))
        .await
        .unwrap();
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );

    let response = app.oneshot(preflight("http://evil.test")).await.unwrap();
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/dashboard")).await.unwrap();
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert!(headers.contains_key("content-security-policy"));
}

// ========== Category Tests ==========

#[tokio::test]
async fn test_list_categories_current_month() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/categories")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["timeline"], "current-month");
    assert_eq!(json["ownership"], "all");
    let categories = json["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 7);

    let eating_out = categories.iter().find(|c| c["id"] == "eating-out").unwrap();
    assert_eq!(eating_out["totals"]["transaction_count"], 3);
    assert_eq!(eating_out["totals"]["spend_to_date"], 152.5);
    assert_eq!(eating_out["totals"]["month_over_month"], 24);
}

#[tokio::test]
async fn test_list_categories_joint_only() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/categories?ownership=joint&all_time=true"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["timeline"], serde_json::Value::Null);
    let ids: Vec<&str> = json["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["groceries", "eating-out", "entertainment", "savings"]);
}

#[tokio::test]
async fn test_list_categories_previous_month_is_empty() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/categories?timeline=previous-month"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let categories = json["categories"].as_array().unwrap();

    // Empty categories stay visible when nothing else narrows the view
    assert_eq!(categories.len(), 7);
    assert!(categories
        .iter()
        .all(|c| c["totals"]["transaction_count"] == 0));
}

#[tokio::test]
async fn test_list_categories_search() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/categories?search=costa&all_time=true"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let categories = json["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["id"], "eating-out");
    assert_eq!(categories[0]["transactions"][0]["merchant_name"], "Costa Coffee");
}

#[tokio::test]
async fn test_list_categories_invalid_params() {
    let app = setup_test_app();
    let response = app
        .oneshot(get("/api/categories?timeline=fortnight"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = setup_test_app();
    let response = app
        .oneshot(get("/api/categories?ownership=shared"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_category_with_suffix() {
    let app = setup_test_app();

    let response = app
        .oneshot(with_json(
            "POST",
            "/api/categories",
            serde_json::json!({ "name": "Groceries" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["id"], "groceries-1");
    assert_eq!(json["name"], "Groceries");
    assert_eq!(json["totals"]["transaction_count"], 0);
}

#[tokio::test]
async fn test_create_category_blank_name() {
    let app = setup_test_app();

    let response = app
        .oneshot(with_json(
            "POST",
            "/api/categories",
            serde_json::json!({ "name": "   " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_move_transactions() {
    let app = setup_test_app();

    let response = app
        .oneshot(with_json(
            "POST",
            "/api/categories/move",
            serde_json::json!({
                "transaction_ids": ["9", "does-not-exist"],
                "target_category_id": "groceries"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["moved"], 1);

    let categories = json["categories"].as_array().unwrap();
    let groceries = categories.iter().find(|c| c["id"] == "groceries").unwrap();
    let eating_out = categories.iter().find(|c| c["id"] == "eating-out").unwrap();
    assert_eq!(groceries["totals"]["transaction_count"], 4);
    assert_eq!(eating_out["totals"]["transaction_count"], 2);
    assert_eq!(eating_out["totals"]["spend_to_date"], 140.0);

    let moved = groceries["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["id"] == "9")
        .unwrap();
    assert_eq!(moved["category"], "Groceries");
}

#[tokio::test]
async fn test_move_transactions_errors() {
    let app = setup_test_app();
    let response = app
        .oneshot(with_json(
            "POST",
            "/api/categories/move",
            serde_json::json!({ "transaction_ids": ["9"], "target_category_id": "holidays" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = setup_test_app();
    let response = app
        .oneshot(with_json(
            "POST",
            "/api/categories/move",
            serde_json::json!({ "transaction_ids": [], "target_category_id": "groceries" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_category_insight_projection() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/categories/entertainment/insight"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["insight"]["headline"], "Subscription Check-in");
    assert_eq!(json["projection"]["basis"], "potential_savings");
    assert_eq!(json["projection"]["monthly"], 15.0);
    assert!((json["projection"]["index_fund"].as_f64().unwrap() - 194.4).abs() < 1e-9);
    assert!((json["projection"]["savings_account"].as_f64().unwrap() - 188.1).abs() < 1e-9);
}

#[tokio::test]
async fn test_get_category_insight_not_found() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/categories/holidays/insight"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("holidays"));
}

#[tokio::test]
async fn test_update_category_insight_accepts_legacy_metrics() {
    let app = setup_test_app();

    let response = app
        .oneshot(with_json(
            "PUT",
            "/api/categories/Transport/insight",
            serde_json::json!({
                "headline": "Fuel is up",
                "body": "Petrol costs rose this month.",
                "metrics": [
                    { "label": "Potential savings", "value": "£20-£30" },
                    { "label": "Share of spend", "value": { "kind": "percent", "value": 12.0 } },
                    { "label": "Stations", "value": "Shell and BP" }
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["category_id"], "transport");
    let metrics = json["insight"]["metrics"].as_array().unwrap();
    assert_eq!(metrics[0]["value"]["kind"], "range");
    assert_eq!(metrics[0]["value"]["value"], serde_json::json!([20.0, 30.0]));
    assert_eq!(metrics[1]["value"]["kind"], "percent");
    assert_eq!(metrics[2]["value"]["kind"], "text");
    assert_eq!(json["projection"]["monthly"], 25.0);
}

#[tokio::test]
async fn test_clear_category_insight() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(without_body("DELETE", "/api/categories/eating-out/insight"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get("/api/categories/eating-out/insight"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["insight"], serde_json::Value::Null);
    // Without an insight the projection falls back to the monthly average
    assert_eq!(json["projection"]["basis"], "monthly_average");
}

#[tokio::test]
async fn test_list_timelines() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/timelines")).await.unwrap();
    let json = get_body_json(response).await;
    let timelines = json.as_array().unwrap();
    assert_eq!(timelines.len(), 7);
    assert_eq!(timelines[0]["id"], "current-month");
    assert_eq!(timelines[0]["is_default"], true);
}

#[tokio::test]
async fn test_create_category_with_explicit_id() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(with_json(
            "POST",
            "/api/categories",
            serde_json::json!({ "name": "Kids' Clubs", "id": "kids" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["id"], "kids");

    // A taken id is not suffixed
    let response = app
        .oneshot(with_json(
            "POST",
            "/api/categories",
            serde_json::json!({ "name": "Food", "id": "groceries" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_move_counts_only_changed_transactions() {
    let app = setup_test_app();

    let response = app
        .oneshot(with_json(
            "POST",
            "/api/categories/move",
            serde_json::json!({
                "transaction_ids": ["9", "9", "1"],
                "target_category_id": "groceries"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["moved"], 1);
}

// ========== Fairness Tests ==========

#[tokio::test]
async fn test_calculate_fairness() {
    let app = setup_test_app();

    let response = app
        .oneshot(with_json(
            "POST",
            "/api/fairness/calculate",
            serde_json::json!({
                "partner1": { "name": "Alex", "gross_income": 45000.0, "unpaid_hours": 10.0 },
                "partner2": { "name": "Sam", "gross_income": 35000.0, "unpaid_hours": 30.0, "hourly_value": 15.0 }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["before_ratio"], serde_json::json!([56, 44]));
    assert_eq!(json["after_ratio"], serde_json::json!([47, 53]));
    assert_eq!(json["ratio_shift"], 9);
    assert_eq!(json["partner1"]["hourly_value"], 15.0);
}

#[tokio::test]
async fn test_calculate_fairness_rejects_negative_input() {
    let app = setup_test_app();

    let response = app
        .oneshot(with_json(
            "POST",
            "/api/fairness/calculate",
            serde_json::json!({
                "partner1": { "name": "Alex", "gross_income": -1.0, "unpaid_hours": 10.0 },
                "partner2": { "name": "Sam", "gross_income": 35000.0, "unpaid_hours": 30.0 }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_save_fairness() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(with_json(
            "PUT",
            "/api/fairness",
            serde_json::json!({
                "partner1": { "name": "Alex", "gross_income": 50000.0, "unpaid_hours": 0.0 },
                "partner2": { "name": "Sam", "gross_income": 50000.0, "unpaid_hours": 0.0 }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/fairness")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["after_ratio"], serde_json::json!([50, 50]));
    assert_eq!(json["ratio_shift"], 0);
}

// ========== Goal Tests ==========

#[tokio::test]
async fn test_list_goals() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/goals")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let goals = json.as_array().unwrap();
    assert_eq!(goals.len(), 2);
    assert_eq!(goals[0]["target_date"], "Oct 2028");
    assert_eq!(goals[1]["progress"]["percent"], 56);
}

#[tokio::test]
async fn test_goal_lifecycle() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(with_json(
            "POST",
            "/api/goals",
            serde_json::json!({
                "name": "New Car",
                "target_amount": 8000.0,
                "target_date": "Mar 2027"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["id"], "3");
    assert_eq!(json["current_amount"], 0.0);
    assert_eq!(json["progress"]["percent"], 0);

    let response = app
        .clone()
        .oneshot(with_json(
            "POST",
            "/api/goals/3/contribute",
            serde_json::json!({ "amount": 500.0 }),
        ))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["current_amount"], 500.0);
    assert_eq!(json["progress"]["percent"], 6);

    let response = app
        .clone()
        .oneshot(with_json(
            "PATCH",
            "/api/goals/3",
            serde_json::json!({ "target_amount": 10000.0, "target_date": "Jun 2027" }),
        ))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["name"], "New Car");
    assert_eq!(json["target_date"], "Jun 2027");
    assert_eq!(json["progress"]["percent"], 5);

    let response = app
        .clone()
        .oneshot(without_body("DELETE", "/api/goals/3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/goals/3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_goal_invalid_target() {
    let app = setup_test_app();

    let response = app
        .oneshot(with_json(
            "POST",
            "/api/goals",
            serde_json::json!({ "name": "Nothing", "target_amount": 0.0, "target_date": "Mar 2027" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Coach Tests ==========

#[tokio::test]
async fn test_coach_reply() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(get("/api/coach/1/progress"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["is_default"], false);
    assert!(json["message"].as_str().unwrap().contains("House Deposit"));

    // Goal 2 has no groceries line, so the topic default is used
    let response = app
        .oneshot(get("/api/coach/2/groceries"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["is_default"], true);
    assert_eq!(json["topic"], "groceries");
}

#[tokio::test]
async fn test_coach_reply_errors() {
    let app = setup_test_app();
    let response = app
        .oneshot(get("/api/coach/1/weather"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = setup_test_app();
    let response = app
        .oneshot(get("/api/coach/99/progress"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_toggle_pathway_step() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(without_body("POST", "/api/pathway/2/toggle"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["completed"], 1);
    assert_eq!(json["total"], 4);
    assert_eq!(json["steps"][1]["completed"], true);

    let response = app
        .oneshot(without_body("POST", "/api/pathway/9/toggle"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Account Tests ==========

#[tokio::test]
async fn test_list_accounts() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/accounts")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["total_balance"], 23450.75);

    let accounts = json["accounts"].as_array().unwrap();
    assert_eq!(accounts.len(), 3);
    assert_eq!(accounts[0]["bank_name"], "Barclays");
    assert_eq!(accounts[2]["status"], "needs_refresh");
    assert_eq!(accounts[2]["synced"], "5 days ago");
}

#[tokio::test]
async fn test_refresh_and_remove_account() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(without_body("POST", "/api/accounts/3/refresh"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "active");
    assert_eq!(json["synced"], "Just now");

    let response = app
        .clone()
        .oneshot(without_body("DELETE", "/api/accounts/2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(without_body("DELETE", "/api/accounts/2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/api/dashboard")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["summary"]["total_balance"], 14950.75);
    // Only the pending invite is left as an alert
    assert_eq!(json["summary"]["pending_alerts"], 1);
}

#[tokio::test]
async fn test_uploaded_accounts() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(with_json(
            "POST",
            "/api/uploads",
            serde_json::json!({
                "account_name": "Premium Bonds",
                "account_type": "premium_bonds",
                "provider": "NS&I",
                "balance": 1500.0,
                "file_name": "nsi-statement.pdf"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["id"], "up-1");
    assert_eq!(json["uploaded_on"], "28 Sep 2025");

    let response = app.clone().oneshot(get("/api/accounts")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["uploaded"].as_array().unwrap().len(), 1);
    assert_eq!(json["total_balance"], 23450.75);

    let response = app.clone().oneshot(get("/api/notifications")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["notifications"][0]["message"], "NS&I Premium Bonds has been added");
    assert_eq!(json["unread"], 4);

    let response = app
        .clone()
        .oneshot(without_body("DELETE", "/api/uploads/up-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(without_body("DELETE", "/api/uploads/up-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_rejects_unsupported_statement() {
    let app = setup_test_app();

    let response = app
        .oneshot(with_json(
            "POST",
            "/api/uploads",
            serde_json::json!({
                "account_name": "ISA",
                "account_type": "investment",
                "provider": "Vanguard",
                "balance": 10.0,
                "file_name": "statement.docx"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Insights Feed Tests ==========

#[tokio::test]
async fn test_list_and_dismiss_insights() {
    let app = setup_test_app();

    let response = app.clone().oneshot(get("/api/insights")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 4);
    assert_eq!(json[0]["type"], "cashflow");

    let response = app
        .clone()
        .oneshot(get("/api/insights?type=subscription"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["headline"], "Subscription Check-in");

    let response = app
        .clone()
        .oneshot(without_body("POST", "/api/insights/2/dismiss"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/insights?type=subscription"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());

    let response = app
        .clone()
        .oneshot(without_body("POST", "/api/insights/2/dismiss"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/api/insights?type=weather")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Notification Tests ==========

#[tokio::test]
async fn test_notifications() {
    let app = setup_test_app();

    let response = app.clone().oneshot(get("/api/notifications")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["unread"], 3);
    assert_eq!(json["notifications"][0]["type"], "goal");
    assert_eq!(json["notifications"][0]["timestamp"], "2 hours ago");
    assert_eq!(json["notifications"][3]["timestamp"], "2 days ago");

    let response = app
        .clone()
        .oneshot(without_body("POST", "/api/notifications/1/read"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["unread"], 2);
    assert_eq!(json["notifications"][0]["read"], true);

    let response = app
        .clone()
        .oneshot(without_body("DELETE", "/api/notifications/2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(without_body("POST", "/api/notifications/read-all"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["unread"], 0);
    assert_eq!(json["notifications"].as_array().unwrap().len(), 3);

    let response = app.clone().oneshot(get("/api/dashboard")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["unread_notifications"], 0);

    let response = app
        .oneshot(without_body("POST", "/api/notifications/9/read"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Family Tests ==========

#[tokio::test]
async fn test_family_invites() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(with_json(
            "POST",
            "/api/family/invites",
            serde_json::json!({ "email": "casey@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["id"], "inv-2");
    assert_eq!(json["status"], "pending");

    let response = app
        .clone()
        .oneshot(with_json(
            "POST",
            "/api/family/invites",
            serde_json::json!({ "email": "Casey@Example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(with_json(
            "POST",
            "/api/family/invites",
            serde_json::json!({ "email": "sam@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(with_json(
            "POST",
            "/api/family/invites",
            serde_json::json!({ "email": "not-an-email" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(without_body("DELETE", "/api/family/invites/inv-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/family")).await.unwrap();
    let json = get_body_json(response).await;
    let invites = json["invites"].as_array().unwrap();
    assert_eq!(invites.len(), 1);
    assert_eq!(invites[0]["email"], "casey@example.com");
}

#[tokio::test]
async fn test_remove_family_member() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(without_body("DELETE", "/api/family/members/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(without_body("DELETE", "/api/family/members/2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/family")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["members"].as_array().unwrap().len(), 1);
}

// ========== Export Tests ==========

#[tokio::test]
async fn test_export_csv() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/export/transactions?ownership=joint"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/csv; charset=utf-8"
    );

    let csv = get_body_text(response).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "id,date,merchant,amount,category,account,owner,ownership");
    assert_eq!(lines.len(), 10);
    assert!(lines[1].starts_with("1,28 Sep 2025,Tesco,-55.40,"));
}

#[tokio::test]
async fn test_export_json_and_bad_format() {
    let app = setup_test_app();
    let response = app
        .oneshot(get("/api/export/transactions?format=json&all_time=true"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 15);

    let app = setup_test_app();
    let response = app
        .oneshot(get("/api/export/transactions?format=xml"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Persistence Tests ==========

#[tokio::test]
async fn test_changes_are_persisted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("envis.json");
    let options = ServerOptions {
        state_path: Some(path.clone()),
        today: Some(test_today()),
        static_dir: None,
    };
    let app = create_router(test_household(), EnvisConfig::default(), options);

    let response = app
        .clone()
        .oneshot(with_json(
            "POST",
            "/api/categories",
            serde_json::json!({ "name": "Kids Clubs" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let saved = Household::load(&path).unwrap();
    assert!(saved.categories.get("kids-clubs").is_some());

    // Failed requests leave the snapshot untouched
    let response = app
        .oneshot(with_json(
            "POST",
            "/api/categories/move",
            serde_json::json!({ "transaction_ids": ["1"], "target_category_id": "nope" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let saved = Household::load(&path).unwrap();
    assert_eq!(saved.categories.get("groceries").unwrap().totals.transaction_count, 3);
}

#[test]
fn test_core_errors_map_to_status_codes() {
    let err: AppError = envis_core::Error::CategoryNotFound("x".into()).into();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);

    let err: AppError = envis_core::Error::AlreadyInvited("x".into()).into();
    assert_eq!(err.status(), StatusCode::CONFLICT);

    let err: AppError = envis_core::Error::DateParse("x".into()).into();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let err: AppError = envis_core::Error::Config("x".into()).into();
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

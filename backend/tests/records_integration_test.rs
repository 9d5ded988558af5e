//! Integration tests for members, cotisations, events and expenses
//!
//! Run with: cargo test --test records_integration_test

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

async fn create_member(app: &TestApp, token: &str, first_name: &str) -> Value {
    let (status, body) = app
        .post(
            "/api/members",
            &json!({ "firstName": first_name, "lastName": "Diop", "phone": "+221770000000" }),
            Some(token),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create member failed: {}", body);
    body
}

async fn create_event(app: &TestApp, token: &str, title: &str) -> Value {
    let (status, body) = app
        .post(
            "/api/events",
            &json!({ "title": title, "startsOn": "2024-03-10", "budget": 150000.0 }),
            Some(token),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create event failed: {}", body);
    body
}

// ============================================================================
// Members
// ============================================================================

#[tokio::test]
async fn test_member_crud() {
    let app = TestApp::new().await;
    let token = app.gestionnaire_token().await;

    let member = create_member(&app, &token, "Awa").await;
    let id = member["id"].as_str().unwrap();
    assert_eq!(member["firstName"], "Awa");
    assert_eq!(member["isActive"], true);
    assert!(member["joinedOn"].as_str().is_some());

    let (status, body) = app.get(&format!("/api/members/{}", id), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lastName"], "Diop");

    let (status, body) = app
        .put(
            &format!("/api/members/{}", id),
            &json!({ "isActive": false, "address": "Dakar" }),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isActive"], false);
    assert_eq!(body["address"], "Dakar");
    assert_eq!(body["firstName"], "Awa");
    assert_eq!(body["phone"], "+221770000000");

    let admin = app.admin_token().await;
    let (status, body) = app.delete(&format!("/api/members/{}", id), Some(&admin)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = app.get(&format!("/api/members/{}", id), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_member_routes_require_authentication() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/members", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_TOKEN");

    let (status, _) = app
        .post("/api/members", &json!({ "firstName": "A", "lastName": "B" }), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_member_create_rejects_blank_names() {
    let app = TestApp::new().await;
    let token = app.gestionnaire_token().await;

    let (status, body) = app
        .post(
            "/api/members",
            &json!({ "firstName": "   ", "lastName": "Diop" }),
            Some(&token),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_delete_requires_admin() {
    let app = TestApp::new().await;
    let token = app.gestionnaire_token().await;
    let member = create_member(&app, &token, "Fatou").await;
    let id = member["id"].as_str().unwrap();

    let (status, body) = app.delete(&format!("/api/members/{}", id), Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, _) = app.get(&format!("/api/members/{}", id), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_unknown_member_returns_404() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, _) = app.delete("/api/members/does-not-exist", Some(&admin)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_member_list_pagination() {
    let app = TestApp::new().await;
    let token = app.gestionnaire_token().await;
    for name in ["Awa", "Binta", "Cheikh", "Daouda", "Elhadji"] {
        create_member(&app, &token, name).await;
    }

    let (status, body) = app.get("/api/members?limit=2&offset=0", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["totalCount"], 5);
    assert_eq!(body["hasMore"], true);

    let (_, body) = app.get("/api/members?limit=2&offset=4", Some(&token)).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["hasMore"], false);

    let (_, body) = app.get("/api/members?limit=1000", Some(&token)).await;
    assert_eq!(body["limit"], 100);

    let (status, _) = app.get("/api/members?limit=abc", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Cotisations
// ============================================================================

#[tokio::test]
async fn test_cotisation_lifecycle() {
    let app = TestApp::new().await;
    let token = app.gestionnaire_token().await;
    let member = create_member(&app, &token, "Awa").await;
    let member_id = member["id"].as_str().unwrap();

    let (status, cotisation) = app
        .post(
            "/api/cotisations",
            &json!({
                "memberId": member_id,
                "amount": 5000.0,
                "period": "2024-01",
                "paidOn": "2024-01-05",
                "paymentMethod": "wave"
            }),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cotisation["memberId"], member_id);
    assert_eq!(cotisation["amount"], 5000.0);
    let id = cotisation["id"].as_str().unwrap();

    let (status, body) = app
        .patch(
            &format!("/api/cotisations/{}", id),
            &json!({ "amount": 7500.0 }),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 7500.0);
    assert_eq!(body["period"], "2024-01");

    let (status, body) = app
        .get(&format!("/api/members/{}/cotisations", member_id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["items"][0]["id"], id);
}

#[tokio::test]
async fn test_cotisation_for_unknown_member_is_rejected() {
    let app = TestApp::new().await;
    let token = app.gestionnaire_token().await;

    let (status, body) = app
        .post(
            "/api/cotisations",
            &json!({ "memberId": "ghost", "amount": 1000.0, "period": "2024-01" }),
            Some(&token),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_cotisation_amount_must_be_positive() {
    let app = TestApp::new().await;
    let token = app.gestionnaire_token().await;
    let member = create_member(&app, &token, "Awa").await;

    let (status, _) = app
        .post(
            "/api/cotisations",
            &json!({ "memberId": member["id"], "amount": 0.0, "period": "2024-01" }),
            Some(&token),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cotisation_list_filters_by_member() {
    let app = TestApp::new().await;
    let token = app.gestionnaire_token().await;
    let awa = create_member(&app, &token, "Awa").await;
    let binta = create_member(&app, &token, "Binta").await;

    for (member, period) in [(&awa, "2024-01"), (&awa, "2024-02"), (&binta, "2024-01")] {
        let (status, _) = app
            .post(
                "/api/cotisations",
                &json!({ "memberId": member["id"], "amount": 2000.0, "period": period }),
                Some(&token),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, all) = app.get("/api/cotisations", Some(&token)).await;
    assert_eq!(all["totalCount"], 3);

    let path = format!("/api/cotisations?memberId={}", awa["id"].as_str().unwrap());
    let (status, filtered) = app.get(&path, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filtered["totalCount"], 2);
    assert!(filtered["items"]
        .as_array()
        .unwrap()
        .iter()
        .all(|c| c["memberId"] == awa["id"]));
}

#[tokio::test]
async fn test_deleting_member_removes_their_cotisations() {
    let app = TestApp::new().await;
    let token = app.gestionnaire_token().await;
    let admin = app.admin_token().await;
    let member = create_member(&app, &token, "Awa").await;
    let member_id = member["id"].as_str().unwrap();

    let (_, cotisation) = app
        .post(
            "/api/cotisations",
            &json!({ "memberId": member_id, "amount": 3000.0, "period": "2024-01" }),
            Some(&token),
        )
        .await;

    let (status, _) = app.delete(&format!("/api/members/{}", member_id), Some(&admin)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .get(
            &format!("/api/cotisations/{}", cotisation["id"].as_str().unwrap()),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .get(&format!("/api/members/{}/cotisations", member_id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Events and expenses
// ============================================================================

#[tokio::test]
async fn test_event_crud() {
    let app = TestApp::new().await;
    let token = app.gestionnaire_token().await;
    let admin = app.admin_token().await;

    let event = create_event(&app, &token, "Magal").await;
    let id = event["id"].as_str().unwrap();
    assert_eq!(event["startsOn"], "2024-03-10");

    let (status, body) = app
        .put(
            &format!("/api/events/{}", id),
            &json!({ "location": "Touba" }),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "Touba");
    assert_eq!(body["title"], "Magal");

    let (status, body) = app.get("/api/events", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCount"], 1);

    let (status, _) = app.delete(&format!("/api/events/{}", id), Some(&admin)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/api/events/{}", id), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_event_budget_cannot_be_negative() {
    let app = TestApp::new().await;
    let token = app.gestionnaire_token().await;

    let (status, _) = app
        .post(
            "/api/events",
            &json!({ "title": "Gamou", "startsOn": "2024-09-15", "budget": -1.0 }),
            Some(&token),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_expense_lifecycle_and_event_filter() {
    let app = TestApp::new().await;
    let token = app.gestionnaire_token().await;
    let event = create_event(&app, &token, "Magal").await;
    let event_id = event["id"].as_str().unwrap();

    let (status, linked) = app
        .post(
            "/api/expenses",
            &json!({ "label": "Sound system", "amount": 40000.0, "eventId": event_id }),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(linked["eventId"], event_id);

    let (status, standalone) = app
        .post(
            "/api/expenses",
            &json!({ "label": "Printing", "amount": 2500.0, "category": "office" }),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(standalone["eventId"], Value::Null);

    let (_, all) = app.get("/api/expenses", Some(&token)).await;
    assert_eq!(all["totalCount"], 2);

    let (_, filtered) = app
        .get(&format!("/api/expenses?eventId={}", event_id), Some(&token))
        .await;
    assert_eq!(filtered["totalCount"], 1);
    assert_eq!(filtered["items"][0]["id"], linked["id"]);

    let (status, body) = app
        .patch(
            &format!("/api/expenses/{}", standalone["id"].as_str().unwrap()),
            &json!({ "amount": 3000.0 }),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 3000.0);
    assert_eq!(body["label"], "Printing");
}

#[tokio::test]
async fn test_expense_for_unknown_event_is_rejected() {
    let app = TestApp::new().await;
    let token = app.gestionnaire_token().await;

    let (status, body) = app
        .post(
            "/api/expenses",
            &json!({ "label": "Tent", "amount": 10000.0, "eventId": "ghost" }),
            Some(&token),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_deleting_event_detaches_its_expenses() {
    let app = TestApp::new().await;
    let token = app.gestionnaire_token().await;
    let admin = app.admin_token().await;
    let event = create_event(&app, &token, "Magal").await;

    let (_, expense) = app
        .post(
            "/api/expenses",
            &json!({ "label": "Tent", "amount": 10000.0, "eventId": event["id"] }),
            Some(&token),
        )
        .await;

    let (status, _) = app
        .delete(
            &format!("/api/events/{}", event["id"].as_str().unwrap()),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .get(
            &format!("/api/expenses/{}", expense["id"].as_str().unwrap()),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eventId"], Value::Null);
    assert_eq!(body["label"], "Tent");
}

#[tokio::test]
async fn test_expense_delete_requires_admin() {
    let app = TestApp::new().await;
    let token = app.gestionnaire_token().await;
    let admin = app.admin_token().await;

    let (_, expense) = app
        .post(
            "/api/expenses",
            &json!({ "label": "Water", "amount": 1500.0 }),
            Some(&token),
        )
        .await;
    let path = format!("/api/expenses/{}", expense["id"].as_str().unwrap());

    let (status, _) = app.delete(&path, Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete(&path, Some(&admin)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.delete(&path, Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_member_and_cotisation_on_postgres() {
    let app = TestApp::postgres().await;
    let token = app.gestionnaire_token().await;
    let member = create_member(&app, &token, "Awa").await;

    let (status, cotisation) = app
        .post(
            "/api/cotisations",
            &json!({ "memberId": member["id"], "amount": 5000.0, "period": "2024-01" }),
            Some(&token),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cotisation["memberId"], member["id"]);
}

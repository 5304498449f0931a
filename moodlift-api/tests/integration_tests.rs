//! Integration tests for the MoodLift API
//!
//! Each test runs against its own in-memory datastore, end to end through
//! the HTTP surface.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use moodlift_api::{create_router, AppState, JwtConfig};
use moodlift_db::{Datastore, DatastoreConfig};
use serde_json::{json, Value};

/// Create a test server over a fresh in-memory datastore
async fn create_test_server() -> TestServer {
    let (server, _) = create_test_context().await;
    server
}

/// Create a test server plus the datastore handle, for tests that need to
/// poke at state directly (e.g. promoting an admin)
async fn create_test_context() -> (TestServer, Arc<Datastore>) {
    let datastore = Arc::new(
        Datastore::connect(&DatastoreConfig::default())
            .await
            .unwrap(),
    );
    let state = AppState::new(datastore.clone(), JwtConfig::new("test-secret"))
        .await
        .unwrap();
    let server = TestServer::new(create_router(state)).unwrap();
    (server, datastore)
}

/// Register an account and return its bearer token and user object
async fn register(server: &TestServer, email: &str, username: &str) -> (String, Value) {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": email,
            "username": username,
            "password": "hunter2-password"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"].clone(),
    )
}

/// Submit a text content item and return its id
async fn submit_content(server: &TestServer, token: &str, category: &str, text: &str) -> String {
    let response = server
        .post("/api/content/submit")
        .authorization_bearer(token)
        .json(&json!({ "category": category, "content_text": text }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["id"].as_str().unwrap().to_string()
}

// ============ Health Endpoint Tests ============

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server().await;

    let response = server.get("/api/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

// ============ Auth Tests ============

#[tokio::test]
async fn test_register_seeds_signup_bonus() {
    let server = create_test_server().await;

    let (_token, user) = register(&server, "a@example.com", "alice").await;

    assert_eq!(user["points_balance"], 5);
    assert_eq!(user["total_points_earned"], 5);
    assert_eq!(user["current_streak"], 0);
    assert_eq!(user["is_admin"], false);
}

#[tokio::test]
async fn test_register_missing_fields() {
    let server = create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({ "email": "a@example.com" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let server = create_test_server().await;
    register(&server, "a@example.com", "alice").await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "a@example.com",
            "username": "someone-else",
            "password": "hunter2-password"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_roundtrip() {
    let server = create_test_server().await;
    register(&server, "a@example.com", "alice").await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "a@example.com", "password": "hunter2-password" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["username"], "alice");

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "a@example.com", "password": "wrong" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let server = create_test_server().await;

    let response = server.get("/api/checkin/info").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .get("/api/checkin/info")
        .authorization_bearer("not-a-real-token")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_update_and_password_change() {
    let server = create_test_server().await;
    let (token, _) = register(&server, "a@example.com", "alice").await;

    let response = server
        .put("/api/auth/profile")
        .authorization_bearer(&token)
        .json(&json!({ "username": "alice2", "notifications_enabled": false }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["username"], "alice2");
    assert_eq!(body["notifications_enabled"], false);
    // Untouched fields survive
    assert_eq!(body["email"], "a@example.com");

    let response = server
        .post("/api/auth/change-password")
        .authorization_bearer(&token)
        .json(&json!({ "currentPassword": "wrong", "newPassword": "new-password-9" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .post("/api/auth/change-password")
        .authorization_bearer(&token)
        .json(&json!({ "currentPassword": "hunter2-password", "newPassword": "new-password-9" }))
        .await;
    response.assert_status_ok();

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "a@example.com", "password": "new-password-9" }))
        .await;
    response.assert_status_ok();
}

// ============ Check-in Tests ============

#[tokio::test]
async fn test_checkin_preview_matches_commit() {
    let server = create_test_server().await;
    let (token, _) = register(&server, "a@example.com", "alice").await;

    let response = server
        .get("/api/checkin/info")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let preview: Value = response.json();
    assert_eq!(preview["can_checkin"], true);
    assert_eq!(preview["current_streak"], 0);
    let next_points = preview["next_points"].as_i64().unwrap();

    let response = server
        .post("/api/checkin")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let snapshot: Value = response.json();
    assert_eq!(snapshot["current_streak"], 1);
    assert_eq!(snapshot["points_earned"].as_i64().unwrap(), next_points);
    assert_eq!(snapshot["points_balance"], 5 + next_points);
    assert_eq!(snapshot["can_checkin"], false);
    assert_eq!(snapshot["total_checkins"], 1);
}

#[tokio::test]
async fn test_second_checkin_same_day_rejected() {
    let server = create_test_server().await;
    let (token, _) = register(&server, "a@example.com", "alice").await;

    server
        .post("/api/checkin")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    let response = server
        .post("/api/checkin")
        .authorization_bearer(&token)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .get("/api/checkin/info")
        .authorization_bearer(&token)
        .await;
    let preview: Value = response.json();
    assert_eq!(preview["can_checkin"], false);
}

#[tokio::test]
async fn test_concurrent_checkins_award_once() {
    let server = create_test_server().await;
    let (token, _) = register(&server, "a@example.com", "alice").await;

    let attempt = || async { server.post("/api/checkin").authorization_bearer(&token).await };
    let (r1, r2, r3, r4, r5) =
        tokio::join!(attempt(), attempt(), attempt(), attempt(), attempt());

    let successes = [&r1, &r2, &r3, &r4, &r5]
        .iter()
        .filter(|r| r.status_code() == StatusCode::OK)
        .count();
    assert_eq!(successes, 1);

    // Exactly one streak increment and one ledger entry
    let response = server
        .get("/api/users/stats")
        .authorization_bearer(&token)
        .await;
    let stats: Value = response.json();
    assert_eq!(stats["current_streak"], 1);
    assert_eq!(stats["total_checkins"], 1);
    assert_eq!(stats["points_balance"], 6);

    let response = server
        .get("/api/users/points-history")
        .authorization_bearer(&token)
        .await;
    let history: Value = response.json();
    let checkin_entries = history["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| {
            t["description"]
                .as_str()
                .unwrap_or_default()
                .starts_with("Daily check-in")
        })
        .count();
    assert_eq!(checkin_entries, 1);
}

// ============ Content Tests ============

#[tokio::test]
async fn test_submission_awards_point_with_ledger_entry() {
    let server = create_test_server().await;
    let (token, _) = register(&server, "a@example.com", "alice").await;

    submit_content(&server, &token, "joy", "A nice thought").await;

    let response = server
        .get("/api/users/stats")
        .authorization_bearer(&token)
        .await;
    let stats: Value = response.json();
    assert_eq!(stats["points_balance"], 6);
    assert_eq!(stats["total_content_submitted"], 1);

    let response = server
        .get("/api/users/points-history")
        .authorization_bearer(&token)
        .await;
    let history: Value = response.json();
    let transactions = history["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["description"], "Content submission");
    assert_eq!(transactions[0]["amount"], 1);
    assert_eq!(transactions[0]["type"], "earned");
}

#[tokio::test]
async fn test_submit_requires_category() {
    let server = create_test_server().await;
    let (token, _) = register(&server, "a@example.com", "alice").await;

    let response = server
        .post("/api/content/submit")
        .authorization_bearer(&token)
        .json(&json!({ "content_text": "No category" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feed_lists_submissions_newest_first() {
    let server = create_test_server().await;
    let (token, _) = register(&server, "a@example.com", "alice").await;
    submit_content(&server, &token, "joy", "first").await;
    submit_content(&server, &token, "joy", "second").await;

    let response = server.get("/api/content/feed").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 2);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["content_text"], "second");
    assert_eq!(data[0]["submitter_username"], "alice");
    // Anonymous viewers get no vote/unlock decoration
    assert_eq!(data[0]["user_vote"], Value::Null);
    assert_eq!(data[0]["is_unlocked"], false);
}

#[tokio::test]
async fn test_browse_category_filters_and_paginates() {
    let server = create_test_server().await;
    let (token, _) = register(&server, "a@example.com", "alice").await;
    submit_content(&server, &token, "joy", "joyful").await;
    submit_content(&server, &token, "calm", "calming").await;

    let response = server.get("/api/content/joy").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["category"], "joy");
    assert_eq!(body["total_pages"], 1);
}

// ============ Daily Allocation Tests ============

#[tokio::test]
async fn test_daily_assignment_is_idempotent() {
    let server = create_test_server().await;
    let (author, _) = register(&server, "author@example.com", "author").await;
    for i in 0..3 {
        submit_content(&server, &author, "joy", &format!("item {i}")).await;
    }
    let (reader, _) = register(&server, "reader@example.com", "reader").await;

    let response = server
        .get("/api/content/joy/daily")
        .authorization_bearer(&reader)
        .await;
    response.assert_status_ok();
    let first: Value = response.json();
    let first_items = first.as_array().unwrap();
    assert_eq!(first_items.len(), 3);
    for (index, item) in first_items.iter().enumerate() {
        assert_eq!(item["position_in_day"].as_i64().unwrap(), index as i64 + 1);
        assert_eq!(item["category"], "joy");
    }

    // Repeat reads return the identical ordered set
    let response = server
        .get("/api/content/joy/daily")
        .authorization_bearer(&reader)
        .await;
    let second: Value = response.json();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_daily_assignment_empty_category() {
    let server = create_test_server().await;
    let (token, _) = register(&server, "a@example.com", "alice").await;

    let response = server
        .get("/api/content/nothing-here/daily")
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 0);
}

// ============ Voting Tests ============

#[tokio::test]
async fn test_vote_overwrites_and_recounts() {
    let server = create_test_server().await;
    let (author, _) = register(&server, "author@example.com", "author").await;
    let content_id = submit_content(&server, &author, "joy", "votable").await;
    let (voter, _) = register(&server, "voter@example.com", "voter").await;

    let response = server
        .post(&format!("/api/content/{content_id}/vote"))
        .authorization_bearer(&voter)
        .json(&json!({ "vote_type": "up" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["upvotes"], 1);
    assert_eq!(body["downvotes"], 0);
    assert_eq!(body["user_vote"], "up");

    let response = server
        .post(&format!("/api/content/{content_id}/vote"))
        .authorization_bearer(&voter)
        .json(&json!({ "vote_type": "down" }))
        .await;
    let body: Value = response.json();
    assert_eq!(body["upvotes"], 0);
    assert_eq!(body["downvotes"], 1);

    // Final state reflects only the last vote, not the history
    let response = server
        .post(&format!("/api/content/{content_id}/vote"))
        .authorization_bearer(&voter)
        .json(&json!({ "vote_type": "up" }))
        .await;
    let body: Value = response.json();
    assert_eq!(body["upvotes"], 1);
    assert_eq!(body["downvotes"], 0);
    assert_eq!(body["user_vote"], "up");
}

#[tokio::test]
async fn test_vote_invalid_type_rejected() {
    let server = create_test_server().await;
    let (author, _) = register(&server, "author@example.com", "author").await;
    let content_id = submit_content(&server, &author, "joy", "votable").await;

    let response = server
        .post(&format!("/api/content/{content_id}/vote"))
        .authorization_bearer(&author)
        .json(&json!({ "vote_type": "sideways" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server.get("/api/content/joy").await;
    let body: Value = response.json();
    assert_eq!(body["data"][0]["upvotes"], 0);
    assert_eq!(body["data"][0]["downvotes"], 0);
}

// ============ Report Tests ============

#[tokio::test]
async fn test_duplicate_report_counts_once() {
    let server = create_test_server().await;
    let (author, _) = register(&server, "author@example.com", "author").await;
    let content_id = submit_content(&server, &author, "joy", "reportable").await;
    let (reporter, _) = register(&server, "reporter@example.com", "reporter").await;

    for _ in 0..2 {
        let response = server
            .post(&format!("/api/content/{content_id}/report"))
            .authorization_bearer(&reporter)
            .json(&json!({ "reason": "not uplifting" }))
            .await;
        response.assert_status_ok();
    }

    let response = server.get("/api/content/joy").await;
    let body: Value = response.json();
    assert_eq!(body["data"][0]["report_count"], 1);
}

#[tokio::test]
async fn test_report_requires_reason() {
    let server = create_test_server().await;
    let (author, _) = register(&server, "author@example.com", "author").await;
    let content_id = submit_content(&server, &author, "joy", "reportable").await;

    let response = server
        .post(&format!("/api/content/{content_id}/report"))
        .authorization_bearer(&author)
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

// ============ Unlock Tests ============

#[tokio::test]
async fn test_unlock_cost_schedule() {
    let server = create_test_server().await;
    let (author, _) = register(&server, "author@example.com", "author").await;
    let first = submit_content(&server, &author, "joy", "premium one").await;
    let second = submit_content(&server, &author, "joy", "premium two").await;

    // 5 signup + 15 submissions = 20 points
    let (buyer, _) = register(&server, "buyer@example.com", "buyer").await;
    for i in 0..15 {
        submit_content(&server, &buyer, "calm", &format!("filler {i}")).await;
    }

    let response = server
        .post(&format!("/api/content/{first}/unlock"))
        .authorization_bearer(&buyer)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["points_spent"], 5);
    assert_eq!(body["remaining_balance"], 15);

    let response = server
        .post(&format!("/api/content/{second}/unlock"))
        .authorization_bearer(&buyer)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["points_spent"], 15);
    assert_eq!(body["remaining_balance"], 0);

    // Spends land in the ledger as negative amounts
    let response = server
        .get("/api/users/points-history")
        .authorization_bearer(&buyer)
        .await;
    let history: Value = response.json();
    let spent: Vec<i64> = history["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| t["type"] == "spent")
        .map(|t| t["amount"].as_i64().unwrap())
        .collect();
    assert_eq!(spent.len(), 2);
    assert!(spent.contains(&-5));
    assert!(spent.contains(&-15));
}

#[tokio::test]
async fn test_unlock_end_to_end_insufficient_points() {
    let server = create_test_server().await;

    // Register A (balance 5), submit one item (balance 6)
    let (alice, _) = register(&server, "a@example.com", "alice").await;
    submit_content(&server, &alice, "joy", "from alice").await;

    let (bob, _) = register(&server, "b@example.com", "bob").await;
    let first = submit_content(&server, &bob, "joy", "from bob").await;
    let second = submit_content(&server, &bob, "joy", "also from bob").await;

    // First unlock costs 5, leaving 1
    let response = server
        .post(&format!("/api/content/{first}/unlock"))
        .authorization_bearer(&alice)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["points_spent"], 5);
    assert_eq!(body["remaining_balance"], 1);

    // Second unlock costs 15; balance 1 is not enough
    let response = server
        .post(&format!("/api/content/{second}/unlock"))
        .authorization_bearer(&alice)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INSUFFICIENT_POINTS");
    assert_eq!(body["details"]["required"], 15);
    assert_eq!(body["details"]["balance"], 1);
}

#[tokio::test]
async fn test_unlock_twice_rejected() {
    let server = create_test_server().await;
    let (author, _) = register(&server, "author@example.com", "author").await;
    let content_id = submit_content(&server, &author, "joy", "premium").await;
    let (buyer, _) = register(&server, "buyer@example.com", "buyer").await;

    server
        .post(&format!("/api/content/{content_id}/unlock"))
        .authorization_bearer(&buyer)
        .await
        .assert_status_ok();

    let response = server
        .post(&format!("/api/content/{content_id}/unlock"))
        .authorization_bearer(&buyer)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "ALREADY_UNLOCKED");
}

// ============ Saved Item Tests ============

#[tokio::test]
async fn test_save_is_idempotent_and_unsave_removes() {
    let server = create_test_server().await;
    let (author, _) = register(&server, "author@example.com", "author").await;
    let content_id = submit_content(&server, &author, "joy", "keep me").await;
    let (saver, _) = register(&server, "saver@example.com", "saver").await;

    for _ in 0..2 {
        let response = server
            .post(&format!("/api/saved/{content_id}"))
            .authorization_bearer(&saver)
            .await;
        response.assert_status(StatusCode::CREATED);
    }

    let response = server.get("/api/saved").authorization_bearer(&saver).await;
    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["content_id"], content_id.as_str());

    // Category filter
    let response = server
        .get("/api/saved")
        .add_query_param("category", "calm")
        .authorization_bearer(&saver)
        .await;
    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 0);

    let response = server
        .delete(&format!("/api/saved/{content_id}"))
        .authorization_bearer(&saver)
        .await;
    response.assert_status_ok();

    let response = server.get("/api/saved").authorization_bearer(&saver).await;
    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 0);
}

// ============ Admin Tests ============

async fn promote_to_admin(datastore: &Datastore, user: &Value) {
    datastore
        .client()
        .query("UPDATE user SET is_admin = true WHERE user_id = $user_id")
        .bind(("user_id", user["id"].as_str().unwrap().to_string()))
        .await
        .unwrap()
        .check()
        .unwrap();
}

#[tokio::test]
async fn test_admin_routes_forbidden_for_regular_users() {
    let server = create_test_server().await;
    let (token, _) = register(&server, "a@example.com", "alice").await;

    let response = server
        .get("/api/admin/stats")
        .authorization_bearer(&token)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_soft_delete_hides_but_keeps_content() {
    let (server, datastore) = create_test_context().await;
    let (author, _) = register(&server, "author@example.com", "author").await;
    let content_id = submit_content(&server, &author, "joy", "borderline").await;
    let (admin_token, admin_user) = register(&server, "admin@example.com", "admin").await;
    promote_to_admin(&datastore, &admin_user).await;

    let response = server
        .delete(&format!("/api/admin/content/{content_id}"))
        .authorization_bearer(&admin_token)
        .await;
    response.assert_status_ok();

    // Gone from the feed
    let response = server.get("/api/content/feed").await;
    let body: Value = response.json();
    assert_eq!(body["total"], 0);

    // The row survives as a soft delete
    let mut raw = datastore
        .client()
        .query("SELECT * FROM content WHERE content_id = $content_id LIMIT 1")
        .bind(("content_id", content_id.clone()))
        .await
        .unwrap();
    let row: Option<moodlift_db::ContentEntity> = raw.take(0).unwrap();
    assert_eq!(row.unwrap().status, "deleted");
}

#[tokio::test]
async fn test_admin_reported_listing_and_stats() {
    let (server, datastore) = create_test_context().await;
    let (author, _) = register(&server, "author@example.com", "author").await;
    let content_id = submit_content(&server, &author, "joy", "reportable").await;
    let (reporter, _) = register(&server, "reporter@example.com", "reporter").await;
    server
        .post(&format!("/api/content/{content_id}/report"))
        .authorization_bearer(&reporter)
        .json(&json!({ "reason": "spam" }))
        .await
        .assert_status_ok();

    let (admin_token, admin_user) = register(&server, "admin@example.com", "admin").await;
    promote_to_admin(&datastore, &admin_user).await;

    let response = server
        .get("/api/admin/reported")
        .authorization_bearer(&admin_token)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], content_id.as_str());
    assert_eq!(items[0]["submitter_username"], "author");
    assert_eq!(items[0]["reports"].as_array().unwrap().len(), 1);
    assert_eq!(items[0]["reports"][0]["reason"], "spam");

    let response = server
        .get("/api/admin/stats")
        .authorization_bearer(&admin_token)
        .await;
    let stats: Value = response.json();
    assert_eq!(stats["total_users"], 3);
    assert_eq!(stats["total_content"], 1);
    assert_eq!(stats["total_reports"], 1);
    assert_eq!(stats["active_content"], 1);
}

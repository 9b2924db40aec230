//! End-to-end scenarios for the full communityd stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real
//! store, real services, real axum router) and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot`; no TCP port is bound.

use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use community_adapter_http_axum::router;
use community_adapter_http_axum::state::{AppState, HttpSettings};
use community_adapter_storage_sqlite_sqlx::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    pool: SqlitePool,
}

impl TestApp {
    /// Build a fully-wired router backed by an in-memory `SQLite` database.
    async fn new() -> Self {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .expect("in-memory database should initialise");
        let pool = db.pool().clone();

        let upload_dir = std::env::temp_dir().join(format!(
            "communityd-it-{}",
            std::process::id()
        ));
        let state = AppState::new(
            db.store(),
            HttpSettings {
                jwt_secret: "integration-test-secret-0123456789".to_string(),
                token_ttl_secs: 3600,
                refresh_grace_secs: 3600,
                share_ttl_secs: 3600,
                upload_dir,
                public_prefix: "/uploads".to_string(),
                share_base_url: "https://m.example.com".to_string(),
            },
        );
        Self {
            router: router::build(state),
            pool,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(request).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn post(&self, uri: &str, token: Option<&str>, body: &Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header("token", token);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Register and log in, returning `(user id, token)`.
    async fn user(&self, username: &str) -> (i64, String) {
        let (status, body) = self
            .post(
                "/api/user/register",
                None,
                &json!({"username": username, "password": "secret1"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let id = body["data"]["id"].as_i64().unwrap();
        (id, self.login(username).await)
    }

    async fn login(&self, username: &str) -> String {
        let (status, body) = self
            .post(
                "/api/user/login",
                None,
                &json!({"username": username, "password": "secret1"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn admin(&self) -> (i64, String) {
        let (id, _) = self.user("root").await;
        sqlx::query("UPDATE users SET role = 'admin' WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .unwrap();
        (id, self.login("root").await)
    }

    async fn category(&self, admin: &str, name: &str) -> i64 {
        let (status, body) = self
            .post("/api/category/create", Some(admin), &json!({"name": name}))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["id"].as_i64().unwrap()
    }

    async fn publish(&self, token: &str, category_id: i64, title: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/post/create",
                Some(token),
                &json!({"category_id": category_id, "title": title, "content": "details"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["id"].as_i64().unwrap()
    }
}

// ---------------------------------------------------------------------------
// Health & envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let app = TestApp::new().await;
    let resp = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_wrap_success_in_envelope() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/common/config?name=site_name", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 1);
    assert!(body["time"].as_i64().unwrap() > 0);
    assert_eq!(body["data"]["value"], "Smart Community");
}

#[tokio::test]
async fn should_list_seeded_values_in_config_all() {
    let app = TestApp::new().await;
    let (_, body) = app.get("/api/common/config_all", None).await;
    assert_eq!(body["data"]["upload_size_limit"], "10485760");
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_conflict_when_username_taken() {
    let app = TestApp::new().await;
    app.user("alice").await;
    let (status, body) = app
        .post(
            "/api/user/register",
            None,
            &json!({"username": "alice", "password": "secret1"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 0);
}

#[tokio::test]
async fn should_reject_short_password_when_registering() {
    let app = TestApp::new().await;
    let (status, _) = app
        .post(
            "/api/user/register",
            None,
            &json!({"username": "bob", "password": "123"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_distinguish_unknown_user_from_wrong_password() {
    let app = TestApp::new().await;
    app.user("alice").await;

    let (status, _) = app
        .post(
            "/api/user/login",
            None,
            &json!({"username": "nobody", "password": "secret1"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            "/api/user/login",
            None,
            &json!({"username": "alice", "password": "wrong-one"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_refresh_valid_token() {
    let app = TestApp::new().await;
    let (_, token) = app.user("alice").await;

    let (status, body) = app.post("/api/token/refresh", Some(&token), &json!({})).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let fresh = body["data"]["token"].as_str().unwrap();

    let (status, body) = app.get("/api/user/profile", Some(fresh)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice");
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn should_reject_garbage_token_on_refresh() {
    let app = TestApp::new().await;
    let (status, _) = app
        .post("/api/token/refresh", Some("not-a-jwt"), &json!({}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reset_password_with_sent_code() {
    let app = TestApp::new().await;
    let (status, _) = app
        .post(
            "/api/user/register",
            None,
            &json!({"username": "carol", "password": "secret1", "mobile": "13800138000"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(
            "/api/user/send_code",
            None,
            &json!({"mobile": "13800138000", "event": "resetpwd"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (code,): (String,) = sqlx::query_as("SELECT code FROM sms_codes WHERE mobile = ?")
        .bind("13800138000")
        .fetch_one(&app.pool)
        .await
        .unwrap();

    let reset = json!({"mobile": "13800138000", "code": code, "password": "brand-new"});
    let (status, body) = app.post("/api/user/reset_password", None, &reset).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    // the code is single use
    let (status, _) = app.post("/api/user/reset_password", None, &reset).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post(
            "/api/user/login",
            None,
            &json!({"username": "carol", "password": "brand-new"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Posts, likes, comments, favorites
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_publish_typed_post_and_show_extension_in_detail() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let category = app.category(&admin, "Second hand").await;
    let (_, alice) = app.user("alice").await;

    let (status, body) = app
        .post(
            "/api/post/create",
            Some(&alice),
            &json!({
                "category_id": category,
                "title": "Sofa",
                "content": "Barely used",
                "type": "second",
                "price": 150,
                "contact": "13800000000",
                "images": ["/uploads/image/a.png"]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app.get(&format!("/api/post/detail?id={id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let post = &body["data"];
    assert_eq!(post["type"], "second");
    assert_eq!(post["second"]["contact"], "13800000000");
    assert_eq!(post["view_num"], 1);
    assert_eq!(post["nickname"], "alice");
    assert_eq!(post["category_name"], "Second hand");
    assert!(post.get("is_liked").is_none());

    let (_, body) = app.get(&format!("/api/category/detail?id={category}"), None).await;
    assert_eq!(body["data"]["post_count"], 1);
}

#[tokio::test]
async fn should_require_type_fields_when_publishing() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let category = app.category(&admin, "Jobs").await;
    let (_, alice) = app.user("alice").await;

    let (status, body) = app
        .post(
            "/api/post/create",
            Some(&alice),
            &json!({"category_id": category, "title": "Cook", "content": "Wanted", "type": "job"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "salary is required");
}

#[tokio::test]
async fn should_toggle_like_and_notify_author_once() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let category = app.category(&admin, "General").await;
    let (_, alice) = app.user("alice").await;
    let (_, bob) = app.user("bob").await;
    let post = app.publish(&alice, category, "Hello").await;

    let (status, body) = app.post("/api/post/like", Some(&bob), &json!({"id": post})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "liked");
    assert_eq!(body["data"]["liked"], true);

    let (_, body) = app.get(&format!("/api/post/detail?id={post}"), Some(&bob)).await;
    assert_eq!(body["data"]["like_num"], 1);
    assert_eq!(body["data"]["is_liked"], true);

    let (_, body) = app.post("/api/post/like", Some(&bob), &json!({"id": post})).await;
    assert_eq!(body["msg"], "unliked");
    let (_, body) = app.get(&format!("/api/post/detail?id={post}"), None).await;
    assert_eq!(body["data"]["like_num"], 0);

    // the author liking their own post sends nothing
    app.post("/api/post/like", Some(&alice), &json!({"id": post})).await;

    let (_, body) = app.get("/api/message/unread_count", Some(&alice)).await;
    assert_eq!(body["data"]["count"], 1);

    let (_, body) = app.post("/api/message/read", Some(&alice), &json!({"id": "all"})).await;
    assert_eq!(body["code"], 1);
    let (_, body) = app.get("/api/message/unread_count", Some(&alice)).await;
    assert_eq!(body["data"]["count"], 0);
}

#[tokio::test]
async fn should_hide_deleted_post_and_refuse_other_users() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let category = app.category(&admin, "General").await;
    let (_, alice) = app.user("alice").await;
    let (_, bob) = app.user("bob").await;
    let post = app.publish(&alice, category, "Mine").await;

    let (status, _) = app.post("/api/post/delete", Some(&bob), &json!({"id": post})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.post("/api/post/delete", Some(&alice), &json!({"id": post})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/post/detail?id={post}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = app.get("/api/post/list", None).await;
    assert_eq!(body["data"]["total"], 0);
    let (_, body) = app.get(&format!("/api/category/detail?id={category}"), None).await;
    assert_eq!(body["data"]["post_count"], 0);
}

#[tokio::test]
async fn should_filter_post_list_by_keyword_and_paginate() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let category = app.category(&admin, "General").await;
    let (_, alice) = app.user("alice").await;
    for title in ["Red bike", "Blue bike", "Old lamp"] {
        app.publish(&alice, category, title).await;
    }

    let (_, body) = app.get("/api/post/list?keyword=bike&page_size=1", None).await;
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["list"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["list"][0]["title"], "Blue bike");

    let (_, body) = app.get("/api/user/posts", Some(&alice)).await;
    assert_eq!(body["data"]["total"], 3);
}

#[tokio::test]
async fn should_count_comments_and_block_foreign_delete() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let category = app.category(&admin, "General").await;
    let (_, alice) = app.user("alice").await;
    let (_, bob) = app.user("bob").await;
    let post = app.publish(&alice, category, "Hello").await;

    let (status, body) = app
        .post(
            "/api/comment/create",
            Some(&bob),
            &json!({"post_id": post, "content": "Nice!"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let comment = body["data"]["id"].as_i64().unwrap();

    let (_, body) = app.get(&format!("/api/comment/list?post_id={post}"), None).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["list"][0]["nickname"], "bob");

    let (status, _) = app
        .post("/api/comment/delete", Some(&alice), &json!({"id": comment}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post("/api/comment/delete", Some(&bob), &json!({"id": comment}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get(&format!("/api/post/detail?id={post}"), None).await;
    assert_eq!(body["data"]["comment_num"], 0);
}

#[tokio::test]
async fn should_share_one_favorite_between_collect_and_favorite() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let category = app.category(&admin, "General").await;
    let (_, alice) = app.user("alice").await;
    let post = app.publish(&alice, category, "Lamp").await;

    let (_, body) = app.post("/api/post/collect", Some(&alice), &json!({"id": post})).await;
    assert_eq!(body["data"]["favorited"], true);

    let (_, body) = app
        .get(&format!("/api/favorite/check?post_id={post}"), Some(&alice))
        .await;
    assert_eq!(body["data"]["is_favorite"], true);

    let (_, body) = app.get("/api/user/favorites", Some(&alice)).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["list"][0]["title"], "Lamp");

    let (_, body) = app
        .post("/api/favorite/toggle", Some(&alice), &json!({"post_id": post}))
        .await;
    assert_eq!(body["data"]["favorited"], false);
    let (_, body) = app.get(&format!("/api/post/detail?id={post}"), None).await;
    assert_eq!(body["data"]["favorite_num"], 0);
}

// ---------------------------------------------------------------------------
// Follow & blacklist
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_drop_follow_edges_when_blocking() {
    let app = TestApp::new().await;
    let (alice_id, alice) = app.user("alice").await;
    let (bob_id, bob) = app.user("bob").await;

    let (_, body) = app
        .post("/api/follow/toggle", Some(&alice), &json!({"follow_id": bob_id}))
        .await;
    assert_eq!(body["data"]["followed"], true);
    app.post("/api/follow/toggle", Some(&bob), &json!({"follow_id": alice_id}))
        .await;

    let (_, body) = app.get("/api/follow/fans_list", Some(&bob)).await;
    assert_eq!(body["data"]["total"], 1);

    let (_, body) = app
        .post("/api/blacklist/toggle", Some(&bob), &json!({"block_id": alice_id}))
        .await;
    assert_eq!(body["data"]["blocked"], true);

    let (_, body) = app
        .get(&format!("/api/follow/check?follow_id={bob_id}"), Some(&alice))
        .await;
    assert_eq!(body["data"]["is_follow"], false);

    let (_, body) = app.get("/api/user/profile", Some(&alice)).await;
    assert_eq!(body["data"]["follow_num"], 0);
    assert_eq!(body["data"]["fans_num"], 0);

    let (status, _) = app
        .post("/api/follow/toggle", Some(&alice), &json!({"follow_id": bob_id}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = app
        .get(&format!("/api/blacklist/check_blocked?check_id={bob_id}"), Some(&alice))
        .await;
    assert_eq!(body["data"]["is_blocked_by"], true);
}

#[tokio::test]
async fn should_refuse_following_self() {
    let app = TestApp::new().await;
    let (alice_id, alice) = app.user("alice").await;
    let (status, _) = app
        .post("/api/follow/toggle", Some(&alice), &json!({"follow_id": alice_id}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_hide_post_and_notify_author_when_audit_rejected() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let category = app.category(&admin, "General").await;
    let (_, alice) = app.user("alice").await;
    let post = app.publish(&alice, category, "Questionable").await;

    let (status, _) = app
        .post("/api/audit/submit", Some(&alice), &json!({"post_id": post}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .post("/api/audit/submit", Some(&alice), &json!({"post_id": post}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = app.get("/api/audit/list", Some(&admin)).await;
    assert_eq!(body["data"]["total"], 1);

    let review = json!({"post_id": post, "status": "rejected", "reason": "spam"});
    let (status, body) = app.post("/api/audit/review", Some(&admin), &review).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let (status, _) = app.post("/api/audit/review", Some(&admin), &review).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.get(&format!("/api/post/detail?id={post}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/api/message/list", Some(&alice)).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["list"][0]["type"], "system");
}

#[tokio::test]
async fn should_pin_post_to_top_of_list_when_stuck() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let category = app.category(&admin, "General").await;
    let (_, alice) = app.user("alice").await;
    let first = app.publish(&alice, category, "First").await;
    app.publish(&alice, category, "Second").await;

    let (status, _) = app
        .post("/api/stick/toggle", Some(&alice), &json!({"post_id": first}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = app
        .post("/api/stick/toggle", Some(&admin), &json!({"post_id": first}))
        .await;
    assert_eq!(body["data"]["sticky"], true);

    let (_, body) = app.get("/api/post/list", None).await;
    assert_eq!(body["data"]["list"][0]["id"], first);
    assert_eq!(body["data"]["list"][0]["is_stick"], true);

    let (_, body) = app.get(&format!("/api/stick/check?post_id={first}"), None).await;
    assert_eq!(body["data"]["is_stick"], true);
    let (_, body) = app.get("/api/stick/list", None).await;
    assert_eq!(body["data"]["list"][0]["admin_name"], "root");

    let (_, body) = app
        .post("/api/stick/toggle", Some(&admin), &json!({"post_id": first}))
        .await;
    assert_eq!(body["data"]["sticky"], false);
    let (_, body) = app.get(&format!("/api/stick/check?post_id={first}"), None).await;
    assert_eq!(body["data"]["is_stick"], false);
}

#[tokio::test]
async fn should_refuse_duplicate_pending_report() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let category = app.category(&admin, "General").await;
    let (_, alice) = app.user("alice").await;
    let (_, bob) = app.user("bob").await;
    let post = app.publish(&alice, category, "Spam").await;

    let report = json!({"type": "post", "target_id": post, "reason": "spam"});
    let (status, body) = app.post("/api/report/create", Some(&bob), &report).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let (status, _) = app.post("/api/report/create", Some(&bob), &report).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post(
            "/api/report/create",
            Some(&bob),
            &json!({"type": "comment", "target_id": 999, "reason": "spam"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Catalog administration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_refuse_deleting_category_in_use() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let category = app.category(&admin, "General").await;
    let (_, alice) = app.user("alice").await;
    app.publish(&alice, category, "Hello").await;

    let (status, _) = app
        .post("/api/category/delete", Some(&admin), &json!({"id": category}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post("/api/category/create", Some(&admin), &json!({"name": "General"}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn should_recount_tags_when_post_tags_replaced() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let category = app.category(&admin, "General").await;
    let (_, alice) = app.user("alice").await;
    let (_, bob) = app.user("bob").await;
    let post = app.publish(&alice, category, "Bike").await;

    let mut tags = Vec::new();
    for name in ["sport", "cheap"] {
        let (_, body) = app
            .post("/api/tag/create", Some(&admin), &json!({"name": name}))
            .await;
        tags.push(body["data"]["id"].as_i64().unwrap());
    }

    let (status, _) = app
        .post(
            "/api/tag/set_post_tags",
            Some(&bob),
            &json!({"post_id": post, "tag_ids": tags}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            "/api/tag/set_post_tags",
            Some(&alice),
            &json!({"post_id": post, "tag_ids": [tags[0], 4242]}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.post(
        "/api/tag/set_post_tags",
        Some(&alice),
        &json!({"post_id": post, "tag_ids": tags}),
    )
    .await;
    app.post(
        "/api/tag/set_post_tags",
        Some(&alice),
        &json!({"post_id": post, "tag_ids": [tags[1]]}),
    )
    .await;

    let (_, body) = app.get("/api/tag/hot", None).await;
    let hot = body["data"]["list"].as_array().unwrap();
    assert_eq!(hot.len(), 1);
    assert_eq!(hot[0]["name"], "cheap");
    assert_eq!(hot[0]["post_count"], 1);

    let (_, body) = app.get(&format!("/api/tag/by_post?post_id={post}"), None).await;
    assert_eq!(body["data"]["list"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn should_update_settings_and_expose_public_value() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;

    let (status, body) = app
        .post(
            "/api/config/update",
            Some(&admin),
            &json!([{"name": "site_name", "value": "Maple Court"}, {"name": "", "value": "x"}]),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["count"], 1);

    let (_, body) = app.get("/api/common/config?name=site_name", None).await;
    assert_eq!(body["data"]["value"], "Maple Court");

    let (_, body) = app.get("/api/config/list?group=upload", Some(&admin)).await;
    assert_eq!(body["data"]["upload"].as_array().unwrap().len(), 2);
    assert!(body["data"].get("basic").is_none());

    let (status, _) = app.get("/api/config/get?name=missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Addresses, history, search, shares
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_keep_single_default_address() {
    let app = TestApp::new().await;
    let (_, alice) = app.user("alice").await;
    let address = |is_default: bool| {
        json!({
            "name": "Alice", "mobile": "13800138000", "province": "Zhejiang",
            "city": "Hangzhou", "district": "Xihu", "address": "1 Lake Rd",
            "is_default": if is_default { 1 } else { 0 }
        })
    };

    let (_, body) = app.post("/api/address/create", Some(&alice), &address(true)).await;
    let first = body["data"]["id"].as_i64().unwrap();
    let (_, body) = app.post("/api/address/create", Some(&alice), &address(true)).await;
    let second = body["data"]["id"].as_i64().unwrap();

    let (_, body) = app.get("/api/address/list", Some(&alice)).await;
    let list = body["data"]["list"].as_array().unwrap();
    assert_eq!(list[0]["id"], second);
    assert_eq!(list[0]["is_default"], true);
    assert_eq!(list[1]["id"], first);
    assert_eq!(list[1]["is_default"], false);

    let (_, body) = app.get("/api/user/profile", Some(&alice)).await;
    assert_eq!(body["data"]["default_address_id"], second);

    app.post("/api/address/delete", Some(&alice), &json!({"id": second}))
        .await;
    let (_, body) = app.get("/api/user/profile", Some(&alice)).await;
    assert!(body["data"]["default_address_id"].is_null());
}

#[tokio::test]
async fn should_record_history_once_per_post() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let category = app.category(&admin, "General").await;
    let (_, alice) = app.user("alice").await;
    let post = app.publish(&alice, category, "Seen").await;

    for _ in 0..2 {
        let (status, _) = app
            .post("/api/history/record", Some(&alice), &json!({"post_id": post}))
            .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, body) = app.get("/api/history/list", Some(&alice)).await;
    assert_eq!(body["data"]["total"], 1);

    let (_, body) = app.post("/api/history/clear", Some(&alice), &json!({})).await;
    assert_eq!(body["data"]["count"], 1);
}

#[tokio::test]
async fn should_keep_search_keywords_unique() {
    let app = TestApp::new().await;
    let (_, alice) = app.user("alice").await;
    for keyword in ["sofa", "bike", "sofa"] {
        app.post("/api/search/save_log", Some(&alice), &json!({"keyword": keyword}))
            .await;
    }
    let (_, body) = app.get("/api/search/history", Some(&alice)).await;
    let list = body["data"]["list"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.contains(&json!("sofa")));
    assert!(list.contains(&json!("bike")));
}

#[tokio::test]
async fn should_build_share_link_and_count_shares() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let category = app.category(&admin, "General").await;
    let (alice_id, alice) = app.user("alice").await;
    let post = app.publish(&alice, category, "Share me").await;

    let (status, body) = app
        .get(&format!("/api/share/link?post_id={post}"), Some(&alice))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let link = body["data"]["link"].as_str().unwrap();
    let token = link
        .strip_prefix("https://m.example.com/share/")
        .unwrap_or_else(|| panic!("unexpected link {link}"));

    let (status, body) = app
        .get(&format!("/api/share/resolve?token={token}"), None)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["post_id"], post);
    assert_eq!(body["data"]["user_id"], alice_id);

    for platform in ["wechat", "wechat", "weibo"] {
        app.post(
            "/api/share/record",
            None,
            &json!({"post_id": post, "platform": platform}),
        )
        .await;
    }
    let (_, body) = app.get(&format!("/api/share/stats?post_id={post}"), None).await;
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["platforms"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Common & home
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_store_uploaded_image_and_return_url() {
    let app = TestApp::new().await;
    let (_, alice) = app.user("alice").await;

    let boundary = "X-COMMUNITY-BOUNDARY";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"type\"\r\n\r\n\
         image\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"photo.PNG\"\r\n\
         Content-Type: image/png\r\n\r\n\
         not-really-a-png\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/common/upload")
        .header(AUTHORIZATION, format!("Bearer {alice}"))
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let url = body["data"]["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/image/"), "{url}");
    assert!(url.ends_with(".png"), "{url}");
}

#[tokio::test]
async fn should_reject_upload_with_wrong_mime() {
    let app = TestApp::new().await;
    let (_, alice) = app.user("alice").await;

    let boundary = "X-COMMUNITY-BOUNDARY";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"clip.mp4\"\r\n\
         Content-Type: video/mp4\r\n\r\n\
         data\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/common/upload")
        .header("token", alice)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_refuse_forged_share_token() {
    let app = TestApp::new().await;
    let (_, alice) = app.user("alice").await;

    // a session token is signed with the same key but is not a share token
    let (status, _) = app
        .get(&format!("/api/share/resolve?token={alice}"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/share/resolve?token=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_reject_html_file_sent_as_image() {
    let app = TestApp::new().await;
    let (_, alice) = app.user("alice").await;

    let boundary = "X-COMMUNITY-BOUNDARY";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"type\"\r\n\r\n\
         image\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"evil.html\"\r\n\
         Content-Type: image/png\r\n\r\n\
         <script>alert(1)</script>\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/common/upload")
        .header("token", alice)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 0);
    assert_eq!(body["msg"], "file: file extension not allowed");
}

#[tokio::test]
async fn should_answer_payload_too_large_when_upload_exceeds_body_limit() {
    let app = TestApp::new().await;
    let (_, alice) = app.user("alice").await;

    let boundary = "X-COMMUNITY-BOUNDARY";
    let mut body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"clip.mp4\"\r\n\
         Content-Type: video/mp4\r\n\r\n"
    )
    .into_bytes();
    body.extend(std::iter::repeat_n(b'a', 52 * 1024 * 1024));
    body.extend(format!("\r\n--{boundary}--\r\n").into_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/common/upload")
        .header("token", alice)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], 0);
}

#[tokio::test]
async fn should_sort_communities_by_distance() {
    let app = TestApp::new().await;
    for (name, lat, lng) in [
        ("Far", Some(31.23), Some(121.47)),
        ("Near", Some(30.28), Some(120.16)),
        ("Unknown", None, None),
    ] {
        sqlx::query("INSERT INTO communities (name, lat, lng, createtime) VALUES (?, ?, ?, 0)")
            .bind(name)
            .bind(lat)
            .bind(lng)
            .execute(&app.pool)
            .await
            .unwrap();
    }

    let (_, body) = app.get("/api/common/community?lat=30.27&lng=120.15", None).await;
    let list = body["data"]["list"].as_array().unwrap();
    assert_eq!(list[0]["name"], "Near");
    assert_eq!(list[1]["name"], "Far");
    assert_eq!(list[2]["name"], "Unknown");
    assert!(list[2]["distance"].is_null());
}

#[tokio::test]
async fn should_serve_home_feed() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let category = app.category(&admin, "General").await;
    let (_, alice) = app.user("alice").await;
    app.publish(&alice, category, "Latest").await;

    let (status, body) = app.get("/api/index/init", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["categories"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["posts"][0]["title"], "Latest");
    assert!(body["data"]["banners"].as_array().unwrap().is_empty());
}

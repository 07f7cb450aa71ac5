//! Smoke tests for the public site flows and the admin content screens.

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use eduhub::config::Config;
use eduhub::services::Notifier;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str) -> anyhow::Result<()> {
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _text: &str) -> anyhow::Result<()> {
        anyhow::bail!("telegram is down")
    }
}

async fn spawn_app_with(notifier: Arc<dyn Notifier>) -> (Router, String) {
    let db_path =
        std::env::temp_dir().join(format!("eduhub-smoke-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.auth.admin_password = "fallback-pass".to_string();

    let state = eduhub::api::create_app_state_with_notifier(config, notifier)
        .await
        .expect("failed to create app state");
    let router = eduhub::api::router(state);

    let (status, body) = send(
        &router,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "login": "admin", "password": "fallback-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    (router, token)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn wait_for_messages(notifier: &RecordingNotifier, count: usize) -> Vec<String> {
    for _ in 0..50 {
        {
            let messages = notifier.messages.lock().unwrap();
            if messages.len() >= count {
                return messages.clone();
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    notifier.messages.lock().unwrap().clone()
}

#[tokio::test]
async fn test_application_submission_flow() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (app, token) = spawn_app_with(notifier.clone()).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/courses",
        Some(&token),
        Some(json!({
            "name": "Japanese N5",
            "language": "Japanese",
            "level": "Beginner",
            "duration": "4 months",
            "slug": "japanese-n5",
            "locale": "ru"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let course_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/public/applications",
        None,
        Some(json!({
            "name": "  Aziz  ",
            "phone": "+998 (90) 123-45-67",
            "tg_username": "aziz_dev",
            "course_id": course_id
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Aziz");
    assert_eq!(body["data"]["phone"], "+998901234567");
    assert_eq!(body["data"]["tg_username"], "@aziz_dev");
    assert_eq!(body["data"]["course_title"], "Japanese N5");
    assert_eq!(body["data"]["status"], "new");

    let messages = wait_for_messages(&notifier, 1).await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Name: Aziz"));
    assert!(messages[0].contains("Course: Japanese N5"));
    assert!(messages[0].contains("Duration: 4 months"));
    assert!(messages[0].contains("Level: Beginner"));

    let (status, body) = send(
        &app,
        "POST",
        "/api/public/applications",
        None,
        Some(json!({
            "name": "Dilnoza",
            "phone": "1234567",
            "tg_username": "@dilnoza",
            "course": "Korean for travel"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["course_id"].is_null());
    assert_eq!(body["data"]["course_title"], "Korean for travel");

    let messages = wait_for_messages(&notifier, 2).await;
    assert!(messages[1].contains("Course: Korean for travel"));
    assert!(!messages[1].contains("Duration"));
}

#[tokio::test]
async fn test_invalid_application_is_rejected() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (app, token) = spawn_app_with(notifier.clone()).await;

    for payload in [
        json!({ "name": "A", "phone": "+998901234567", "tg_username": "aziz" }),
        json!({ "name": "Aziz", "phone": "12-34", "tg_username": "aziz" }),
        json!({ "name": "Aziz", "phone": "+998901234567", "tg_username": "a-z" }),
    ] {
        let (status, body) = send(&app, "POST", "/api/public/applications", None, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    let (_, body) = send(&app, "GET", "/api/admin/applications", Some(&token), None).await;
    assert_eq!(body["data"], json!([]));
    assert!(notifier.messages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_notification_failure_does_not_fail_submission() {
    let (app, token) = spawn_app_with(Arc::new(FailingNotifier)).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/public/applications",
        None,
        Some(json!({ "name": "Aziz", "phone": "+998901234567", "tg_username": "aziz" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", "/api/admin/applications", Some(&token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_application_status_management() {
    let (app, token) = spawn_app_with(Arc::new(RecordingNotifier::default())).await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/public/applications",
        None,
        Some(json!({ "name": "Aziz", "phone": "+998901234567", "tg_username": "aziz" })),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/admin/applications/{id}"),
        Some(&token),
        Some(json!({ "status": "contacted" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "contacted");

    let (_, body) = send(
        &app,
        "GET",
        "/api/admin/applications?status=new",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["data"], json!([]));

    let (_, body) = send(
        &app,
        "GET",
        "/api/admin/applications?status=contacted",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/admin/applications/{id}"),
        Some(&token),
        Some(json!({ "status": "archived" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/admin/applications/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/admin/applications/{id}"),
        Some(&token),
        Some(json!({ "status": "enrolled" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blog_publication_and_ordering() {
    let (app, token) = spawn_app_with(Arc::new(RecordingNotifier::default())).await;

    for (slug, published, published_at) in [
        ("draft", false, None),
        ("undated", true, None),
        ("older", true, Some("2025-01-10T09:00:00+00:00")),
        ("newer", true, Some("2025-02-20T09:00:00+00:00")),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/admin/blog",
            Some(&token),
            Some(json!({
                "title": format!("Post {slug}"),
                "slug": slug,
                "body": "Body",
                "is_published": published,
                "published_at": published_at
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/api/public/blog", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["newer", "older", "undated"]);

    let (status, _) = send(&app, "GET", "/api/public/blog/draft", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/api/public/blog/older", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Post older");

    let (status, _) = send(
        &app,
        "POST",
        "/api/admin/blog",
        Some(&token),
        Some(json!({ "title": "Dup", "slug": "newer", "body": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_teachers_and_reviews_by_locale() {
    let (app, token) = spawn_app_with(Arc::new(RecordingNotifier::default())).await;

    for (name, locale) in [("Yuki", "ja"), ("Anna", "ru")] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/admin/teachers",
            Some(&token),
            Some(json!({ "name": name, "bio": "Teacher", "locale": locale })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, "GET", "/api/public/teachers?locale=ja", None, None).await;
    let teachers = body["data"].as_array().unwrap();
    assert_eq!(teachers.len(), 1);
    assert_eq!(teachers[0]["name"], "Yuki");

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/reviews",
        Some(&token),
        Some(json!({ "name": "Bek", "quote": "Great course", "is_visible": false })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["locale"], "ru");
    let review_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = send(&app, "GET", "/api/public/reviews", None, None).await;
    assert_eq!(body["data"], json!([]));

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/admin/reviews/{review_id}"),
        Some(&token),
        Some(json!({ "name": "Bek", "quote": "Great course", "is_visible": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/public/reviews?locale=ru", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "POST",
        "/api/admin/teachers",
        Some(&token),
        Some(json!({ "name": "Hans", "locale": "de" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", "/api/admin/teachers/999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_track_partners_and_contacts() {
    let (app, token) = spawn_app_with(Arc::new(RecordingNotifier::default())).await;

    for (title, order) in [("Placement test", 2), ("Free trial lesson", 1), ("Group start", 3)] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/admin/track",
            Some(&token),
            Some(json!({ "title": title, "order": order, "course_links": ["intro"] })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, "GET", "/api/public/track?locale=ru", None, None).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Free trial lesson", "Placement test", "Group start"]);
    assert_eq!(body["data"][0]["order"], 1);
    assert_eq!(body["data"][0]["course_links"], json!(["intro"]));

    let (status, _) = send(
        &app,
        "POST",
        "/api/admin/track",
        Some(&token),
        Some(json!({ "title": "Bad links", "course_links": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for (name, order) in [("Embassy", 1), ("Publisher", 0), ("University", 1)] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/admin/partners",
            Some(&token),
            Some(json!({ "name": name, "url": "https://example.org", "order": order })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, "GET", "/api/public/partners", None, None).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Publisher", "University", "Embassy"]);

    let (status, _) = send(
        &app,
        "POST",
        "/api/admin/partners",
        Some(&token),
        Some(json!({ "name": "Broken", "url": "not a url" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/public/contacts?locale=en", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Contacts not found");

    for (locale, phone) in [("ru", "+998 71 200 00 00"), ("en", "+998 71 200 00 01")] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/admin/contacts",
            Some(&token),
            Some(json!({
                "locale": locale,
                "phone": phone,
                "socials": { "telegram": "https://t.me/school" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/api/public/contacts?locale=en", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["phone"], "+998 71 200 00 01");
    assert_eq!(body["data"]["socials"]["telegram"], "https://t.me/school");

    let (status, _) = send(
        &app,
        "POST",
        "/api/admin/contacts",
        Some(&token),
        Some(json!({ "socials": ["https://t.me/school"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/admin/partners", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "DELETE", "/api/admin/track/999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

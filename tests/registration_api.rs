//! HTTP tests for the registration endpoint

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use ts_register::api::{create_router, AppState};
use ts_register::domain::RegistrationRequest;
use ts_register::infrastructure::user::{Argon2Hasher, InMemoryUserRepository, UserService};

const PHONE: &str = "18781994583";
const NAME: &str = "Seven_test_user";
const PASSWORD: &str = "123456";
const DEVICE: &str = "testing";

struct TestApp {
    router: Router,
    users: Arc<UserService>,
}

impl TestApp {
    fn new() -> Self {
        let users = Arc::new(UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2Hasher::new()),
        ));
        let router = create_router(AppState::new(users.clone()));

        Self { router, users }
    }

    /// App with the fixture user already registered
    async fn with_fixture_user() -> Self {
        let app = Self::new();
        app.users
            .register(&RegistrationRequest::new(PHONE, PASSWORD, DEVICE).with_name(NAME))
            .await
            .unwrap();
        app
    }

    async fn post_raw(&self, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }

    async fn register(&self, body: Value) -> (StatusCode, Value) {
        self.post_raw(body.to_string()).await
    }

    async fn get(&self, uri: &str) -> axum::response::Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }
}

#[tokio::test]
async fn empty_device_code_is_unprocessable() {
    let app = TestApp::with_fixture_user().await;

    let (status, body) = app
        .register(json!({"phone": "", "password": "", "device_code": ""}))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"code": 1014, "message": "device code must not be empty"})
    );
}

#[tokio::test]
async fn empty_phone_is_rejected() {
    let app = TestApp::with_fixture_user().await;

    let (status, body) = app
        .register(json!({"phone": "", "password": "", "device_code": DEVICE}))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"code": 1000}));
}

#[tokio::test]
async fn malformed_phone_is_rejected() {
    let app = TestApp::with_fixture_user().await;

    let (status, body) = app
        .register(json!({"phone": "123456789", "password": "", "device_code": DEVICE}))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"code": 1000}));
}

#[tokio::test]
async fn missing_name_is_rejected() {
    let app = TestApp::with_fixture_user().await;

    let (status, body) = app
        .register(json!({"phone": PHONE, "password": PASSWORD, "device_code": DEVICE}))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"code": 1002}));
}

#[tokio::test]
async fn short_name_is_rejected() {
    let app = TestApp::with_fixture_user().await;

    let (status, body) = app
        .register(json!({
            "phone": PHONE,
            "password": PASSWORD,
            "device_code": DEVICE,
            "name": "iss"
        }))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"code": 1002}));
}

#[tokio::test]
async fn name_with_disallowed_characters_is_rejected() {
    let app = TestApp::with_fixture_user().await;

    let (status, body) = app
        .register(json!({
            "phone": PHONE,
            "password": PASSWORD,
            "device_code": DEVICE,
            "name": "++test"
        }))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"code": 1003}));
}

#[tokio::test]
async fn taken_name_is_rejected() {
    let app = TestApp::with_fixture_user().await;

    let (status, body) = app
        .register(json!({
            "phone": PHONE,
            "password": PASSWORD,
            "device_code": DEVICE,
            "name": NAME
        }))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"code": 1004}));
}

#[tokio::test]
async fn taken_phone_is_rejected() {
    let app = TestApp::with_fixture_user().await;

    let (status, body) = app
        .register(json!({
            "phone": PHONE,
            "password": PASSWORD,
            "device_code": DEVICE,
            "name": "fresh_name"
        }))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"code": 1010}));
}

#[tokio::test]
async fn earlier_stage_failure_wins() {
    let app = TestApp::with_fixture_user().await;

    // Valid name and phone do not bypass the device code check
    let (status, body) = app
        .register(json!({
            "phone": "13900000000",
            "password": PASSWORD,
            "device_code": "  ",
            "name": "fresh_name"
        }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 1014);

    // A bad phone is reported before a taken name
    let (status, body) = app
        .register(json!({
            "phone": "123456789",
            "password": PASSWORD,
            "device_code": DEVICE,
            "name": NAME
        }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"code": 1000}));

    // A bad charset is reported before a taken phone
    let (status, body) = app
        .register(json!({
            "phone": PHONE,
            "password": PASSWORD,
            "device_code": DEVICE,
            "name": "9lives_user"
        }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"code": 1003}));
}

#[tokio::test]
async fn fresh_registration_succeeds() {
    let app = TestApp::new();

    let (status, body) = app
        .register(json!({
            "phone": PHONE,
            "password": PASSWORD,
            "device_code": DEVICE,
            "name": NAME
        }))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["phone"], PHONE);
    assert_eq!(body["name"], NAME);
    assert_eq!(body["email"], "");
    assert!(body["id"].is_string());
    assert!(body.get("password_hash").is_none());

    let id = body["id"].as_str().unwrap();
    let user = app.users.get(id).await.unwrap().unwrap();
    assert!(app.users.verify_password(&user, PASSWORD));
}

#[tokio::test]
async fn numeric_password_is_accepted() {
    let app = TestApp::new();

    let (status, body) = app
        .register(json!({
            "phone": PHONE,
            "password": 123456,
            "device_code": DEVICE,
            "name": NAME
        }))
        .await;

    assert_eq!(status, StatusCode::CREATED);

    let user = app.users.get(body["id"].as_str().unwrap()).await.unwrap().unwrap();
    assert!(app.users.verify_password(&user, "123456"));
}

#[tokio::test]
async fn trashed_user_reserves_until_purged() {
    let app = TestApp::with_fixture_user().await;
    let payload = json!({
        "phone": PHONE,
        "password": PASSWORD,
        "device_code": DEVICE,
        "name": NAME
    });

    assert_eq!(app.users.count(false).await.unwrap(), 1);

    let purged = app.users.purge_matching(PHONE, NAME).await.unwrap();
    assert_eq!(purged, 1);

    let (status, body) = app.register(payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let id = ts_register::domain::UserId::parse(body["id"].as_str().unwrap()).unwrap();
    app.users.trash(&id).await.unwrap();

    let (status, body) = app.register(payload.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"code": 1004}));

    app.users.purge(&id).await.unwrap();

    let (status, _) = app.register(payload).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn malformed_json_uses_message_envelope() {
    let app = TestApp::new();

    let (status, body) = app.post_raw("{not json".to_string()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.get("code").is_none());
    assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON"));
}

#[tokio::test]
async fn missing_password_is_unprocessable() {
    let app = TestApp::new();

    let (status, body) = app
        .register(json!({"phone": PHONE, "device_code": DEVICE, "name": NAME}))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.get("code").is_none());
    assert_eq!(app.users.count(true).await.unwrap(), 0);
}

#[tokio::test]
async fn null_password_is_unprocessable() {
    let app = TestApp::new();

    let (status, body) = app
        .register(json!({
            "phone": PHONE,
            "password": null,
            "device_code": DEVICE,
            "name": NAME
        }))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.get("code").is_none());
    assert_eq!(app.users.count(true).await.unwrap(), 0);
}

#[tokio::test]
async fn empty_password_is_unprocessable() {
    let app = TestApp::new();

    let (status, body) = app
        .register(json!({
            "phone": PHONE,
            "password": "",
            "device_code": DEVICE,
            "name": NAME
        }))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"message": "password must not be empty"}));
    assert_eq!(app.users.count(true).await.unwrap(), 0);
}

#[tokio::test]
async fn prefixed_phone_of_taken_number_is_rejected() {
    let app = TestApp::with_fixture_user().await;

    for (phone, name) in [("8618781994583", "second_user"), ("+8618781994583", "third_user")] {
        let (status, body) = app
            .register(json!({
                "phone": phone,
                "password": PASSWORD,
                "device_code": DEVICE,
                "name": name
            }))
            .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({"code": 1010}));
    }

    assert_eq!(app.users.count(true).await.unwrap(), 1);
}

#[tokio::test]
async fn prefixed_phone_is_stored_in_national_form() {
    let app = TestApp::new();

    let (status, body) = app
        .register(json!({
            "phone": "+8618781994583",
            "password": PASSWORD,
            "device_code": DEVICE,
            "name": NAME
        }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["phone"], PHONE);

    let (status, body) = app
        .register(json!({
            "phone": PHONE,
            "password": PASSWORD,
            "device_code": DEVICE,
            "name": "second_user"
        }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"code": 1010}));
}

#[tokio::test]
async fn health_endpoints() {
    let app = TestApp::new();

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");

    assert_eq!(app.get("/live").await.status(), StatusCode::OK);

    let response = app.get("/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["checks"][0]["name"], "user_store");
}

#[tokio::test]
async fn responses_carry_security_and_request_id_headers() {
    let app = TestApp::new();

    let response = app.get("/health").await;
    let headers = response.headers();

    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
    assert!(headers.contains_key("x-request-id"));
}

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use coursehub_core::roles::Role;
use coursehub_core::types::EntityId;
use coursehub_store::models::profile::ProfilePatch;
use http_body_util::BodyExt;
use mockable::DefaultClock;
use serde_json::{json, Value};
use tower::ServiceExt;

use coursehub_api::auth::jwt::JwtConfig;
use coursehub_api::config::{ServerConfig, StorageConfig, DEFAULT_MAX_UPLOAD_BYTES};
use coursehub_api::router::build_app_router;
use coursehub_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and in-memory storage.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
        storage: StorageConfig::default(),
    }
}

/// The full application router over fresh in-memory stores, plus the state
/// behind it so tests can reach the stores directly.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let state = AppState::in_memory(config.clone(), Arc::new(DefaultClock));
    let router = build_app_router(state.clone(), &config);
    TestApp { state, router }
}

/// A signed-up account and its bearer token.
pub struct Account {
    pub uid: EntityId,
    pub token: String,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.send(request(Method::GET, uri, token, Body::empty(), None))
            .await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(request(Method::DELETE, uri, Some(token), Body::empty(), None))
            .await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> Response<Body> {
        self.send(json_request(Method::POST, uri, token, body)).await
    }

    pub async fn put_json(&self, uri: &str, token: &str, body: Value) -> Response<Body> {
        self.send(json_request(Method::PUT, uri, Some(token), body))
            .await
    }

    pub async fn put_bytes(
        &self,
        uri: &str,
        token: &str,
        content_type: &str,
        bytes: impl Into<Vec<u8>>,
    ) -> Response<Body> {
        self.send_bytes(Method::PUT, uri, token, content_type, bytes)
            .await
    }

    pub async fn post_bytes(
        &self,
        uri: &str,
        token: &str,
        content_type: &str,
        bytes: impl Into<Vec<u8>>,
    ) -> Response<Body> {
        self.send_bytes(Method::POST, uri, token, content_type, bytes)
            .await
    }

    async fn send_bytes(
        &self,
        method: Method,
        uri: &str,
        token: &str,
        content_type: &str,
        bytes: impl Into<Vec<u8>>,
    ) -> Response<Body> {
        let bytes: Vec<u8> = bytes.into();
        self.send(request(
            method,
            uri,
            Some(token),
            Body::from(bytes),
            Some(content_type),
        ))
        .await
    }

    /// Sign up a student through the API.
    pub async fn signup(&self, name: &str, email: &str) -> Account {
        let response = self
            .post_json(
                "/api/v1/auth/signup",
                None,
                json!({
                    "displayName": name,
                    "email": email,
                    "password": "secret123",
                    "confirmPassword": "secret123",
                }),
            )
            .await;
        assert_eq!(response.status(), 201, "signup should succeed");
        let json = body_json(response).await;
        Account {
            uid: json["user"]["identity"]["uid"]
                .as_str()
                .expect("uid")
                .parse()
                .expect("uid is a uuid"),
            token: json["access_token"].as_str().expect("token").to_string(),
        }
    }

    /// Sign up an account and promote its profile to admin out of band.
    pub async fn admin(&self, name: &str, email: &str) -> Account {
        let account = self.signup(name, email).await;
        self.state
            .sessions
            .profiles
            .merge(
                account.uid,
                ProfilePatch {
                    role: Some(Role::Admin),
                    ..Default::default()
                },
            )
            .await
            .expect("promotion should succeed");
        account
    }

    /// Create a course as `admin` and return its id.
    pub async fn create_course(&self, admin: &Account, body: Value) -> String {
        let response = self
            .post_json("/api/v1/admin/courses", Some(&admin.token), body)
            .await;
        assert_eq!(response.status(), 201, "course creation should succeed");
        body_json(response).await["data"]["id"]
            .as_str()
            .expect("id")
            .to_string()
    }
}

fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Body,
    content_type: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    builder.body(body).expect("valid request")
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    request(
        method,
        uri,
        token,
        Body::from(body.to_string()),
        Some("application/json"),
    )
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// A valid course form with string-typed numbers, as a browser form sends.
pub fn course_body(title: &str, max_students: &str) -> Value {
    json!({
        "title": title,
        "description": "A hands-on introduction to the subject.",
        "instructor": "Ada Lovelace",
        "duration": "8 weeks",
        "level": "Beginner",
        "category": "Programming",
        "price": "49.99",
        "maxStudents": max_students,
        "startDate": "2025-04-01",
        "endDate": "2025-05-27",
        "materials": "Slides, Exercises",
    })
}

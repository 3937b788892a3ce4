//! Common test utilities for integration tests
//!
//! Builds the full application router with mock gateway and mock email
//! service. Two flavors: a database-free app over a lazy pool (for routes
//! that reject before touching storage) and a live one that connects to
//! `TEST_DATABASE_URL` / `DATABASE_URL` and runs migrations. Database
//! tests skip silently when neither variable is set.

use std::env;
use std::sync::{Arc, Once};

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;

use starter_app::{build_router, AppServices};
use starter_email::mock::MockEmailService;
use starter_payments::mock::MockPaymentGateway;

static INIT: Once = Once::new();

fn load_env() {
    INIT.call_once(|| {
        dotenvy::from_filename(".env.test").ok();
        dotenvy::dotenv().ok();
    });
}

/// The application wired with recording mocks.
pub struct TestApp {
    pub router: Router,
    pub gateway: MockPaymentGateway,
    pub email: MockEmailService,
    pub pool: PgPool,
}

impl TestApp {
    fn from_pool(pool: PgPool) -> Self {
        let gateway = MockPaymentGateway::new();
        let email = MockEmailService::new();

        let router = build_router(
            pool.clone(),
            AppServices {
                gateway: Arc::new(gateway.clone()),
                email: Arc::new(email.clone()),
            },
        );

        Self {
            router,
            gateway,
            email,
            pool,
        }
    }

    /// App over a lazy pool that never connects. Only for routes that
    /// answer before any query runs.
    pub fn without_database() -> Self {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/starter_never_connected")
            .expect("lazy pool construction cannot fail");
        Self::from_pool(pool)
    }

    /// App over the test database, or `None` when no database is
    /// configured in the environment.
    pub async fn with_database() -> Option<Self> {
        load_env();

        let database_url = env::var("TEST_DATABASE_URL")
            .or_else(|_| env::var("DATABASE_URL"))
            .ok()?;

        let pool = PgPool::connect(&database_url)
            .await
            .expect("failed to connect to the test database");

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .expect("failed to run migrations");

        Some(Self::from_pool(pool))
    }

    /// Remove every row tied to a test user email (cascades cover
    /// accounts, sessions and subscriptions).
    pub async fn delete_user(&self, email: &str) {
        sqlx::query("DELETE FROM verifications WHERE identifier LIKE '%' || $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .ok();
        sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .ok();
    }

    pub async fn get(&self, path: &str) -> Response<Body> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get_authed(&self, path: &str, token: &str) -> Response<Body> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: &serde_json::Value,
        token: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> Response<Body> {
        self.send_json(Method::POST, path, body, None).await
    }

    pub async fn post_json_authed(
        &self,
        path: &str,
        body: &serde_json::Value,
        token: &str,
    ) -> Response<Body> {
        self.send_json(Method::POST, path, body, Some(token)).await
    }

    pub async fn delete(&self, path: &str) -> Response<Body> {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// Decode a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as a string.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Sign up a fresh user and return their bearer token.
pub async fn sign_up(app: &TestApp, email: &str) -> String {
    let response = app
        .post_json(
            "/api/auth/sign-up/email",
            &serde_json::json!({
                "name": "Test User",
                "email": email,
                "password": "correct-horse-battery",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    json["token"].as_str().expect("sign-up token").to_string()
}

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::FixedOffset;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use contactdesk::config::{Config, DisplayZone};
use contactdesk::models::{NewSubmission, Submission};
use contactdesk::store::{MemoryStore, PgStore, SharedStore, SubmissionStore};

pub const ADMIN_TOKEN: &str = "test-admin-token-long-enough";

/// A running test server instance backed by an in-process store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub store: SharedStore,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Store a record directly, bypassing the contact form.
    pub async fn seed(&self, name: &str, email: &str, subject: &str, message: &str, timestamp: i64) -> Submission {
        self.store
            .push(NewSubmission {
                name: name.to_string(),
                email: email.to_string(),
                subject: subject.to_string(),
                message: message.to_string(),
                timestamp,
            })
            .await
            .expect("seed push failed")
    }

    /// Post the contact form as JSON, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/v1/contact"))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Post the contact form urlencoded, return (body, status).
    pub async fn submit_form(&self, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/v1/contact"))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit a valid contact form with the given name and email.
    pub async fn submit_valid(&self, name: &str, email: &str, subject: &str) -> Value {
        let (body, status) = self
            .submit_json(&json!({
                "name": name,
                "email": email,
                "subject": subject,
                "message": "Hello there, this is a message.",
            }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "submit failed: {body}");
        body
    }

    /// Make an authenticated GET request.
    pub async fn get_auth(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(ADMIN_TOKEN)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated POST request with JSON body.
    pub async fn post_auth(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(ADMIN_TOKEN)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated DELETE request.
    pub async fn delete_auth(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .bearer_auth(ADMIN_TOKEN)
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        admin_token: ADMIN_TOKEN.to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 65_536,
        trusted_proxies: vec![],
        rate_limit: 100,
        rate_limit_window_secs: 60,
        zone: DisplayZone::Fixed(FixedOffset::east_opt(0).unwrap()),
        cors_origins: vec!["*".to_string()],
        log_level: "warn".to_string(),
    }
}

/// Spawn a test app with an empty store and the default test config.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config()).await
}

pub async fn spawn_app_with(config: Config) -> TestApp {
    spawn_app_on(Arc::new(MemoryStore::new()), config).await
}

/// Spawn a test app backed by PostgreSQL in a fresh database. Returns `None`
/// when `DATABASE_URL` is not set.
pub async fn spawn_pg_app() -> Option<(TestApp, PgPool)> {
    let pool = test_db().await?;
    let store = PgStore::connect(pool.clone())
        .await
        .expect("Failed to start Postgres store");
    let app = spawn_app_on(store, test_config()).await;
    Some((app, pool))
}

/// Create a uniquely named database with migrations applied. Returns `None`
/// when `DATABASE_URL` is not set.
pub async fn test_db() -> Option<PgPool> {
    let _ = dotenvy::dotenv();
    let base_url = std::env::var("DATABASE_URL").ok()?;

    let db_name = format!("contactdesk_test_{}", Uuid::now_v7().simple());

    // Connect to default postgres DB to create test DB
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    Some(pool)
}

pub async fn spawn_app_on(store: SharedStore, config: Config) -> TestApp {
    let (app, _state) = contactdesk::build_app(store.clone(), config);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        store,
        client,
    }
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

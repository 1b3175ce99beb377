//! Test helpers: build AppState and router for integration tests.
//!
//! The router is the production one; only the backends differ. Documents live in
//! `MemoryDocumentStore`, media in a temp dir behind `RecordingMediaStore`, and
//! payments go through `FakePaymentGateway`.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;

use axum_test::TestServer;
use mindclub_api::constants;
use mindclub_api::setup::{routes, services};
use mindclub_api::state::AppState;
use mindclub_core::{AppConfig, Config};
use mindclub_db::MemoryDocumentStore;
use mindclub_services::testing::{FakePaymentGateway, RecordingMediaStore};
use mindclub_services::PaymentGateway;
use mindclub_storage::LocalStorage;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const TEST_ADMIN_KEY: &str = "test-admin-registration-key";
pub const TEST_PAYMENT_SECRET: &str = "test-razorpay-secret";

/// API path for tests (e.g. `/api/workshops`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus handles on the injected backends.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub media: Arc<RecordingMediaStore>,
    pub gateway: Arc<FakePaymentGateway>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

fn test_config(storage_path: &str) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("ENVIRONMENT", "test".to_string()),
        ("JWT_SECRET", TEST_JWT_SECRET.to_string()),
        ("DATABASE_URL", "postgres://unused@localhost/mindclub".to_string()),
        ("MEDIA_STORAGE_BACKEND", "local".to_string()),
        ("LOCAL_STORAGE_PATH", storage_path.to_string()),
        ("LOCAL_STORAGE_BASE_URL", "http://localhost:3000/media".to_string()),
        ("ADMIN_REGISTRATION_KEY", TEST_ADMIN_KEY.to_string()),
    ]);
    let app = AppConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("Failed to build test config");
    let config = Config(Box::new(app));
    config.validate().expect("Test config is invalid");
    config
}

/// Setup test app with in-memory documents and temp-dir media.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage_path = temp_dir.path().to_string_lossy().to_string();
    let config = test_config(&storage_path);

    let local = LocalStorage::new(temp_dir.path(), "http://localhost:3000/media".to_string())
        .await
        .expect("Failed to create local storage");
    let media = Arc::new(RecordingMediaStore::new(Arc::new(local)));
    let gateway = Arc::new(FakePaymentGateway::new(TEST_PAYMENT_SECRET));

    let state = services::initialize_services(
        &config,
        Arc::new(MemoryDocumentStore::new()),
        media.clone(),
        Some(gateway.clone() as Arc<dyn PaymentGateway>),
    );
    let router = routes::setup_routes(&config, state.clone()).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        state,
        media,
        gateway,
        _temp_dir: temp_dir,
    }
}

pub mod fixtures;

use axum_test::TestServer;
use network_inventory::{
    auth::AdminTokens, db, routes::routes::app, services::content_store::UploadLayout,
    state::AppState,
};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::{path::Path, sync::Arc};
use tempfile::TempDir;

/// Token accepted as a network administrator in tests.
pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Test application state
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub pool: SqlitePool,
    pub _uploads: TempDir,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Get the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Upload root of the home tenant
    pub fn uploads_dir(&self) -> &Path {
        self._uploads.path()
    }
}

/// Setup a test application with an in-memory content store and an empty
/// upload root.
pub async fn setup_test_app() -> TestApp {
    let uploads = tempfile::tempdir().expect("Failed to create upload root");

    // a single connection keeps the in-memory database alive and shared
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let layout = UploadLayout {
        uploads_dir: uploads.path().to_path_buf(),
        scheme: "https".into(),
        uploads_url_path: "wp-content/uploads".into(),
        home_tenant: 1,
    };
    let state = AppState::new(
        Arc::new(pool.clone()),
        layout,
        "application/pdf",
        AdminTokens::new([ADMIN_TOKEN.to_string()]),
    );

    let server = TestServer::new(app(state.clone())).expect("Failed to create test server");

    TestApp {
        server,
        state,
        pool,
        _uploads: uploads,
    }
}

/// `Authorization` header value for the admin token.
pub fn admin_auth() -> String {
    format!("Bearer {}", ADMIN_TOKEN)
}

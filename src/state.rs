//! Shared handler state, built once at start-up.

use sqlx::SqlitePool;
use std::{path::PathBuf, sync::Arc};

use crate::{
    auth::AdminTokens,
    console::Strings,
    services::{
        content_store::{SqliteContentStore, UploadLayout},
        inventory_service::InventoryService,
        tenant_context::TenantContext,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub inventory: InventoryService,
    /// Pool of the host content store, used for readiness checks.
    pub db: Arc<SqlitePool>,
    pub uploads_dir: PathBuf,
    pub admin_tokens: AdminTokens,
    pub strings: Arc<Strings>,
}

impl AppState {
    /// Wire the SQLite content store, tenant context and inventory service.
    pub fn new(
        db: Arc<SqlitePool>,
        layout: UploadLayout,
        mime_type: impl Into<String>,
        admin_tokens: AdminTokens,
    ) -> Self {
        let uploads_dir = layout.uploads_dir.clone();
        let context = TenantContext::new(layout.home_tenant);
        let store = SqliteContentStore::new(db.clone(), layout);
        let inventory = InventoryService::new(Arc::new(store), context, mime_type);

        Self {
            inventory,
            db,
            uploads_dir,
            admin_tokens,
            strings: Arc::new(Strings::default()),
        }
    }
}

//! Access to the host platform's tenant and attachment data.
//!
//! Every attachment lookup takes the active [`TenantScope`], so a query can
//! only ever see the partition of the tenant that was entered.

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    models::{
        attachment::Attachment,
        tenant::{Tenant, TenantId},
    },
    services::{inventory_service::InventoryResult, tenant_context::TenantScope},
};

/// Record type of stored files in the `posts` table.
pub const ATTACHMENT_POST_TYPE: &str = "attachment";

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Look up a tenant by id.
    async fn find_tenant(&self, id: TenantId) -> InventoryResult<Option<Tenant>>;

    /// All tenants ordered by id, at most `limit` of them.
    async fn list_tenants(&self, limit: u32) -> InventoryResult<Vec<Tenant>>;

    /// Attachments of the scoped tenant whose MIME type equals `mime_type`
    /// case-insensitively, newest upload first.
    async fn attachments_by_mime(
        &self,
        scope: &TenantScope,
        mime_type: &str,
    ) -> InventoryResult<Vec<Attachment>>;

    /// Public URL of an attachment as served by the host.
    fn attachment_url(&self, scope: &TenantScope, attachment: &Attachment) -> String;

    /// Local path of an attachment's file, if the record names one.
    fn attached_file(&self, scope: &TenantScope, attachment: &Attachment) -> Option<PathBuf>;
}

/// Settings that shape how file locations are resolved.
#[derive(Clone, Debug)]
pub struct UploadLayout {
    /// Upload root of the home tenant; other tenants live in `sites/<id>`.
    pub uploads_dir: PathBuf,

    /// URL scheme used when building public links.
    pub scheme: String,

    /// Path of the upload root below a tenant's URL prefix.
    pub uploads_url_path: String,

    /// Tenant whose uploads sit directly in `uploads_dir`.
    pub home_tenant: TenantId,
}

impl UploadLayout {
    fn sites_segment(&self, tenant: TenantId) -> Option<String> {
        (tenant != self.home_tenant).then(|| format!("sites/{}", tenant))
    }

    /// Directory holding the files of `tenant`.
    pub fn tenant_upload_dir(&self, tenant: TenantId) -> PathBuf {
        match self.sites_segment(tenant) {
            Some(segment) => self.uploads_dir.join(segment),
            None => self.uploads_dir.clone(),
        }
    }

    /// Base URL under which the files of `tenant` are served.
    pub fn tenant_upload_url(&self, tenant: &Tenant) -> String {
        let mut url = format!(
            "{}://{}{}",
            self.scheme,
            tenant.domain,
            normalize_url_path(&tenant.path)
        );
        url.push_str(self.uploads_url_path.trim_matches('/'));
        if let Some(segment) = self.sites_segment(tenant.id) {
            url.push('/');
            url.push_str(&segment);
        }
        url
    }
}

/// Content store backed by the host's SQLite tables.
#[derive(Clone)]
pub struct SqliteContentStore {
    pub db: Arc<SqlitePool>,
    pub layout: UploadLayout,
}

impl SqliteContentStore {
    pub fn new(db: Arc<SqlitePool>, layout: UploadLayout) -> Self {
        Self { db, layout }
    }

    /// The record's file location relative to the tenant upload directory.
    fn relative_file(&self, scope: &TenantScope, attachment: &Attachment) -> Option<String> {
        let stored = non_empty(attachment.attached_file.as_deref())?;
        let path = Path::new(stored);
        if !path.is_absolute() {
            return Some(stored.trim_start_matches('/').to_string());
        }
        path.strip_prefix(self.layout.tenant_upload_dir(scope.tenant_id()))
            .ok()
            .map(|rel| rel.to_string_lossy().replace('\\', "/"))
    }
}

#[async_trait]
impl ContentStore for SqliteContentStore {
    async fn find_tenant(&self, id: TenantId) -> InventoryResult<Option<Tenant>> {
        let tenant = sqlx::query_as::<_, Tenant>(
            "SELECT id, name, domain, path FROM tenants WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&*self.db)
        .await?;
        Ok(tenant)
    }

    async fn list_tenants(&self, limit: u32) -> InventoryResult<Vec<Tenant>> {
        let tenants = sqlx::query_as::<_, Tenant>(
            "SELECT id, name, domain, path FROM tenants ORDER BY id ASC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&*self.db)
        .await?;
        Ok(tenants)
    }

    async fn attachments_by_mime(
        &self,
        scope: &TenantScope,
        mime_type: &str,
    ) -> InventoryResult<Vec<Attachment>> {
        let rows = sqlx::query_as::<_, Attachment>(
            "SELECT id, tenant_id, title, mime_type, uploaded_at, attached_file, guid
             FROM posts
             WHERE tenant_id = ? AND post_type = ? AND LOWER(mime_type) = LOWER(?)
             ORDER BY uploaded_at DESC, id DESC",
        )
        .bind(scope.tenant_id())
        .bind(ATTACHMENT_POST_TYPE)
        .bind(mime_type)
        .fetch_all(&*self.db)
        .await?;
        Ok(rows)
    }

    fn attachment_url(&self, scope: &TenantScope, attachment: &Attachment) -> String {
        match self.relative_file(scope, attachment) {
            Some(rel) => format!("{}/{}", self.layout.tenant_upload_url(scope.tenant()), rel),
            None => attachment.guid.clone().unwrap_or_default(),
        }
    }

    fn attached_file(&self, scope: &TenantScope, attachment: &Attachment) -> Option<PathBuf> {
        let stored = non_empty(attachment.attached_file.as_deref())?;
        let path = Path::new(stored);
        if path.is_absolute() {
            Some(path.to_path_buf())
        } else {
            Some(
                self.layout
                    .tenant_upload_dir(scope.tenant_id())
                    .join(stored.trim_start_matches('/')),
            )
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Ensure a tenant path starts and ends with a single `/`.
fn normalize_url_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

//! Scans one tenant at a time for attachments of the
//! target document type and turns them into inventory rows or a CSV export.
//!
//! Each scan enters the tenant's execution context through
//! [`TenantContext::enter`]; the scope guard restores the previous tenant on
//! every exit path. Nothing is cached between calls.

use chrono::{NaiveDate, Utc};
use std::{path::Path, sync::Arc};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

use crate::{
    models::{
        inventory::{ExportRow, InventoryEntry, MISSING_FILE},
        tenant::{Tenant, TenantId},
    },
    services::{
        byte_format::format_bytes_default,
        content_store::ContentStore,
        csv_export,
        tenant_context::TenantContext,
    },
};

/// Upper bound on tenants listed in the admin directory.
pub const TENANT_DIRECTORY_LIMIT: u32 = 999;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("tenant `{0}` not found")]
    TenantNotFound(TenantId),
    #[error("content store unavailable: {0}")]
    Store(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("export is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub type InventoryResult<T> = Result<T, InventoryError>;

/// A rendered export ready to hand to the browser.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub tenant: Tenant,
    pub content: String,
    pub filename: String,
    pub rows: usize,
}

#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn ContentStore>,
    context: TenantContext,
    mime_type: String,
}

impl InventoryService {
    /// Create a service that scans `store` for attachments of `mime_type`.
    pub fn new(
        store: Arc<dyn ContentStore>,
        context: TenantContext,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            store,
            context,
            mime_type: mime_type.into(),
        }
    }

    /// The tenant execution context shared by all scans.
    pub fn context(&self) -> &TenantContext {
        &self.context
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Tenants shown in the admin directory.
    pub async fn tenants(&self) -> InventoryResult<Vec<Tenant>> {
        self.store.list_tenants(TENANT_DIRECTORY_LIMIT).await
    }

    /// Collect the inventory of one tenant, newest upload first.
    ///
    /// Unknown tenants fail before the context is touched. Missing or
    /// unreadable files become sentinel rows rather than errors.
    pub async fn collect(
        &self,
        tenant_id: TenantId,
    ) -> InventoryResult<(Tenant, Vec<InventoryEntry>)> {
        let tenant = self
            .store
            .find_tenant(tenant_id)
            .await?
            .ok_or(InventoryError::TenantNotFound(tenant_id))?;

        let scope = self.context.enter(tenant.clone()).await;
        let attachments = self
            .store
            .attachments_by_mime(&scope, &self.mime_type)
            .await?;

        let mut entries = Vec::with_capacity(attachments.len());
        for attachment in &attachments {
            let url = self.store.attachment_url(&scope, attachment);
            let path = self.store.attached_file(&scope, attachment);

            let existing = match path {
                Some(path) if file_exists(&path).await => Some(path),
                _ => None,
            };

            let entry = match existing {
                None => {
                    debug!(
                        tenant = tenant_id,
                        attachment = attachment.id,
                        "attachment file missing"
                    );
                    InventoryEntry {
                        id: attachment.id,
                        filename: last_segment(&url),
                        url,
                        upload_date: attachment.uploaded_at.clone(),
                        file_size: MISSING_FILE.to_string(),
                        file_size_raw: 0,
                    }
                }
                Some(path) => {
                    let size = file_size(&path).await;
                    InventoryEntry {
                        id: attachment.id,
                        filename: path
                            .file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_else(|| last_segment(&path.to_string_lossy())),
                        url,
                        upload_date: attachment.uploaded_at.clone(),
                        file_size: format_bytes_default(size as i64),
                        file_size_raw: size,
                    }
                }
            };
            entries.push(entry);
        }
        drop(scope);

        info!(
            tenant = tenant_id,
            count = entries.len(),
            mime = %self.mime_type,
            "collected tenant inventory"
        );
        Ok((tenant, entries))
    }

    /// Collect a tenant inventory and encode it as a CSV download named
    /// after the tenant and today's UTC date.
    pub async fn export(&self, tenant_id: TenantId) -> InventoryResult<CsvExport> {
        self.export_on(tenant_id, Utc::now().date_naive()).await
    }

    /// Same as [`export`](Self::export) with an explicit export date.
    pub async fn export_on(
        &self,
        tenant_id: TenantId,
        date: NaiveDate,
    ) -> InventoryResult<CsvExport> {
        let (tenant, entries) = self.collect(tenant_id).await?;
        let rows: Vec<ExportRow> = entries.iter().map(ExportRow::from).collect();

        let content = String::from_utf8(csv_export::encode(&rows)?)?;
        let filename = csv_export::export_filename(&tenant.name, date);

        Ok(CsvExport {
            tenant,
            content,
            filename,
            rows: rows.len(),
        })
    }
}

async fn file_exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// Size in bytes; unreadable files count as empty.
async fn file_size(path: &Path) -> u64 {
    match fs::metadata(path).await {
        Ok(meta) => meta.len(),
        Err(err) => {
            debug!("could not read size of {}: {}", path.display(), err);
            0
        }
    }
}

/// Final path segment of a URL or path, ignoring query and fragment.
fn last_segment(location: &str) -> String {
    let location = location
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches(['/', '\\']);
    location
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string()
}

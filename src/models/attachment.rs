//! Represents an attachment record stored by the host platform.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::tenant::TenantId;

/// A stored file record with its metadata.
///
/// The record describes the file; the bytes live on disk beneath the
/// tenant's upload directory and may be missing.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Attachment {
    /// Record identifier.
    pub id: i64,

    /// Tenant the record belongs to.
    pub tenant_id: TenantId,

    /// Title given at upload time.
    pub title: String,

    /// MIME type as stored (case is not normalized).
    pub mime_type: String,

    /// Upload timestamp exactly as stored by the host.
    pub uploaded_at: String,

    /// File location relative to the tenant upload directory, or absolute.
    pub attached_file: Option<String>,

    /// Stored public URL, used when the file location is unknown.
    pub guid: Option<String>,
}

//! Inventory rows produced by a tenant scan.

use serde::{Deserialize, Serialize};

use super::tenant::TenantId;

/// Size label used when the file behind a record cannot be found on disk.
pub const MISSING_FILE: &str = "Missing file";

/// One row of a tenant inventory.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    /// Identifier of the underlying attachment record.
    pub id: i64,

    /// Final segment of the local path (or of the URL when the file is missing).
    pub filename: String,

    /// Public link to the file.
    pub url: String,

    /// Upload timestamp, passed through unformatted.
    pub upload_date: String,

    /// Human readable size, or [`MISSING_FILE`].
    pub file_size: String,

    /// Size in bytes; `0` when missing or unreadable.
    pub file_size_raw: u64,
}

/// The visible columns of an entry, as written to the export table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportRow {
    pub filename: String,
    pub url: String,
    pub upload_date: String,
    pub file_size: String,
}

impl From<&InventoryEntry> for ExportRow {
    fn from(entry: &InventoryEntry) -> Self {
        Self {
            filename: entry.filename.clone(),
            url: entry.url.clone(),
            upload_date: entry.upload_date.clone(),
            file_size: entry.file_size.clone(),
        }
    }
}

/// Successful answer to a listing request.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListInventoryResponse {
    pub tenant_id: TenantId,
    pub pdfs: Vec<InventoryEntry>,
    pub count: usize,
}

/// Successful answer to an export request.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExportResponse {
    /// CSV text, starting with a byte-order mark.
    pub content: String,
    pub filename: String,
}

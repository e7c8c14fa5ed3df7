//! Represents a tenant (sub-site) of the host network.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Identifier of a tenant as assigned by the host platform.
pub type TenantId = i64;

/// An independently scoped sub-site with its own content partition.
///
/// Tenants are owned by the host platform; this service only reads them.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq, Eq)]
pub struct Tenant {
    /// Positive identifier.
    pub id: TenantId,

    /// Display name shown in the admin console and used for export filenames.
    pub name: String,

    /// Host name the tenant is served from (e.g. "example.org").
    pub domain: String,

    /// URL path prefix of the tenant, always starting and ending with `/`.
    pub path: String,
}

impl Tenant {
    /// Domain and path joined the way the admin console displays them.
    pub fn site_url(&self) -> String {
        format!("{}{}", self.domain, self.path)
    }
}

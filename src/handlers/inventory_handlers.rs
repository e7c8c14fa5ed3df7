//! HTTP handlers for tenant inventories.
//!
//! Each handler checks the caller's capability first, then validates the
//! tenant id, then delegates to `InventoryService`. Collection failures are
//! logged and reported with a generic message.

use crate::{
    auth::RequireNetworkAdmin,
    console::markup::render_admin_page,
    errors::AppError,
    models::{
        inventory::{ExportResponse, ListInventoryResponse},
        tenant::{Tenant, TenantId},
    },
    services::inventory_service::InventoryError,
    state::AppState,
};
use axum::{
    Json,
    body::Bytes,
    extract::State,
    response::Html,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

pub const TENANT_NOT_PROVIDED: &str = "Tenant ID not provided";
pub const INVALID_TENANT_ID: &str = "Invalid tenant ID";
pub const INVALID_TENANT: &str = "Invalid tenant.";
pub const ERROR_LOADING: &str = "Error loading PDFs";
pub const ERROR_GENERATING: &str = "Error generating CSV";

/// Body of list and export requests.
///
/// The id is kept loose so that a missing id and a malformed one can be told
/// apart.
#[derive(Debug, Deserialize)]
pub struct TenantRequest {
    #[serde(default, rename = "tenantId", alias = "tenant_id")]
    pub tenant_id: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct TenantDirectoryResponse {
    pub tenants: Vec<Tenant>,
    pub count: usize,
}

/// `POST /inventory/list`: inventory of one tenant as JSON rows.
pub async fn list_inventory(
    RequireNetworkAdmin(caller): RequireNetworkAdmin,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ListInventoryResponse>, AppError> {
    let tenant_id = tenant_id_from(&body)?;

    let (_, pdfs) = state
        .inventory
        .collect(tenant_id)
        .await
        .map_err(|err| collection_failure(err, ERROR_LOADING))?;

    info!(
        tenant = tenant_id,
        count = pdfs.len(),
        mime = %state.inventory.mime_type(),
        caller = %caller.subject,
        "listed tenant inventory"
    );
    Ok(Json(ListInventoryResponse {
        tenant_id,
        count: pdfs.len(),
        pdfs,
    }))
}

/// `POST /inventory/export`: inventory of one tenant as CSV text.
pub async fn export_inventory(
    RequireNetworkAdmin(caller): RequireNetworkAdmin,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ExportResponse>, AppError> {
    let tenant_id = tenant_id_from(&body)?;

    let export = state
        .inventory
        .export(tenant_id)
        .await
        .map_err(|err| collection_failure(err, ERROR_GENERATING))?;

    info!(
        tenant = export.tenant.id,
        rows = export.rows,
        filename = %export.filename,
        caller = %caller.subject,
        "exported tenant inventory"
    );
    Ok(Json(ExportResponse {
        content: export.content,
        filename: export.filename,
    }))
}

/// `GET /tenants`: tenants available for scanning.
pub async fn list_tenants(
    RequireNetworkAdmin(_caller): RequireNetworkAdmin,
    State(state): State<AppState>,
) -> Result<Json<TenantDirectoryResponse>, AppError> {
    let tenants = state.inventory.tenants().await.map_err(|err| {
        error!("failed to list tenants: {}", err);
        AppError::internal("Error loading sites")
    })?;

    Ok(Json(TenantDirectoryResponse {
        count: tenants.len(),
        tenants,
    }))
}

/// `GET /`: admin page with one collapsible section per tenant.
pub async fn admin_page(
    RequireNetworkAdmin(_caller): RequireNetworkAdmin,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let tenants = state.inventory.tenants().await.map_err(|err| {
        error!("failed to list tenants: {}", err);
        AppError::internal("Error loading sites")
    })?;

    Ok(Html(render_admin_page(&tenants, &state.strings)))
}

/// Extract a positive tenant id from a JSON request body.
///
/// An empty body or a bare `null` means no id was sent at all.
fn tenant_id_from(body: &[u8]) -> Result<TenantId, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::bad_request(TENANT_NOT_PROVIDED));
    }

    let request = match serde_json::from_slice::<Option<TenantRequest>>(body) {
        Ok(Some(request)) => request,
        Ok(None) => return Err(AppError::bad_request(TENANT_NOT_PROVIDED)),
        Err(err) => {
            warn!("rejected inventory request body: {}", err);
            return Err(AppError::bad_request(INVALID_TENANT_ID));
        }
    };

    parse_tenant_id(request.tenant_id)
}

fn parse_tenant_id(raw: Option<Value>) -> Result<TenantId, AppError> {
    let id = match raw {
        None | Some(Value::Null) => return Err(AppError::bad_request(TENANT_NOT_PROVIDED)),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<TenantId>().ok(),
        Some(_) => None,
    };

    match id {
        Some(id) if id > 0 => Ok(id),
        _ => Err(AppError::bad_request(INVALID_TENANT_ID)),
    }
}

fn collection_failure(err: InventoryError, generic: &str) -> AppError {
    match err {
        InventoryError::TenantNotFound(id) => {
            warn!(tenant = id, "inventory requested for unknown tenant");
            AppError::not_found(INVALID_TENANT)
        }
        other => {
            error!("inventory collection failed: {}", other);
            AppError::internal(generic)
        }
    }
}

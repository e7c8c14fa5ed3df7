//! Caller identity and the network-admin capability check.
//!
//! Real authentication belongs to the host platform. At this boundary a
//! bearer token from the configured admin set yields a [`Caller`] holding
//! [`Capability::ManageNetwork`]; handlers demand it through the
//! [`RequireNetworkAdmin`] extractor.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::{collections::HashSet, sync::Arc};
use tracing::{debug, warn};

use crate::errors::AppError;

pub const PERMISSION_DENIED: &str = "Permission denied";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Network-wide administration.
    ManageNetwork,
}

/// The authenticated caller, stored in request extensions.
#[derive(Debug, Clone)]
pub struct Caller {
    pub subject: String,
    pub capabilities: HashSet<Capability>,
}

impl Caller {
    pub fn network_admin(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            capabilities: HashSet::from([Capability::ManageNetwork]),
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Bearer tokens that authenticate network administrators.
#[derive(Debug, Clone, Default)]
pub struct AdminTokens(Arc<HashSet<String>>);

impl AdminTokens {
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        Self(Arc::new(
            tokens
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }
}

/// Middleware attaching a [`Caller`] for requests with a known admin token.
///
/// Requests without a valid token pass through unauthenticated; the
/// capability guard rejects them where it matters.
pub async fn authenticate(
    State(tokens): State<AdminTokens>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    match bearer {
        Some(token) if tokens.contains(token) => {
            request
                .extensions_mut()
                .insert(Caller::network_admin("admin-token"));
        }
        Some(_) => warn!("rejected unknown bearer token"),
        None => debug!("request without bearer token"),
    }

    next.run(request).await
}

/// Guard for handlers that require network-wide administration.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireNetworkAdmin(caller): RequireNetworkAdmin) { ... }
/// ```
pub struct RequireNetworkAdmin(pub Caller);

impl<S> FromRequestParts<S> for RequireNetworkAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = parts
            .extensions
            .get::<Caller>()
            .filter(|caller| caller.can(Capability::ManageNetwork))
            .ok_or_else(|| AppError::forbidden(PERMISSION_DENIED))?;

        Ok(RequireNetworkAdmin(caller.clone()))
    }
}

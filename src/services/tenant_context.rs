//! Process-wide tenant execution context.
//!
//! The host keeps one "current tenant" for the whole process. Switching it is
//! only done through [`TenantContext::enter`], which returns a [`TenantScope`]
//! guard. The guard holds the switch lock for its whole lifetime, so two scans
//! never interleave their switch/restore windows, and restores the previous
//! tenant when dropped, on every exit path.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

use crate::models::tenant::{Tenant, TenantId};

#[derive(Clone, Debug)]
pub struct TenantContext {
    current: Arc<Mutex<TenantId>>,
    switch_lock: Arc<AsyncMutex<()>>,
}

impl TenantContext {
    /// Create a context whose current tenant is `home`.
    pub fn new(home: TenantId) -> Self {
        Self {
            current: Arc::new(Mutex::new(home)),
            switch_lock: Arc::new(AsyncMutex::new(())),
        }
    }

    /// The tenant whose partition is currently active.
    pub fn current(&self) -> TenantId {
        *lock_current(&self.current)
    }

    /// Make `tenant` current until the returned scope is dropped.
    ///
    /// Waits while another scope is alive.
    pub async fn enter(&self, tenant: Tenant) -> TenantScope {
        let permit = self.switch_lock.clone().lock_owned().await;
        let previous = std::mem::replace(&mut *lock_current(&self.current), tenant.id);
        debug!(tenant = tenant.id, previous, "switched tenant context");

        TenantScope {
            tenant,
            previous,
            current: self.current.clone(),
            _permit: permit,
        }
    }
}

/// Guard for an active tenant context.
///
/// Store queries take a `&TenantScope` so the tenant they run against is
/// explicit in the call chain.
#[derive(Debug)]
pub struct TenantScope {
    tenant: Tenant,
    previous: TenantId,
    current: Arc<Mutex<TenantId>>,
    // released after `Drop::drop` has restored `previous`
    _permit: OwnedMutexGuard<()>,
}

impl TenantScope {
    pub fn tenant(&self) -> &Tenant {
        &self.tenant
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant.id
    }
}

impl Drop for TenantScope {
    fn drop(&mut self) {
        *lock_current(&self.current) = self.previous;
        debug!(
            tenant = self.tenant.id,
            restored = self.previous,
            "restored tenant context"
        );
    }
}

// A panic inside a scope must not leave the context unusable.
fn lock_current(current: &Mutex<TenantId>) -> MutexGuard<'_, TenantId> {
    current.lock().unwrap_or_else(PoisonError::into_inner)
}

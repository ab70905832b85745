//! Permission resolution: catalog defaults merged with persisted overrides

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::actor::ActorContext;
use crate::error::{Error, Result};
use crate::permissions::Permissions;
use crate::scope::ScopeLevel;
use crate::store::RoleStore;

/// Read side of the engine. Unknown roles and keys resolve to `false`;
/// only storage failures produce an error.
#[derive(Clone)]
pub struct Resolver {
    store: Arc<RoleStore>,
}

impl Resolver {
    pub fn new(store: Arc<RoleStore>) -> Self {
        Resolver { store }
    }

    pub fn store(&self) -> &RoleStore {
        &self.store
    }

    /// Effective map for `role`, recomputed on every call
    pub fn effective(&self, role: &str) -> Result<Permissions> {
        self.store.effective(role).inspect_err(|e| {
            error!(role, error = %e, "could not resolve role permissions");
        })
    }

    /// Default-deny lookup
    pub fn has(&self, role: &str, key: &str) -> Result<bool> {
        let granted = self.effective(role)?.granted(key);
        debug!(role, key, granted, "permission resolved");
        Ok(granted)
    }

    /// True if any of `keys` is granted
    pub fn has_any<S: AsRef<str>>(&self, role: &str, keys: &[S]) -> Result<bool> {
        let perms = self.effective(role)?;
        Ok(keys.iter().any(|k| perms.granted(k.as_ref())))
    }

    /// Widest view scope granted to `role` on `resource`
    pub fn scope_for(&self, role: &str, resource: &str) -> Result<ScopeLevel> {
        let scope = ScopeLevel::from_permissions(&self.effective(role)?, resource);
        debug!(role, resource, %scope, "scope resolved");
        Ok(scope)
    }

    /// Gate a single action
    pub fn require(&self, actor: &ActorContext, key: &str) -> Result<()> {
        if self.has(&actor.role, key)? {
            return Ok(());
        }
        warn!(actor = %actor.id, role = %actor.role, key, "permission denied");
        Err(Error::InsufficientPermission { role: actor.role.clone(), key: key.into() })
    }

    /// Gate on any of several keys; the denial names them joined by `|`
    pub fn require_any<S: AsRef<str>>(&self, actor: &ActorContext, keys: &[S]) -> Result<()> {
        if self.has_any(&actor.role, keys)? {
            return Ok(());
        }
        let key = keys.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("|");
        warn!(actor = %actor.id, role = %actor.role, key = %key, "permission denied");
        Err(Error::InsufficientPermission { role: actor.role.clone(), key })
    }
}

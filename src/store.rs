//! Role Store: the only mutable permission state
//!
//! `RoleBackend` is the persistence seam. `RoleStore` layers the role
//! contract (seeding, tracked-key updates, system role protection) on top of
//! any backend and consults the injected catalog where the contract needs it.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::constants::{is_system_role, SYSTEM_ROLES};
use crate::error::{poisoned, Error, Result};
use crate::permissions::{Permissions, RoleRecord};

/// Storage primitives for role records. Each call is atomic on its own.
pub trait RoleBackend: Send + Sync {
    fn get(&self, name: &str) -> Result<Option<RoleRecord>>;

    /// All records, sorted by name
    fn list(&self) -> Result<Vec<RoleRecord>>;

    /// Create or fully replace
    fn put(&self, record: &RoleRecord) -> Result<()>;

    /// Insert only if no record with that name exists; returns whether inserted
    fn insert_if_absent(&self, record: &RoleRecord) -> Result<bool>;

    /// Read-modify-write `updates` into an existing record; `None` if absent
    fn merge(&self, name: &str, updates: &Permissions) -> Result<Option<RoleRecord>>;

    /// Move `from`'s record to `to` in one step.
    /// `NotFound` if `from` is absent, `Conflict` if `to` exists.
    fn rename(&self, from: &str, to: &str) -> Result<RoleRecord>;

    /// Returns whether a record was removed
    fn delete(&self, name: &str) -> Result<bool>;
}

/// Non-durable backend for tests and single-process use
#[derive(Debug, Default)]
pub struct MemoryBackend {
    roles: RwLock<BTreeMap<String, Permissions>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoleBackend for MemoryBackend {
    fn get(&self, name: &str) -> Result<Option<RoleRecord>> {
        let roles = self.roles.read().map_err(poisoned)?;
        Ok(roles.get(name).map(|p| RoleRecord::new(name, p.clone())))
    }

    fn list(&self) -> Result<Vec<RoleRecord>> {
        let roles = self.roles.read().map_err(poisoned)?;
        Ok(roles.iter().map(|(n, p)| RoleRecord::new(n.clone(), p.clone())).collect())
    }

    fn put(&self, record: &RoleRecord) -> Result<()> {
        let mut roles = self.roles.write().map_err(poisoned)?;
        roles.insert(record.name.clone(), record.permissions.clone());
        Ok(())
    }

    fn insert_if_absent(&self, record: &RoleRecord) -> Result<bool> {
        let mut roles = self.roles.write().map_err(poisoned)?;
        if roles.contains_key(&record.name) {
            return Ok(false);
        }
        roles.insert(record.name.clone(), record.permissions.clone());
        Ok(true)
    }

    fn merge(&self, name: &str, updates: &Permissions) -> Result<Option<RoleRecord>> {
        let mut roles = self.roles.write().map_err(poisoned)?;
        Ok(roles.get_mut(name).map(|perms| {
            perms.overlay(updates);
            RoleRecord::new(name, perms.clone())
        }))
    }

    fn rename(&self, from: &str, to: &str) -> Result<RoleRecord> {
        let mut roles = self.roles.write().map_err(poisoned)?;
        if roles.contains_key(to) {
            return Err(Error::Conflict(to.into()));
        }
        let perms = roles.remove(from).ok_or_else(|| Error::NotFound(from.into()))?;
        roles.insert(to.to_string(), perms.clone());
        Ok(RoleRecord::new(to, perms))
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let mut roles = self.roles.write().map_err(poisoned)?;
        Ok(roles.remove(name).is_some())
    }
}

/// Persisted role records plus the frozen catalog they override
#[derive(Clone)]
pub struct RoleStore {
    catalog: Arc<Catalog>,
    backend: Arc<dyn RoleBackend>,
}

impl RoleStore {
    pub fn new(catalog: Arc<Catalog>, backend: Arc<dyn RoleBackend>) -> Self {
        RoleStore { catalog, backend }
    }

    pub fn get(&self, role: &str) -> Result<Option<RoleRecord>> {
        self.backend.get(role)
    }

    pub fn list(&self) -> Result<Vec<RoleRecord>> {
        self.backend.list()
    }

    /// A role exists if it is persisted or is a system role
    pub fn exists(&self, role: &str) -> Result<bool> {
        Ok(is_system_role(role) || self.backend.get(role)?.is_some())
    }

    /// Create or fully replace a role's override map (seeding and cloning only)
    pub fn upsert(&self, role: &str, permissions: Permissions) -> Result<()> {
        self.backend.put(&RoleRecord::new(role, permissions))
    }

    /// Insert a record unless the name is taken; returns whether inserted
    pub fn create(&self, role: &str, permissions: Permissions) -> Result<bool> {
        self.backend.insert_if_absent(&RoleRecord::new(role, permissions))
    }

    /// Catalog defaults overlaid by the persisted overrides for `role`
    pub fn effective(&self, role: &str) -> Result<Permissions> {
        let mut perms = self.catalog.defaults(role);
        if let Some(rec) = self.backend.get(role)? {
            perms.overlay(&rec.permissions);
        }
        Ok(perms)
    }

    /// Partial update. Only keys already in the role's effective key set are
    /// applied; anything else is dropped.
    pub fn set_keys(&self, role: &str, updates: &Permissions) -> Result<RoleRecord> {
        let record = match self.backend.get(role)? {
            Some(rec) => rec,
            None if is_system_role(role) => {
                // unseeded system role: materialize it before writing
                self.backend
                    .insert_if_absent(&RoleRecord::new(role, self.catalog.defaults(role)))?;
                self.backend.get(role)?.ok_or_else(|| Error::NotFound(role.into()))?
            }
            None => return Err(Error::NotFound(role.into())),
        };

        let mut tracked = self.catalog.defaults(role);
        tracked.overlay(&record.permissions);

        let mut accepted = Permissions::new();
        for (key, value) in updates.iter() {
            if tracked.contains(key) {
                accepted.insert(key, value);
            } else {
                debug!(role, key, "ignoring untracked permission key");
            }
        }
        if accepted.is_empty() {
            return Ok(record);
        }

        let updated = self
            .backend
            .merge(role, &accepted)?
            .ok_or_else(|| Error::NotFound(role.into()))?;
        info!(role, keys = accepted.len(), "role permissions updated");
        Ok(updated)
    }

    /// Move a custom role's record to a new name
    pub fn rename(&self, from: &str, to: &str) -> Result<RoleRecord> {
        if is_system_role(from) {
            return Err(Error::Protected(from.into()));
        }
        if is_system_role(to) {
            return Err(Error::Protected(to.into()));
        }
        let moved = self.backend.rename(from, to)?;
        info!(from, to, "role renamed");
        Ok(moved)
    }

    /// Delete a custom role
    pub fn remove(&self, role: &str) -> Result<()> {
        if is_system_role(role) {
            return Err(Error::Protected(role.into()));
        }
        if !self.backend.delete(role)? {
            return Err(Error::NotFound(role.into()));
        }
        info!(role, "role deleted");
        Ok(())
    }

    /// Insert every missing system role with its catalog defaults.
    /// Returns the names that were inserted; empty when already seeded.
    pub fn ensure_seeded(&self) -> Result<Vec<String>> {
        let mut seeded = Vec::new();
        for role in SYSTEM_ROLES {
            if self.backend.insert_if_absent(&RoleRecord::new(role, self.catalog.defaults(role)))? {
                seeded.push(role.to_string());
            }
        }
        if seeded.is_empty() {
            debug!("system roles already seeded");
        } else {
            info!(roles = ?seeded, "seeded system roles");
        }
        Ok(seeded)
    }
}

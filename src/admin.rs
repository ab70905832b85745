//! Role administration
//!
//! Callers must already hold an administrative capability (checked through
//! [`Resolver::require`](crate::Resolver::require)); nothing here re-checks it.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::constants::{is_system_role, MAX_ROLE_NAME_LEN, SYSTEM_ROLES};
use crate::error::{Error, Result};
use crate::permissions::Permissions;
use crate::store::RoleStore;

/// A role as shown to administrators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSummary {
    pub name: String,
    pub system: bool,
    pub permissions: Permissions,
}

#[derive(Clone)]
pub struct RoleAdmin {
    store: Arc<RoleStore>,
}

impl RoleAdmin {
    pub fn new(store: Arc<RoleStore>) -> Self {
        RoleAdmin { store }
    }

    /// Every persisted role plus all system roles, sorted by name
    pub fn list_roles(&self) -> Result<Vec<RoleSummary>> {
        let mut names: Vec<String> = self.store.list()?.into_iter().map(|r| r.name).collect();
        names.extend(SYSTEM_ROLES.iter().map(|s| s.to_string()));
        names.sort();
        names.dedup();
        names
            .into_iter()
            .map(|name| {
                Ok(RoleSummary {
                    system: is_system_role(&name),
                    permissions: self.store.effective(&name)?,
                    name,
                })
            })
            .collect()
    }

    pub fn get_role(&self, name: &str) -> Result<RoleSummary> {
        if !self.store.exists(name)? {
            return Err(Error::NotFound(name.into()));
        }
        Ok(RoleSummary {
            name: name.into(),
            system: is_system_role(name),
            permissions: self.store.effective(name)?,
        })
    }

    /// Create `new_name` with a snapshot of `base_name`'s persisted overrides.
    /// Catalog defaults are not merged in.
    pub fn clone_role(&self, new_name: &str, base_name: &str) -> Result<RoleSummary> {
        validate_name(new_name)?;
        if self.store.get(new_name)?.is_some() {
            return Err(Error::Conflict(new_name.into()));
        }
        if is_system_role(new_name) {
            return Err(Error::Protected(new_name.into()));
        }
        let snapshot = match self.store.get(base_name)? {
            Some(rec) => rec.permissions,
            None if is_system_role(base_name) => Permissions::new(),
            None => return Err(Error::NotFound(base_name.into())),
        };
        if !self.store.create(new_name, snapshot)? {
            return Err(Error::Conflict(new_name.into()));
        }
        info!(role = new_name, base = base_name, "role cloned");
        self.get_role(new_name)
    }

    /// Partial update of tracked keys. Values are coerced to booleans.
    pub fn update_role(&self, name: &str, updates: &BTreeMap<String, Value>) -> Result<RoleSummary> {
        let updates: Permissions = updates.iter().map(|(k, v)| (k.clone(), coerce_bool(v))).collect();
        self.store.set_keys(name, &updates)?;
        self.get_role(name)
    }

    pub fn delete_role(&self, name: &str) -> Result<()> {
        self.store.remove(name)
    }

    /// Move a custom role's overrides to a new name
    pub fn rename_role(&self, from: &str, to: &str) -> Result<RoleSummary> {
        if is_system_role(from) {
            return Err(Error::Protected(from.into()));
        }
        validate_name(to)?;
        if is_system_role(to) {
            return Err(Error::Protected(to.into()));
        }
        self.store.rename(from, to)?;
        self.get_role(to)
    }
}

/// Loose boolean coercion for administrative input
pub fn coerce_bool(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on"),
        Value::Null => false,
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed != name
        || name.chars().count() > MAX_ROLE_NAME_LEN
        || name.chars().any(char::is_control)
    {
        return Err(Error::InvalidName(name.into()));
    }
    Ok(())
}

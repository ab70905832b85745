//! Permission maps and the persisted role record
//!
//! `Permissions` is the single in-memory representation of a role's
//! key → boolean map. `RoleRecord::encode`/`decode` is the only place it is
//! converted to and from the stored document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{err, Result};

/// Sparse mapping from permission key to grant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(BTreeMap<String, bool>);

impl Permissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit value for `key`, if any
    #[inline]
    pub fn get(&self, key: &str) -> Option<bool> {
        self.0.get(key).copied()
    }

    /// Default-deny lookup: a missing key is `false`
    #[inline]
    pub fn granted(&self, key: &str) -> bool {
        self.get(key).unwrap_or(false)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: bool) -> Option<bool> {
        self.0.insert(key.into(), value)
    }

    /// Lay `other` over `self`; entries of `other` win on collision
    pub fn overlay(&mut self, other: &Permissions) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), *v);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, bool>> for Permissions {
    fn from(m: BTreeMap<String, bool>) -> Self {
        Permissions(m)
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for Permissions {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Permissions(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<'a> IntoIterator for &'a Permissions {
    type Item = (&'a String, &'a bool);
    type IntoIter = std::collections::btree_map::Iter<'a, String, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Persisted entity: one per role name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub name: String,
    #[serde(default)]
    pub permissions: Permissions,
}

impl RoleRecord {
    pub fn new(name: impl Into<String>, permissions: Permissions) -> Self {
        RoleRecord { name: name.into(), permissions }
    }

    /// Encode to the stored JSON document
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(err)
    }

    /// Decode a stored JSON document. Non-boolean permission values are
    /// rejected rather than coerced.
    pub fn decode(doc: &str) -> Result<Self> {
        serde_json::from_str(doc).map_err(err)
    }
}

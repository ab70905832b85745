//! Record-visibility scopes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::view_key;
use crate::permissions::Permissions;

/// Breadth of records visible for a resource, ordered `None < Own < Team < All`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeLevel {
    None,
    #[serde(rename = "self")]
    Own,
    Team,
    All,
}

impl ScopeLevel {
    /// Scopes that carry a view key, widest first
    pub const VIEWABLE: [ScopeLevel; 3] = [ScopeLevel::All, ScopeLevel::Team, ScopeLevel::Own];

    pub fn as_str(self) -> &'static str {
        match self {
            ScopeLevel::None => "none",
            ScopeLevel::Own => "self",
            ScopeLevel::Team => "team",
            ScopeLevel::All => "all",
        }
    }

    /// Widest granted view flag wins; flags are never combined
    pub fn from_permissions(perms: &Permissions, resource: &str) -> ScopeLevel {
        Self::VIEWABLE
            .into_iter()
            .find(|s| perms.granted(&view_key(resource, s.as_str())))
            .unwrap_or(ScopeLevel::None)
    }
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Compiled-in default permission matrix
//!
//! The catalog is built once and never mutated. Every system role gets an
//! explicit value for every key of every resource, so a role's effective key
//! set always covers the whole matrix.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::constants::{
    action_key, action_names, actions_to_names, view_key, ADD, ALL_ACTIONS, DELETE, EDIT, EXPORT,
    ROLES_MANAGE, ROLE_ADMIN, ROLE_CLIENT, ROLE_EMPLOYEE, ROLE_MANAGER, SETTINGS_MANAGE,
};
use crate::permissions::Permissions;
use crate::scope::ScopeLevel;
use crate::scope::ScopeLevel::{All, None as Deny, Own, Team};

/// Default grant of one role on one resource
#[derive(Debug, Clone, Copy)]
struct Cell {
    view: ScopeLevel,
    actions: u8,
}

const fn c(view: ScopeLevel, actions: u8) -> Cell {
    Cell { view, actions }
}

/// resource, then admin / manager / employee / client
const MATRIX: &[(&str, [Cell; 4])] = &[
    ("employees",  [c(All, ALL_ACTIONS), c(Team, EDIT),             c(Own, 0),          c(Deny, 0)]),
    ("attendance", [c(All, ALL_ACTIONS), c(Team, ADD | EDIT | EXPORT), c(Own, ADD),     c(Deny, 0)]),
    ("leaves",     [c(All, ALL_ACTIONS), c(Team, ADD | EDIT),       c(Own, ADD),        c(Deny, 0)]),
    ("payroll",    [c(All, ALL_ACTIONS), c(Own, 0),                 c(Own, 0),          c(Deny, 0)]),
    ("clients",    [c(All, ALL_ACTIONS), c(All, ADD | EDIT),        c(Deny, 0),         c(Own, EDIT)]),
    ("projects",   [c(All, ALL_ACTIONS), c(Team, ADD | EDIT),       c(Own, 0),          c(Own, 0)]),
    ("tasks",      [c(All, ALL_ACTIONS), c(Team, ADD | EDIT | DELETE), c(Own, ADD | EDIT), c(Own, 0)]),
    ("leads",      [c(All, ALL_ACTIONS), c(Team, ADD | EDIT | EXPORT), c(Own, ADD),     c(Deny, 0)]),
    ("invoices",   [c(All, ALL_ACTIONS), c(Team, 0),                c(Deny, 0),         c(Own, EXPORT)]),
    ("expenses",   [c(All, ALL_ACTIONS), c(Team, ADD | EDIT),       c(Own, ADD),        c(Deny, 0)]),
    ("tickets",    [c(All, ALL_ACTIONS), c(Team, ADD | EDIT),       c(Own, ADD),        c(Own, ADD)]),
    ("notices",    [c(All, ALL_ACTIONS), c(All, ADD),               c(All, 0),          c(Deny, 0)]),
];

/// Capabilities outside the resource matrix: key, admin / manager / employee / client
const STANDALONE: &[(&str, [bool; 4])] = &[
    (ROLES_MANAGE, [true, false, false, false]),
    (SETTINGS_MANAGE, [true, false, false, false]),
];

const ROLE_ORDER: [&str; 4] = [ROLE_ADMIN, ROLE_MANAGER, ROLE_EMPLOYEE, ROLE_CLIENT];

/// Frozen role → permission map used as the fallback of last resort
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    roles: BTreeMap<String, Permissions>,
    resources: Vec<String>,
}

impl Catalog {
    /// Build a catalog from an explicit table
    pub fn new(roles: BTreeMap<String, Permissions>, resources: Vec<String>) -> Self {
        Catalog { roles, resources }
    }

    /// The built-in matrix, built on first use
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: OnceLock<Catalog> = OnceLock::new();
        BUILTIN.get_or_init(build_builtin)
    }

    /// Default map for `role`; empty for unknown roles
    pub fn defaults(&self, role: &str) -> Permissions {
        self.roles.get(role).cloned().unwrap_or_default()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    /// Scoped resources covered by the matrix
    pub fn resources(&self) -> &[String] {
        &self.resources
    }
}

fn build_builtin() -> Catalog {
    let mut roles: BTreeMap<String, Permissions> =
        ROLE_ORDER.iter().map(|r| (r.to_string(), Permissions::new())).collect();

    for (resource, cells) in MATRIX {
        for (role, cell) in ROLE_ORDER.iter().zip(cells) {
            let Some(perms) = roles.get_mut(*role) else { continue };
            for scope in ScopeLevel::VIEWABLE {
                perms.insert(view_key(resource, scope.as_str()), scope == cell.view);
            }
            let granted = actions_to_names(cell.actions);
            for action in action_names() {
                perms.insert(action_key(resource, action), granted.contains(&action));
            }
        }
    }

    for (key, grants) in STANDALONE {
        for (role, granted) in ROLE_ORDER.iter().zip(grants) {
            if let Some(perms) = roles.get_mut(*role) {
                perms.insert(*key, *granted);
            }
        }
    }

    Catalog {
        roles,
        resources: MATRIX.iter().map(|(r, _)| r.to_string()).collect(),
    }
}

//! Role names, permission key parts and action bits

// System roles (seeded at startup, never deletable)
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_EMPLOYEE: &str = "employee";
pub const ROLE_CLIENT: &str = "client";

pub const SYSTEM_ROLES: [&str; 4] = [ROLE_ADMIN, ROLE_MANAGER, ROLE_EMPLOYEE, ROLE_CLIENT];

/// True if the name is reserved for a built-in role
#[inline]
pub fn is_system_role(name: &str) -> bool {
    SYSTEM_ROLES.contains(&name)
}

// Action bits used by the compiled-in matrix
pub const ADD: u8 = 1;
pub const EDIT: u8 = 1 << 1;
pub const DELETE: u8 = 1 << 2;
pub const EXPORT: u8 = 1 << 3;
pub const ALL_ACTIONS: u8 = ADD | EDIT | DELETE | EXPORT;

const ACTIONS: &[(&str, u8)] = &[("add", ADD), ("edit", EDIT), ("delete", DELETE), ("export", EXPORT)];

/// Convert an action mask to a list of action names
pub fn actions_to_names(mask: u8) -> Vec<&'static str> {
    ACTIONS
        .iter()
        .filter(|(_, b)| mask & b == *b)
        .map(|(n, _)| *n)
        .collect()
}

/// All action names, in key order
pub fn action_names() -> impl Iterator<Item = &'static str> {
    ACTIONS.iter().map(|(n, _)| *n)
}

// Standalone capabilities (not tied to a scoped resource)
pub const ROLES_MANAGE: &str = "roles-manage";
pub const SETTINGS_MANAGE: &str = "settings-manage";

/// Maximum role name length accepted by administration
pub const MAX_ROLE_NAME_LEN: usize = 64;

/// `<resource>-view-<scope>`
#[inline]
pub fn view_key(resource: &str, scope: &str) -> String {
    format!("{}-view-{}", resource, scope)
}

/// `<resource>-<action>`
#[inline]
pub fn action_key(resource: &str, action: &str) -> String {
    format!("{}-{}", resource, action)
}

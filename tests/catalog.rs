//! Compiled-in permission matrix

use rolescope::{view_key, Catalog, ScopeLevel, ROLES_MANAGE, SYSTEM_ROLES};

#[test]
fn builtin_covers_every_system_role() {
    let cat = Catalog::builtin();
    for role in SYSTEM_ROLES {
        assert!(cat.has_role(role), "missing {role}");
        assert!(!cat.defaults(role).is_empty());
    }
    assert_eq!(cat.roles().count(), SYSTEM_ROLES.len());
}

#[test]
fn every_resource_defines_three_view_keys() {
    let cat = Catalog::builtin();
    for role in SYSTEM_ROLES {
        let perms = cat.defaults(role);
        for resource in cat.resources() {
            for scope in ["all", "team", "self"] {
                assert!(perms.contains(&view_key(resource, scope)), "{role}: {resource}-view-{scope}");
            }
            let granted = ["all", "team", "self"]
                .iter()
                .filter(|s| perms.granted(&view_key(resource, s)))
                .count();
            assert!(granted <= 1, "{role} has several default view flags on {resource}");
        }
    }
}

#[test]
fn unknown_role_has_empty_defaults() {
    assert!(Catalog::builtin().defaults("auditor").is_empty());
    assert!(!Catalog::builtin().has_role("auditor"));
}

#[test]
fn builtin_defaults_match_role_intent() {
    let cat = Catalog::builtin();
    assert!(cat.defaults("admin").granted(ROLES_MANAGE));
    assert!(!cat.defaults("manager").granted(ROLES_MANAGE));

    assert_eq!(ScopeLevel::from_permissions(&cat.defaults("admin"), "payroll"), ScopeLevel::All);
    assert_eq!(ScopeLevel::from_permissions(&cat.defaults("manager"), "tasks"), ScopeLevel::Team);
    assert_eq!(ScopeLevel::from_permissions(&cat.defaults("employee"), "tasks"), ScopeLevel::Own);
    assert_eq!(ScopeLevel::from_permissions(&cat.defaults("client"), "leads"), ScopeLevel::None);

    let employee = cat.defaults("employee");
    assert!(employee.granted("leads-add"));
    assert!(!employee.granted("tasks-delete"));
    assert_eq!(employee.get("tasks-delete"), Some(false));
}

#[test]
fn defaults_are_copies() {
    let mut perms = Catalog::builtin().defaults("employee");
    perms.insert("leads-add", false);
    assert!(Catalog::builtin().defaults("employee").granted("leads-add"));
}

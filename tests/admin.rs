//! Role administration: clone, update, delete, rename

use std::collections::BTreeMap;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rolescope::{coerce_bool, Catalog, Error, MemoryBackend, RoleAdmin, RoleStore};
use serde_json::{json, Value};

fn admin() -> RoleAdmin {
    let store = RoleStore::new(Arc::new(Catalog::builtin().clone()), Arc::new(MemoryBackend::new()));
    store.ensure_seeded().unwrap();
    RoleAdmin::new(Arc::new(store))
}

fn unseeded() -> RoleAdmin {
    let store = RoleStore::new(Arc::new(Catalog::builtin().clone()), Arc::new(MemoryBackend::new()));
    RoleAdmin::new(Arc::new(store))
}

fn updates(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

#[test]
fn system_roles_cannot_be_deleted() {
    let a = admin();
    for role in ["admin", "manager", "employee", "client"] {
        let err = a.delete_role(role).unwrap_err();
        assert_eq!(err, Error::Protected(role.into()));
        assert_eq!(err.reason_code(), "protected");
    }
    assert!(a.get_role("admin").is_ok());
}

#[test]
fn cloned_role_can_be_deleted() {
    let a = admin();
    a.clone_role("temp-manager", "employee").unwrap();
    a.delete_role("temp-manager").unwrap();
    assert_eq!(a.get_role("temp-manager").unwrap_err(), Error::NotFound("temp-manager".into()));
    assert_eq!(a.delete_role("temp-manager").unwrap_err(), Error::NotFound("temp-manager".into()));
}

#[test]
fn clone_is_an_independent_snapshot() {
    let a = admin();
    let intern = a.clone_role("intern", "employee").unwrap();
    assert!(!intern.system);
    assert!(intern.permissions.granted("leads-add"));

    let intern = a.update_role("intern", &updates(&[("leads-add", json!(false))])).unwrap();
    assert!(!intern.permissions.granted("leads-add"));
    assert!(a.get_role("employee").unwrap().permissions.granted("leads-add"));

    // and the other way round
    a.update_role("employee", &updates(&[("tasks-edit", json!(false))])).unwrap();
    assert!(a.get_role("intern").unwrap().permissions.granted("tasks-edit"));
}

#[test]
fn clone_checks() {
    let a = admin();
    a.clone_role("intern", "employee").unwrap();

    assert_eq!(a.clone_role("intern", "client").unwrap_err(), Error::Conflict("intern".into()));
    assert_eq!(a.clone_role("manager", "employee").unwrap_err(), Error::Conflict("manager".into()));
    assert_eq!(a.clone_role("contractor", "ghost").unwrap_err(), Error::NotFound("ghost".into()));
    assert_eq!(a.clone_role("", "employee").unwrap_err(), Error::InvalidName("".into()));
    assert_eq!(a.clone_role(" padded", "employee").unwrap_err().reason_code(), "invalid_name");
    assert_eq!(a.clone_role(&"r".repeat(65), "employee").unwrap_err().reason_code(), "invalid_name");
    assert!(a.clone_role(&"r".repeat(64), "employee").is_ok());

    // a custom role can serve as a base too
    let sub = a.clone_role("sub-intern", "intern").unwrap();
    assert_eq!(sub.permissions, a.get_role("intern").unwrap().permissions);
}

#[test]
fn clone_into_unseeded_system_name_is_protected() {
    let a = unseeded();
    assert_eq!(a.clone_role("manager", "employee").unwrap_err(), Error::Protected("manager".into()));
}

#[test]
fn clone_of_unseeded_system_role_snapshots_nothing() {
    let a = unseeded();
    let copy = a.clone_role("copy", "employee").unwrap();
    // no persisted overrides and no catalog row of its own
    assert!(copy.permissions.is_empty());
}

#[test]
fn update_coerces_and_ignores_untracked_keys() {
    let a = admin();
    let before = a.get_role("employee").unwrap().permissions;
    let after = a
        .update_role(
            "employee",
            &updates(&[
                ("tasks-delete", json!("yes")),
                ("tasks-add", json!(0)),
                ("leads-edit", json!(" TRUE ")),
                ("made-up-key", json!(true)),
            ]),
        )
        .unwrap()
        .permissions;

    assert!(after.granted("tasks-delete"));
    assert!(!after.granted("tasks-add"));
    assert!(after.granted("leads-edit"));
    assert!(!after.contains("made-up-key"));
    assert_eq!(after.len(), before.len());
}

#[test]
fn update_unknown_role_is_not_found() {
    let a = admin();
    let err = a.update_role("ghost", &updates(&[("tasks-add", json!(true))])).unwrap_err();
    assert_eq!(err, Error::NotFound("ghost".into()));
}

#[test]
fn bool_coercion() {
    for v in [json!(true), json!(1), json!(-2.5), json!("on"), json!("1"), json!("Yes"), json!([0]), json!({"a": 1})] {
        assert!(coerce_bool(&v), "{v} should coerce to true");
    }
    for v in [json!(false), json!(0), json!(0.0), json!("off"), json!("no"), json!(""), json!("2"), json!(null), json!([]), json!({})] {
        assert!(!coerce_bool(&v), "{v} should coerce to false");
    }
}

#[test]
fn rename_moves_overrides() {
    let a = admin();
    a.clone_role("intern", "employee").unwrap();
    a.update_role("intern", &updates(&[("leads-add", json!(false))])).unwrap();

    let renamed = a.rename_role("intern", "apprentice").unwrap();
    assert_eq!(renamed.name, "apprentice");
    assert!(!renamed.permissions.granted("leads-add"));
    assert_eq!(a.get_role("intern").unwrap_err(), Error::NotFound("intern".into()));
}

#[test]
fn rename_checks() {
    let a = admin();
    a.clone_role("intern", "employee").unwrap();
    a.clone_role("trainee", "employee").unwrap();

    assert_eq!(a.rename_role("manager", "boss").unwrap_err(), Error::Protected("manager".into()));
    assert_eq!(a.rename_role("intern", "admin").unwrap_err(), Error::Protected("admin".into()));
    assert_eq!(a.rename_role("intern", "trainee").unwrap_err(), Error::Conflict("trainee".into()));
    assert_eq!(a.rename_role("ghost", "spirit").unwrap_err(), Error::NotFound("ghost".into()));
    assert_eq!(a.rename_role("intern", "bad\nname").unwrap_err().reason_code(), "invalid_name");

    // failed renames leave the source intact
    assert!(a.get_role("intern").is_ok());
}

#[test]
fn list_includes_system_and_custom_roles() {
    let a = unseeded();
    a.clone_role("intern", "employee").unwrap();
    let roles = a.list_roles().unwrap();
    let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["admin", "client", "employee", "intern", "manager"]);

    let admin_role = roles.iter().find(|r| r.name == "admin").unwrap();
    assert!(admin_role.system);
    assert_eq!(admin_role.permissions, Catalog::builtin().defaults("admin"));
    assert!(!roles.iter().find(|r| r.name == "intern").unwrap().system);
}

#[test]
fn summary_serializes_flat() {
    let a = admin();
    a.clone_role("reader", "client").unwrap();
    let summary = a.get_role("reader").unwrap();
    let doc = serde_json::to_value(&summary).unwrap();
    assert_eq!(doc["name"], json!("reader"));
    assert_eq!(doc["system"], json!(false));
    assert!(doc["permissions"].is_object());
    assert_eq!(
        doc["permissions"].as_object().unwrap().len(),
        Catalog::builtin().defaults("client").len()
    );
}

//! Configuration defaults, YAML overrides and engine startup

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rolescope::db::DEFAULT_MAP_SIZE;
use rolescope::{ActorContext, Config, Engine, Filter, ResourceShape};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn defaults() {
    let config = Config::default();
    assert_eq!(config.db_path, PathBuf::from("data/rolescope"));
    assert_eq!(config.map_size, DEFAULT_MAP_SIZE);
    assert_eq!(config.team_roles.iter().collect::<Vec<_>>(), vec!["manager"]);
    assert!(config.resources.get("tasks").is_some());
    assert!(!config.resources.get("payroll").unwrap().supports_team);
}

#[test]
fn yaml_overrides_only_what_it_names() {
    let mut config = Config::default();
    config
        .apply_yaml(
            r#"
team_roles: [manager, lead]
resources:
  - name: widgets
    owner_field: maker
    tenant_field: customer
  - name: tasks
    owner_field: author
    supports_team: false
"#,
        )
        .unwrap();

    assert_eq!(config.db_path, PathBuf::from("data/rolescope"));
    assert_eq!(config.map_size, DEFAULT_MAP_SIZE);
    assert!(config.team_roles.contains("lead"));

    let widgets = config.resources.get("widgets").unwrap();
    assert_eq!(widgets, &ResourceShape::new("widgets").owner("maker").tenant("customer"));
    assert!(widgets.supports_team);

    let tasks = config.resources.get("tasks").unwrap();
    assert_eq!(tasks.owner_field.as_deref(), Some("author"));
    assert_eq!(tasks.assignee_field, None);
    assert!(!tasks.supports_team);

    // untouched shapes keep their builtin declaration
    assert!(config.resources.get("leads").is_some());
}

#[test]
fn yaml_storage_settings() {
    let mut config = Config::default();
    config.apply_yaml("db_path: /var/lib/roles\nmap_size: 1048576\n").unwrap();
    assert_eq!(config.db_path, PathBuf::from("/var/lib/roles"));
    assert_eq!(config.map_size, 1 << 20);
}

#[test]
fn yaml_rejects_bad_documents() {
    let mut config = Config::default();
    assert!(config.apply_yaml("resources:\n  - owner_field: x\n").is_err());
    assert!(config.apply_yaml("map_size: lots\n").is_err());
}

#[test]
fn engine_open_seeds_and_persists() {
    let dir = TempDir::new().unwrap();
    let config = Config { db_path: dir.path().join("roles"), ..Config::default() };

    {
        let engine = Engine::open(&config).unwrap();
        assert_eq!(engine.store.list().unwrap().len(), 4);
        engine.admin.clone_role("intern", "employee").unwrap();
        engine.directory.set_managers("E1", &["M".to_string()]).unwrap();
    }

    let engine = Engine::open(&config).unwrap();
    let names: Vec<String> = engine.store.list().unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["admin", "client", "employee", "intern", "manager"]);

    let m = ActorContext::new("M", "manager");
    let f = engine.filter_for(&m, "tasks", Filter::Always).unwrap();
    assert!(f.matches(&json!({"assignedTo": "E1"})));
    assert!(!f.matches(&json!({"assignedTo": "E9"})));
}

//! Reports-to directory and single-level team resolution

use std::collections::BTreeSet;

use rolescope::{team_of, Directory, Error, Lmdb, MemoryDirectory};
use tempfile::TempDir;

fn ids(v: &[&str]) -> BTreeSet<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn owned(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn directories() -> Vec<(Option<TempDir>, Box<dyn Directory>)> {
    let dir = TempDir::new().unwrap();
    let db = Lmdb::open(dir.path(), 1 << 24).unwrap();
    let memory: Box<dyn Directory> = Box::new(MemoryDirectory::new());
    let lmdb: Box<dyn Directory> = Box::new(db);
    vec![(None, memory), (Some(dir), lmdb)]
}

#[test]
fn team_is_self_plus_direct_reports() {
    for (_dir, d) in directories() {
        d.set_managers("e1", &owned(&["m"])).unwrap();
        d.set_managers("e2", &owned(&["m", "m2"])).unwrap();
        d.set_managers("e3", &owned(&["other"])).unwrap();

        assert_eq!(team_of(d.as_ref(), "m").unwrap(), ids(&["m", "e1", "e2"]));
        assert_eq!(team_of(d.as_ref(), "m2").unwrap(), ids(&["m2", "e2"]));
        assert_eq!(team_of(d.as_ref(), "loner").unwrap(), ids(&["loner"]));
    }
}

#[test]
fn team_is_not_transitive() {
    for (_dir, d) in directories() {
        d.set_managers("lead", &owned(&["director"])).unwrap();
        d.set_managers("dev", &owned(&["lead"])).unwrap();
        assert_eq!(team_of(d.as_ref(), "director").unwrap(), ids(&["director", "lead"]));
    }
}

#[test]
fn cycles_do_not_loop() {
    for (_dir, d) in directories() {
        d.set_managers("a", &owned(&["b"])).unwrap();
        d.set_managers("b", &owned(&["a"])).unwrap();
        assert_eq!(team_of(d.as_ref(), "a").unwrap(), ids(&["a", "b"]));
    }
}

#[test]
fn set_managers_replaces_previous_list() {
    for (_dir, d) in directories() {
        d.set_managers("e1", &owned(&["m1", "m2"])).unwrap();
        d.set_managers("e1", &owned(&["m3"])).unwrap();
        assert_eq!(d.managers_of("e1").unwrap(), owned(&["m3"]));
        assert!(d.direct_reports("m1").unwrap().is_empty());
        assert_eq!(d.direct_reports("m3").unwrap(), owned(&["e1"]));

        d.set_managers("e1", &[]).unwrap();
        assert!(d.managers_of("e1").unwrap().is_empty());
    }
}

#[test]
fn self_management_is_ignored() {
    for (_dir, d) in directories() {
        d.set_managers("m", &owned(&["m", "boss"])).unwrap();
        assert_eq!(d.managers_of("m").unwrap(), owned(&["boss"]));
        assert!(d.direct_reports("m").unwrap().is_empty());
    }
}

#[test]
fn remove_actor_clears_both_sides() {
    for (_dir, d) in directories() {
        d.set_managers("e1", &owned(&["m"])).unwrap();
        d.set_managers("m", &owned(&["boss"])).unwrap();
        d.remove_actor("m").unwrap();
        assert!(d.managers_of("e1").unwrap().is_empty());
        assert!(d.direct_reports("boss").unwrap().is_empty());
        assert_eq!(team_of(d.as_ref(), "m").unwrap(), ids(&["m"]));
    }
}

#[test]
fn lmdb_rejects_unusable_ids() {
    let dir = TempDir::new().unwrap();
    let db = Lmdb::open(dir.path(), 1 << 24).unwrap();
    assert!(matches!(db.set_managers("", &owned(&["m"])), Err(Error::InvalidName(_))));
    assert!(matches!(db.set_managers("e1", &owned(&["m\0x"])), Err(Error::InvalidName(_))));
}

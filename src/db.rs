//! LMDB-backed role records and reports-to index

use std::path::Path;

use heed::types::{Str, Unit};
use heed::{Database, Env, EnvOpenOptions, RoTxn, RwTxn};

use crate::error::{err, Error, Result};
use crate::permissions::{Permissions, RoleRecord};
use crate::store::RoleBackend;
use crate::team::Directory;

/// Default LMDB map size (64 MiB)
pub const DEFAULT_MAP_SIZE: usize = 64 << 20;

const SEP: char = '\0';

/// LMDB's compiled-in key limit (`MDB_MAXKEYSIZE`)
const MAX_KEY_SIZE: usize = 511;

/// Names LMDB cannot hold as keys can never be persisted
#[inline]
fn storable(name: &str) -> bool {
    !name.is_empty() && name.len() <= MAX_KEY_SIZE
}

/// Composite key `a\0b`
#[inline]
fn pair(a: &str, b: &str) -> String {
    let mut k = String::with_capacity(a.len() + b.len() + 1);
    k.push_str(a);
    k.push(SEP);
    k.push_str(b);
    k
}

#[inline]
fn prefix(a: &str) -> String {
    let mut k = String::with_capacity(a.len() + 1);
    k.push_str(a);
    k.push(SEP);
    k
}

fn check_id(id: &str) -> Result<()> {
    if id.is_empty() || id.contains(SEP) {
        return Err(Error::InvalidName(id.into()));
    }
    Ok(())
}

/// Bidirectional index: fwd[a\0b] and rev[b\0a] stay in sync
pub struct BiIndex {
    pub fwd: Database<Str, Unit>,
    pub rev: Database<Str, Unit>,
}

impl BiIndex {
    pub fn put(&self, tx: &mut RwTxn, a: &str, b: &str) -> Result<()> {
        self.fwd.put(tx, &pair(a, b), &()).map_err(err)?;
        self.rev.put(tx, &pair(b, a), &()).map_err(err)
    }

    pub fn del(&self, tx: &mut RwTxn, a: &str, b: &str) -> Result<bool> {
        let r = self.fwd.delete(tx, &pair(a, b)).map_err(err)?;
        self.rev.delete(tx, &pair(b, a)).map_err(err)?;
        Ok(r)
    }

    pub fn list_fwd(&self, tx: &RoTxn, a: &str) -> Result<Vec<String>> {
        Self::list_pfx(tx, &self.fwd, a)
    }

    pub fn list_rev(&self, tx: &RoTxn, b: &str) -> Result<Vec<String>> {
        Self::list_pfx(tx, &self.rev, b)
    }

    fn list_pfx(tx: &RoTxn, db: &Database<Str, Unit>, a: &str) -> Result<Vec<String>> {
        let pfx = prefix(a);
        let mut r = Vec::new();
        for item in db.prefix_iter(tx, &pfx).map_err(err)? {
            let (k, ()) = item.map_err(err)?;
            if let Some((_, b)) = k.split_once(SEP) {
                r.push(b.to_string());
            }
        }
        Ok(r)
    }
}

/// All database handles
pub struct Dbs {
    /// role name -> encoded RoleRecord
    pub roles: Database<Str, Str>,
    /// actor\0manager (fwd) and manager\0actor (rev)
    pub reports: BiIndex,
}

/// An open LMDB environment holding role records and the reports-to relation
pub struct Lmdb {
    env: Env,
    dbs: Dbs,
}

impl Lmdb {
    /// Open (creating if needed) the environment at `path`
    pub fn open(path: impl AsRef<Path>, map_size: usize) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path).map_err(err)?;
        // SAFETY: LMDB requires no other process to open this path with different options concurrently.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(3)
                .open(path)
                .map_err(err)?
        };
        let mut tx = env.write_txn().map_err(err)?;
        let dbs = Dbs {
            roles: env.create_database(&mut tx, Some("roles")).map_err(err)?,
            reports: BiIndex {
                fwd: env.create_database(&mut tx, Some("reports_to")).map_err(err)?,
                rev: env.create_database(&mut tx, Some("reports")).map_err(err)?,
            },
        };
        tx.commit().map_err(err)?;
        Ok(Lmdb { env, dbs })
    }

    /// Execute a read-only operation
    #[inline]
    fn read<T, F: FnOnce(&Dbs, &RoTxn) -> Result<T>>(&self, f: F) -> Result<T> {
        let tx = self.env.read_txn().map_err(err)?;
        f(&self.dbs, &tx)
    }

    /// Execute a write in one transaction, committed only if `f` succeeds
    #[inline]
    fn write<T, F: FnOnce(&Dbs, &mut RwTxn) -> Result<T>>(&self, f: F) -> Result<T> {
        let mut tx = self.env.write_txn().map_err(err)?;
        let r = f(&self.dbs, &mut tx)?;
        tx.commit().map_err(err)?;
        Ok(r)
    }
}

fn load(d: &Dbs, tx: &RoTxn, name: &str) -> Result<Option<RoleRecord>> {
    if !storable(name) {
        return Ok(None);
    }
    d.roles.get(tx, name).map_err(err)?.map(RoleRecord::decode).transpose()
}

fn save(d: &Dbs, tx: &mut RwTxn, record: &RoleRecord) -> Result<()> {
    d.roles.put(tx, &record.name, &record.encode()?).map_err(err)
}

impl RoleBackend for Lmdb {
    fn get(&self, name: &str) -> Result<Option<RoleRecord>> {
        self.read(|d, tx| load(d, tx, name))
    }

    fn list(&self) -> Result<Vec<RoleRecord>> {
        self.read(|d, tx| {
            let mut r = Vec::new();
            for item in d.roles.iter(tx).map_err(err)? {
                let (_, doc) = item.map_err(err)?;
                r.push(RoleRecord::decode(doc)?);
            }
            Ok(r)
        })
    }

    fn put(&self, record: &RoleRecord) -> Result<()> {
        self.write(|d, tx| save(d, tx, record))
    }

    fn insert_if_absent(&self, record: &RoleRecord) -> Result<bool> {
        self.write(|d, tx| {
            if d.roles.get(tx, &record.name).map_err(err)?.is_some() {
                return Ok(false);
            }
            save(d, tx, record)?;
            Ok(true)
        })
    }

    fn merge(&self, name: &str, updates: &Permissions) -> Result<Option<RoleRecord>> {
        self.write(|d, tx| {
            let Some(mut rec) = load(d, tx, name)? else {
                return Ok(None);
            };
            rec.permissions.overlay(updates);
            save(d, tx, &rec)?;
            Ok(Some(rec))
        })
    }

    fn rename(&self, from: &str, to: &str) -> Result<RoleRecord> {
        self.write(|d, tx| {
            let rec = load(d, tx, from)?.ok_or_else(|| Error::NotFound(from.into()))?;
            if load(d, tx, to)?.is_some() {
                return Err(Error::Conflict(to.into()));
            }
            let moved = RoleRecord::new(to, rec.permissions);
            save(d, tx, &moved)?;
            d.roles.delete(tx, from).map_err(err)?;
            Ok(moved)
        })
    }

    fn delete(&self, name: &str) -> Result<bool> {
        if !storable(name) {
            return Ok(false);
        }
        self.write(|d, tx| d.roles.delete(tx, name).map_err(err))
    }
}

impl Directory for Lmdb {
    fn direct_reports(&self, manager: &str) -> Result<Vec<String>> {
        self.read(|d, tx| d.reports.list_rev(tx, manager))
    }

    fn managers_of(&self, actor: &str) -> Result<Vec<String>> {
        self.read(|d, tx| d.reports.list_fwd(tx, actor))
    }

    fn set_managers(&self, actor: &str, managers: &[String]) -> Result<()> {
        check_id(actor)?;
        for m in managers {
            check_id(m)?;
        }
        self.write(|d, tx| {
            for old in d.reports.list_fwd(tx, actor)? {
                d.reports.del(tx, actor, &old)?;
            }
            for m in managers.iter().filter(|m| m.as_str() != actor) {
                d.reports.put(tx, actor, m)?;
            }
            Ok(())
        })
    }

    fn remove_actor(&self, actor: &str) -> Result<()> {
        self.write(|d, tx| {
            for m in d.reports.list_fwd(tx, actor)? {
                d.reports.del(tx, actor, &m)?;
            }
            for r in d.reports.list_rev(tx, actor)? {
                d.reports.del(tx, &r, actor)?;
            }
            Ok(())
        })
    }
}

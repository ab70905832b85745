//! Reports-to directory and team resolution

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use tracing::debug;

use crate::error::{poisoned, Result};

/// Source of the single-level "reports to" relation between actors
pub trait Directory: Send + Sync {
    /// Actors whose reports-to list names `manager`
    fn direct_reports(&self, manager: &str) -> Result<Vec<String>>;

    fn managers_of(&self, actor: &str) -> Result<Vec<String>>;

    /// Replace `actor`'s reports-to list
    fn set_managers(&self, actor: &str, managers: &[String]) -> Result<()>;

    /// Drop `actor` from the relation on both sides
    fn remove_actor(&self, actor: &str) -> Result<()>;
}

/// Actor plus direct reports. Computed fresh on every call, one level deep.
pub fn team_of(directory: &dyn Directory, actor_id: &str) -> Result<BTreeSet<String>> {
    let mut team: BTreeSet<String> = directory.direct_reports(actor_id)?.into_iter().collect();
    team.insert(actor_id.to_string());
    debug!(actor = actor_id, size = team.len(), "resolved team");
    Ok(team)
}

/// In-memory directory keyed by actor
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    reports_to: RwLock<BTreeMap<String, BTreeSet<String>>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Directory for MemoryDirectory {
    fn direct_reports(&self, manager: &str) -> Result<Vec<String>> {
        let map = self.reports_to.read().map_err(poisoned)?;
        Ok(map
            .iter()
            .filter(|(actor, managers)| actor.as_str() != manager && managers.contains(manager))
            .map(|(actor, _)| actor.clone())
            .collect())
    }

    fn managers_of(&self, actor: &str) -> Result<Vec<String>> {
        let map = self.reports_to.read().map_err(poisoned)?;
        Ok(map.get(actor).map(|m| m.iter().cloned().collect()).unwrap_or_default())
    }

    fn set_managers(&self, actor: &str, managers: &[String]) -> Result<()> {
        let mut map = self.reports_to.write().map_err(poisoned)?;
        let managers: BTreeSet<String> =
            managers.iter().filter(|m| m.as_str() != actor).cloned().collect();
        if managers.is_empty() {
            map.remove(actor);
        } else {
            map.insert(actor.to_string(), managers);
        }
        Ok(())
    }

    fn remove_actor(&self, actor: &str) -> Result<()> {
        let mut map = self.reports_to.write().map_err(poisoned)?;
        map.remove(actor);
        for managers in map.values_mut() {
            managers.remove(actor);
        }
        map.retain(|_, m| !m.is_empty());
        Ok(())
    }
}

//! Engine configuration sourced from environment variables and an optional YAML file

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::constants::ROLE_MANAGER;
use crate::db::DEFAULT_MAP_SIZE;
use crate::resource::{ResourceRegistry, ResourceShape};

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub map_size: usize,
    /// Roles whose actors can have direct reports
    pub team_roles: BTreeSet<String>,
    pub resources: ResourceRegistry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigOverride {
    db_path: Option<PathBuf>,
    map_size: Option<usize>,
    team_roles: Option<Vec<String>>,
    resources: Vec<ResourceShape>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: PathBuf::from("data/rolescope"),
            map_size: DEFAULT_MAP_SIZE,
            team_roles: BTreeSet::from([ROLE_MANAGER.to_string()]),
            resources: ResourceRegistry::builtin(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        if let Ok(path) = std::env::var("ROLESCOPE_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Ok(size) = std::env::var("ROLESCOPE_MAP_SIZE") {
            config.map_size = size.parse().with_context(|| "parse ROLESCOPE_MAP_SIZE")?;
        }
        if let Ok(roles) = std::env::var("ROLESCOPE_TEAM_ROLES") {
            config.team_roles = parse_list(&roles);
        }
        Ok(config)
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("ROLESCOPE_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read ROLESCOPE_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    /// Apply a YAML override document on top of this config
    pub fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: ConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse rolescope config yaml")?;
        if let Some(value) = override_cfg.db_path {
            self.db_path = value;
        }
        if let Some(value) = override_cfg.map_size {
            self.map_size = value;
        }
        if let Some(value) = override_cfg.team_roles {
            self.team_roles = value.into_iter().collect();
        }
        for shape in override_cfg.resources {
            anyhow::ensure!(!shape.name.is_empty(), "resource shape without a name");
            self.resources.insert(shape);
        }
        Ok(())
    }
}

fn parse_list(s: &str) -> BTreeSet<String> {
    s.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(String::from)
        .collect()
}

//! Wiring of catalog, store, resolver, directory and query builder

use std::sync::Arc;

use tracing::info;

use crate::actor::ActorContext;
use crate::admin::RoleAdmin;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::db::Lmdb;
use crate::error::Result;
use crate::filter::Filter;
use crate::query::QueryBuilder;
use crate::resolver::Resolver;
use crate::store::{MemoryBackend, RoleBackend, RoleStore};
use crate::team::{Directory, MemoryDirectory};

pub struct Engine {
    pub store: Arc<RoleStore>,
    pub resolver: Resolver,
    pub directory: Arc<dyn Directory>,
    pub queries: QueryBuilder,
    pub admin: RoleAdmin,
}

impl Engine {
    /// Open the LMDB environment named by `config` and seed system roles
    pub fn open(config: &Config) -> Result<Self> {
        let db = Arc::new(Lmdb::open(&config.db_path, config.map_size)?);
        info!(path = %config.db_path.display(), "opened role store");
        let engine = Self::with_backends(
            Arc::new(Catalog::builtin().clone()),
            db.clone(),
            db,
            config,
        );
        engine.store.ensure_seeded()?;
        Ok(engine)
    }

    /// Same graph on non-durable backends, seeded
    pub fn in_memory(config: &Config) -> Result<Self> {
        let engine = Self::with_backends(
            Arc::new(Catalog::builtin().clone()),
            Arc::new(MemoryBackend::new()),
            Arc::new(MemoryDirectory::new()),
            config,
        );
        engine.store.ensure_seeded()?;
        Ok(engine)
    }

    pub fn with_backends(
        catalog: Arc<Catalog>,
        backend: Arc<dyn RoleBackend>,
        directory: Arc<dyn Directory>,
        config: &Config,
    ) -> Self {
        let store = Arc::new(RoleStore::new(catalog, backend));
        let resolver = Resolver::new(store.clone());
        let queries = QueryBuilder::new(
            resolver.clone(),
            directory.clone(),
            Arc::new(config.resources.clone()),
            config.team_roles.clone(),
        );
        Engine { admin: RoleAdmin::new(store.clone()), store, resolver, directory, queries }
    }

    /// Shorthand for [`QueryBuilder::build_filter`]
    pub fn filter_for(&self, actor: &ActorContext, resource: &str, base: Filter) -> Result<Filter> {
        self.queries.build_filter(actor, resource, base)
    }
}

//! Rolescope - role-based permissions and record-visibility scoping
//!
//! Answers two questions for every protected operation: may this actor
//! perform this action, and which records of a collection may they see.
//!
//! - A compiled-in [`Catalog`] holds default grants per system role.
//! - A [`RoleStore`] persists sparse per-role overrides (LMDB via [`Lmdb`], or
//!   in memory) and is the only mutable state.
//! - The [`Resolver`] merges the two (store wins, missing keys deny) and
//!   derives a [`ScopeLevel`] per resource.
//! - The [`QueryBuilder`] turns a scope into a [`Filter`] over the declared
//!   ownership fields of a [`ResourceShape`].
//!
//! ```
//! use rolescope::{ActorContext, Config, Engine, Filter};
//!
//! let engine = Engine::in_memory(&Config::default()).unwrap();
//! let actor = ActorContext::new("u1", "employee");
//! assert!(engine.resolver.has("employee", "tasks-add").unwrap());
//! let filter = engine.filter_for(&actor, "tasks", Filter::Always).unwrap();
//! assert!(!filter.is_never());
//! ```

pub mod actor;
pub mod admin;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod db;
pub mod engine;
pub mod error;
pub mod filter;
pub mod permissions;
pub mod query;
pub mod resolver;
pub mod resource;
pub mod scope;
pub mod store;
pub mod team;

pub use actor::ActorContext;
pub use admin::{coerce_bool, RoleAdmin, RoleSummary};
pub use catalog::Catalog;
pub use config::Config;
pub use constants::*;
pub use db::Lmdb;
pub use engine::Engine;
pub use error::{Error, Result};
pub use filter::Filter;
pub use permissions::{Permissions, RoleRecord};
pub use query::QueryBuilder;
pub use resolver::Resolver;
pub use resource::{ResourceRegistry, ResourceShape};
pub use scope::ScopeLevel;
pub use store::{MemoryBackend, RoleBackend, RoleStore};
pub use team::{team_of, Directory, MemoryDirectory};

//! Scope query construction
//!
//! Every list/read path goes through [`QueryBuilder::build_filter`]. Resource
//! specifics are only the declared [`ResourceShape`]; there is no per-resource
//! code here.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::actor::ActorContext;
use crate::error::Result;
use crate::filter::Filter;
use crate::resolver::Resolver;
use crate::resource::{ResourceRegistry, ResourceShape};
use crate::scope::ScopeLevel;
use crate::team::{team_of, Directory};

#[derive(Clone)]
pub struct QueryBuilder {
    resolver: Resolver,
    directory: Arc<dyn Directory>,
    shapes: Arc<ResourceRegistry>,
    team_roles: Arc<BTreeSet<String>>,
}

impl QueryBuilder {
    pub fn new(
        resolver: Resolver,
        directory: Arc<dyn Directory>,
        shapes: Arc<ResourceRegistry>,
        team_roles: BTreeSet<String>,
    ) -> Self {
        QueryBuilder { resolver, directory, shapes, team_roles: Arc::new(team_roles) }
    }

    /// Whether `role` may have subordinates
    pub fn is_team_role(&self, role: &str) -> bool {
        self.team_roles.contains(role)
    }

    /// Constrain `base` to the records `actor` may see on `resource`
    pub fn build_filter(&self, actor: &ActorContext, resource: &str, base: Filter) -> Result<Filter> {
        let scope = self.resolver.scope_for(&actor.role, resource)?;
        if scope == ScopeLevel::All {
            return Ok(base);
        }
        if scope == ScopeLevel::None {
            return Ok(Filter::Never);
        }
        let Some(shape) = self.shapes.get(resource) else {
            warn!(resource, "no shape declared for resource; denying");
            return Ok(Filter::Never);
        };

        let scoped = if scope == ScopeLevel::Team
            && shape.supports_team
            && self.is_team_role(&actor.role)
        {
            let team = team_of(self.directory.as_ref(), &actor.id)?;
            team_filter(shape, &team)
        } else {
            self_filter(shape, actor)
        };

        debug!(actor = %actor.id, resource, %scope, "built scope filter");
        Ok(base.and(scoped))
    }
}

/// Any team field holds a team member
fn team_filter(shape: &ResourceShape, team: &BTreeSet<String>) -> Filter {
    Filter::any(
        shape
            .team_candidates()
            .into_iter()
            .map(|f| Filter::is_in(f, team.iter().cloned())),
    )
}

/// Owner or assignee is the actor, or the record belongs to the actor's tenant
fn self_filter(shape: &ResourceShape, actor: &ActorContext) -> Filter {
    let mut parts = Vec::new();
    if let Some(f) = &shape.owner_field {
        parts.push(Filter::equals(f, &actor.id));
    }
    if let (Some(f), Some(tenant)) = (&shape.tenant_field, &actor.tenant_id) {
        parts.push(Filter::equals(f, tenant));
    }
    if let Some(f) = &shape.assignee_field {
        parts.push(Filter::equals(f, &actor.id));
    }
    Filter::any(parts)
}

//! Record shapes: which fields tie a record to an actor or tenant

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ownership fields of one protected resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceShape {
    pub name: String,
    pub owner_field: Option<String>,
    pub assignee_field: Option<String>,
    pub created_by_field: Option<String>,
    pub tenant_field: Option<String>,
    /// Fields matched against the team set. Empty means owner, assignee and
    /// created-by, whichever are declared.
    pub team_fields: Vec<String>,
    pub supports_team: bool,
}

impl Default for ResourceShape {
    fn default() -> Self {
        ResourceShape {
            name: String::new(),
            owner_field: None,
            assignee_field: None,
            created_by_field: None,
            tenant_field: None,
            team_fields: Vec::new(),
            supports_team: true,
        }
    }
}

impl ResourceShape {
    pub fn new(name: impl Into<String>) -> Self {
        ResourceShape { name: name.into(), ..Default::default() }
    }

    pub fn owner(mut self, field: &str) -> Self {
        self.owner_field = Some(field.into());
        self
    }

    pub fn assignee(mut self, field: &str) -> Self {
        self.assignee_field = Some(field.into());
        self
    }

    pub fn created_by(mut self, field: &str) -> Self {
        self.created_by_field = Some(field.into());
        self
    }

    pub fn tenant(mut self, field: &str) -> Self {
        self.tenant_field = Some(field.into());
        self
    }

    pub fn team(mut self, fields: &[&str]) -> Self {
        self.team_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn without_team(mut self) -> Self {
        self.supports_team = false;
        self
    }

    /// Candidate fields for the team disjunction
    pub fn team_candidates(&self) -> Vec<&str> {
        if !self.team_fields.is_empty() {
            return self.team_fields.iter().map(String::as_str).collect();
        }
        let mut fields: Vec<&str> = Vec::new();
        for f in [&self.owner_field, &self.assignee_field, &self.created_by_field]
            .into_iter()
            .flatten()
        {
            if !fields.contains(&f.as_str()) {
                fields.push(f);
            }
        }
        fields
    }
}

/// Declared shapes by resource name
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    shapes: BTreeMap<String, ResourceShape>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shapes for the resources of the built-in catalog
    pub fn builtin() -> Self {
        let mut r = Self::new();
        for shape in [
            ResourceShape::new("employees").owner("_id").team(&["_id", "reportingManager"]),
            ResourceShape::new("attendance").owner("employee"),
            ResourceShape::new("leaves").owner("employee").assignee("approver"),
            ResourceShape::new("payroll").owner("employee").without_team(),
            ResourceShape::new("clients")
                .owner("accountManager")
                .created_by("createdBy")
                .tenant("_id"),
            ResourceShape::new("projects").owner("manager").assignee("members").tenant("client"),
            ResourceShape::new("tasks")
                .owner("createdBy")
                .assignee("assignedTo")
                .created_by("createdBy")
                .tenant("client")
                .team(&["assignedTo", "reportingManager"]),
            ResourceShape::new("leads").owner("owner").assignee("assignedTo").created_by("createdBy"),
            ResourceShape::new("invoices").owner("createdBy").tenant("client"),
            ResourceShape::new("expenses").owner("employee").assignee("approver"),
            ResourceShape::new("tickets").owner("raisedBy").assignee("assignedTo").tenant("client"),
            ResourceShape::new("notices").owner("createdBy"),
        ] {
            r.insert(shape);
        }
        r
    }

    /// Add or replace a shape
    pub fn insert(&mut self, shape: ResourceShape) -> Option<ResourceShape> {
        self.shapes.insert(shape.name.clone(), shape)
    }

    pub fn get(&self, resource: &str) -> Option<&ResourceShape> {
        self.shapes.get(resource)
    }
}

//! The authenticated caller of one request

use serde::{Deserialize, Serialize};

/// Identity produced by the authentication layer; read-only here
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    pub id: String,
    pub role: String,
    /// Tenant record this actor is bound to (client-style actors)
    #[serde(default)]
    pub tenant_id: Option<String>,
}

impl ActorContext {
    pub fn new(id: impl Into<String>, role: impl Into<String>) -> Self {
        ActorContext { id: id.into(), role: role.into(), tenant_id: None }
    }

    pub fn bound_to(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }
}

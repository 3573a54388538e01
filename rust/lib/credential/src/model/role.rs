use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// A weighted, named permission set.
///
/// Roles are owned by the persistence layer and read-only here. Higher
/// weight means more privilege; weight also orders roles by priority.
///
/// Example:
///   id = "r_editor"
///   weight = 50
///   name = "Editor"
///   perms = ["record:read", "record:edit", "theme:read"]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Opaque unique identifier.
    pub id: String,

    /// Privilege weight. Higher is more privileged.
    pub weight: i64,

    /// Human-readable label, unique within a deployment.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Permission identifiers. Order and duplicates carry no meaning.
    #[serde(default)]
    pub perms: Vec<String>,
}

impl Role {
    pub fn new(id: impl Into<String>, name: impl Into<String>, weight: i64) -> Self {
        Self {
            id: id.into(),
            weight,
            name: name.into(),
            description: None,
            perms: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_perms<I, S>(mut self, perms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.perms.extend(perms.into_iter().map(Into::into));
        self
    }

    /// Whether this role grants `permission` (exact match).
    pub fn has_permission(&self, permission: &str) -> bool {
        self.perms.iter().any(|p| p == permission)
    }

    /// Deduplicated, sorted view of the permissions.
    pub fn permission_set(&self) -> BTreeSet<&str> {
        self.perms.iter().map(String::as_str).collect()
    }
}

/// Input for creating a new role, as submitted to the admin collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRole {
    pub name: String,
    #[serde(default)]
    pub weight: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub perms: Vec<String>,
}

impl CreateRole {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.name.trim().is_empty() {
            return Err(AuthError::Validation("role name cannot be empty".into()));
        }
        if self.perms.iter().any(|p| p.trim().is_empty()) {
            return Err(AuthError::Validation(
                "role permissions cannot be empty strings".into(),
            ));
        }
        Ok(())
    }

    /// Build the role under an id assigned by the persistence layer.
    /// Duplicate permissions are dropped; first occurrence order is kept.
    pub fn into_role(self, id: impl Into<String>) -> Role {
        let mut seen = BTreeSet::new();
        let perms = self
            .perms
            .into_iter()
            .filter(|p| seen.insert(p.clone()))
            .collect();
        Role {
            id: id.into(),
            weight: self.weight,
            name: self.name,
            description: self.description,
            perms,
        }
    }
}

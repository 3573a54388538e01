//! Role-based authorization over a principal's resolved roles.
//!
//! A denial is a normal `false`, not an error. Turning it into a 403,
//! redirect or logout is the request layer's job.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;
use crate::model::Role;

/// Supplies the roles bound to a principal. Implemented by the role
/// persistence layer; roles are returned by value and never mutated here.
pub trait RoleSource: Send + Sync {
    fn roles_for(&self, principal: &str) -> Result<Vec<Role>, AuthError>;
}

/// What a protected operation demands.
///
/// Deserializes from `{"role": "Admin"}`, `{"any_role": ["Admin", "Editor"]}`,
/// `{"min_weight": 50}` or `{"permission": "record:edit"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// A role with exactly this name.
    Role(String),
    /// A role whose name is any of these. An empty list is never satisfied.
    AnyRole(Vec<String>),
    /// The highest held weight must be at least this.
    MinWeight(i64),
    /// Some held role grants this permission.
    Permission(String),
}

/// Result of a requirement check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub allowed: bool,
    /// Id of the role that satisfied the requirement, if allowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_role: Option<String>,
}

impl CheckResult {
    fn from_match(role: Option<&Role>) -> Self {
        Self {
            allowed: role.is_some(),
            matched_role: role.map(|r| r.id.clone()),
        }
    }
}

/// Stateless permission and role checks.
pub struct RoleAuthorizer;

impl RoleAuthorizer {
    /// True iff any role grants `permission`.
    pub fn has_permission(roles: &[Role], permission: &str) -> bool {
        roles.iter().any(|r| r.has_permission(permission))
    }

    /// True iff the held roles meet `requirement`.
    pub fn satisfies_requirement(roles: &[Role], requirement: &Requirement) -> bool {
        Self::check(roles, requirement).allowed
    }

    /// Evaluate `requirement`, reporting the satisfying role. When several
    /// roles qualify, the highest-priority one is reported.
    pub fn check(roles: &[Role], requirement: &Requirement) -> CheckResult {
        let by_priority = Self::by_priority(roles);
        let matched = match requirement {
            Requirement::Role(name) => by_priority.into_iter().find(|r| &r.name == name),
            Requirement::AnyRole(names) => by_priority
                .into_iter()
                .find(|r| names.iter().any(|n| n == &r.name)),
            Requirement::MinWeight(threshold) => by_priority
                .into_iter()
                .next()
                .filter(|r| r.weight >= *threshold),
            Requirement::Permission(perm) => {
                by_priority.into_iter().find(|r| r.has_permission(perm))
            }
        };
        CheckResult::from_match(matched)
    }

    /// Highest weight held, or `None` for an empty role set.
    pub fn max_weight(roles: &[Role]) -> Option<i64> {
        roles.iter().map(|r| r.weight).max()
    }

    /// Roles ordered by descending weight; equal weights by name.
    pub fn by_priority(roles: &[Role]) -> Vec<&Role> {
        let mut sorted: Vec<&Role> = roles.iter().collect();
        sorted.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.name.cmp(&b.name)));
        sorted
    }

    /// Union of all permissions granted by `roles`.
    pub fn permissions(roles: &[Role]) -> BTreeSet<String> {
        roles.iter().flat_map(|r| r.perms.iter().cloned()).collect()
    }

    /// Resolve `principal`'s roles through `source` and check `requirement`.
    pub fn authorize(
        source: &dyn RoleSource,
        principal: &str,
        requirement: &Requirement,
    ) -> Result<bool, AuthError> {
        let roles = source.roles_for(principal)?;
        let result = Self::check(&roles, requirement);
        debug!(
            principal,
            allowed = result.allowed,
            matched_role = result.matched_role.as_deref().unwrap_or("-"),
            "authorization check"
        );
        Ok(result.allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn admin() -> Role {
        Role::new("r_admin", "Admin", 100).with_perms(["record:edit", "record:delete", "user:invite"])
    }

    fn editor() -> Role {
        Role::new("r_editor", "Editor", 50).with_perms(["record:edit", "record:read"])
    }

    fn viewer() -> Role {
        Role::new("r_viewer", "Viewer", 10).with_perms(["record:read"])
    }

    #[test]
    fn test_has_permission() {
        let r = vec![Role::new("r", "R", 1).with_perms(["edit"])];
        assert!(RoleAuthorizer::has_permission(&r, "edit"));

        let r = vec![Role::new("r", "R", 1).with_perms(["view"])];
        assert!(!RoleAuthorizer::has_permission(&r, "edit"));

        assert!(!RoleAuthorizer::has_permission(&[], "edit"));
        assert!(RoleAuthorizer::has_permission(&[viewer(), editor()], "record:edit"));
    }

    #[test]
    fn test_min_weight() {
        let heavy = vec![Role::new("r", "R", 10)];
        let light = vec![Role::new("r", "R", 3)];
        assert!(RoleAuthorizer::satisfies_requirement(&heavy, &Requirement::MinWeight(5)));
        assert!(!RoleAuthorizer::satisfies_requirement(&light, &Requirement::MinWeight(5)));
        assert!(RoleAuthorizer::satisfies_requirement(&heavy, &Requirement::MinWeight(10)));
    }

    #[test]
    fn test_min_weight_uses_maximum() {
        let roles = vec![viewer(), admin(), editor()];
        let result = RoleAuthorizer::check(&roles, &Requirement::MinWeight(75));
        assert!(result.allowed);
        assert_eq!(result.matched_role.as_deref(), Some("r_admin"));
    }

    #[test]
    fn test_empty_role_set_denies_everything() {
        for req in [
            Requirement::MinWeight(i64::MIN),
            Requirement::Role("Admin".into()),
            Requirement::AnyRole(vec!["Admin".into()]),
            Requirement::Permission("record:read".into()),
        ] {
            assert!(!RoleAuthorizer::satisfies_requirement(&[], &req));
        }
    }

    #[test]
    fn test_negative_weights() {
        let roles = vec![Role::new("g", "Guest", -5)];
        assert!(RoleAuthorizer::satisfies_requirement(&roles, &Requirement::MinWeight(-10)));
        assert!(!RoleAuthorizer::satisfies_requirement(&roles, &Requirement::MinWeight(0)));
    }

    #[test]
    fn test_role_by_name() {
        let roles = vec![viewer(), editor()];
        assert!(RoleAuthorizer::satisfies_requirement(&roles, &Requirement::Role("Editor".into())));
        assert!(!RoleAuthorizer::satisfies_requirement(&roles, &Requirement::Role("Admin".into())));
        assert!(!RoleAuthorizer::satisfies_requirement(&roles, &Requirement::Role("editor".into())));
    }

    #[test]
    fn test_any_role() {
        let roles = vec![viewer()];
        let req = Requirement::AnyRole(vec!["Admin".into(), "Viewer".into()]);
        let result = RoleAuthorizer::check(&roles, &req);
        assert!(result.allowed);
        assert_eq!(result.matched_role.as_deref(), Some("r_viewer"));

        assert!(!RoleAuthorizer::satisfies_requirement(&roles, &Requirement::AnyRole(vec![])));
        assert!(!RoleAuthorizer::satisfies_requirement(
            &roles,
            &Requirement::AnyRole(vec!["Admin".into(), "Editor".into()])
        ));
    }

    #[test]
    fn test_permission_requirement_reports_highest_priority() {
        let roles = vec![editor(), admin()];
        let result = RoleAuthorizer::check(&roles, &Requirement::Permission("record:edit".into()));
        assert_eq!(result.matched_role.as_deref(), Some("r_admin"));

        let denied = RoleAuthorizer::check(&roles, &Requirement::Permission("theme:publish".into()));
        assert_eq!(denied, CheckResult { allowed: false, matched_role: None });
    }

    #[test]
    fn test_priority_and_helpers() {
        let tie = Role::new("r_author", "Author", 50);
        let roles = vec![viewer(), editor(), admin(), tie];
        let names: Vec<&str> = RoleAuthorizer::by_priority(&roles)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Admin", "Author", "Editor", "Viewer"]);

        assert_eq!(RoleAuthorizer::max_weight(&roles), Some(100));
        assert_eq!(RoleAuthorizer::max_weight(&[]), None);

        let perms = RoleAuthorizer::permissions(&[viewer(), editor()]);
        assert_eq!(
            perms.into_iter().collect::<Vec<_>>(),
            vec!["record:edit".to_string(), "record:read".to_string()]
        );
    }

    #[test]
    fn test_requirement_json() {
        let reqs: Vec<Requirement> = serde_json::from_str(
            r#"[
                {"role": "Admin"},
                {"any_role": ["Admin", "Editor"]},
                {"min_weight": 50},
                {"permission": "record:edit"}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            reqs,
            vec![
                Requirement::Role("Admin".into()),
                Requirement::AnyRole(vec!["Admin".into(), "Editor".into()]),
                Requirement::MinWeight(50),
                Requirement::Permission("record:edit".into()),
            ]
        );
    }

    struct MapSource(HashMap<String, Vec<Role>>);

    impl RoleSource for MapSource {
        fn roles_for(&self, principal: &str) -> Result<Vec<Role>, AuthError> {
            Ok(self.0.get(principal).cloned().unwrap_or_default())
        }
    }

    struct FailingSource;

    impl RoleSource for FailingSource {
        fn roles_for(&self, _principal: &str) -> Result<Vec<Role>, AuthError> {
            Err(AuthError::Storage("role table unavailable".into()))
        }
    }

    #[test]
    fn test_authorize_through_source() {
        let source = MapSource(HashMap::from([("alice".to_string(), vec![editor()])]));
        let req = Requirement::Permission("record:edit".into());
        assert!(RoleAuthorizer::authorize(&source, "alice", &req).unwrap());
        assert!(!RoleAuthorizer::authorize(&source, "mallory", &req).unwrap());
    }

    #[test]
    fn test_authorize_propagates_storage_error() {
        let err = RoleAuthorizer::authorize(&FailingSource, "alice", &Requirement::MinWeight(1))
            .unwrap_err();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}

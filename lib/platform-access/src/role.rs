//! Portal roles and role-derived facts.
//!
//! An account may hold several roles at once. Exactly one of them is the
//! *active* role for a session; see [`crate::resolver`] for how it is chosen.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A role an account can hold in the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Mentored student. Every account holds this role.
    Student,
    /// Lecturer advising one or more students.
    Lecturer,
    /// Portal administrator.
    Admin,
    /// System-assigned examiner; never offered in the role switcher.
    Examiner,
}

impl Role {
    /// All roles in canonical order.
    pub const ALL: [Role; 4] = [Role::Student, Role::Lecturer, Role::Admin, Role::Examiner];

    /// The role an account falls back to when nothing else applies.
    pub const DEFAULT: Role = Role::Student;

    /// Returns the role token used in route declarations and storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Lecturer => "lecturer",
            Self::Admin => "admin",
            Self::Examiner => "examiner",
        }
    }

    /// Returns the route a user lands on after activating this role.
    ///
    /// Examiners have no dashboard of their own and share the student one.
    #[must_use]
    pub fn landing_route(&self) -> &'static str {
        match self {
            Self::Student | Self::Examiner => "/student/dashboard",
            Self::Lecturer => "/lecturer/dashboard",
            Self::Admin => "/admin/dashboard",
        }
    }

    /// Returns true if users may pick this role through the role switcher.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        match self {
            Self::Student | Self::Lecturer | Self::Admin => true,
            Self::Examiner => false,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role token is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError {
    pub token: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.token)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseRoleError {
                token: s.to_string(),
            })
    }
}

/// The set of roles held by an account.
///
/// Roles are kept deduplicated and in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleSet {
    roles: Vec<Role>,
}

impl RoleSet {
    /// Creates an empty role set.
    #[must_use]
    pub fn none() -> Self {
        Self { roles: Vec::new() }
    }

    /// Creates the role set every new account starts with.
    #[must_use]
    pub fn for_new_account() -> Self {
        Self {
            roles: vec![Role::Student],
        }
    }

    /// Creates a role set from any collection of roles.
    #[must_use]
    pub fn from_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut set = Self::none();
        for role in roles {
            set.insert(role);
        }
        set
    }

    /// Adds a role. Returns false if it was already held.
    pub fn insert(&mut self, role: Role) -> bool {
        if self.contains(role) {
            return false;
        }
        self.roles.push(role);
        self.roles
            .sort_by_key(|r| Role::ALL.iter().position(|c| c == r));
        true
    }

    /// Removes a role. Returns false if it was not held.
    pub fn remove(&mut self, role: Role) -> bool {
        let before = self.roles.len();
        self.roles.retain(|r| *r != role);
        self.roles.len() != before
    }

    #[must_use]
    pub fn contains(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns true if at least one of `roles` is held.
    #[must_use]
    pub fn has_any(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.contains(*role))
    }

    /// Returns the held roles a user may switch to.
    #[must_use]
    pub fn selectable(&self) -> Vec<Role> {
        self.roles
            .iter()
            .copied()
            .filter(Role::is_selectable)
            .collect()
    }

    /// Returns the role used when neither session nor persisted state apply.
    ///
    /// This is [`Role::DEFAULT`]; an account that somehow lost the student
    /// role falls back to its first held role instead.
    #[must_use]
    pub fn default_role(&self) -> Role {
        if self.contains(Role::DEFAULT) {
            return Role::DEFAULT;
        }
        self.roles.first().copied().unwrap_or(Role::DEFAULT)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Returns the roles as a slice.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self::from_roles(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn examiner_lands_on_student_dashboard() {
        assert_eq!(
            Role::Examiner.landing_route(),
            Role::Student.landing_route()
        );
        assert_ne!(
            Role::Lecturer.landing_route(),
            Role::Student.landing_route()
        );
    }

    #[test]
    fn examiner_is_not_selectable() {
        assert!(!Role::Examiner.is_selectable());
        assert!(Role::Student.is_selectable());
        assert!(Role::Lecturer.is_selectable());
        assert!(Role::Admin.is_selectable());
    }

    #[test]
    fn parse_role_tokens() {
        assert_eq!("lecturer".parse::<Role>(), Ok(Role::Lecturer));
        assert_eq!(" Admin ".parse::<Role>(), Ok(Role::Admin));
        let err = "dean".parse::<Role>().unwrap_err();
        assert!(err.to_string().contains("dean"));
    }

    #[test]
    fn new_accounts_hold_student() {
        let roles = RoleSet::for_new_account();
        assert!(roles.contains(Role::Student));
        assert_eq!(roles.roles().len(), 1);
    }

    #[test]
    fn role_set_is_deduplicated_and_ordered() {
        let roles = RoleSet::from_roles([Role::Admin, Role::Student, Role::Admin]);
        assert_eq!(roles.roles(), &[Role::Student, Role::Admin]);
    }

    #[test]
    fn has_any_checks_membership() {
        let roles = RoleSet::from_roles([Role::Student, Role::Lecturer]);
        assert!(roles.has_any(&[Role::Admin, Role::Lecturer]));
        assert!(!roles.has_any(&[Role::Admin, Role::Examiner]));
        assert!(!roles.has_any(&[]));
    }

    #[test]
    fn selectable_excludes_examiner() {
        let roles = RoleSet::from_roles([Role::Student, Role::Examiner]);
        assert_eq!(roles.selectable(), vec![Role::Student]);
    }

    #[test]
    fn default_role_prefers_student() {
        let roles = RoleSet::from_roles([Role::Admin, Role::Student]);
        assert_eq!(roles.default_role(), Role::Student);

        let without_student = RoleSet::from_roles([Role::Lecturer]);
        assert_eq!(without_student.default_role(), Role::Lecturer);
    }

    #[test]
    fn remove_role() {
        let mut roles = RoleSet::from_roles([Role::Student, Role::Lecturer]);
        assert!(roles.remove(Role::Lecturer));
        assert!(!roles.remove(Role::Lecturer));
        assert!(!roles.contains(Role::Lecturer));
    }

    #[test]
    fn role_serialization_format() {
        let json = serde_json::to_string(&Role::Lecturer).expect("serialize");
        assert_eq!(json, "\"lecturer\"");
    }
}

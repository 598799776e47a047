//! Route-level role requirements.
//!
//! Routes declare the roles they accept as a list of tokens. Each token may
//! itself name alternatives separated by `|`, so `["student|lecturer", "admin"]`
//! accepts any of the three roles. Declaration order is preserved: when the
//! gate has to switch a user's active role it picks the first declared role
//! the account holds.

use crate::role::Role;

/// Separator between alternative roles inside a single token.
pub const ALTERNATIVE_SEPARATOR: char = '|';

/// The flattened, ordered set of roles a route accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleRequirement {
    roles: Vec<Role>,
}

impl RoleRequirement {
    /// Expands route tokens into a requirement.
    ///
    /// Blank segments are ignored. Unknown role names cannot be held by any
    /// account, so they are dropped (with a warning) rather than failing the
    /// route; a requirement made only of unknown names is empty and therefore
    /// unsatisfiable.
    #[must_use]
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut roles = Vec::new();
        for segment in tokens
            .iter()
            .flat_map(|token| token.as_ref().split(ALTERNATIVE_SEPARATOR))
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
        {
            match segment.parse::<Role>() {
                Ok(role) if !roles.contains(&role) => roles.push(role),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "ignoring unknown role in route requirement"),
            }
        }
        Self { roles }
    }

    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Returns true if nothing can satisfy this requirement.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_token() {
        let req = RoleRequirement::parse(&["lecturer"]);
        assert_eq!(req.roles(), &[Role::Lecturer]);
    }

    #[test]
    fn alternatives_within_and_across_tokens() {
        let req = RoleRequirement::parse(&["student|lecturer", "admin"]);
        assert_eq!(req.roles(), &[Role::Student, Role::Lecturer, Role::Admin]);
    }

    #[test]
    fn declaration_order_is_kept() {
        let req = RoleRequirement::parse(&["admin|student"]);
        assert_eq!(req.roles(), &[Role::Admin, Role::Student]);
    }

    #[test]
    fn duplicates_and_blanks_are_dropped() {
        let req = RoleRequirement::parse(&[" lecturer | |lecturer", "", "student"]);
        assert_eq!(req.roles(), &[Role::Lecturer, Role::Student]);
    }

    #[test]
    fn unknown_roles_are_ignored() {
        let req = RoleRequirement::parse(&["dean|student"]);
        assert_eq!(req.roles(), &[Role::Student]);

        let unsatisfiable = RoleRequirement::parse(&["dean"]);
        assert!(unsatisfiable.is_empty());
    }

    #[test]
    fn empty_declaration_is_empty() {
        let tokens: [&str; 0] = [];
        assert!(RoleRequirement::parse(&tokens).is_empty());
    }
}

//! Role resolution and role enforcement for mentor-portal.
//!
//! An account can hold several roles at once (student, lecturer, admin,
//! examiner) but every request runs under exactly one *active role*. This
//! crate decides which one:
//!
//! - [`resolver::resolve`] is the pure reconciliation of session role,
//!   persisted role, and route requirement.
//! - [`ActiveRoleService`] applies it against the session and account
//!   stores: [`ActiveRoleService::enforce`] for guarded routes,
//!   [`ActiveRoleService::switch_role`] for explicit switches, and
//!   [`ActiveRoleService::enter`] for portal entry.
//!
//! # Example
//!
//! ```
//! use mentor_portal_platform_access::{resolve, Role, RoleSet};
//!
//! let held = RoleSet::from_roles([Role::Student, Role::Lecturer]);
//!
//! // A lecturer session visiting a student-only route is switched to student.
//! let resolution = resolve(&held, Some(Role::Lecturer), Some(Role::Lecturer), Some(&[Role::Student][..]))
//!     .expect("student is held");
//! assert_eq!(resolution.role, Role::Student);
//! assert!(resolution.changed);
//! ```

pub mod account;
pub mod auth;
pub mod entry;
pub mod error;
pub mod gate;
pub mod memory;
pub mod requirement;
pub mod resolver;
pub mod role;
pub mod service;
pub mod session;
pub mod store;
pub mod switch;

pub use account::Account;
pub use auth::{ActiveRole, Principal, RoleOverview};
pub use error::{AccessError, StoreError};
pub use requirement::RoleRequirement;
pub use resolver::{resolve, Resolution};
pub use role::{ParseRoleError, Role, RoleSet};
pub use service::ActiveRoleService;
pub use session::{Session, SessionId};
pub use store::{SessionStore, UserRoleDirectory};

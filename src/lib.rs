//! casegate - permission catalog and session authorization for the fraud-case dashboard
//!
//! Permission names are `module.resource.action` strings built from closed
//! enums. At login a user's roles are consolidated into one deduplicated
//! permission set, which answers `has_permission` and `has_role` until the
//! next auth event replaces it.
//!
//! ```
//! use casegate::{consolidate, Permission, PermissionSet, Role};
//!
//! let roles = vec![
//!     Role::new(1, "Analyst", vec![Permission::new(1, "a.b.view")]),
//!     Role::new(2, "Supervisor", vec![Permission::new(1, "a.b.view"), Permission::new(2, "a.b.edit")]),
//! ];
//! assert_eq!(consolidate(Some(&roles[..])).len(), 2);
//!
//! let grants = PermissionSet::from_roles(Some(&roles[..]));
//! assert!(grants.has_role("Analyst"));
//! assert!(grants.has_permission("a.b.edit"));
//! ```

pub mod auth;
pub mod catalog;
pub mod config;
pub mod consolidate;
pub mod constants;
pub mod error;
pub mod model;
pub mod session;
pub mod telemetry;

#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "server")]
pub mod server;

pub use auth::{AuthBackend, Authenticator};
pub use catalog::{
    all_permissions, build_checked, build_name, build_names, bundle_by_key, bundles_for, is_catalogued,
    read_only_permissions, Bundle, PermissionName, BUNDLES,
};
pub use config::{Command, Config};
pub use consolidate::{consolidate, PermissionSet};
pub use constants::{Action, Module, Resource, SEPARATOR};
pub use error::{Error, Result};
pub use model::{AuthPayload, Credentials, LoggedUser, Permission, Role, RolePermissionsUpdate};
pub use session::{Outcome, Session, SessionState, SessionStore, Ticket};

#[cfg(feature = "client")]
pub use client::HttpAuthBackend;

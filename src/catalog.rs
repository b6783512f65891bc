//! Permission catalog
//!
//! Builds canonical permission names from the closed enumerations and keeps a
//! static registry of the names that exist, grouped into bundles per
//! (module, resource) pair.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::constants::{Action, Module, Resource, SEPARATOR};
use crate::error::{Error, Result};

use Action::*;
use Module::*;

// ============================================================================
// Name Building
// ============================================================================

/// Build the canonical `module.resource.action` name.
///
/// Total: any combination is accepted, including a resource that belongs to
/// another module. Use [`build_checked`] to reject those.
pub fn build_name(module: Module, resource: Resource, action: Action) -> String {
    format!("{module}{SEPARATOR}{resource}{SEPARATOR}{action}")
}

/// Build one name per action, in the caller's order. Duplicate actions yield
/// duplicate names.
pub fn build_names(module: Module, resource: Resource, actions: &[Action]) -> Vec<String> {
    actions.iter().map(|&a| build_name(module, resource, a)).collect()
}

/// Like [`build_name`] but fails when `resource` is not owned by `module`.
pub fn build_checked(module: Module, resource: Resource, action: Action) -> Result<String> {
    PermissionName::new(module, resource, action).validate()?;
    Ok(build_name(module, resource, action))
}

// ============================================================================
// Typed Names
// ============================================================================

/// A permission name split into its typed segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PermissionName {
    pub module: Module,
    pub resource: Resource,
    pub action: Action,
}

impl PermissionName {
    pub fn new(module: Module, resource: Resource, action: Action) -> Self {
        Self { module, resource, action }
    }

    /// Parse a canonical name. Checks shape and tokens, not ownership.
    ///
    /// # Example
    /// ```
    /// use casegate::{Action, Module, PermissionName, Resource};
    /// let p = PermissionName::parse("fraud-investigation.cases.view").unwrap();
    /// assert_eq!(p, PermissionName::new(Module::FraudInvestigation, Resource::Cases, Action::View));
    /// ```
    pub fn parse(name: &str) -> Result<Self> {
        let mut parts = name.split(SEPARATOR);
        let (Some(m), Some(r), Some(a), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
            return Err(Error::MalformedName(name.to_string()));
        };
        Ok(Self {
            module: m.parse()?,
            resource: r.parse()?,
            action: a.parse()?,
        })
    }

    /// Check that the resource belongs to the module
    pub fn validate(&self) -> Result<()> {
        if self.module.owns(self.resource) {
            Ok(())
        } else {
            Err(Error::ResourceNotInModule {
                module: self.module.to_string(),
                resource: self.resource.to_string(),
            })
        }
    }
}

impl fmt::Display for PermissionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}{SEPARATOR}{}", self.module, self.resource, self.action)
    }
}

impl FromStr for PermissionName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// ============================================================================
// Bundles
// ============================================================================

/// A named group of permissions on one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bundle {
    pub key: &'static str,
    pub label: &'static str,
    pub module: Module,
    pub resource: Resource,
    pub actions: &'static [Action],
}

impl Bundle {
    pub fn names(&self) -> Vec<String> {
        build_names(self.module, self.resource, self.actions)
    }
}

const fn bundle(
    key: &'static str,
    label: &'static str,
    module: Module,
    resource: Resource,
    actions: &'static [Action],
) -> Bundle {
    Bundle { key, label, module, resource, actions }
}

/// Every bundle the system knows about, grouped by module
pub static BUNDLES: &[Bundle] = &[
    // Fraud investigation
    bundle("cases", "Fraud cases", FraudInvestigation, Resource::Cases, &[View, Create, Update, Delete, Assign, Close]),
    bundle("alerts", "Fraud alerts", FraudInvestigation, Resource::Alerts, &[View, Update, Assign, Close]),
    bundle("transactions", "Transactions", FraudInvestigation, Resource::Transactions, &[View, Export]),
    bundle("evidence", "Case evidence", FraudInvestigation, Resource::Evidence, &[View, Create, Delete]),
    bundle("conciliations", "Conciliations", FraudInvestigation, Resource::Conciliations, &[View, Create, Update, Approve, Export]),
    // Bot automation
    bundle("bots", "Bots", BotAutomation, Resource::Bots, &[View, Create, Update, Delete, Configure]),
    bundle("executions", "Bot executions", BotAutomation, Resource::Executions, &[View, Execute, Export]),
    bundle("schedules", "Bot schedules", BotAutomation, Resource::Schedules, &[View, Create, Update, Delete]),
    // System administration
    bundle("users", "Users", SystemAdministration, Resource::Users, &[View, Create, Update, Delete]),
    bundle("roles", "Roles", SystemAdministration, Resource::Roles, &[View, Create, Update, Delete, Assign]),
    bundle("permissions", "Permissions", SystemAdministration, Resource::Permissions, &[View, Assign]),
    bundle("channels", "Channels", SystemAdministration, Resource::Channels, &[View, Create, Update, Delete]),
    bundle("audit-logs", "Audit logs", SystemAdministration, Resource::AuditLogs, &[View, Export]),
    bundle("settings", "System settings", SystemAdministration, Resource::Settings, &[View, Configure]),
    // Reporting & analytics
    bundle("reports", "Reports", ReportingAnalytics, Resource::Reports, &[View, Create, Export]),
    bundle("dashboards", "Dashboards", ReportingAnalytics, Resource::Dashboards, &[View, Configure]),
    bundle("exports", "Data exports", ReportingAnalytics, Resource::Exports, &[View, Create, Delete]),
];

/// Observation-only routes. Maintained by hand; not derived from [`BUNDLES`].
static READ_ONLY: &[(Module, Resource, Action)] = &[
    (FraudInvestigation, Resource::Cases, View),
    (FraudInvestigation, Resource::Alerts, View),
    (FraudInvestigation, Resource::Transactions, View),
    (FraudInvestigation, Resource::Evidence, View),
    (FraudInvestigation, Resource::Conciliations, View),
    (BotAutomation, Resource::Bots, View),
    (BotAutomation, Resource::Executions, View),
    (BotAutomation, Resource::Schedules, View),
    (SystemAdministration, Resource::AuditLogs, View),
    (ReportingAnalytics, Resource::Reports, View),
    (ReportingAnalytics, Resource::Reports, Export),
    (ReportingAnalytics, Resource::Dashboards, View),
];

/// Look up a bundle by key
pub fn bundle_by_key(key: &str) -> Option<&'static Bundle> {
    BUNDLES.iter().find(|b| b.key == key)
}

/// Bundles belonging to one module, in registry order
pub fn bundles_for(module: Module) -> impl Iterator<Item = &'static Bundle> {
    BUNDLES.iter().filter(move |b| b.module == module)
}

/// Every catalogued name, bundle by bundle. Used for seeding and docs.
pub fn all_permissions() -> Vec<String> {
    BUNDLES.iter().flat_map(Bundle::names).collect()
}

/// Names intended for routes where only observation is allowed
pub fn read_only_permissions() -> Vec<String> {
    READ_ONLY.iter().map(|&(m, r, a)| build_name(m, r, a)).collect()
}

/// True if `name` is one of the catalogued names
pub fn is_catalogued(name: &str) -> bool {
    match PermissionName::parse(name) {
        Ok(p) => BUNDLES
            .iter()
            .any(|b| b.module == p.module && b.resource == p.resource && b.actions.contains(&p.action)),
        Err(_) => false,
    }
}

//! Closed enumerations that make up a permission name
//!
//! Every canonical name is `module.resource.action`, with each segment drawn
//! from one of the enums below. The wire tokens are kebab-case and must stay
//! byte-for-byte stable once a permission has been issued.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Separator between the three segments of a permission name
pub const SEPARATOR: char = '.';

macro_rules! closed_enum {
    ($(#[$meta:meta])* $name:ident, $err:ident { $($variant:ident => $token:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $token)] $variant,)+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Wire token
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    other => Err(Error::$err(other.to_string())),
                }
            }
        }
    };
}

closed_enum!(
    /// Business module, the first segment of a permission name
    Module, UnknownModule {
        FraudInvestigation => "fraud-investigation",
        BotAutomation => "bot-automation",
        SystemAdministration => "system-administration",
        ReportingAnalytics => "reporting-analytics",
    }
);

closed_enum!(
    /// Resource, the second segment of a permission name
    Resource, UnknownResource {
        Cases => "cases",
        Alerts => "alerts",
        Transactions => "transactions",
        Evidence => "evidence",
        Conciliations => "conciliations",
        Bots => "bots",
        Executions => "executions",
        Schedules => "schedules",
        Users => "users",
        Roles => "roles",
        Permissions => "permissions",
        Channels => "channels",
        AuditLogs => "audit-logs",
        Settings => "settings",
        Reports => "reports",
        Dashboards => "dashboards",
        Exports => "exports",
    }
);

closed_enum!(
    /// Action, the last segment of a permission name
    Action, UnknownAction {
        View => "view",
        Create => "create",
        Update => "update",
        Delete => "delete",
        Assign => "assign",
        Close => "close",
        Execute => "execute",
        Export => "export",
        Approve => "approve",
        Configure => "configure",
    }
);

impl Module {
    /// Resources owned by this module
    pub fn resources(self) -> &'static [Resource] {
        use Resource::*;
        match self {
            Module::FraudInvestigation => &[Cases, Alerts, Transactions, Evidence, Conciliations],
            Module::BotAutomation => &[Bots, Executions, Schedules],
            Module::SystemAdministration => &[Users, Roles, Permissions, Channels, AuditLogs, Settings],
            Module::ReportingAnalytics => &[Reports, Dashboards, Exports],
        }
    }

    pub fn owns(self, resource: Resource) -> bool {
        resource.module() == self
    }
}

impl Resource {
    /// The module that owns this resource
    pub fn module(self) -> Module {
        use Resource::*;
        match self {
            Cases | Alerts | Transactions | Evidence | Conciliations => Module::FraudInvestigation,
            Bots | Executions | Schedules => Module::BotAutomation,
            Users | Roles | Permissions | Channels | AuditLogs | Settings => Module::SystemAdministration,
            Reports | Dashboards | Exports => Module::ReportingAnalytics,
        }
    }
}

impl Action {
    /// Actions that never mutate state
    pub fn is_read_only(self) -> bool {
        matches!(self, Action::View | Action::Export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip_through_from_str() {
        for m in Module::ALL {
            assert_eq!(m.as_str().parse::<Module>().unwrap(), *m);
        }
        for r in Resource::ALL {
            assert_eq!(r.as_str().parse::<Resource>().unwrap(), *r);
        }
        for a in Action::ALL {
            assert_eq!(a.as_str().parse::<Action>().unwrap(), *a);
        }
    }

    #[test]
    fn ownership_map_is_consistent() {
        for r in Resource::ALL {
            assert!(r.module().resources().contains(r));
        }
        let total: usize = Module::ALL.iter().map(|m| m.resources().len()).sum();
        assert_eq!(total, Resource::ALL.len());
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert_eq!(
            "Cases".parse::<Resource>(),
            Err(Error::UnknownResource("Cases".into()))
        );
    }
}

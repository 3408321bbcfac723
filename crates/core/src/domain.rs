//! Business domains a request can be routed to.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Business area handled by a dedicated agent.
///
/// `Unknown` is only ever a transient classification result; the router
/// resolves it to one of the routable domains before dispatching.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Sales,
    Finance,
    Inventory,
    Analytics,
    Unknown,
}

impl Domain {
    /// Routable domains, in tie-break order.
    pub const ROUTABLE: [Domain; 4] = [
        Domain::Sales,
        Domain::Finance,
        Domain::Inventory,
        Domain::Analytics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Sales => "sales",
            Domain::Finance => "finance",
            Domain::Inventory => "inventory",
            Domain::Analytics => "analytics",
            Domain::Unknown => "unknown",
        }
    }

    pub fn is_routable(&self) -> bool {
        !matches!(self, Domain::Unknown)
    }

    /// Parse one of the four routable tokens (exact, already normalised).
    pub fn from_token(token: &str) -> Option<Domain> {
        Domain::ROUTABLE.into_iter().find(|d| d.as_str() == token)
    }
}

impl core::fmt::Display for Domain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase();
        if normalised == "unknown" {
            return Ok(Domain::Unknown);
        }
        Domain::from_token(&normalised)
            .ok_or_else(|| DomainError::unknown_value(format!("domain '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(" Inventory ".parse::<Domain>().unwrap(), Domain::Inventory);
        assert_eq!("unknown".parse::<Domain>().unwrap(), Domain::Unknown);
        assert!("general".parse::<Domain>().is_err());
    }

    #[test]
    fn from_token_only_accepts_routable_domains() {
        assert_eq!(Domain::from_token("analytics"), Some(Domain::Analytics));
        assert_eq!(Domain::from_token("unknown"), None);
        assert_eq!(Domain::from_token("Sales"), None);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Domain::Finance).unwrap();
        assert_eq!(json, "\"finance\"");
    }
}

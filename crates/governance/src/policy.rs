//! Phrase tables backing the governance check.

use std::collections::HashMap;

use helios_core::Domain;

const GLOBAL_RISKY_PHRASES: [&str; 9] = [
    "export all",
    "delete all",
    "drop table",
    "truncate",
    "wipe",
    "download financials",
    "mass update",
    "bulk delete",
    "transfer funds",
];

/// Global risky phrases plus a per-domain table of sensitive phrases.
///
/// Phrases are stored lower-cased; matching is a plain substring test against
/// the lower-cased request, with no semantic understanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernancePolicy {
    global: Vec<String>,
    domain_sensitive: HashMap<Domain, Vec<String>>,
}

impl GovernancePolicy {
    pub fn new(global: Vec<String>, domain_sensitive: HashMap<Domain, Vec<String>>) -> Self {
        let lower = |v: Vec<String>| v.into_iter().map(|p| p.to_lowercase()).collect::<Vec<_>>();
        Self {
            global: lower(global),
            domain_sensitive: domain_sensitive
                .into_iter()
                .map(|(d, phrases)| (d, lower(phrases)))
                .collect(),
        }
    }

    pub fn global_phrases(&self) -> &[String] {
        &self.global
    }

    /// Sensitive phrases for a domain (empty for `Unknown` or unlisted domains).
    pub fn domain_phrases(&self, domain: Domain) -> &[String] {
        self.domain_sensitive
            .get(&domain)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for GovernancePolicy {
    fn default() -> Self {
        let owned = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let mut domain_sensitive = HashMap::new();
        domain_sensitive.insert(
            Domain::Finance,
            owned(&["payments", "payout", "transfer", "invoice export"]),
        );
        domain_sensitive.insert(Domain::Inventory, owned(&["adjust all stock", "zero stock"]));
        domain_sensitive.insert(Domain::Sales, owned(&["export customers", "delete leads"]));
        domain_sensitive.insert(Domain::Analytics, owned(&["export report", "download report"]));

        Self::new(owned(&GLOBAL_RISKY_PHRASES), domain_sensitive)
    }
}

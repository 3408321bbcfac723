use serde::{Deserialize, Serialize};

/// Risk classification of a request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::High => "HIGH",
        }
    }
}

impl core::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a governance check.
///
/// `reasons` keeps match order: global phrases first (verbatim), then
/// domain-sensitive phrases (prefixed `domain-sensitive: `).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceDecision {
    pub needs_approval: bool,
    pub risk_level: RiskLevel,
    pub reasons: Vec<String>,
}

impl GovernanceDecision {
    pub fn clear() -> Self {
        Self {
            needs_approval: false,
            risk_level: RiskLevel::Low,
            reasons: Vec::new(),
        }
    }

    pub fn flagged(reasons: Vec<String>) -> Self {
        Self {
            needs_approval: true,
            risk_level: RiskLevel::High,
            reasons,
        }
    }

    /// User-facing notice returned instead of executing a held request.
    pub fn notice(&self) -> String {
        format!(
            "This request is flagged as {} risk and requires approval. Reasons: {}",
            self.risk_level,
            self.reasons.join(", ")
        )
    }
}

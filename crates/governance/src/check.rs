use std::sync::OnceLock;

use helios_core::Domain;

use crate::decision::GovernanceDecision;
use crate::policy::GovernancePolicy;

fn default_policy() -> &'static GovernancePolicy {
    static POLICY: OnceLock<GovernancePolicy> = OnceLock::new();
    POLICY.get_or_init(GovernancePolicy::default)
}

/// Check a request against the default phrase tables.
pub fn check(request_text: &str, domain: Domain) -> GovernanceDecision {
    check_with(default_policy(), request_text, domain)
}

/// Check a request against an explicit policy.
///
/// - No IO
/// - No panics
/// - Deterministic: the same text and domain always yield the same decision
pub fn check_with(
    policy: &GovernancePolicy,
    request_text: &str,
    domain: Domain,
) -> GovernanceDecision {
    let lowered = request_text.to_lowercase();

    let mut reasons: Vec<String> = policy
        .global_phrases()
        .iter()
        .filter(|p| lowered.contains(p.as_str()))
        .cloned()
        .collect();

    for phrase in policy.domain_phrases(domain) {
        if lowered.contains(phrase.as_str()) {
            reasons.push(format!("domain-sensitive: {phrase}"));
        }
    }

    if reasons.is_empty() {
        return GovernanceDecision::clear();
    }

    tracing::debug!(domain = %domain, reasons = ?reasons, "governance flagged request");
    GovernanceDecision::flagged(reasons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::RiskLevel;
    use proptest::prelude::*;

    const SAFE_WORDS: [&str; 14] = [
        "show", "me", "the", "monthly", "sales", "report", "check", "stock", "level", "for",
        "product", "customer", "orders", "invoice",
    ];

    #[test]
    fn export_all_is_flagged_high() {
        let decision = check("export all customer financials", Domain::Sales);
        assert!(decision.needs_approval);
        assert_eq!(decision.risk_level, RiskLevel::High);
        assert_eq!(decision.reasons, vec!["export all".to_string()]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let decision = check("Please DROP TABLE orders", Domain::Analytics);
        assert!(decision.needs_approval);
        assert_eq!(decision.reasons, vec!["drop table".to_string()]);
    }

    #[test]
    fn domain_sensitive_phrases_are_prefixed_after_global_ones() {
        let decision = check("wipe and list pending payments", Domain::Finance);
        assert_eq!(
            decision.reasons,
            vec!["wipe".to_string(), "domain-sensitive: payments".to_string()]
        );
    }

    #[test]
    fn domain_phrases_only_apply_to_their_domain() {
        let text = "show payments received this week";
        assert!(check(text, Domain::Finance).needs_approval);
        assert!(!check(text, Domain::Sales).needs_approval);
        assert!(!check(text, Domain::Unknown).needs_approval);
    }

    #[test]
    fn overlapping_phrases_are_all_reported() {
        // "transfer funds" is global, "transfer" is finance-sensitive.
        let decision = check("transfer funds to vendor", Domain::Finance);
        assert_eq!(
            decision.reasons,
            vec![
                "transfer funds".to_string(),
                "domain-sensitive: transfer".to_string()
            ]
        );
    }

    #[test]
    fn clean_request_is_low_risk() {
        let decision = check("Show me the monthly sales report", Domain::Analytics);
        assert_eq!(decision, GovernanceDecision::clear());
    }

    #[test]
    fn custom_policy_is_honoured() {
        let policy = GovernancePolicy::new(vec!["Purge".to_string()], Default::default());
        assert!(check_with(&policy, "purge the archive", Domain::Sales).needs_approval);
        assert!(!check_with(&policy, "export all", Domain::Sales).needs_approval);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any text containing a global risky phrase is flagged and
        /// the phrase appears verbatim in the reasons.
        #[test]
        fn risky_phrase_is_always_flagged(
            prefix in "[a-z ]{0,24}",
            suffix in "[a-z ]{0,24}",
            idx in 0usize..9,
            domain_idx in 0usize..5,
        ) {
            let policy = GovernancePolicy::default();
            let phrase = policy.global_phrases()[idx].clone();
            let domain = [
                Domain::Sales,
                Domain::Finance,
                Domain::Inventory,
                Domain::Analytics,
                Domain::Unknown,
            ][domain_idx];
            let text = format!("{prefix}{}{suffix}", phrase.to_uppercase());

            let decision = check(&text, domain);
            prop_assert!(decision.needs_approval);
            prop_assert_eq!(decision.risk_level, RiskLevel::High);
            prop_assert!(decision.reasons.contains(&phrase));
        }

        /// Property: text built only from harmless words is never flagged.
        #[test]
        fn safe_text_is_never_flagged(
            words in prop::collection::vec(0usize..14, 0..12),
            domain_idx in 0usize..5,
        ) {
            let text = words
                .iter()
                .map(|i| SAFE_WORDS[*i])
                .collect::<Vec<_>>()
                .join(" ");
            let domain = [
                Domain::Sales,
                Domain::Finance,
                Domain::Inventory,
                Domain::Analytics,
                Domain::Unknown,
            ][domain_idx];

            let decision = check(&text, domain);
            prop_assert!(!decision.needs_approval);
            prop_assert_eq!(decision.risk_level, RiskLevel::Low);
            prop_assert!(decision.reasons.is_empty());
        }
    }
}

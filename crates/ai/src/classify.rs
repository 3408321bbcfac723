//! Request classification: model first, keyword scoring as the fallback.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use helios_core::Domain;

use crate::llm::LanguageModel;
use crate::prompt::render_classification_prompt;

const SALES_KEYWORDS: &[&str] = &[
    "customer", "lead", "prospect", "sale", "order", "crm", "contact", "deal", "client",
];
const FINANCE_KEYWORDS: &[&str] = &[
    "invoice", "payment", "accounting", "revenue", "expense", "budget", "financial", "money",
    "cost",
];
const INVENTORY_KEYWORDS: &[&str] = &[
    "stock", "inventory", "product", "warehouse", "supply", "procurement", "vendor", "item",
];
const ANALYTICS_KEYWORDS: &[&str] = &[
    "report", "analytics", "dashboard", "metrics", "analysis", "trend", "chart", "insight",
];

fn keywords(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Sales => SALES_KEYWORDS,
        Domain::Finance => FINANCE_KEYWORDS,
        Domain::Inventory => INVENTORY_KEYWORDS,
        Domain::Analytics => ANALYTICS_KEYWORDS,
        Domain::Unknown => &[],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    Llm,
    Keywords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub domain: Domain,
    pub source: ClassificationSource,
}

/// Keyword hit counts per routable domain, in tie-break order.
pub fn keyword_scores(request: &str) -> Vec<(Domain, usize)> {
    let lowered = request.to_lowercase();
    Domain::ROUTABLE
        .iter()
        .map(|&d| {
            let score = keywords(d).iter().filter(|k| lowered.contains(*k)).count();
            (d, score)
        })
        .collect()
}

/// Highest keyword score wins; earlier domains win ties; no hits means sales.
pub fn classify_by_keywords(request: &str) -> Domain {
    let mut best = (Domain::Sales, 0usize);
    for (domain, score) in keyword_scores(request) {
        if score > best.1 {
            best = (domain, score);
        }
    }
    best.0
}

/// Maps a request to the domain whose agent should handle it.
#[derive(Clone)]
pub struct Classifier {
    llm: Arc<dyn LanguageModel>,
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("model", &self.llm.model_name())
            .finish()
    }
}

impl Classifier {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// Ask the model for a domain token. Any failure or unexpected answer
    /// yields [`Domain::Unknown`].
    pub async fn classify_llm(&self, request: &str) -> Domain {
        let prompt = render_classification_prompt(request);
        match self.llm.complete(&prompt, &[]).await {
            Ok(answer) => {
                let token = answer.trim().to_lowercase();
                match Domain::from_token(&token) {
                    Some(domain) => domain,
                    None => {
                        warn!(answer = %token, "classifier returned an unexpected domain");
                        Domain::Unknown
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "classifier model call failed");
                Domain::Unknown
            }
        }
    }

    pub async fn classify(&self, request: &str) -> Classification {
        let domain = self.classify_llm(request).await;
        let classification = if domain.is_routable() {
            Classification {
                domain,
                source: ClassificationSource::Llm,
            }
        } else {
            Classification {
                domain: classify_by_keywords(request),
                source: ClassificationSource::Keywords,
            }
        };

        debug!(
            domain = %classification.domain,
            source = ?classification.source,
            "request classified"
        );
        classification
    }
}

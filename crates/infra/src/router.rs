//! Request routing pipeline.
//!
//! The `Router` drives one request from text to answer:
//!
//! ```text
//! request
//!   ↓
//! 1. Classify into a domain (model, then keyword fallback)
//!   ↓
//! 2. Governance check on (text, domain)
//!   ↓ flagged → persist approval, return the risk notice
//! 3. Invoke the domain agent
//!   ↓
//! 4. Persist tool call + conversation records (success or failure)
//!   ↓
//! RouteOutcome
//! ```
//!
//! Persistence is best effort: audit failures are logged at ERROR and never
//! change the outcome returned to the caller.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use helios_ai::{Classifier, DomainAgent};
use helios_core::{Domain, NewApproval, NewConversation, NewToolCall, SessionId, UserId};
use helios_governance::{GovernanceDecision, GovernancePolicy, check_with};

use crate::audit::AuditLog;
use crate::db::{Database, DbError, SystemInfo};

/// Result of routing one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteOutcome {
    /// The agent produced an answer.
    Answered { domain: Domain, output: String },
    /// Governance held the request; nothing was executed.
    HeldForApproval {
        domain: Domain,
        decision: GovernanceDecision,
    },
    /// The agent failed; `detail` is the underlying error.
    Failed { domain: Domain, detail: String },
}

impl RouteOutcome {
    pub fn domain(&self) -> Domain {
        match self {
            RouteOutcome::Answered { domain, .. }
            | RouteOutcome::HeldForApproval { domain, .. }
            | RouteOutcome::Failed { domain, .. } => *domain,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RouteOutcome::Failed { .. })
    }

    /// Text shown to the user.
    pub fn message(&self) -> String {
        match self {
            RouteOutcome::Answered { output, .. } => output.clone(),
            RouteOutcome::HeldForApproval { decision, .. } => decision.notice(),
            RouteOutcome::Failed { domain, detail } => {
                format!("Error routing to {domain} agent: {detail}")
            }
        }
    }
}

pub struct Router {
    classifier: Classifier,
    policy: GovernancePolicy,
    agents: BTreeMap<Domain, DomainAgent>,
    audit: Arc<dyn AuditLog>,
    db: Database,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("classifier", &self.classifier)
            .field("agents", &self.agents.keys().collect::<Vec<_>>())
            .field("db", &self.db.path())
            .finish_non_exhaustive()
    }
}

impl Router {
    pub fn new(
        classifier: Classifier,
        policy: GovernancePolicy,
        agents: impl IntoIterator<Item = DomainAgent>,
        audit: Arc<dyn AuditLog>,
        db: Database,
    ) -> Self {
        let agents = agents.into_iter().map(|a| (a.domain(), a)).collect();
        Self {
            classifier,
            policy,
            agents,
            audit,
            db,
        }
    }

    pub fn agent_names(&self) -> Vec<String> {
        self.agents.keys().map(|d| d.to_string()).collect()
    }

    pub async fn route(&self, request: &str, session_id: &SessionId, user_id: &UserId) -> RouteOutcome {
        let classification = self.classifier.classify(request).await;
        let domain = classification.domain;
        info!(
            session = %session_id,
            domain = %domain,
            source = ?classification.source,
            "routing request"
        );

        let decision = check_with(&self.policy, request, domain);
        if decision.needs_approval {
            warn!(session = %session_id, domain = %domain, reasons = ?decision.reasons, "request held for approval");
            let approval = NewApproval {
                session_id: session_id.clone(),
                user_id: user_id.clone(),
                request_text: request.to_string(),
                domain,
                reasons: decision.reasons.clone(),
            };
            if let Err(err) = self.audit.record_approval(approval).await {
                error!(error = %err, "failed to persist approval");
            }
            return RouteOutcome::HeldForApproval { domain, decision };
        }

        let outcome = match self.agents.get(&domain) {
            Some(agent) => match agent.invoke(request).await {
                Ok(out) => RouteOutcome::Answered {
                    domain,
                    output: out.output,
                },
                Err(err) => RouteOutcome::Failed {
                    domain,
                    detail: err.to_string(),
                },
            },
            None => RouteOutcome::Failed {
                domain,
                detail: "no agent is registered for this domain".to_string(),
            },
        };

        if let RouteOutcome::Failed { detail, .. } = &outcome {
            error!(domain = %domain, error = %detail, "agent invocation failed");
        }

        self.persist_turn(request, session_id, user_id, &outcome).await;
        outcome
    }

    async fn persist_turn(
        &self,
        request: &str,
        session_id: &SessionId,
        user_id: &UserId,
        outcome: &RouteOutcome,
    ) {
        let success = !outcome.is_failure();
        let tool_output = match outcome {
            RouteOutcome::Failed { detail, .. } => detail.clone(),
            other => other.message(),
        };

        let call = NewToolCall {
            session_id: session_id.clone(),
            user_id: user_id.clone(),
            domain: outcome.domain(),
            inputs: json!({ "user_request": request }),
            outputs: tool_output,
            success,
        };
        if let Err(err) = self.audit.record_tool_call(call).await {
            error!(error = %err, "failed to persist tool call");
        }

        let turn = NewConversation {
            session_id: session_id.clone(),
            user_id: user_id.clone(),
            user_input: request.to_string(),
            agent_output: outcome.message(),
            domain: outcome.domain(),
            success,
        };
        if let Err(err) = self.audit.record_conversation(turn).await {
            error!(error = %err, "failed to persist conversation");
        }
    }

    /// Database tables, key-table counts and the routable agents.
    pub async fn system_info(&self) -> Result<SystemInfo, DbError> {
        let mut info = self.db.system_info().await?;
        info.agents = self.agent_names();
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use helios_ai::{LanguageModel, ScriptedLanguageModel, StaticLanguageModel, ToolRegistry};
    use helios_core::ApprovalStatus;

    use super::*;
    use crate::audit::InMemoryAuditLog;

    fn ids() -> (SessionId, UserId) {
        (SessionId::new("demo-session").unwrap(), UserId::new("demo-user").unwrap())
    }

    fn router_with(
        classifier_answer: &str,
        agent_llm: Arc<dyn LanguageModel>,
        audit: Arc<InMemoryAuditLog>,
    ) -> Router {
        let classifier = Classifier::new(Arc::new(StaticLanguageModel::new(classifier_answer)));
        let agents = Domain::ROUTABLE
            .into_iter()
            .map(|d| DomainAgent::new(d, "persona", agent_llm.clone(), ToolRegistry::new()));
        Router::new(
            classifier,
            GovernancePolicy::default(),
            agents,
            audit,
            Database::new("unused.db"),
        )
    }

    #[tokio::test]
    async fn answered_requests_write_one_tool_call_and_one_conversation() {
        let audit = Arc::new(InMemoryAuditLog::new());
        let llm = Arc::new(StaticLanguageModel::new("Final Answer: 100 units of Widget A."));
        let router = router_with("inventory", llm, audit.clone());
        let (s, u) = ids();

        let outcome = router.route("check stock level for product X", &s, &u).await;

        assert_eq!(
            outcome,
            RouteOutcome::Answered {
                domain: Domain::Inventory,
                output: "100 units of Widget A.".to_string()
            }
        );
        let calls = audit.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].inputs, json!({ "user_request": "check stock level for product X" }));
        assert!(calls[0].success);
        assert_eq!(audit.conversations().len(), 1);
        assert!(audit.approvals().is_empty());
    }

    #[tokio::test]
    async fn flagged_requests_only_write_an_approval() {
        let audit = Arc::new(InMemoryAuditLog::new());
        let llm = Arc::new(ScriptedLanguageModel::new(Vec::<String>::new()));
        let router = router_with("sales", llm.clone(), audit.clone());
        let (s, u) = ids();

        let outcome = router.route("export all customer financials", &s, &u).await;

        assert!(matches!(outcome, RouteOutcome::HeldForApproval { .. }));
        assert!(outcome
            .message()
            .starts_with("This request is flagged as HIGH risk and requires approval. Reasons: export all"));
        let approvals = audit.approvals();
        assert_eq!(approvals.len(), 1);
        assert_eq!(approvals[0].status, ApprovalStatus::Pending);
        assert!(audit.tool_calls().is_empty());
        assert!(audit.conversations().is_empty());
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn agent_failures_are_recorded_as_unsuccessful() {
        let audit = Arc::new(InMemoryAuditLog::new());
        let llm = Arc::new(ScriptedLanguageModel::new(Vec::<String>::new()).then_fail("quota exceeded"));
        let router = router_with("finance", llm, audit.clone());
        let (s, u) = ids();

        let outcome = router.route("show unpaid invoices", &s, &u).await;

        assert!(outcome.is_failure());
        assert_eq!(
            outcome.message(),
            "Error routing to finance agent: language model failed: inference failed: quota exceeded"
        );
        assert!(!audit.tool_calls()[0].success);
        assert!(!audit.conversations()[0].success);
    }

    #[tokio::test]
    async fn unknown_classification_falls_back_to_keywords() {
        let audit = Arc::new(InMemoryAuditLog::new());
        let llm = Arc::new(StaticLanguageModel::new("Final Answer: ok"));
        let router = router_with("unknown", llm, audit.clone());
        let (s, u) = ids();

        let outcome = router.route("check stock level for product X", &s, &u).await;
        assert_eq!(outcome.domain(), Domain::Inventory);

        let call = &audit.tool_calls()[0];
        assert_eq!((&call.session_id, &call.user_id), (&s, &u));
        assert_eq!(audit.conversations()[0].domain, Domain::Inventory);
    }
}

//! Audit record shapes.
//!
//! Records are append-only. The only mutable field anywhere is
//! [`ApprovalRecord::status`], and it is changed by an external reviewer,
//! never by this system.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::Domain;
use crate::error::DomainError;
use crate::id::{SessionId, UserId};

/// Review state of a held request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "PENDING",
            ApprovalStatus::Approved => "APPROVED",
            ApprovalStatus::Rejected => "REJECTED",
        }
    }
}

impl core::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(ApprovalStatus::Pending),
            "APPROVED" => Ok(ApprovalStatus::Approved),
            "REJECTED" => Ok(ApprovalStatus::Rejected),
            other => Err(DomainError::unknown_value(format!("approval status '{other}'"))),
        }
    }
}

/// A request held by governance, waiting for a reviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub request_text: String,
    pub domain: Domain,
    pub status: ApprovalStatus,
    pub reasons: Vec<String>,
}

/// One agent invocation attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub domain: Domain,
    pub inputs: JsonValue,
    pub outputs: String,
    pub success: bool,
}

/// One completed request/response exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub user_input: String,
    pub agent_output: String,
    pub domain: Domain,
    pub success: bool,
}

/// Insert payload for an approval (always created as `PENDING`).
#[derive(Debug, Clone, PartialEq)]
pub struct NewApproval {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub request_text: String,
    pub domain: Domain,
    pub reasons: Vec<String>,
}

/// Insert payload for a tool call record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewToolCall {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub domain: Domain,
    pub inputs: JsonValue,
    pub outputs: String,
    pub success: bool,
}

/// Insert payload for a conversation record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewConversation {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub user_input: String,
    pub agent_output: String,
    pub domain: Domain,
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_status_round_trips_through_text() {
        for status in [
            ApprovalStatus::Pending,
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<ApprovalStatus>().unwrap(), status);
        }
        assert_eq!("pending".parse::<ApprovalStatus>().unwrap(), ApprovalStatus::Pending);
        assert!("ESCALATED".parse::<ApprovalStatus>().is_err());
    }
}

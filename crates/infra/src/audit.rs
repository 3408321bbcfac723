//! Append-only audit log of approvals, tool calls and conversations.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use thiserror::Error;

use helios_core::{
    ApprovalRecord, ApprovalStatus, ConversationRecord, NewApproval, NewConversation, NewToolCall,
    SessionId, ToolCallRecord, UserId,
};

use crate::db::{Database, DbError};

#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("failed to encode audit payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("corrupt audit row: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for AuditError {
    fn from(value: sqlx::Error) -> Self {
        AuditError::Db(DbError::Sql(value))
    }
}

/// Persistence boundary used by the router.
///
/// Writes return the new row id. Nothing here updates or deletes records.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record_approval(&self, approval: NewApproval) -> Result<i64, AuditError>;

    async fn record_tool_call(&self, call: NewToolCall) -> Result<i64, AuditError>;

    async fn record_conversation(&self, turn: NewConversation) -> Result<i64, AuditError>;

    /// Approvals, oldest first, optionally filtered by status.
    async fn list_approvals(
        &self,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<ApprovalRecord>, AuditError>;
}

/// Audit log stored in the ERP database.
#[derive(Debug, Clone)]
pub struct SqliteAuditLog {
    db: Database,
}

impl SqliteAuditLog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

fn corrupt(what: &str, err: impl std::fmt::Display) -> AuditError {
    AuditError::Corrupt(format!("{what}: {err}"))
}

fn approval_from_row(row: &SqliteRow) -> Result<ApprovalRecord, AuditError> {
    let created_at: String = row.try_get("created_at")?;
    let session_id: String = row.try_get("session_id")?;
    let user_id: String = row.try_get("user_id")?;
    let domain: String = row.try_get("domain")?;
    let status: String = row.try_get("status")?;
    let reasons: String = row.try_get("reasons")?;

    Ok(ApprovalRecord {
        id: row.try_get("id")?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| corrupt("created_at", e))?
            .with_timezone(&Utc),
        session_id: SessionId::new(session_id).map_err(|e| corrupt("session_id", e))?,
        user_id: UserId::new(user_id).map_err(|e| corrupt("user_id", e))?,
        request_text: row.try_get("request_text")?,
        domain: domain.parse().map_err(|e| corrupt("domain", e))?,
        status: status.parse().map_err(|e| corrupt("status", e))?,
        reasons: serde_json::from_str(&reasons).map_err(|e| corrupt("reasons", e))?,
    })
}

#[async_trait]
impl AuditLog for SqliteAuditLog {
    async fn record_approval(&self, approval: NewApproval) -> Result<i64, AuditError> {
        let reasons = serde_json::to_string(&approval.reasons)?;
        let mut conn = self.db.connect().await?;
        let result = sqlx::query(
            "INSERT INTO approvals (created_at, session_id, user_id, request_text, domain, status, reasons)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(now_rfc3339())
        .bind(approval.session_id.as_str())
        .bind(approval.user_id.as_str())
        .bind(&approval.request_text)
        .bind(approval.domain.as_str())
        .bind(ApprovalStatus::Pending.as_str())
        .bind(reasons)
        .execute(&mut conn)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn record_tool_call(&self, call: NewToolCall) -> Result<i64, AuditError> {
        let inputs = serde_json::to_string(&call.inputs)?;
        let mut conn = self.db.connect().await?;
        let result = sqlx::query(
            "INSERT INTO tool_calls (created_at, session_id, user_id, domain, inputs, outputs, success)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(now_rfc3339())
        .bind(call.session_id.as_str())
        .bind(call.user_id.as_str())
        .bind(call.domain.as_str())
        .bind(inputs)
        .bind(&call.outputs)
        .bind(i64::from(call.success))
        .execute(&mut conn)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn record_conversation(&self, turn: NewConversation) -> Result<i64, AuditError> {
        let mut conn = self.db.connect().await?;
        let result = sqlx::query(
            "INSERT INTO conversations (created_at, session_id, user_id, user_input, agent_output, domain, success)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(now_rfc3339())
        .bind(turn.session_id.as_str())
        .bind(turn.user_id.as_str())
        .bind(&turn.user_input)
        .bind(&turn.agent_output)
        .bind(turn.domain.as_str())
        .bind(i64::from(turn.success))
        .execute(&mut conn)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn list_approvals(
        &self,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<ApprovalRecord>, AuditError> {
        let mut conn = self.db.connect().await?;
        let rows = match status {
            Some(status) => {
                sqlx::query("SELECT * FROM approvals WHERE status = ? ORDER BY id")
                    .bind(status.as_str())
                    .fetch_all(&mut conn)
                    .await?
            }
            None => {
                sqlx::query("SELECT * FROM approvals ORDER BY id")
                    .fetch_all(&mut conn)
                    .await?
            }
        };
        rows.iter().map(approval_from_row).collect()
    }
}

#[derive(Debug, Default)]
struct InMemoryState {
    approvals: Vec<ApprovalRecord>,
    tool_calls: Vec<ToolCallRecord>,
    conversations: Vec<ConversationRecord>,
}

/// In-memory audit log for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    inner: Mutex<InMemoryState>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, InMemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn approvals(&self) -> Vec<ApprovalRecord> {
        self.state().approvals.clone()
    }

    pub fn tool_calls(&self) -> Vec<ToolCallRecord> {
        self.state().tool_calls.clone()
    }

    pub fn conversations(&self) -> Vec<ConversationRecord> {
        self.state().conversations.clone()
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn record_approval(&self, approval: NewApproval) -> Result<i64, AuditError> {
        let mut state = self.state();
        let id = state.approvals.len() as i64 + 1;
        state.approvals.push(ApprovalRecord {
            id,
            created_at: Utc::now(),
            session_id: approval.session_id,
            user_id: approval.user_id,
            request_text: approval.request_text,
            domain: approval.domain,
            status: ApprovalStatus::Pending,
            reasons: approval.reasons,
        });
        Ok(id)
    }

    async fn record_tool_call(&self, call: NewToolCall) -> Result<i64, AuditError> {
        let mut state = self.state();
        let id = state.tool_calls.len() as i64 + 1;
        state.tool_calls.push(ToolCallRecord {
            id,
            created_at: Utc::now(),
            session_id: call.session_id,
            user_id: call.user_id,
            domain: call.domain,
            inputs: call.inputs,
            outputs: call.outputs,
            success: call.success,
        });
        Ok(id)
    }

    async fn record_conversation(&self, turn: NewConversation) -> Result<i64, AuditError> {
        let mut state = self.state();
        let id = state.conversations.len() as i64 + 1;
        state.conversations.push(ConversationRecord {
            id,
            created_at: Utc::now(),
            session_id: turn.session_id,
            user_id: turn.user_id,
            user_input: turn.user_input,
            agent_output: turn.agent_output,
            domain: turn.domain,
            success: turn.success,
        });
        Ok(id)
    }

    async fn list_approvals(
        &self,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<ApprovalRecord>, AuditError> {
        Ok(self
            .state()
            .approvals
            .iter()
            .filter(|a| status.is_none_or(|s| a.status == s))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use helios_core::Domain;
    use serde_json::json;

    use super::*;

    fn ids() -> (SessionId, UserId) {
        (SessionId::new("s-1").unwrap(), UserId::new("u-1").unwrap())
    }

    #[tokio::test]
    async fn sqlite_log_persists_and_lists_approvals() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("audit.db"));
        db.bootstrap().await.unwrap();
        let log = SqliteAuditLog::new(db.clone());
        let (session_id, user_id) = ids();

        let id = log
            .record_approval(NewApproval {
                session_id: session_id.clone(),
                user_id: user_id.clone(),
                request_text: "export all customers".to_string(),
                domain: Domain::Sales,
                reasons: vec!["export all".to_string(), "domain-sensitive: export customers".to_string()],
            })
            .await
            .unwrap();
        assert_eq!(id, 1);

        let pending = log.list_approvals(Some(ApprovalStatus::Pending)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].reasons.len(), 2);
        assert_eq!(pending[0].domain, Domain::Sales);
        assert!(log.list_approvals(Some(ApprovalStatus::Approved)).await.unwrap().is_empty());

        log.record_tool_call(NewToolCall {
            session_id: session_id.clone(),
            user_id: user_id.clone(),
            domain: Domain::Inventory,
            inputs: json!({ "user_request": "check stock" }),
            outputs: "100 units".to_string(),
            success: true,
        })
        .await
        .unwrap();
        log.record_conversation(NewConversation {
            session_id,
            user_id,
            user_input: "check stock".to_string(),
            agent_output: "100 units".to_string(),
            domain: Domain::Inventory,
            success: true,
        })
        .await
        .unwrap();

        let rows = db
            .query_json("SELECT inputs, success FROM tool_calls")
            .await
            .unwrap();
        assert_eq!(rows[0]["inputs"], r#"{"user_request":"check stock"}"#);
        assert_eq!(rows[0]["success"], 1);
        assert_eq!(db.count_rows("conversations").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn in_memory_log_filters_by_status() {
        let log = InMemoryAuditLog::new();
        let (session_id, user_id) = ids();
        log.record_approval(NewApproval {
            session_id,
            user_id,
            request_text: "wipe".to_string(),
            domain: Domain::Finance,
            reasons: vec!["wipe".to_string()],
        })
        .await
        .unwrap();

        assert_eq!(log.list_approvals(None).await.unwrap().len(), 1);
        assert!(log.list_approvals(Some(ApprovalStatus::Rejected)).await.unwrap().is_empty());
    }
}

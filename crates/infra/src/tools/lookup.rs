use serde_json::{Value as JsonValue, json};

use helios_ai::retrieval::{DEFAULT_TOP_K, rank};
use helios_ai::{ToolErrorKind, ToolOutcome};

use crate::db::Database;

use super::sql::db_error;

/// Fixed definitions served by the glossary tool.
pub const GLOSSARY: &[(&str, &str)] = &[
    (
        "policy",
        "Policy 1: All sales over $5000 require manager approval.",
    ),
    (
        "erp",
        "Enterprise Resource Planning (ERP) is a software system that integrates all aspects of an enterprise's operations.",
    ),
    (
        "crm",
        "Customer Relationship Management (CRM) is a system for managing interactions with current and potential customers.",
    ),
];

const MAX_TOP_K: usize = 20;

/// Accepts a bare query or `{"query": .., "k": ..}`.
fn parse_query(input: &str) -> Result<(String, usize), String> {
    let trimmed = input.trim();
    if trimmed.starts_with('{') {
        let value: JsonValue =
            serde_json::from_str(trimmed).map_err(|e| format!("invalid JSON input: {e}"))?;
        let query = value
            .get("query")
            .and_then(JsonValue::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        let k = value
            .get("k")
            .and_then(JsonValue::as_u64)
            .map(|k| (k as usize).clamp(1, MAX_TOP_K))
            .unwrap_or(DEFAULT_TOP_K);
        return Ok((query, k));
    }
    Ok((trimmed.trim_matches('"').trim().to_string(), DEFAULT_TOP_K))
}

pub(crate) async fn retrieve(db: &Database, categories: &[&str], input: &str) -> ToolOutcome {
    let (query, k) = match parse_query(input) {
        Ok(parsed) => parsed,
        Err(message) => return ToolOutcome::err(ToolErrorKind::InvalidInput, message),
    };
    if query.is_empty() {
        return ToolOutcome::err(ToolErrorKind::InvalidInput, "Empty query");
    }

    match db.documents_in(categories).await {
        Ok(documents) => ToolOutcome::ok(json!({ "matches": rank(&documents, &query, k) })),
        Err(err) => db_error(err),
    }
}

pub(crate) fn define(input: &str) -> ToolOutcome {
    let term = input.trim().trim_matches('"').trim();
    let key = term.to_lowercase();

    match GLOSSARY.iter().find(|(k, _)| *k == key) {
        Some((_, definition)) => ToolOutcome::ok(json!({
            "term": term,
            "definition": definition,
        })),
        None => ToolOutcome::err(ToolErrorKind::NotFound, "No definition found for that term."),
    }
}

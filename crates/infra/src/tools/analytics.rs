use serde_json::json;
use tracing::warn;

use helios_ai::{LanguageModel, ToolErrorKind, ToolOutcome};

use crate::db::{Database, TableSchema};

use super::sql::{clean_sql, db_error};

fn render_schema(schema: &[TableSchema]) -> String {
    schema
        .iter()
        .map(|t| format!("Table: {}, Columns: {}", t.name, t.columns.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn text_to_sql_prompt(db_name: &str, schema: &str, question: &str) -> String {
    format!(
        "You are a skilled data analyst. Convert the natural language question into a SQLite SQL query.\n\
         The database '{db_name}' has the following tables and columns:\n\
         {schema}\n\n\
         Your query must:\n\
         - Be a single valid SQLite SELECT statement.\n\
         - Only use tables and columns listed above.\n\
         - Be returned on a single line with nothing else.\n\n\
         Question: {question}\n\
         SQL Query:"
    )
}

pub(crate) async fn text_to_sql(db: &Database, llm: &dyn LanguageModel, question: &str) -> ToolOutcome {
    let question = question.trim();
    if question.is_empty() {
        return ToolOutcome::err(ToolErrorKind::InvalidInput, "question is empty");
    }

    let schema = match db.schema().await {
        Ok(s) => render_schema(&s),
        Err(err) => return db_error(err),
    };
    let db_name = db
        .path()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let generated = match llm
        .complete(&text_to_sql_prompt(&db_name, &schema, question), &[])
        .await
    {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "text-to-sql generation failed");
            return ToolOutcome::err(ToolErrorKind::Model, err.to_string());
        }
    };

    let sql = clean_sql(&generated).to_string();
    if !sql.to_lowercase().starts_with("select") {
        return ToolOutcome::err(ToolErrorKind::Rejected, "Only SELECT queries are allowed.");
    }

    match db.query_json(&sql).await {
        Ok(rows) => ToolOutcome::ok(json!({ "sql": sql, "rows": rows })),
        Err(err) => db_error(err),
    }
}

pub(crate) async fn report(db: &Database, report_name: &str) -> ToolOutcome {
    let name = report_name.trim().trim_matches('"').trim();
    if !name.to_lowercase().contains("monthly sales") {
        return ToolOutcome::err(ToolErrorKind::NotFound, format!("Report '{name}' not found."));
    }

    let months = match db.monthly_sales().await {
        Ok(m) => m,
        Err(err) => return db_error(err),
    };

    let mut summary = String::from("Monthly Sales Report:");
    for m in &months {
        summary.push_str(&format!("\n- {}: ${:.2}", m.month, m.total));
    }

    ToolOutcome::ok(json!({
        "report": "monthly_sales",
        "rows": months,
        "summary": summary,
    }))
}

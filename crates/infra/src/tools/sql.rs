use serde_json::json;

use helios_ai::{ToolErrorKind, ToolOutcome};

use crate::db::{Database, DbError};

pub(crate) fn db_error(err: DbError) -> ToolOutcome {
    match err {
        DbError::Rejected(message) => ToolOutcome::err(ToolErrorKind::Rejected, message),
        other => ToolOutcome::err(ToolErrorKind::Sql, other.to_string()),
    }
}

/// Models often wrap SQL in quotes or a fenced block.
pub(crate) fn clean_sql(input: &str) -> &str {
    let trimmed = input.trim();
    let unfenced = trimmed
        .strip_prefix("```sql")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed);
    unfenced.trim().trim_matches('"').trim()
}

pub(crate) async fn read(db: &Database, input: &str) -> ToolOutcome {
    let sql = clean_sql(input);
    if sql.is_empty() {
        return ToolOutcome::err(ToolErrorKind::InvalidInput, "empty query");
    }

    match db.query_json(sql).await {
        Ok(rows) => ToolOutcome::ok(rows),
        Err(err) => db_error(err),
    }
}

pub(crate) async fn write(db: &Database, input: &str) -> ToolOutcome {
    let sql = clean_sql(input);
    if sql.is_empty() {
        return ToolOutcome::err(ToolErrorKind::InvalidInput, "empty statement");
    }

    match db.execute_write(sql).await {
        Ok(rows_affected) => ToolOutcome::ok(json!({
            "status": "success",
            "rows_affected": rows_affected,
        })),
        Err(err) => db_error(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("erp.db"));
        db.setup_schema().await.unwrap();
        db.seed_demo().await.unwrap();
        (dir, db)
    }

    #[test]
    fn strips_quotes_and_fences() {
        assert_eq!(clean_sql("\"SELECT 1\""), "SELECT 1");
        assert_eq!(clean_sql("```sql\nSELECT 1\n```"), "SELECT 1");
    }

    #[tokio::test]
    async fn read_rejects_writes() {
        let (_dir, db) = seeded().await;

        let outcome = read(&db, "DELETE FROM stock").await;
        assert_eq!(outcome.error_kind(), Some(ToolErrorKind::Rejected));
        assert_eq!(db.count_rows("stock").await.unwrap(), 2);

        let outcome = read(&db, "SELECT COUNT(*) AS n FROM leads").await;
        assert_eq!(outcome.value().unwrap(), &json!([{ "n": 2 }]));
    }

    #[tokio::test]
    async fn write_reports_rows_and_sql_errors() {
        let (_dir, db) = seeded().await;

        let outcome = write(&db, "INSERT INTO leads (name, source, status) VALUES ('Eve', 'Event', 'New')").await;
        assert_eq!(
            outcome.value().unwrap(),
            &json!({ "status": "success", "rows_affected": 1 })
        );

        let outcome = write(&db, "UPDATE missing_table SET x = 1").await;
        assert_eq!(outcome.error_kind(), Some(ToolErrorKind::Sql));
    }
}

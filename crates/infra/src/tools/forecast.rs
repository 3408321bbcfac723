use serde_json::{Value as JsonValue, json};

use helios_ai::forecast::{DEFAULT_FORECAST_PERIODS, holt_forecast};
use helios_ai::{ToolErrorKind, ToolOutcome};

use crate::db::Database;

use super::sql::db_error;

const MAX_PERIODS: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ForecastRequest {
    product_id: String,
    periods: usize,
}

/// Accepts a bare product id or `{"product_id": .., "periods": ..}`.
fn parse_request(input: &str) -> Result<ForecastRequest, String> {
    let trimmed = input.trim().trim_matches('"').trim();
    if trimmed.is_empty() {
        return Err("product_id is required".to_string());
    }

    if !trimmed.starts_with('{') {
        return Ok(ForecastRequest {
            product_id: trimmed.to_string(),
            periods: DEFAULT_FORECAST_PERIODS,
        });
    }

    let value: JsonValue =
        serde_json::from_str(trimmed).map_err(|e| format!("invalid JSON input: {e}"))?;

    let product_id = match value.get("product_id") {
        Some(JsonValue::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(JsonValue::Number(n)) => n.to_string(),
        _ => return Err("product_id is required".to_string()),
    };

    let periods = match value.get("periods") {
        None | Some(JsonValue::Null) => DEFAULT_FORECAST_PERIODS,
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| (1..=MAX_PERIODS).contains(n))
            .ok_or_else(|| format!("periods must be an integer between 1 and {MAX_PERIODS}"))?,
    };

    Ok(ForecastRequest { product_id, periods })
}

pub(crate) async fn run(db: &Database, input: &str) -> ToolOutcome {
    let request = match parse_request(input) {
        Ok(r) => r,
        Err(message) => return ToolOutcome::err(ToolErrorKind::InvalidInput, message),
    };

    let history = match db.stock_history(&request.product_id).await {
        Ok(h) => h,
        Err(err) => return db_error(err),
    };

    if history.is_empty() {
        return ToolOutcome::ok(json!({ "forecast": [], "message": "No historical data" }));
    }

    let forecast = holt_forecast(&history, request.periods);
    ToolOutcome::ok(json!({
        "product_id": request.product_id,
        "forecast": forecast,
    }))
}

use std::sync::Arc;

use helios_ai::{LanguageModel, ScriptedLanguageModel, StaticLanguageModel};
use helios_infra::{AppConfig, AppContext};
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    ctx: AppContext,
    handle: tokio::task::JoinHandle<()>,
    _dir: tempfile::TempDir,
}

impl TestServer {
    /// Same router as prod, over a seeded throwaway database and scripted models.
    async fn spawn(classifier: &str, agent: Arc<dyn LanguageModel>) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let db_path = dir.path().join("erp.db").to_string_lossy().into_owned();
        let config = AppConfig::from_lookup(|key| match key {
            "GOOGLE_API_KEY" => Some("test-key".to_string()),
            "ERP_DB_PATH" => Some(db_path.clone()),
            _ => None,
        })
        .expect("config");

        let ctx = AppContext::with_models(config, Arc::new(StaticLanguageModel::new(classifier)), agent)
            .await
            .expect("context");
        ctx.db.setup_schema().await.expect("schema");
        ctx.db.seed_demo().await.expect("seed");

        let app = helios_api::app::build_app(ctx.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            ctx,
            handle,
            _dir: dir,
        }
    }

    async fn chat(&self, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let res = reqwest::Client::new()
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    async fn count(&self, table: &str) -> i64 {
        self.ctx.db.count_rows(table).await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn unused_agent() -> Arc<dyn LanguageModel> {
    Arc::new(ScriptedLanguageModel::new(Vec::<String>::new()))
}

#[tokio::test]
async fn root_and_health_respond() {
    let srv = TestServer::spawn("sales", unused_agent()).await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Welcome to the Helios Dynamics ERP API!" }));

    let res = client.get(format!("{}/health", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn chat_runs_the_agent_and_logs_the_turn() {
    let agent = Arc::new(ScriptedLanguageModel::new([
        "I should read the stock table.\nAction: inventory_sql_read\nAction Input: SELECT quantity FROM stock WHERE product_id = 1",
        "I now know the final answer\nFinal Answer: Widget A has 100 units in stock.",
    ]));
    let srv = TestServer::spawn("inventory", agent.clone()).await;

    let (status, body) = srv
        .chat(json!({ "prompt": "check stock level for product X" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "response": "Widget A has 100 units in stock." }));
    assert!(agent.prompts()[1].contains(r#"Observation: {"ok":true,"value":[{"quantity":100}]}"#));
    assert_eq!(srv.count("tool_calls").await, 1);
    assert_eq!(srv.count("conversations").await, 1);
    assert_eq!(srv.count("approvals").await, 0);
}

#[tokio::test]
async fn monthly_sales_report_is_answered_by_analytics() {
    let agent = Arc::new(ScriptedLanguageModel::new([
        "Action: analytics_reporting_tool\nAction Input: monthly sales",
        "Final Answer: January 2024 had $49.98 in sales and February 2024 had $19.99.",
    ]));
    let srv = TestServer::spawn("analytics", agent.clone()).await;

    let (status, body) = srv
        .chat(json!({ "prompt": "Show me the monthly sales report", "session_id": "s-42" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["response"].as_str().unwrap().contains("$49.98"));
    assert!(agent.prompts()[1].contains("Monthly Sales Report:"));

    let rows = srv
        .ctx
        .db
        .query_json("SELECT session_id, domain, success FROM conversations")
        .await
        .unwrap();
    assert_eq!(rows, vec![json!({ "session_id": "s-42", "domain": "analytics", "success": 1 })]);
}

#[tokio::test]
async fn risky_requests_are_held_for_approval() {
    let agent = Arc::new(ScriptedLanguageModel::new(Vec::<String>::new()));
    let srv = TestServer::spawn("sales", agent.clone()).await;

    let (status, body) = srv
        .chat(json!({ "prompt": "export all customer financials" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "This request is flagged as HIGH risk and requires approval. Reasons: export all"
    );
    assert!(agent.prompts().is_empty());
    assert_eq!(srv.count("tool_calls").await, 0);
    assert_eq!(srv.count("conversations").await, 0);

    let res = reqwest::Client::new()
        .get(format!("{}/api/approvals?status=PENDING", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let approvals: serde_json::Value = res.json().await.unwrap();
    let approvals = approvals.as_array().unwrap();
    assert_eq!(approvals.len(), 1);
    assert_eq!(approvals[0]["status"], "PENDING");
    assert_eq!(approvals[0]["request_text"], "export all customer financials");
    assert_eq!(approvals[0]["reasons"], json!(["export all"]));
}

#[tokio::test]
async fn agent_failure_maps_to_500() {
    let agent = Arc::new(ScriptedLanguageModel::new(Vec::<String>::new()).then_fail("upstream timeout"));
    let srv = TestServer::spawn("finance", agent).await;

    let (status, body) = srv.chat(json!({ "prompt": "show unpaid invoices" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Error routing to finance agent:"));

    let rows = srv
        .ctx
        .db
        .query_json("SELECT success FROM tool_calls")
        .await
        .unwrap();
    assert_eq!(rows, vec![json!({ "success": 0 })]);
    assert_eq!(srv.count("conversations").await, 1);
}

#[tokio::test]
async fn invalid_requests_are_rejected() {
    let srv = TestServer::spawn("sales", unused_agent()).await;

    let (status, _) = srv.chat(json!({ "prompt": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = srv.chat(json!({ "prompt": "hi", "session_id": " " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let res = reqwest::Client::new()
        .get(format!("{}/api/approvals?status=MAYBE", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn system_info_lists_tables_counts_and_agents() {
    let srv = TestServer::spawn("sales", unused_agent()).await;

    let body: serde_json::Value = reqwest::Client::new()
        .get(format!("{}/api/system", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["agents"], json!(["sales", "finance", "inventory", "analytics"]));
    assert_eq!(body["record_counts"]["customers"], 2);
    assert!(body["tables"].as_array().unwrap().iter().any(|t| t == "documents"));
}

use std::sync::Arc;

use helios_ai::{AiResult, LanguageModel, ToolRegistry};
use helios_core::Domain;

use crate::db::Database;

use super::ErpTool;

const SALES_DOCS: &[&str] = &["sales", "crm", "policy"];
const POLICY_DOCS: &[&str] = &["policy", "glossary"];
const OPERATIONS_DOCS: &[&str] = &["contract", "policy", "incident"];

/// Persona line that opens each agent's prompt.
pub fn persona(domain: Domain) -> &'static str {
    match domain {
        Domain::Sales => {
            "You are the Sales agent of an ERP system. You manage customers, leads, orders and CRM \
             records. Read data before changing it and report exactly what you changed."
        }
        Domain::Finance => {
            "You are the Finance agent of an ERP system. You handle invoices, payments, revenue and \
             expenses. Be precise with amounts and cite the records you used."
        }
        Domain::Inventory => {
            "You are the Inventory agent of an ERP system. You track stock levels, products, vendors \
             and warehouses, and forecast demand from historical stock movements."
        }
        Domain::Analytics => {
            "You are the Analytics agent of an ERP system. You answer business questions with data, \
             build reports and explain ERP concepts."
        }
        Domain::Unknown => "You are a helpful ERP assistant.",
    }
}

/// Tools available to the agent of `domain`, registered in prompt order.
pub fn build_registry(
    domain: Domain,
    db: &Database,
    llm: Arc<dyn LanguageModel>,
) -> AiResult<ToolRegistry> {
    let tools: Vec<ErpTool> = match domain {
        Domain::Sales => vec![
            ErpTool::SqlRead {
                name: "sales_sql_read",
                description: "Run a read-only SQL SELECT against sales tables (customers, leads, orders, order_items). Input: one SQLite SELECT statement.",
                db: db.clone(),
            },
            ErpTool::SqlWrite {
                name: "sales_sql_write",
                description: "Insert, update or delete rows in sales tables (customers, leads, orders). Input: SQLite statement(s), run in one transaction.",
                db: db.clone(),
            },
            ErpTool::DocumentRetrieval {
                name: "sales_doc_rag",
                description: "Search sales playbooks, CRM notes and sales policies. Input: search text.",
                db: db.clone(),
                categories: SALES_DOCS,
            },
        ],
        Domain::Finance => vec![
            ErpTool::SqlRead {
                name: "finance_sql_read",
                description: "Run a read-only SQL SELECT against finance tables (invoices, invoice_lines, orders). Input: one SQLite SELECT statement.",
                db: db.clone(),
            },
            ErpTool::SqlWrite {
                name: "finance_sql_write",
                description: "Insert, update or delete rows in finance tables (invoices, invoice_lines). Input: SQLite statement(s), run in one transaction.",
                db: db.clone(),
            },
            ErpTool::DocumentRetrieval {
                name: "policy_rag_tool",
                description: "Search policy and glossary documents for relevant passages. Input: search text.",
                db: db.clone(),
                categories: POLICY_DOCS,
            },
        ],
        Domain::Inventory => vec![
            ErpTool::SqlRead {
                name: "inventory_sql_read",
                description: "Read data from inventory tables (stock, stock_movements, products, vendors). Input: one SQLite SELECT statement.",
                db: db.clone(),
            },
            ErpTool::SqlWrite {
                name: "inventory_sql_write",
                description: "Insert/update/delete data in inventory tables (stock, stock_movements, products). Input: SQLite statement(s), run in one transaction.",
                db: db.clone(),
            },
            ErpTool::Forecast {
                name: "forecast_tool",
                description: "Generate demand forecasts from historical stock movement data. Input: a product id, or JSON {\"product_id\": .., \"periods\": ..}.",
                db: db.clone(),
            },
            ErpTool::DocumentRetrieval {
                name: "doc_rag_tool",
                description: "Retrieve supplier contracts, policies, or incident reports from internal documents. Input: search text.",
                db: db.clone(),
                categories: OPERATIONS_DOCS,
            },
        ],
        Domain::Analytics => vec![
            ErpTool::TextToSql {
                name: "text_to_sql_tool",
                description: "Translates natural language questions into SQL queries for the ERP database and runs them. Read only. Input: a complete question.",
                db: db.clone(),
                llm,
            },
            ErpTool::Report {
                name: "analytics_reporting_tool",
                description: "Generates a predefined analytics report. Available: 'monthly sales'. Input: the report name.",
                db: db.clone(),
            },
            ErpTool::Glossary {
                name: "rag_definition_tool",
                description: "Provides definitions of ERP concepts and policies from a fixed knowledge base. Input: a single term such as 'erp', 'crm' or 'policy'.",
            },
        ],
        Domain::Unknown => Vec::new(),
    };

    let mut registry = ToolRegistry::new();
    for tool in tools {
        registry.register(Arc::new(tool))?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use helios_ai::StaticLanguageModel;

    use super::*;

    #[test]
    fn each_domain_gets_its_tool_set() {
        let db = Database::new("unused.db");
        let llm: Arc<dyn LanguageModel> = Arc::new(StaticLanguageModel::new("SELECT 1"));
        let names = |d| {
            build_registry(d, &db, llm.clone())
                .unwrap()
                .names()
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        };

        assert_eq!(names(Domain::Sales), ["sales_sql_read", "sales_sql_write", "sales_doc_rag"]);
        assert_eq!(
            names(Domain::Finance),
            ["finance_sql_read", "finance_sql_write", "policy_rag_tool"]
        );
        assert_eq!(
            names(Domain::Inventory),
            ["inventory_sql_read", "inventory_sql_write", "forecast_tool", "doc_rag_tool"]
        );
        assert_eq!(
            names(Domain::Analytics),
            ["text_to_sql_tool", "analytics_reporting_tool", "rag_definition_tool"]
        );
        assert!(names(Domain::Unknown).is_empty());
    }
}

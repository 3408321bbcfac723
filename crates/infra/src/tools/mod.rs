//! Concrete ERP tools exposed to the domain agents.
//!
//! All variants live in one tagged union, [`ErpTool`], which implements the
//! [`Tool`] capability. Registries per domain are assembled explicitly by
//! [`build_registry`].

mod analytics;
mod forecast;
mod lookup;
mod registry;
mod sql;

use std::sync::Arc;

use async_trait::async_trait;

use helios_ai::{LanguageModel, Tool, ToolOutcome};

use crate::db::Database;

pub use lookup::GLOSSARY;
pub use registry::{build_registry, persona};

/// Categories searched by a document retrieval tool.
pub type Categories = &'static [&'static str];

#[derive(Clone)]
pub enum ErpTool {
    SqlRead {
        name: &'static str,
        description: &'static str,
        db: Database,
    },
    SqlWrite {
        name: &'static str,
        description: &'static str,
        db: Database,
    },
    Forecast {
        name: &'static str,
        description: &'static str,
        db: Database,
    },
    DocumentRetrieval {
        name: &'static str,
        description: &'static str,
        db: Database,
        categories: Categories,
    },
    Glossary {
        name: &'static str,
        description: &'static str,
    },
    TextToSql {
        name: &'static str,
        description: &'static str,
        db: Database,
        llm: Arc<dyn LanguageModel>,
    },
    Report {
        name: &'static str,
        description: &'static str,
        db: Database,
    },
}

impl std::fmt::Debug for ErpTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErpTool")
            .field("kind", &self.kind())
            .field("name", &self.tool_name())
            .finish()
    }
}

impl ErpTool {
    pub fn kind(&self) -> &'static str {
        match self {
            ErpTool::SqlRead { .. } => "sql_read",
            ErpTool::SqlWrite { .. } => "sql_write",
            ErpTool::Forecast { .. } => "forecast",
            ErpTool::DocumentRetrieval { .. } => "document_retrieval",
            ErpTool::Glossary { .. } => "glossary",
            ErpTool::TextToSql { .. } => "text_to_sql",
            ErpTool::Report { .. } => "report",
        }
    }

    fn tool_name(&self) -> &'static str {
        match self {
            ErpTool::SqlRead { name, .. }
            | ErpTool::SqlWrite { name, .. }
            | ErpTool::Forecast { name, .. }
            | ErpTool::DocumentRetrieval { name, .. }
            | ErpTool::Glossary { name, .. }
            | ErpTool::TextToSql { name, .. }
            | ErpTool::Report { name, .. } => *name,
        }
    }

    fn tool_description(&self) -> &'static str {
        match self {
            ErpTool::SqlRead { description, .. }
            | ErpTool::SqlWrite { description, .. }
            | ErpTool::Forecast { description, .. }
            | ErpTool::DocumentRetrieval { description, .. }
            | ErpTool::Glossary { description, .. }
            | ErpTool::TextToSql { description, .. }
            | ErpTool::Report { description, .. } => *description,
        }
    }
}

#[async_trait]
impl Tool for ErpTool {
    fn name(&self) -> &str {
        self.tool_name()
    }

    fn description(&self) -> &str {
        self.tool_description()
    }

    async fn invoke(&self, input: &str) -> ToolOutcome {
        let outcome = match self {
            ErpTool::SqlRead { db, .. } => sql::read(db, input).await,
            ErpTool::SqlWrite { db, .. } => sql::write(db, input).await,
            ErpTool::Forecast { db, .. } => forecast::run(db, input).await,
            ErpTool::DocumentRetrieval { db, categories, .. } => {
                lookup::retrieve(db, categories, input).await
            }
            ErpTool::Glossary { .. } => lookup::define(input),
            ErpTool::TextToSql { db, llm, .. } => analytics::text_to_sql(db, llm.as_ref(), input).await,
            ErpTool::Report { db, .. } => analytics::report(db, input).await,
        };

        tracing::debug!(tool = self.tool_name(), ok = outcome.is_ok(), "tool invoked");
        outcome
    }
}

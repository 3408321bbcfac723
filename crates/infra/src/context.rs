//! Application context assembled once at startup and passed explicitly.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use helios_ai::{AiError, Classifier, DomainAgent, GeminiClient, GeminiConfig, LanguageModel};
use helios_core::Domain;
use helios_governance::GovernancePolicy;

use crate::audit::{AuditLog, SqliteAuditLog};
use crate::config::AppConfig;
use crate::db::{Database, DbError};
use crate::router::Router;
use crate::tools::{build_registry, persona};

#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("failed to set up language model: {0}")]
    Model(#[from] AiError),
}

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub db: Database,
    pub audit: Arc<dyn AuditLog>,
    pub router: Arc<Router>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("db", &self.db.path())
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build the context with Gemini behind both the classifier and the agents.
    pub async fn from_config(config: AppConfig) -> Result<Self, ContextError> {
        let gemini = GeminiConfig::new(config.google_api_key.clone(), config.llm_model.clone())
            .with_timeout(config.llm_timeout);
        let llm: Arc<dyn LanguageModel> = Arc::new(GeminiClient::new(gemini)?);
        Self::with_models(config, llm.clone(), llm).await
    }

    /// Build the context around caller-supplied models.
    pub async fn with_models(
        config: AppConfig,
        classifier_llm: Arc<dyn LanguageModel>,
        agent_llm: Arc<dyn LanguageModel>,
    ) -> Result<Self, ContextError> {
        let db = Database::new(&config.db_path);
        db.bootstrap().await?;

        let audit: Arc<dyn AuditLog> = Arc::new(SqliteAuditLog::new(db.clone()));

        let mut agents = Vec::with_capacity(Domain::ROUTABLE.len());
        for domain in Domain::ROUTABLE {
            let tools = build_registry(domain, &db, agent_llm.clone())?;
            agents.push(
                DomainAgent::new(domain, persona(domain), agent_llm.clone(), tools)
                    .with_max_iterations(config.max_iterations),
            );
        }

        let router = Router::new(
            Classifier::new(classifier_llm),
            GovernancePolicy::default(),
            agents,
            audit.clone(),
            db.clone(),
        );

        info!(
            db = %db.path().display(),
            model = agent_llm.model_name(),
            agents = ?router.agent_names(),
            "application context ready"
        );

        Ok(Self {
            config,
            db,
            audit,
            router: Arc::new(router),
        })
    }
}

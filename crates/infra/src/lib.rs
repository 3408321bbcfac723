//! `helios-infra`
//!
//! **Responsibility:** everything that touches the outside world on behalf of
//! the router: the SQLite database, the concrete ERP tools, the audit log,
//! configuration and the assembled application context.

pub mod audit;
pub mod config;
pub mod context;
pub mod db;
pub mod router;
mod schema;
pub mod tools;

pub use audit::{AuditError, AuditLog, InMemoryAuditLog, SqliteAuditLog};
pub use config::{AppConfig, ConfigError};
pub use context::{AppContext, ContextError};
pub use db::{Database, DbError, SystemInfo};
pub use router::{RouteOutcome, Router};
pub use tools::{ErpTool, build_registry};

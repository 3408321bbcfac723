//! `helios-ai`
//!
//! **Responsibility:** the LLM-facing boundary of the system.
//!
//! This crate is intentionally storage-agnostic:
//! - It must not open database connections; concrete ERP tools live in infra.
//! - Language models are reached through the [`LanguageModel`] trait so that
//!   tests can script them.
//! - Tool failures are values ([`ToolOutcome`]), not panics or errors, so the
//!   reasoning loop can react to them.

pub mod agent;
pub mod classify;
pub mod forecast;
pub mod gemini;
pub mod llm;
pub mod memory;
pub mod prompt;
pub mod react;
pub mod registry;
pub mod result;
pub mod retrieval;
pub mod tool;

pub use agent::{AgentError, AgentOutput, AgentTraceStep, DomainAgent};
pub use classify::{Classification, ClassificationSource, Classifier};
pub use gemini::{GeminiClient, GeminiConfig};
pub use llm::{LanguageModel, ScriptedLanguageModel, StaticLanguageModel};
pub use memory::{ConversationMemory, Turn};
pub use registry::{ToolDescriptor, ToolRegistry};
pub use result::{AiError, AiResult};
pub use tool::{Tool, ToolErrorKind, ToolOutcome};

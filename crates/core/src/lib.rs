//! `helios-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the business domains a request can be routed to, request identities and the
//! audit record shapes written by the router.

pub mod audit;
pub mod domain;
pub mod error;
pub mod id;

pub use audit::{
    ApprovalRecord, ApprovalStatus, ConversationRecord, NewApproval, NewConversation, NewToolCall,
    ToolCallRecord,
};
pub use domain::Domain;
pub use error::{DomainError, DomainResult};
pub use id::{SessionId, UserId};

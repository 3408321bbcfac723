//! `helios-governance`: risk gate in front of agent execution.
//!
//! This crate is intentionally decoupled from LLMs, HTTP and storage: it is a
//! pure, deterministic policy check over the request text.

pub mod check;
pub mod decision;
pub mod policy;

pub use check::{check, check_with};
pub use decision::{GovernanceDecision, RiskLevel};
pub use policy::GovernancePolicy;

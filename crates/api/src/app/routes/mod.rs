pub mod approvals;
pub mod chat;
pub mod system;

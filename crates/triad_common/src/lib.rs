//! Shared types for the triad pipeline service.
//!
//! Wire contracts for the HTTP surface, the fixed scripted exchanges sent to
//! each backend, provider response shapes with their text extraction paths,
//! and the `ChatBackend` seam (plus a recording fake for tests).

pub mod backend;
pub mod error;
pub mod prompts;
pub mod provider;
pub mod types;

pub use backend::{ChatBackend, FakeBackend};
pub use error::ProviderError;
pub use provider::{ChatMessage, ChatRequest, Role};
pub use types::{
    DirectRequest, ErrorBody, Stage1Request, Stage2Request, Stage3Request, StageReply,
    STATUS_DIRECT, STATUS_DRAFT, STATUS_POLISH, STATUS_REVIEW,
};

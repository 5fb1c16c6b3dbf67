//! Wire contracts for the HTTP surface.
//!
//! Field names follow the front-end's JSON (camelCase). Every request field
//! is defaulted so a missing field surfaces as an application-level 400 with
//! the JSON envelope instead of a framework rejection.

use serde::{Deserialize, Serialize};

/// Phase name reported with each stage reply.
pub const STATUS_DRAFT: &str = "Initial Analysis";
pub const STATUS_REVIEW: &str = "Review & Improvements";
pub const STATUS_POLISH: &str = "Final Refinement";
pub const STATUS_DIRECT: &str = "Response";

/// Request for the draft stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage1Request {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub use_provider_a: bool,
    #[serde(default)]
    pub selected_model: Option<String>,
}

/// Request for the review stage. No provider selector: the reviewer backend
/// is fixed, and any selector field present in the body is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage2Request {
    #[serde(default)]
    pub stage1_response: String,
}

/// Request for the polish stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage3Request {
    #[serde(default)]
    pub stage2_response: String,
    #[serde(default)]
    pub use_provider_a: bool,
    #[serde(default)]
    pub selected_model: Option<String>,
}

/// Request for the direct passthrough (no scripted wrapping).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub model: String,
}

/// Result of one stage, serialized straight back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageReply {
    pub content: String,
    pub model: String,
    pub status: String,
}

/// Uniform JSON error envelope. Validation failures carry only the summary;
/// backend failures also carry the upstream message in `details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

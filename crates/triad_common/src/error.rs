//! Provider error taxonomy.
//!
//! Failures talking to a remote backend are never recovered locally; the
//! message travels to the caller verbatim inside the JSON error envelope.

/// Errors from one outbound call to a remote AI backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("backend returned an empty reply")]
    EmptyReply,
}

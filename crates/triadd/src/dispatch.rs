//! Stage dispatcher.
//!
//! Given a stage and a provider selector, builds the scripted message
//! sequence, picks the backend, issues exactly one outbound call and
//! normalizes the reply into a `StageReply`. Validation happens before any
//! network call; the review stage is hard-wired to the reviewer backend and
//! ignores every selector.

use std::sync::Arc;

use triad_common::prompts::{
    review_messages, DIRECT_TEMPERATURE, DRAFT_SCRIPT, FEEDBACK_PROMPT_PREFIX,
    MAX_COMPLETION_TOKENS, POLISH_SCRIPT, STAGE_TEMPERATURE,
};
use triad_common::provider::{ChatMessage, Role};
use triad_common::types::{
    DirectRequest, Stage1Request, Stage2Request, Stage3Request, StageReply, STATUS_DIRECT,
    STATUS_DRAFT, STATUS_POLISH, STATUS_REVIEW,
};
use triad_common::{ChatBackend, ChatRequest, ProviderError};

use crate::server::AppState;

/// Model requested from the fixed provider.
pub const FIXED_MODEL: &str = "gpt-4";
/// Label reported for the fixed provider.
pub const FIXED_MODEL_LABEL: &str = "GPT-4";
/// Model requested from the reviewer backend.
pub const REVIEWER_MODEL: &str = "claude-3-5-sonnet-20241022";
/// Label reported for the reviewer backend.
pub const REVIEWER_LABEL: &str = "Claude";

/// Why a stage did not produce a reply.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A required field is missing or empty. Reported before any outbound
    /// call is attempted.
    #[error("{0}")]
    Invalid(&'static str),

    /// The remote backend failed; the upstream message is passed through.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Backend, request model and reported label for one selectable-stage call.
struct Selection {
    backend: Arc<dyn ChatBackend>,
    model: String,
    label: String,
}

/// Resolve the provider selector. Provider A needs a caller-supplied model;
/// provider B is pinned to the fixed model and label.
fn select(
    state: &AppState,
    use_provider_a: bool,
    selected_model: Option<&str>,
) -> Result<Selection, DispatchError> {
    if use_provider_a {
        let model = selected_model
            .filter(|m| !m.is_empty())
            .ok_or(DispatchError::Invalid("Model is required"))?;
        Ok(Selection {
            backend: state.selectable.clone(),
            model: model.to_string(),
            label: model.to_string(),
        })
    } else {
        Ok(Selection {
            backend: state.fixed.clone(),
            model: FIXED_MODEL.to_string(),
            label: FIXED_MODEL_LABEL.to_string(),
        })
    }
}

/// Draft stage: wrap the raw prompt in the draft script and send it to the
/// selected provider.
pub async fn run_stage1(
    state: &AppState,
    req: &Stage1Request,
) -> Result<StageReply, DispatchError> {
    if req.prompt.is_empty() {
        return Err(DispatchError::Invalid("Prompt is required"));
    }
    let selection = select(state, req.use_provider_a, req.selected_model.as_deref())?;

    let content = selection
        .backend
        .complete(&ChatRequest {
            model: selection.model,
            messages: DRAFT_SCRIPT.messages(&req.prompt),
            temperature: Some(STAGE_TEMPERATURE),
            max_tokens: MAX_COMPLETION_TOKENS,
            n: Some(1),
        })
        .await?;

    Ok(StageReply {
        content,
        model: selection.label,
        status: STATUS_DRAFT.to_string(),
    })
}

/// Review stage: always the reviewer backend, no provider choice.
pub async fn run_stage2(
    state: &AppState,
    req: &Stage2Request,
) -> Result<StageReply, DispatchError> {
    if req.stage1_response.is_empty() {
        return Err(DispatchError::Invalid("Stage 1 response is required"));
    }

    let content = state
        .reviewer
        .complete(&ChatRequest {
            model: REVIEWER_MODEL.to_string(),
            messages: review_messages(&req.stage1_response),
            temperature: None,
            max_tokens: MAX_COMPLETION_TOKENS,
            n: None,
        })
        .await?;

    Ok(StageReply {
        content,
        model: REVIEWER_LABEL.to_string(),
        status: STATUS_REVIEW.to_string(),
    })
}

/// Polish stage: wrap the reviewer feedback in the polish script and send
/// it back to the provider chosen for the draft.
pub async fn run_stage3(
    state: &AppState,
    req: &Stage3Request,
) -> Result<StageReply, DispatchError> {
    if req.stage2_response.is_empty() {
        return Err(DispatchError::Invalid("Stage 2 response is required"));
    }
    let selection = select(state, req.use_provider_a, req.selected_model.as_deref())?;

    let final_prompt = format!("{}{}", FEEDBACK_PROMPT_PREFIX, req.stage2_response);
    let content = selection
        .backend
        .complete(&ChatRequest {
            model: selection.model,
            messages: POLISH_SCRIPT.messages(&final_prompt),
            temperature: Some(STAGE_TEMPERATURE),
            max_tokens: MAX_COMPLETION_TOKENS,
            n: Some(1),
        })
        .await?;

    Ok(StageReply {
        content,
        model: selection.label,
        status: STATUS_POLISH.to_string(),
    })
}

/// Direct passthrough: the caller's prompt verbatim, single user turn, no
/// scripted wrapping.
pub async fn run_direct(
    state: &AppState,
    req: &DirectRequest,
) -> Result<StageReply, DispatchError> {
    if req.prompt.is_empty() || req.model.is_empty() {
        return Err(DispatchError::Invalid("Prompt and model are required"));
    }

    let content = state
        .selectable
        .complete(&ChatRequest {
            model: req.model.clone(),
            messages: vec![ChatMessage::new(Role::User, req.prompt.clone())],
            temperature: Some(DIRECT_TEMPERATURE),
            max_tokens: MAX_COMPLETION_TOKENS,
            n: None,
        })
        .await?;

    Ok(StageReply {
        content,
        model: req.model.clone(),
        status: STATUS_DIRECT.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use triad_common::FakeBackend;

    struct Fakes {
        selectable: Arc<FakeBackend>,
        fixed: Arc<FakeBackend>,
        reviewer: Arc<FakeBackend>,
    }

    fn state_with_fakes() -> (AppState, Fakes) {
        let selectable = Arc::new(FakeBackend::always("draft from selectable"));
        let fixed = Arc::new(FakeBackend::always("draft from fixed"));
        let reviewer = Arc::new(FakeBackend::always("review notes"));
        let state = AppState::new(selectable.clone(), fixed.clone(), reviewer.clone());
        (
            state,
            Fakes {
                selectable,
                fixed,
                reviewer,
            },
        )
    }

    fn stage1_request(prompt: &str) -> Stage1Request {
        Stage1Request {
            prompt: prompt.to_string(),
            use_provider_a: true,
            selected_model: Some("model-x".to_string()),
        }
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected_before_any_call() {
        let (state, fakes) = state_with_fakes();

        let err = run_stage1(&state, &stage1_request("")).await.unwrap_err();
        assert!(matches!(err, DispatchError::Invalid("Prompt is required")));
        assert_eq!(fakes.selectable.call_count(), 0);
        assert_eq!(fakes.fixed.call_count(), 0);
        assert_eq!(fakes.reviewer.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_a_without_model_is_rejected_before_any_call() {
        let (state, fakes) = state_with_fakes();

        let req = Stage1Request {
            prompt: "hello".to_string(),
            use_provider_a: true,
            selected_model: None,
        };
        let err = run_stage1(&state, &req).await.unwrap_err();
        assert!(matches!(err, DispatchError::Invalid("Model is required")));
        assert_eq!(fakes.selectable.call_count(), 0);
    }

    #[tokio::test]
    async fn stage1_on_provider_a_uses_caller_model_and_stage_knobs() {
        let (state, fakes) = state_with_fakes();

        let reply = run_stage1(&state, &stage1_request("explain tides"))
            .await
            .unwrap();
        assert_eq!(reply.content, "draft from selectable");
        assert_eq!(reply.model, "model-x");
        assert_eq!(reply.status, STATUS_DRAFT);

        assert_eq!(fakes.selectable.call_count(), 1);
        assert_eq!(fakes.fixed.call_count(), 0);
        let sent = &fakes.selectable.requests()[0];
        assert_eq!(sent.model, "model-x");
        assert_eq!(sent.temperature, Some(STAGE_TEMPERATURE));
        assert_eq!(sent.max_tokens, MAX_COMPLETION_TOKENS);
        assert_eq!(sent.n, Some(1));
        assert_eq!(sent.messages.len(), 4);
        assert!(sent.messages[3].content.ends_with("explain tides"));
    }

    #[tokio::test]
    async fn stage1_on_provider_b_pins_model_and_label() {
        let (state, fakes) = state_with_fakes();

        let req = Stage1Request {
            prompt: "hello".to_string(),
            use_provider_a: false,
            selected_model: None,
        };
        let reply = run_stage1(&state, &req).await.unwrap();
        assert_eq!(reply.model, FIXED_MODEL_LABEL);
        assert_eq!(fakes.fixed.call_count(), 1);
        assert_eq!(fakes.selectable.call_count(), 0);
        assert_eq!(fakes.fixed.requests()[0].model, FIXED_MODEL);
    }

    #[tokio::test]
    async fn stage2_always_hits_the_reviewer() {
        let (state, fakes) = state_with_fakes();

        let req = Stage2Request {
            stage1_response: "the draft".to_string(),
        };
        let reply = run_stage2(&state, &req).await.unwrap();
        assert_eq!(reply.content, "review notes");
        assert_eq!(reply.model, REVIEWER_LABEL);
        assert_eq!(reply.status, STATUS_REVIEW);

        assert_eq!(fakes.reviewer.call_count(), 1);
        assert_eq!(fakes.selectable.call_count(), 0);
        assert_eq!(fakes.fixed.call_count(), 0);

        let sent = &fakes.reviewer.requests()[0];
        assert_eq!(sent.model, REVIEWER_MODEL);
        assert_eq!(sent.temperature, None);
        assert_eq!(sent.n, None);
        assert!(sent.messages[2]
            .content
            .contains("Review this response and suggest specific improvements:\nthe draft"));
    }

    #[tokio::test]
    async fn stage2_rejects_missing_input_before_any_call() {
        let (state, fakes) = state_with_fakes();

        let err = run_stage2(&state, &Stage2Request::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Invalid("Stage 1 response is required")
        ));
        assert_eq!(fakes.reviewer.call_count(), 0);
    }

    #[tokio::test]
    async fn stage3_wraps_feedback_and_keeps_the_stage1_selector() {
        let (state, fakes) = state_with_fakes();

        let req = Stage3Request {
            stage2_response: "tighten the intro".to_string(),
            use_provider_a: true,
            selected_model: Some("model-x".to_string()),
        };
        let reply = run_stage3(&state, &req).await.unwrap();
        assert_eq!(reply.model, "model-x");
        assert_eq!(reply.status, STATUS_POLISH);

        let sent = &fakes.selectable.requests()[0];
        assert_eq!(sent.messages.len(), 3);
        assert!(sent.messages[2].content.ends_with(
            "Please improve your response based on this feedback:\ntighten the intro"
        ));
        assert_eq!(sent.temperature, Some(STAGE_TEMPERATURE));
    }

    #[tokio::test]
    async fn direct_call_sends_the_prompt_verbatim() {
        let (state, fakes) = state_with_fakes();

        let req = DirectRequest {
            prompt: "what is 2+2".to_string(),
            model: "model-x".to_string(),
        };
        let reply = run_direct(&state, &req).await.unwrap();
        assert_eq!(reply.model, "model-x");
        assert_eq!(reply.status, STATUS_DIRECT);

        let sent = &fakes.selectable.requests()[0];
        assert_eq!(sent.messages.len(), 1);
        assert_eq!(sent.messages[0].content, "what is 2+2");
        assert_eq!(sent.temperature, Some(DIRECT_TEMPERATURE));
        assert_eq!(sent.n, None);
    }

    #[tokio::test]
    async fn direct_call_requires_both_fields() {
        let (state, fakes) = state_with_fakes();

        let err = run_direct(
            &state,
            &DirectRequest {
                prompt: "hi".to_string(),
                model: String::new(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Invalid("Prompt and model are required")
        ));
        assert_eq!(fakes.selectable.call_count(), 0);
    }

    #[tokio::test]
    async fn backend_failure_passes_the_upstream_message_through() {
        let selectable = Arc::new(FakeBackend::always_error(ProviderError::Status {
            status: 429,
            body: "rate limit exceeded".to_string(),
        }));
        let state = AppState::new(
            selectable,
            Arc::new(FakeBackend::always("unused")),
            Arc::new(FakeBackend::always("unused")),
        );

        let err = run_stage1(&state, &stage1_request("hello")).await.unwrap_err();
        match err {
            DispatchError::Provider(e) => {
                assert!(e.to_string().contains("rate limit exceeded"));
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn identical_requests_yield_structurally_identical_replies() {
        let (state, _fakes) = state_with_fakes();

        let req = stage1_request("same prompt");
        let first = run_stage1(&state, &req).await.unwrap();
        let second = run_stage1(&state, &req).await.unwrap();
        assert_eq!(first, second);
    }
}

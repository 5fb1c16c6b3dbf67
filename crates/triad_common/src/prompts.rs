//! Fixed scripted exchanges for the three pipeline stages.
//!
//! The wording here is the entire prompt-engineering logic of the service
//! and is load-bearing: the draft script tells the first model its output
//! will be reviewed, the review script frames the second model as an
//! improver, and the polish script frames the first provider as the final
//! editor. Do not reword casually.

use crate::provider::{ChatMessage, Role};

/// Sampling temperature for the draft and polish stages.
pub const STAGE_TEMPERATURE: f32 = 1.0;
/// Sampling temperature for the direct passthrough.
pub const DIRECT_TEMPERATURE: f32 = 0.7;
/// Output cap applied to every call.
pub const MAX_COMPLETION_TOKENS: u32 = 1024;

/// A fixed scripted exchange: system framing, an optional simulated prior
/// user/assistant turn establishing role context, and a handoff prefix the
/// stage payload is appended to in a final user turn.
pub struct StageScript {
    pub system: &'static str,
    pub setup_user: Option<&'static str>,
    pub setup_assistant: &'static str,
    pub handoff_prefix: &'static str,
}

impl StageScript {
    /// Build the full message sequence with `payload` spliced into the
    /// final user turn.
    pub fn messages(&self, payload: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(4);
        messages.push(ChatMessage::new(Role::System, self.system));
        if let Some(setup) = self.setup_user {
            messages.push(ChatMessage::new(Role::User, setup));
        }
        messages.push(ChatMessage::new(Role::Assistant, self.setup_assistant));
        messages.push(ChatMessage::new(
            Role::User,
            format!("{}{}", self.handoff_prefix, payload),
        ));
        messages
    }
}

/// Draft stage: initial analysis, to be reviewed by another model.
pub const DRAFT_SCRIPT: StageScript = StageScript {
    system: "You are a helpful assistant.",
    setup_user: Some(
        "You're going to receive instructions in a moment which will then be passed to another LLM for review and improvement.",
    ),
    setup_assistant: "OK, I will ensure that I analyze the prompt to the best of my ability, and then send back a response to enable a thorough review and improvement from the next LLM to get my reply. I'll also be sure to clearly include instructions and context regarding the request, and the next steps.",
    handoff_prefix: "Great, here is the user's request, be sure to let the next LLM know that you'll be doing a final review of their reply. This is the request: \n",
};

/// Polish stage: final refinement after reviewer feedback. Three turns —
/// the setup user turn is deliberately absent.
pub const POLISH_SCRIPT: StageScript = StageScript {
    system: "You are a subject matter expert, who will receive a 2nd draft of a user-request, and is in charge of returning a final polished version. You've been instructed to review the previous LLM's response, and give your final version, using any and all context in the provided message.",
    setup_user: None,
    setup_assistant: "OK, I will ensure that I analyze the prompt to the best of my ability, and then send back a response that an experienced consultant with years of experience might share, using the message from the previous LLM to formulate my reply. I'll also be sure to clearly explain that my response is the third and final review step completed by an LLM, in my final presentation of the work that my fellow LLMs and I have conducted",
    handoff_prefix: "Great, here is the reply that the LLM gave, do your best to formulate this into a great final prompt for the user! ",
};

/// Prefix wrapped around the draft output before it reaches the reviewer.
pub const REVIEW_PROMPT_PREFIX: &str =
    "Review this response and suggest specific improvements:\n";

/// Prefix wrapped around the reviewer output before the polish stage.
pub const FEEDBACK_PROMPT_PREFIX: &str =
    "Please improve your response based on this feedback:\n";

const REVIEW_INTRO: &str = "Hello, Claude you're going to be reviewing and improving some work from another LLM today, do your best to give the user the best possible version of their request by improving on the other LLM's work";
const REVIEW_ACK: &str =
    "Absolutely, this sounds like a great way to refine and improve a user's request!";
const REVIEW_HANDOFF_PREFIX: &str = "Ok here's the message";

/// Review stage messages. The reviewer backend takes no system turn; the
/// exchange is user/assistant/user with the wrapped draft appended to the
/// final turn (no separator after the handoff text).
pub fn review_messages(stage1_response: &str) -> Vec<ChatMessage> {
    let review_prompt = format!("{}{}", REVIEW_PROMPT_PREFIX, stage1_response);
    vec![
        ChatMessage::new(Role::User, REVIEW_INTRO),
        ChatMessage::new(Role::Assistant, REVIEW_ACK),
        ChatMessage::new(
            Role::User,
            format!("{}{}", REVIEW_HANDOFF_PREFIX, review_prompt),
        ),
    ]
}

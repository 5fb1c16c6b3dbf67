//! Configuration for triadd.
//!
//! Everything comes from the environment, read once at startup: one API key
//! per remote backend (required), optional base-URL overrides for pointing
//! the clients at a stub in tests, and the listening port.

use anyhow::{Context, Result};

/// Default listening port when PORT is unset.
pub const DEFAULT_PORT: u16 = 3001;

const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Process-wide settings, immutable after startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub groq_api_key: String,
    pub groq_base_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub anthropic_api_key: String,
    pub anthropic_base_url: String,
}

impl Config {
    /// Load from the environment. Fails fast when a credential is missing
    /// so a misconfigured deploy dies at startup, not on the first request.
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {raw}"))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            groq_api_key: required("GROQ_API_KEY")?,
            groq_base_url: optional("GROQ_BASE_URL", DEFAULT_GROQ_BASE_URL),
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_base_url: optional("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            anthropic_api_key: required("ANTHROPIC_API_KEY")?,
            anthropic_base_url: optional("ANTHROPIC_BASE_URL", DEFAULT_ANTHROPIC_BASE_URL),
        })
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set"))
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

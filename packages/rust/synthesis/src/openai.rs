//! OpenAI-compatible chat-completions synthesizer.
//!
//! Posts an article prompt to `{endpoint}/chat/completions` and returns the
//! first choice's message content as the HTML fragment.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use pageforge_shared::{Language, OpenAiConfig, PageForgeError, Result};

use crate::{Synthesizer, article_prompt};

/// User-Agent string for synthesis requests.
const USER_AGENT: &str = concat!("pageforge/", env!("CARGO_PKG_VERSION"));

/// Request timeout; article generation is slow compared to ordinary HTTP.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Sampling temperature for article generation.
const TEMPERATURE: f64 = 0.7;

// ---------------------------------------------------------------------------
// Wire types (chat-completions subset)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

// ---------------------------------------------------------------------------
// Synthesizer
// ---------------------------------------------------------------------------

/// Synthesizer backed by an OpenAI-compatible chat-completions API.
#[derive(Debug)]
pub struct OpenAiSynthesizer {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiSynthesizer {
    /// Create a synthesizer from config, reading the API key from the
    /// configured environment variable.
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            PageForgeError::config(format!(
                "environment variable {} is not set",
                config.api_key_env
            ))
        })?;
        Self::with_api_key(&config.endpoint, &config.model, &api_key)
    }

    /// Create a synthesizer with an explicit API key and endpoint.
    pub fn with_api_key(endpoint: &str, model: &str, api_key: &str) -> Result<Self> {
        // Validate early so a bad endpoint fails the run before the loop starts.
        Url::parse(endpoint).map_err(|e| {
            PageForgeError::config(format!("invalid synthesis endpoint '{endpoint}': {e}"))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                PageForgeError::Generation(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl Synthesizer for OpenAiSynthesizer {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[instrument(skip(self), fields(model = %self.model))]
    async fn synthesize(
        &self,
        keyword: &str,
        content_length: u32,
        language: Language,
    ) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: article_prompt(keyword, content_length, language),
            }],
            temperature: TEMPERATURE,
        };

        let url = format!("{}/chat/completions", self.endpoint);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PageForgeError::Generation(format!("{keyword}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PageForgeError::Generation(format!(
                "{keyword}: HTTP {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| PageForgeError::Generation(format!("{keyword}: invalid response: {e}")))?;

        let fragment = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                PageForgeError::Generation(format!("{keyword}: response contains no choices"))
            })?;

        debug!(keyword, len = fragment.len(), "article fragment received");
        Ok(fragment.trim().to_string())
    }
}

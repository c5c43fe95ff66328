//! Content synthesis boundary.
//!
//! A [`Synthesizer`] turns a keyword into an HTML article fragment. The
//! archive pipeline treats the backend as opaque: it may fail per keyword,
//! and a failure never aborts the run. Two implementations are provided:
//! [`OpenAiSynthesizer`] calling an OpenAI-compatible chat-completions API,
//! and [`StubSynthesizer`] producing deterministic placeholder copy for
//! offline runs and tests.

mod openai;
mod stub;

pub use openai::OpenAiSynthesizer;
pub use stub::StubSynthesizer;

use async_trait::async_trait;

use pageforge_shared::{Language, Result};

/// A content backend that produces an HTML article fragment per keyword.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Backend name for logs and the run summary.
    fn name(&self) -> &'static str;

    /// Generate an HTML fragment for `keyword`, aiming for roughly
    /// `content_length` words in `language`.
    ///
    /// Errors map to [`pageforge_shared::PageForgeError::Generation`] and are
    /// recovered at the keyword-iteration boundary by the caller.
    async fn synthesize(
        &self,
        keyword: &str,
        content_length: u32,
        language: Language,
    ) -> Result<String>;
}

/// Build the article prompt sent to LLM-backed synthesizers.
pub(crate) fn article_prompt(keyword: &str, content_length: u32, language: Language) -> String {
    format!(
        "Write a friendly introductory article about {keyword}.\n\
         Structure it like this:\n\
         1. An introduction to {keyword} — what it is and why it matters\n\
         2. The important things people should know about {keyword}\n\
         3. Practical tips and tricks for getting better at {keyword}\n\
         4. Future trends and predictions around {keyword}\n\
         5. A short summary with easy-to-follow advice on {keyword}\n\
         \n\
         Keep the tone conversational and easy to read — a chat with friends, \
         not a lecture. Aim for about {content_length} words and write in \
         {language}.\n\
         Return only an HTML fragment using <h2> and <p> tags, with no \
         enclosing <html> or <body> elements."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_all_request_fields() {
        let prompt = article_prompt("sourdough baking", 800, Language::Italian);
        assert!(prompt.contains("sourdough baking"));
        assert!(prompt.contains("800 words"));
        assert!(prompt.contains("Italian"));
    }
}

//! Deterministic offline synthesizer.
//!
//! Produces a fixed paragraph/heading fragment embedding the keyword and
//! language. Used by `generate --offline` and by pipeline tests that need
//! reproducible content without a network dependency.

use pageforge_shared::{Language, Result};

use crate::Synthesizer;

/// Synthesizer that fabricates placeholder article copy locally.
pub struct StubSynthesizer;

const FILLER: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, \
sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";

#[async_trait::async_trait]
impl Synthesizer for StubSynthesizer {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn synthesize(
        &self,
        keyword: &str,
        _content_length: u32,
        language: Language,
    ) -> Result<String> {
        let mut fragment = String::new();
        fragment.push_str(&format!(
            "<p>Placeholder article for {keyword}, written in {language}. {FILLER}</p>"
        ));
        for heading in ["Getting started with", "More about"] {
            fragment.push_str(&format!("<h2>{heading} {keyword}</h2>"));
            fragment.push_str(&format!(
                "<p>Placeholder section on {keyword} in {language}. {FILLER}</p>"
            ));
        }
        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_is_deterministic() {
        let stub = StubSynthesizer;
        let a = stub.synthesize("tea", 500, Language::French).await.unwrap();
        let b = stub.synthesize("tea", 500, Language::French).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn stub_embeds_keyword_and_language() {
        let stub = StubSynthesizer;
        let fragment = stub
            .synthesize("cold brew", 500, Language::Spanish)
            .await
            .unwrap();
        assert!(fragment.contains("cold brew"));
        assert!(fragment.contains("Spanish"));
        assert!(fragment.contains("<h2>"));
    }
}

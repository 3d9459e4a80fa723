//! Prompt assistant: asks the language model to write or enhance a
//! generation prompt for the current form state.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::request::{MediaKind, RequestForm};
use crate::service::{GenerationError, GenerationService};

/// Model used for prompt suggestions.
pub const PROMPT_MODEL: &str = "openrouter/claude-sonnet-4";

const ASSISTANT_SYSTEM_PROMPT: &str = "You are a creative AI prompt engineer specialized in \
generating detailed prompts for image and video generation. Return only the clean prompt \
without any prefixes, labels, or formatting.";

pub struct PromptAssistant {
    service: Arc<dyn GenerationService>,
}

impl PromptAssistant {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self { service }
    }

    /// Suggest a prompt for the form. Enhances the existing prompt text when
    /// there is any, otherwise writes one from scratch for the active media
    /// kind and style. The form itself is not modified.
    pub async fn suggest(&self, form: &RequestForm) -> Result<String, GenerationError> {
        let target = match form.media_kind {
            MediaKind::Image => "image generation",
            MediaKind::Video if form.source_video.is_some() => "video transformation",
            MediaKind::Video => "video generation",
        };
        let style_context = form.style.description();
        let existing = form.prompt.trim();

        let request = if existing.is_empty() {
            format!(
                "Generate a creative and detailed prompt for {target} with {style_context} style. \
                 The prompt should be descriptive, specific, and optimized for AI generation. \
                 Include visual details, composition, mood, and artistic elements."
            )
        } else {
            format!(
                "Enhance and expand this prompt: \"{existing}\" for {target} with \
                 {style_context} style. Make it more detailed, descriptive, and optimized for AI \
                 generation. Include visual details, composition, mood, lighting, and artistic \
                 elements while keeping the core concept of the original prompt."
            )
        };

        let reply = self
            .service
            .complete(PROMPT_MODEL, ASSISTANT_SYSTEM_PROMPT, &request)
            .await?;
        Ok(scrub_reply(&reply))
    }
}

/// Strip the boilerplate the model tends to wrap suggestions in, despite the
/// system prompt asking it not to.
fn scrub_reply(reply: &str) -> String {
    static PREFIXES: OnceLock<[Regex; 4]> = OnceLock::new();
    static TRAILING_QUOTE: OnceLock<Regex> = OnceLock::new();

    let prefixes = PREFIXES.get_or_init(|| {
        [
            Regex::new(r"(?i)^Here's an enhanced and expanded prompt for .*?:").unwrap(),
            Regex::new(r"(?i)^\*\*Enhanced .*? Prompt:\*\*").unwrap(),
            Regex::new(r"(?i)^Enhanced .*?:").unwrap(),
            Regex::new(r#"(?i)^.*?:\s*""#).unwrap(),
        ]
    });
    let trailing = TRAILING_QUOTE.get_or_init(|| Regex::new(r#""\s*$"#).unwrap());

    let mut cleaned = reply.to_string();
    for prefix in prefixes.iter() {
        cleaned = prefix.replace(&cleaned, "").into_owned();
    }
    cleaned = trailing.replace(&cleaned, "").into_owned();
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Style;
    use async_trait::async_trait;

    #[test]
    fn test_scrub_strips_labelled_prefix() {
        let reply = "Enhanced Image Prompt: a lighthouse on a cliff at dusk";
        assert_eq!(scrub_reply(reply), "a lighthouse on a cliff at dusk");
    }

    #[test]
    fn test_scrub_strips_labelled_quote_wrapper() {
        let reply = "Your prompt: \"a lighthouse on a cliff\"";
        assert_eq!(scrub_reply(reply), "a lighthouse on a cliff");
    }

    #[test]
    fn test_scrub_strips_enhanced_prefix() {
        let reply = "Here's an enhanced and expanded prompt for image generation: now with fog";
        assert_eq!(scrub_reply(reply), "now with fog");
    }

    #[test]
    fn test_scrub_leaves_clean_reply_alone() {
        let reply = "a lighthouse on a cliff at dusk, volumetric fog";
        assert_eq!(scrub_reply(reply), reply);
    }

    struct CannedService(&'static str);

    #[async_trait]
    impl GenerationService for CannedService {
        async fn complete(
            &self,
            model: &str,
            _system: &str,
            user: &str,
        ) -> Result<String, GenerationError> {
            assert_eq!(model, PROMPT_MODEL);
            // Echo back whether we were asked to enhance or invent.
            if user.starts_with("Enhance and expand") {
                Ok(format!("Enhanced Prompt: {}", self.0))
            } else {
                Ok(self.0.to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_suggest_enhances_existing_prompt() {
        let assistant = PromptAssistant::new(Arc::new(CannedService("a neon alley in the rain")));
        let mut form = RequestForm::new(MediaKind::Image);
        form.prompt = "neon alley".to_string();
        form.style = Style::Cyberpunk;

        let suggestion = assistant.suggest(&form).await.unwrap();
        assert_eq!(suggestion, "a neon alley in the rain");
    }

    #[tokio::test]
    async fn test_suggest_writes_fresh_prompt_for_empty_form() {
        let assistant = PromptAssistant::new(Arc::new(CannedService("a windswept dune at noon")));
        let form = RequestForm::new(MediaKind::Video);
        let suggestion = assistant.suggest(&form).await.unwrap();
        assert_eq!(suggestion, "a windswept dune at noon");
    }
}

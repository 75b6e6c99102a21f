use crate::providers::MediaProvider;
use crate::types::{PromptEnhancement, StyleModifiers};

/// Explanation attached when enhancement falls back to the raw concept.
pub const FALLBACK_EXPLANATION: &str = "Failed to enhance prompt. Using original.";

/// Expand a concept into a detailed generation prompt.
///
/// Total: a single attempt against the provider, and any failure (or an
/// empty prompt coming back) degrades to the original concept so that
/// downstream generation always has a usable prompt. Errors are logged,
/// never propagated.
pub async fn enhance_with_fallback(
    provider: &dyn MediaProvider,
    concept: &str,
    modifiers: &StyleModifiers,
) -> PromptEnhancement {
    match provider.enhance(concept, modifiers).await {
        Ok(enhancement) if !enhancement.enhanced_prompt.trim().is_empty() => enhancement,
        Ok(_) => {
            tracing::warn!(
                target: "genmedia",
                "enhancement returned an empty prompt, using original concept"
            );
            fallback(concept)
        }
        Err(err) => {
            tracing::warn!(target: "genmedia", "enhancement failed: {err}, using original concept");
            fallback(concept)
        }
    }
}

fn fallback(concept: &str) -> PromptEnhancement {
    PromptEnhancement {
        enhanced_prompt: concept.to_string(),
        explanation: FALLBACK_EXPLANATION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::{MockProvider, MockScript};
    use crate::providers::ProviderError;
    use std::collections::VecDeque;

    #[tokio::test]
    async fn falls_back_to_concept_on_provider_error() {
        let provider = MockProvider::with_script(MockScript {
            enhance: VecDeque::from([Err(ProviderError::transport("connection reset"))]),
            ..Default::default()
        });

        let result =
            enhance_with_fallback(&provider, "a lighthouse at dusk", &StyleModifiers::default())
                .await;

        assert_eq!(result.enhanced_prompt, "a lighthouse at dusk");
        assert_eq!(result.explanation, FALLBACK_EXPLANATION);
    }

    #[tokio::test]
    async fn falls_back_when_enhanced_prompt_is_blank() {
        let provider = MockProvider::with_script(MockScript {
            enhance: VecDeque::from([Ok(PromptEnhancement {
                enhanced_prompt: "   ".to_string(),
                explanation: "polished".to_string(),
            })]),
            ..Default::default()
        });

        let result = enhance_with_fallback(&provider, "a tin robot", &StyleModifiers::default())
            .await;

        assert_eq!(result.enhanced_prompt, "a tin robot");
    }

    #[tokio::test]
    async fn passes_through_a_successful_enhancement() {
        let provider = MockProvider::new();

        let result = enhance_with_fallback(&provider, "a tin robot", &StyleModifiers::default())
            .await;

        assert!(result.enhanced_prompt.contains("a tin robot"));
        assert_ne!(result.explanation, FALLBACK_EXPLANATION);
    }
}

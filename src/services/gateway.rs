use anyhow::Result;
use log::{debug, info, warn};

use crate::core::config::Config;
use crate::services::fallback::{get_fallback, FallbackContext};
use crate::services::llm::{create_llm, CompletionParams, LlmClient};

#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    pub response_type: String,
    pub extra_context: FallbackContext,
}

/// Single entry point for generated text. Every call yields text: backend
/// output when it works, canned text otherwise.
#[derive(Debug)]
pub struct GenerationGateway {
    llm: Option<Box<dyn LlmClient>>,
}

impl GenerationGateway {
    /// Builds the backend client when a usable credential is configured;
    /// otherwise the gateway runs in demo mode.
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.llm.credential() {
            Some(key) => {
                info!(
                    "Using {} backend with model {}",
                    config.llm.provider,
                    config.llm.model()
                );
                Ok(Self::with_client(create_llm(&config.llm, key)?))
            }
            None => {
                info!("No API key configured, serving demo responses");
                Ok(Self::offline())
            }
        }
    }

    pub fn with_client(llm: Box<dyn LlmClient>) -> Self {
        Self { llm: Some(llm) }
    }

    pub fn offline() -> Self {
        Self { llm: None }
    }

    pub fn is_online(&self) -> bool {
        self.llm.is_some()
    }

    pub async fn generate(&self, prompt: &str, options: &GenerationOptions) -> String {
        let Some(llm) = &self.llm else {
            return get_fallback(&options.response_type, &options.extra_context);
        };

        let params = CompletionParams {
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        debug!(
            "Requesting {} ({} tokens, temperature {})",
            options.response_type, params.max_tokens, params.temperature
        );

        match llm.complete(prompt, &params).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("{} generation failed, using fallback: {}", options.response_type, e);
                get_fallback(&options.response_type, &options.extra_context)
            }
        }
    }
}

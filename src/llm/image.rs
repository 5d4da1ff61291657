//! Text-to-image generation

use crate::error::Result;
use async_trait::async_trait;

/// Prompt limit accepted by the image model
pub const MAX_PROMPT_CHARS: usize = 4000;

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image, returning its URL
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Clip a prompt to `MAX_PROMPT_CHARS` characters
pub fn clip_prompt(prompt: &str) -> &str {
    match prompt.char_indices().nth(MAX_PROMPT_CHARS) {
        Some((end, _)) => &prompt[..end],
        None => prompt,
    }
}

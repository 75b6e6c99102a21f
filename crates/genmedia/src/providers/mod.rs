pub mod gemini;
pub mod mock;

use crate::types::{
    AspectRatio, ImageResolution, MediaLocation, PromptEnhancement, StyleModifiers,
    VideoJobHandle, VideoJobStatus,
};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("configuration: {0}")]
    Configuration(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("requested capability is not available to the current key")]
    Entitlement,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("generation job did not finish within the poll budget")]
    TimedOut,
}

impl ProviderError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        ProviderError::Configuration(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        ProviderError::Transport(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        ProviderError::InvalidResponse(msg.into())
    }

    pub fn is_entitlement(&self) -> bool {
        matches!(self, ProviderError::Entitlement)
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

/// Remote generation service, at the capability-call level.
///
/// Video generation is asynchronous on the service side: `start_video`
/// returns a job handle, `poll_video` checks it, and `fetch_video`
/// materialises the finished asset. The poll loop itself lives in
/// [`crate::generation`] so every provider shares the same pacing.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn enhance(
        &self,
        concept: &str,
        modifiers: &StyleModifiers,
    ) -> Result<PromptEnhancement, ProviderError>;

    async fn generate_image(
        &self,
        prompt: &str,
        aspect: AspectRatio,
        resolution: ImageResolution,
    ) -> Result<MediaLocation, ProviderError>;

    async fn start_video(
        &self,
        prompt: &str,
        aspect: AspectRatio,
        duration_secs: u32,
    ) -> Result<VideoJobHandle, ProviderError>;

    async fn poll_video(&self, job: &VideoJobHandle) -> Result<VideoJobStatus, ProviderError>;

    async fn fetch_video(&self, video_uri: &str) -> Result<MediaLocation, ProviderError>;
}

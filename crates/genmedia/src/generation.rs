use crate::providers::{MediaProvider, ProviderError};
use crate::types::{AspectRatio, ImageResolution, MediaKind, MediaLocation, VideoJobStatus};
use std::time::Duration;

/// Pacing for the video job poll loop. The service gives no completion
/// callback, so the step re-checks on a fixed interval; `max_attempts`
/// bounds the loop instead of letting a stuck job spin forever.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 120,
        }
    }
}

/// Dispatch to the image or video path. Errors propagate: a missing
/// media asset has no sensible fallback.
pub async fn generate_media(
    provider: &dyn MediaProvider,
    kind: MediaKind,
    prompt: &str,
    aspect: AspectRatio,
    resolution: ImageResolution,
    duration_secs: u32,
    policy: PollPolicy,
) -> Result<MediaLocation, ProviderError> {
    match kind {
        MediaKind::Image => provider.generate_image(prompt, aspect, resolution).await,
        MediaKind::Video => generate_video(provider, prompt, aspect, duration_secs, policy).await,
    }
}

/// Submit a video job, poll it to completion, then fetch the asset.
pub async fn generate_video(
    provider: &dyn MediaProvider,
    prompt: &str,
    aspect: AspectRatio,
    duration_secs: u32,
    policy: PollPolicy,
) -> Result<MediaLocation, ProviderError> {
    let job = provider.start_video(prompt, aspect, duration_secs).await?;
    tracing::info!(target: "genmedia", "video job {} submitted", job.0);

    let mut attempts = 0u32;
    let video_uri = loop {
        match provider.poll_video(&job).await? {
            VideoJobStatus::Complete { video_uri } => break video_uri,
            VideoJobStatus::Pending => {}
        }
        attempts += 1;
        if attempts >= policy.max_attempts {
            tracing::warn!(
                target: "genmedia",
                "video job {} still pending after {} checks",
                job.0,
                attempts
            );
            return Err(ProviderError::TimedOut);
        }
        tokio::time::sleep(policy.interval).await;
    };

    provider.fetch_video(&video_uri).await
}

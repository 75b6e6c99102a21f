use chrono::{DateTime, Utc};
use genmedia::{AspectRatio, ImageResolution, MediaKind, MediaLocation, StyleModifiers};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_VIDEO_DURATION_SECS: u32 = 4;
pub const MAX_VIDEO_DURATION_SECS: u32 = 12;

/// One user-initiated generation, built per action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub concept: String,
    pub modifiers: StyleModifiers,
    pub media_kind: MediaKind,
    pub aspect_ratio: AspectRatio,
    pub image_resolution: ImageResolution,
    pub video_duration_secs: u32,
}

impl GenerationRequest {
    pub fn new(concept: impl Into<String>, media_kind: MediaKind) -> Self {
        Self {
            concept: concept.into(),
            modifiers: StyleModifiers::default(),
            media_kind,
            aspect_ratio: AspectRatio::Square,
            image_resolution: ImageResolution::Standard,
            video_duration_secs: crate::options::DEFAULT_VIDEO_DURATION_SECS,
        }
    }

    pub fn clamped_duration_secs(&self) -> u32 {
        self.video_duration_secs
            .clamp(MIN_VIDEO_DURATION_SECS, MAX_VIDEO_DURATION_SECS)
    }

    /// High-resolution images and all video need an elevated key.
    pub fn requires_elevated_access(&self) -> bool {
        matches!(self.media_kind, MediaKind::Video)
            || self.image_resolution.requires_quality_tier()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Pending,
    Ready,
    Failed,
}

/// Snapshot of one generation attempt. Immutable: every transition
/// produces a new value which is republished wholesale, so a stale
/// completion can never half-update a newer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub id: Uuid,
    pub original_concept: String,
    pub enhanced_prompt: String,
    pub media_kind: MediaKind,
    pub media: Option<MediaLocation>,
    pub state: Lifecycle,
    pub failure: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GenerationRecord {
    fn new(
        original_concept: &str,
        enhanced_prompt: &str,
        media_kind: MediaKind,
        state: Lifecycle,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_concept: original_concept.to_string(),
            enhanced_prompt: enhanced_prompt.to_string(),
            media_kind,
            media: None,
            state,
            failure: None,
            created_at: Utc::now(),
        }
    }

    pub fn pending(original_concept: &str, enhanced_prompt: &str, media_kind: MediaKind) -> Self {
        Self::new(original_concept, enhanced_prompt, media_kind, Lifecycle::Pending)
    }

    /// Prompt-only snapshot: the refined prompt is inspectable before
    /// the user commits to media generation.
    pub fn enhanced_only(
        original_concept: &str,
        enhanced_prompt: &str,
        media_kind: MediaKind,
    ) -> Self {
        Self::new(original_concept, enhanced_prompt, media_kind, Lifecycle::Ready)
    }

    pub fn into_ready(mut self, media: MediaLocation) -> Self {
        self.media = Some(media);
        self.state = Lifecycle::Ready;
        self.failure = None;
        self
    }

    pub fn into_failed(mut self, message: impl Into<String>) -> Self {
        self.media = None;
        self.state = Lifecycle::Failed;
        self.failure = Some(message.into());
        self
    }

    pub fn is_pending(&self) -> bool {
        self.state == Lifecycle::Pending
    }
}

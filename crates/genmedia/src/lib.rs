/// Generative-media capability layer
///
/// Provides the domain model for prompt-to-media generation, the
/// provider abstraction over the remote generation service, and the
/// enhancement / generation steps that drive it.
pub mod enhance;
pub mod generation;
pub mod providers;
pub mod types;

pub use enhance::enhance_with_fallback;
pub use generation::{generate_media, generate_video, PollPolicy};
pub use providers::{MediaProvider, ProviderError};
pub use types::{
    AspectRatio, ImageResolution, MediaKind, MediaLocation, PromptEnhancement, StyleModifiers,
    VideoAspect, VideoJobHandle, VideoJobStatus,
};

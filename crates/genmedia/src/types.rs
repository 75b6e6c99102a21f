use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Kind of media a generation request produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// Frame shape requested by the user. All five ratios are valid for
/// image generation; video collapses to [`VideoAspect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    Square,
    Landscape,
    Portrait,
    FourThirds,
    ThreeFourths,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::FourThirds => "4:3",
            Self::ThreeFourths => "3:4",
        }
    }

    /// The video service only accepts 16:9 or 9:16. Taller-than-wide
    /// requests collapse to portrait, everything else to landscape.
    /// This is a fixed policy table, and it is lossy on purpose.
    pub fn video_aspect(&self) -> VideoAspect {
        match self {
            Self::Portrait | Self::ThreeFourths => VideoAspect::Portrait,
            Self::Square | Self::Landscape | Self::FourThirds => VideoAspect::Landscape,
        }
    }

    pub fn all() -> [AspectRatio; 5] {
        [
            Self::Square,
            Self::Landscape,
            Self::Portrait,
            Self::FourThirds,
            Self::ThreeFourths,
        ]
    }
}

/// Aspect ratios the video service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoAspect {
    Landscape,
    Portrait,
}

impl VideoAspect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
        }
    }
}

/// Image output tier. Standard routes to the fast model; High and Ultra
/// route to the quality model, which requires elevated access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageResolution {
    Standard,
    High,
    Ultra,
}

impl ImageResolution {
    pub fn as_size_str(&self) -> &'static str {
        match self {
            Self::Standard => "1K",
            Self::High => "2K",
            Self::Ultra => "4K",
        }
    }

    pub fn requires_quality_tier(&self) -> bool {
        !matches!(self, Self::Standard)
    }
}

/// Optional descriptive axes woven into the enhancement request.
/// An unset axis means "let the model decide".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleModifiers {
    pub medium: Option<String>,
    pub style: Option<String>,
    pub lighting: Option<String>,
    pub camera: Option<String>,
    pub mood: Option<String>,
}

impl StyleModifiers {
    pub fn axes(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("Medium", self.medium.as_deref()),
            ("Style", self.style.as_deref()),
            ("Lighting", self.lighting.as_deref()),
            ("Camera", self.camera.as_deref()),
            ("Mood", self.mood.as_deref()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.axes().iter().all(|(_, value)| {
            value.map(|v| v.trim().is_empty()).unwrap_or(true)
        })
    }
}

/// Opaque dereferenceable handle to a produced asset: a self-contained
/// data URL for inline image bytes, or a local file for fetched video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaLocation {
    DataUrl(String),
    File(PathBuf),
}

impl fmt::Display for MediaLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataUrl(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Result of the enhancement step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptEnhancement {
    pub enhanced_prompt: String,
    pub explanation: String,
}

/// Opaque reference to an in-progress asynchronous video generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoJobHandle(pub String);

/// Outcome of one status check against a video job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoJobStatus {
    Pending,
    Complete { video_uri: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_aspect_mapping_is_total() {
        assert_eq!(AspectRatio::Portrait.video_aspect(), VideoAspect::Portrait);
        assert_eq!(
            AspectRatio::ThreeFourths.video_aspect(),
            VideoAspect::Portrait
        );
        assert_eq!(AspectRatio::Square.video_aspect(), VideoAspect::Landscape);
        assert_eq!(
            AspectRatio::Landscape.video_aspect(),
            VideoAspect::Landscape
        );
        assert_eq!(
            AspectRatio::FourThirds.video_aspect(),
            VideoAspect::Landscape
        );
    }

    #[test]
    fn test_resolution_tiers() {
        assert!(!ImageResolution::Standard.requires_quality_tier());
        assert!(ImageResolution::High.requires_quality_tier());
        assert!(ImageResolution::Ultra.requires_quality_tier());
        assert_eq!(ImageResolution::Ultra.as_size_str(), "4K");
    }

    #[test]
    fn test_modifiers_empty_when_blank() {
        let mut modifiers = StyleModifiers::default();
        assert!(modifiers.is_empty());
        modifiers.style = Some("  ".to_string());
        assert!(modifiers.is_empty());
        modifiers.mood = Some("Epic".to_string());
        assert!(!modifiers.is_empty());
    }
}

use genmedia::{AspectRatio, ImageResolution};

/// Descriptive-axis vocabulary offered by the editor panel. Free text is
/// equally valid; these are suggestions, not constraints.
pub const MEDIUM_OPTIONS: [&str; 9] = [
    "Photography",
    "3D Render",
    "Digital Illustration",
    "Oil Painting",
    "Cinematic Film",
    "Anime/Manga",
    "Concept Art",
    "Polaroid",
    "Isometric",
];

pub const STYLE_OPTIONS: [&str; 10] = [
    "Cyberpunk",
    "Minimalist",
    "Surrealism",
    "Steampunk",
    "Vaporwave",
    "Noir",
    "Studio Ghibli",
    "Pixar Style",
    "Hyperrealistic",
    "Abstract",
];

pub const LIGHTING_OPTIONS: [&str; 9] = [
    "Golden Hour",
    "Studio Lighting",
    "Neon Lights",
    "Cinematic Lighting",
    "Natural Light",
    "Bioluminescent",
    "Volumetric Fog",
    "Rembrandt",
    "Softbox",
];

pub const CAMERA_OPTIONS: [&str; 9] = [
    "Wide Angle",
    "Telephoto",
    "Macro",
    "Drone View",
    "Fisheye",
    "Bokeh",
    "Top-Down",
    "GoPro",
    "First-Person",
];

pub const MOOD_OPTIONS: [&str; 9] = [
    "Epic",
    "Melancholic",
    "Whimsical",
    "Dark",
    "Ethereal",
    "Energetic",
    "Peaceful",
    "Chaotic",
    "Romantic",
];

pub const DEFAULT_VIDEO_DURATION_SECS: u32 = 8;

pub fn aspect_ratio_label(ratio: AspectRatio) -> &'static str {
    match ratio {
        AspectRatio::Square => "1:1 Square",
        AspectRatio::Landscape => "16:9 Landscape",
        AspectRatio::Portrait => "9:16 Portrait",
        AspectRatio::FourThirds => "4:3 Classic",
        AspectRatio::ThreeFourths => "3:4 Vertical",
    }
}

pub fn resolution_label(resolution: ImageResolution) -> &'static str {
    match resolution {
        ImageResolution::Standard => "Standard (1K)",
        ImageResolution::High => "High (2K)",
        ImageResolution::Ultra => "Ultra (4K)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_aspect_ratio_has_a_label() {
        for ratio in AspectRatio::all() {
            assert!(!aspect_ratio_label(ratio).is_empty());
        }
    }
}

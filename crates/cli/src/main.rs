use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use genmedia::providers::gemini::{GeminiConfig, GeminiProvider};
use genmedia::{AspectRatio, ImageResolution, MediaKind, StyleModifiers};
use std::path::PathBuf;
use std::sync::Arc;
use studio::{
    AccessProvider, GenerationRequest, Lifecycle, Studio, CAMERA_OPTIONS, LIGHTING_OPTIONS,
    MEDIUM_OPTIONS, MOOD_OPTIONS, STYLE_OPTIONS,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "mirage-cli")]
#[command(about = "Mirage - prompt-to-media generation from the command line")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    /// Gemini API key; defaults to the GEMINI_API_KEY environment variable
    #[arg(long, global = true)]
    api_key: Option<String>,
}

#[derive(clap::Args)]
struct ModifierArgs {
    #[arg(long)]
    medium: Option<String>,

    #[arg(long)]
    style: Option<String>,

    #[arg(long)]
    lighting: Option<String>,

    #[arg(long)]
    camera: Option<String>,

    #[arg(long)]
    mood: Option<String>,
}

impl ModifierArgs {
    fn into_modifiers(self) -> StyleModifiers {
        StyleModifiers {
            medium: self.medium,
            style: self.style,
            lighting: self.lighting,
            camera: self.camera,
            mood: self.mood,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a concept into a detailed generation prompt
    Enhance {
        /// The concept to refine
        concept: String,

        #[command(flatten)]
        modifiers: ModifierArgs,
    },

    /// Run a full generation cycle and print the media location
    Generate {
        /// The concept to depict
        concept: String,

        /// Media kind (image, video)
        #[arg(long, default_value = "image")]
        kind: String,

        /// Aspect ratio (1:1, 16:9, 9:16, 4:3, 3:4)
        #[arg(long, default_value = "1:1")]
        aspect: String,

        /// Image resolution tier (standard, high, ultra)
        #[arg(long, default_value = "standard")]
        resolution: String,

        /// Video duration in seconds (4-12)
        #[arg(long, default_value_t = studio::DEFAULT_VIDEO_DURATION_SECS)]
        duration: u32,

        /// Directory for fetched video assets
        #[arg(short, long, default_value = "out")]
        output: PathBuf,

        #[command(flatten)]
        modifiers: ModifierArgs,
    },

    /// List the descriptive-axis vocabulary
    Options,
}

/// Headless stand-in for the host key-selection surface: elevated access
/// follows from having a key configured, and "re-select" can only point
/// the user back at the environment.
struct EnvAccess {
    key_present: bool,
}

#[async_trait]
impl AccessProvider for EnvAccess {
    async fn has_elevated_access(&self) -> bool {
        self.key_present
    }

    async fn request_elevated_access(&self) {
        eprintln!("Set GEMINI_API_KEY to a billed API key and retry.");
    }
}

fn parse_kind(value: &str) -> Result<MediaKind> {
    match value.to_ascii_lowercase().as_str() {
        "image" => Ok(MediaKind::Image),
        "video" => Ok(MediaKind::Video),
        other => bail!("unknown media kind '{other}' (expected image or video)"),
    }
}

fn parse_aspect(value: &str) -> Result<AspectRatio> {
    match value {
        "1:1" => Ok(AspectRatio::Square),
        "16:9" => Ok(AspectRatio::Landscape),
        "9:16" => Ok(AspectRatio::Portrait),
        "4:3" => Ok(AspectRatio::FourThirds),
        "3:4" => Ok(AspectRatio::ThreeFourths),
        other => bail!("unknown aspect ratio '{other}'"),
    }
}

fn parse_resolution(value: &str) -> Result<ImageResolution> {
    match value.to_ascii_lowercase().as_str() {
        "standard" | "1k" => Ok(ImageResolution::Standard),
        "high" | "2k" => Ok(ImageResolution::High),
        "ultra" | "4k" => Ok(ImageResolution::Ultra),
        other => bail!("unknown resolution tier '{other}'"),
    }
}

fn resolve_api_key(flag: Option<String>) -> Result<String> {
    if let Some(key) = flag {
        return Ok(key);
    }
    std::env::var("GEMINI_API_KEY")
        .context("no API key: pass --api-key or set GEMINI_API_KEY")
}

fn build_studio(api_key: String, output_dir: PathBuf) -> Result<Studio> {
    let provider = GeminiProvider::new(GeminiConfig::new(api_key, output_dir))
        .context("configure Gemini provider")?;
    let access = Arc::new(EnvAccess { key_present: true });
    Ok(Studio::new(Arc::new(provider), access))
}

async fn enhance_command(
    api_key: String,
    concept: String,
    modifiers: StyleModifiers,
) -> Result<()> {
    let studio = build_studio(api_key, PathBuf::from("out"))?;
    let record = studio
        .enhance(&concept, &modifiers, MediaKind::Image)
        .await
        .context("concept must not be empty")?;
    println!("{}", record.enhanced_prompt);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn generate_command(
    api_key: String,
    concept: String,
    kind: MediaKind,
    aspect: AspectRatio,
    resolution: ImageResolution,
    duration: u32,
    output: PathBuf,
    modifiers: StyleModifiers,
) -> Result<()> {
    let studio = build_studio(api_key, output)?;
    studio.refresh_access().await;

    let request = GenerationRequest {
        concept,
        modifiers,
        media_kind: kind,
        aspect_ratio: aspect,
        image_resolution: resolution,
        video_duration_secs: duration,
    };
    info!("generating {} ({})", kind, aspect.as_str());

    let record = studio
        .generate(request)
        .await
        .context("concept must not be empty")?;
    match record.state {
        Lifecycle::Ready => {
            let media = record.media.context("ready record without media")?;
            println!("{media}");
            Ok(())
        }
        Lifecycle::Failed => {
            bail!(record.failure.unwrap_or_else(|| "generation failed".to_string()))
        }
        Lifecycle::Pending => bail!("generation did not reach a terminal state"),
    }
}

fn options_command() {
    for (axis, values) in [
        ("medium", MEDIUM_OPTIONS.as_slice()),
        ("style", STYLE_OPTIONS.as_slice()),
        ("lighting", LIGHTING_OPTIONS.as_slice()),
        ("camera", CAMERA_OPTIONS.as_slice()),
        ("mood", MOOD_OPTIONS.as_slice()),
    ] {
        println!("{axis}: {}", values.join(", "));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Enhance { concept, modifiers } => {
            let api_key = resolve_api_key(cli.api_key)?;
            enhance_command(api_key, concept, modifiers.into_modifiers()).await
        }
        Commands::Generate {
            concept,
            kind,
            aspect,
            resolution,
            duration,
            output,
            modifiers,
        } => {
            let api_key = resolve_api_key(cli.api_key)?;
            generate_command(
                api_key,
                concept,
                parse_kind(&kind)?,
                parse_aspect(&aspect)?,
                parse_resolution(&resolution)?,
                duration,
                output,
                modifiers.into_modifiers(),
            )
            .await
        }
        Commands::Options => {
            options_command();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aspect_covers_all_ratios() {
        for ratio in AspectRatio::all() {
            assert_eq!(parse_aspect(ratio.as_str()).unwrap(), ratio);
        }
        assert!(parse_aspect("2:1").is_err());
    }

    #[test]
    fn test_parse_resolution_accepts_both_spellings() {
        assert_eq!(
            parse_resolution("standard").unwrap(),
            ImageResolution::Standard
        );
        assert_eq!(parse_resolution("2K").unwrap(), ImageResolution::High);
        assert_eq!(parse_resolution("ultra").unwrap(), ImageResolution::Ultra);
        assert!(parse_resolution("8k").is_err());
    }
}

use super::{MediaProvider, ProviderError};
use crate::types::{
    AspectRatio, ImageResolution, MediaLocation, PromptEnhancement, StyleModifiers,
    VideoJobHandle, VideoJobStatus,
};
use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Model routing. Standard-resolution images take the fast model; High
/// and Ultra take the quality model, which requires elevated access, as
/// does all video generation.
pub const TEXT_MODEL: &str = "gemini-3-flash-preview";
pub const IMAGE_MODEL_STANDARD: &str = "gemini-2.5-flash-image";
pub const IMAGE_MODEL_QUALITY: &str = "gemini-3-pro-image-preview";
pub const VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";

const VIDEO_RESOLUTION: &str = "1080p";

const ENHANCE_SYSTEM_PROMPT: &str = "You are an expert AI prompt engineer. \
Your goal is to take a basic user idea and expand it into a detailed, high-quality prompt \
suitable for state-of-the-art image and video generation models. \
Construct the prompt by weaving in the user's selected parameters seamlessly. \
Focus on descriptive adjectives, visual details, lighting, composition, and texture.";

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_base: String,
    /// Where fetched video assets are written.
    pub output_dir: PathBuf,
    pub request_timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: String, output_dir: PathBuf) -> Self {
        Self {
            api_key,
            api_base: GEMINI_API_BASE.to_string(),
            output_dir,
            request_timeout: Duration::from_secs(60),
        }
    }
}

pub struct GeminiProvider {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::configuration("Gemini API key is required."));
        }
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| ProviderError::transport(format!("build HTTP client: {err}")))?;
        Ok(Self { config, client })
    }

    fn model_endpoint(&self, model: &str, verb: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}",
            self.config.api_base.trim_end_matches('/'),
            model,
            verb
        )
    }

    fn operation_endpoint(&self, operation_name: &str) -> String {
        format!(
            "{}/v1beta/{}",
            self.config.api_base.trim_end_matches('/'),
            operation_name.trim_start_matches('/')
        )
    }

    async fn post_json(&self, url: &str, payload: &Value) -> Result<Value, ProviderError> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("X-Goog-Api-Key", self.config.api_key.trim())
            .json(payload)
            .send()
            .await?;
        Self::read_body(response).await
    }

    async fn get_json(&self, url: &str) -> Result<Value, ProviderError> {
        let response = self
            .client
            .get(url)
            .header("X-Goog-Api-Key", self.config.api_key.trim())
            .send()
            .await?;
        Self::read_body(response).await
    }

    async fn read_body(response: reqwest::Response) -> Result<Value, ProviderError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        if !(200..300).contains(&status) {
            return Err(classify_failure(status, &body));
        }
        serde_json::from_str(&body).map_err(|err| {
            ProviderError::invalid_response(format!("malformed response JSON: {err}"))
        })
    }
}

/// Map a non-success service response to an error kind. The service
/// signals a key without the requested entitlement as a missing entity,
/// so that signature is folded into the structured variant here and
/// nowhere else.
fn classify_failure(status: u16, body: &str) -> ProviderError {
    if status == 404 || body.contains("Requested entity was not found") {
        return ProviderError::Entitlement;
    }
    ProviderError::Api {
        status,
        message: body.chars().take(512).collect(),
    }
}

fn enhance_user_content(concept: &str, modifiers: &StyleModifiers) -> String {
    let mut content = format!("Base Idea: \"{concept}\"\nParameters:\n");
    for (axis, value) in modifiers.axes() {
        let rendered = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("Auto");
        content.push_str(&format!("- {axis}: {rendered}\n"));
    }
    content.push_str(
        "\nOutput a JSON object with:\n\
         1. 'enhancedPrompt': The final detailed prompt string.\n\
         2. 'explanation': A brief 1-sentence explanation of what you improved.\n",
    );
    content
}

fn enhance_request(concept: &str, modifiers: &StyleModifiers) -> Value {
    json!({
        "systemInstruction": {
            "role": "system",
            "parts": [{ "text": ENHANCE_SYSTEM_PROMPT }]
        },
        "contents": [{
            "role": "user",
            "parts": [{ "text": enhance_user_content(concept, modifiers) }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "enhancedPrompt": { "type": "STRING" },
                    "explanation": { "type": "STRING" }
                },
                "required": ["enhancedPrompt", "explanation"]
            }
        }
    })
}

fn image_request(
    prompt: &str,
    aspect: AspectRatio,
    resolution: ImageResolution,
) -> (&'static str, Value) {
    // The standard tier does not accept a size override.
    let image_config = if resolution.requires_quality_tier() {
        json!({ "aspectRatio": aspect.as_str(), "imageSize": resolution.as_size_str() })
    } else {
        json!({ "aspectRatio": aspect.as_str() })
    };
    let model = if resolution.requires_quality_tier() {
        IMAGE_MODEL_QUALITY
    } else {
        IMAGE_MODEL_STANDARD
    };
    let payload = json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": { "imageConfig": image_config }
    });
    (model, payload)
}

fn video_request(prompt: &str, aspect: AspectRatio, duration_secs: u32) -> Value {
    json!({
        "instances": [{ "prompt": prompt }],
        "parameters": {
            "numberOfVideos": 1,
            "resolution": VIDEO_RESOLUTION,
            "aspectRatio": aspect.video_aspect().as_str(),
            "durationSeconds": duration_secs
        }
    })
}

#[async_trait]
impl MediaProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn enhance(
        &self,
        concept: &str,
        modifiers: &StyleModifiers,
    ) -> Result<PromptEnhancement, ProviderError> {
        let url = self.model_endpoint(TEXT_MODEL, "generateContent");
        let body = self
            .post_json(&url, &enhance_request(concept, modifiers))
            .await?;
        let parsed: GenerateContentResponse = serde_json::from_value(body)
            .map_err(|err| ProviderError::invalid_response(format!("decode candidates: {err}")))?;
        let text = parsed
            .first_text()
            .ok_or_else(|| ProviderError::invalid_response("no response text"))?;
        let payload: EnhancementPayload = serde_json::from_str(&text).map_err(|err| {
            ProviderError::invalid_response(format!("enhancement payload: {err}"))
        })?;
        Ok(PromptEnhancement {
            enhanced_prompt: payload.enhanced_prompt,
            explanation: payload.explanation,
        })
    }

    async fn generate_image(
        &self,
        prompt: &str,
        aspect: AspectRatio,
        resolution: ImageResolution,
    ) -> Result<MediaLocation, ProviderError> {
        let (model, payload) = image_request(prompt, aspect, resolution);
        let url = self.model_endpoint(model, "generateContent");
        let body = self.post_json(&url, &payload).await?;
        let parsed: GenerateContentResponse = serde_json::from_value(body)
            .map_err(|err| ProviderError::invalid_response(format!("decode candidates: {err}")))?;

        // First inline-data part wins; later parts may be captions.
        let inline = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .find_map(|part| part.inline_data)
            .ok_or_else(|| ProviderError::invalid_response("no image data returned"))?;

        base64::engine::general_purpose::STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|err| {
                ProviderError::invalid_response(format!("image payload is not valid base64: {err}"))
            })?;
        Ok(MediaLocation::DataUrl(format!(
            "data:image/png;base64,{}",
            inline.data
        )))
    }

    async fn start_video(
        &self,
        prompt: &str,
        aspect: AspectRatio,
        duration_secs: u32,
    ) -> Result<VideoJobHandle, ProviderError> {
        let url = self.model_endpoint(VIDEO_MODEL, "predictLongRunning");
        let body = self
            .post_json(&url, &video_request(prompt, aspect, duration_secs))
            .await?;
        let operation: OperationRef = serde_json::from_value(body)
            .map_err(|err| ProviderError::invalid_response(format!("operation handle: {err}")))?;
        Ok(VideoJobHandle(operation.name))
    }

    async fn poll_video(&self, job: &VideoJobHandle) -> Result<VideoJobStatus, ProviderError> {
        let body = self.get_json(&self.operation_endpoint(&job.0)).await?;
        let operation: VideoOperation = serde_json::from_value(body)
            .map_err(|err| ProviderError::invalid_response(format!("operation status: {err}")))?;
        if !operation.done {
            return Ok(VideoJobStatus::Pending);
        }
        if let Some(err) = operation.error {
            return Err(ProviderError::Api {
                status: err.code.unwrap_or(500),
                message: err.message.unwrap_or_else(|| "operation failed".to_string()),
            });
        }
        let video_uri = operation
            .response
            .map(|response| response.generated_videos)
            .unwrap_or_default()
            .into_iter()
            .find_map(|generated| generated.video.and_then(|video| video.uri))
            .ok_or_else(|| ProviderError::invalid_response("no video URI returned"))?;
        Ok(VideoJobStatus::Complete { video_uri })
    }

    async fn fetch_video(&self, video_uri: &str) -> Result<MediaLocation, ProviderError> {
        // The URI is not directly servable; the download carries the key.
        let separator = if video_uri.contains('?') { '&' } else { '?' };
        let url = format!(
            "{video_uri}{separator}key={}",
            urlencoding::encode(self.config.api_key.trim())
        );
        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }
        let bytes = response.bytes().await?;

        std::fs::create_dir_all(&self.config.output_dir)
            .map_err(|err| ProviderError::transport(format!("create output dir: {err}")))?;
        let path = self
            .config
            .output_dir
            .join(format!("video-{}.mp4", Uuid::new_v4()));
        std::fs::write(&path, &bytes)
            .map_err(|err| ProviderError::transport(format!("write video: {err}")))?;
        tracing::info!(target: "genmedia", "video written to {}", path.display());
        Ok(MediaLocation::File(path))
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<String> {
        let parts = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?;
        let text: String = parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "inlineData")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}

#[derive(Debug, Deserialize)]
struct EnhancementPayload {
    #[serde(rename = "enhancedPrompt")]
    enhanced_prompt: String,
    explanation: String,
}

#[derive(Debug, Deserialize)]
struct OperationRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct VideoOperation {
    #[serde(default)]
    done: bool,
    #[serde(default)]
    response: Option<VideoOperationResponse>,
    #[serde(default)]
    error: Option<OperationFailure>,
}

#[derive(Debug, Deserialize)]
struct OperationFailure {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoOperationResponse {
    #[serde(default, rename = "generatedVideos")]
    generated_videos: Vec<GeneratedVideo>,
}

#[derive(Debug, Deserialize)]
struct GeneratedVideo {
    #[serde(default)]
    video: Option<VideoRef>,
}

#[derive(Debug, Deserialize)]
struct VideoRef {
    #[serde(default)]
    uri: Option<String>,
}

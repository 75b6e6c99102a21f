use super::{MediaProvider, ProviderError};
use crate::types::{
    AspectRatio, ImageResolution, MediaLocation, PromptEnhancement, StyleModifiers,
    VideoJobHandle, VideoJobStatus,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

/// Scripted responses, consumed front-to-back. An exhausted queue falls
/// back to a canned success so happy-path tests need no setup.
#[derive(Debug, Default)]
pub struct MockScript {
    pub enhance: VecDeque<Result<PromptEnhancement, ProviderError>>,
    pub image: VecDeque<Result<MediaLocation, ProviderError>>,
    pub start_video: VecDeque<Result<VideoJobHandle, ProviderError>>,
    pub poll: VecDeque<Result<VideoJobStatus, ProviderError>>,
    pub fetch: VecDeque<Result<MediaLocation, ProviderError>>,
}

/// What the mock observed, for assertions.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    pub enhance: u32,
    pub image: u32,
    pub start_video: u32,
    pub poll: u32,
    pub fetch: u32,
    pub poll_instants: Vec<tokio::time::Instant>,
    pub image_params: Vec<(AspectRatio, ImageResolution)>,
    pub video_params: Vec<(AspectRatio, u32)>,
}

pub struct MockProvider {
    script: Mutex<MockScript>,
    calls: Mutex<CallLog>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::with_script(MockScript::default())
    }

    pub fn with_script(script: MockScript) -> Self {
        Self {
            script: Mutex::new(script),
            calls: Mutex::new(CallLog::default()),
        }
    }

    pub fn call_log(&self) -> CallLog {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn enhance(
        &self,
        concept: &str,
        _modifiers: &StyleModifiers,
    ) -> Result<PromptEnhancement, ProviderError> {
        self.calls.lock().unwrap().enhance += 1;
        self.script
            .lock()
            .unwrap()
            .enhance
            .pop_front()
            .unwrap_or_else(|| {
                Ok(PromptEnhancement {
                    enhanced_prompt: format!("{concept}, richly detailed, cinematic lighting"),
                    explanation: "Mock enhancement.".to_string(),
                })
            })
    }

    async fn generate_image(
        &self,
        _prompt: &str,
        aspect: AspectRatio,
        resolution: ImageResolution,
    ) -> Result<MediaLocation, ProviderError> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.image += 1;
            calls.image_params.push((aspect, resolution));
        }
        self.script
            .lock()
            .unwrap()
            .image
            .pop_front()
            .unwrap_or_else(|| {
                Ok(MediaLocation::DataUrl(
                    "data:image/png;base64,aW1hZ2U=".to_string(),
                ))
            })
    }

    async fn start_video(
        &self,
        _prompt: &str,
        aspect: AspectRatio,
        duration_secs: u32,
    ) -> Result<VideoJobHandle, ProviderError> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.start_video += 1;
            calls.video_params.push((aspect, duration_secs));
        }
        self.script
            .lock()
            .unwrap()
            .start_video
            .pop_front()
            .unwrap_or_else(|| Ok(VideoJobHandle("operations/mock-video".to_string())))
    }

    async fn poll_video(&self, _job: &VideoJobHandle) -> Result<VideoJobStatus, ProviderError> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.poll += 1;
            calls.poll_instants.push(tokio::time::Instant::now());
        }
        self.script
            .lock()
            .unwrap()
            .poll
            .pop_front()
            .unwrap_or_else(|| {
                Ok(VideoJobStatus::Complete {
                    video_uri: "https://mock.local/video".to_string(),
                })
            })
    }

    async fn fetch_video(&self, _video_uri: &str) -> Result<MediaLocation, ProviderError> {
        self.calls.lock().unwrap().fetch += 1;
        self.script
            .lock()
            .unwrap()
            .fetch
            .pop_front()
            .unwrap_or_else(|| Ok(MediaLocation::File(PathBuf::from("mock-video.mp4"))))
    }
}

use async_trait::async_trait;
use crossbeam_channel::Receiver;
use genmedia::providers::mock::{MockProvider, MockScript};
use genmedia::providers::ProviderError;
use genmedia::{MediaKind, StyleModifiers, VideoJobStatus};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use studio::{
    AccessProvider, GenerationRequest, Lifecycle, Studio, StudioEvent, GENERATION_FAILED_MESSAGE,
};

#[derive(Default)]
struct MockAccess {
    granted: AtomicBool,
    requests: AtomicU32,
}

impl MockAccess {
    fn granted() -> Self {
        Self {
            granted: AtomicBool::new(true),
            requests: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl AccessProvider for MockAccess {
    async fn has_elevated_access(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    async fn request_elevated_access(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

fn studio_with(provider: MockProvider, access: Arc<MockAccess>) -> (Studio, Arc<MockProvider>) {
    let provider = Arc::new(provider);
    let studio = Studio::new(provider.clone(), access);
    (studio, provider)
}

fn drain_results(rx: &Receiver<StudioEvent>) -> Vec<studio::GenerationRecord> {
    rx.try_iter()
        .filter_map(|event| match event {
            StudioEvent::Result(record) => Some(record),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn image_generation_transitions_pending_to_ready() {
    let (studio, _provider) = studio_with(MockProvider::new(), Arc::new(MockAccess::default()));
    let rx = studio.events();

    let record = studio
        .generate(GenerationRequest::new("A cat in space", MediaKind::Image))
        .await
        .expect("generation should run");

    assert_eq!(record.state, Lifecycle::Ready);
    assert!(record.media.is_some());

    let results = drain_results(&rx);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].state, Lifecycle::Pending);
    assert_eq!(results[1].state, Lifecycle::Ready);
    assert_eq!(results[0].id, results[1].id);
}

#[tokio::test]
async fn enhance_publishes_prompt_only_snapshot() {
    let (studio, _provider) = studio_with(MockProvider::new(), Arc::new(MockAccess::default()));

    let record = studio
        .enhance("a lighthouse at dusk", &StyleModifiers::default(), MediaKind::Image)
        .await
        .expect("enhance should run");

    assert_eq!(record.state, Lifecycle::Ready);
    assert!(record.media.is_none());
    assert!(record.enhanced_prompt.contains("a lighthouse at dusk"));
}

#[tokio::test]
async fn reuses_enhancement_for_unchanged_concept() {
    let (studio, provider) = studio_with(MockProvider::new(), Arc::new(MockAccess::default()));

    studio
        .enhance("A cat in space", &StyleModifiers::default(), MediaKind::Image)
        .await
        .unwrap();
    let record = studio
        .generate(GenerationRequest::new("A cat in space", MediaKind::Image))
        .await
        .unwrap();

    assert_eq!(provider.call_log().enhance, 1);
    assert!(record.enhanced_prompt.contains("A cat in space"));
}

#[tokio::test]
async fn re_enhances_when_concept_changes() {
    let (studio, provider) = studio_with(MockProvider::new(), Arc::new(MockAccess::default()));

    studio
        .enhance("A cat in space", &StyleModifiers::default(), MediaKind::Image)
        .await
        .unwrap();
    studio
        .generate(GenerationRequest::new("A dog on the moon", MediaKind::Image))
        .await
        .unwrap();

    assert_eq!(provider.call_log().enhance, 2);
}

#[tokio::test(start_paused = true)]
async fn second_generate_while_pending_is_rejected() {
    let provider = MockProvider::with_script(MockScript {
        poll: VecDeque::from([
            Ok(VideoJobStatus::Pending),
            Ok(VideoJobStatus::Complete {
                video_uri: "https://media.example/clip".to_string(),
            }),
        ]),
        ..Default::default()
    });
    let (studio, provider) = studio_with(provider, Arc::new(MockAccess::granted()));
    let rx = studio.events();

    let first = GenerationRequest::new("A cat in space", MediaKind::Video);
    let second = GenerationRequest::new("A cat in space", MediaKind::Video);
    let (outcome_a, outcome_b) = tokio::join!(studio.generate(first), studio.generate(second));

    let outcomes = [outcome_a, outcome_b];
    assert_eq!(outcomes.iter().filter(|o| o.is_some()).count(), 1);
    assert_eq!(provider.call_log().start_video, 1);

    let results = drain_results(&rx);
    assert_eq!(
        results.iter().filter(|r| r.state == Lifecycle::Pending).count(),
        1
    );
    assert_eq!(
        results.iter().filter(|r| r.state != Lifecycle::Pending).count(),
        1
    );
}

#[tokio::test]
async fn entitlement_failure_revokes_access_and_prompts_reselection() {
    let provider = MockProvider::with_script(MockScript {
        image: VecDeque::from([Err(ProviderError::Entitlement)]),
        ..Default::default()
    });
    let access = Arc::new(MockAccess::granted());
    let (studio, _provider) = studio_with(provider, access.clone());
    studio.refresh_access().await;
    assert!(studio.has_elevated_access());
    let rx = studio.events();

    let mut request = GenerationRequest::new("A cat in space", MediaKind::Image);
    request.image_resolution = genmedia::ImageResolution::Ultra;
    let record = studio.generate(request).await.unwrap();

    assert_eq!(record.state, Lifecycle::Failed);
    assert_eq!(
        record.failure.as_deref(),
        Some(GENERATION_FAILED_MESSAGE)
    );
    assert!(!studio.has_elevated_access());
    assert_eq!(access.requests.load(Ordering::SeqCst), 1);
    assert!(rx
        .try_iter()
        .any(|event| matches!(event, StudioEvent::Notice(_))));
}

#[tokio::test]
async fn non_entitlement_failure_shows_generic_message_only() {
    let provider = MockProvider::with_script(MockScript {
        image: VecDeque::from([Err(ProviderError::Api {
            status: 429,
            message: "quota exceeded for project".to_string(),
        })]),
        ..Default::default()
    });
    let access = Arc::new(MockAccess::default());
    let (studio, _provider) = studio_with(provider, access.clone());

    let record = studio
        .generate(GenerationRequest::new("A cat in space", MediaKind::Image))
        .await
        .unwrap();

    assert_eq!(record.state, Lifecycle::Failed);
    assert_eq!(record.failure.as_deref(), Some(GENERATION_FAILED_MESSAGE));
    assert_eq!(access.requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_concept_is_silently_rejected() {
    let (studio, provider) = studio_with(MockProvider::new(), Arc::new(MockAccess::default()));
    let rx = studio.events();

    assert!(studio
        .generate(GenerationRequest::new("   ", MediaKind::Image))
        .await
        .is_none());
    assert!(studio
        .enhance("", &StyleModifiers::default(), MediaKind::Image)
        .await
        .is_none());

    assert_eq!(provider.call_log().enhance, 0);
    assert_eq!(provider.call_log().image, 0);
    assert!(drain_results(&rx).is_empty());
}

#[tokio::test]
async fn generate_falls_back_to_raw_concept_when_enhancement_fails() {
    let provider = MockProvider::with_script(MockScript {
        enhance: VecDeque::from([Err(ProviderError::transport("connection reset"))]),
        ..Default::default()
    });
    let (studio, _provider) = studio_with(provider, Arc::new(MockAccess::default()));

    let record = studio
        .generate(GenerationRequest::new("A cat in space", MediaKind::Image))
        .await
        .unwrap();

    assert_eq!(record.enhanced_prompt, "A cat in space");
    assert_eq!(record.state, Lifecycle::Ready);
}

#[tokio::test]
async fn request_access_sets_flag_optimistically() {
    let access = Arc::new(MockAccess::default());
    let (studio, _provider) = studio_with(MockProvider::new(), access.clone());

    studio.request_access().await;

    // The host never confirmed a grant; the flag is trusted until the
    // next refresh trigger says otherwise.
    assert!(studio.has_elevated_access());
    assert_eq!(access.requests.load(Ordering::SeqCst), 1);

    studio.refresh_access().await;
    assert!(!studio.has_elevated_access());
}

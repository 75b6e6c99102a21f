use crate::access::AccessProvider;
use crate::record::{GenerationRecord, GenerationRequest};
use crossbeam_channel::{unbounded, Receiver, Sender};
use genmedia::enhance::enhance_with_fallback;
use genmedia::generation::{generate_media, PollPolicy};
use genmedia::providers::{MediaProvider, ProviderError};
use genmedia::{MediaKind, MediaLocation, StyleModifiers};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// The one string shown for any media failure; detail stays in the log.
pub const GENERATION_FAILED_MESSAGE: &str = "Generation failed. Please try again.";

const REAUTH_NOTICE: &str = "API key session expired or invalid. Please select your key again.";

/// What the display layer consumes: result snapshots, the access flag,
/// and blocking notices.
#[derive(Debug, Clone)]
pub enum StudioEvent {
    Result(GenerationRecord),
    Access(bool),
    Notice(String),
}

struct StudioState {
    current: Option<GenerationRecord>,
    elevated: bool,
}

/// Generation orchestrator. Owns the single current record and the
/// cached access flag; admission control is a pair of in-flight guards,
/// so at most one enhancement or generation runs at a time. The state
/// lock is never held across an await.
pub struct Studio {
    provider: Arc<dyn MediaProvider>,
    access: Arc<dyn AccessProvider>,
    poll_policy: PollPolicy,
    state: Mutex<StudioState>,
    enhancing: AtomicBool,
    generating: AtomicBool,
    tx_events: Sender<StudioEvent>,
    rx_events: Receiver<StudioEvent>,
}

impl Studio {
    pub fn new(provider: Arc<dyn MediaProvider>, access: Arc<dyn AccessProvider>) -> Self {
        let (tx_events, rx_events) = unbounded();
        Self {
            provider,
            access,
            poll_policy: PollPolicy::default(),
            state: Mutex::new(StudioState {
                current: None,
                elevated: false,
            }),
            enhancing: AtomicBool::new(false),
            generating: AtomicBool::new(false),
            tx_events,
            rx_events,
        }
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll_policy = policy;
        self
    }

    pub fn events(&self) -> Receiver<StudioEvent> {
        self.rx_events.clone()
    }

    pub fn current(&self) -> Option<GenerationRecord> {
        self.state.lock().unwrap().current.clone()
    }

    pub fn has_elevated_access(&self) -> bool {
        self.state.lock().unwrap().elevated
    }

    pub fn is_busy(&self) -> bool {
        self.enhancing.load(Ordering::SeqCst) || self.generating.load(Ordering::SeqCst)
    }

    /// Re-read the host's grant. Startup and focus-regained both land
    /// here; an in-flight generation is unaffected, only future
    /// admission decisions see the new value.
    pub async fn refresh_access(&self) {
        let elevated = self.access.has_elevated_access().await;
        self.set_elevated(elevated);
    }

    /// User-initiated key selection. The flag is set optimistically once
    /// the dialog completes, without waiting for the host to confirm the
    /// grant; the next refresh trigger reconciles.
    pub async fn request_access(&self) {
        self.access.request_elevated_access().await;
        self.set_elevated(true);
    }

    /// Refine the concept without generating media, so the user can
    /// inspect the prompt first. Rejected while any operation is in
    /// flight or when the concept is empty.
    pub async fn enhance(
        &self,
        concept: &str,
        modifiers: &StyleModifiers,
        media_kind: MediaKind,
    ) -> Option<GenerationRecord> {
        if concept.trim().is_empty() || self.generating.load(Ordering::SeqCst) {
            tracing::debug!(target: "studio", "enhance rejected: empty concept or busy");
            return None;
        }
        if self
            .enhancing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!(target: "studio", "enhance rejected: already enhancing");
            return None;
        }

        let enhancement =
            enhance_with_fallback(self.provider.as_ref(), concept, modifiers).await;
        let record =
            GenerationRecord::enhanced_only(concept, &enhancement.enhanced_prompt, media_kind);
        self.publish(record.clone());

        self.enhancing.store(false, Ordering::SeqCst);
        Some(record)
    }

    /// Run one full generation cycle: resolve the prompt, publish a
    /// pending snapshot, produce media, and land on a terminal state.
    /// Rejected while a prior generation is still in flight.
    pub async fn generate(&self, request: GenerationRequest) -> Option<GenerationRecord> {
        if request.concept.trim().is_empty() || self.enhancing.load(Ordering::SeqCst) {
            tracing::debug!(target: "studio", "generate rejected: empty concept or busy");
            return None;
        }
        if self
            .generating
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!(target: "studio", "generate rejected: generation already in flight");
            return None;
        }

        let outcome = self.run_generation(&request).await;
        self.generating.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run_generation(&self, request: &GenerationRequest) -> Option<GenerationRecord> {
        // Reuse the prior enhancement only when the concept is unchanged;
        // otherwise refine inline. The step is total, and an empty prompt
        // still degrades to the raw concept.
        let reusable = self.state.lock().unwrap().current.as_ref().and_then(|current| {
            (current.original_concept == request.concept)
                .then(|| current.enhanced_prompt.clone())
        });
        let prompt = match reusable {
            Some(prompt) => prompt,
            None => {
                enhance_with_fallback(self.provider.as_ref(), &request.concept, &request.modifiers)
                    .await
                    .enhanced_prompt
            }
        };
        let prompt = if prompt.trim().is_empty() {
            request.concept.clone()
        } else {
            prompt
        };

        let record = GenerationRecord::pending(&request.concept, &prompt, request.media_kind);
        let id = record.id;
        self.publish(record);

        let result = generate_media(
            self.provider.as_ref(),
            request.media_kind,
            &prompt,
            request.aspect_ratio,
            request.image_resolution,
            request.clamped_duration_secs(),
            self.poll_policy,
        )
        .await;

        match result {
            Ok(media) => self.complete(id, media),
            Err(err) => {
                self.handle_failure(&err).await;
                self.fail(id)
            }
        }
    }

    fn publish(&self, record: GenerationRecord) {
        self.state.lock().unwrap().current = Some(record.clone());
        let _ = self.tx_events.send(StudioEvent::Result(record));
    }

    fn complete(&self, id: Uuid, media: MediaLocation) -> Option<GenerationRecord> {
        let record = {
            let mut state = self.state.lock().unwrap();
            match state.current.take() {
                Some(current) if current.id == id => current.into_ready(media),
                other => {
                    // A newer cycle replaced this one; drop the stale completion.
                    tracing::warn!(target: "studio", "discarding stale generation completion");
                    state.current = other;
                    return None;
                }
            }
        };
        self.publish(record.clone());
        Some(record)
    }

    fn fail(&self, id: Uuid) -> Option<GenerationRecord> {
        let record = {
            let mut state = self.state.lock().unwrap();
            match state.current.take() {
                Some(current) if current.id == id => {
                    current.into_failed(GENERATION_FAILED_MESSAGE)
                }
                other => {
                    tracing::warn!(target: "studio", "discarding stale generation failure");
                    state.current = other;
                    return None;
                }
            }
        };
        self.publish(record.clone());
        Some(record)
    }

    async fn handle_failure(&self, err: &ProviderError) {
        tracing::error!(target: "studio", "generation failed: {err}");
        if err.is_entitlement() {
            // The cached grant is stale: revoke it, tell the user, and
            // open the selection dialog. No optimistic re-grant here;
            // the user confirms through request_access or a refresh.
            self.set_elevated(false);
            let _ = self
                .tx_events
                .send(StudioEvent::Notice(REAUTH_NOTICE.to_string()));
            self.access.request_elevated_access().await;
        }
    }

    fn set_elevated(&self, elevated: bool) {
        let changed = {
            let mut state = self.state.lock().unwrap();
            let changed = state.elevated != elevated;
            state.elevated = elevated;
            changed
        };
        if changed {
            tracing::info!(target: "studio", "elevated access: {elevated}");
        }
        let _ = self.tx_events.send(StudioEvent::Access(elevated));
    }
}

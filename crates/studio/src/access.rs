use async_trait::async_trait;

/// Host-environment capability guarding the elevated tier (paid key).
///
/// `request_elevated_access` opens the host's interactive key selection;
/// completion of the returned future only means the dialog ran, not that
/// a grant was confirmed. The orchestrator owns the cached flag and
/// decides when to trust it.
#[async_trait]
pub trait AccessProvider: Send + Sync {
    async fn has_elevated_access(&self) -> bool;
    async fn request_elevated_access(&self);
}

/// Used when the host exposes no key-selection surface.
pub struct NoAccess;

#[async_trait]
impl AccessProvider for NoAccess {
    async fn has_elevated_access(&self) -> bool {
        false
    }

    async fn request_elevated_access(&self) {
        tracing::warn!(target: "studio", "no key selection surface available in this host");
    }
}

mod access;
mod options;
mod orchestrator;
mod record;

pub use access::{AccessProvider, NoAccess};
pub use options::*;
pub use orchestrator::{Studio, StudioEvent, GENERATION_FAILED_MESSAGE};
pub use record::{
    GenerationRecord, GenerationRequest, Lifecycle, MAX_VIDEO_DURATION_SECS,
    MIN_VIDEO_DURATION_SECS,
};

use bytes::Bytes;
use mime::Mime;

pub const GENERIC_RENDER_FAILURE: &str = "Error generating video";

/// Lifecycle of the single render slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderPhase {
    #[default]
    Idle,
    InFlight,
    Completed,
    Failed,
}

impl RenderPhase {
    pub fn is_busy(&self) -> bool {
        matches!(self, RenderPhase::InFlight)
    }
}

/// Raw `/generate-video` response body.
#[derive(Debug, Clone)]
pub struct RenderedVideo {
    pub data: Bytes,
    pub content_type: Option<Mime>,
}

use tokio::sync::mpsc;
use tracing::warn;

/// User-facing messages raised by the orchestration layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Validation(String),
    RenderFailed(String),
    VideoReady { uri: String },
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Validation(message) | Notice::RenderFailed(message) => message,
            Notice::VideoReady { .. } => "Video Generated!",
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::VideoReady { .. })
    }
}

pub type NoticeReceiver = mpsc::UnboundedReceiver<Notice>;

#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl Notifier {
    pub fn channel() -> (Self, NoticeReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn notify(&self, notice: Notice) {
        if self.tx.send(notice).is_err() {
            warn!("Notice dropped, no listener attached");
        }
    }
}

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::model::{RenderPhase, RenderedVideo, GENERIC_RENDER_FAILURE};
use super::resource::{ResultManager, VideoInfo};
use crate::common::error::{RenderError, ServiceError};
use crate::common::notice::{Notice, Notifier};
use crate::infrastructure::http::ServiceClient;
use crate::modules::input::InputModel;
use crate::modules::submission;

/// Owns the one render slot. A trigger is accepted only outside
/// [`RenderPhase::InFlight`]; the check and the transition happen in one
/// step on the phase channel.
#[derive(Clone)]
pub struct RenderController {
    inner: Arc<Inner>,
}

struct Inner {
    api: ServiceClient,
    phase: watch::Sender<RenderPhase>,
    results: ResultManager,
    notifier: Notifier,
}

pub type RenderTask = JoinHandle<Result<VideoInfo, RenderError>>;

impl RenderController {
    pub fn new(api: ServiceClient, results: ResultManager, notifier: Notifier) -> Self {
        let (phase, _) = watch::channel(RenderPhase::Idle);
        Self {
            inner: Arc::new(Inner {
                api,
                phase,
                results,
                notifier,
            }),
        }
    }

    pub fn phase(&self) -> RenderPhase {
        *self.inner.phase.borrow()
    }

    pub fn is_busy(&self) -> bool {
        self.phase().is_busy()
    }

    pub fn subscribe(&self) -> watch::Receiver<RenderPhase> {
        self.inner.phase.subscribe()
    }

    pub fn results(&self) -> &ResultManager {
        &self.inner.results
    }

    /// Validates `input`, claims the slot and dispatches the render in the
    /// background. Validation failures are reported before anything is sent.
    pub fn trigger(&self, input: &InputModel, cancel: &CancellationToken) -> Result<RenderTask, RenderError> {
        if self.is_busy() {
            debug!("Render already in flight, trigger ignored");
            return Err(RenderError::Busy);
        }

        let submission = match submission::build(input) {
            Ok(submission) => submission,
            Err(e) => {
                warn!("Render rejected: {}", e);
                self.inner.notifier.notify(Notice::Validation(e.to_string()));
                return Err(e.into());
            }
        };

        let claimed = self.inner.phase.send_if_modified(|phase| {
            if phase.is_busy() {
                false
            } else {
                *phase = RenderPhase::InFlight;
                true
            }
        });
        if !claimed {
            return Err(RenderError::Busy);
        }

        info!("🚀 Render started ({} fields)", submission.fields().len());

        let controller = self.clone();
        let cancel = cancel.clone();
        Ok(tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    controller.inner.phase.send_replace(RenderPhase::Idle);
                    debug!("Render dropped after deactivation");
                    return Err(RenderError::Cancelled);
                }
                result = controller.inner.api.generate_video(submission) => result,
            };
            controller.finish(result, &cancel)
        }))
    }

    /// Triggers a render and waits for it to settle.
    pub async fn render(&self, input: &InputModel, cancel: &CancellationToken) -> Result<VideoInfo, RenderError> {
        let task = self.trigger(input, cancel)?;
        match task.await {
            Ok(result) => result,
            Err(e) => {
                error!("Render task aborted: {}", e);
                self.inner.phase.send_if_modified(|phase| {
                    let stuck = phase.is_busy();
                    if stuck {
                        *phase = RenderPhase::Failed;
                    }
                    stuck
                });
                Err(RenderError::Cancelled)
            }
        }
    }

    fn finish(
        &self,
        result: Result<RenderedVideo, ServiceError>,
        cancel: &CancellationToken,
    ) -> Result<VideoInfo, RenderError> {
        match result {
            Ok(video) => {
                let Some(info) = self.inner.results.publish(video, cancel) else {
                    self.inner.phase.send_replace(RenderPhase::Idle);
                    return Err(RenderError::Cancelled);
                };
                self.inner.phase.send_replace(RenderPhase::Completed);
                self.inner.notifier.notify(Notice::VideoReady {
                    uri: info.uri.clone(),
                });
                Ok(info)
            }
            Err(e) => {
                error!("❌ Render failed: {}", e);
                self.inner.phase.send_replace(RenderPhase::Failed);
                self.inner
                    .notifier
                    .notify(Notice::RenderFailed(GENERIC_RENDER_FAILURE.to_string()));
                Err(RenderError::Failed(e))
            }
        }
    }
}

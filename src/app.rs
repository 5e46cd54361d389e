use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::common::error::{RenderError, ResourceError, ValidationError};
use crate::common::notice::{NoticeReceiver, Notifier};
use crate::common::upload::UploadFile;
use crate::modules::credentials::{CheckingFlags, CredentialStatus, CredentialValidator, Provider};
use crate::modules::input::{AspectRatio, Genre, InputModel, VoiceName};
use crate::modules::render::service::RenderTask;
use crate::modules::render::{RenderController, RenderPhase, ResultManager, VideoInfo};
use crate::modules::status::{StatusService, SystemSnapshot};
use crate::state::AppState;
use crate::workers::{KeyValidationWorker, StatusPoller};

pub fn create_session(state: AppState) -> (Session, NoticeReceiver) {
    Session::new(state)
}

/// Background machinery that only exists while the session is active.
struct Activation {
    cancel: CancellationToken,
    poller: StatusPoller,
    keys: KeyValidationWorker,
}

/// The orchestration layer behind the video-generation form: owns the
/// input model, the render slot and the two background processes.
pub struct Session {
    state: AppState,
    input: InputModel,
    validator: CredentialValidator,
    status: StatusService,
    renderer: RenderController,
    activation: Option<Activation>,
}

impl Session {
    pub fn new(state: AppState) -> (Self, NoticeReceiver) {
        let (notifier, notices) = Notifier::channel();
        let results = ResultManager::new(state.resources.clone());

        let session = Self {
            validator: CredentialValidator::new(state.api.clone()),
            status: StatusService::new(state.api.clone()),
            renderer: RenderController::new(state.api.clone(), results, notifier),
            input: InputModel::default(),
            activation: None,
            state,
        };
        (session, notices)
    }

    /// Starts the status poller and the key-validation worker. Must run
    /// inside a Tokio runtime; activating twice is a no-op.
    pub fn activate(&mut self) {
        if self.activation.is_some() {
            return;
        }

        let cancel = CancellationToken::new();
        let config = &self.state.config;
        let poller = StatusPoller::start(self.status.clone(), config.poll_interval, cancel.child_token());
        let keys = KeyValidationWorker::start(self.validator.clone(), config.debounce, cancel.child_token());

        info!("Session activated");
        self.activation = Some(Activation { cancel, poller, keys });

        if !self.input.credentials.is_blank() {
            self.credentials_changed();
        }
    }

    /// Stops both background processes, drops results still in flight and
    /// releases the current video.
    pub async fn deactivate(&mut self) {
        let Some(activation) = self.activation.take() else {
            return;
        };

        activation.cancel.cancel();
        futures_util::future::join(activation.poller.stop(), activation.keys.stop()).await;
        self.renderer.results().release();

        info!("Session deactivated");
    }

    pub fn is_active(&self) -> bool {
        self.activation.is_some()
    }

    // --- input edits ---

    pub fn input(&self) -> &InputModel {
        &self.input
    }

    pub fn set_script_file(&mut self, file: Option<UploadFile>) {
        self.input.script_file = file;
    }

    pub fn set_voice_file(&mut self, file: Option<UploadFile>) {
        self.input.voice_file = file;
    }

    pub fn set_background_music_file(&mut self, file: Option<UploadFile>) {
        self.input.background_music_file = file;
    }

    /// Out-of-range values are refused and the previous volume is kept.
    pub fn set_background_music_volume(&mut self, volume: f32) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(ValidationError::InvalidInput(format!(
                "background music volume {volume} outside 0..=1"
            )));
        }
        self.input.background_music_volume = volume;
        Ok(())
    }

    pub fn set_genre(&mut self, genre: Genre) {
        self.input.genre = genre;
    }

    pub fn set_competitor_url(&mut self, url: impl Into<String>) {
        self.input.competitor_url = url.into();
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) {
        self.input.aspect_ratio = aspect_ratio;
    }

    pub fn set_voice_name(&mut self, voice_name: VoiceName) {
        self.input.voice_name = voice_name;
    }

    pub fn set_pexels_key(&mut self, key: impl Into<String>) {
        self.input.credentials.pexels = key.into();
        self.credentials_changed();
    }

    pub fn set_pixabay_key(&mut self, key: impl Into<String>) {
        self.input.credentials.pixabay = key.into();
        self.credentials_changed();
    }

    pub fn set_gemini_key(&mut self, key: impl Into<String>) {
        self.input.credentials.gemini = key.into();
        self.credentials_changed();
    }

    pub fn set_gemini_endpoint(&mut self, endpoint: impl Into<String>) {
        self.input.credentials.gemini_endpoint = endpoint.into();
        self.credentials_changed();
    }

    fn credentials_changed(&self) {
        match &self.activation {
            Some(activation) => activation.keys.notify(self.input.credentials.clone()),
            None => debug!("Credentials edited while inactive"),
        }
    }

    // --- actions ---

    /// Explicit per-provider check. `None` while inactive or while the same
    /// provider is already being checked.
    pub fn check_key(&self, provider: Provider) -> Option<JoinHandle<()>> {
        let activation = self.activation.as_ref()?;
        self.validator
            .check_now(provider, &self.input.credentials, &activation.cancel)
    }

    pub fn render(&self) -> Result<RenderTask, RenderError> {
        let activation = self.activation.as_ref().ok_or(RenderError::Inactive)?;
        self.renderer.trigger(&self.input, &activation.cancel)
    }

    pub async fn download(&self) -> Result<PathBuf, ResourceError> {
        self.download_to(&self.state.config.download_dir).await
    }

    pub async fn download_to(&self, dir: &Path) -> Result<PathBuf, ResourceError> {
        self.renderer.results().download(dir).await
    }

    // --- read-only views ---

    pub fn credential_status(&self) -> CredentialStatus {
        self.validator.status()
    }

    pub fn subscribe_credentials(&self) -> watch::Receiver<CredentialStatus> {
        self.validator.subscribe()
    }

    pub fn checking(&self) -> CheckingFlags {
        self.validator.checking()
    }

    pub fn system_snapshot(&self) -> SystemSnapshot {
        self.status.snapshot()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SystemSnapshot> {
        self.status.subscribe()
    }

    pub fn render_phase(&self) -> RenderPhase {
        self.renderer.phase()
    }

    pub fn is_busy(&self) -> bool {
        self.renderer.is_busy()
    }

    pub fn subscribe_render(&self) -> watch::Receiver<RenderPhase> {
        self.renderer.subscribe()
    }

    pub fn current_video(&self) -> Option<VideoInfo> {
        self.renderer.results().current()
    }

    /// Resolves a video URI for playback; `None` once it has been released.
    pub fn resolve_video(&self, uri: &str) -> Option<Bytes> {
        self.state.resources.resolve(uri)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(activation) = self.activation.take() {
            activation.cancel.cancel();
        }
        self.renderer.results().release();
    }
}

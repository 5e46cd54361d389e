use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::modules::credentials::CredentialValidator;
use crate::modules::input::Credentials;

/// Debounces credential edits into batch validations. Each edit restarts
/// the quiet period; only the latest credentials are sent once it elapses.
pub struct KeyValidationWorker {
    edits: mpsc::UnboundedSender<Credentials>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl KeyValidationWorker {
    pub fn start(validator: CredentialValidator, debounce: Duration, cancel: CancellationToken) -> Self {
        let (edits, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(validator, debounce, rx, cancel.clone()));

        Self {
            edits,
            cancel,
            handle,
        }
    }

    pub fn notify(&self, credentials: Credentials) {
        if self.edits.send(credentials).is_err() {
            debug!("Key validation worker gone, edit ignored");
        }
    }

    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            error!("Key validation worker panicked: {}", e);
        }
    }
}

async fn run(
    validator: CredentialValidator,
    debounce: Duration,
    mut edits: mpsc::UnboundedReceiver<Credentials>,
    cancel: CancellationToken,
) {
    info!("🔑 Key validation worker started (debounce {:?})", debounce);

    'worker: loop {
        let mut pending = tokio::select! {
            biased;
            _ = cancel.cancelled() => break 'worker,
            edit = edits.recv() => match edit {
                Some(credentials) => credentials,
                None => break 'worker,
            },
        };

        let quiet = sleep(debounce);
        tokio::pin!(quiet);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break 'worker,
                edit = edits.recv() => match edit {
                    Some(credentials) => {
                        pending = credentials;
                        quiet.as_mut().reset(Instant::now() + debounce);
                    }
                    None => break 'worker,
                },
                _ = &mut quiet => break,
            }
        }

        let validator = validator.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            validator.validate_all(&pending, &cancel).await;
        });
    }

    info!("🔑 Key validation worker stopped");
}

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::dto::ValidateKeysRequest;
use super::model::{CheckingFlags, CredentialStatus, Provider};
use crate::infrastructure::http::ServiceClient;
use crate::modules::input::Credentials;

/// Maps credential strings to a [`CredentialStatus`].
///
/// Batch (debounced) and explicit per-provider checks run independently.
/// Every request takes a sequence number at dispatch, and each provider's
/// field only accepts a response dispatched after the one it last applied,
/// so a slow older response cannot overwrite a newer one.
#[derive(Clone)]
pub struct CredentialValidator {
    inner: Arc<Inner>,
}

struct Inner {
    api: ServiceClient,
    status: watch::Sender<CredentialStatus>,
    checking: watch::Sender<CheckingFlags>,
    next_seq: AtomicU64,
    dispatched: AtomicU64,
    applied: Mutex<[u64; 3]>,
}

impl CredentialValidator {
    pub fn new(api: ServiceClient) -> Self {
        let (status, _) = watch::channel(CredentialStatus::default());
        let (checking, _) = watch::channel(CheckingFlags::default());
        Self {
            inner: Arc::new(Inner {
                api,
                status,
                checking,
                next_seq: AtomicU64::new(0),
                dispatched: AtomicU64::new(0),
                applied: Mutex::new([0; 3]),
            }),
        }
    }

    pub fn status(&self) -> CredentialStatus {
        *self.inner.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CredentialStatus> {
        self.inner.status.subscribe()
    }

    pub fn checking(&self) -> CheckingFlags {
        *self.inner.checking.borrow()
    }

    /// Requests sent to `/validate-keys` so far, batch and explicit.
    pub fn dispatched(&self) -> u64 {
        self.inner.dispatched.load(Ordering::SeqCst)
    }

    /// Checks every provider at once. Skipped when no key is filled in.
    pub async fn validate_all(&self, credentials: &Credentials, cancel: &CancellationToken) {
        if credentials.is_blank() {
            debug!("All API keys empty, skipping validation");
            return;
        }

        let request = ValidateKeysRequest::batch(credentials);
        self.run(&Provider::ALL, request, cancel).await;
    }

    /// Explicit "check now" for one provider. Bypasses the debounce and
    /// returns the spawned task, or `None` while a check for the same
    /// provider is still outstanding.
    pub fn check_now(
        &self,
        provider: Provider,
        credentials: &Credentials,
        cancel: &CancellationToken,
    ) -> Option<JoinHandle<()>> {
        let claimed = self.inner.checking.send_if_modified(|flags| {
            if flags.get(provider) {
                false
            } else {
                flags.set(provider, true);
                true
            }
        });
        if !claimed {
            debug!("{} check already running", provider.display_name());
            return None;
        }

        let request = ValidateKeysRequest::single(provider, credentials);
        let validator = self.clone();
        let cancel = cancel.clone();

        Some(tokio::spawn(async move {
            validator.run(&[provider], request, &cancel).await;
            validator.inner.checking.send_modify(|flags| flags.set(provider, false));
        }))
    }

    async fn run(&self, providers: &[Provider], request: ValidateKeysRequest, cancel: &CancellationToken) {
        if cancel.is_cancelled() {
            return;
        }
        let seq = self.inner.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.dispatched.fetch_add(1, Ordering::SeqCst);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Key validation #{} dropped after deactivation", seq);
                return;
            }
            result = self.inner.api.validate_keys(&request) => result,
        };

        match result {
            Ok(response) => self.apply(seq, providers, response),
            Err(e) => error!("Key validation failed: {}", e),
        }
    }

    fn apply(&self, seq: u64, providers: &[Provider], response: CredentialStatus) {
        let mut applied = self.inner.applied.lock();

        self.inner.status.send_if_modified(|status| {
            let mut changed = false;
            for &provider in providers {
                let slot = &mut applied[provider.index()];
                if seq <= *slot {
                    debug!("Ignoring stale {} result #{}", provider.as_str(), seq);
                    continue;
                }
                *slot = seq;

                let active = response.get(provider);
                if status.get(provider) != active {
                    info!(
                        "{} key is now {}",
                        provider.display_name(),
                        if active { "active" } else { "inactive" }
                    );
                    status.set(provider, active);
                    changed = true;
                }
            }
            changed
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::AppConfig;

    fn validator() -> CredentialValidator {
        let config = AppConfig::with_service_url("http://127.0.0.1:9").unwrap();
        CredentialValidator::new(ServiceClient::new(&config).unwrap())
    }

    fn all_active() -> CredentialStatus {
        CredentialStatus {
            pexels: true,
            pixabay: true,
            gemini: true,
        }
    }

    #[test]
    fn newer_explicit_result_survives_older_batch() {
        let validator = validator();

        // batch dispatched as #1, explicit gemini check as #2; #2 lands first
        validator.apply(2, &[Provider::Gemini], CredentialStatus::default());
        validator.apply(1, &Provider::ALL, all_active());

        let status = validator.status();
        assert!(!status.gemini);
        assert!(status.pexels);
        assert!(status.pixabay);
    }

    #[test]
    fn fields_update_independently() {
        let validator = validator();

        validator.apply(1, &[Provider::Pexels], all_active());
        let status = validator.status();
        assert!(status.pexels);
        assert!(!status.pixabay);
        assert!(!status.gemini);
    }

    #[tokio::test]
    async fn blank_credentials_dispatch_nothing() {
        let validator = validator();
        let cancel = CancellationToken::new();

        let credentials = Credentials {
            gemini_endpoint: "https://proxy.example.com".into(),
            ..Credentials::default()
        };
        validator.validate_all(&credentials, &cancel).await;

        assert_eq!(validator.dispatched(), 0);
    }

    #[tokio::test]
    async fn unreachable_service_keeps_status_and_clears_flag() {
        let validator = validator();
        validator.apply(1, &[Provider::Pexels], all_active());
        let cancel = CancellationToken::new();

        let credentials = Credentials {
            pexels: "pex".into(),
            ..Credentials::default()
        };
        let handle = validator
            .check_now(Provider::Pexels, &credentials, &cancel)
            .unwrap();
        assert!(validator.checking().pexels);
        assert!(validator.check_now(Provider::Pexels, &credentials, &cancel).is_none());

        handle.await.unwrap();
        assert!(!validator.checking().pexels);
        assert!(validator.status().pexels);
        assert_eq!(validator.dispatched(), 1);
    }
}

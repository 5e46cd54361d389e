use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::model::SystemSnapshot;
use crate::infrastructure::http::ServiceClient;

/// Owns the displayed [`SystemSnapshot`]. Fetches are numbered when issued
/// and a response only replaces the snapshot if no later-issued fetch has
/// already been applied.
#[derive(Clone)]
pub struct StatusService {
    inner: Arc<Inner>,
}

struct Inner {
    api: ServiceClient,
    snapshot: watch::Sender<SystemSnapshot>,
    issued: AtomicU64,
    applied: Mutex<u64>,
}

impl StatusService {
    pub fn new(api: ServiceClient) -> Self {
        let (snapshot, _) = watch::channel(SystemSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                api,
                snapshot,
                issued: AtomicU64::new(0),
                applied: Mutex::new(0),
            }),
        }
    }

    pub fn snapshot(&self) -> SystemSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SystemSnapshot> {
        self.inner.snapshot.subscribe()
    }

    /// Number of fetches issued so far.
    pub fn issued(&self) -> u64 {
        self.inner.issued.load(Ordering::SeqCst)
    }

    /// Issues one fetch. Returns whether the snapshot was replaced. A
    /// cancelled token aborts the fetch and discards its result.
    pub async fn refresh(&self, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        let seq = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Status fetch #{} dropped after deactivation", seq);
                return false;
            }
            result = self.inner.api.system_status() => result,
        };

        match result {
            Ok(snapshot) => self.apply(seq, snapshot),
            Err(e) => {
                warn!("Failed to fetch system status: {}", e);
                false
            }
        }
    }

    fn apply(&self, seq: u64, snapshot: SystemSnapshot) -> bool {
        let mut applied = self.inner.applied.lock();
        if seq <= *applied {
            debug!("Discarding status fetch #{} (already showing #{})", seq, *applied);
            return false;
        }
        *applied = seq;
        self.inner.snapshot.send_replace(snapshot);
        true
    }
}

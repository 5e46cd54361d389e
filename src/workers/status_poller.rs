use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::modules::status::StatusService;

/// Owned handle to the periodic status fetch. The first fetch goes out
/// immediately; later ones every `period` until [`StatusPoller::stop`].
pub struct StatusPoller {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl StatusPoller {
    pub fn start(service: StatusService, period: Duration, cancel: CancellationToken) -> Self {
        let handle = tokio::spawn(run(service, period, cancel.clone()));
        Self { cancel, handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Cancels the timer and waits for the loop to exit. No fetch is issued
    /// once this returns; one still in flight is dropped.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            error!("Status poller panicked: {}", e);
        }
    }
}

async fn run(service: StatusService, period: Duration, cancel: CancellationToken) {
    info!("📊 Status poller started (every {:?})", period);

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                // fire-and-forget: a slow fetch never delays the next tick
                let service = service.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    service.refresh(&cancel).await;
                });
            }
        }
    }

    info!("📊 Status poller stopped");
}

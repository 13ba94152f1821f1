//! Periodic notification refresh.

use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Background task that pushes `tick` into a channel every `period`, the
/// first one immediately. Ticks are dropped rather than queued when the
/// receiver is behind.
pub struct NotificationPoller {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl NotificationPoller {
    pub fn spawn<T>(period: Duration, tx: mpsc::Sender<T>, tick: T) -> Self
    where
        T: Clone + Send + 'static,
    {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = interval.tick() => match tx.try_send(tick.clone()) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => debug!("poll tick skipped, receiver busy"),
                        Err(TrySendError::Closed(_)) => break,
                    },
                }
            }
            debug!("notification poller stopped");
        });
        Self { token, handle }
    }

    /// Cancels the task and waits for it to finish.
    pub async fn shutdown(self) {
        self.token.cancel();
        let _ = self.handle.await;
    }
}

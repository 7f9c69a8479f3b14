//! Background sweep of expired cache entries
//!
//! Lazy expiry only removes entries that get read again. The sweeper bounds memory
//! held by keys nobody asks for anymore (queues of a connection that was switched
//! away from, messages of a queue that was closed).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::cache::Sweep;

/// Default period between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Handle owning the periodic sweep task.
///
/// The task stops when `shutdown` is awaited or when the handle is dropped.
pub struct CacheSweeper {
    shutdown_tx: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl CacheSweeper {
    /// Spawns the sweep task on the current tokio runtime.
    pub fn spawn<S: Sweep + 'static>(target: Arc<S>, period: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // Skip the first tick (immediate)
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let removed = target.sweep();
                        if removed > 0 {
                            debug!("Swept {} expired cache entries", removed);
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
            debug!("Cache sweeper stopped");
        });

        Self {
            shutdown_tx,
            task: Some(task),
        }
    }

    /// Stops the sweep task and waits for it to finish.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Cache sweeper ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for CacheSweeper {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

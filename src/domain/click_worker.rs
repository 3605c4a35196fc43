//! Background worker applying click increments.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::UrlStore;

/// Retries per event after the first failed attempt.
const MAX_RETRIES: usize = 3;

/// Consumes click events and increments the matching counters.
///
/// Up to `concurrency` increments run at once; each one is a single atomic
/// statement on the store, so concurrent increments of the same code never
/// lose updates. Transient store errors are retried with exponential backoff
/// and then dropped with a warning.
///
/// Returns once every sender has been dropped and all accepted events have
/// been applied.
pub async fn run_click_worker<S>(
    mut rx: mpsc::Receiver<ClickEvent>,
    store: Arc<S>,
    concurrency: usize,
) where
    S: UrlStore + 'static,
{
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let store = store.clone();
        tasks.spawn(async move {
            apply_click(store.as_ref(), &event.short_code).await;
            drop(permit);
        });

        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}

    info!("Click worker stopped");
}

async fn apply_click<S: UrlStore + ?Sized>(store: &S, short_code: &str) {
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(MAX_RETRIES);

    match Retry::start(strategy, || store.increment_clicks(short_code)).await {
        Ok(true) => {}
        Ok(false) => debug!(short_code, "Click for unknown short code ignored"),
        Err(e) => {
            metrics::counter!("tinylink_click_increment_failures_total").increment(1);
            warn!(short_code, error = %e, "Failed to record click");
        }
    }
}

//! Delayed navigation timer.
//!
//! One-shot task on the tokio clock, so paused-time tests can step it.

use std::sync::Arc;
use std::time::Duration;

use clicktrack_core::{ClickEvent, ClickEventKind, Navigator};
use clicktrack_logging::ClickEventLogger;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::warn;

/// A scheduled navigation. Dropping the timer does not cancel it.
#[derive(Debug)]
pub struct NavigationTimer {
    destination: String,
    deadline: Instant,
    task: JoinHandle<()>,
}

impl NavigationTimer {
    /// Navigate to `destination` after `delay`. Must run inside a tokio runtime.
    pub fn schedule(
        delay: Duration,
        navigator: Arc<dyn Navigator>,
        destination: impl Into<String>,
    ) -> Self {
        let destination = destination.into();
        let deadline = Instant::now() + delay;
        let target = destination.clone();

        let task = tokio::spawn(async move {
            time::sleep_until(deadline).await;
            match navigator.navigate(&target) {
                Ok(()) => ClickEventLogger::log_event(
                    ClickEvent::new(ClickEventKind::Navigated).with_destination(target),
                ),
                Err(e) => warn!(destination = %target, error = %e, "Delayed navigation failed"),
            }
        });

        Self {
            destination,
            deadline,
            task,
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Stop the navigation if it has not fired yet.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the timer. True if it fired, false if it was cancelled.
    pub async fn wait(self) -> bool {
        self.task.await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::PageLocation;

    #[tokio::test(start_paused = true)]
    async fn fires_at_deadline() {
        let page = Arc::new(PageLocation::new());
        let start = Instant::now();
        let timer = NavigationTimer::schedule(Duration::from_millis(100), page.clone(), "/a");
        assert_eq!(timer.deadline(), start + Duration::from_millis(100));
        assert_eq!(timer.destination(), "/a");

        time::advance(Duration::from_millis(99)).await;
        assert_eq!(page.location(), None);
        assert!(!timer.is_finished());

        assert!(timer.wait().await);
        assert_eq!(page.location().as_deref(), Some("/a"));
        assert!(Instant::now() >= start + Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_navigation() {
        let page = Arc::new(PageLocation::new());
        let timer = NavigationTimer::schedule(Duration::from_millis(100), page.clone(), "/a");
        timer.cancel();

        assert!(!timer.wait().await);
        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(page.location(), None);
    }
}

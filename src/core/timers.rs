//! Background interval timers
//!
//! Each timer is a tokio task that sends a [`SiteEvent`] into the main loop's
//! channel once per period. The task is owned by a [`TimerGuard`]; dropping
//! the guard aborts it, so a timer never outlives the block that started it.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Events produced by background tasks for the main loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteEvent {
    /// Carousel at page block `block` should move to its next slide
    CarouselTick { block: usize },
}

/// Owns a running timer task
#[derive(Debug)]
pub struct TimerGuard {
    label: String,
    handle: JoinHandle<()>,
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!("Stopped timer '{}'", self.label);
    }
}

/// Send `event` every `period`, starting one period from now.
///
/// Returns `None` for a zero period (nothing to schedule). The task also
/// stops on its own once the receiving side is gone.
pub fn spawn_interval(
    label: &str,
    period: Duration,
    tx: UnboundedSender<SiteEvent>,
    event: SiteEvent,
) -> Option<TimerGuard> {
    if period.is_zero() {
        tracing::debug!("Timer '{}' has a zero period, not started", label);
        return None;
    }

    let task_label = label.to_string();
    let handle = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if tx.send(event.clone()).is_err() {
                tracing::debug!("Timer '{}' lost its receiver", task_label);
                break;
            }
        }
    });

    tracing::debug!("Started timer '{}' every {:?}", label, period);
    Some(TimerGuard {
        label: label.to_string(),
        handle,
    })
}

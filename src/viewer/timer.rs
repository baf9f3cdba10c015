//! The recurring playback timer.
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::trace;

use super::state::TimerId;

/// A running playback timer. It sends its `TimerId` down a channel once
/// per interval, starting one interval after creation, until dropped.
///
/// Dropping the handle aborts the underlying task, so no tick can be sent
/// after the timer was released.
#[derive(Debug)]
pub struct PlaybackTimer {
    id: TimerId,
    interval: Duration,
    task: JoinHandle<()>,
}

impl PlaybackTimer {
    /// Spawn a timer on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn start(id: TimerId, interval: Duration, ticks: UnboundedSender<TimerId>) -> Self {
        let task = tokio::spawn(async move {
            let mut clock = interval_at(Instant::now() + interval, interval);
            clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                let _ = clock.tick().await;
                trace!(timer = id.get(), "playback tick");
                if ticks.send(id).is_err() {
                    break;
                }
            }
        });
        PlaybackTimer { id, interval, task }
    }

    /// The identifier carried by this timer's ticks.
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Time between two ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Drop for PlaybackTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

use std::time::Duration;

use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::session::ViewerEvent;

/// Starts periodic autoplay timers. Dropping the returned handle must stop the timer.
pub trait Ticker {
    type Handle;

    fn start(&mut self, epoch: u64, period: Duration) -> Self::Handle;
}

/// Ticker backed by tokio intervals feeding a session's event queue.
pub struct TokioTicker {
    events: WeakUnboundedSender<ViewerEvent>,
}

impl TokioTicker {
    /// Holds only a weak sender so a running timer never keeps its session alive.
    pub fn new(events: WeakUnboundedSender<ViewerEvent>) -> Self {
        Self { events }
    }
}

impl Ticker for TokioTicker {
    type Handle = AutoplayTimer;

    fn start(&mut self, epoch: u64, period: Duration) -> AutoplayTimer {
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(tx) = events.upgrade() else {
                    break;
                };
                if tx.send(ViewerEvent::Tick { epoch }).is_err() {
                    break;
                }
            }
        });
        AutoplayTimer { task }
    }
}

/// A running autoplay timer; aborted when dropped.
pub struct AutoplayTimer {
    task: JoinHandle<()>,
}

impl Drop for AutoplayTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

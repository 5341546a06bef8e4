use log::{debug, warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::timer::TokioTicker;
use super::{AutoplayConfig, Intent, StoryViewer, ViewerState};
use crate::slots::StorySlide;

#[derive(Debug, Clone)]
pub enum ViewerEvent {
    Open(usize),
    Intent(Intent),
    Tick { epoch: u64 },
    Reload(Vec<StorySlide>),
    Shutdown,
}

/// Front end of a running viewer session. Dropping every handle ends the
/// session and cancels its timer.
pub struct ViewerHandle {
    events: mpsc::UnboundedSender<ViewerEvent>,
    state: watch::Receiver<ViewerState>,
    task: JoinHandle<()>,
}

/// Run a viewer on its own task. Intents and timer ticks are applied one at a
/// time in arrival order.
pub fn spawn_session(slides: Vec<StorySlide>, autoplay: AutoplayConfig) -> ViewerHandle {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(ViewerState::Closed);
    let ticker = TokioTicker::new(events_tx.downgrade());

    let task = tokio::spawn(async move {
        let mut viewer = StoryViewer::new(slides, autoplay, ticker);

        while let Some(event) = events_rx.recv().await {
            match event {
                ViewerEvent::Open(index) => viewer.open(index),
                ViewerEvent::Intent(intent) => viewer.apply(intent),
                ViewerEvent::Tick { epoch } => viewer.tick_from(epoch),
                ViewerEvent::Reload(slides) => viewer.set_slides(slides),
                ViewerEvent::Shutdown => break,
            }
            publish(&state_tx, viewer.state());
        }

        viewer.close();
        publish(&state_tx, viewer.state());
        debug!("Viewer session ended");
    });

    ViewerHandle {
        events: events_tx,
        state: state_rx,
        task,
    }
}

fn publish(state_tx: &watch::Sender<ViewerState>, next: ViewerState) {
    state_tx.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });
}

impl ViewerHandle {
    pub fn open(&self, index: usize) {
        self.send(ViewerEvent::Open(index));
    }

    pub fn dispatch(&self, intent: Intent) {
        self.send(ViewerEvent::Intent(intent));
    }

    pub fn next(&self) {
        self.dispatch(Intent::Next);
    }

    pub fn prev(&self) {
        self.dispatch(Intent::Prev);
    }

    pub fn close(&self) {
        self.dispatch(Intent::Close);
    }

    pub fn reload(&self, slides: Vec<StorySlide>) {
        self.send(ViewerEvent::Reload(slides));
    }

    /// Latest published state.
    pub fn state(&self) -> ViewerState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewerState> {
        self.state.clone()
    }

    /// Stop the session and wait until its timer is gone.
    pub async fn shutdown(self) {
        self.send(ViewerEvent::Shutdown);
        if let Err(e) = self.task.await {
            warn!("Viewer session task failed: {}", e);
        }
    }

    fn send(&self, event: ViewerEvent) {
        if self.events.send(event).is_err() {
            warn!("Viewer session is no longer running");
        }
    }
}

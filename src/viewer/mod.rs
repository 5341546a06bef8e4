//! Story viewer: which slide is showing, how far its autoplay has run, and
//! the timer that drives it.
//!
//! The viewer is either `Closed` or `Open(index, progress)`. Every transition
//! into `Open` replaces the autoplay timer (old handle dropped first), every
//! transition out of `Open` drops it, so at most one timer is alive at a time
//! and none survives the viewer.

pub mod session;
pub mod timer;

use std::time::Duration;

use log::{debug, warn};
use serde::Serialize;

use crate::slots::StorySlide;

pub use session::{spawn_session, ViewerEvent, ViewerHandle};
pub use timer::{AutoplayTimer, Ticker, TokioTicker};

pub const DEFAULT_TICK_MS: u64 = 50;
pub const DEFAULT_DURATION_MS: u64 = 15_000;

/// Navigation requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Intent {
    Next,
    Prev,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayConfig {
    pub tick: Duration,
    pub duration: Duration,
}

impl AutoplayConfig {
    pub fn new(tick: Duration, duration: Duration) -> Self {
        Self { tick, duration }
    }

    /// Ticks needed to play one slide to 100%.
    pub fn ticks_per_slide(&self) -> u32 {
        let tick = self.tick.as_millis().max(1);
        let ticks = self.duration.as_millis().div_ceil(tick);
        ticks.clamp(1, u128::from(u32::MAX)) as u32
    }

    /// Progress added per tick, in percent.
    pub fn step_percent(&self) -> f64 {
        100.0 / f64::from(self.ticks_per_slide())
    }
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_TICK_MS),
            Duration::from_millis(DEFAULT_DURATION_MS),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewerState {
    Closed,
    Open { index: usize, progress: f64 },
}

impl ViewerState {
    pub fn active_index(&self) -> Option<usize> {
        match self {
            ViewerState::Closed => None,
            ViewerState::Open { index, .. } => Some(*index),
        }
    }
}

struct ArmedTimer<H> {
    epoch: u64,
    _handle: H,
}

pub struct StoryViewer<T: Ticker> {
    slides: Vec<StorySlide>,
    autoplay: AutoplayConfig,
    ticker: T,
    active: Option<usize>,
    elapsed_ticks: u32,
    timer: Option<ArmedTimer<T::Handle>>,
    epoch: u64,
}

impl<T: Ticker> StoryViewer<T> {
    pub fn new(slides: Vec<StorySlide>, autoplay: AutoplayConfig, ticker: T) -> Self {
        Self {
            slides,
            autoplay,
            ticker,
            active: None,
            elapsed_ticks: 0,
            timer: None,
            epoch: 0,
        }
    }

    pub fn slides(&self) -> &[StorySlide] {
        &self.slides
    }

    pub fn state(&self) -> ViewerState {
        match self.active {
            None => ViewerState::Closed,
            Some(index) => ViewerState::Open {
                index,
                progress: self.progress(),
            },
        }
    }

    pub fn current_slide(&self) -> Option<&StorySlide> {
        self.active.and_then(|i| self.slides.get(i))
    }

    /// Epoch of the running autoplay timer, if any.
    pub fn timer_epoch(&self) -> Option<u64> {
        self.timer.as_ref().map(|t| t.epoch)
    }

    pub fn open(&mut self, index: usize) {
        if index >= self.slides.len() {
            warn!(
                "Ignoring open({}) with {} slides loaded",
                index,
                self.slides.len()
            );
            return;
        }
        self.enter(index);
    }

    pub fn close(&mut self) {
        if self.active.is_some() {
            debug!("Viewer closed");
        }
        self.timer = None;
        self.active = None;
        self.elapsed_ticks = 0;
    }

    pub fn next(&mut self) {
        if let Some(index) = self.active {
            self.advance_from(index);
        }
    }

    pub fn prev(&mut self) {
        match self.active {
            Some(index) if index > 0 => self.enter(index - 1),
            _ => {}
        }
    }

    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Next => self.next(),
            Intent::Prev => self.prev(),
            Intent::Close => self.close(),
        }
    }

    /// Autoplay step. Finishing the last slide closes the viewer.
    pub fn tick(&mut self) {
        let Some(index) = self.active else {
            return;
        };
        self.elapsed_ticks += 1;
        if self.elapsed_ticks >= self.autoplay.ticks_per_slide() {
            self.advance_from(index);
        }
    }

    /// Tick delivered by the timer with the given epoch; stale timers are ignored.
    pub fn tick_from(&mut self, epoch: u64) {
        if self.timer_epoch() == Some(epoch) {
            self.tick();
        } else {
            debug!("Dropping tick from stale timer epoch {}", epoch);
        }
    }

    /// Replace the slides wholesale. An open viewer restarts at the same index,
    /// or closes if that index no longer exists.
    pub fn set_slides(&mut self, slides: Vec<StorySlide>) {
        self.slides = slides;
        match self.active {
            Some(index) if index < self.slides.len() => self.enter(index),
            Some(_) => self.close(),
            None => {}
        }
    }

    fn progress(&self) -> f64 {
        f64::from(self.elapsed_ticks) * self.autoplay.step_percent()
    }

    fn advance_from(&mut self, index: usize) {
        if index + 1 < self.slides.len() {
            self.enter(index + 1);
        } else {
            self.close();
        }
    }

    fn enter(&mut self, index: usize) {
        // Cancel the old timer before starting a new one.
        self.timer = None;
        self.active = Some(index);
        self.elapsed_ticks = 0;
        self.epoch += 1;
        let handle = self.ticker.start(self.epoch, self.autoplay.tick);
        self.timer = Some(ArmedTimer {
            epoch: self.epoch,
            _handle: handle,
        });
        debug!("Viewer showing slide {} (timer epoch {})", index, self.epoch);
    }
}

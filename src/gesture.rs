//! Pointer input -> navigation intents.
//!
//! Taps and touch sequences arrive as different inputs, so a single physical
//! gesture resolves through exactly one of them. `Intent::Close` is never
//! produced here; closing is an explicit control.

use crate::viewer::Intent;

pub const DEFAULT_SWIPE_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Tap { x: f64, viewport_width: f64 },
    TouchStart { x: f64 },
    TouchEnd { x: f64 },
}

#[derive(Debug, Clone)]
pub struct GestureResolver {
    swipe_threshold: f64,
    touch_start: Option<f64>,
}

impl Default for GestureResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl GestureResolver {
    pub fn new(swipe_threshold: f64) -> Self {
        Self {
            swipe_threshold,
            touch_start: None,
        }
    }

    pub fn resolve(&mut self, input: PointerInput) -> Option<Intent> {
        match input {
            PointerInput::Tap { x, viewport_width } => Self::tap(x, viewport_width),
            PointerInput::TouchStart { x } => {
                self.touch_start = Some(x);
                None
            }
            PointerInput::TouchEnd { x } => {
                let start = self.touch_start.take()?;
                self.swipe(start, x)
            }
        }
    }

    /// Left third goes back, right third goes forward, the middle does nothing.
    pub fn tap(x: f64, viewport_width: f64) -> Option<Intent> {
        if !viewport_width.is_finite()
            || viewport_width <= 0.0
            || !(0.0..=viewport_width).contains(&x)
        {
            return None;
        }
        let third = viewport_width / 3.0;
        if x < third {
            Some(Intent::Prev)
        } else if x >= 2.0 * third {
            Some(Intent::Next)
        } else {
            None
        }
    }

    /// Moving left past the threshold goes forward, moving right goes back.
    pub fn swipe(&self, start_x: f64, end_x: f64) -> Option<Intent> {
        let delta = start_x - end_x;
        if !delta.is_finite() || delta.abs() <= self.swipe_threshold {
            return None;
        }
        if delta > 0.0 {
            Some(Intent::Next)
        } else {
            Some(Intent::Prev)
        }
    }
}

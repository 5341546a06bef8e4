use std::str::FromStr;
use std::time::Duration;

use log::warn;

use crate::gesture::{GestureResolver, DEFAULT_SWIPE_THRESHOLD};
use crate::slots::SlotCatalog;
use crate::viewer::{AutoplayConfig, DEFAULT_DURATION_MS, DEFAULT_TICK_MS};

/// Default API URL.
/// Override at build time: STORIES_API_URL=https://example.com cargo build
pub const API_BASE_URL: &str = match option_env!("STORIES_API_URL") {
    Some(url) => url,
    None => "http://localhost:8000",
};

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub autoplay: AutoplayConfig,
    pub swipe_threshold: f64,
    pub catalog: SlotCatalog,
}

impl Config {
    /// Reads `.env` if present, then the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let tick_ms = parse_or("STORIES_TICK_MS", lookup("STORIES_TICK_MS"), DEFAULT_TICK_MS);
        let duration_ms = parse_or(
            "STORIES_DURATION_MS",
            lookup("STORIES_DURATION_MS"),
            DEFAULT_DURATION_MS,
        );
        let (tick_ms, duration_ms) = if tick_ms == 0 || duration_ms < tick_ms {
            warn!(
                "Invalid autoplay timing (tick {}ms, duration {}ms), using defaults",
                tick_ms, duration_ms
            );
            (DEFAULT_TICK_MS, DEFAULT_DURATION_MS)
        } else {
            (tick_ms, duration_ms)
        };

        let swipe_threshold = parse_or(
            "STORIES_SWIPE_THRESHOLD",
            lookup("STORIES_SWIPE_THRESHOLD"),
            DEFAULT_SWIPE_THRESHOLD,
        );
        let swipe_threshold = if swipe_threshold.is_finite() && swipe_threshold > 0.0 {
            swipe_threshold
        } else {
            warn!(
                "Invalid swipe threshold {}, using {}",
                swipe_threshold, DEFAULT_SWIPE_THRESHOLD
            );
            DEFAULT_SWIPE_THRESHOLD
        };

        Self {
            api_base_url: lookup("STORIES_API_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| API_BASE_URL.to_string()),
            autoplay: AutoplayConfig::new(
                Duration::from_millis(tick_ms),
                Duration::from_millis(duration_ms),
            ),
            swipe_threshold,
            catalog: SlotCatalog::default(),
        }
    }

    pub fn gesture_resolver(&self) -> GestureResolver {
        GestureResolver::new(self.swipe_threshold)
    }
}

fn parse_or<T: FromStr + Copy>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}", key, raw);
            default
        }),
    }
}

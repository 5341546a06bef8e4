pub mod admin;
pub mod api;
pub mod config;
pub mod error;
pub mod gesture;
pub mod logging;
pub mod posters;
pub mod slots;
pub mod viewer;

#[cfg(test)]
mod test_support;

pub use error::{Error, ErrorKind, Result};

use log::{info, warn};

use crate::api::ApiClient;
use crate::config::Config;
use crate::viewer::ViewerState;

/// Load stories and posters from the configured API and play the stories
/// through once, logging each slide.
pub async fn run() {
    logging::init();
    let config = Config::from_env();
    let api = ApiClient::new(&config.api_base_url);
    info!("API base_url={}", api.base_url());

    match api.health().await {
        Ok(health) => info!("API status: {}", health.status),
        Err(e) => warn!("API health check failed, continuing offline: {}", e),
    }
    match api.get_stats().await {
        Ok(stats) => info!(
            "Stats: {} users, {}/{} posters active",
            stats.users.total, stats.posters.active, stats.posters.total
        ),
        Err(e) => warn!("Failed to fetch stats: {}", e),
    }

    let slides = slots::load_slides(&api, &config.catalog).await;
    let posters = posters::load_posters(&api).await;
    for poster in &posters {
        info!("Poster {}: {}", poster.id, poster.title);
    }

    let viewer = viewer::spawn_session(slides.clone(), config.autoplay);
    let mut state = viewer.subscribe();
    viewer.open(0);

    let mut shown = None;
    while state.changed().await.is_ok() {
        let current = *state.borrow_and_update();
        match current {
            ViewerState::Open { index, .. } if shown != Some(index) => {
                shown = Some(index);
                if let Some(slide) = slides.get(index) {
                    info!(
                        "{} {} | photo={} | {}",
                        slide.icon,
                        slide.display_name,
                        slide.photo_url.as_deref().unwrap_or("-"),
                        slide.caption.as_deref().unwrap_or("")
                    );
                }
            }
            ViewerState::Open { .. } => {}
            ViewerState::Closed => break,
        }
    }

    viewer.shutdown().await;
    info!("Stories finished");
}

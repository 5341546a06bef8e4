use log::{error, info};
use serde::Serialize;

use crate::api::types::non_blank;
use crate::api::{ApiClient, PosterRecord};
use crate::error::Result;

pub const DEFAULT_POSTER_TITLE: &str = "Event";

/// Display form of a venue poster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PosterCard {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    /// `None` for a poster without a file.
    pub image_url: Option<String>,
    pub ticket_url: Option<String>,
    pub venue_map_url: Option<String>,
    pub created_at: String,
}

impl PosterCard {
    pub fn from_record(record: &PosterRecord, api: &ApiClient) -> Result<Self> {
        let (caption_title, caption_subtitle) =
            split_caption(record.caption.as_deref().unwrap_or_default());
        let title = non_blank(record.title.as_deref())
            .map(str::to_string)
            .unwrap_or(caption_title);
        let subtitle = non_blank(record.subtitle.as_deref())
            .map(str::to_string)
            .unwrap_or(caption_subtitle);

        let venue_map_url = match non_blank(record.venue_map_file_id.as_deref()) {
            Some(file_id) => Some(api.absolute_url(&format!("/photo/{}", file_id))?),
            None => None,
        };

        let image_url = match record.photo_path() {
            Some(path) => Some(api.absolute_url(&path)?),
            None => None,
        };

        Ok(Self {
            id: record.id,
            title,
            subtitle,
            image_url,
            ticket_url: non_blank(record.ticket_url.as_deref()).map(str::to_string),
            venue_map_url,
            created_at: record.created_at.clone(),
        })
    }
}

/// First caption line is the title, the rest is the subtitle.
pub fn split_caption(caption: &str) -> (String, String) {
    let (first, rest) = caption.split_once('\n').unwrap_or((caption, ""));
    let title = first.trim_end_matches('\r').trim();
    let title = if title.is_empty() {
        DEFAULT_POSTER_TITLE
    } else {
        title
    };
    (title.to_string(), rest.trim().to_string())
}

/// Active posters, newest first. Failures are logged and yield an empty list.
pub async fn load_posters(api: &ApiClient) -> Vec<PosterCard> {
    let records = match api.get_posters().await {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to fetch posters: {}", e);
            return Vec::new();
        }
    };

    let cards: Vec<PosterCard> = records
        .iter()
        .filter(|r| r.is_active)
        .filter_map(|r| match PosterCard::from_record(r, api) {
            Ok(card) => Some(card),
            Err(e) => {
                error!("Skipping poster {}: {}", r.id, e);
                None
            }
        })
        .collect();
    info!("Loaded {} posters", cards.len());
    cards
}

/// A single poster by id, active or not. Unknown ids and failures yield `None`.
pub async fn poster_by_id(api: &ApiClient, poster_id: i64) -> Option<PosterCard> {
    match api.get_poster(poster_id).await {
        Ok(Some(record)) => PosterCard::from_record(&record, api)
            .map_err(|e| error!("Skipping poster {}: {}", record.id, e))
            .ok(),
        Ok(None) => {
            info!("Poster {} not found", poster_id);
            None
        }
        Err(e) => {
            error!("Failed to fetch poster {}: {}", poster_id, e);
            None
        }
    }
}

pub async fn latest_poster(api: &ApiClient) -> Option<PosterCard> {
    match api.get_latest_poster().await {
        Ok(Some(record)) => PosterCard::from_record(&record, api)
            .map_err(|e| error!("Skipping poster {}: {}", record.id, e))
            .ok(),
        Ok(None) => None,
        Err(e) => {
            error!("Failed to fetch latest poster: {}", e);
            None
        }
    }
}

use log::{error, info, warn};

use crate::api::types::parse_timestamp;
use crate::api::StoryRecord;

use super::source::SlideSource;
use super::{Slot, SlotCatalog, StorySlide};

/// Normalize sparse story records into exactly one slide per slot, in slot order.
/// Inactive records and records outside slots 1-3 are ignored.
pub fn build_slides(records: &[StoryRecord], catalog: &SlotCatalog) -> Vec<StorySlide> {
    Slot::ALL
        .iter()
        .map(|&slot| {
            let label = catalog.label(slot);
            match pick_record(records, slot) {
                Some(record) => StorySlide {
                    slot,
                    display_name: label.display_name.clone(),
                    icon: label.icon.clone(),
                    photo_url: record.photo_path(),
                    caption: record.caption_text().map(str::to_string),
                },
                None => StorySlide::placeholder(slot, label),
            }
        })
        .collect()
}

pub fn placeholder_slides(catalog: &SlotCatalog) -> Vec<StorySlide> {
    Slot::ALL
        .iter()
        .map(|&slot| StorySlide::placeholder(slot, catalog.label(slot)))
        .collect()
}

/// Fetch from `source` and build the slot rail. A failing source degrades to
/// placeholders; this never returns fewer than three slides.
pub async fn load_slides<S: SlideSource>(source: &S, catalog: &SlotCatalog) -> Vec<StorySlide> {
    match source.fetch_stories().await {
        Ok(records) => {
            let slides = build_slides(&records, catalog);
            let filled = slides.iter().filter(|s| !s.is_placeholder()).count();
            info!(
                "Loaded {} stories, {}/{} slots filled",
                records.len(),
                filled,
                slides.len()
            );
            slides
        }
        Err(e) => {
            error!("Failed to load stories, showing placeholders: {}", e);
            placeholder_slides(catalog)
        }
    }
}

fn pick_record(records: &[StoryRecord], slot: Slot) -> Option<&StoryRecord> {
    let number = i32::from(slot.number());
    let mut matching = records
        .iter()
        .filter(|r| r.is_active && r.slot_number == Some(number));

    let mut best = matching.next()?;
    let mut extra = 0;
    for record in matching {
        extra += 1;
        if parse_timestamp(&record.created_at) > parse_timestamp(&best.created_at) {
            best = record;
        }
    }

    if extra > 0 {
        warn!(
            "Slot {} has {} active stories, showing newest (id={})",
            number,
            extra + 1,
            best.id
        );
    }
    Some(best)
}

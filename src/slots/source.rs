use std::future::Future;

use crate::api::{ApiClient, StoryRecord};
use crate::error::Result;

use super::Slot;

/// Anything that can supply story records for the slot rail.
pub trait SlideSource {
    fn fetch_stories(&self) -> impl Future<Output = Result<Vec<StoryRecord>>> + Send;
}

impl SlideSource for ApiClient {
    /// Live stories, with photo paths resolved to absolute URLs.
    async fn fetch_stories(&self) -> Result<Vec<StoryRecord>> {
        let mut stories = self.get_stories().await?;
        for story in stories.iter_mut() {
            story.photo_url = match story.photo_path() {
                Some(path) => Some(self.absolute_url(&path)?),
                None => None,
            };
        }
        Ok(stories)
    }
}

/// Fixed in-memory content, e.g. for a demo build without a backend.
#[derive(Debug, Clone, Default)]
pub struct StaticSlides {
    records: Vec<StoryRecord>,
}

impl StaticSlides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_story(mut self, slot: Slot, photo_url: Option<&str>, caption: Option<&str>) -> Self {
        self.records.push(StoryRecord {
            id: self.records.len() as i64 + 1,
            file_id: None,
            photo_url: photo_url.map(str::to_string),
            caption: caption.map(str::to_string),
            slot_number: Some(i32::from(slot.number())),
            order_num: None,
            created_at: String::new(),
            is_active: true,
        });
        self
    }
}

impl SlideSource for StaticSlides {
    async fn fetch_stories(&self) -> Result<Vec<StoryRecord>> {
        Ok(self.records.clone())
    }
}

pub mod model;
pub mod source;

use serde::Serialize;

use crate::error::{Error, Result};

pub use model::{build_slides, load_slides, placeholder_slides};
pub use source::{SlideSource, StaticSlides};

pub const SLOT_COUNT: usize = 3;

/// One of the three fixed story positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Slot(u8);

impl Slot {
    pub const ALL: [Slot; SLOT_COUNT] = [Slot(1), Slot(2), Slot(3)];

    pub fn new(number: i64) -> Result<Self> {
        if (1..=SLOT_COUNT as i64).contains(&number) {
            Ok(Slot(number as u8))
        } else {
            Err(Error::Validation(format!(
                "Slot number must be 1, 2, or 3 (got {})",
                number
            )))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based position in the thumbnail rail.
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotLabel {
    pub display_name: String,
    pub icon: String,
}

impl SlotLabel {
    pub fn new(display_name: &str, icon: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Static slot -> label table. Injected wherever slides are built so it can be
/// swapped for a localized one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCatalog {
    labels: [SlotLabel; SLOT_COUNT],
}

impl SlotCatalog {
    pub fn new(labels: [SlotLabel; SLOT_COUNT]) -> Self {
        Self { labels }
    }

    pub fn label(&self, slot: Slot) -> &SlotLabel {
        &self.labels[slot.index()]
    }
}

impl Default for SlotCatalog {
    fn default() -> Self {
        Self::new([
            SlotLabel::new("Work on the project", "🛠"),
            SlotLabel::new("About us", "💬"),
            SlotLabel::new("Media staff", "📸"),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorySlide {
    pub slot: Slot,
    pub display_name: String,
    pub icon: String,
    pub photo_url: Option<String>,
    pub caption: Option<String>,
}

impl StorySlide {
    pub fn placeholder(slot: Slot, label: &SlotLabel) -> Self {
        Self {
            slot,
            display_name: label.display_name.clone(),
            icon: label.icon.clone(),
            photo_url: None,
            caption: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.photo_url.is_none() && self.caption.is_none()
    }
}

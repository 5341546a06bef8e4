use log::{error, info, warn};

use crate::api::types::non_blank;
use crate::api::{ApiClient, CreateInSlotForm, CreateStoryRequest, StoryPatch, StoryRecord};
use crate::error::{Error, Result};
use crate::slots::{build_slides, Slot, SlotCatalog, StorySlide};

/// Proof that `user_id` passed the admin check. Admin operations are only
/// reachable through one of these.
pub struct AdminSession<'a> {
    api: &'a ApiClient,
    user_id: i64,
}

/// A story about to be placed into a slot.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryDraft {
    pub slot: Slot,
    pub photo_url: Option<String>,
    pub caption: Option<String>,
}

impl StoryDraft {
    pub fn new(slot: Slot) -> Self {
        Self {
            slot,
            photo_url: None,
            caption: None,
        }
    }

    pub fn with_photo(mut self, photo_url: &str) -> Self {
        self.photo_url = Some(photo_url.to_string());
        self
    }

    pub fn with_caption(mut self, caption: &str) -> Self {
        self.caption = Some(caption.to_string());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if non_blank(self.photo_url.as_deref()).is_none()
            && non_blank(self.caption.as_deref()).is_none()
        {
            return Err(Error::Validation(
                "Add a photo or a caption to the story".to_string(),
            ));
        }
        Ok(())
    }
}

/// Raw image bytes picked in the admin panel.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

impl PhotoUpload {
    pub fn validate(&self) -> Result<()> {
        if !self.content_type.starts_with("image/") {
            return Err(Error::Validation("File must be an image".to_string()));
        }
        if self.bytes.is_empty() {
            return Err(Error::Validation("Image file is empty".to_string()));
        }
        Ok(())
    }
}

impl<'a> AdminSession<'a> {
    /// A failed check counts as denied; nothing admin-only is fetched then.
    pub async fn authorize(api: &'a ApiClient, user_id: i64) -> Result<Self> {
        match api.check_admin(user_id).await {
            Ok(true) => {
                info!("Admin session opened for user {}", user_id);
                Ok(Self { api, user_id })
            }
            Ok(false) => {
                warn!("User {} is not an admin", user_id);
                Err(Error::AccessDenied(user_id))
            }
            Err(e) => {
                error!("Admin check failed for user {}: {}", user_id, e);
                Err(Error::AccessDenied(user_id))
            }
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Current content of every slot, as the viewer would show it.
    pub async fn slot_overview(&self, catalog: &SlotCatalog) -> Result<Vec<StorySlide>> {
        let stories = self.api.get_stories().await?;
        Ok(build_slides(&stories, catalog))
    }

    /// Replace the story in `draft.slot`.
    pub async fn create_in_slot(&self, draft: &StoryDraft) -> Result<StoryRecord> {
        draft.validate()?;
        let form = CreateInSlotForm {
            user_id: self.user_id,
            slot_number: i32::from(draft.slot.number()),
            file_id: non_blank(draft.photo_url.as_deref())
                .unwrap_or_default()
                .to_string(),
            caption: non_blank(draft.caption.as_deref()).map(str::to_string),
        };
        let story = self.api.create_story_in_slot(&form).await?;
        info!("Story {} published to slot {}", story.id, form.slot_number);
        Ok(story)
    }

    /// Upload the photo (if any) and publish the story in one step.
    /// Validation happens before the upload so a rejected draft sends nothing.
    pub async fn publish(
        &self,
        slot: Slot,
        photo: Option<PhotoUpload>,
        caption: Option<&str>,
    ) -> Result<StoryRecord> {
        let mut draft = StoryDraft::new(slot);
        draft.caption = caption.map(str::to_string);
        if let Some(photo) = &photo {
            photo.validate()?;
        } else {
            draft.validate()?;
        }

        if let Some(photo) = photo {
            draft.photo_url = Some(self.upload_photo(photo).await?);
        }
        self.create_in_slot(&draft).await
    }

    /// Unslotted story via the legacy endpoint.
    pub async fn create_story(
        &self,
        file_id: &str,
        caption: Option<&str>,
        order_num: i32,
    ) -> Result<StoryRecord> {
        if file_id.trim().is_empty() {
            return Err(Error::Validation("A story needs a file id".to_string()));
        }
        let req = CreateStoryRequest {
            file_id: file_id.to_string(),
            caption: caption.map(str::to_string),
            order_num,
        };
        self.api.create_story(self.user_id, &req).await
    }

    pub async fn update_story(&self, story_id: i64, patch: &StoryPatch) -> Result<StoryRecord> {
        if patch.is_empty() {
            return Err(Error::Validation("No fields to update".to_string()));
        }
        self.api.update_story(self.user_id, story_id, patch).await
    }

    pub async fn deactivate_story(&self, story_id: i64) -> Result<StoryRecord> {
        let patch = StoryPatch {
            is_active: Some(false),
            ..Default::default()
        };
        self.update_story(story_id, &patch).await
    }

    pub async fn delete_story(&self, story_id: i64) -> Result<()> {
        self.api.delete_story(self.user_id, story_id).await?;
        info!("Story {} deleted by user {}", story_id, self.user_id);
        Ok(())
    }

    /// Returns the server path of the stored photo.
    pub async fn upload_photo(&self, photo: PhotoUpload) -> Result<String> {
        photo.validate()?;
        let resp = self
            .api
            .upload_story_photo(self.user_id, photo.bytes, &photo.filename, &photo.content_type)
            .await?;
        info!("Story photo uploaded: {}", resp.photo_url);
        Ok(resp.photo_url)
    }
}

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::types::*;
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn a server-relative path such as `/uploads/stories/x.jpg` into a full URL.
    /// Absolute URLs are returned unchanged.
    pub fn absolute_url(&self, path: &str) -> Result<String> {
        if let Ok(url) = url::Url::parse(path) {
            return Ok(url.to_string());
        }
        let joined = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        Ok(url::Url::parse(&joined)?.to_string())
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        read_json(resp).await
    }

    // ── Stories ─────────────────────────────────────────────────────────

    pub async fn get_stories(&self) -> Result<Vec<StoryRecord>> {
        let resp = self
            .client
            .get(format!("{}/stories", self.base_url))
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn create_story(&self, user_id: i64, req: &CreateStoryRequest) -> Result<StoryRecord> {
        let resp = self
            .client
            .post(format!("{}/stories", self.base_url))
            .query(&[("user_id", user_id)])
            .json(req)
            .send()
            .await?;
        read_json(resp).await
    }

    /// Create a story in a slot. The server deactivates the slot's previous story.
    pub async fn create_story_in_slot(&self, form: &CreateInSlotForm) -> Result<StoryRecord> {
        let resp = self
            .client
            .post(format!("{}/stories/create-in-slot", self.base_url))
            .form(form)
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn update_story(
        &self,
        user_id: i64,
        story_id: i64,
        patch: &StoryPatch,
    ) -> Result<StoryRecord> {
        let resp = self
            .client
            .put(format!("{}/stories/{}", self.base_url, story_id))
            .query(&[("user_id", user_id)])
            .json(patch)
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn delete_story(&self, user_id: i64, story_id: i64) -> Result<()> {
        let resp = self
            .client
            .delete(format!("{}/stories/{}", self.base_url, story_id))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    pub async fn upload_story_photo(
        &self,
        user_id: i64,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<UploadResponse> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = Form::new()
            .text("user_id", user_id.to_string())
            .part("file", part);

        let resp = self
            .client
            .post(format!("{}/upload-story-photo", self.base_url))
            .multipart(form)
            .send()
            .await?;
        read_json(resp).await
    }

    // ── Posters ─────────────────────────────────────────────────────────

    pub async fn get_posters(&self) -> Result<Vec<PosterRecord>> {
        let resp = self
            .client
            .get(format!("{}/posters", self.base_url))
            .send()
            .await?;
        read_json(resp).await
    }

    /// `Ok(None)` when there is no active poster.
    pub async fn get_latest_poster(&self) -> Result<Option<PosterRecord>> {
        let resp = self
            .client
            .get(format!("{}/posters/latest", self.base_url))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        read_json(resp).await.map(Some)
    }

    /// Poster detail; `Ok(None)` for an unknown id. The server sends no
    /// `photo_url` here, so callers resolve it from `file_id`.
    pub async fn get_poster(&self, poster_id: i64) -> Result<Option<PosterRecord>> {
        let resp = self
            .client
            .get(format!("{}/posters/{}", self.base_url, poster_id))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        read_json(resp).await.map(Some)
    }

    pub async fn get_stats(&self) -> Result<Stats> {
        let resp = self
            .client
            .get(format!("{}/stats", self.base_url))
            .send()
            .await?;
        read_json(resp).await
    }

    // ── Admin ───────────────────────────────────────────────────────────

    pub async fn check_admin(&self, user_id: i64) -> Result<bool> {
        let resp = self
            .client
            .get(format!("{}/check-admin/{}", self.base_url, user_id))
            .send()
            .await?;
        read_json::<AdminCheck>(resp).await.map(|c| c.is_admin)
    }
}

async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(Error::Status {
        status,
        message: extract_error(&body),
    })
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    check_status(resp)
        .await?
        .json::<T>()
        .await
        .map_err(|e| Error::Decode(e.to_string()))
}

fn extract_error(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .or_else(|| v.get("error"))?
                .as_str()
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| body.to_string())
}

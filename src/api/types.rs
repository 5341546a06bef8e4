use serde::{Deserialize, Serialize};

// ── Story types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryRecord {
    pub id: i64,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    /// Stories created through the legacy endpoint have no slot.
    #[serde(default)]
    pub slot_number: Option<i32>,
    #[serde(default)]
    pub order_num: Option<i32>,
    pub created_at: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl StoryRecord {
    /// Relative or absolute path of the story photo, if the story has one.
    /// Falls back to deriving it from `file_id` the way the server does.
    /// Caption-only stories carry an empty `file_id`, for which the server
    /// still reports a bare `/photo/` proxy path; those have no photo.
    pub fn photo_path(&self) -> Option<String> {
        if matches!(self.file_id.as_deref(), Some(id) if id.trim().is_empty()) {
            return None;
        }
        if let Some(url) = photo_url(self.photo_url.as_deref()) {
            return Some(url.to_string());
        }
        non_blank(self.file_id.as_deref()).map(|id| resolve_file_path(id, "uploads/"))
    }

    pub fn caption_text(&self) -> Option<&str> {
        non_blank(self.caption.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStoryRequest {
    pub file_id: String,
    pub caption: Option<String>,
    pub order_num: i32,
}

/// Form body of `POST /stories/create-in-slot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInSlotForm {
    pub user_id: i64,
    pub slot_number: i32,
    pub file_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_num: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl StoryPatch {
    pub fn is_empty(&self) -> bool {
        self.caption.is_none() && self.order_num.is_none() && self.is_active.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    pub photo_url: String,
    #[serde(default)]
    pub filename: Option<String>,
}

// ── Poster types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosterRecord {
    pub id: i64,
    pub file_id: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub ticket_url: Option<String>,
    #[serde(default)]
    pub venue_map_file_id: Option<String>,
    pub created_at: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl PosterRecord {
    /// `None` when the poster has no file behind it.
    pub fn photo_path(&self) -> Option<String> {
        if self.file_id.trim().is_empty() {
            return None;
        }
        match photo_url(self.photo_url.as_deref()) {
            Some(url) => Some(url.to_string()),
            None => Some(resolve_file_path(&self.file_id, "posters/")),
        }
    }
}

// ── Misc ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCheck {
    pub is_admin: bool,
}

/// Response of `GET /stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub users: UserStats,
    pub posters: PosterStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total: i64,
    pub with_vk: i64,
    pub male: i64,
    pub female: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PosterStats {
    pub total: i64,
    pub active: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
}

fn default_active() -> bool {
    true
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// A usable photo URL: non-blank and not a `/photo/` proxy path without a file id.
fn photo_url(value: Option<&str>) -> Option<&str> {
    non_blank(value).filter(|url| !url.trim_end().ends_with("/photo/"))
}

/// Files stored by the API itself live under `local_dir`; anything else is a
/// Telegram file id served through the `/photo` proxy.
pub(crate) fn resolve_file_path(file_id: &str, local_dir: &str) -> String {
    let local = format!("/{}", local_dir);
    if file_id.starts_with(&local) {
        file_id.to_string()
    } else if file_id.starts_with(local_dir) {
        format!("/{}", file_id)
    } else {
        format!("/photo/{}", file_id)
    }
}

/// Parse a server timestamp to epoch millis, falling back to 0.
/// Accepts RFC 3339 as well as naive ISO 8601 without an offset.
pub(crate) fn parse_timestamp(ts: &str) -> i64 {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(ts) {
        return dt.timestamp_millis();
    }
    chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

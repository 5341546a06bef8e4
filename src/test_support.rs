//! In-process fake of the stories REST API for client tests.

use std::sync::{Arc, Mutex};

use axum::extract::{Form, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use crate::api::types::{
    CreateInSlotForm, CreateStoryRequest, PosterRecord, StoryPatch, StoryRecord,
};

/// Nothing listens on the discard port, so connecting fails fast.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

#[derive(Default)]
struct FakeState {
    stories: Vec<StoryRecord>,
    posters: Vec<PosterRecord>,
    admins: Vec<i64>,
    next_id: i64,
    failing: bool,
    requests: usize,
}

#[derive(Clone, Default)]
pub struct FakeApi {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_admin(&self, user_id: i64) {
        self.inner.lock().unwrap().admins.push(user_id);
    }

    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().unwrap().failing = failing;
    }

    /// `file_id: None` stores a caption-only story, which the server keeps
    /// with an empty file id.
    pub fn add_story(&self, slot: i32, file_id: Option<&str>, caption: Option<&str>) -> i64 {
        self.add_story_at(slot, file_id, caption, "2025-05-01T18:00:00")
    }

    pub fn add_story_at(
        &self,
        slot: i32,
        file_id: Option<&str>,
        caption: Option<&str>,
        created_at: &str,
    ) -> i64 {
        let mut state = self.inner.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.stories.push(StoryRecord {
            id,
            file_id: Some(file_id.unwrap_or_default().to_string()),
            photo_url: None,
            caption: caption.map(str::to_string),
            slot_number: Some(slot),
            order_num: Some(0),
            created_at: created_at.to_string(),
            is_active: true,
        });
        id
    }

    pub fn add_poster(&self, file_id: &str, caption: Option<&str>) -> i64 {
        let mut state = self.inner.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.posters.push(PosterRecord {
            id,
            file_id: file_id.to_string(),
            photo_url: None,
            caption: caption.map(str::to_string),
            title: None,
            subtitle: None,
            ticket_url: Some("https://tickets.example.com/1".to_string()),
            venue_map_file_id: None,
            created_at: format!("2025-05-{:02}T20:00:00", id.min(28)),
            is_active: true,
        });
        id
    }

    pub fn deactivate_poster(&self, poster_id: i64) {
        let mut state = self.inner.lock().unwrap();
        if let Some(poster) = state.posters.iter_mut().find(|p| p.id == poster_id) {
            poster.is_active = false;
        }
    }

    pub fn stories(&self) -> Vec<StoryRecord> {
        self.inner.lock().unwrap().stories.clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.lock().unwrap().requests
    }
}

/// Bind the fake API to an ephemeral port and return its base URL.
pub async fn serve(api: FakeApi) -> String {
    let app = Router::new()
        .route("/health", get(health))
        .route("/stories", get(list_stories).post(create_story))
        .route("/stories/create-in-slot", post(create_in_slot))
        .route("/stories/{id}", put(update_story).delete(delete_story))
        .route("/posters", get(list_posters))
        .route("/posters/latest", get(latest_poster))
        .route("/posters/{id}", get(get_poster))
        .route("/stats", get(stats))
        .route("/check-admin/{user_id}", get(check_admin))
        .route("/upload-story-photo", post(upload_photo))
        .with_state(api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[derive(Deserialize)]
struct UserQuery {
    user_id: i64,
}

fn detail(status: StatusCode, msg: &str) -> Response {
    (status, Json(serde_json::json!({ "detail": msg }))).into_response()
}

fn unavailable() -> Response {
    detail(StatusCode::SERVICE_UNAVAILABLE, "Database not available")
}

/// Listing endpoints report local files under `/{local_dir}` and everything
/// else through the Telegram proxy, even when the file id is empty.
fn listed_photo_url(file_id: &str, local_dir: &str) -> String {
    if file_id.starts_with(&format!("/{}", local_dir)) {
        file_id.to_string()
    } else if file_id.starts_with(local_dir) {
        format!("/{}", file_id)
    } else {
        format!("/photo/{}", file_id)
    }
}

fn listed_story(story: &StoryRecord) -> StoryRecord {
    let file_id = story.file_id.clone().unwrap_or_default();
    StoryRecord {
        photo_url: Some(listed_photo_url(&file_id, "uploads/")),
        file_id: Some(file_id),
        ..story.clone()
    }
}

fn listed_poster(poster: &PosterRecord) -> PosterRecord {
    PosterRecord {
        photo_url: Some(listed_photo_url(&poster.file_id, "posters/")),
        ..poster.clone()
    }
}

async fn health(State(api): State<FakeApi>) -> Response {
    let mut state = api.inner.lock().unwrap();
    state.requests += 1;
    if state.failing {
        return unavailable();
    }
    Json(serde_json::json!({ "status": "healthy", "database": "connected" })).into_response()
}

async fn list_stories(State(api): State<FakeApi>) -> Response {
    let mut state = api.inner.lock().unwrap();
    state.requests += 1;
    if state.failing {
        return unavailable();
    }
    let mut active: Vec<StoryRecord> = state
        .stories
        .iter()
        .filter(|s| s.is_active)
        .map(listed_story)
        .collect();
    active.sort_by_key(|s| s.slot_number);
    Json(active).into_response()
}

async fn create_story(
    State(api): State<FakeApi>,
    Query(q): Query<UserQuery>,
    Json(req): Json<CreateStoryRequest>,
) -> Response {
    let mut state = api.inner.lock().unwrap();
    state.requests += 1;
    if !state.admins.contains(&q.user_id) {
        return detail(StatusCode::FORBIDDEN, "Access denied. Admins only.");
    }
    state.next_id += 1;
    let record = StoryRecord {
        id: state.next_id,
        file_id: Some(req.file_id),
        photo_url: None,
        caption: req.caption,
        slot_number: None,
        order_num: Some(req.order_num),
        created_at: "2025-05-02T10:00:00".to_string(),
        is_active: true,
    };
    state.stories.push(record.clone());
    Json(record).into_response()
}

async fn create_in_slot(State(api): State<FakeApi>, Form(form): Form<CreateInSlotForm>) -> Response {
    let mut state = api.inner.lock().unwrap();
    state.requests += 1;
    if !state.admins.contains(&form.user_id) {
        return detail(StatusCode::FORBIDDEN, "Access denied");
    }
    if !(1..=3).contains(&form.slot_number) {
        return detail(StatusCode::BAD_REQUEST, "Slot number must be 1, 2, or 3");
    }
    for story in state.stories.iter_mut() {
        if story.slot_number == Some(form.slot_number) {
            story.is_active = false;
        }
    }
    state.next_id += 1;
    let record = StoryRecord {
        id: state.next_id,
        file_id: Some(form.file_id),
        photo_url: None,
        caption: form.caption,
        slot_number: Some(form.slot_number),
        order_num: None,
        created_at: "2025-05-03T10:00:00".to_string(),
        is_active: true,
    };
    state.stories.push(record.clone());
    Json(record).into_response()
}

async fn update_story(
    State(api): State<FakeApi>,
    Path(id): Path<i64>,
    Query(q): Query<UserQuery>,
    Json(patch): Json<StoryPatch>,
) -> Response {
    let mut state = api.inner.lock().unwrap();
    state.requests += 1;
    if !state.admins.contains(&q.user_id) {
        return detail(StatusCode::FORBIDDEN, "Access denied. Admins only.");
    }
    if patch.is_empty() {
        return detail(StatusCode::BAD_REQUEST, "No fields to update");
    }
    let Some(story) = state.stories.iter_mut().find(|s| s.id == id) else {
        return detail(StatusCode::NOT_FOUND, "Story not found");
    };
    if let Some(caption) = patch.caption {
        story.caption = Some(caption);
    }
    if let Some(order_num) = patch.order_num {
        story.order_num = Some(order_num);
    }
    if let Some(is_active) = patch.is_active {
        story.is_active = is_active;
    }
    Json(story.clone()).into_response()
}

async fn delete_story(
    State(api): State<FakeApi>,
    Path(id): Path<i64>,
    Query(q): Query<UserQuery>,
) -> Response {
    let mut state = api.inner.lock().unwrap();
    state.requests += 1;
    if !state.admins.contains(&q.user_id) {
        return detail(StatusCode::FORBIDDEN, "Access denied. Admins only.");
    }
    let before = state.stories.len();
    state.stories.retain(|s| s.id != id);
    if state.stories.len() == before {
        return detail(StatusCode::NOT_FOUND, "Story not found");
    }
    Json(serde_json::json!({ "message": "Story deleted successfully" })).into_response()
}

async fn list_posters(State(api): State<FakeApi>) -> Response {
    let mut state = api.inner.lock().unwrap();
    state.requests += 1;
    if state.failing {
        return unavailable();
    }
    let mut active: Vec<PosterRecord> = state
        .posters
        .iter()
        .filter(|p| p.is_active)
        .map(listed_poster)
        .collect();
    active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(active).into_response()
}

async fn latest_poster(State(api): State<FakeApi>) -> Response {
    let mut state = api.inner.lock().unwrap();
    state.requests += 1;
    let latest = state
        .posters
        .iter()
        .filter(|p| p.is_active)
        .max_by(|a, b| a.created_at.cmp(&b.created_at))
        .map(listed_poster);
    match latest {
        Some(poster) => Json(poster).into_response(),
        None => detail(StatusCode::NOT_FOUND, "No active posters found"),
    }
}

/// Detail view: no `photo_url`, no title split.
async fn get_poster(State(api): State<FakeApi>, Path(id): Path<i64>) -> Response {
    let mut state = api.inner.lock().unwrap();
    state.requests += 1;
    if state.failing {
        return unavailable();
    }
    match state.posters.iter().find(|p| p.id == id) {
        Some(poster) => Json(serde_json::json!({
            "id": poster.id,
            "file_id": poster.file_id,
            "caption": poster.caption,
            "ticket_url": poster.ticket_url,
            "venue_map_file_id": poster.venue_map_file_id,
            "created_at": poster.created_at,
            "is_active": poster.is_active,
        }))
        .into_response(),
        None => detail(StatusCode::NOT_FOUND, "Poster not found"),
    }
}

async fn stats(State(api): State<FakeApi>) -> Response {
    let mut state = api.inner.lock().unwrap();
    state.requests += 1;
    if state.failing {
        return unavailable();
    }
    let active = state.posters.iter().filter(|p| p.is_active).count();
    Json(serde_json::json!({
        "users": { "total": 0, "with_vk": 0, "male": 0, "female": 0 },
        "posters": { "total": state.posters.len(), "active": active },
    }))
    .into_response()
}

async fn check_admin(State(api): State<FakeApi>, Path(user_id): Path<i64>) -> Response {
    let mut state = api.inner.lock().unwrap();
    state.requests += 1;
    if state.failing {
        return unavailable();
    }
    Json(serde_json::json!({ "is_admin": state.admins.contains(&user_id) })).into_response()
}

async fn upload_photo(State(api): State<FakeApi>, mut multipart: Multipart) -> Response {
    let mut user_id = None;
    let mut filename = None;
    let mut is_image = false;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("user_id") => {
                user_id = field.text().await.ok().and_then(|t| t.parse::<i64>().ok());
            }
            Some("file") => {
                filename = field.file_name().map(str::to_string);
                is_image = field
                    .content_type()
                    .is_some_and(|c| c.starts_with("image/"));
                let _ = field.bytes().await;
            }
            _ => {}
        }
    }

    let mut state = api.inner.lock().unwrap();
    state.requests += 1;
    let admin = user_id.is_some_and(|id| state.admins.contains(&id));
    if !admin {
        return detail(StatusCode::FORBIDDEN, "Access denied");
    }
    if !is_image {
        return detail(StatusCode::BAD_REQUEST, "File must be an image");
    }
    let filename = format!("stored-{}", filename.unwrap_or_else(|| "image.jpg".to_string()));
    Json(serde_json::json!({
        "success": true,
        "photo_url": format!("/uploads/stories/{}", filename),
        "filename": filename,
    }))
    .into_response()
}

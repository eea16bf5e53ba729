#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

/// Canned answers for one in-process fake of the scene backend.
#[derive(Clone)]
pub struct FakeBackend {
    pub actors: (StatusCode, Value),
    pub search: (StatusCode, Value),
    pub scenes: Value,
    pub tagged: Value,
    /// Scene ids the frame endpoint serves an image for; others get the backend's
    /// `200 {"error": "Frame not found"}`.
    pub frames: HashSet<String>,
    pub attributes: Value,
    /// Raw query strings received by `/search`, `/scenes` and `/search_by_tag`.
    pub seen_queries: Arc<Mutex<Vec<String>>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        FakeBackend {
            actors: (StatusCode::OK, json!([])),
            search: (StatusCode::OK, json!({"query": null, "results": []})),
            scenes: json!([]),
            tagged: json!([]),
            frames: HashSet::new(),
            attributes: json!({"error": "Not found"}),
            seen_queries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl FakeBackend {
    pub fn with_actors(mut self, actors: Value) -> Self {
        self.actors = (StatusCode::OK, actors);
        self
    }

    pub fn with_search(mut self, body: Value) -> Self {
        self.search = (StatusCode::OK, body);
        self
    }

    pub fn with_frames(mut self, ids: &[&str]) -> Self {
        self.frames = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.seen_queries.lock().unwrap().clone()
    }

    fn record(&self, query: Option<String>) {
        self.seen_queries
            .lock()
            .unwrap()
            .push(query.unwrap_or_default());
    }
}

async fn actors(State(b): State<Arc<FakeBackend>>) -> Response {
    (b.actors.0, Json(b.actors.1.clone())).into_response()
}

async fn search(State(b): State<Arc<FakeBackend>>, RawQuery(q): RawQuery) -> Response {
    b.record(q);
    (b.search.0, Json(b.search.1.clone())).into_response()
}

async fn scenes(State(b): State<Arc<FakeBackend>>, RawQuery(q): RawQuery) -> Response {
    b.record(q);
    Json(b.scenes.clone()).into_response()
}

async fn search_by_tag(State(b): State<Arc<FakeBackend>>, RawQuery(q): RawQuery) -> Response {
    b.record(q);
    Json(b.tagged.clone()).into_response()
}

async fn frame(State(b): State<Arc<FakeBackend>>, Path(scene_id): Path<String>) -> Response {
    if b.frames.contains(&scene_id) {
        ([(header::CONTENT_TYPE, "image/jpeg")], JPEG_BYTES.to_vec()).into_response()
    } else {
        Json(json!({"error": "Frame not found"})).into_response()
    }
}

async fn attributes(State(b): State<Arc<FakeBackend>>, Path(_scene_id): Path<String>) -> Response {
    Json(b.attributes.clone()).into_response()
}

async fn root() -> Response {
    Json(json!({"message": "Movie Scene Search API is running!"})).into_response()
}

/// Serves `backend` on an ephemeral port and returns its base URL.
pub async fn spawn_backend(backend: FakeBackend) -> String {
    let app = Router::new()
        .route("/", get(root))
        .route("/actors", get(actors))
        .route("/search", get(search))
        .route("/scenes", get(scenes))
        .route("/search_by_tag", get(search_by_tag))
        .route("/frame/:scene_id", get(frame))
        .route("/scene_attributes/:scene_id", get(attributes))
        .with_state(Arc::new(backend));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub async fn dead_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn sample_scenes() -> Value {
    json!([
        {
            "scene_id": 1,
            "movie_name": "Heat",
            "start_time": 12.0,
            "end_time": 15.5,
            "thumbnail_path": "/thumbs/1.jpg",
            "objects": ["car", "person"],
            "tags": ["street"],
            "actors": ["Al Pacino"]
        },
        {
            "scene_id": 2,
            "movie_name": "Heat",
            "start_time": 40.25,
            "end_time": 44.0,
            "thumbnail_path": "/thumbs/2.jpg",
            "objects": [],
            "tags": [],
            "actors": []
        },
        {
            "scene_id": 3,
            "movie_name": null,
            "start_time": null,
            "end_time": null,
            "objects": null,
            "tags": ["night"]
        }
    ])
}

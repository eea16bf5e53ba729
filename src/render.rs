use futures::StreamExt;
use futures::stream;

use crate::client::{Frame, SearchClient};
use crate::data_models::Scene;

pub const NO_SCENES: &str = "No scenes found.";

/// Where a card's image comes from.
#[derive(Debug, Clone)]
pub enum Thumbnail {
    /// The backend frame endpoint served an image.
    Frame { url: String, frame: Frame },
    /// Frame lookup failed; the scene's own `thumbnail_path`.
    Declared(String),
    /// Frame lookup failed and the scene declared no path.
    Missing,
}

impl Thumbnail {
    pub fn src(&self) -> Option<&str> {
        match self {
            Thumbnail::Frame { url, .. } => Some(url),
            Thumbnail::Declared(path) => Some(path),
            Thumbnail::Missing => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneCard {
    pub scene_id: String,
    pub title: String,
    pub times: String,
    pub objects: Vec<String>,
    pub thumbnail: Thumbnail,
}

impl SceneCard {
    pub fn new(scene: &Scene, thumbnail: Thumbnail) -> SceneCard {
        SceneCard {
            scene_id: scene.scene_id.clone(),
            title: scene.title(),
            times: format_times(scene.start_secs(), scene.end_secs()),
            objects: scene.display_objects().to_vec(),
            thumbnail,
        }
    }

    pub fn objects_line(&self) -> Option<String> {
        if self.objects.is_empty() {
            None
        } else {
            Some(self.objects.join(", "))
        }
    }
}

pub fn format_times(start: f64, end: f64) -> String {
    format!("{start:.2}s — {end:.2}s")
}

#[derive(Debug, Clone, Default)]
pub enum ResultsGrid {
    /// Nothing rendered yet, or cleared while a search is in flight.
    #[default]
    Blank,
    /// A search completed with zero scenes.
    NoResults,
    Cards(Vec<SceneCard>),
}

impl ResultsGrid {
    pub fn cards(&self) -> &[SceneCard] {
        match self {
            ResultsGrid::Cards(cards) => cards,
            _ => &[],
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            ResultsGrid::Blank => String::new(),
            ResultsGrid::NoResults => format!("{NO_SCENES}\n"),
            ResultsGrid::Cards(cards) => {
                let mut out = String::new();
                for card in cards {
                    out.push_str(&format!("[{}] {}\n", card.scene_id, card.title));
                    out.push_str(&format!("  ⏱ {}\n", card.times));
                    if let Some(objects) = card.objects_line() {
                        out.push_str(&format!("  🧩 {objects}\n"));
                    }
                    match card.thumbnail.src() {
                        Some(src) => out.push_str(&format!("  🖼 {src}\n")),
                        None => out.push_str("  🖼 (no thumbnail)\n"),
                    }
                }
                out
            }
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            ResultsGrid::Blank => String::new(),
            ResultsGrid::NoResults => {
                format!(r#"<div class="no-results">{NO_SCENES}</div>"#)
            }
            ResultsGrid::Cards(cards) => {
                let mut out = String::new();
                for card in cards {
                    let img = match card.thumbnail.src() {
                        Some(src) => format!(
                            r#"<img src="{src}" alt="scene {id}">"#,
                            src = html_escape(src),
                            id = html_escape(&card.scene_id),
                        ),
                        None => r#"<div class="no-thumb"></div>"#.to_string(),
                    };
                    let objects = card
                        .objects_line()
                        .map(|o| format!(r#"<div class="objects">🧩 {}</div>"#, html_escape(&o)))
                        .unwrap_or_default();
                    out.push_str(&format!(
                        r#"<div class="scene-card" data-scene-id="{id}">
    {img}
    <div class="title">{title}</div>
    <div class="times">⏱ {times}</div>
    {objects}
</div>
"#,
                        id = html_escape(&card.scene_id),
                        title = html_escape(&card.title),
                        times = html_escape(&card.times),
                    ));
                }
                out
            }
        }
    }
}

/// Prefers the backend frame endpoint, falls back to the scene's declared path.
/// Never fails: a broken thumbnail must not take the card down with it.
pub async fn resolve_thumbnail(client: &SearchClient, scene: &Scene) -> Thumbnail {
    let url = match client.frame_url(&scene.scene_id) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(scene_id = %scene.scene_id, "cannot build frame url: {e}");
            return declared_or_missing(scene);
        }
    };

    match client.fetch_frame(&scene.scene_id).await {
        Ok(frame) => Thumbnail::Frame {
            url: url.to_string(),
            frame,
        },
        Err(e) => {
            tracing::debug!(scene_id = %scene.scene_id, "frame unavailable, using thumbnail_path: {e}");
            declared_or_missing(scene)
        }
    }
}

fn declared_or_missing(scene: &Scene) -> Thumbnail {
    match scene.thumbnail_path.as_deref() {
        Some(path) if !path.is_empty() => Thumbnail::Declared(path.to_string()),
        _ => Thumbnail::Missing,
    }
}

/// Turns a result set into the grid, probing thumbnails `concurrency` at a time.
/// Card order always matches `scenes`.
pub async fn render_results(
    client: &SearchClient,
    scenes: &[Scene],
    concurrency: usize,
) -> ResultsGrid {
    if scenes.is_empty() {
        return ResultsGrid::NoResults;
    }

    // Iterate owned scenes: the borrowed form is not Send for every lifetime, which
    // tokio::spawn and axum handlers require.
    let cards = stream::iter(scenes.iter().cloned())
        .map(|scene| async move {
            let thumbnail = resolve_thumbnail(client, &scene).await;
            SceneCard::new(&scene, thumbnail)
        })
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    ResultsGrid::Cards(cards)
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

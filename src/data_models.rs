use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// An actor as the UI sees it, after key normalization.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Selectable value. Empty when the backend sent no usable identifier.
    pub actor_id: String,
    pub name: String,
}

impl Actor {
    /// Dropdown label: the name, or `actor_<id>` when the backend sent none.
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            format!("actor_{}", self.actor_id)
        } else {
            self.name.clone()
        }
    }
}

/// Every spelling the `/actors` endpoint has used for an actor row.
///
/// The backend has emitted `{actor_id, name}`, `{actor_id, actor_name}`, `{id, label}`
/// and `{actorId, ...}` at various points. Keys are tried in declaration order and the
/// first non-null one wins.
#[derive(Deserialize, Debug, Default)]
pub struct RawActor {
    #[serde(default)]
    actor_id: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, rename = "actorId")]
    actor_id_camel: Option<Value>,
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    actor_name: Option<Value>,
    #[serde(default)]
    label: Option<Value>,
}

impl RawActor {
    pub fn normalize(self) -> Actor {
        let actor_id = [self.actor_id, self.id, self.actor_id_camel]
            .into_iter()
            .find_map(non_null)
            .map(|v| value_to_string(&v))
            .unwrap_or_default();
        let name = [self.name, self.actor_name, self.label]
            .into_iter()
            .find_map(non_null)
            .map(|v| value_to_string(&v))
            .unwrap_or_default();
        Actor { actor_id, name }
    }
}

impl From<RawActor> for Actor {
    fn from(raw: RawActor) -> Self {
        raw.normalize()
    }
}

fn non_null(v: Option<Value>) -> Option<Value> {
    v.filter(|v| !v.is_null())
}

fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Scene {
    #[serde(deserialize_with = "string_or_number")]
    pub scene_id: String,
    pub movie_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub start_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub end_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub objects: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub actors: Option<Vec<String>>,
    pub thumbnail_path: Option<String>,
}

impl Scene {
    pub fn new(scene_id: impl Into<String>) -> Scene {
        Scene {
            scene_id: scene_id.into(),
            movie_name: None,
            start_time: None,
            end_time: None,
            objects: None,
            tags: None,
            actors: None,
            thumbnail_path: None,
        }
    }

    pub fn title(&self) -> String {
        match &self.movie_name {
            Some(name) => name.clone(),
            None => format!("Scene {}", self.scene_id),
        }
    }

    /// Tags shown on the card: detected objects, else the free-form tags.
    pub fn display_objects(&self) -> &[String] {
        self.objects
            .as_deref()
            .or(self.tags.as_deref())
            .unwrap_or(&[])
    }

    pub fn start_secs(&self) -> f64 {
        self.start_time.unwrap_or(0.0)
    }

    pub fn end_secs(&self) -> f64 {
        self.end_time.unwrap_or(0.0)
    }
}

/// `/search` answers `{query, results}` today; older deployments returned the bare list.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum SearchResponse {
    Wrapped {
        #[serde(default)]
        query: Option<String>,
        results: Vec<Scene>,
    },
    Bare(Vec<Scene>),
}

impl SearchResponse {
    /// The text query the backend echoed back, if any.
    pub fn query(&self) -> Option<&str> {
        match self {
            SearchResponse::Wrapped { query, .. } => query.as_deref(),
            SearchResponse::Bare(_) => None,
        }
    }

    pub fn into_scenes(self) -> Vec<Scene> {
        match self {
            SearchResponse::Wrapped { results, .. } => results,
            SearchResponse::Bare(results) => results,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SceneAttributes {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub objects: Option<Vec<String>>,
    pub caption: Option<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub tags: Option<Vec<String>>,
    pub updated_at: Option<String>,
}

/// The attributes endpoint reports a missing scene as `200 {"error": ...}`.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum SceneAttributesResponse {
    Missing { error: String },
    Found(SceneAttributes),
}

#[derive(Deserialize, Debug)]
pub struct HealthResponse {
    pub message: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

// `array_agg` over a LEFT JOIN yields `[null]` for rows with nothing to aggregate.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(items.map(|items| items.into_iter().flatten().collect()))
}

// Postgres NUMERIC columns can come through as strings.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected seconds, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn actor(v: Value) -> Actor {
        serde_json::from_value::<RawActor>(v).unwrap().normalize()
    }

    #[test]
    fn test_actor_key_spellings_resolve_to_same_value() {
        let a = actor(json!({"actor_id": 7, "name": "Ana"}));
        let b = actor(json!({"id": "7", "actor_name": "Ana"}));
        let c = actor(json!({"actorId": 7, "label": "Ana"}));
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.actor_id, "7");
    }

    #[test]
    fn test_actor_first_present_key_wins() {
        let a = actor(json!({"actor_id": null, "id": 3, "actorId": 4, "name": null, "actor_name": "B"}));
        assert_eq!(a.actor_id, "3");
        assert_eq!(a.name, "B");
    }

    #[test]
    fn test_actor_label_fallback() {
        let a = actor(json!({"actor_id": 12}));
        assert_eq!(a.label(), "actor_12");

        let empty = actor(json!({"actor_id": 5, "name": ""}));
        assert_eq!(empty.label(), "actor_5");

        let nothing = actor(json!({}));
        assert_eq!(nothing.actor_id, "");
        assert_eq!(nothing.label(), "actor_");
    }

    #[test]
    fn test_scene_defaults() {
        let s: Scene = serde_json::from_value(json!({"scene_id": 42})).unwrap();
        assert_eq!(s.scene_id, "42");
        assert_eq!(s.title(), "Scene 42");
        assert_eq!(s.start_secs(), 0.0);
        assert!(s.display_objects().is_empty());
    }

    #[test]
    fn test_scene_objects_fall_back_to_tags() {
        let s: Scene =
            serde_json::from_value(json!({"scene_id": 1, "objects": null, "tags": ["beach"]}))
                .unwrap();
        assert_eq!(s.display_objects(), &["beach".to_string()]);

        let s: Scene =
            serde_json::from_value(json!({"scene_id": 1, "objects": [], "tags": ["beach"]}))
                .unwrap();
        assert!(s.display_objects().is_empty());
    }

    #[test]
    fn test_scene_numeric_strings_for_times() {
        let s: Scene =
            serde_json::from_value(json!({"scene_id": "9", "start_time": "1.5", "end_time": 3}))
                .unwrap();
        assert_eq!(s.start_secs(), 1.5);
        assert_eq!(s.end_secs(), 3.0);
    }

    #[test]
    fn test_search_response_shapes() {
        let wrapped: SearchResponse =
            serde_json::from_value(json!({"query": "x", "results": [{"scene_id": 1}]})).unwrap();
        let bare: SearchResponse = serde_json::from_value(json!([{"scene_id": 1}])).unwrap();
        assert_eq!(wrapped.into_scenes(), bare.into_scenes());

        let detail = serde_json::from_value::<SearchResponse>(json!({"detail": "Error fetching scenes"}));
        assert!(detail.is_err());
    }

    #[test]
    fn test_scene_lists_drop_null_entries() {
        let s: Scene = serde_json::from_value(json!({
            "scene_id": 2,
            "actors": [null],
            "objects": ["car", null, "dog"],
            "tags": null
        }))
        .unwrap();
        assert_eq!(s.actors, Some(vec![]));
        assert_eq!(s.objects, Some(vec!["car".to_string(), "dog".to_string()]));
        assert_eq!(s.tags, None);
    }

    #[test]
    fn test_null_results_is_not_a_result_set() {
        let r = serde_json::from_value::<SearchResponse>(json!({"results": null}));
        assert!(r.is_err());
    }

    #[test]
    fn test_scene_attributes_missing() {
        let r: SceneAttributesResponse =
            serde_json::from_value(json!({"error": "Not found"})).unwrap();
        assert!(matches!(r, SceneAttributesResponse::Missing { .. }));

        let r: SceneAttributesResponse =
            serde_json::from_value(json!({"objects": ["car"], "caption": "a car", "tags": [], "updated_at": null}))
                .unwrap();
        assert!(matches!(r, SceneAttributesResponse::Found(_)));
    }
}

use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::data_models::{
    Actor, HealthResponse, RawActor, Scene, SceneAttributes, SceneAttributesResponse,
    SearchResponse,
};
use crate::error::{ClientError, Result};
use crate::query::SearchQuery;

/// Raw thumbnail returned by the frame endpoint.
#[derive(Debug, Clone)]
pub struct Frame {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Thin client over the scene search backend. Every call is a single attempt.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SearchClient {
    pub fn new(base_url: &str) -> Result<SearchClient> {
        Self::with_http(base_url, reqwest::Client::new())
    }

    pub fn from_config(config: &Config) -> Result<SearchClient> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Self::with_http(&config.api_url, http)
    }

    pub fn with_http(base_url: &str, http: reqwest::Client) -> Result<SearchClient> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        // Url::join would otherwise replace the last path segment of e.g. `http://host/api`.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(SearchClient { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T> {
        let res = self.fetch_json(&url, params).await;
        if let Err(e) = &res {
            log::error!("fetch_json error for {url}: {e}");
        }
        res
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        params: &[(&str, String)],
    ) -> Result<T> {
        let resp = self.http.get(url.clone()).query(params).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// `GET /actors`, normalized to one canonical shape.
    pub async fn load_actors(&self) -> Result<Vec<Actor>> {
        let url = self.endpoint(&["actors"])?;
        let raw: Vec<RawActor> = self.get_json(url, &[]).await?;
        let actors: Vec<Actor> = raw.into_iter().map(Actor::from).collect();
        tracing::debug!(count = actors.len(), "loaded actors");
        Ok(actors)
    }

    /// `GET /search`. Accepts both the wrapped and the bare-array response shape.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Scene>> {
        let url = self.endpoint(&["search"])?;
        let response: SearchResponse = self.get_json(url, &query.params()).await?;
        if let Some(echoed) = response.query() {
            tracing::debug!(query = echoed, "backend echoed query");
        }
        Ok(response.into_scenes())
    }

    pub fn frame_url(&self, scene_id: &str) -> Result<Url> {
        self.endpoint(&["frame", scene_id])
    }

    /// `GET /frame/{scene_id}`. Anything but a 2xx image is an error: the backend answers
    /// a missing frame with a JSON body and status 200.
    pub async fn fetch_frame(&self, scene_id: &str) -> Result<Frame> {
        let url = self.frame_url(scene_id)?;
        let resp = self.http.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: format!("no frame for scene {scene_id}"),
            });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(ClientError::NotFound(format!(
                "frame for scene {scene_id} (got {content_type:?})"
            )));
        }

        let bytes = resp.bytes().await?.to_vec();
        Ok(Frame {
            content_type,
            bytes,
        })
    }

    /// `GET /scenes`, optionally restricted to one actor.
    pub async fn scenes(&self, actor_id: Option<&str>) -> Result<Vec<Scene>> {
        let url = self.endpoint(&["scenes"])?;
        let params: Vec<(&str, String)> = actor_id
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(|a| vec![("actor_id", a.to_string())])
            .unwrap_or_default();
        self.get_json(url, &params).await
    }

    pub async fn search_by_tag(&self, tag: &str) -> Result<Vec<Scene>> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(ClientError::Validation("tag must not be empty".to_string()));
        }
        let url = self.endpoint(&["search_by_tag"])?;
        self.get_json(url, &[("tag", tag.to_string())]).await
    }

    pub async fn scene_attributes(&self, scene_id: &str) -> Result<SceneAttributes> {
        let url = self.endpoint(&["scene_attributes", scene_id])?;
        match self.get_json::<SceneAttributesResponse>(url, &[]).await? {
            SceneAttributesResponse::Found(attrs) => Ok(attrs),
            SceneAttributesResponse::Missing { error } => Err(ClientError::NotFound(format!(
                "attributes for scene {scene_id}: {error}"
            ))),
        }
    }

    /// `GET /`, the backend's liveness banner.
    pub async fn health(&self) -> Result<String> {
        let url = self.base_url.clone();
        let res: HealthResponse = self.get_json(url, &[]).await?;
        Ok(res.message)
    }
}

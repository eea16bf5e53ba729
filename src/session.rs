use crate::client::SearchClient;
use crate::data_models::Actor;
use crate::query::SearchQuery;
use crate::render::{ResultsGrid, render_results};

pub const SELECT_ACTOR_PLACEHOLDER: &str = "-- Select actor (optional) --";
pub const LOADING_ACTORS_PLACEHOLDER: &str = "-- Loading actors... --";
pub const ACTORS_FAILED_PLACEHOLDER: &str = "-- Could not load actors --";

pub const STATUS_READY: &str = "ready";
pub const STATUS_LOADING_ACTORS: &str = "loading actors...";
pub const STATUS_ACTORS_LOADED: &str = "actors loaded";
pub const STATUS_ACTORS_FAILED: &str = "failed to load actors (open console for details)";
pub const STATUS_NEED_INPUT: &str = "Type a query, object or select an actor first";
pub const STATUS_SEARCHING: &str = "searching...";
pub const STATUS_SEARCH_FAILED: &str = "error loading scenes (open console)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

impl Status {
    pub fn line(&self) -> String {
        format!("Status: {}", self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorOption {
    pub value: String,
    pub label: String,
}

impl ActorOption {
    fn placeholder(label: &str) -> ActorOption {
        ActorOption {
            value: String::new(),
            label: label.to_string(),
        }
    }
}

impl From<&Actor> for ActorOption {
    fn from(actor: &Actor) -> Self {
        ActorOption {
            value: actor.actor_id.clone(),
            label: actor.label(),
        }
    }
}

/// Everything the search screen shows: actor picker, status line, result grid.
///
/// Searches take `&mut self`, so a session never has two requests racing to render.
pub struct SearchSession {
    client: SearchClient,
    thumb_concurrency: usize,
    top_k: Option<u32>,
    actor_options: Vec<ActorOption>,
    status: Status,
    grid: ResultsGrid,
}

impl SearchSession {
    pub fn new(client: SearchClient, thumb_concurrency: usize) -> SearchSession {
        let mut session = SearchSession {
            client,
            thumb_concurrency,
            top_k: None,
            actor_options: vec![ActorOption::placeholder(LOADING_ACTORS_PLACEHOLDER)],
            status: Status {
                message: String::new(),
                is_error: false,
            },
            grid: ResultsGrid::Blank,
        };
        session.set_status(STATUS_READY, false);
        session
    }

    pub fn with_top_k(mut self, top_k: Option<u32>) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn client(&self) -> &SearchClient {
        &self.client
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn actor_options(&self) -> &[ActorOption] {
        &self.actor_options
    }

    pub fn grid(&self) -> &ResultsGrid {
        &self.grid
    }

    fn set_status(&mut self, message: impl Into<String>, is_error: bool) {
        let message = message.into();
        if is_error {
            tracing::warn!(target: "scenesearch::status", "{message}");
        } else {
            tracing::info!(target: "scenesearch::status", "{message}");
        }
        self.status = Status { message, is_error };
    }

    /// Fills the actor picker. A failure leaves a placeholder and search keeps working
    /// with text and object filters.
    pub async fn load_actors(&mut self) {
        self.set_status(STATUS_LOADING_ACTORS, false);
        self.actor_options = vec![ActorOption::placeholder(LOADING_ACTORS_PLACEHOLDER)];

        match self.client.load_actors().await {
            Ok(actors) => {
                let mut options = Vec::with_capacity(actors.len() + 1);
                options.push(ActorOption::placeholder(SELECT_ACTOR_PLACEHOLDER));
                options.extend(actors.iter().map(ActorOption::from));
                self.actor_options = options;
                self.set_status(STATUS_ACTORS_LOADED, false);
            }
            Err(e) => {
                tracing::error!("failed to load actors: {e:#}");
                self.actor_options = vec![ActorOption::placeholder(ACTORS_FAILED_PLACEHOLDER)];
                self.set_status(STATUS_ACTORS_FAILED, true);
            }
        }
    }

    /// Runs one search from raw form input and renders the outcome.
    pub async fn submit(&mut self, query: &str, object: &str, actor_id: &str) {
        let params = match SearchQuery::build(query, object, actor_id) {
            Ok(params) => params.with_top_k(self.top_k),
            Err(e) => {
                tracing::debug!("search not sent: {e}");
                self.set_status(STATUS_NEED_INPUT, true);
                return;
            }
        };

        self.set_status(STATUS_SEARCHING, false);
        self.grid = ResultsGrid::Blank;

        match self.client.search(&params).await {
            Ok(scenes) => {
                self.grid = render_results(&self.client, &scenes, self.thumb_concurrency).await;
                self.set_status(format!("found {} scenes", scenes.len()), false);
            }
            Err(e) => {
                tracing::error!(?params, "search failed: {e:#}");
                self.set_status(STATUS_SEARCH_FAILED, true);
            }
        }
    }
}

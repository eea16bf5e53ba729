use serde::Deserialize;

/// Query string of the search page. Every field is optional; an HTML form submits
/// blank inputs as empty strings.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub object: Option<String>,
    pub actor_id: Option<String>,
    pub top_k: Option<String>,
}

impl SearchParams {
    /// True once the form has been submitted at least once, even with blank fields.
    pub fn is_submission(&self) -> bool {
        self.q.is_some() || self.object.is_some() || self.actor_id.is_some()
    }

    pub fn q(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }

    pub fn object(&self) -> &str {
        self.object.as_deref().unwrap_or_default()
    }

    pub fn actor_id(&self) -> &str {
        self.actor_id.as_deref().unwrap_or_default()
    }

    /// Blank or malformed values fall back to the backend default.
    pub fn top_k(&self) -> Option<u32> {
        self.top_k
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .filter(|n| *n > 0)
    }
}

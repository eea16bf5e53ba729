use crate::error::{ClientError, Result};

pub const EMPTY_QUERY_MESSAGE: &str = "no input provided";

/// Parameters for a single `/search` call. Only the populated fields become query keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub object: Option<String>,
    pub actor_id: Option<String>,
    pub top_k: Option<u32>,
}

impl SearchQuery {
    /// Builds a query from raw form input. Each field is trimmed; blank fields are dropped.
    /// Fails with [`ClientError::Validation`] when nothing is left to search by.
    pub fn build(query: &str, object: &str, actor_id: &str) -> Result<SearchQuery> {
        let q = non_blank(query);
        let object = non_blank(object);
        let actor_id = non_blank(actor_id);

        if q.is_none() && object.is_none() && actor_id.is_none() {
            return Err(ClientError::Validation(EMPTY_QUERY_MESSAGE.to_string()));
        }

        Ok(SearchQuery {
            q,
            object,
            actor_id,
            top_k: None,
        })
    }

    pub fn with_top_k(mut self, top_k: Option<u32>) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(4);
        if let Some(q) = &self.q {
            params.push(("q", q.clone()));
        }
        if let Some(object) = &self.object {
            params.push(("object", object.clone()));
        }
        if let Some(actor_id) = &self.actor_id {
            params.push(("actor_id", actor_id.clone()));
        }
        if let Some(top_k) = self.top_k {
            params.push(("top_k", top_k.to_string()));
        }
        params
    }
}

/// Same as [`SearchQuery::build`], for callers holding optional inputs.
pub fn build_query(
    query: Option<&str>,
    object: Option<&str>,
    actor_id: Option<&str>,
) -> Result<SearchQuery> {
    SearchQuery::build(
        query.unwrap_or_default(),
        object.unwrap_or_default(),
        actor_id.unwrap_or_default(),
    )
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_input_yields_validation_error() {
        let err = SearchQuery::build("", "   ", "\t").unwrap_err();
        assert!(err.is_validation());
        assert!(build_query(None, None, None).is_err());
    }

    #[test]
    fn test_only_object() {
        let q = SearchQuery::build("", " car ", "").unwrap();
        assert_eq!(q.params(), vec![("object", "car".to_string())]);
    }

    #[test]
    fn test_all_fields_in_order() {
        let q = SearchQuery::build("sunset beach", "boat", "7")
            .unwrap()
            .with_top_k(Some(5));
        let keys: Vec<&str> = q.params().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["q", "object", "actor_id", "top_k"]);
    }

    #[test]
    fn test_actor_only() {
        let q = build_query(None, None, Some("3")).unwrap();
        assert_eq!(q.params(), vec![("actor_id", "3".to_string())]);
    }
}

use std::collections::BTreeMap;

use crate::routes::View;

pub type Params = BTreeMap<String, String>;
pub type Query = BTreeMap<String, String>;

/// NavigationTarget
///
/// One navigation attempt: a named route plus its path params and query. Redirects
/// produce a new target carrying the same `params` and `query`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationTarget {
    pub name: String,
    pub params: Params,
    pub query: Query,
}

impl NavigationTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// The same params and query under a different route name.
    pub fn renamed(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            params: self.params.clone(),
            query: self.query.clone(),
        }
    }
}

/// Location
///
/// A committed history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    pub path: String,
    pub params: Params,
    pub query: Query,
    pub view: Option<View>,
}

impl Location {
    /// `path` plus the encoded query string.
    pub fn full_path(&self) -> String {
        with_query(&self.path, &self.query)
    }
}

/// Splits `/teams/3/schedule?division=champ` into path and decoded query.
/// Repeated keys keep the last value.
pub fn split_url(raw: &str) -> (String, Query) {
    let without_fragment = raw.split('#').next().unwrap_or_default();
    let (path, query) = match without_fragment.split_once('?') {
        Some((path, query)) => (path, query),
        None => (without_fragment, ""),
    };

    let query = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect::<Query>();

    let path = if path.is_empty() { "/" } else { path };
    (path.to_string(), query)
}

pub fn with_query(path: &str, query: &Query) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query.iter())
        .finish();
    format!("{path}?{encoded}")
}

//! Hypermedia link maps
//!
//! Every navigable VUI response carries a JSON object under a fixed field
//! that maps logical names to URLs. Resource views only ever reach their
//! children through these maps.

use super::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field holding the link map in hypermedia responses
pub const LINK_FIELD: &str = "route_options";

/// A named URL a resource permits traversing to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub key: String,
    pub url: String,
}

impl Link {
    pub fn new(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
        }
    }
}

/// The links of one resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Links(Vec<Link>);

impl Links {
    /// Look up a link by key; the last occurrence wins on duplicates
    pub fn get(&self, key: &str) -> Option<&Link> {
        self.0.iter().rev().find(|link| link.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|link| link.key.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Link> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Links {
    type Item = Link;
    type IntoIter = std::vec::IntoIter<Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Links {
    type Item = &'a Link;
    type IntoIter = std::slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Build one link per key/value pair
pub fn build_links<I, K, V>(kv: I) -> Links
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    Links(kv.into_iter().map(|(k, v)| Link::new(k, v)).collect())
}

/// Newer servers name the field `links`; `route_options` wins when both are sent
#[derive(Deserialize)]
struct Hypermedia {
    route_options: Option<BTreeMap<String, String>>,
    links: Option<BTreeMap<String, String>>,
}

/// Extract the link map of a hypermedia response body
pub fn parse_links(body: Value, context: &'static str) -> Result<Links> {
    let hypermedia: Hypermedia =
        serde_json::from_value(body).map_err(Error::invalid_response(context))?;
    match hypermedia.route_options.or(hypermedia.links) {
        Some(links) => Ok(build_links(links)),
        None => Err(Error::invalid_response(context)(
            serde::de::Error::missing_field(LINK_FIELD),
        )),
    }
}

/// A resource reachable through, and exposing, a set of named links
pub trait Resource {
    /// Human readable kind and name, used in errors
    fn describe(&self) -> String;

    fn links(&self) -> &Links;

    /// Look up a link the caller has to follow
    fn link(&self, key: &str) -> Result<&Link> {
        self.links().get(key).ok_or_else(|| Error::MissingLink {
            resource: self.describe(),
            key: key.to_string(),
        })
    }
}

//! Style declarations applied to card roots and addressable parts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An ordered set of style / custom-property declarations.
///
/// Keys are property names (`--accent`, `box-shadow`); values are the raw
/// declaration values. Ordering is by key so output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap(BTreeMap<String, String>);

impl StyleMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set a property, replacing any previous value.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|v| v.as_str())
    }

    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// Copy every declaration of `other` over this map.
    pub fn merge(&mut self, other: &StyleMap) {
        for (name, value) in other.iter() {
            self.set_property(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as an inline declaration block: `a: 1; b: 2`.
    pub fn to_inline(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = StyleMap::new();
        for (k, v) in iter {
            map.set_property(k, v);
        }
        map
    }
}

/// Named sub-elements a card exposes for style overrides.
///
/// Only parts the card declared can be addressed; overrides aimed at any
/// other name have nowhere to land.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartRegion {
    parts: BTreeMap<String, StyleMap>,
}

impl PartRegion {
    /// Declare a region exposing the given part names.
    pub fn with_parts<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            parts: names
                .into_iter()
                .map(|n| (n.to_string(), StyleMap::new()))
                .collect(),
        }
    }

    pub fn part(&self, name: &str) -> Option<&StyleMap> {
        self.parts.get(name)
    }

    pub fn part_mut(&mut self, name: &str) -> Option<&mut StyleMap> {
        self.parts.get_mut(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(|k| k.as_str())
    }
}

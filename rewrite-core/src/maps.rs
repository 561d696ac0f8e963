//! Named lookup tables consulted by replacement templates.
//!
//! A template such as `%{people(%1)}` looks up the text of group 1 in the
//! table named `people`. Tables are plain string-to-string maps supplied by
//! configuration; they are read-only while rewrites run.
//!
//! License: MIT OR APACHE 2.0

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A collection of named string-to-string lookup tables.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct LookupMaps {
    tables: HashMap<String, HashMap<String, String>>,
}

impl LookupMaps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a single entry, creating the table when needed.
    pub fn insert(&mut self, map: &str, key: impl Into<String>, value: impl Into<String>) {
        self.tables
            .entry(map.to_string())
            .or_default()
            .insert(key.into(), value.into());
    }

    pub fn get(&self, map: &str) -> Option<&HashMap<String, String>> {
        self.tables.get(map)
    }

    pub fn contains_map(&self, map: &str) -> bool {
        self.tables.contains_key(map)
    }

    pub fn lookup(&self, map: &str, key: &str) -> Option<&str> {
        self.tables.get(map)?.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

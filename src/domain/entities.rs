//! Domain entities: core data structures

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::domain::error::DomainError;

/// Keyed collection that keeps the key order of the source document.
///
/// Lookups go through a key index; iteration follows insertion order.
/// Re-inserting an existing key replaces the value in place, so a key
/// repeated in a JSON object keeps its first position and its last value.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog<T> {
    entries: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Catalog<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Position of `key` in document order.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for Catalog<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for (key, value) in iter {
            catalog.insert(key, value);
        }
        catalog
    }
}

struct CatalogVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for CatalogVisitor<T> {
    type Value = Catalog<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map keyed by identifier")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut catalog = Catalog::new();
        while let Some((key, value)) = map.next_entry::<String, T>()? {
            catalog.insert(key, value);
        }
        Ok(catalog)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Catalog<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CatalogVisitor(PhantomData))
    }
}

/// A measurement system, e.g. `si` or `imperial`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SystemRecord {
    #[serde(default)]
    pub name: String,
    /// Key of the parent system, absent for root-level systems
    #[serde(default)]
    pub inherits: Option<String>,
    #[serde(default)]
    pub historical: bool,
}

impl SystemRecord {
    /// Parent key as used for tree placement; an empty `inherits` counts as none.
    pub fn parent(&self) -> Option<&str> {
        self.inherits.as_deref().filter(|p| !p.is_empty())
    }
}

/// A unit of a dimension; only its system membership is modelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UnitRecord {
    #[serde(default)]
    pub systems: Vec<String>,
}

/// A physical dimension (length, mass, ...) and its units.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionRecord {
    #[serde(default)]
    pub units: Catalog<UnitRecord>,
    #[serde(default)]
    pub base_unit: Option<String>,
    /// Dimension whose units extend this one's
    #[serde(default)]
    pub inherited_units: Option<String>,
    /// Product/quotient of base dimensions, e.g. `length/time`
    #[serde(default)]
    pub derived: Option<String>,
}

impl DimensionRecord {
    pub fn inherited_units_key(&self) -> Option<&str> {
        self.inherited_units.as_deref().filter(|k| !k.is_empty())
    }

    pub fn derived_expression(&self) -> Option<&str> {
        self.derived.as_deref().filter(|d| !d.is_empty())
    }

    /// Base dimensions are the ones without a derived expression.
    pub fn is_base(&self) -> bool {
        self.derived_expression().is_none()
    }
}

/// The whole dataset: systems plus dimensions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub systems: Catalog<SystemRecord>,
    #[serde(default)]
    pub dimensions: Catalog<DimensionRecord>,
}

impl Document {
    /// Decode the typed model from an already parsed JSON value.
    ///
    /// `serde_json` is built with `preserve_order`, so object keys arrive in
    /// document order.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, DomainError> {
        Self::deserialize(value).map_err(|e| DomainError::InvalidDocument {
            message: e.to_string(),
        })
    }

    /// Decode the typed model from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, DomainError> {
        serde_json::from_str(content).map_err(|e| DomainError::InvalidDocument {
            message: e.to_string(),
        })
    }
}

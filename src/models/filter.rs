//! Declarative filter criteria shared by every list view

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel meaning "no constraint on this dimension"
pub const ALL: &str = "ALL";

/// One dimension of a filter: either unconstrained or a concrete value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterValue {
    #[default]
    All,
    Only(String),
}

impl FilterValue {
    /// `None`, blank strings and the `ALL` sentinel are all unconstrained
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => FilterValue::All,
            Some(v) if v.eq_ignore_ascii_case(ALL) => FilterValue::All,
            Some(v) => FilterValue::Only(v.to_string()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FilterValue::All)
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            FilterValue::All => None,
            FilterValue::Only(v) => Some(v),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value().unwrap_or(ALL))
    }
}

impl Serialize for FilterValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FilterValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(FilterValue::parse(raw.as_deref()))
    }
}

/// Named filter dimensions. A dimension missing from the map is `ALL`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterCriteria {
    dimensions: IndexMap<String, FilterValue>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, dimension: impl Into<String>, value: FilterValue) -> Self {
        self.set(dimension, value);
        self
    }

    pub fn set(&mut self, dimension: impl Into<String>, value: FilterValue) {
        self.dimensions.insert(dimension.into(), value);
    }

    pub fn get(&self, dimension: &str) -> &FilterValue {
        static UNCONSTRAINED: FilterValue = FilterValue::All;
        self.dimensions.get(dimension).unwrap_or(&UNCONSTRAINED)
    }

    /// True when no dimension carries a concrete value
    pub fn is_unconstrained(&self) -> bool {
        self.dimensions.values().all(FilterValue::is_all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sentinels() {
        assert_eq!(FilterValue::parse(None), FilterValue::All);
        assert_eq!(FilterValue::parse(Some("  ")), FilterValue::All);
        assert_eq!(FilterValue::parse(Some("all")), FilterValue::All);
        assert_eq!(
            FilterValue::parse(Some("COMPLETED")),
            FilterValue::Only("COMPLETED".to_string())
        );
    }

    #[test]
    fn test_missing_dimension_is_all() {
        let criteria = FilterCriteria::new().with("status", FilterValue::Only("OPEN".into()));
        assert!(criteria.get("priority").is_all());
        assert_eq!(criteria.get("status").value(), Some("OPEN"));
        assert!(!criteria.is_unconstrained());
    }

    #[test]
    fn test_json_shape() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"status": "ALL", "type": "Routine"}"#).unwrap();
        assert!(criteria.get("status").is_all());
        assert_eq!(criteria.get("type").value(), Some("Routine"));
        assert_eq!(
            serde_json::to_string(&criteria).unwrap(),
            r#"{"status":"ALL","type":"Routine"}"#
        );
    }
}

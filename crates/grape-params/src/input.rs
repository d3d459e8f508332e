//! # Bound Input
//!
//! The result of a successful bind call. [`Input`] owns the bound map and
//! offers typed accessors that fall back to a default when a key is absent
//! or holds a different shape. Accessors never fail.

use std::collections::btree_map;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use grape_core::{Map, Value};
use serde::{Deserialize, Serialize};

/// Validated, coerced request parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Input(Map);

impl From<Map> for Input {
    fn from(map: Map) -> Self {
        Self(map)
    }
}

impl From<Input> for Map {
    fn from(input: Input) -> Self {
        input.0
    }
}

impl From<Input> for Value {
    fn from(input: Input) -> Self {
        Value::Object(input.0)
    }
}

impl<'a> IntoIterator for &'a Input {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Input {
    /// String value, or `""`.
    pub fn string(&self, name: &str) -> &str {
        self.str_or_empty(name)
    }

    /// Integer value, or `default`. Only bound integers qualify.
    pub fn integer(&self, name: &str, default: i64) -> i64 {
        self.0.get(name).and_then(Value::as_i64).unwrap_or(default)
    }

    /// Float value, or `default`. Integers do not qualify.
    pub fn float(&self, name: &str, default: f64) -> f64 {
        self.0.get(name).and_then(Value::as_f64).unwrap_or(default)
    }

    /// Boolean value, or `default`.
    pub fn boolean(&self, name: &str, default: bool) -> bool {
        self.0.get(name).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Decimal string, or `""`.
    pub fn big_decimal(&self, name: &str) -> &str {
        self.str_or_empty(name)
    }

    /// A float, or a string parsed as a float, or `default`.
    pub fn numeric(&self, name: &str, default: f64) -> f64 {
        match self.0.get(name) {
            Some(Value::Float(f)) => *f,
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Date string, or `""`.
    pub fn date(&self, name: &str) -> &str {
        self.str_or_empty(name)
    }

    /// Date-time string, or `""`.
    pub fn date_time(&self, name: &str) -> &str {
        self.str_or_empty(name)
    }

    /// Time string, or `""`.
    pub fn time(&self, name: &str) -> &str {
        self.str_or_empty(name)
    }

    /// Raw value of any shape.
    pub fn json(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Parses a `YYYY-MM-DD` date.
    pub fn parse_date(&self, name: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.0.get(name)?.as_str()?, "%Y-%m-%d").ok()
    }

    /// Parses an RFC 3339 date-time.
    pub fn parse_date_time(&self, name: &str) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(self.0.get(name)?.as_str()?).ok()
    }

    /// Parses an `HH:MM:SS` time.
    pub fn parse_time(&self, name: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(self.0.get(name)?.as_str()?, "%H:%M:%S").ok()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map {
        &self.0
    }

    pub fn into_map(self) -> Map {
        self.0
    }

    fn str_or_empty(&self, name: &str) -> &str {
        self.0.get(name).and_then(Value::as_str).unwrap_or("")
    }
}

//! The normalized parameter dialect.
//!
//! Callers describe image variants with imgix-style keys (`w`, `h`, `fit`,
//! `crop`, `fm`, `auto`, `fp-x`, ...). A [`ParamSet`] holds those keys in
//! sorted order so that providers whose mappings depend on evaluation order
//! (`auto` before `fm`, `ar` before `w`/`h`) behave deterministically.

pub mod normalize;
pub mod utils;

use crate::constants::{PARAM_FROM, PARAM_SIGNED, PARAM_SOURCE, PARAM_STEP, PARAM_TO};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Multi-valued parameter, serialized comma-joined (e.g. crop edges).
    List(Vec<String>),
}

impl ParamValue {
    /// Parses a loosely typed value as given on a command line.
    pub fn parse_loose(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed {
            "true" => return ParamValue::Bool(true),
            "false" => return ParamValue::Bool(false),
            _ => {}
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return ParamValue::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return ParamValue::Float(f);
        }
        ParamValue::Str(raw.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(i) => Some(*i as f64),
            ParamValue::Float(f) => Some(*f),
            ParamValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            ParamValue::Str(s) => s.trim().parse::<f64>().ok(),
            ParamValue::List(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            ParamValue::Str(s) => s
                .trim()
                .parse::<i64>()
                .ok()
                .or_else(|| s.trim().parse::<f64>().ok().map(|f| f as i64)),
            other => other.as_f64().map(|f| f as i64),
        }
    }

    /// Loose truthiness: `false`, `0`, `""`, `"0"`, `"false"` and empty
    /// lists are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            ParamValue::Bool(b) => *b,
            ParamValue::Int(i) => *i != 0,
            ParamValue::Float(f) => *f != 0.0,
            ParamValue::Str(s) => !matches!(s.trim(), "" | "0" | "false"),
            ParamValue::List(items) => !items.is_empty(),
        }
    }

    /// Whether the rendered value contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.to_string().contains(needle)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(v) => write!(f, "{}", utils::format_number(*v)),
            ParamValue::Str(s) => write!(f, "{}", s),
            ParamValue::List(items) => write!(f, "{}", items.join(",")),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::List(value)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(value: Vec<&str>) -> Self {
        ParamValue::List(value.into_iter().map(str::to_string).collect())
    }
}

/// Key-ordered mapping of normalized parameter names to values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ParamSet(BTreeMap<String, ParamValue>);

/// Typed view of the control keys consumed by the dispatch layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Controls {
    pub signed: Option<bool>,
    pub source: Option<String>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub step: Option<i64>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(ParamValue::as_f64)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(ParamValue::as_i64)
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).map(ToString::to_string)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `defaults` overlaid with `self`; explicit keys always win.
    pub fn merged_over(self, defaults: &ParamSet) -> ParamSet {
        let mut merged = defaults.clone();
        merged.0.extend(self.0);
        merged
    }

    /// Keeps only the listed keys.
    pub fn retain_keys(&mut self, allowed: &[&str]) {
        self.0.retain(|key, _| allowed.contains(&key.as_str()));
    }

    /// Removes every control key and returns their typed values.
    pub fn take_controls(&mut self) -> Controls {
        Controls {
            signed: self.remove(PARAM_SIGNED).map(|v| v.is_truthy()),
            source: self.remove(PARAM_SOURCE).map(|v| v.to_string()),
            from: self.remove(PARAM_FROM).and_then(|v| v.as_i64()),
            to: self.remove(PARAM_TO).and_then(|v| v.as_i64()),
            step: self.remove(PARAM_STEP).and_then(|v| v.as_i64()),
        }
    }

    /// Renders the set as an `application/x-www-form-urlencoded` query.
    pub fn to_form_query(&self) -> String {
        self.iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    crate::url::form_encode(key),
                    crate::url::form_encode(&value.to_string())
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParamSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ParamSet::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<'a> IntoIterator for &'a ParamSet {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

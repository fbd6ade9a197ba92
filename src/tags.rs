//! Typed, read-only access to a way's tags
//!
//! [`TagView`] is the only way rules look at tags. It never allocates and
//! never mutates; numeric coercion is strict and reports failures as values,
//! never by panicking or by falling back to zero.

use crate::vocabulary::{Vocabulary, FALSY, TRUTHY};
use std::collections::BTreeMap;
use thiserror::Error;

/// Raw key -> value tag set of one feature
pub type Tags = BTreeMap<String, String>;

/// The value could not be parsed as a base-10 integer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not an integer")]
pub struct NotAnInteger {
    pub value: String,
}

/// The value could not be parsed as a decimal number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a number")]
pub struct NotANumber {
    pub value: String,
}

/// Parse an integer, rejecting whitespace, units and any trailing garbage
pub fn parse_int(value: &str) -> Result<i64, NotAnInteger> {
    value.parse::<i64>().map_err(|_| NotAnInteger {
        value: value.to_string(),
    })
}

/// Parse a plain decimal number such as `3.5`, `4` or `-0.25`
///
/// Exponents, `inf`/`nan` spellings, units and separators are all rejected.
pub fn parse_float(value: &str) -> Result<f64, NotANumber> {
    let plain = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'));
    let has_digit = value.chars().any(|c| c.is_ascii_digit());

    match value.parse::<f64>() {
        Ok(n) if plain && has_digit && n.is_finite() => Ok(n),
        _ => Err(NotANumber {
            value: value.to_string(),
        }),
    }
}

/// Borrowed view over a feature's tags
#[derive(Debug, Clone, Copy)]
pub struct TagView<'a> {
    tags: &'a Tags,
}

impl<'a> TagView<'a> {
    pub fn new(tags: &'a Tags) -> Self {
        Self { tags }
    }

    /// Raw value lookup; an absent key is `None`, an empty value is `Some("")`
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn has(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    /// Exact, case-sensitive key/value match
    pub fn has_value(&self, key: &str, value: &str) -> bool {
        self.get(key) == Some(value)
    }

    /// Value is one of `yes`, `true`, `1`
    pub fn is_truthy(&self, key: &str) -> bool {
        self.in_set(key, &TRUTHY)
    }

    /// Value is one of `no`, `false`, `0`
    pub fn is_falsy(&self, key: &str) -> bool {
        self.in_set(key, &FALSY)
    }

    /// Integer value; `None` when the key is absent
    pub fn as_int(&self, key: &str) -> Option<Result<i64, NotAnInteger>> {
        self.get(key).map(parse_int)
    }

    /// Decimal value; `None` when the key is absent
    pub fn as_float(&self, key: &str) -> Option<Result<f64, NotANumber>> {
        self.get(key).map(parse_float)
    }

    /// Value belongs to the vocabulary; false when the key is absent
    pub fn in_set(&self, key: &str, vocabulary: &Vocabulary) -> bool {
        self.get(key).is_some_and(|v| vocabulary.contains(v))
    }

    /// All tags in key order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

//! Per-service `KEY=VALUE` configuration reader.
//!
//! The format is the one shared by every service directory in the fleet:
//! one assignment per line, blank lines and `#` comments ignored. Parsing never
//! fails; lines that do not look like an assignment are skipped.

use std::collections::BTreeMap;

/// Parsed service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    values: BTreeMap<Box<str>, Box<str>>,
}

impl ServiceConfig {
    /// Look up a key (case-sensitive).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(AsRef::as_ref)
    }

    /// Split a comma-separated value into trimmed, non-empty items.
    ///
    /// Returns an empty list when the key is absent.
    #[must_use]
    pub fn list(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no key was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate key/value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_ref(), value.as_ref()))
    }
}

/// Parse service configuration text.
///
/// Later assignments to the same key overwrite earlier ones.
#[must_use]
pub fn parse_service_config(text: &str) -> ServiceConfig {
    let mut values = BTreeMap::new();
    for raw_line in text.lines() {
        if let Some((key, value)) = parse_line(raw_line) {
            values.insert(Box::from(key), Box::from(value));
        }
    }
    ServiceConfig { values }
}

fn parse_line(raw_line: &str) -> Option<(&str, &str)> {
    let line = raw_line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, strip_matching_quotes(value.trim())))
}

fn strip_matching_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

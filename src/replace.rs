// src/replace.rs
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::error::ConfigError;

/// Pattern that locates a type tag in a record payload. Compiled once and
/// shared read-only across all lookups. Word characters are ASCII only;
/// a tag like `"type":"café"` is not a match.
static TYPE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""type":"([A-Za-z0-9_]+)""#).expect("type tag pattern compiles")
});

/// Immutable mapping from original tag value to replacement tag value.
///
/// Built once from a `"key:value,key:value"` configuration string and never
/// mutated afterwards, so it can be shared across threads freely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplacementTable {
    entries: HashMap<String, String>,
}

impl ReplacementTable {
    /// Parse a `"key:value,key:value"` configuration string.
    ///
    /// An empty or blank string yields an empty table (every record passes
    /// through unchanged). Any pair that does not split into exactly two
    /// `:`-separated tokens fails the whole parse. Duplicate keys: last
    /// one wins.
    pub fn parse(spec: &str) -> Result<ReplacementTable, ConfigError> {
        let mut entries = HashMap::new();

        if spec.trim().is_empty() {
            return Ok(ReplacementTable { entries });
        }

        for pair in spec.split(',') {
            let tokens: Vec<&str> = pair.split(':').collect();
            match tokens.as_slice() {
                [key, value] => {
                    entries.insert((*key).to_string(), (*value).to_string());
                }
                _ => {
                    return Err(ConfigError::MalformedPair {
                        pair: pair.to_string(),
                        spec: spec.to_string(),
                    });
                }
            }
        }

        Ok(ReplacementTable { entries })
    }

    /// Look up the replacement for a tag value.
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.entries.get(tag).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extract the first (leftmost) type tag value from a payload.
pub fn extract_tag(payload: &str) -> Option<&str> {
    TYPE_TAG
        .captures(payload)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Rewrite the payload's type tag according to `table`.
///
/// The leftmost tag drives the lookup; on a hit, every occurrence of that
/// exact `"type":"<tag>"` substring is replaced. Returns `None` when the
/// payload has no tag or the tag has no mapping, so callers can tell a
/// rewrite from a pass-through without comparing payloads.
pub fn rewrite_tag(payload: &str, table: &ReplacementTable) -> Option<String> {
    let tag = extract_tag(payload)?;

    // The pattern requires one-or-more word characters, guard anyway
    if tag.is_empty() {
        return None;
    }

    let replacement = table.get(tag)?;
    let matched = format!("\"type\":\"{}\"", tag);
    let substitute = format!("\"type\":\"{}\"", replacement);
    Some(payload.replace(&matched, &substitute))
}

//! Specifier strings: `name=value` pairs separated by `|`

use crate::error::{FeedError, Result};
use std::collections::HashMap;

/// Concrete specifier values of a market occurrence
pub type Specifiers = HashMap<String, String>;

/// Parse a specifier string such as `quarternr=4|periodnr=1`
///
/// Names and values are trimmed. An empty name or value is a format error,
/// a name appearing twice is an argument error.
pub fn parse_specifiers(raw: &str) -> Result<Specifiers> {
    let mut specifiers = Specifiers::new();

    for pair in raw.split('|') {
        let (name, value) = pair.split_once('=').ok_or_else(|| {
            FeedError::InvalidFormat(format!("specifier '{}' is missing '='", pair.trim()))
        })?;

        let name = name.trim();
        let value = value.trim();

        if name.is_empty() {
            return Err(FeedError::InvalidFormat(format!(
                "specifier '{}' has an empty name",
                pair.trim()
            )));
        }
        if value.is_empty() {
            return Err(FeedError::InvalidFormat(format!(
                "specifier '{}' has an empty value",
                name
            )));
        }

        if specifiers.insert(name.to_string(), value.to_string()).is_some() {
            return Err(FeedError::InvalidArgument(format!(
                "specifier '{}' appears more than once",
                name
            )));
        }
    }

    Ok(specifiers)
}

/// Render specifiers back into wire form, sorted by name
pub fn format_specifiers(specifiers: &Specifiers) -> String {
    let mut pairs: Vec<_> = specifiers.iter().collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("|")
}

//! Subscription bindings generated from message interests

use crate::domain::Urn;
use crate::error::{FeedError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Binding that receives every system message (alive, snapshot_complete)
pub const SYSTEM_BINDING: &str = "-.-.-.#";

const FULL_WILDCARD: &str = "*.*.*.#";

/// Kinds of messages a session wants to receive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageInterest {
    All,
    Live,
    Prematch,
    HighPriority,
    LowPriority,
    VirtualSport,
}

impl MessageInterest {
    fn priority_segments(interests: &BTreeSet<MessageInterest>) -> Vec<&'static str> {
        let mut segments = Vec::new();
        if interests.contains(&MessageInterest::HighPriority) {
            segments.push("hi");
        }
        if interests.contains(&MessageInterest::LowPriority) {
            segments.push("lo");
        }
        if segments.is_empty() {
            segments.push("*");
        }
        segments
    }

    /// `pre|virt.live` segment pairs
    fn timing_segments(interests: &BTreeSet<MessageInterest>) -> Vec<&'static str> {
        let mut segments = Vec::new();
        if interests.contains(&MessageInterest::All) {
            segments.push("*.*");
        }
        if interests.contains(&MessageInterest::Prematch) {
            segments.push("pre.*");
        }
        if interests.contains(&MessageInterest::Live) {
            segments.push("*.live");
        }
        if interests.contains(&MessageInterest::VirtualSport) {
            segments.push("virt.*");
        }
        if segments.is_empty() {
            segments.push("*.*");
        }
        segments
    }
}

/// Binding patterns covering `interests`
///
/// Every combination of requested priority and timing is bound. System
/// messages are always bound unless a full wildcard already covers them.
pub fn generate_keys(interests: &[MessageInterest]) -> Result<Vec<String>> {
    if interests.is_empty() {
        return Err(FeedError::InvalidArgument(
            "at least one message interest is required".to_string(),
        ));
    }

    let interests: BTreeSet<MessageInterest> = interests.iter().copied().collect();
    let mut keys = BTreeSet::new();
    for priority in MessageInterest::priority_segments(&interests) {
        for timing in MessageInterest::timing_segments(&interests) {
            keys.insert(format!("{}.{}.#", priority, timing));
        }
    }

    if !keys.contains(FULL_WILDCARD) {
        keys.insert(SYSTEM_BINDING.to_string());
    }

    Ok(keys.into_iter().collect())
}

/// Bindings receiving only messages about `events`, plus system messages
pub fn generate_event_keys(events: &[Urn]) -> Result<Vec<String>> {
    if events.is_empty() {
        return Err(FeedError::InvalidArgument(
            "at least one event is required".to_string(),
        ));
    }

    let mut keys: BTreeSet<String> = events
        .iter()
        .map(|event| format!("#.{}:{}.{}", event.prefix(), event.kind(), event.id()))
        .collect();
    keys.insert(SYSTEM_BINDING.to_string());
    Ok(keys.into_iter().collect())
}

//! Producers (upstream feeds) and their registry

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Upstream data source that emitted a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Producer {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub active: bool,
    /// Scopes served by the producer (`live`, `prematch`, `virtual`)
    pub scope: Vec<String>,
}

impl Producer {
    pub fn new(id: i32, name: &str, description: &str, scope: &[&str]) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            active: true,
            scope: scope.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Placeholder for ids the registry does not know
    pub fn unknown(id: i32) -> Self {
        Self {
            id,
            name: "Unknown".to_string(),
            description: format!("Unknown producer {}", id),
            active: false,
            scope: Vec::new(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        !self.active && self.scope.is_empty() && self.name == "Unknown"
    }
}

/// Resolves numeric product ids to producers
pub trait ProducerRegistry: Send + Sync {
    /// Always returns a producer; unknown ids yield [`Producer::unknown`]
    fn get(&self, id: i32) -> Producer;

    fn exists(&self, id: i32) -> bool;
}

/// Registry backed by a fixed producer list
#[derive(Debug, Clone)]
pub struct StaticProducerRegistry {
    producers: HashMap<i32, Producer>,
}

impl StaticProducerRegistry {
    pub fn new(producers: impl IntoIterator<Item = Producer>) -> Self {
        Self {
            producers: producers.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

impl Default for StaticProducerRegistry {
    fn default() -> Self {
        Self::new([
            Producer::new(1, "LO", "Live Odds", &["live"]),
            Producer::new(3, "Ctrl", "Betradar Ctrl", &["prematch"]),
            Producer::new(4, "BetPal", "BetPal", &["live"]),
            Producer::new(5, "PremiumCricket", "Premium Cricket", &["live", "prematch"]),
            Producer::new(6, "VF", "Virtual football", &["virtual"]),
            Producer::new(7, "WNS", "World Number Service", &["prematch"]),
            Producer::new(8, "VBL", "Virtual Basketball League", &["virtual"]),
            Producer::new(9, "VTO", "Virtual Tennis Open", &["virtual"]),
            Producer::new(10, "VDR", "Virtual Dog Racing", &["virtual"]),
            Producer::new(11, "VHC", "Virtual Horse Classics", &["virtual"]),
            Producer::new(12, "VTI", "Virtual Tennis In-Play", &["virtual"]),
            Producer::new(14, "C", "Cashout", &["live", "prematch"]),
        ])
    }
}

impl ProducerRegistry for StaticProducerRegistry {
    fn get(&self, id: i32) -> Producer {
        self.producers
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Producer::unknown(id))
    }

    fn exists(&self, id: i32) -> bool {
        self.producers.contains_key(&id)
    }
}

//! In-process fan-out of externally sourced catalog data
//!
//! Components that learn about new or corrected descriptions outside the
//! regular refresh (a catalog push, an operator reload) publish them here and
//! every registered cache merges them.

use super::catalog::{MarketDescriptionDto, VariantDescriptionDto};
use crate::domain::Language;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Receiver of published catalog data
pub trait DescriptionSink: Send + Sync {
    fn name(&self) -> &'static str;

    fn merge_markets(&self, _descriptions: &[MarketDescriptionDto], _language: &Language) -> usize {
        0
    }

    fn merge_variants(&self, _descriptions: &[VariantDescriptionDto], _language: &Language) -> usize {
        0
    }
}

#[derive(Default)]
pub struct CacheInvalidationHub {
    sinks: RwLock<Vec<Arc<dyn DescriptionSink>>>,
}

impl CacheInvalidationHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, sink: Arc<dyn DescriptionSink>) {
        debug!("Registered description sink: {}", sink.name());
        self.sinks.write().push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.read().len()
    }

    /// Returns the total number of merged descriptions across sinks
    pub fn publish_markets(&self, descriptions: &[MarketDescriptionDto], language: &Language) -> usize {
        let sinks = self.sinks.read().clone();
        sinks
            .iter()
            .map(|sink| sink.merge_markets(descriptions, language))
            .sum()
    }

    pub fn publish_variants(&self, descriptions: &[VariantDescriptionDto], language: &Language) -> usize {
        let sinks = self.sinks.read().clone();
        sinks
            .iter()
            .map(|sink| sink.merge_variants(descriptions, language))
            .sum()
    }
}

//! Bulk-loaded description caches
//!
//! A bulk cache fetches the whole catalog of one entity kind per language and
//! merges it into a shared snapshot. Readers always see the last merged
//! snapshot; the first read of a language that was never loaded waits for a
//! single-flight load of that language, later refreshes run on the timer.

use super::catalog::{self, CatalogSource};
use super::store::CacheStore;
use super::timer::{spawn_periodic, RefreshHandle};
use crate::domain::Language;
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Entity that can be bulk-loaded from the catalog and merged per language
pub trait CatalogEntity: Clone + Send + Sync + 'static {
    type Key: Eq + Hash + Clone + Debug + Send + Sync + 'static;
    type Dto: Send + Sync + 'static;

    /// Label used in logs
    const KIND: &'static str;

    fn key_of(dto: &Self::Dto) -> Self::Key;

    fn from_dto(dto: &Self::Dto, language: &Language) -> Self;

    fn merge_dto(&mut self, dto: &Self::Dto, language: &Language);

    fn fetch<'a>(
        source: &'a dyn CatalogSource,
        language: &'a Language,
    ) -> BoxFuture<'a, catalog::Result<Vec<Self::Dto>>>;
}

/// When a bulk cache first loads and how often it refreshes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    pub startup_delay: Duration,
    pub interval: Duration,
}

impl RefreshSchedule {
    pub fn new(startup_delay: Duration, interval: Duration) -> Self {
        Self {
            startup_delay,
            interval,
        }
    }
}

pub struct BulkDescriptionCache<T: CatalogEntity> {
    source: Arc<dyn CatalogSource>,
    languages: Vec<Language>,
    schedule: RefreshSchedule,
    /// Languages loaded at least once, with the number of entries they carried
    loads: CacheStore<Language, usize>,
    entries: RwLock<HashMap<T::Key, Arc<T>>>,
}

impl<T: CatalogEntity> BulkDescriptionCache<T> {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        languages: Vec<Language>,
        schedule: RefreshSchedule,
    ) -> Self {
        Self {
            source,
            languages,
            schedule,
            loads: CacheStore::new(T::KIND, Duration::MAX),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn schedule(&self) -> RefreshSchedule {
        self.schedule
    }

    /// Fold catalog payloads for `language` into the snapshot
    ///
    /// Returns the number of payloads merged. Merging the same payload again
    /// leaves the snapshot unchanged.
    pub fn merge(&self, dtos: &[T::Dto], language: &Language) -> usize {
        let mut entries = self.entries.write();
        for dto in dtos {
            let key = T::key_of(dto);
            match entries.get_mut(&key) {
                Some(existing) => Arc::make_mut(existing).merge_dto(dto, language),
                None => {
                    entries.insert(key, Arc::new(T::from_dto(dto, language)));
                }
            }
        }
        dtos.len()
    }

    async fn fetch_and_merge(&self, language: &Language) -> catalog::Result<usize> {
        let dtos = T::fetch(self.source.as_ref(), language).await?;
        let merged = self.merge(&dtos, language);
        info!(
            "[{}] Loaded {} descriptions for language '{}'",
            T::KIND,
            merged,
            language
        );
        Ok(merged)
    }

    /// Load `language` unless it was loaded before; concurrent callers share one fetch
    pub async fn ensure_language(&self, language: &Language) -> catalog::Result<()> {
        self.loads
            .get_or_populate(language, || self.fetch_and_merge(language))
            .await
            .map(|_| ())
    }

    /// Refetch `language` regardless of earlier loads
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn refresh(&self, language: &Language) -> catalog::Result<()> {
        let merged = self.fetch_and_merge(language).await?;
        self.loads.insert(language.clone(), merged);
        Ok(())
    }

    /// Configured languages plus every language loaded on demand
    pub fn tracked_languages(&self) -> Vec<Language> {
        let mut languages: BTreeSet<Language> = self.languages.iter().cloned().collect();
        languages.extend(self.loads.keys());
        languages.into_iter().collect()
    }

    pub async fn refresh_all(&self) {
        let languages = self.tracked_languages();
        let results = join_all(languages.iter().map(|language| self.refresh(language))).await;
        for (language, result) in languages.iter().zip(results) {
            if let Err(e) = result {
                warn!(
                    "[{}] Refresh for language '{}' failed, keeping previous snapshot: {}",
                    T::KIND,
                    language,
                    e
                );
            }
        }
    }

    /// Entry for `key` with every language in `languages` loaded first
    ///
    /// A language whose load fails is skipped; the entry may then lack names
    /// in that language.
    pub async fn get(&self, key: &T::Key, languages: &[Language]) -> Option<Arc<T>> {
        for language in languages {
            if let Err(e) = self.ensure_language(language).await {
                warn!(
                    "[{}] Could not load language '{}': {}",
                    T::KIND,
                    language,
                    e
                );
            }
        }
        self.peek(key)
    }

    /// Entry for `key` from the current snapshot, never fetching
    pub fn peek(&self, key: &T::Key) -> Option<Arc<T>> {
        self.entries.read().get(key).cloned()
    }

    pub fn is_loaded(&self, language: &Language) -> bool {
        self.loads.peek(language).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Start the periodic refresh of every tracked language
    pub fn spawn_refresh(self: &Arc<Self>) -> RefreshHandle {
        let cache: Weak<Self> = Arc::downgrade(self);
        spawn_periodic(
            T::KIND,
            self.schedule.startup_delay,
            self.schedule.interval,
            move || {
                let cache = cache.clone();
                async move {
                    match cache.upgrade() {
                        Some(cache) => cache.refresh_all().await,
                        None => debug!("[{}] Cache dropped, skipping refresh", T::KIND),
                    }
                }
                .boxed()
            },
        )
    }
}

// 🗂️ Pet Desk - data fetcher + updater over one shared store handle
// Created once at startup and passed to every interaction

use crate::cache::KeyedCache;
use crate::config::MongoSecrets;
use crate::notice::Notice;
use crate::pets::listing::{ListingView, PetListing};
use crate::pets::query::{build_filter, QueryFilter, SearchInput};
use crate::pets::record::PetRecord;
use crate::pets::store::{connect, MongoPetStore, PetStore, StoreError};
use chrono::{DateTime, Duration, Utc};
use mongodb::bson::Bson;
use serde::Serialize;
use tracing::{debug, error, info};

/// How long a fetched result may be reused
pub const FETCH_TTL_MINUTES: i64 = 10;

// ============================================================================
// UPDATE OUTCOME
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// The record changed; cached reads were discarded
    Updated,

    /// The new values equal the stored ones
    NoChange,

    /// The store rejected the write
    Failed(String),

    /// No store configured, nothing was issued
    NoConnection,
}

impl UpdateOutcome {
    pub fn notice(&self) -> Notice {
        match self {
            UpdateOutcome::Updated => Notice::success("Record updated!"),
            UpdateOutcome::NoChange => {
                Notice::info("No change (the new values are the same as the stored ones)")
            }
            UpdateOutcome::Failed(message) => Notice::error(format!("Update failed: {}", message)),
            UpdateOutcome::NoConnection => Notice::error("No database connection configured"),
        }
    }
}

// ============================================================================
// PET DESK
// ============================================================================

pub struct PetDesk<S: PetStore> {
    store: Option<S>,
    cache: KeyedCache<QueryFilter, Vec<PetRecord>>,
    diagnostic: Option<Notice>,
}

impl PetDesk<MongoPetStore> {
    /// Connect once from the configured descriptor.
    ///
    /// Missing or unusable settings leave the desk without a store and record
    /// a diagnostic instead of failing.
    pub fn open(secrets: Option<&MongoSecrets>) -> Self {
        match connect(secrets) {
            Ok(Some(store)) => Self::new(Some(store)),
            Ok(None) => {
                let mut desk = Self::new(None);
                desk.diagnostic = Some(Notice::error(
                    "No connection settings found ([mongo] table missing from settings)",
                ));
                desk
            }
            Err(e) => {
                error!(error = %e, "document store unavailable");
                let mut desk = Self::new(None);
                desk.diagnostic = Some(Notice::error(format!("Cannot connect to the database: {}", e)));
                desk
            }
        }
    }
}

impl<S: PetStore> PetDesk<S> {
    pub fn new(store: Option<S>) -> Self {
        Self {
            store,
            cache: KeyedCache::with_ttl(Duration::minutes(FETCH_TTL_MINUTES)),
            diagnostic: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    /// Why the desk has no store, if that is the case
    pub fn diagnostic(&self) -> Option<&Notice> {
        self.diagnostic.as_ref()
    }

    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }

    pub fn fetch(&mut self, filter: &QueryFilter) -> Result<Vec<PetRecord>, StoreError> {
        self.fetch_at(filter, Utc::now())
    }

    /// Matching records as seen at `now`, reusing results younger than the ttl
    pub fn fetch_at(
        &mut self,
        filter: &QueryFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<PetRecord>, StoreError> {
        let Some(store) = self.store.as_ref() else {
            return Ok(Vec::new());
        };

        if let Some(records) = self.cache.get(filter, now) {
            debug!(records = records.len(), "pet query served from cache");
            return Ok(records);
        }

        let records = store.find(filter)?;
        info!(records = records.len(), criteria = ?filter.to_document(), "pet query fetched");

        self.cache.insert(filter.clone(), records.clone(), now);
        Ok(records)
    }

    /// Run the read pipeline for one set of search inputs.
    ///
    /// Without a store the listing is empty and carries the diagnostic.
    pub fn search(&mut self, input: &SearchInput) -> Result<ListingView, StoreError> {
        if let Some(diagnostic) = self.diagnostic.clone() {
            return Ok(ListingView::unavailable(diagnostic));
        }

        let records = self.fetch(&build_filter(input))?;
        Ok(PetListing::new(records).to_view())
    }

    /// Discard every cached read
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    /// Overwrite `name` and `pet` of one record, last write wins
    pub fn update(&mut self, id: &Bson, name: &str, pet: &str) -> UpdateOutcome {
        let Some(store) = self.store.as_ref() else {
            return UpdateOutcome::NoConnection;
        };

        match store.update(id, name, pet) {
            Ok(modified) if modified > 0 => {
                info!(id = %id, "pet record updated");
                self.invalidate();
                UpdateOutcome::Updated
            }
            Ok(_) => {
                info!(id = %id, "pet record unchanged");
                UpdateOutcome::NoChange
            }
            Err(e) => {
                error!(id = %id, error = %e, "pet record update failed");
                UpdateOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pets::store::memory::MemoryPetStore;
    use crate::notice::NoticeLevel;

    fn desk() -> PetDesk<MemoryPetStore> {
        PetDesk::new(Some(MemoryPetStore::with_records(vec![
            PetRecord::new("64f0a1", "Milo", "cat"),
            PetRecord::new("64f0a2", "Rex", "dog"),
            PetRecord::new("64f0a3", "Bubbles", "fish"),
        ])))
    }

    fn find_calls(desk: &PetDesk<MemoryPetStore>) -> usize {
        desk.store().unwrap().find_calls.get()
    }

    #[test]
    fn test_no_store_fetches_nothing() {
        let mut desk: PetDesk<MemoryPetStore> = PetDesk::new(None);

        assert!(!desk.is_connected());
        assert!(desk.fetch(&QueryFilter::new()).unwrap().is_empty());
        assert_eq!(
            desk.update(&Bson::String("64f0a1".into()), "Milo", "cat"),
            UpdateOutcome::NoConnection
        );
    }

    #[test]
    fn test_open_without_settings_records_diagnostic() {
        let desk = PetDesk::open(None);

        assert!(!desk.is_connected());
        assert_eq!(desk.diagnostic().unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn test_search_without_connection_degrades_to_empty_listing() {
        let mut desk = PetDesk::open(None);

        let view = desk.search(&SearchInput::default()).unwrap();

        assert_eq!(view.count, 0);
        assert!(view.records.is_empty());
        assert_eq!(view.notice.level, NoticeLevel::Error);
        assert_eq!(Some(&view.notice), desk.diagnostic());

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["count"], 0);
        assert_eq!(json["notice"]["level"], "error");
    }

    #[test]
    fn test_search_lists_matches() {
        let mut desk = desk();
        let input = SearchInput {
            search_name: "mi".to_string(),
            ..SearchInput::default()
        };

        let view = desk.search(&input).unwrap();

        assert_eq!(view.count, 1);
        assert_eq!(view.notice.text, "Found 1 records");
        assert_eq!(view.labels, vec!["Milo (Pet: cat) [ID: f0a1]"]);
    }

    #[test]
    fn test_repeated_fetch_is_cached() {
        let mut desk = desk();
        let filter = QueryFilter::new();
        let now = Utc::now();

        let first = desk.fetch_at(&filter, now).unwrap();
        let second = desk.fetch_at(&filter, now + Duration::minutes(5)).unwrap();

        assert_eq!(first, second);
        assert_eq!(find_calls(&desk), 1, "Second fetch should hit the cache");
    }

    #[test]
    fn test_cache_is_keyed_by_filter_content() {
        let mut desk = desk();
        let now = Utc::now();
        let cats = build_filter(&SearchInput {
            selected_pet: "cat".to_string(),
            ..SearchInput::default()
        });

        let all = desk.fetch_at(&QueryFilter::new(), now).unwrap();
        let only_cats = desk.fetch_at(&cats, now).unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(only_cats.len(), 1);
        assert_eq!(find_calls(&desk), 2);
    }

    #[test]
    fn test_fetch_expires_after_ten_minutes() {
        let mut desk = desk();
        let filter = QueryFilter::new();
        let now = Utc::now();

        desk.fetch_at(&filter, now).unwrap();
        desk.fetch_at(&filter, now + Duration::minutes(11)).unwrap();

        assert_eq!(find_calls(&desk), 2, "Stale entry should be refetched");
    }

    #[test]
    fn test_successful_update_invalidates_cache() {
        let mut desk = desk();
        let filter = QueryFilter::new();
        let now = Utc::now();

        desk.fetch_at(&filter, now).unwrap();
        let outcome = desk.update(&Bson::String("64f0a1".into()), "Milo II", "cat");
        let after = desk.fetch_at(&filter, now).unwrap();

        assert_eq!(outcome, UpdateOutcome::Updated);
        assert_eq!(find_calls(&desk), 2);
        assert_eq!(after[0].display_name(), "Milo II", "No stale pre-update data");
    }

    #[test]
    fn test_identical_update_reports_no_change_and_keeps_cache() {
        let mut desk = desk();
        let filter = QueryFilter::new();
        let now = Utc::now();

        desk.fetch_at(&filter, now).unwrap();
        let outcome = desk.update(&Bson::String("64f0a2".into()), "Rex", "dog");
        desk.fetch_at(&filter, now).unwrap();

        assert_eq!(outcome, UpdateOutcome::NoChange);
        assert_eq!(outcome.notice().level, NoticeLevel::Info);
        assert_eq!(find_calls(&desk), 1, "Cache must survive a no-op update");
    }

    #[test]
    fn test_failed_update_is_reported_not_raised() {
        let mut desk = desk();
        desk.store().unwrap().fail_updates.set(true);

        let outcome = desk.update(&Bson::String("64f0a1".into()), "Milo", "dog");

        match &outcome {
            UpdateOutcome::Failed(message) => assert!(message.contains("write rejected")),
            other => panic!("Expected failure, got {:?}", other),
        }
        assert_eq!(outcome.notice().level, NoticeLevel::Error);
    }
}

//! Restaurant Lookup Gateway: decides whether to query the store and fails open.
//!
//! Store failures never reach the caller. A transport or query error is logged and
//! treated exactly like "no matching restaurant". A filtered miss on an explicit
//! recommendation request is followed by one unfiltered query.

use super::{Filter, RestaurantRecord, RestaurantSource};
use rand::seq::IndexedRandom;
use std::sync::Arc;

/// Result of the lookup stage for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// No recommendation intent: the store was not consulted.
    NotPerformed,
    /// The store was consulted; possibly empty.
    Performed(Vec<RestaurantRecord>),
}

impl LookupOutcome {
    pub fn is_performed(&self) -> bool {
        matches!(self, LookupOutcome::Performed(_))
    }

    pub fn records(&self) -> &[RestaurantRecord] {
        match self {
            LookupOutcome::NotPerformed => &[],
            LookupOutcome::Performed(records) => records,
        }
    }

    /// Lookup ran and found nothing.
    pub fn is_miss(&self) -> bool {
        matches!(self, LookupOutcome::Performed(records) if records.is_empty())
    }

    /// Uniform-random choice among the matching records.
    pub fn choose(&self) -> Option<&RestaurantRecord> {
        self.records().choose(&mut rand::rng())
    }
}

/// Wraps an injected [`RestaurantSource`] with the intent gate and fail-open policy.
pub struct LookupGateway {
    source: Arc<dyn RestaurantSource>,
}

impl LookupGateway {
    pub fn new(source: Arc<dyn RestaurantSource>) -> Self {
        Self { source }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Runs the lookup stage. `explicit_request` is true when the message contained a
    /// recommendation word; a non-empty filter alone also counts as intent.
    pub async fn lookup(&self, filter: &Filter, explicit_request: bool) -> LookupOutcome {
        if !explicit_request && filter.is_empty() {
            return LookupOutcome::NotPerformed;
        }

        let found = self.find_or_empty(filter).await;
        if found.is_empty() && explicit_request && !filter.is_empty() {
            tracing::debug!(target: "tugi::lookup", ?filter, "Filtered lookup missed; querying without filter");
            return LookupOutcome::Performed(self.find_or_empty(&Filter::default()).await);
        }
        LookupOutcome::Performed(found)
    }

    async fn find_or_empty(&self, filter: &Filter) -> Vec<RestaurantRecord> {
        match self.source.find(filter).await {
            Ok(records) => {
                tracing::debug!(
                    target: "tugi::lookup",
                    source = self.source.name(),
                    matches = records.len(),
                    ?filter,
                    "Restaurant lookup finished"
                );
                records
            }
            Err(e) => {
                tracing::warn!(
                    target: "tugi::lookup",
                    source = self.source.name(),
                    error = %e,
                    "Restaurant lookup failed; treating as no match"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restaurant::StoreError;
    use std::sync::Mutex;

    /// In-memory source that records every filter it was queried with.
    struct FakeSource {
        records: Vec<RestaurantRecord>,
        fail: bool,
        calls: Mutex<Vec<Filter>>,
    }

    impl FakeSource {
        fn with(records: Vec<RestaurantRecord>) -> Arc<Self> {
            Arc::new(Self { records, fail: false, calls: Mutex::new(Vec::new()) })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self { records: Vec::new(), fail: true, calls: Mutex::new(Vec::new()) })
        }

        fn calls(&self) -> Vec<Filter> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl RestaurantSource for FakeSource {
        fn name(&self) -> &str {
            "fake"
        }

        async fn find(&self, filter: &Filter) -> Result<Vec<RestaurantRecord>, StoreError> {
            self.calls.lock().unwrap().push(filter.clone());
            if self.fail {
                return Err(StoreError::Transport("connection refused".into()));
            }
            Ok(self.records.iter().filter(|r| filter.matches(r)).cloned().collect())
        }
    }

    fn record(location: &str, kind: &str) -> RestaurantRecord {
        RestaurantRecord {
            id: format!("{}-{}", location, kind),
            name: "A".into(),
            location: location.into(),
            kind: kind.into(),
            desc: "d".into(),
            image_url: "u".into(),
        }
    }

    fn haeundae() -> Filter {
        Filter { location: Some("해운대".into()), kind: None }
    }

    #[tokio::test]
    async fn no_intent_skips_the_store() {
        let source = FakeSource::with(vec![record("해운대", "카페")]);
        let gateway = LookupGateway::new(source.clone());
        assert_eq!(gateway.lookup(&Filter::default(), false).await, LookupOutcome::NotPerformed);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn filter_alone_triggers_filtered_query() {
        let source = FakeSource::with(vec![record("해운대", "카페"), record("서면", "카페")]);
        let gateway = LookupGateway::new(source.clone());
        let outcome = gateway.lookup(&haeundae(), false).await;
        assert_eq!(outcome.records().len(), 1);
        assert_eq!(source.calls(), vec![haeundae()]);
    }

    #[tokio::test]
    async fn explicit_request_without_filter_fetches_everything() {
        let source = FakeSource::with(vec![record("해운대", "카페"), record("서면", "밀면")]);
        let gateway = LookupGateway::new(source.clone());
        let outcome = gateway.lookup(&Filter::default(), true).await;
        assert_eq!(outcome.records().len(), 2);
        assert_eq!(source.calls(), vec![Filter::default()]);
    }

    #[tokio::test]
    async fn filtered_miss_on_explicit_request_requeries_unfiltered() {
        let source = FakeSource::with(vec![record("서면", "밀면")]);
        let gateway = LookupGateway::new(source.clone());
        let outcome = gateway.lookup(&haeundae(), true).await;
        assert_eq!(outcome.records().len(), 1);
        assert_eq!(outcome.records()[0].location, "서면");
        assert_eq!(source.calls(), vec![haeundae(), Filter::default()]);
    }

    #[tokio::test]
    async fn filtered_hit_does_not_requery() {
        let source = FakeSource::with(vec![record("해운대", "카페"), record("서면", "밀면")]);
        let gateway = LookupGateway::new(source.clone());
        assert_eq!(gateway.lookup(&haeundae(), true).await.records().len(), 1);
        assert_eq!(source.calls(), vec![haeundae()]);
    }

    #[tokio::test]
    async fn filter_only_miss_stays_empty() {
        let source = FakeSource::with(vec![record("서면", "밀면")]);
        let gateway = LookupGateway::new(source.clone());
        assert!(gateway.lookup(&haeundae(), false).await.is_miss());
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn requery_against_empty_store_is_a_miss() {
        let source = FakeSource::with(Vec::new());
        let gateway = LookupGateway::new(source.clone());
        assert!(gateway.lookup(&haeundae(), true).await.is_miss());
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn store_failure_fails_open() {
        let gateway = LookupGateway::new(FakeSource::failing());
        let outcome = gateway.lookup(&haeundae(), true).await;
        assert_eq!(outcome, LookupOutcome::Performed(Vec::new()));
        assert!(outcome.choose().is_none());
    }

    #[test]
    fn choose_picks_one_of_the_matches() {
        let outcome = LookupOutcome::Performed(vec![record("해운대", "카페"), record("해운대", "밀면")]);
        let picked = outcome.choose().unwrap();
        assert!(outcome.records().contains(picked));
        assert!(LookupOutcome::NotPerformed.choose().is_none());
    }
}

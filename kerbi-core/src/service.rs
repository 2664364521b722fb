//! High-level service facade combining all providers.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use log::{error, warn};

use crate::model::{Address, CollectionSchedule, CouncilId, PropertyId};
use crate::plugin::PluginRegistry;
use crate::ports::PortError;

/// Refresh cadence hosts use for scheduled collection cycles.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(12 * 60 * 60);

/// Public entry point for searching addresses and fetching schedules.
pub struct KerbiService {
    registry: Arc<PluginRegistry>,
}

impl KerbiService {
    /// Create a new service bound to the provided registry.
    #[must_use]
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self { registry }
    }

    /// List all available councils and their display names.
    #[must_use]
    pub fn councils(&self) -> Vec<(CouncilId, String)> {
        self.registry
            .councils()
            .into_iter()
            .map(|meta| (meta.id, meta.name))
            .collect()
    }

    /// Search for addresses in the given council.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the council is unsupported or the provider
    /// call fails.
    pub async fn search_addresses(
        &self,
        council: CouncilId,
        query: &str,
    ) -> Result<Vec<Address>, PortError> {
        let plugin = self.registry.plugin(&council)?;
        plugin.address_port.search(query).await
    }

    /// Fetch the current collection schedule for a property.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the council is unsupported, the property id
    /// is invalid, or the provider request fails.
    pub async fn collection_schedule(
        &self,
        council: CouncilId,
        property: &PropertyId,
    ) -> Result<CollectionSchedule, PortError> {
        let plugin = self.registry.plugin(&council)?;
        plugin.schedule_port.schedule(property).await
    }

    /// Exercise fetch and parse end-to-end once, for setup-time validation.
    ///
    /// `true` only when a non-empty schedule came back. Every failure mode,
    /// including an unsupported council, is logged and reported as `false`;
    /// this call never returns an error.
    pub async fn check_connection(&self, council: CouncilId, property: &PropertyId) -> bool {
        match self.collection_schedule(council, property).await {
            Ok(schedule) if !schedule.is_empty() => true,
            Ok(_) => {
                warn!("connection check returned an empty schedule for {property:?}");
                false
            }
            Err(err) => {
                error!("connection check failed for {property:?}: {err}");
                false
            }
        }
    }

    /// Run one collection cycle and publish the result into `cell`.
    ///
    /// The new schedule is computed in full before it replaces the previous
    /// snapshot, which stays readable throughout. A failed cycle leaves the
    /// cell untouched; an empty-but-successful cycle publishes the empty
    /// schedule, so the two outcomes stay distinguishable.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the fetch fails.
    pub async fn refresh_schedule(
        &self,
        council: CouncilId,
        property: &PropertyId,
        cell: &ScheduleCell,
    ) -> Result<Arc<CollectionSchedule>, PortError> {
        let schedule = self.collection_schedule(council, property).await?;
        Ok(cell.publish(schedule))
    }
}

#[derive(Default)]
/// Last published schedule snapshot, replaced wholesale on each successful cycle.
pub struct ScheduleCell {
    latest: RwLock<Arc<CollectionSchedule>>,
}

impl ScheduleCell {
    /// Create a cell holding an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot; empty until the first successful cycle.
    #[must_use]
    pub fn latest(&self) -> Arc<CollectionSchedule> {
        Arc::clone(&self.latest.read().expect("schedule cell lock poisoned"))
    }

    fn publish(&self, schedule: CollectionSchedule) -> Arc<CollectionSchedule> {
        let snapshot = Arc::new(schedule);
        let mut guard = self.latest.write().expect("schedule cell lock poisoned");
        *guard = Arc::clone(&snapshot);
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::model::{BinType, Collection, CouncilMeta};
    use crate::ports::{AddressPort, SchedulePort};
    use crate::plugin::CouncilPlugin;

    struct StubAddressPort {
        meta: CouncilMeta,
    }

    #[async_trait]
    impl AddressPort for StubAddressPort {
        fn council(&self) -> &CouncilMeta {
            &self.meta
        }

        async fn search(&self, _query: &str) -> Result<Vec<Address>, PortError> {
            Ok(Vec::new())
        }
    }

    /// Schedule port returning a canned result; `None` simulates a failed fetch.
    struct StubSchedulePort {
        meta: CouncilMeta,
        result: Option<CollectionSchedule>,
    }

    #[async_trait]
    impl SchedulePort for StubSchedulePort {
        fn council(&self) -> &CouncilMeta {
            &self.meta
        }

        async fn schedule(&self, _property: &PropertyId) -> Result<CollectionSchedule, PortError> {
            self.result
                .clone()
                .ok_or_else(|| PortError::Internal(String::from("fetch failed")))
        }
    }

    fn meta() -> CouncilMeta {
        CouncilMeta {
            id: CouncilId(String::from("test-council")),
            name: String::from("Test Council"),
        }
    }

    fn service_with(result: Option<CollectionSchedule>) -> KerbiService {
        let plugin = CouncilPlugin {
            meta: meta(),
            address_port: Arc::new(StubAddressPort { meta: meta() }),
            schedule_port: Arc::new(StubSchedulePort {
                meta: meta(),
                result,
            }),
        };
        KerbiService::new(Arc::new(PluginRegistry::new(vec![plugin])))
    }

    fn one_entry_schedule() -> CollectionSchedule {
        let mut schedule = CollectionSchedule::new();
        schedule.insert(
            BinType::Garbage,
            Collection {
                date: NaiveDate::from_ymd_opt(2026, 2, 11).expect("valid test date"),
                label: String::from("General Waste"),
            },
        );
        schedule
    }

    fn property() -> PropertyId {
        PropertyId(String::from("12345"))
    }

    #[tokio::test]
    async fn check_connection_true_on_non_empty_schedule() {
        let service = service_with(Some(one_entry_schedule()));
        assert!(
            service
                .check_connection(CouncilId(String::from("test-council")), &property())
                .await
        );
    }

    #[tokio::test]
    async fn check_connection_false_on_empty_schedule() {
        let service = service_with(Some(CollectionSchedule::new()));
        assert!(
            !service
                .check_connection(CouncilId(String::from("test-council")), &property())
                .await
        );
    }

    #[tokio::test]
    async fn check_connection_false_on_fetch_error() {
        let service = service_with(None);
        assert!(
            !service
                .check_connection(CouncilId(String::from("test-council")), &property())
                .await
        );
    }

    #[tokio::test]
    async fn check_connection_false_on_unknown_council() {
        let service = service_with(Some(one_entry_schedule()));
        assert!(
            !service
                .check_connection(CouncilId(String::from("elsewhere")), &property())
                .await
        );
    }

    #[tokio::test]
    async fn refresh_publishes_new_snapshot() {
        let service = service_with(Some(one_entry_schedule()));
        let cell = ScheduleCell::new();
        assert!(cell.latest().is_empty());

        let snapshot = service
            .refresh_schedule(CouncilId(String::from("test-council")), &property(), &cell)
            .await
            .expect("refresh succeeds");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(cell.latest().len(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_retains_previous_snapshot() {
        let ok_service = service_with(Some(one_entry_schedule()));
        let cell = ScheduleCell::new();
        ok_service
            .refresh_schedule(CouncilId(String::from("test-council")), &property(), &cell)
            .await
            .expect("initial refresh succeeds");

        let failing_service = service_with(None);
        let result = failing_service
            .refresh_schedule(CouncilId(String::from("test-council")), &property(), &cell)
            .await;

        assert!(result.is_err(), "failed cycle is reported to the caller");
        assert_eq!(cell.latest().len(), 1, "previous snapshot stays published");
    }

    #[tokio::test]
    async fn successful_empty_refresh_replaces_snapshot() {
        let ok_service = service_with(Some(one_entry_schedule()));
        let cell = ScheduleCell::new();
        ok_service
            .refresh_schedule(CouncilId(String::from("test-council")), &property(), &cell)
            .await
            .expect("initial refresh succeeds");

        let empty_service = service_with(Some(CollectionSchedule::new()));
        let snapshot = empty_service
            .refresh_schedule(CouncilId(String::from("test-council")), &property(), &cell)
            .await
            .expect("empty cycle is still a success");

        assert!(snapshot.is_empty());
        assert!(cell.latest().is_empty());
    }
}

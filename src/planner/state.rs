use chrono::{Local, NaiveDate};
use std::sync::Arc;

use super::calendar::{shift_month, MonthView};
use super::store::{PlannerStore, StorageError};
use super::types::{QualificationInput, QualificationRecord, RecordId, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("no qualification with id {0}")]
    NotFound(RecordId),
}

/// Application state: the record list and the reference month.
///
/// The list is shared as an immutable snapshot and replaced wholesale on every
/// mutation, so a snapshot taken before an edit never changes underneath its
/// holder.
pub struct Planner {
    records: Arc<[QualificationRecord]>,
    reference_date: NaiveDate,
    store: PlannerStore,
    last_store_error: Option<String>,
}

impl Planner {
    pub fn load(store: PlannerStore, today: NaiveDate) -> Self {
        let records = store.load_records();
        let reference_date = store.load_reference_date(today);
        Self {
            records: records.into(),
            reference_date,
            store,
            last_store_error: None,
        }
    }

    pub fn records(&self) -> Arc<[QualificationRecord]> {
        Arc::clone(&self.records)
    }

    pub fn get(&self, id: RecordId) -> Option<&QualificationRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn month_view(&self, today: NaiveDate) -> MonthView {
        MonthView::new(self.reference_date, today)
    }

    /// Most recent persistence failure, cleared on read
    pub fn take_store_error(&mut self) -> Option<String> {
        self.last_store_error.take()
    }

    pub fn add(&mut self, input: QualificationInput) -> Result<RecordId, PlannerError> {
        input.validate()?;
        let id = self.next_id(Local::now().timestamp_millis());
        let record = QualificationRecord::from_input(id, input);
        tracing::info!(%id, name = %record.name, "adding qualification");

        let mut next = self.records.to_vec();
        next.push(record);
        self.commit(next);
        Ok(id)
    }

    pub fn edit(&mut self, id: RecordId, input: QualificationInput) -> Result<(), PlannerError> {
        input.validate()?;
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(PlannerError::NotFound(id))?;
        tracing::info!(%id, name = %input.name, "editing qualification");

        let mut next = self.records.to_vec();
        next[index] = QualificationRecord::from_input(id, input);
        self.commit(next);
        Ok(())
    }

    pub fn delete(&mut self, id: RecordId) -> Result<QualificationRecord, PlannerError> {
        let removed = self.get(id).cloned().ok_or(PlannerError::NotFound(id))?;
        tracing::info!(%id, name = %removed.name, "deleting qualification");

        let next: Vec<_> = self.records.iter().filter(|r| r.id != id).cloned().collect();
        self.commit(next);
        Ok(removed)
    }

    pub fn previous_month(&mut self) {
        self.set_reference_date(shift_month(self.reference_date, -1));
    }

    pub fn next_month(&mut self) {
        self.set_reference_date(shift_month(self.reference_date, 1));
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.set_reference_date(date);
    }

    fn set_reference_date(&mut self, date: NaiveDate) {
        self.reference_date = date;
        if let Err(e) = self.store.save_reference_date(date) {
            self.record_store_error(e);
        }
    }

    /// Millisecond timestamp, bumped past every existing id
    fn next_id(&self, now_millis: i64) -> RecordId {
        let max_existing = self.records.iter().map(|r| r.id.0).max().unwrap_or(0);
        RecordId(now_millis.max(max_existing.saturating_add(1)))
    }

    fn commit(&mut self, next: Vec<QualificationRecord>) {
        self.records = next.into();
        if let Err(e) = self.store.save_records(&self.records) {
            self.record_store_error(e);
        }
    }

    fn record_store_error(&mut self, e: StorageError) {
        tracing::warn!(error = %e, "failed to persist planner state");
        self.last_store_error = Some(e.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::store::{MemoryStorage, Storage};
    use crate::planner::types::{default_records, Environment};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn planner() -> Planner {
        Planner::load(PlannerStore::new(MemoryStorage::new()), date(2024, 9, 18))
    }

    fn input(name: &str, start: NaiveDate, end: NaiveDate) -> QualificationInput {
        QualificationInput {
            name: name.to_string(),
            team: "Team A".to_string(),
            description: None,
            environment: Environment::LightSimulation,
            start_date: start,
            end_date: end,
            deployed: false,
        }
    }

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::NoDataDir)
        }
    }

    #[test]
    fn starts_from_defaults_and_today() {
        let planner = planner();
        assert_eq!(&*planner.records(), default_records().as_slice());
        assert_eq!(planner.reference_date(), date(2024, 9, 18));
    }

    #[test]
    fn add_assigns_unique_ids_and_derives_color() {
        let mut planner = planner();
        let mut qual = input("v4.0.0", date(2024, 9, 2), date(2024, 9, 6));
        qual.environment = Environment::PreExhibition;
        let first = planner.add(qual.clone()).unwrap();
        let second = planner.add(qual).unwrap();

        assert_ne!(first, second);
        let record = planner.get(first).unwrap();
        assert_eq!(record.color, Environment::PreExhibition.color());
        assert_eq!(planner.records().len(), default_records().len() + 2);
    }

    #[test]
    fn next_id_never_reuses_an_existing_id() {
        let planner = planner();
        // Default ids are 1..=5, a clock stuck at 0 still moves forward
        assert_eq!(planner.next_id(0), RecordId(6));
        assert_eq!(planner.next_id(1_700_000_000_000), RecordId(1_700_000_000_000));
    }

    #[test]
    fn edit_keeps_id_and_rederives_color() {
        let mut planner = planner();
        let mut qual = input("v2.1.1", date(2024, 9, 16), date(2024, 9, 20));
        qual.environment = Environment::HeavySimulation;
        planner.edit(RecordId(1), qual).unwrap();

        let record = planner.get(RecordId(1)).unwrap();
        assert_eq!(record.name, "v2.1.1");
        assert_eq!(record.color, Environment::HeavySimulation.color());
        assert_eq!(planner.records()[0].id, RecordId(1));
    }

    #[test]
    fn invalid_edit_leaves_records_untouched() {
        let mut planner = planner();
        let before = planner.records();
        let result = planner.edit(RecordId(1), input("v2.1.0", date(2024, 9, 25), date(2024, 9, 15)));

        assert!(matches!(
            result,
            Err(PlannerError::Invalid(ValidationError::EndBeforeStart { .. }))
        ));
        assert!(Arc::ptr_eq(&before, &planner.records()));
    }

    #[test]
    fn invalid_add_is_never_committed() {
        let mut planner = planner();
        let result = planner.add(input("", date(2024, 9, 2), date(2024, 9, 3)));
        assert!(matches!(result, Err(PlannerError::Invalid(ValidationError::MissingName))));
        assert_eq!(planner.records().len(), default_records().len());
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut planner = planner();
        assert!(matches!(
            planner.edit(RecordId(404), input("x", date(2024, 9, 2), date(2024, 9, 3))),
            Err(PlannerError::NotFound(RecordId(404)))
        ));
        assert!(matches!(planner.delete(RecordId(404)), Err(PlannerError::NotFound(_))));
    }

    #[test]
    fn delete_removes_by_id() {
        let mut planner = planner();
        let removed = planner.delete(RecordId(3)).unwrap();
        assert_eq!(removed.name, "v3.0.0");
        assert!(planner.get(RecordId(3)).is_none());
        assert_eq!(planner.records().len(), default_records().len() - 1);
    }

    #[test]
    fn old_snapshots_do_not_see_mutations() {
        let mut planner = planner();
        let snapshot = planner.records();
        planner.delete(RecordId(1)).unwrap();
        planner.add(input("v5.0.0", date(2024, 9, 2), date(2024, 9, 3))).unwrap();
        assert_eq!(&*snapshot, default_records().as_slice());
    }

    #[test]
    fn mutations_are_persisted() {
        let mut planner = planner();
        planner.delete(RecordId(2)).unwrap();
        planner.next_month();

        let Planner { store, .. } = planner;
        let reloaded = Planner::load(store, date(2030, 1, 1));
        assert!(reloaded.get(RecordId(2)).is_none());
        assert_eq!(reloaded.records().len(), default_records().len() - 1);
        assert_eq!(reloaded.reference_date(), date(2024, 10, 1));
    }

    #[test]
    fn month_navigation_moves_whole_months() {
        let mut planner = planner();
        planner.previous_month();
        assert_eq!(planner.reference_date(), date(2024, 8, 1));
        planner.next_month();
        planner.next_month();
        assert_eq!(planner.reference_date(), date(2024, 10, 1));
        assert_eq!(planner.month_view(date(2024, 10, 1)).title(), "October 2024");
        planner.go_to(date(2025, 2, 14));
        assert_eq!(planner.reference_date(), date(2025, 2, 14));
    }

    #[test]
    fn store_failures_keep_state_and_surface_once() {
        let mut planner = Planner::load(PlannerStore::new(FailingStorage), date(2024, 9, 18));
        planner.delete(RecordId(1)).unwrap();

        assert!(planner.get(RecordId(1)).is_none());
        assert!(planner.take_store_error().is_some());
        assert!(planner.take_store_error().is_none());
    }
}

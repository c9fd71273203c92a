use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::dashboard::DashboardSnapshot;
use crate::data::filter::{apply, available_cities, FilterCriteria, FilterOptions, Selection};
use crate::data::loader::{try_source, DatasetHandle, LoadOutcome};
use crate::data::model::{Dataset, Label};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
pub struct AppState {
    /// Lazily loaded dataset for this session.
    handle: DatasetHandle,

    pub settings: DashboardConfig,

    /// Current filter selections.
    pub criteria: FilterCriteria,

    /// Option lists offered by the filter panel (cities follow the country).
    pub options: FilterOptions,

    /// Number of trips passing the current filters (cached).
    pub filtered_count: usize,

    /// Results for the current filters (cached).
    pub snapshot: DashboardSnapshot,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Resolve the session dataset and start with everything selected.
    pub fn new(handle: DatasetHandle, settings: DashboardConfig) -> Self {
        let mut state = AppState {
            handle,
            settings,
            criteria: FilterCriteria::default(),
            options: FilterOptions::default(),
            filtered_count: 0,
            snapshot: DashboardSnapshot::default(),
            status_message: None,
        };
        state.reset();
        state
    }

    pub fn outcome(&self) -> &LoadOutcome {
        self.handle.get()
    }

    pub fn dataset(&self) -> Arc<Dataset> {
        Arc::clone(&self.handle.get().dataset)
    }

    pub fn source(&self) -> Option<&Path> {
        self.handle.get().source.as_deref()
    }

    /// Fully inclusive criteria and fresh options for the current dataset.
    fn reset(&mut self) {
        let dataset = self.dataset();
        self.status_message = self.handle.get().diagnostic.clone();
        self.criteria = FilterCriteria::all(&dataset);
        self.options = FilterOptions::for_country(&dataset, &self.criteria.country);
        self.refilter();
    }

    /// Replace the session dataset with a user-picked file. On failure the
    /// current dataset stays and the error is shown.
    pub fn open_file(&mut self, path: PathBuf) {
        match try_source(&path) {
            Ok(dataset) => {
                log::info!("Loaded {} trips from {}", dataset.len(), path.display());
                let outcome = LoadOutcome::loaded(dataset, path.clone());
                self.handle = DatasetHandle::with_outcome(vec![path], outcome);
                self.reset();
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Recompute the filtered view and every derived result.
    pub fn refilter(&mut self) {
        let dataset = self.dataset();
        let view = apply(&dataset, &self.criteria);
        self.filtered_count = view.len();
        self.snapshot = DashboardSnapshot::compute(&view, &self.settings);
        log::debug!(
            "Filtered {} of {} trips",
            self.filtered_count,
            dataset.len()
        );
    }

    /// Change the country; the city list follows and a city that is no
    /// longer offered falls back to "all".
    pub fn set_country(&mut self, country: Selection) {
        let dataset = self.dataset();
        self.options.cities = available_cities(&dataset, &country);
        if let Selection::Only(city) = &self.criteria.city {
            if !self.options.cities.contains(city) {
                self.criteria.city = Selection::All;
            }
        }
        self.criteria.country = country;
        self.refilter();
    }

    pub fn set_city(&mut self, city: Selection) {
        self.criteria.city = city;
        self.refilter();
    }

    /// Toggle a single month in the selection.
    pub fn toggle_month(&mut self, month: &Label) {
        if !self.criteria.months.remove(month) {
            self.criteria.months.insert(month.clone());
        }
        self.refilter();
    }

    /// Toggle a single hour in the selection.
    pub fn toggle_hour(&mut self, hour: u8) {
        if !self.criteria.hours.remove(&hour) {
            self.criteria.hours.insert(hour);
        }
        self.refilter();
    }

    pub fn select_all_months(&mut self) {
        self.criteria.months = self.options.months.clone();
        self.refilter();
    }

    /// Deselect every month; nothing matches until one is picked again.
    pub fn select_no_months(&mut self) {
        self.criteria.months.clear();
        self.refilter();
    }

    pub fn select_all_hours(&mut self) {
        self.criteria.hours = self.options.hours.clone();
        self.refilter();
    }

    pub fn select_no_hours(&mut self) {
        self.criteria.hours.clear();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::TripRecord;

    fn trip(country: &str, city: &str, month: i64, hour: u8) -> TripRecord {
        TripRecord {
            origin_country: Some(country.into()),
            origin_city: Some(city.into()),
            pickup_month: Some(Label::Number(month)),
            pickup_hour: Some(hour),
            ..Default::default()
        }
    }

    fn state() -> AppState {
        let dataset = Dataset::new(vec![
            trip("Spain", "Madrid", 1, 8),
            trip("Spain", "Sevilla", 2, 9),
            trip("Portugal", "Porto", 1, 9),
        ]);
        let outcome = LoadOutcome::loaded(dataset, PathBuf::from("memory.csv"));
        let handle = DatasetHandle::with_outcome(vec![PathBuf::from("memory.csv")], outcome);
        AppState::new(handle, DashboardConfig::default())
    }

    #[test]
    fn starts_fully_inclusive() {
        let state = state();
        assert_eq!(state.filtered_count, 3);
        assert_eq!(state.snapshot.kpis.trip_count, 3);
        assert!(state.status_message.is_none());
        assert_eq!(state.source(), Some(Path::new("memory.csv")));
    }

    #[test]
    fn changing_country_narrows_cities_and_resets_stale_city() {
        let mut state = state();
        state.set_city(Selection::Only("Porto".into()));
        assert_eq!(state.filtered_count, 1);

        state.set_country(Selection::Only("Spain".into()));
        assert_eq!(state.criteria.city, Selection::All);
        assert_eq!(
            state.options.cities.iter().cloned().collect::<Vec<_>>(),
            vec!["Madrid", "Sevilla"]
        );
        assert_eq!(state.filtered_count, 2);
    }

    #[test]
    fn city_kept_when_still_offered() {
        let mut state = state();
        state.set_city(Selection::Only("Madrid".into()));
        state.set_country(Selection::Only("Spain".into()));
        assert_eq!(state.criteria.city, Selection::Only("Madrid".into()));
        assert_eq!(state.filtered_count, 1);
    }

    #[test]
    fn no_hours_selected_shows_nothing() {
        let mut state = state();
        state.select_no_hours();
        assert_eq!(state.filtered_count, 0);
        state.toggle_hour(9);
        assert_eq!(state.filtered_count, 2);
        state.select_all_hours();
        assert_eq!(state.filtered_count, 3);
    }

    #[test]
    fn month_toggle_round_trips() {
        let mut state = state();
        state.toggle_month(&Label::Number(1));
        assert_eq!(state.filtered_count, 1);
        state.toggle_month(&Label::Number(1));
        assert_eq!(state.filtered_count, 3);
        state.select_no_months();
        assert_eq!(state.filtered_count, 0);
        state.select_all_months();
        assert_eq!(state.filtered_count, 3);
    }

    #[test]
    fn failed_open_keeps_dataset_and_reports() {
        let mut state = state();
        state.open_file(PathBuf::from("/no/such/trips.csv"));
        assert_eq!(state.filtered_count, 3);
        assert!(state.status_message.as_deref().unwrap_or("").starts_with("Error"));
    }

    #[test]
    fn unloadable_session_is_empty_with_diagnostic() {
        let handle = DatasetHandle::new(vec![PathBuf::from("/no/such/trips.csv")]);
        let state = AppState::new(handle, DashboardConfig::default());
        assert_eq!(state.filtered_count, 0);
        assert!(state.status_message.is_some());
        assert_eq!(state.snapshot.hour_histogram.len(), 24);
    }
}

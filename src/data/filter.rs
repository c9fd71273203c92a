use std::collections::BTreeSet;

use serde::Serialize;

use super::model::{CategoryField, Dataset, Label, TripRecord};

// ---------------------------------------------------------------------------
// Selection – a single-choice filter with an "all" sentinel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn from_option(value: Option<String>) -> Self {
        value.map_or(Selection::All, Selection::Only)
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn as_value(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Only(v) => Some(v),
        }
    }

    /// Equality filter. An absent cell never matches a concrete selection.
    fn matches(&self, cell: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => cell == Some(wanted.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria
// ---------------------------------------------------------------------------

/// What the user selected. Months and hours are membership sets: an empty
/// set selects nothing, not everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub country: Selection,
    pub city: Selection,
    pub months: BTreeSet<Label>,
    pub hours: BTreeSet<u8>,
}

impl FilterCriteria {
    /// Fully inclusive criteria: every country, city, month and hour.
    pub fn all(dataset: &Dataset) -> Self {
        FilterCriteria {
            country: Selection::All,
            city: Selection::All,
            months: available_months(dataset),
            hours: available_hours(dataset),
        }
    }

    /// Whether a single trip passes every filter.
    pub fn matches(&self, trip: &TripRecord) -> bool {
        self.country.matches(trip.origin_country.as_deref())
            && self.city.matches(trip.origin_city.as_deref())
            && trip
                .pickup_month
                .as_ref()
                .is_some_and(|m| self.months.contains(m))
            && trip.pickup_hour.is_some_and(|h| self.hours.contains(&h))
    }
}

// ---------------------------------------------------------------------------
// Option lists
// ---------------------------------------------------------------------------

fn distinct<'a>(
    trips: impl Iterator<Item = &'a TripRecord>,
    field: CategoryField,
) -> BTreeSet<String> {
    trips
        .filter_map(|t| t.category(field).map(|c| c.into_owned()))
        .collect()
}

/// Distinct origin countries, sorted ascending.
pub fn available_countries(dataset: &Dataset) -> BTreeSet<String> {
    distinct(dataset.trips().iter(), CategoryField::OriginCountry)
}

/// Distinct origin cities, restricted to the selected country when there is one.
pub fn available_cities(dataset: &Dataset, country: &Selection) -> BTreeSet<String> {
    distinct(
        dataset
            .trips()
            .iter()
            .filter(|t| country.matches(t.origin_country.as_deref())),
        CategoryField::OriginCity,
    )
}

pub fn available_months(dataset: &Dataset) -> BTreeSet<Label> {
    dataset
        .trips()
        .iter()
        .filter_map(|t| t.pickup_month.clone())
        .collect()
}

pub fn available_hours(dataset: &Dataset) -> BTreeSet<u8> {
    dataset.trips().iter().filter_map(|t| t.pickup_hour).collect()
}

/// All option lists the filter panel needs for the current country.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub countries: BTreeSet<String>,
    pub cities: BTreeSet<String>,
    pub months: BTreeSet<Label>,
    pub hours: BTreeSet<u8>,
}

impl FilterOptions {
    pub fn for_country(dataset: &Dataset, country: &Selection) -> Self {
        FilterOptions {
            countries: available_countries(dataset),
            cities: available_cities(dataset, country),
            months: available_months(dataset),
            hours: available_hours(dataset),
        }
    }
}

// ---------------------------------------------------------------------------
// FilteredView
// ---------------------------------------------------------------------------

/// The trips of a dataset that pass a set of criteria, by row index.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// View over every row, unfiltered.
    pub fn full(dataset: &'a Dataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn trips(&self) -> impl Iterator<Item = &'a TripRecord> + '_ {
        let trips = self.dataset.trips();
        self.indices.iter().map(move |&i| &trips[i])
    }
}

/// Apply the conjunctive filter. Pure: same inputs, same view.
pub fn apply<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    let indices = dataset
        .trips()
        .iter()
        .enumerate()
        .filter(|(_, trip)| criteria.matches(trip))
        .map(|(i, _)| i)
        .collect();
    FilteredView { dataset, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(
        country: Option<&str>,
        city: Option<&str>,
        month: Option<i64>,
        hour: Option<u8>,
    ) -> TripRecord {
        TripRecord {
            origin_country: country.map(String::from),
            origin_city: city.map(String::from),
            pickup_month: month.map(Label::Number),
            pickup_hour: hour,
            ..Default::default()
        }
    }

    fn sample() -> Dataset {
        Dataset::new(vec![
            trip(Some("Spain"), Some("Madrid"), Some(1), Some(8)),
            trip(Some("Spain"), Some("Barcelona"), Some(2), Some(9)),
            trip(Some("Portugal"), Some("Lisbon"), Some(1), Some(8)),
            trip(Some("Portugal"), None, Some(3), Some(22)),
            trip(None, Some("Madrid"), None, Some(8)),
            trip(Some("Spain"), Some("Madrid"), Some(2), None),
        ])
    }

    #[test]
    fn option_lists_are_sorted_and_skip_missing() {
        let ds = sample();
        assert_eq!(
            available_countries(&ds).into_iter().collect::<Vec<_>>(),
            vec!["Portugal", "Spain"]
        );
        assert_eq!(
            available_months(&ds).into_iter().collect::<Vec<_>>(),
            vec![Label::Number(1), Label::Number(2), Label::Number(3)]
        );
        assert_eq!(
            available_hours(&ds).into_iter().collect::<Vec<_>>(),
            vec![8, 9, 22]
        );
    }

    #[test]
    fn cities_follow_the_selected_country() {
        let ds = sample();
        let spain = available_cities(&ds, &Selection::Only("Spain".into()));
        assert_eq!(spain.into_iter().collect::<Vec<_>>(), vec!["Barcelona", "Madrid"]);

        let all = available_cities(&ds, &Selection::All);
        assert_eq!(
            all.into_iter().collect::<Vec<_>>(),
            vec!["Barcelona", "Lisbon", "Madrid"]
        );
    }

    #[test]
    fn city_subset_of_all_for_every_country() {
        let ds = sample();
        let all = available_cities(&ds, &Selection::All);
        for country in available_countries(&ds) {
            let some = available_cities(&ds, &Selection::Only(country));
            assert!(some.is_subset(&all));
        }
    }

    #[test]
    fn inclusive_criteria_drop_rows_with_missing_month_or_hour() {
        let ds = sample();
        let view = apply(&ds, &FilterCriteria::all(&ds));
        // Row 4 has no month, row 5 has no hour.
        assert_eq!(view.indices(), &[0, 1, 2, 3]);
    }

    #[test]
    fn country_and_city_combine_conjunctively() {
        let ds = sample();
        let mut criteria = FilterCriteria::all(&ds);
        criteria.country = Selection::Only("Spain".into());
        criteria.city = Selection::Only("Madrid".into());
        assert_eq!(apply(&ds, &criteria).indices(), &[0]);
    }

    #[test]
    fn empty_month_selection_matches_nothing() {
        let ds = sample();
        let mut criteria = FilterCriteria::all(&ds);
        criteria.months.clear();
        assert!(apply(&ds, &criteria).is_empty());
    }

    #[test]
    fn empty_hour_selection_matches_nothing() {
        let ds = sample();
        let mut criteria = FilterCriteria::all(&ds);
        criteria.hours.clear();
        assert!(apply(&ds, &criteria).is_empty());
    }

    #[test]
    fn stale_country_matches_nothing() {
        let ds = sample();
        let mut criteria = FilterCriteria::all(&ds);
        criteria.country = Selection::Only("France".into());
        assert!(apply(&ds, &criteria).is_empty());
        assert!(available_cities(&ds, &criteria.country).is_empty());
    }

    #[test]
    fn apply_is_deterministic() {
        let ds = sample();
        let mut criteria = FilterCriteria::all(&ds);
        criteria.hours.remove(&9);
        assert_eq!(apply(&ds, &criteria), apply(&ds, &criteria));
    }

    #[test]
    fn restricting_months_never_grows_the_view() {
        let ds = sample();
        let mut criteria = FilterCriteria::all(&ds);
        let mut previous = apply(&ds, &criteria).len();
        while let Some(month) = criteria.months.first().cloned() {
            criteria.months.remove(&month);
            let now = apply(&ds, &criteria).len();
            assert!(now <= previous);
            previous = now;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn empty_dataset_filters_to_empty_view() {
        let ds = Dataset::empty();
        let view = apply(&ds, &FilterCriteria::all(&ds));
        assert!(view.is_empty());
        assert!(FilterOptions::for_country(&ds, &Selection::All).countries.is_empty());
    }
}

use serde::Serialize;

use crate::data::filter::FilteredView;
use crate::data::model::FlagField;

/// Number of trips in the view.
pub fn total_trip_count(view: &FilteredView<'_>) -> usize {
    view.len()
}

/// Total driving distance in km. Missing distances contribute nothing.
pub fn sum_distance(view: &FilteredView<'_>) -> f64 {
    view.trips()
        .filter_map(|t| t.driving_distance_km)
        .fold(0.0, |acc, d| acc + d)
}

/// Number of trips whose flag is set.
pub fn count_flag(view: &FilteredView<'_>, field: FlagField) -> usize {
    view.trips().filter(|t| t.flag(field)).count()
}

/// Headline figures shown above the charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub total_distance_km: f64,
    pub trip_count: usize,
    pub from_airport: usize,
    pub to_airport: usize,
}

impl Kpis {
    pub fn compute(view: &FilteredView<'_>) -> Self {
        Kpis {
            total_distance_km: sum_distance(view),
            trip_count: total_trip_count(view),
            from_airport: count_flag(view, FlagField::FromAirport),
            to_airport: count_flag(view, FlagField::ToAirport),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilteredView;
    use crate::data::model::{Dataset, TripRecord};

    fn with_distance(d: Option<f64>) -> TripRecord {
        TripRecord {
            driving_distance_km: d,
            ..Default::default()
        }
    }

    #[test]
    fn missing_distance_contributes_nothing() {
        let ds = Dataset::new(vec![
            with_distance(Some(10.0)),
            with_distance(None),
            with_distance(Some(5.0)),
        ]);
        assert_eq!(sum_distance(&FilteredView::full(&ds)), 15.0);
    }

    #[test]
    fn flags_count_only_true() {
        let ds = Dataset::new(vec![
            TripRecord {
                from_airport: Some(true),
                to_airport: Some(false),
                ..Default::default()
            },
            TripRecord {
                from_airport: None,
                to_airport: Some(true),
                ..Default::default()
            },
            TripRecord {
                from_airport: Some(true),
                ..Default::default()
            },
        ]);
        let view = FilteredView::full(&ds);
        assert_eq!(count_flag(&view, FlagField::FromAirport), 2);
        assert_eq!(count_flag(&view, FlagField::ToAirport), 1);
    }

    #[test]
    fn empty_view_has_zero_kpis() {
        let ds = Dataset::empty();
        let kpis = Kpis::compute(&FilteredView::full(&ds));
        assert_eq!(kpis, Kpis::default());
        assert!(kpis.total_distance_km.is_sign_positive());
        let json = serde_json::to_string(&kpis).unwrap();
        assert!(json.contains("\"total_distance_km\":0.0"), "{json}");
    }
}

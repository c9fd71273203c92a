use serde::Serialize;

use crate::config::DashboardConfig;
use crate::data::filter::FilteredView;
use crate::data::model::{CategoryField, GeoField, GeoPoint, NumericField, Weekday};
use crate::metrics::{
    geo_sample, histogram, top_n, value_counts, Bucket, BucketSpec, CategoryCount, HistogramBin,
    Kpis,
};

// ---------------------------------------------------------------------------
// DashboardSnapshot – every result set of one render cycle
// ---------------------------------------------------------------------------

/// Plain, serializable results for one filtered view. Any surface (the egui
/// window, `--summary` JSON) renders from this alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub kpis: Kpis,

    pub origin_countries: Vec<CategoryCount>,
    pub destination_countries: Vec<CategoryCount>,
    pub top_origin_cities: Vec<CategoryCount>,
    pub top_destination_cities: Vec<CategoryCount>,
    pub origin_airports: Vec<CategoryCount>,
    pub destination_airports: Vec<CategoryCount>,

    pub hour_histogram: Vec<HistogramBin>,
    pub weekday_histogram: Vec<HistogramBin>,
    pub passenger_histogram: Vec<HistogramBin>,

    pub origin_points: Vec<GeoPoint>,
    pub destination_points: Vec<GeoPoint>,
}

impl DashboardSnapshot {
    pub fn compute(view: &FilteredView<'_>, settings: &DashboardConfig) -> Self {
        let counts = |field: CategoryField| value_counts(view, field.into());
        let top = |field: CategoryField| top_n(&counts(field), settings.top_n);

        DashboardSnapshot {
            kpis: Kpis::compute(view),

            origin_countries: counts(CategoryField::OriginCountry),
            destination_countries: counts(CategoryField::DestinationCountry),
            top_origin_cities: top(CategoryField::OriginCity),
            top_destination_cities: top(CategoryField::DestinationCity),
            origin_airports: counts(CategoryField::OriginAirport),
            destination_airports: counts(CategoryField::DestinationAirport),

            hour_histogram: histogram(
                view,
                NumericField::PickupHour.into(),
                &BucketSpec::hours_of_day(),
            ),
            weekday_histogram: weekday_histogram(view, settings),
            passenger_histogram: passenger_histogram(view),

            origin_points: geo_sample(view, GeoField::Origin, settings.map_sample_cap),
            destination_points: geo_sample(view, GeoField::Destination, settings.map_sample_cap),
        }
    }
}

/// Monday..Sunday, relabelled in the configured language.
fn weekday_histogram(view: &FilteredView<'_>, settings: &DashboardConfig) -> Vec<HistogramBin> {
    let mut bins = histogram(view, CategoryField::PickupDay.into(), &BucketSpec::weekdays());
    for bin in &mut bins {
        if let Bucket::Category { label } = &mut bin.bucket {
            if let Some(day) = Weekday::parse(label.as_str()) {
                *label = day.name(settings.weekday_labels).to_string();
            }
        }
    }
    bins
}

/// One bucket per passenger count from 0 to the largest seen.
fn passenger_histogram(view: &FilteredView<'_>) -> Vec<HistogramBin> {
    match view.trips().filter_map(|t| t.passengers).max() {
        Some(max) => histogram(
            view,
            NumericField::Passengers.into(),
            &BucketSpec::unit_range(max),
        ),
        None => Vec::new(),
    }
}

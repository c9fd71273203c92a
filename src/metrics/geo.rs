use rand::seq::index::sample;
use rand::Rng;

use crate::data::filter::FilteredView;
use crate::data::model::{GeoField, GeoPoint};

/// Uniform sample without replacement of at most `cap` valid points.
/// Trips without a coordinate pair are never drawn.
pub fn geo_sample(view: &FilteredView<'_>, field: GeoField, cap: usize) -> Vec<GeoPoint> {
    geo_sample_with(view, field, cap, &mut rand::thread_rng())
}

/// [`geo_sample`] with a caller-supplied generator.
pub fn geo_sample_with<R: Rng + ?Sized>(
    view: &FilteredView<'_>,
    field: GeoField,
    cap: usize,
    rng: &mut R,
) -> Vec<GeoPoint> {
    let points: Vec<GeoPoint> = view.trips().filter_map(|t| t.point(field)).collect();
    let amount = cap.min(points.len());
    if amount == points.len() {
        return points;
    }
    sample(rng, points.len(), amount)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

//! Parquet input uses the same column names as the CSV export.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use trip_explorer::data::filter::{apply, FilterCriteria};
use trip_explorer::data::loader::load;
use trip_explorer::data::model::{FlagField, Label, Weekday};
use trip_explorer::metrics::{count_flag, sum_distance};

fn write_parquet(path: &std::path::Path) {
    let columns: Vec<(&str, ArrayRef)> = vec![
        (
            "raw_orig_country",
            Arc::new(StringArray::from(vec![Some("Spain"), Some("Portugal"), None])),
        ),
        (
            "pickup_month_local",
            Arc::new(Int64Array::from(vec![Some(3), Some(3), Some(4)])),
        ),
        (
            "pickup_hour_local",
            Arc::new(Float64Array::from(vec![Some(8.0), None, Some(23.0)])),
        ),
        (
            "pickup_day_local",
            Arc::new(StringArray::from(vec![Some("Sabato"), Some("sunday"), None])),
        ),
        (
            "raw_driving_dist_km",
            Arc::new(Float64Array::from(vec![Some(10.0), None, Some(5.0)])),
        ),
        (
            "is_from_airport",
            Arc::new(BooleanArray::from(vec![Some(true), Some(false), None])),
        ),
    ];
    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
            .collect::<Vec<_>>(),
    ));
    let batch = RecordBatch::try_new(
        schema.clone(),
        columns.into_iter().map(|(_, array)| array).collect(),
    )
    .unwrap();

    let file = std::fs::File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn parquet_file_loads_with_typed_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trips.parquet");
    write_parquet(&path);

    let outcome = load(&[path]);
    assert!(outcome.is_loaded(), "{:?}", outcome.diagnostic);
    let trips = outcome.dataset.trips();
    assert_eq!(trips.len(), 3);

    assert_eq!(trips[0].origin_country.as_deref(), Some("Spain"));
    assert_eq!(trips[0].pickup_month, Some(Label::Number(3)));
    assert_eq!(trips[0].pickup_hour, Some(8));
    assert_eq!(trips[0].pickup_day, Some(Weekday::Saturday));
    assert_eq!(trips[1].pickup_day, Some(Weekday::Sunday));
    assert_eq!(trips[2].origin_country, None);
    assert_eq!(trips[2].from_airport, None);

    let everything = apply(&outcome.dataset, &FilterCriteria::all(&outcome.dataset));
    // Row 1 has no hour and drops out.
    assert_eq!(everything.len(), 2);
    assert_eq!(sum_distance(&everything), 15.0);
    assert_eq!(count_flag(&everything, FlagField::FromAirport), 1);
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Write a synthetic Spain / Portugal taxi-trip dataset (CSV, or Parquet by extension)
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Output file; `.parquet` writes Parquet, anything else CSV
    #[arg(default_value = "wetaxi_clean_dataset.csv")]
    output: PathBuf,

    /// Number of trips
    #[arg(default_value_t = 5000)]
    rows: usize,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

struct City {
    country: &'static str,
    name: &'static str,
    lat: f64,
    lon: f64,
    airport: &'static str,
    airport_lat: f64,
    airport_lon: f64,
}

const CITIES: [City; 8] = [
    City {
        country: "Spain",
        name: "Madrid",
        lat: 40.4168,
        lon: -3.7038,
        airport: "MAD",
        airport_lat: 40.4983,
        airport_lon: -3.5676,
    },
    City {
        country: "Spain",
        name: "Barcelona",
        lat: 41.3874,
        lon: 2.1686,
        airport: "BCN",
        airport_lat: 41.2974,
        airport_lon: 2.0833,
    },
    City {
        country: "Spain",
        name: "Valencia",
        lat: 39.4699,
        lon: -0.3763,
        airport: "VLC",
        airport_lat: 39.4893,
        airport_lon: -0.4816,
    },
    City {
        country: "Spain",
        name: "Sevilla",
        lat: 37.3891,
        lon: -5.9845,
        airport: "SVQ",
        airport_lat: 37.4180,
        airport_lon: -5.8931,
    },
    City {
        country: "Spain",
        name: "Malaga",
        lat: 36.7213,
        lon: -4.4214,
        airport: "AGP",
        airport_lat: 36.6749,
        airport_lon: -4.4991,
    },
    City {
        country: "Portugal",
        name: "Lisboa",
        lat: 38.7223,
        lon: -9.1393,
        airport: "LIS",
        airport_lat: 38.7742,
        airport_lon: -9.1342,
    },
    City {
        country: "Portugal",
        name: "Porto",
        lat: 41.1579,
        lon: -8.6291,
        airport: "OPO",
        airport_lat: 41.2481,
        airport_lon: -8.6814,
    },
    City {
        country: "Portugal",
        name: "Faro",
        lat: 37.0194,
        lon: -7.9304,
        airport: "FAO",
        airport_lat: 37.0144,
        airport_lon: -7.9659,
    },
];

const DAYS: [&str; 7] = [
    "Lunedì",
    "Martedì",
    "Mercoledì",
    "Giovedì",
    "Venerdì",
    "Sabato",
    "Domenica",
];

/// One output row, column names as the dashboard expects them.
#[derive(Debug, Serialize)]
struct SampleTrip {
    raw_orig_country: Option<&'static str>,
    raw_orig_city_clean: Option<&'static str>,
    raw_dest_country: Option<&'static str>,
    raw_dest_city_clean: Option<&'static str>,
    orig_airport_code: Option<&'static str>,
    dest_airport_code: Option<&'static str>,
    pickup_month_local: Option<i64>,
    pickup_hour_local: Option<i64>,
    pickup_day_local: Option<&'static str>,
    raw_driving_dist_km: Option<f64>,
    raw_passengers: Option<i64>,
    is_from_airport: i64,
    is_to_airport: i64,
    raw_orig_latitude: Option<f64>,
    raw_orig_longitude: Option<f64>,
    raw_dest_latitude: Option<f64>,
    raw_dest_longitude: Option<f64>,
}

/// Leave roughly 2% of optional cells empty.
fn maybe<T>(rng: &mut StdRng, value: T) -> Option<T> {
    (!rng.gen_bool(0.02)).then_some(value)
}

fn jitter(rng: &mut StdRng, v: f64) -> f64 {
    v + rng.gen_range(-0.04..0.04)
}

fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (p1, p2) = (lat1.to_radians(), lat2.to_radians());
    let dp = (lat2 - lat1).to_radians();
    let dl = (lon2 - lon1).to_radians();
    let a = (dp / 2.0).sin().powi(2) + p1.cos() * p2.cos() * (dl / 2.0).sin().powi(2);
    6371.0 * 2.0 * a.sqrt().asin()
}

fn generate_trip(rng: &mut StdRng) -> SampleTrip {
    let origin = &CITIES[rng.gen_range(0..CITIES.len())];
    let destination = if rng.gen_bool(0.85) {
        let same: Vec<&City> = CITIES.iter().filter(|c| c.country == origin.country).collect();
        same[rng.gen_range(0..same.len())]
    } else {
        &CITIES[rng.gen_range(0..CITIES.len())]
    };

    let from_airport = rng.gen_bool(0.2);
    let to_airport = !from_airport && rng.gen_bool(0.2);

    let (olat, olon) = if from_airport {
        (origin.airport_lat, origin.airport_lon)
    } else {
        (jitter(rng, origin.lat), jitter(rng, origin.lon))
    };
    let (dlat, dlon) = if to_airport {
        (destination.airport_lat, destination.airport_lon)
    } else {
        (jitter(rng, destination.lat), jitter(rng, destination.lon))
    };

    // Road distance is longer than the great circle.
    let distance = (haversine_km(olat, olon, dlat, dlon) * rng.gen_range(1.15..1.4)).max(0.8);
    let distance = (distance * 10.0).round() / 10.0;

    // Busier from 7 to 21.
    let hour = if rng.gen_bool(0.8) {
        rng.gen_range(7..22)
    } else {
        rng.gen_range(0..24)
    };
    let passengers = if rng.gen_bool(0.95) {
        rng.gen_range(1..5)
    } else {
        rng.gen_range(5..8)
    };

    let month = rng.gen_range(1..13);
    let day = DAYS[rng.gen_range(0..DAYS.len())];

    SampleTrip {
        raw_orig_country: maybe(rng, origin.country),
        raw_orig_city_clean: maybe(rng, origin.name),
        raw_dest_country: maybe(rng, destination.country),
        raw_dest_city_clean: maybe(rng, destination.name),
        orig_airport_code: from_airport.then_some(origin.airport),
        dest_airport_code: to_airport.then_some(destination.airport),
        pickup_month_local: maybe(rng, month),
        pickup_hour_local: maybe(rng, hour),
        pickup_day_local: maybe(rng, day),
        raw_driving_dist_km: maybe(rng, distance),
        raw_passengers: maybe(rng, passengers),
        is_from_airport: from_airport as i64,
        is_to_airport: to_airport as i64,
        raw_orig_latitude: maybe(rng, olat),
        raw_orig_longitude: Some(olon),
        raw_dest_latitude: maybe(rng, dlat),
        raw_dest_longitude: Some(dlon),
    }
}

fn write_csv(path: &Path, trips: &[SampleTrip]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for trip in trips {
        writer.serialize(trip).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, trips: &[SampleTrip]) -> Result<()> {
    fn text(trips: &[SampleTrip], f: impl Fn(&SampleTrip) -> Option<&'static str>) -> ArrayRef {
        Arc::new(StringArray::from(trips.iter().map(f).collect::<Vec<_>>()))
    }
    fn int(trips: &[SampleTrip], f: impl Fn(&SampleTrip) -> Option<i64>) -> ArrayRef {
        Arc::new(Int64Array::from(trips.iter().map(f).collect::<Vec<_>>()))
    }
    fn float(trips: &[SampleTrip], f: impl Fn(&SampleTrip) -> Option<f64>) -> ArrayRef {
        Arc::new(Float64Array::from(trips.iter().map(f).collect::<Vec<_>>()))
    }

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("raw_orig_country", text(trips, |t| t.raw_orig_country)),
        ("raw_orig_city_clean", text(trips, |t| t.raw_orig_city_clean)),
        ("raw_dest_country", text(trips, |t| t.raw_dest_country)),
        ("raw_dest_city_clean", text(trips, |t| t.raw_dest_city_clean)),
        ("orig_airport_code", text(trips, |t| t.orig_airport_code)),
        ("dest_airport_code", text(trips, |t| t.dest_airport_code)),
        ("pickup_month_local", int(trips, |t| t.pickup_month_local)),
        ("pickup_hour_local", int(trips, |t| t.pickup_hour_local)),
        ("pickup_day_local", text(trips, |t| t.pickup_day_local)),
        ("raw_driving_dist_km", float(trips, |t| t.raw_driving_dist_km)),
        ("raw_passengers", int(trips, |t| t.raw_passengers)),
        ("is_from_airport", int(trips, |t| Some(t.is_from_airport))),
        ("is_to_airport", int(trips, |t| Some(t.is_to_airport))),
        ("raw_orig_latitude", float(trips, |t| t.raw_orig_latitude)),
        ("raw_orig_longitude", float(trips, |t| t.raw_orig_longitude)),
        ("raw_dest_latitude", float(trips, |t| t.raw_dest_latitude)),
        ("raw_dest_longitude", float(trips, |t| t.raw_dest_longitude)),
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
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let trips: Vec<SampleTrip> = (0..args.rows).map(|_| generate_trip(&mut rng)).collect();

    let is_parquet = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));

    if is_parquet {
        write_parquet(&args.output, &trips)?;
    } else {
        write_csv(&args.output, &trips)?;
    }

    log::info!("Wrote {} trips to {}", trips.len(), args.output.display());
    println!("Wrote {} trips to {}", trips.len(), args.output.display());
    Ok(())
}

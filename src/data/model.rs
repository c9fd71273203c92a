use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Label – a month cell, numeric or free text
// ---------------------------------------------------------------------------

/// A categorical label that may be numeric (`3`, `"3.0"`) or textual (`"Mar"`).
/// Numbers order numerically and come before text, so `2 < 10 < "Apr"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Label {
    Number(i64),
    Text(String),
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self, other) {
            (Label::Number(a), Label::Number(b)) => a.cmp(b),
            (Label::Text(a), Label::Text(b)) => a.cmp(b),
            (Label::Number(_), Label::Text(_)) => Ordering::Less,
            (Label::Text(_), Label::Number(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Number(n) => write!(f, "{n}"),
            Label::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Label {
    /// Parse a raw cell. Empty cells are absent; whole floats collapse to integers.
    pub fn parse(raw: &str) -> Option<Label> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Some(Label::Number(i));
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() && f.fract() == 0.0 {
                return Some(Label::Number(f as i64));
            }
        }
        Some(Label::Text(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Weekday
// ---------------------------------------------------------------------------

/// Display language for weekday buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayLanguage {
    #[default]
    Italian,
    English,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Canonical bucket order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    const ITALIAN: [&'static str; 7] = [
        "Lunedì",
        "Martedì",
        "Mercoledì",
        "Giovedì",
        "Venerdì",
        "Sabato",
        "Domenica",
    ];

    const ENGLISH: [&'static str; 7] = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ];

    /// Zero-based position in [`Weekday::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical (English) name, used as the category key.
    pub fn as_str(self) -> &'static str {
        Self::ENGLISH[self.index()]
    }

    pub fn name(self, language: WeekdayLanguage) -> &'static str {
        match language {
            WeekdayLanguage::Italian => Self::ITALIAN[self.index()],
            WeekdayLanguage::English => Self::ENGLISH[self.index()],
        }
    }

    /// Accepts Italian or English names (full or three-letter, accents optional)
    /// and ISO day numbers 1 (Monday) to 7 (Sunday).
    pub fn parse(raw: &str) -> Option<Weekday> {
        let s = raw.trim().to_lowercase();
        if s.is_empty() {
            return None;
        }
        if let Ok(n) = s.parse::<usize>() {
            return (1..=7).contains(&n).then(|| Self::ALL[n - 1]);
        }
        let folded: String = s
            .chars()
            .map(|c| match c {
                'ì' | 'í' => 'i',
                other => other,
            })
            .collect();
        Self::ALL.into_iter().find(|day| {
            let it = Self::ITALIAN[day.index()].to_lowercase().replace('ì', "i");
            let en = Self::ENGLISH[day.index()].to_lowercase();
            folded == it
                || folded == en
                || (folded.chars().count() == 3
                    && (it.starts_with(&folded) || en.starts_with(&folded)))
        })
    }
}

// ---------------------------------------------------------------------------
// GeoPoint
// ---------------------------------------------------------------------------

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// `None` unless both coordinates are present, finite and in range.
    pub fn new(lat: Option<f64>, lon: Option<f64>) -> Option<GeoPoint> {
        let (lat, lon) = (lat?, lon?);
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        valid.then_some(GeoPoint { lat, lon })
    }
}

// ---------------------------------------------------------------------------
// Field selectors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    OriginCountry,
    OriginCity,
    DestinationCountry,
    DestinationCity,
    OriginAirport,
    DestinationAirport,
    PickupMonth,
    PickupDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    PickupHour,
    DrivingDistanceKm,
    Passengers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagField {
    FromAirport,
    ToAirport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoField {
    Origin,
    Destination,
}

/// Any column that can be counted or bucketed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Category(CategoryField),
    Numeric(NumericField),
}

impl From<CategoryField> for Field {
    fn from(f: CategoryField) -> Self {
        Field::Category(f)
    }
}

impl From<NumericField> for Field {
    fn from(f: NumericField) -> Self {
        Field::Numeric(f)
    }
}

// ---------------------------------------------------------------------------
// TripRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single taxi trip. Every attribute may be absent in the source data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripRecord {
    pub origin_country: Option<String>,
    pub origin_city: Option<String>,
    pub destination_country: Option<String>,
    pub destination_city: Option<String>,
    pub origin_airport: Option<String>,
    pub destination_airport: Option<String>,

    pub pickup_month: Option<Label>,
    /// Local pickup hour, 0–23.
    pub pickup_hour: Option<u8>,
    pub pickup_day: Option<Weekday>,

    pub driving_distance_km: Option<f64>,
    pub passengers: Option<u32>,

    pub from_airport: Option<bool>,
    pub to_airport: Option<bool>,

    pub origin: Option<GeoPoint>,
    pub destination: Option<GeoPoint>,
}

impl TripRecord {
    pub fn category(&self, field: CategoryField) -> Option<Cow<'_, str>> {
        fn borrowed(v: &Option<String>) -> Option<Cow<'_, str>> {
            v.as_deref().map(Cow::Borrowed)
        }
        match field {
            CategoryField::OriginCountry => borrowed(&self.origin_country),
            CategoryField::OriginCity => borrowed(&self.origin_city),
            CategoryField::DestinationCountry => borrowed(&self.destination_country),
            CategoryField::DestinationCity => borrowed(&self.destination_city),
            CategoryField::OriginAirport => borrowed(&self.origin_airport),
            CategoryField::DestinationAirport => borrowed(&self.destination_airport),
            CategoryField::PickupMonth => {
                self.pickup_month.as_ref().map(|m| Cow::Owned(m.to_string()))
            }
            CategoryField::PickupDay => self.pickup_day.map(|d| Cow::Borrowed(d.as_str())),
        }
    }

    pub fn numeric(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::PickupHour => self.pickup_hour.map(f64::from),
            NumericField::DrivingDistanceKm => self.driving_distance_km,
            NumericField::Passengers => self.passengers.map(f64::from),
        }
    }

    pub fn flag(&self, field: FlagField) -> bool {
        match field {
            FlagField::FromAirport => self.from_airport.unwrap_or(false),
            FlagField::ToAirport => self.to_airport.unwrap_or(false),
        }
    }

    pub fn point(&self, field: GeoField) -> Option<GeoPoint> {
        match field {
            GeoField::Origin => self.origin,
            GeoField::Destination => self.destination,
        }
    }

    /// Textual value of any field, for frequency tables and category buckets.
    pub fn text(&self, field: Field) -> Option<Cow<'_, str>> {
        match field {
            Field::Category(c) => self.category(c),
            Field::Numeric(n) => self.numeric(n).map(|v| Cow::Owned(format_number(v))),
        }
    }

    /// Numeric value of any field, for fixed-width buckets. Text categories
    /// only yield a number when they parse as one (e.g. numeric months).
    pub fn number(&self, field: Field) -> Option<f64> {
        match field {
            Field::Numeric(n) => self.numeric(n),
            Field::Category(CategoryField::PickupMonth) => match &self.pickup_month {
                Some(Label::Number(n)) => Some(*n as f64),
                _ => None,
            },
            Field::Category(CategoryField::PickupDay) => self.pickup_day.map(|d| d.index() as f64),
            Field::Category(c) => self.category(c).and_then(|s| s.trim().parse().ok()),
        }
    }
}

fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The immutable, ordered collection of trips for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    trips: Vec<TripRecord>,
}

impl Dataset {
    pub fn new(trips: Vec<TripRecord>) -> Self {
        Dataset { trips }
    }

    pub fn empty() -> Self {
        Dataset::default()
    }

    pub fn trips(&self) -> &[TripRecord] {
        &self.trips
    }

    /// Number of trips.
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

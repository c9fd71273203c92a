use std::collections::HashMap;

use serde::Serialize;

use crate::data::filter::FilteredView;
use crate::data::model::{Field, Weekday};

// ---------------------------------------------------------------------------
// Bucketing rules
// ---------------------------------------------------------------------------

/// Largest fixed-width histogram computed; larger specs yield no buckets.
pub const MAX_BUCKETS: usize = 1000;

/// Above this many unit buckets, [`BucketSpec::unit_range`] widens them.
pub const MAX_UNIT_BUCKETS: usize = 50;

/// How a histogram splits its field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BucketSpec {
    /// `count` buckets of equal `width` starting at `start`. The upper edge is
    /// inclusive for the last bucket only; values outside are dropped.
    FixedWidth { start: f64, width: f64, count: usize },
    /// One bucket per label, in this order, including empty ones.
    Categories(Vec<String>),
}

impl BucketSpec {
    /// 24 one-hour buckets over 0–23.
    pub fn hours_of_day() -> Self {
        BucketSpec::FixedWidth {
            start: 0.0,
            width: 1.0,
            count: 24,
        }
    }

    /// Monday to Sunday, keyed by canonical weekday name.
    pub fn weekdays() -> Self {
        BucketSpec::categories(Weekday::ALL.iter().map(|d| d.as_str()))
    }

    /// Unit-width buckets `0, 1, ..., max`. When that would exceed
    /// [`MAX_UNIT_BUCKETS`], the same range is split into at most that many
    /// buckets of equal integer width.
    pub fn unit_range(max: u32) -> Self {
        let values = u64::from(max) + 1;
        let limit = MAX_UNIT_BUCKETS as u64;
        if values <= limit {
            return BucketSpec::FixedWidth {
                start: 0.0,
                width: 1.0,
                count: values as usize,
            };
        }
        let width = values.div_ceil(limit);
        BucketSpec::FixedWidth {
            start: 0.0,
            width: width as f64,
            count: values.div_ceil(width) as usize,
        }
    }

    pub fn categories<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BucketSpec::Categories(labels.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// Histogram output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Bucket {
    Range { lower: f64, upper: f64 },
    Category { label: String },
}

impl Bucket {
    /// Axis label: the lower edge for unit-width integer ranges, `lo–hi` otherwise.
    pub fn label(&self) -> String {
        match self {
            Bucket::Category { label } => label.clone(),
            Bucket::Range { lower, upper } => {
                if (upper - lower - 1.0).abs() < f64::EPSILON && lower.fract() == 0.0 {
                    format!("{lower}")
                } else {
                    format!("{lower}–{upper}")
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub bucket: Bucket,
    pub count: usize,
}

/// Count the trips of `view` into the buckets of `spec`. Missing values are
/// not counted. Every bucket is returned, even when empty.
pub fn histogram(view: &FilteredView<'_>, field: Field, spec: &BucketSpec) -> Vec<HistogramBin> {
    match spec {
        BucketSpec::FixedWidth {
            start,
            width,
            count,
        } => fixed_width(view, field, *start, *width, *count),
        BucketSpec::Categories(labels) => categories(view, field, labels),
    }
}

fn fixed_width(
    view: &FilteredView<'_>,
    field: Field,
    start: f64,
    width: f64,
    count: usize,
) -> Vec<HistogramBin> {
    if count == 0 || width <= 0.0 || !start.is_finite() || !width.is_finite() {
        return Vec::new();
    }
    if count > MAX_BUCKETS {
        log::warn!("Histogram with {count} buckets exceeds the limit of {MAX_BUCKETS}; skipped");
        return Vec::new();
    }
    let end = start + width * count as f64;
    let mut counts = vec![0usize; count];

    for value in view.trips().filter_map(|t| t.number(field)) {
        if !value.is_finite() || value < start || value > end {
            continue;
        }
        let idx = (((value - start) / width).floor() as usize).min(count - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            bucket: Bucket::Range {
                lower: start + width * i as f64,
                upper: start + width * (i + 1) as f64,
            },
            count,
        })
        .collect()
}

fn categories(view: &FilteredView<'_>, field: Field, labels: &[String]) -> Vec<HistogramBin> {
    let mut position: HashMap<&str, usize> = HashMap::with_capacity(labels.len());
    for (i, label) in labels.iter().enumerate() {
        position.entry(label.as_str()).or_insert(i);
    }

    let mut counts = vec![0usize; labels.len()];
    for trip in view.trips() {
        if let Some(i) = trip.text(field).and_then(|v| position.get(&*v).copied()) {
            counts[i] += 1;
        }
    }

    labels
        .iter()
        .zip(counts)
        .map(|(label, count)| HistogramBin {
            bucket: Bucket::Category {
                label: label.clone(),
            },
            count,
        })
        .collect()
}

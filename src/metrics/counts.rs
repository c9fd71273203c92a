use std::collections::HashMap;

use serde::Serialize;

use crate::data::filter::FilteredView;
use crate::data::model::Field;

/// One row of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

impl CategoryCount {
    pub fn new(category: impl Into<String>, count: usize) -> Self {
        CategoryCount {
            category: category.into(),
            count,
        }
    }
}

/// Frequency table over the present values of `field`, most frequent first.
/// Equal counts keep the order in which the values were first seen.
pub fn value_counts(view: &FilteredView<'_>, field: Field) -> Vec<CategoryCount> {
    let mut position: HashMap<String, usize> = HashMap::new();
    let mut table: Vec<CategoryCount> = Vec::new();

    for trip in view.trips() {
        let Some(value) = trip.text(field) else {
            continue;
        };
        match position.get(&*value) {
            Some(&i) => table[i].count += 1,
            None => {
                position.insert(value.to_string(), table.len());
                table.push(CategoryCount::new(value, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among ties.
    table.sort_by(|a, b| b.count.cmp(&a.count));
    table
}

/// The first `n` entries of a table already sorted by descending count.
pub fn top_n(counts: &[CategoryCount], n: usize) -> Vec<CategoryCount> {
    counts.iter().take(n).cloned().collect()
}

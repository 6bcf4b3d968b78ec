//! Grid completion: the cross product of observed (state, category, year)
//! domains, left-joined with the loaded records so every combination is
//! present for charting, absent ones as zero.
//!
//! Computed once at startup and shared read-only by every view builder.

use std::collections::HashMap;

use dataset::IncidentRecord;
use serde::{Deserialize, Serialize};

use crate::filter::TypeSelection;

/// One cell of the completed grid, at (state, category, year) granularity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRow {
    pub state: String,
    pub crime_category: String,
    pub year: u16,
    pub reported_crimes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedGrid {
    /// Observed domains, in first-seen order. The trend view relies on
    /// this order being stable across frames.
    states: Vec<String>,
    categories: Vec<String>,
    years: Vec<u16>,
    crime_types: Vec<String>,
    /// Exactly one row per (state, category, year) triple, in
    /// state-major, category-then-year order.
    rows: Vec<GridRow>,
    /// Source records, retained for the crime-type breakdown, which joins
    /// on a finer key than the grid keeps.
    records: Vec<IncidentRecord>,
}

impl CompletedGrid {
    pub fn complete(records: Vec<IncidentRecord>) -> Self {
        let states = first_seen(records.iter().map(|r| r.state.clone()));
        let categories = first_seen(records.iter().map(|r| r.crime_category.clone()));
        let years = first_seen(records.iter().map(|r| r.year));
        let crime_types = first_seen(records.iter().map(|r| r.crime_type.clone()));

        // Duplicate (state, category, year) keys are summed before the
        // join; the dataset's granularity is crime type, which is finer
        // than the grid's.
        let mut sums: HashMap<(&str, &str, u16), u64> = HashMap::new();
        for r in &records {
            *sums
                .entry((r.state.as_str(), r.crime_category.as_str(), r.year))
                .or_insert(0) += r.reported_crimes;
        }

        let mut rows = Vec::with_capacity(states.len() * categories.len() * years.len());
        for state in &states {
            for category in &categories {
                for &year in &years {
                    let reported_crimes = sums
                        .get(&(state.as_str(), category.as_str(), year))
                        .copied()
                        .unwrap_or(0);
                    rows.push(GridRow {
                        state: state.clone(),
                        crime_category: category.clone(),
                        year,
                        reported_crimes,
                    });
                }
            }
        }

        Self {
            states,
            categories,
            years,
            crime_types,
            rows,
            records,
        }
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn years(&self) -> &[u16] {
        &self.years
    }

    pub fn crime_types(&self) -> &[String] {
        &self.crime_types
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    /// Sum of reported crimes per state over every category and year,
    /// in state domain order.
    pub fn totals_by_state(&self) -> Vec<(String, u64)> {
        let mut totals: Vec<(String, u64)> =
            self.states.iter().map(|s| (s.clone(), 0)).collect();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, s) in self.states.iter().enumerate() {
            index.insert(s.as_str(), i);
        }
        for row in &self.rows {
            if let Some(&i) = index.get(row.state.as_str()) {
                totals[i].1 += row.reported_crimes;
            }
        }
        totals
    }

    /// Sum of reported crimes per (state, crime type) for the selected
    /// types, joined from the source records. Outer vec follows the
    /// crime-type domain order; inner vec the state domain order.
    pub fn totals_by_state_and_type(
        &self,
        selection: &TypeSelection,
    ) -> Vec<(String, Vec<(String, u64)>)> {
        let mut state_index: HashMap<&str, usize> = HashMap::new();
        for (i, s) in self.states.iter().enumerate() {
            state_index.insert(s.as_str(), i);
        }

        let mut out = Vec::new();
        for crime_type in &self.crime_types {
            if !selection.matches(crime_type) {
                continue;
            }
            let mut per_state: Vec<(String, u64)> =
                self.states.iter().map(|s| (s.clone(), 0)).collect();
            for r in &self.records {
                if r.crime_type == *crime_type {
                    if let Some(&i) = state_index.get(r.state.as_str()) {
                        per_state[i].1 += r.reported_crimes;
                    }
                }
            }
            out.push((crime_type.clone(), per_state));
        }
        out
    }

    /// Largest reported count across the whole grid, used for marker
    /// scaling on the trend view.
    pub fn max_cell(&self) -> u64 {
        self.rows.iter().map(|r| r.reported_crimes).max().unwrap_or(0)
    }
}

/// Min and max of a value series, `None` when empty.
pub fn min_max(values: &[u64]) -> Option<(u64, u64)> {
    let first = *values.first()?;
    let mut min = first;
    let mut max = first;
    for &v in values.iter().skip(1) {
        min = min.min(v);
        max = max.max(v);
    }
    Some((min, max))
}

fn first_seen<T: Clone + PartialEq>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

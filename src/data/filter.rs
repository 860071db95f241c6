use std::collections::BTreeSet;
use std::fmt;

use super::model::{Dataset, SleepRecord};

/// Occupation selector entry meaning "no occupation filter".
pub const ALL_OCCUPATIONS: &str = "All";

// ---------------------------------------------------------------------------
// Filter predicate: occupation + minimum sleep duration
// ---------------------------------------------------------------------------

/// Which occupation a row must have to pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OccupationFilter {
    #[default]
    All,
    /// Byte-exact, case-sensitive match.
    Exact(String),
}

impl OccupationFilter {
    /// Map a selector entry to a filter; the [`ALL_OCCUPATIONS`] sentinel disables it.
    pub fn from_selection(selection: &str) -> Self {
        if selection == ALL_OCCUPATIONS {
            OccupationFilter::All
        } else {
            OccupationFilter::Exact(selection.to_string())
        }
    }

    pub fn matches(&self, occupation: Option<&str>) -> bool {
        match self {
            OccupationFilter::All => true,
            OccupationFilter::Exact(wanted) => occupation == Some(wanted.as_str()),
        }
    }
}

impl fmt::Display for OccupationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OccupationFilter::All => write!(f, "{ALL_OCCUPATIONS}"),
            OccupationFilter::Exact(o) => write!(f, "{o}"),
        }
    }
}

/// User-selected predicate parameters. Rebuilt on every control change.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub occupation: OccupationFilter,
    /// Inclusive lower bound, hours.
    pub min_sleep_duration: f64,
}

impl FilterCriteria {
    pub fn new(occupation: OccupationFilter, min_sleep_duration: f64) -> Self {
        FilterCriteria {
            occupation,
            min_sleep_duration,
        }
    }

    /// A row passes when its sleep duration is present and at least the
    /// threshold, and its occupation matches. Missing sleep never passes.
    pub fn matches(&self, record: &SleepRecord) -> bool {
        record
            .sleep_duration
            .is_some_and(|s| s >= self.min_sleep_duration)
            && self.occupation.matches(record.occupation.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Selector inputs derived from the unfiltered dataset
// ---------------------------------------------------------------------------

/// Distinct non-missing occupations, sorted, prefixed with [`ALL_OCCUPATIONS`].
pub fn occupation_options(dataset: &Dataset) -> Vec<String> {
    let distinct: BTreeSet<&str> = dataset
        .iter()
        .filter_map(|r| r.occupation.as_deref())
        .collect();
    std::iter::once(ALL_OCCUPATIONS.to_string())
        .chain(distinct.into_iter().map(str::to_string))
        .collect()
}

/// Floor of the smallest and largest sleep duration, for the slider bounds.
///
/// `None` when no row carries a sleep duration.
pub fn sleep_range(dataset: &Dataset) -> Option<(i64, i64)> {
    let mut values = dataset.iter().filter_map(|r| r.sleep_duration);
    let first = values.next()?;
    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    Some((min.floor() as i64, max.floor() as i64))
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of records that pass `criteria`, in dataset order.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(r))
        .map(|(i, _)| i)
        .collect()
}

/// The subsequence of `dataset` passing `criteria`. The input is untouched.
pub fn filter(dataset: &Dataset, criteria: &FilterCriteria) -> Dataset {
    dataset.select(&filtered_indices(dataset, criteria))
}

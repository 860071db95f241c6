use crate::error::EmptyResultError;

use super::model::Dataset;

/// Mean of each numeric column over a (filtered) dataset.
///
/// Means keep full precision; use [`format_stat`] for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStatistics {
    pub row_count: usize,
    pub mean_sleep_duration: Option<f64>,
    pub mean_stress_level: Option<f64>,
    pub mean_physical_activity: Option<f64>,
}

/// Compute the summary block, or [`EmptyResultError`] when nothing is left.
///
/// Each mean counts only rows where that column is present; a column with no
/// values at all yields `None` rather than NaN.
pub fn summarize(dataset: &Dataset) -> Result<SummaryStatistics, EmptyResultError> {
    if dataset.is_empty() {
        return Err(EmptyResultError);
    }
    Ok(SummaryStatistics {
        row_count: dataset.len(),
        mean_sleep_duration: mean(dataset.iter().filter_map(|r| r.sleep_duration)),
        mean_stress_level: mean(dataset.iter().filter_map(|r| r.stress_level)),
        mean_physical_activity: mean(dataset.iter().filter_map(|r| r.physical_activity)),
    })
}

pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Two-decimal rendering used by the summary panel.
pub fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

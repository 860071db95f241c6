use crate::data::aggregate::{aggregate_by_age, gender_distribution, AgeAggregate, GenderDistribution};
use crate::data::filter::{filter, FilterCriteria};
use crate::data::model::Dataset;
use crate::data::summary::{summarize, SummaryStatistics};
use crate::error::EmptyResultError;

// ---------------------------------------------------------------------------
// ViewModel – everything one render pass shows
// ---------------------------------------------------------------------------

/// Statistics and chart inputs for a non-empty filtered dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub summary: SummaryStatistics,
    pub by_age: Vec<AgeAggregate>,
    pub by_gender: Vec<GenderDistribution>,
}

/// Output of one pipeline run over the loaded dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub criteria: FilterCriteria,
    pub total_rows: usize,
    /// Rows passing `criteria`, feeding the scatter plot and the table.
    pub filtered: Dataset,
    pub body: Result<DashboardView, EmptyResultError>,
}

/// Filter, then summarise and aggregate. Pure: same inputs, same output.
///
/// When nothing passes the filters, `body` is [`EmptyResultError`] and no
/// statistics are computed.
pub fn render(dataset: &Dataset, criteria: &FilterCriteria) -> ViewModel {
    let filtered = filter(dataset, criteria);
    let body = summarize(&filtered).map(|summary| DashboardView {
        summary,
        by_age: aggregate_by_age(&filtered),
        by_gender: gender_distribution(&filtered),
    });

    log::debug!(
        "render: occupation={} min_sleep={} → {}/{} rows",
        criteria.occupation,
        criteria.min_sleep_duration,
        filtered.len(),
        dataset.len()
    );

    ViewModel {
        criteria: criteria.clone(),
        total_rows: dataset.len(),
        filtered,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::OccupationFilter;
    use crate::data::fixtures::doctors_and_nurse;

    #[test]
    fn worked_example_end_to_end() {
        let ds = doctors_and_nurse();
        let view = render(&ds, &FilterCriteria::new(OccupationFilter::All, 7.0));

        assert_eq!(view.total_rows, 3);
        assert_eq!(view.filtered.len(), 2);
        let body = view.body.unwrap();
        assert_eq!(body.summary.mean_sleep_duration, Some(7.5));
        let ages: Vec<_> = body.by_age.iter().map(|g| (g.age, g.mean_sleep_duration)).collect();
        assert_eq!(ages, vec![(30, 8.0), (40, 7.0)]);
    }

    #[test]
    fn no_match_short_circuits() {
        let ds = doctors_and_nurse();
        let criteria = FilterCriteria::new(OccupationFilter::Exact("Pilot".into()), 0.0);
        let view = render(&ds, &criteria);
        assert!(view.filtered.is_empty());
        assert_eq!(view.body, Err(EmptyResultError));
    }

    #[test]
    fn render_is_deterministic() {
        let ds = doctors_and_nurse();
        let criteria = FilterCriteria::new(OccupationFilter::Exact("Doctor".into()), 6.0);
        assert_eq!(render(&ds, &criteria), render(&ds, &criteria));
    }
}

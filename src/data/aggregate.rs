use std::collections::BTreeMap;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Average sleep by age (line chart)
// ---------------------------------------------------------------------------

/// Mean sleep duration of all rows sharing one age.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeAggregate {
    pub age: i64,
    pub mean_sleep_duration: f64,
    /// Rows contributing to this group.
    pub count: usize,
}

/// Group by age and average sleep duration, ascending by age.
///
/// Rows without an age or a sleep duration do not contribute.
pub fn aggregate_by_age(dataset: &Dataset) -> Vec<AgeAggregate> {
    let mut groups: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for r in dataset.iter() {
        if let (Some(age), Some(sleep)) = (r.age, r.sleep_duration) {
            let entry = groups.entry(age).or_insert((0.0, 0));
            entry.0 += sleep;
            entry.1 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(age, (sum, count))| AgeAggregate {
            age,
            mean_sleep_duration: sum / count as f64,
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sleep distribution by gender (box plot)
// ---------------------------------------------------------------------------

/// Box-plot summary of sleep duration for one gender.
#[derive(Debug, Clone, PartialEq)]
pub struct GenderDistribution {
    pub gender: String,
    pub count: usize,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    /// Observations beyond 1.5 × IQR from the box.
    pub outliers: Vec<f64>,
}

impl GenderDistribution {
    /// `None` for an empty sample.
    fn from_sample(gender: String, mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);

        let q1 = quantile(&values, 0.25);
        let median = quantile(&values, 0.5);
        let q3 = quantile(&values, 0.75);
        let fence = 1.5 * (q3 - q1);
        let (lo_fence, hi_fence) = (q1 - fence, q3 + fence);

        let inside = values.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
        let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
        let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
        let outliers = values
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Some(GenderDistribution {
            gender,
            count: values.len(),
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// One box per gender present in `dataset`, ordered by gender label.
pub fn gender_distribution(dataset: &Dataset) -> Vec<GenderDistribution> {
    let mut samples: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in dataset.iter() {
        if let (Some(gender), Some(sleep)) = (r.gender.as_deref(), r.sleep_duration) {
            samples.entry(gender).or_default().push(sleep);
        }
    }
    samples
        .into_iter()
        .filter_map(|(gender, values)| GenderDistribution::from_sample(gender.to_string(), values))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, FilterCriteria, OccupationFilter};
    use crate::data::fixtures::{doctors_and_nurse, record};
    use crate::data::model::SleepRecord;

    fn gendered(gender: &str, sleep: f64) -> SleepRecord {
        SleepRecord {
            gender: Some(gender.to_string()),
            sleep_duration: Some(sleep),
            ..Default::default()
        }
    }

    #[test]
    fn worked_example_by_age() {
        let filtered = filter(
            &doctors_and_nurse(),
            &FilterCriteria::new(OccupationFilter::All, 7.0),
        );
        let groups = aggregate_by_age(&filtered);
        assert_eq!(
            groups,
            vec![
                AgeAggregate { age: 30, mean_sleep_duration: 8.0, count: 1 },
                AgeAggregate { age: 40, mean_sleep_duration: 7.0, count: 1 },
            ]
        );
    }

    #[test]
    fn ages_strictly_increase_and_counts_cover_input() {
        let ds = Dataset::new(
            vec![
                record("A", 7.0, 52),
                record("A", 6.0, 29),
                record("A", 8.0, 52),
                record("A", 6.5, 41),
                record("A", 7.5, 29),
                record("A", 9.0, 29),
            ],
            Vec::new(),
        );
        let groups = aggregate_by_age(&ds);
        assert!(groups.windows(2).all(|w| w[0].age < w[1].age));
        assert_eq!(groups.iter().map(|g| g.count).sum::<usize>(), ds.len());
        assert_eq!(groups[0].age, 29);
        assert!((groups[0].mean_sleep_duration - 22.5 / 3.0).abs() < 1e-12);
        assert_eq!(groups[2].mean_sleep_duration, 7.5);
    }

    #[test]
    fn rows_without_age_are_left_out() {
        let ds = Dataset::new(
            vec![
                record("A", 7.0, 30),
                SleepRecord {
                    sleep_duration: Some(9.0),
                    ..Default::default()
                },
            ],
            Vec::new(),
        );
        assert_eq!(
            aggregate_by_age(&ds),
            vec![AgeAggregate { age: 30, mean_sleep_duration: 7.0, count: 1 }]
        );
    }

    #[test]
    fn empty_input_gives_no_groups() {
        assert!(aggregate_by_age(&Dataset::default()).is_empty());
        assert!(gender_distribution(&Dataset::default()).is_empty());
    }

    #[test]
    fn gender_boxes_use_linear_quartiles() {
        let ds = Dataset::new(
            vec![
                gendered("Male", 6.0),
                gendered("Female", 7.0),
                gendered("Male", 7.0),
                gendered("Male", 8.0),
                gendered("Male", 9.0),
                SleepRecord {
                    sleep_duration: Some(5.0),
                    ..Default::default()
                },
            ],
            Vec::new(),
        );
        let boxes = gender_distribution(&ds);
        assert_eq!(boxes.len(), 2);

        let female = &boxes[0];
        assert_eq!(female.gender, "Female");
        assert_eq!(female.count, 1);
        assert_eq!((female.q1, female.median, female.q3), (7.0, 7.0, 7.0));

        let male = &boxes[1];
        assert_eq!(male.count, 4);
        assert_eq!(male.q1, 6.75);
        assert_eq!(male.median, 7.5);
        assert_eq!(male.q3, 8.25);
        assert_eq!((male.lower_whisker, male.upper_whisker), (6.0, 9.0));
        assert!(male.outliers.is_empty());
    }

    #[test]
    fn far_values_become_outliers() {
        let ds = Dataset::new(
            [7.0, 7.1, 7.2, 7.3, 7.4, 12.0]
                .iter()
                .map(|&s| gendered("Female", s))
                .collect(),
            Vec::new(),
        );
        let b = &gender_distribution(&ds)[0];
        assert_eq!(b.outliers, vec![12.0]);
        assert_eq!(b.upper_whisker, 7.4);
        assert_eq!(b.lower_whisker, 7.0);
    }
}

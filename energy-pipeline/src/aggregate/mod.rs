//! Pure derivations over the merged dataset: daily totals, weekly totals,
//! and per-building summary statistics. All three are recomputable at any
//! time and return empty output for empty input.

use std::collections::BTreeMap;

use energy_domain::{BuildingSummary, PeriodTotal, ReadingRow};
use time::Date;

/// The Sunday that closes the 7-day bucket containing `day`.
///
/// Weekly totals label each bucket by its end, so every reading in
/// Monday..=Sunday lands on that Sunday.
pub fn week_ending(day: Date) -> Date {
    let to_sunday = 6 - day.weekday().number_days_from_monday();
    day + time::Duration::days(i64::from(to_sunday))
}

fn bucket_totals(rows: &[ReadingRow], period_of: impl Fn(Date) -> Date) -> Vec<PeriodTotal> {
    let mut sums: BTreeMap<(String, Date), f64> = BTreeMap::new();
    for row in rows {
        let period = period_of(row.reading.ts.date());
        *sums.entry((row.building.clone(), period)).or_insert(0.0) += row.reading.kwh;
    }

    sums.into_iter()
        .map(|((building, period), kwh)| PeriodTotal {
            building,
            period,
            kwh,
        })
        .collect()
}

/// Sum kWh per (building, calendar day). Days without readings for a
/// building produce no row.
pub fn daily_totals(rows: &[ReadingRow]) -> Vec<PeriodTotal> {
    bucket_totals(rows, |day| day)
}

/// Sum kWh per (building, week-ending Sunday). Same sparsity rule as
/// [`daily_totals`].
pub fn weekly_totals(rows: &[ReadingRow]) -> Vec<PeriodTotal> {
    bucket_totals(rows, week_ending)
}

/// Mean, min, max, and sum of kWh per building, one row per building
/// present in `rows`, sorted by building name.
pub fn building_summary(rows: &[ReadingRow]) -> Vec<BuildingSummary> {
    struct Acc {
        sum: f64,
        min: f64,
        max: f64,
        count: u64,
    }

    let mut accs: BTreeMap<String, Acc> = BTreeMap::new();
    for row in rows {
        let kwh = row.reading.kwh;
        accs.entry(row.building.clone())
            .and_modify(|acc| {
                acc.sum += kwh;
                acc.min = acc.min.min(kwh);
                acc.max = acc.max.max(kwh);
                acc.count += 1;
            })
            .or_insert(Acc {
                sum: kwh,
                min: kwh,
                max: kwh,
                count: 1,
            });
    }

    accs.into_iter()
        .map(|(building, acc)| BuildingSummary {
            building,
            mean_kwh: acc.sum / acc.count as f64,
            min_kwh: acc.min,
            max_kwh: acc.max,
            total_kwh: acc.sum,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn row(building: &str, ts: time::OffsetDateTime, kwh: f64) -> ReadingRow {
        ReadingRow::new(building, ts, kwh)
    }

    #[test]
    fn week_ending_is_anchored_to_sunday() {
        // 2024-03-01 is a Friday; 2024-03-03 the following Sunday.
        assert_eq!(week_ending(date!(2024-03-01)), date!(2024-03-03));
        assert_eq!(week_ending(date!(2024-03-03)), date!(2024-03-03));
        assert_eq!(week_ending(date!(2024-03-04)), date!(2024-03-10));
    }

    #[test]
    fn daily_totals_group_by_building_and_day() {
        let rows = vec![
            row("gym", datetime!(2024-03-01 06:00:00 UTC), 1.0),
            row("gym", datetime!(2024-03-01 18:00:00 UTC), 2.0),
            row("gym", datetime!(2024-03-02 06:00:00 UTC), 4.0),
            row("library", datetime!(2024-03-01 06:00:00 UTC), 8.0),
        ];

        let daily = daily_totals(&rows);
        assert_eq!(daily.len(), 3);
        assert_eq!(daily[0].building, "gym");
        assert_eq!(daily[0].period, date!(2024-03-01));
        assert_eq!(daily[0].kwh, 3.0);
        assert_eq!(daily[1].kwh, 4.0);
        assert_eq!(daily[2].building, "library");
    }

    #[test]
    fn weekly_totals_cross_day_boundaries_within_one_bucket() {
        // Friday and Saturday fall in the same week-ending-Sunday bucket.
        let rows = vec![
            row("gym", datetime!(2024-03-01 06:00:00 UTC), 1.0),
            row("gym", datetime!(2024-03-02 06:00:00 UTC), 2.0),
            row("gym", datetime!(2024-03-04 06:00:00 UTC), 4.0),
        ];

        let weekly = weekly_totals(&rows);
        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly[0].period, date!(2024-03-03));
        assert_eq!(weekly[0].kwh, 3.0);
        assert_eq!(weekly[1].period, date!(2024-03-10));
        assert_eq!(weekly[1].kwh, 4.0);
    }

    #[test]
    fn summary_statistics_per_building() {
        let rows = vec![
            row("gym", datetime!(2024-03-01 06:00:00 UTC), 2.0),
            row("gym", datetime!(2024-03-01 07:00:00 UTC), 6.0),
            row("library", datetime!(2024-03-01 06:00:00 UTC), 3.0),
        ];

        let summary = building_summary(&rows);
        assert_eq!(summary.len(), 2);

        let gym = &summary[0];
        assert_eq!(gym.building, "gym");
        assert_eq!(gym.mean_kwh, 4.0);
        assert_eq!(gym.min_kwh, 2.0);
        assert_eq!(gym.max_kwh, 6.0);
        assert_eq!(gym.total_kwh, 8.0);
    }

    #[test]
    fn summary_totals_conserve_the_merged_sum() {
        let rows = vec![
            row("a", datetime!(2024-03-01 06:00:00 UTC), 1.5),
            row("b", datetime!(2024-03-01 06:00:00 UTC), 2.5),
            row("a", datetime!(2024-03-02 06:00:00 UTC), 4.0),
        ];

        let merged_sum: f64 = rows.iter().map(|r| r.reading.kwh).sum();
        let summary_sum: f64 = building_summary(&rows).iter().map(|s| s.total_kwh).sum();
        assert!((merged_sum - summary_sum).abs() < 1e-9);
    }

    #[test]
    fn daily_totals_per_building_match_the_summary_total() {
        let rows = vec![
            row("a", datetime!(2024-03-01 06:00:00 UTC), 1.5),
            row("a", datetime!(2024-03-02 06:00:00 UTC), 2.5),
            row("a", datetime!(2024-03-05 06:00:00 UTC), 4.0),
        ];

        let daily_sum: f64 = daily_totals(&rows)
            .iter()
            .filter(|t| t.building == "a")
            .map(|t| t.kwh)
            .sum();
        let summary = building_summary(&rows);
        assert!((daily_sum - summary[0].total_kwh).abs() < 1e-9);
    }

    #[test]
    fn empty_dataset_aggregates_to_empty_outputs() {
        assert!(daily_totals(&[]).is_empty());
        assert!(weekly_totals(&[]).is_empty());
        assert!(building_summary(&[]).is_empty());
    }
}

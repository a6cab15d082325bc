//! Expanding a sparse [GroupedIndex] into one entry per day for charting.

use time::{
    Date,
    util::{days_in_month, days_in_year},
};

use crate::{
    CostRow, GroupedIndex,
    period::{Granularity, month_from_index},
};

/// One entry per day of a period, in date order.
///
/// Days without any costs are empty rows, other days hold one cost per
/// category.
pub type Timeline = Vec<CostRow>;

/// Build the timeline for the year or month starting at `start_time`.
///
/// Returns `None` for weekly periods, which are not charted.
pub fn build_timeline(
    index: &GroupedIndex,
    granularity: Granularity,
    start_time: Date,
) -> Option<Timeline> {
    let year = start_time.year();

    let (months, total_days) = match granularity {
        Granularity::Year => (0..12, days_in_year(year) as usize),
        Granularity::Month => {
            let month = u8::from(start_time.month()) - 1;
            (
                month..month + 1,
                days_in_month(start_time.month(), year) as usize,
            )
        }
        Granularity::Week => return None,
    };

    let mut timeline = Timeline::with_capacity(total_days);

    for month in months {
        let day_count = days_in_month(month_from_index(month), year);

        for day in 1..=day_count {
            let row = index.get(year, month, day).cloned().unwrap_or_default();
            timeline.push(row);
        }
    }

    debug_assert_eq!(timeline.len(), total_days);

    Some(timeline)
}

#[cfg(test)]
mod tests {
    use std::iter::repeat_n;

    use time::{
        Date,
        macros::date,
        util::{days_in_month, days_in_year},
    };

    use crate::{
        Category, CostRecord, CostRow,
        grouping::{CategoryRecords, group_costs_by_date},
        period::{Granularity, resolve_period},
        timeline::build_timeline,
    };

    fn record(date: Date, cost: i64) -> CostRecord {
        CostRecord { date, cost }
    }

    fn sample_records() -> Vec<CategoryRecords> {
        vec![
            CategoryRecords {
                category: Category::Bills,
                records: vec![
                    record(date!(2015 - 01 - 10), 5),
                    record(date!(2016 - 12 - 06), 10),
                    record(date!(2016 - 12 - 20), 11),
                    record(date!(2017 - 01 - 04), 15),
                    record(date!(2017 - 09 - 03), 3),
                ],
            },
            CategoryRecords {
                category: Category::Food,
                records: vec![
                    record(date!(2015 - 01 - 10), 1),
                    record(date!(2015 - 03 - 04), 50),
                    record(date!(2017 - 05 - 30), 17),
                ],
            },
            CategoryRecords {
                category: Category::General,
                records: vec![record(date!(2016 - 04 - 04), 3)],
            },
        ]
    }

    fn empty_days(count: usize) -> impl Iterator<Item = CostRow> {
        repeat_n(Vec::new(), count)
    }

    #[test]
    fn yearly_timeline_has_entry_for_each_day() {
        let index = group_costs_by_date(&sample_records());

        let timeline = build_timeline(&index, Granularity::Year, date!(2016 - 01 - 01)).unwrap();

        let want: Vec<CostRow> = empty_days(31 + 29 + 31 + 3)
            .chain([vec![0, 0, 3]])
            .chain(empty_days(26 + 31 + 30 + 31 + 31 + 30 + 31 + 30 + 5))
            .chain([vec![10, 0, 0]])
            .chain(empty_days(13))
            .chain([vec![11, 0, 0]])
            .chain(empty_days(11))
            .collect();
        assert_eq!(timeline, want);
    }

    #[test]
    fn monthly_timeline_has_entry_for_each_day() {
        let index = group_costs_by_date(&sample_records());

        let timeline = build_timeline(&index, Granularity::Month, date!(2016 - 12 - 01)).unwrap();

        let want: Vec<CostRow> = empty_days(5)
            .chain([vec![10, 0, 0]])
            .chain(empty_days(13))
            .chain([vec![11, 0, 0]])
            .chain(empty_days(11))
            .collect();
        assert_eq!(timeline, want);
    }

    #[test]
    fn monthly_timeline_uses_month_of_start_time() {
        let index = group_costs_by_date(&sample_records());

        let timeline = build_timeline(&index, Granularity::Month, date!(2015 - 03 - 17)).unwrap();

        assert_eq!(timeline.len(), 31);
        assert_eq!(timeline[3], vec![0, 50, 0]);
    }

    #[test]
    fn weekly_timeline_is_none() {
        let index = group_costs_by_date(&sample_records());

        assert_eq!(
            build_timeline(&index, Granularity::Week, date!(2020 - 04 - 20)),
            None
        );
    }

    #[test]
    fn timeline_length_matches_days_in_period() {
        let index = group_costs_by_date(&sample_records());

        for year in [1900, 2000, 2015, 2016, 2017, 2024] {
            let start = date!(2000 - 01 - 01).replace_year(year).unwrap();
            let timeline = build_timeline(&index, Granularity::Year, start).unwrap();
            assert_eq!(timeline.len(), days_in_year(year) as usize);

            for month_offset in 0..12 {
                let period = resolve_period(
                    date!(2000 - 12 - 15).replace_year(year).unwrap(),
                    Granularity::Month,
                    month_offset,
                );
                let timeline =
                    build_timeline(&index, Granularity::Month, period.start_time).unwrap();
                assert_eq!(
                    timeline.len(),
                    days_in_month(period.start_time.month(), year) as usize
                );
            }
        }
    }

    #[test]
    fn timeline_totals_match_record_totals_in_period() {
        let records = sample_records();
        let index = group_costs_by_date(&records);
        let period = resolve_period(date!(2017 - 06 - 01), Granularity::Year, 0);

        let timeline = build_timeline(&index, Granularity::Year, period.start_time).unwrap();

        for (slot, category_records) in records.iter().enumerate() {
            let from_timeline: i64 = timeline
                .iter()
                .filter(|row| !row.is_empty())
                .map(|row| row[slot])
                .sum();
            let from_records: i64 = category_records
                .records
                .iter()
                .filter(|record| {
                    record.date >= period.start_time && record.date <= period.end_time
                })
                .map(|record| record.cost)
                .sum();

            assert_eq!(from_timeline, from_records, "slot {slot}");
        }
    }

    #[test]
    fn building_twice_gives_same_timeline() {
        let index = group_costs_by_date(&sample_records());

        assert_eq!(
            build_timeline(&index, Granularity::Year, date!(2017 - 01 - 01)),
            build_timeline(&index, Granularity::Year, date!(2017 - 01 - 01))
        );
    }
}

//! Period filtering

use chrono::NaiveDate;
use salescope_core::{AnalysisPeriod, LineItem, Sale};

/// Records that carry a default date field
pub trait Dated {
    /// The calendar date used for period filtering
    fn date(&self) -> NaiveDate;
}

impl Dated for Sale {
    fn date(&self) -> NaiveDate {
        self.sale_date()
    }
}

impl Dated for LineItem {
    fn date(&self) -> NaiveDate {
        self.sale_day()
    }
}

/// Keep the records whose date satisfies `start <= date <= end`
///
/// The output borrows the input records and keeps their order. A reversed
/// interval (`start > end`) matches nothing and returns an empty subset.
pub fn filter_by_period<'a, T, I, F>(
    records: I,
    start: NaiveDate,
    end: NaiveDate,
    date_field: F,
) -> Vec<&'a T>
where
    T: 'a + ?Sized,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> NaiveDate,
{
    if start > end {
        return Vec::new();
    }
    records
        .into_iter()
        .filter(|record| {
            let date = date_field(record);
            start <= date && date <= end
        })
        .collect()
}

/// Filter on the record's default date field
pub fn filter_to_period<'a, T, I>(records: I, period: &AnalysisPeriod) -> Vec<&'a T>
where
    T: Dated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    filter_by_period(records, period.start(), period.end(), T::date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, 30, 0)
            .unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn sales() -> Vec<Sale> {
        vec![
            Sale::new(1, 1, at(1, 0), 10.0),
            Sale::new(2, 1, at(3, 23), 20.0),
            Sale::new(3, 1, at(5, 12), 30.0),
            Sale::new(4, 1, at(6, 0), 40.0),
        ]
    }

    #[test]
    fn test_inclusive_bounds_and_order() {
        let sales = sales();
        let kept = filter_by_period(&sales, date(1), date(5), Sale::sale_date);
        let ids: Vec<i64> = kept.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        // Identity is preserved: the subset borrows the originals
        assert!(std::ptr::eq(kept[0], &sales[0]));
    }

    #[test]
    fn test_reversed_interval_is_empty() {
        let sales = sales();
        assert!(filter_by_period(&sales, date(5), date(1), Sale::sale_date).is_empty());
    }

    #[test]
    fn test_custom_date_field() {
        let sales = sales();
        // Filter on the hour-shifted date, which moves sale 2 into the 4th
        let kept = filter_by_period(&sales, date(4), date(4), |s: &Sale| {
            (s.created_at + chrono::Duration::hours(1)).date()
        });
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 2);
    }

    #[test]
    fn test_line_items_use_sale_date() {
        let items = vec![
            LineItem::new(1, 1, "Soda", 1, 5.0, at(2, 10)),
            LineItem::new(2, 1, "Soda", 1, 5.0, at(9, 10)),
        ];
        let period = AnalysisPeriod::new(date(1), date(5)).unwrap();
        let kept = filter_to_period(&items, &period);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].sale_id, 1);
    }
}

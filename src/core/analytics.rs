//! Sales aggregation.
//!
//! Pure functions over slices of sales: revenue summaries, calendar-day grouping,
//! per-product rankings, zero-filled revenue series and month-over-month growth.
//! Calendar days are taken in the business's local time, given as a `FixedOffset`.
//!
//! Two rules are fixed here rather than left to iteration order:
//! - ties in product rankings go to the lowest product id;
//! - monthly growth compares year-qualified months, so January is compared with
//!   December of the previous year.

use crate::{
    core::{product, sale},
    entities::{product as product_entity, sale as sale_entity},
    errors::{Error, Result},
};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Utc};
use sea_orm::DatabaseConnection;
use std::collections::BTreeMap;

/// Number of products shown in the analytics performance ranking.
pub const PERFORMANCE_LIMIT: usize = 7;

/// An inclusive UTC time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First instant in the range
    pub start: DateTime<Utc>,
    /// Last instant in the range
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Whether `at` lies within `[start, end]`.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// The range covering the local days `first..=last` entirely.
    ///
    /// # Errors
    /// Returns `Error::InvalidDate` when either bound falls outside chrono's range.
    pub fn for_days(first: NaiveDate, last: NaiveDate, offset: FixedOffset) -> Result<Self> {
        let start = local_midnight_utc(first, offset)?;
        let next = last
            .succ_opt()
            .ok_or_else(|| invalid_date(format!("day after {last}")))?;
        let end = local_midnight_utc(next, offset)?
            .checked_sub_signed(TimeDelta::nanoseconds(1))
            .ok_or_else(|| invalid_date(format!("end of {last}")))?;
        Ok(Self { start, end })
    }
}

/// Reporting periods offered by the analytics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangePreset {
    /// Sunday through Saturday
    Week,
    /// Calendar month
    Month,
    /// Calendar quarter
    Quarter,
    /// Calendar year
    Year,
}

impl DateRangePreset {
    /// Display label, e.g. "This Month".
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Week => "This Week",
            Self::Month => "This Month",
            Self::Quarter => "This Quarter",
            Self::Year => "This Year",
        }
    }

    /// First and last local day of the period containing `today`.
    ///
    /// # Errors
    /// Returns `Error::InvalidDate` at the edges of chrono's date range.
    pub fn days(self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        match self {
            Self::Week => {
                let back = TimeDelta::days(i64::from(today.weekday().num_days_from_sunday()));
                let first = today
                    .checked_sub_signed(back)
                    .ok_or_else(|| invalid_date(format!("start of week for {today}")))?;
                let last = first
                    .checked_add_signed(TimeDelta::days(6))
                    .ok_or_else(|| invalid_date(format!("end of week for {today}")))?;
                Ok((first, last))
            }
            Self::Month => month_bounds(today.year(), today.month()),
            Self::Quarter => {
                let first_month = (today.month() - 1) / 3 * 3 + 1;
                let (first, _) = month_bounds(today.year(), first_month)?;
                let (_, last) = month_bounds(today.year(), first_month + 2)?;
                Ok((first, last))
            }
            Self::Year => {
                let (first, _) = month_bounds(today.year(), 1)?;
                let (_, last) = month_bounds(today.year(), 12)?;
                Ok((first, last))
            }
        }
    }

    /// The period containing `today` as an inclusive UTC range.
    ///
    /// # Errors
    /// Returns `Error::InvalidDate` at the edges of chrono's date range.
    pub fn range(self, today: NaiveDate, offset: FixedOffset) -> Result<DateRange> {
        let (first, last) = self.days(today)?;
        DateRange::for_days(first, last, offset)
    }
}

/// Revenue totals over a set of sales.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesSummary {
    /// Sum of `total_revenue`
    pub total_revenue: f64,
    /// Number of sales
    pub total_sales_count: usize,
    /// `total_revenue / total_sales_count`, 0 without sales
    pub avg_order_value: f64,
}

/// Revenue and units of one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRevenue {
    /// Product id
    pub product_id: i64,
    /// Summed revenue
    pub revenue: f64,
    /// Summed units
    pub quantity: i64,
}

/// One day cell of the sales calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    /// Local date
    pub date: NaiveDate,
    /// Revenue on that date
    pub revenue: f64,
    /// Number of sales on that date
    pub sales_count: usize,
}

/// A product ranking entry with the product's display name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedRevenue {
    /// Product name, or "Unknown Product" when it no longer exists
    pub name: String,
    /// Grouped figures
    pub revenue: ProductRevenue,
}

/// Everything the analytics view shows for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsReport {
    /// Period that was analysed
    pub preset: DateRangePreset,
    /// The period as a UTC range
    pub range: DateRange,
    /// Totals for the period
    pub summary: SalesSummary,
    /// Best-selling product by revenue
    pub top_product: Option<NamedRevenue>,
    /// Top products by revenue, at most [`PERFORMANCE_LIMIT`]
    pub performance: Vec<NamedRevenue>,
    /// Revenue for every day of the period
    pub daily_series: Vec<(NaiveDate, f64)>,
}

fn invalid_date(message: String) -> Error {
    Error::InvalidDate { message }
}

fn local_midnight_utc(day: NaiveDate, offset: FixedOffset) -> Result<DateTime<Utc>> {
    day.and_time(NaiveTime::default())
        .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
        .map(|local| local.and_utc())
        .ok_or_else(|| invalid_date(format!("midnight of {day} at offset {offset}")))
}

/// First and last day of a calendar month.
///
/// # Errors
/// Returns `Error::InvalidDate` for a month outside 1-12 or outside chrono's range.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| invalid_date(format!("{year}-{month:02}")))?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| invalid_date(format!("end of {year}-{month:02}")))?;
    Ok((first, last))
}

/// The calendar month before `(year, month)`.
#[must_use]
pub const fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Local calendar date of an instant.
#[must_use]
pub fn local_date(at: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    at.with_timezone(&offset).date_naive()
}

/// Sales inside an inclusive range.
#[must_use]
pub fn sales_in_range(sales: &[sale_entity::Model], range: &DateRange) -> Vec<sale_entity::Model> {
    sales
        .iter()
        .filter(|sale| range.contains(sale.date))
        .cloned()
        .collect()
}

/// Revenue, count and average order value.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(sales: &[sale_entity::Model]) -> SalesSummary {
    let total_revenue: f64 = sales.iter().map(|sale| sale.total_revenue).sum();
    let total_sales_count = sales.len();
    let avg_order_value = if total_sales_count > 0 {
        total_revenue / total_sales_count as f64
    } else {
        0.0
    };

    SalesSummary {
        total_revenue,
        total_sales_count,
        avg_order_value,
    }
}

/// Sales whose local date is `day`.
#[must_use]
pub fn sales_on_day(
    sales: &[sale_entity::Model],
    day: NaiveDate,
    offset: FixedOffset,
) -> Vec<sale_entity::Model> {
    sales
        .iter()
        .filter(|sale| local_date(sale.date, offset) == day)
        .cloned()
        .collect()
}

/// Revenue of the sales whose local date is `day`; 0 when there are none.
#[must_use]
pub fn daily_revenue(sales: &[sale_entity::Model], day: NaiveDate, offset: FixedOffset) -> f64 {
    sales
        .iter()
        .filter(|sale| local_date(sale.date, offset) == day)
        .map(|sale| sale.total_revenue)
        .sum()
}

/// One cell per day of a month with that day's revenue and sale count.
///
/// # Errors
/// Returns `Error::InvalidDate` for an invalid month.
pub fn calendar_month(
    sales: &[sale_entity::Model],
    year: i32,
    month: u32,
    offset: FixedOffset,
) -> Result<Vec<CalendarDay>> {
    let (first, last) = month_bounds(year, month)?;

    let mut cells: BTreeMap<NaiveDate, CalendarDay> = first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| {
            (
                date,
                CalendarDay {
                    date,
                    revenue: 0.0,
                    sales_count: 0,
                },
            )
        })
        .collect();

    for sale in sales {
        if let Some(cell) = cells.get_mut(&local_date(sale.date, offset)) {
            cell.revenue += sale.total_revenue;
            cell.sales_count += 1;
        }
    }

    Ok(cells.into_values().collect())
}

/// Revenue and units grouped by product, in product id order.
#[must_use]
pub fn revenue_by_product(sales: &[sale_entity::Model]) -> Vec<ProductRevenue> {
    let mut groups: BTreeMap<i64, ProductRevenue> = BTreeMap::new();
    for sale in sales {
        let entry = groups.entry(sale.product_id).or_insert(ProductRevenue {
            product_id: sale.product_id,
            revenue: 0.0,
            quantity: 0,
        });
        entry.revenue += sale.total_revenue;
        entry.quantity += sale.quantity;
    }
    groups.into_values().collect()
}

/// The product with the highest summed revenue; ties go to the lowest product id.
///
/// Sales are grouped per product before ranking, so several small sales of one
/// product can beat a single large sale of another.
#[must_use]
pub fn top_product_by_revenue(sales: &[sale_entity::Model]) -> Option<ProductRevenue> {
    // Groups arrive in ascending id order; only a strictly larger sum replaces the leader
    revenue_by_product(sales)
        .into_iter()
        .fold(None, |best: Option<ProductRevenue>, candidate| match best {
            Some(leader) if leader.revenue >= candidate.revenue => Some(leader),
            _ => Some(candidate),
        })
}

/// Products ranked by revenue, highest first (ties by lowest id), at most `limit`.
#[must_use]
pub fn product_performance(sales: &[sale_entity::Model], limit: usize) -> Vec<ProductRevenue> {
    let mut ranked = revenue_by_product(sales);
    ranked.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    ranked.truncate(limit);
    ranked
}

/// Revenue for every local day in `first..=last`, days without sales at 0.
#[must_use]
pub fn revenue_series(
    sales: &[sale_entity::Model],
    first: NaiveDate,
    last: NaiveDate,
    offset: FixedOffset,
) -> Vec<(NaiveDate, f64)> {
    let mut series: BTreeMap<NaiveDate, f64> = first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| (date, 0.0))
        .collect();

    for sale in sales {
        if let Some(revenue) = series.get_mut(&local_date(sale.date, offset)) {
            *revenue += sale.total_revenue;
        }
    }

    series.into_iter().collect()
}

/// Percentage change from `previous` to `current`; 0 when `previous` is 0.
#[must_use]
pub fn growth_percent(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Revenue of the sales in a year-qualified calendar month.
#[must_use]
pub fn month_revenue(
    sales: &[sale_entity::Model],
    year: i32,
    month: u32,
    offset: FixedOffset,
) -> f64 {
    sales
        .iter()
        .filter(|sale| {
            let date = local_date(sale.date, offset);
            date.year() == year && date.month() == month
        })
        .map(|sale| sale.total_revenue)
        .sum()
}

/// Growth of the month containing `today` over the month before it.
#[must_use]
pub fn monthly_growth(sales: &[sale_entity::Model], today: NaiveDate, offset: FixedOffset) -> f64 {
    let (year, month) = (today.year(), today.month());
    let (previous_year, previous) = previous_month(year, month);

    growth_percent(
        month_revenue(sales, year, month, offset),
        month_revenue(sales, previous_year, previous, offset),
    )
}

fn name_of(products: &[product_entity::Model], revenue: ProductRevenue) -> NamedRevenue {
    let name = products
        .iter()
        .find(|product| product.id == revenue.product_id)
        .map_or_else(|| "Unknown Product".to_string(), |product| product.name.clone());
    NamedRevenue { name, revenue }
}

/// Builds the analytics view for the period containing `today`.
///
/// # Errors
/// Returns an error if loading sales or products fails or the period cannot be built.
pub async fn analytics_report(
    db: &DatabaseConnection,
    preset: DateRangePreset,
    today: NaiveDate,
    offset: FixedOffset,
) -> Result<AnalyticsReport> {
    let (first, last) = preset.days(today)?;
    let range = DateRange::for_days(first, last, offset)?;

    let all_sales = sale::get_all_sales(db).await?;
    let products = product::get_all_products(db).await?;
    let in_range = sales_in_range(&all_sales, &range);

    Ok(AnalyticsReport {
        preset,
        range,
        summary: summarize(&in_range),
        top_product: top_product_by_revenue(&in_range).map(|top| name_of(&products, top)),
        performance: product_performance(&in_range, PERFORMANCE_LIMIT)
            .into_iter()
            .map(|entry| name_of(&products, entry))
            .collect(),
        daily_series: revenue_series(&in_range, first, last, offset),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use chrono::TimeZone;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn day(year: i32, month: u32, date: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, date).unwrap()
    }

    fn sale_at(id: i64, product_id: i64, revenue: f64, at: DateTime<Utc>) -> sale_entity::Model {
        test_sale_model(id, product_id, 1, revenue, at)
    }

    fn noon(year: i32, month: u32, date: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, date, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_summarize() {
        let sales = vec![
            sale_at(1, 1, 15.0, noon(2024, 3, 1)),
            sale_at(2, 2, 25.0, noon(2024, 3, 2)),
        ];
        let summary = summarize(&sales);
        assert_eq!(summary.total_revenue, 40.0);
        assert_eq!(summary.total_sales_count, 2);
        assert_eq!(summary.avg_order_value, 20.0);

        let empty = summarize(&[]);
        assert_eq!(empty.total_revenue, 0.0);
        assert_eq!(empty.total_sales_count, 0);
        assert_eq!(empty.avg_order_value, 0.0);
    }

    #[test]
    fn test_sales_in_range_is_inclusive() {
        let start = noon(2024, 3, 1);
        let end = noon(2024, 3, 31);
        let sales = vec![
            sale_at(1, 1, 10.0, start),
            sale_at(2, 1, 10.0, end),
            sale_at(3, 1, 10.0, end + TimeDelta::seconds(1)),
            sale_at(4, 1, 10.0, start - TimeDelta::seconds(1)),
        ];

        let ids: Vec<i64> = sales_in_range(&sales, &DateRange { start, end })
            .iter()
            .map(|sale| sale.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_daily_revenue_uses_calendar_day() {
        let sales = vec![
            sale_at(1, 1, 10.0, Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 1).unwrap()),
            sale_at(2, 1, 7.5, Utc.with_ymd_and_hms(2024, 3, 5, 23, 59, 59).unwrap()),
            sale_at(3, 1, 99.0, Utc.with_ymd_and_hms(2024, 3, 6, 0, 0, 0).unwrap()),
        ];

        assert_eq!(daily_revenue(&sales, day(2024, 3, 5), utc()), 17.5);
        assert_eq!(sales_on_day(&sales, day(2024, 3, 5), utc()).len(), 2);
    }

    #[test]
    fn test_daily_revenue_without_sales_is_zero() {
        let sales = vec![sale_at(1, 1, 10.0, noon(2024, 3, 5))];
        assert_eq!(daily_revenue(&sales, day(2024, 3, 6), utc()), 0.0);
        assert_eq!(daily_revenue(&[], day(2024, 3, 6), utc()), 0.0);
    }

    #[test]
    fn test_daily_revenue_respects_offset() {
        // 03:00 UTC on the 6th is still the 5th five hours west of UTC
        let sales = vec![sale_at(1, 1, 12.0, Utc.with_ymd_and_hms(2024, 3, 6, 3, 0, 0).unwrap())];
        let west = FixedOffset::west_opt(5 * 3600).unwrap();

        assert_eq!(daily_revenue(&sales, day(2024, 3, 5), west), 12.0);
        assert_eq!(daily_revenue(&sales, day(2024, 3, 6), west), 0.0);
        assert_eq!(daily_revenue(&sales, day(2024, 3, 6), utc()), 12.0);
    }

    #[test]
    fn test_top_product_groups_before_ranking() {
        let at = noon(2024, 3, 5);
        let sales = vec![
            sale_at(1, 1, 50.0, at),
            sale_at(2, 2, 80.0, at),
            sale_at(3, 1, 40.0, at),
        ];

        let top = top_product_by_revenue(&sales).unwrap();
        assert_eq!(top.product_id, 1);
        assert_eq!(top.revenue, 90.0);
        assert_eq!(top.quantity, 2);
    }

    #[test]
    fn test_top_product_tie_goes_to_lowest_id() {
        let at = noon(2024, 3, 5);
        let sales = vec![
            sale_at(1, 7, 30.0, at),
            sale_at(2, 3, 30.0, at),
            sale_at(3, 5, 10.0, at),
        ];

        assert_eq!(top_product_by_revenue(&sales).unwrap().product_id, 3);
        assert!(top_product_by_revenue(&[]).is_none());
    }

    #[test]
    fn test_product_performance_ranking() {
        let at = noon(2024, 3, 5);
        let sales = vec![
            sale_at(1, 4, 20.0, at),
            sale_at(2, 2, 55.0, at),
            sale_at(3, 3, 20.0, at),
            sale_at(4, 1, 5.0, at),
        ];

        let ranked: Vec<i64> = product_performance(&sales, 3)
            .iter()
            .map(|entry| entry.product_id)
            .collect();
        assert_eq!(ranked, vec![2, 3, 4]);
    }

    #[test]
    fn test_revenue_series_zero_fills() {
        let sales = vec![
            sale_at(1, 1, 10.0, noon(2024, 3, 2)),
            sale_at(2, 1, 5.0, noon(2024, 3, 2)),
            sale_at(3, 1, 8.0, noon(2024, 3, 9)),
        ];

        let series = revenue_series(&sales, day(2024, 3, 1), day(2024, 3, 4), utc());
        assert_eq!(
            series,
            vec![
                (day(2024, 3, 1), 0.0),
                (day(2024, 3, 2), 15.0),
                (day(2024, 3, 3), 0.0),
                (day(2024, 3, 4), 0.0),
            ]
        );
    }

    #[test]
    fn test_calendar_month() {
        let sales = vec![
            sale_at(1, 1, 10.0, noon(2024, 2, 29)),
            sale_at(2, 1, 4.0, noon(2024, 2, 29)),
            sale_at(3, 1, 8.0, noon(2024, 3, 1)),
        ];

        let cells = calendar_month(&sales, 2024, 2, utc()).unwrap();
        assert_eq!(cells.len(), 29);
        assert_eq!(cells[0].date, day(2024, 2, 1));
        let leap_day = cells.last().unwrap();
        assert_eq!(leap_day.date, day(2024, 2, 29));
        assert_eq!(leap_day.revenue, 14.0);
        assert_eq!(leap_day.sales_count, 2);

        assert!(matches!(
            calendar_month(&sales, 2024, 13, utc()),
            Err(Error::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_growth_percent() {
        assert_eq!(growth_percent(150.0, 100.0), 50.0);
        assert_eq!(growth_percent(50.0, 100.0), -50.0);
        assert_eq!(growth_percent(80.0, 0.0), 0.0);
    }

    #[test]
    fn test_monthly_growth_within_year() {
        let sales = vec![
            sale_at(1, 1, 100.0, noon(2024, 5, 10)),
            sale_at(2, 1, 120.0, noon(2024, 6, 3)),
            // Same month a year earlier must not count as "previous month"
            sale_at(3, 1, 500.0, noon(2023, 5, 10)),
        ];

        let growth = monthly_growth(&sales, day(2024, 6, 15), utc());
        assert!((growth - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_growth_across_year_boundary() {
        let sales = vec![
            sale_at(1, 1, 200.0, noon(2023, 12, 20)),
            sale_at(2, 1, 150.0, noon(2024, 1, 5)),
        ];

        let growth = monthly_growth(&sales, day(2024, 1, 20), utc());
        assert!((growth - -25.0).abs() < 1e-9);
    }

    #[test]
    fn test_previous_month() {
        assert_eq!(previous_month(2024, 1), (2023, 12));
        assert_eq!(previous_month(2024, 7), (2024, 6));
    }

    #[test]
    fn test_preset_days() {
        // 2024-03-13 is a Wednesday
        let today = day(2024, 3, 13);

        let days = |preset: DateRangePreset| preset.days(today).unwrap();

        assert_eq!(days(DateRangePreset::Week), (day(2024, 3, 10), day(2024, 3, 16)));
        assert_eq!(days(DateRangePreset::Month), (day(2024, 3, 1), day(2024, 3, 31)));
        assert_eq!(days(DateRangePreset::Quarter), (day(2024, 1, 1), day(2024, 3, 31)));
        assert_eq!(days(DateRangePreset::Year), (day(2024, 1, 1), day(2024, 12, 31)));
        assert_eq!(
            DateRangePreset::Quarter.days(day(2024, 11, 2)).unwrap(),
            (day(2024, 10, 1), day(2024, 12, 31))
        );
        assert_eq!(DateRangePreset::Month.label(), "This Month");
    }

    #[test]
    fn test_preset_range_covers_whole_days() {
        let range = DateRangePreset::Month.range(day(2024, 3, 13), utc()).unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_range_with_offset() {
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let range = DateRange::for_days(day(2024, 3, 1), day(2024, 3, 1), east).unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 2, 29, 22, 0, 0).unwrap());
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 3, 1, 21, 59, 59).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 3, 1, 22, 0, 0).unwrap()));
    }

    #[test]
    fn test_range_at_calendar_limits() {
        let east = FixedOffset::east_opt(3600).unwrap();
        assert!(matches!(
            DateRange::for_days(NaiveDate::MAX, NaiveDate::MAX, utc()),
            Err(Error::InvalidDate { .. })
        ));
        assert!(matches!(
            DateRange::for_days(NaiveDate::MIN, NaiveDate::MIN, east),
            Err(Error::InvalidDate { .. })
        ));
        assert!(matches!(
            DateRangePreset::Year.range(NaiveDate::MAX, utc()),
            Err(Error::InvalidDate { .. })
        ));
    }

    #[tokio::test]
    async fn test_analytics_report_integration() -> Result<()> {
        let (db, smoky) = setup_with_product().await?;
        let lemon = create_custom_product(&db, "Lemon Pepper", 30, 6.0).await?;
        let id = smoky.product.id;

        let in_month = Utc.with_ymd_and_hms(2024, 3, 5, 15, 0, 0).unwrap();
        let out_of_month = Utc.with_ymd_and_hms(2024, 2, 27, 15, 0, 0).unwrap();
        create_dated_sale(&db, id, 2, in_month).await?; // 10.00
        create_dated_sale(&db, lemon.product.id, 3, in_month).await?; // 18.00
        create_dated_sale(&db, id, 5, out_of_month).await?;

        let report = analytics_report(&db, DateRangePreset::Month, day(2024, 3, 20), utc()).await?;

        assert_eq!(report.summary.total_sales_count, 2);
        assert_eq!(report.summary.total_revenue, 28.0);
        assert_eq!(report.summary.avg_order_value, 14.0);
        let top = report.top_product.unwrap();
        assert_eq!(top.name, "Lemon Pepper");
        assert_eq!(report.performance.len(), 2);
        assert_eq!(report.performance[1].name, "Smoky Rub");
        assert_eq!(report.daily_series.len(), 31);
        assert_eq!(report.daily_series[4], (day(2024, 3, 5), 28.0));

        Ok(())
    }
}

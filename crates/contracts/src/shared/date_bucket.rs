//! Calendar bucketing for the sales report.
//!
//! All arithmetic is zone-naive and works on whole calendar days:
//! - `advance` moves an anchor by days, calendar months or calendar years
//! - `range_for_anchor` returns the inclusive `[from, to]` range of the
//!   anchor's bucket (`to` is the exclusive upper bound minus one day)
//! - `bucket_sequence` walks a range one unit at a time and yields bucket keys
//!
//! Month and year steps clamp the day-of-month to the last day of the target
//! month: 2024-01-31 + 1 month = 2024-02-29.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateBucketError {
    #[error("invalid ISO date: {0:?}")]
    InvalidDate(String),
    #[error("unknown granularity: {0:?}")]
    UnknownGranularity(String),
}

/// Bucketing unit of the sales report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Month,
    Year,
}

impl Granularity {
    pub const fn all() -> [Granularity; 3] {
        [Granularity::Day, Granularity::Month, Granularity::Year]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }

    /// Short console label used by the granularity switch
    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Day => "일",
            Granularity::Month => "월",
            Granularity::Year => "년",
        }
    }

    /// Bucket key of `date`: `yyyy-mm-dd`, `yyyy-mm` or `yyyy`
    pub fn bucket_key(&self, date: NaiveDate) -> String {
        match self {
            Granularity::Day => date.format(ISO_DATE_FORMAT).to_string(),
            Granularity::Month => date.format("%Y-%m").to_string(),
            Granularity::Year => date.format("%Y").to_string(),
        }
    }

    /// Number of buckets between `from` and `to` inclusive, without walking them.
    /// Zero for a reversed range.
    pub fn bucket_count(&self, from: NaiveDate, to: NaiveDate) -> u64 {
        if from > to {
            return 0;
        }
        let months = |d: NaiveDate| i64::from(d.year()) * 12 + i64::from(d.month0());
        let steps = match self {
            Granularity::Day => (to - from).num_days(),
            Granularity::Month => months(to) - months(from),
            Granularity::Year => i64::from(to.year() - from.year()),
        };
        steps.unsigned_abs() + 1
    }

    /// Length of the bucket key, which is also the `yyyy-mm-dd` prefix it is cut from
    pub fn key_len(&self) -> usize {
        match self {
            Granularity::Day => 10,
            Granularity::Month => 7,
            Granularity::Year => 4,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = DateBucketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Granularity::Day),
            "month" => Ok(Granularity::Month),
            "year" => Ok(Granularity::Year),
            other => Err(DateBucketError::UnknownGranularity(other.to_string())),
        }
    }
}

/// Inclusive calendar-day range, serialized as `yyyy-mm-dd` strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    pub fn from_iso(&self) -> String {
        self.from.format(ISO_DATE_FORMAT).to_string()
    }

    pub fn to_iso(&self) -> String {
        self.to.format(ISO_DATE_FORMAT).to_string()
    }
}

pub fn parse_iso_date(value: &str) -> Result<NaiveDate, DateBucketError> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT)
        .map_err(|_| DateBucketError::InvalidDate(value.to_string()))
}

fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(if days >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

fn shift_months(date: NaiveDate, months: i64) -> NaiveDate {
    let shifted = match u32::try_from(months.unsigned_abs()) {
        Ok(m) if months >= 0 => date.checked_add_months(Months::new(m)),
        Ok(m) => date.checked_sub_months(Months::new(m)),
        Err(_) => None,
    };
    shifted.unwrap_or(if months >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

/// Move `anchor` by `delta` units of `granularity`.
///
/// Out-of-range results saturate at `NaiveDate::MIN` / `NaiveDate::MAX`.
pub fn advance(anchor: NaiveDate, granularity: Granularity, delta: i32) -> NaiveDate {
    let delta = i64::from(delta);
    match granularity {
        Granularity::Day => shift_days(anchor, delta),
        Granularity::Month => shift_months(anchor, delta),
        Granularity::Year => shift_months(anchor, delta * 12),
    }
}

/// Range covering exactly the bucket that contains `anchor`
pub fn range_for_anchor(anchor: NaiveDate, granularity: Granularity) -> DateRange {
    let from = match granularity {
        Granularity::Day => anchor,
        Granularity::Month => anchor.with_day(1).unwrap_or(anchor),
        Granularity::Year => anchor.with_ordinal(1).unwrap_or(anchor),
    };
    let upper_exclusive = match granularity {
        Granularity::Day => from.succ_opt(),
        Granularity::Month => from.checked_add_months(Months::new(1)),
        Granularity::Year => from.checked_add_months(Months::new(12)),
    };
    let to = upper_exclusive
        .and_then(|upper| upper.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    DateRange { from, to }
}

/// One step of a bucket walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketMarker {
    pub key: String,
    pub position: NaiveDate,
}

/// Lazy walk from `from` to `to` (inclusive), one granularity unit per step.
///
/// Every position is computed from `from` (`from + n units`), so a walk that
/// starts on the 31st keeps landing on month ends instead of drifting.
/// Clone the sequence to iterate it again.
#[derive(Debug, Clone)]
pub struct BucketSequence {
    from: NaiveDate,
    to: NaiveDate,
    granularity: Granularity,
    step: i32,
    last: Option<NaiveDate>,
}

impl BucketSequence {
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn keys(self) -> impl Iterator<Item = String> {
        self.map(|marker| marker.key)
    }
}

impl Iterator for BucketSequence {
    type Item = BucketMarker;

    fn next(&mut self) -> Option<BucketMarker> {
        let position = advance(self.from, self.granularity, self.step);
        if position > self.to {
            return None;
        }
        // saturated at the calendar edge
        if self.last.is_some_and(|last| position <= last) {
            return None;
        }
        self.step = self.step.checked_add(1)?;
        self.last = Some(position);
        Some(BucketMarker {
            key: self.granularity.bucket_key(position),
            position,
        })
    }
}

pub fn bucket_sequence(from: NaiveDate, to: NaiveDate, granularity: Granularity) -> BucketSequence {
    BucketSequence {
        from,
        to,
        granularity,
        step: 0,
        last: None,
    }
}

fn weekday_ko(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "월",
        Weekday::Tue => "화",
        Weekday::Wed => "수",
        Weekday::Thu => "목",
        Weekday::Fri => "금",
        Weekday::Sat => "토",
        Weekday::Sun => "일",
    }
}

/// Header label of the period shown for `anchor`
pub fn period_label(anchor: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => format!(
            "{}년 {}월 {}일 ({})",
            anchor.year(),
            anchor.month(),
            anchor.day(),
            weekday_ko(anchor.weekday())
        ),
        Granularity::Month => format!("{}년 {}월", anchor.year(), anchor.month()),
        Granularity::Year => format!("{}년", anchor.year()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_bucket_count_matches_walk() {
        let cases = [
            (d(2024, 1, 31), d(2024, 3, 1)),
            (d(2023, 12, 15), d(2025, 2, 28)),
            (d(2024, 3, 1), d(2024, 3, 1)),
        ];
        for (from, to) in cases {
            for grain in Granularity::all() {
                let walked = bucket_sequence(from, to, grain).count() as u64;
                assert_eq!(grain.bucket_count(from, to), walked, "{grain} {from}..{to}");
            }
        }
        assert_eq!(Granularity::Day.bucket_count(d(2024, 3, 2), d(2024, 3, 1)), 0);
        assert_eq!(Granularity::Day.bucket_count(d(1, 1, 1), d(9999, 12, 31)), 3_652_059);
    }

    fn sample_dates() -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = bucket_sequence(d(2023, 1, 1), d(2024, 12, 31), Granularity::Day)
            .map(|m| m.position)
            .collect();
        dates.push(NaiveDate::MIN);
        dates.push(NaiveDate::MAX);
        dates
    }

    #[test]
    fn test_range_is_ordered_and_contains_anchor() {
        for date in sample_dates() {
            for g in Granularity::all() {
                let range = range_for_anchor(date, g);
                assert!(range.from <= range.to, "{date} {g}");
                assert!(range.contains(date), "{date} {g}");
            }
        }
    }

    #[test]
    fn test_range_covers_exactly_one_unit() {
        for date in sample_dates().into_iter().take(731) {
            let month = range_for_anchor(date, Granularity::Month);
            assert_eq!(month.from.day(), 1);
            assert_eq!(month.from.month(), date.month());
            assert_eq!(month.to.month(), date.month());
            assert_eq!(month.to.succ_opt().unwrap().day(), 1);

            let year = range_for_anchor(date, Granularity::Year);
            assert_eq!(year.from, d(date.year(), 1, 1));
            assert_eq!(year.to, d(date.year(), 12, 31));

            let day = range_for_anchor(date, Granularity::Day);
            assert_eq!(day.from, date);
            assert_eq!(day.to, date);
        }
    }

    #[test]
    fn test_year_range() {
        let range = range_for_anchor(d(2024, 12, 15), Granularity::Year);
        assert_eq!(range.from, d(2024, 1, 1));
        assert_eq!(range.to, d(2024, 12, 31));
        assert_eq!(range.from_iso(), "2024-01-01");
        assert_eq!(range.to_iso(), "2024-12-31");
    }

    #[test]
    fn test_month_range_leap_february() {
        let range = range_for_anchor(d(2024, 2, 10), Granularity::Month);
        assert_eq!(range.from, d(2024, 2, 1));
        assert_eq!(range.to, d(2024, 2, 29));

        let range = range_for_anchor(d(2023, 2, 10), Granularity::Month);
        assert_eq!(range.to, d(2023, 2, 28));
    }

    #[test]
    fn test_month_rollover_clamps_day() {
        assert_eq!(advance(d(2024, 1, 31), Granularity::Month, 1), d(2024, 2, 29));
        assert_eq!(advance(d(2023, 1, 31), Granularity::Month, 1), d(2023, 2, 28));
        assert_eq!(advance(d(2024, 3, 31), Granularity::Month, -1), d(2024, 2, 29));
        assert_eq!(advance(d(2024, 12, 15), Granularity::Month, 1), d(2025, 1, 15));
        assert_eq!(advance(d(2024, 1, 15), Granularity::Month, -1), d(2023, 12, 15));
    }

    #[test]
    fn test_year_rollover_from_leap_day() {
        assert_eq!(advance(d(2024, 2, 29), Granularity::Year, 1), d(2025, 2, 28));
        assert_eq!(advance(d(2024, 2, 29), Granularity::Year, 4), d(2028, 2, 29));
        assert_eq!(advance(d(2024, 6, 1), Granularity::Year, -1), d(2023, 6, 1));
    }

    #[test]
    fn test_day_advance_crosses_boundaries() {
        assert_eq!(advance(d(2024, 12, 31), Granularity::Day, 1), d(2025, 1, 1));
        assert_eq!(advance(d(2024, 3, 1), Granularity::Day, -1), d(2024, 2, 29));
        assert_eq!(advance(d(2024, 1, 1), Granularity::Day, 366), d(2025, 1, 1));
    }

    #[test]
    fn test_advance_saturates() {
        assert_eq!(advance(NaiveDate::MAX, Granularity::Day, 1), NaiveDate::MAX);
        assert_eq!(advance(NaiveDate::MIN, Granularity::Month, -1), NaiveDate::MIN);
        assert_eq!(advance(d(2024, 1, 1), Granularity::Year, i32::MAX), NaiveDate::MAX);
        assert_eq!(advance(d(2024, 1, 1), Granularity::Year, i32::MIN), NaiveDate::MIN);
    }

    #[test]
    fn test_zero_delta_is_identity() {
        for date in sample_dates() {
            for g in Granularity::all() {
                assert_eq!(advance(date, g, 0), date);
                assert_eq!(range_for_anchor(advance(date, g, 0), g), range_for_anchor(date, g));
            }
        }
    }

    #[test]
    fn test_single_day_sequence() {
        let keys: Vec<String> = bucket_sequence(d(2024, 3, 1), d(2024, 3, 1), Granularity::Day)
            .keys()
            .collect();
        assert_eq!(keys, vec!["2024-03-01"]);
    }

    #[test]
    fn test_month_sequence() {
        let keys: Vec<String> = bucket_sequence(d(2024, 1, 1), d(2024, 3, 1), Granularity::Month)
            .keys()
            .collect();
        assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03"]);
    }

    #[test]
    fn test_month_sequence_from_month_end_does_not_skip() {
        let keys: Vec<String> = bucket_sequence(d(2024, 1, 31), d(2024, 4, 30), Granularity::Month)
            .keys()
            .collect();
        assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03", "2024-04"]);
    }

    #[test]
    fn test_year_and_day_sequences() {
        let years: Vec<String> = bucket_sequence(d(2022, 5, 5), d(2024, 1, 1), Granularity::Year)
            .keys()
            .collect();
        assert_eq!(years, vec!["2022", "2023"]);

        let march = range_for_anchor(d(2024, 3, 9), Granularity::Month);
        let days: Vec<String> = bucket_sequence(march.from, march.to, Granularity::Day)
            .keys()
            .collect();
        assert_eq!(days.len(), 31);
        assert_eq!(days.first().map(String::as_str), Some("2024-03-01"));
        assert_eq!(days.last().map(String::as_str), Some("2024-03-31"));
    }

    #[test]
    fn test_reversed_range_is_empty() {
        for g in Granularity::all() {
            assert_eq!(bucket_sequence(d(2024, 3, 2), d(2024, 3, 1), g).count(), 0);
        }
    }

    #[test]
    fn test_sequence_is_restartable() {
        let seq = bucket_sequence(d(2024, 1, 1), d(2024, 1, 3), Granularity::Day);
        let first: Vec<BucketMarker> = seq.clone().collect();
        let second: Vec<BucketMarker> = seq.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_sequence_stops_at_calendar_edge() {
        let start = NaiveDate::MAX.pred_opt().unwrap();
        assert_eq!(bucket_sequence(start, NaiveDate::MAX, Granularity::Day).count(), 2);
        assert_eq!(bucket_sequence(NaiveDate::MAX, NaiveDate::MAX, Granularity::Year).count(), 1);
    }

    #[test]
    fn test_granularity_parsing_and_serde() {
        assert_eq!("month".parse::<Granularity>(), Ok(Granularity::Month));
        assert!("week".parse::<Granularity>().is_err());
        assert_eq!(serde_json::to_string(&Granularity::Year).unwrap(), "\"year\"");
        assert!(serde_json::from_str::<Granularity>("\"Week\"").is_err());
    }

    #[test]
    fn test_date_range_serializes_iso() {
        let range = range_for_anchor(d(2024, 2, 10), Granularity::Month);
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, r#"{"from":"2024-02-01","to":"2024-02-29"}"#);
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2024-03-01"), Ok(d(2024, 3, 1)));
        assert_eq!(parse_iso_date(" 2024-03-01 "), Ok(d(2024, 3, 1)));
        assert!(parse_iso_date("2024-02-30").is_err());
        assert!(parse_iso_date("03/01/2024").is_err());
    }

    #[test]
    fn test_period_label() {
        assert_eq!(period_label(d(2024, 3, 5), Granularity::Day), "2024년 3월 5일 (화)");
        assert_eq!(period_label(d(2024, 3, 5), Granularity::Month), "2024년 3월");
        assert_eq!(period_label(d(2024, 3, 5), Granularity::Year), "2024년");
    }
}

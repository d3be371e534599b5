//! Period resolution: budget periods, date presets and explicit ranges, all
//! expressed as inclusive day-granularity [`PeriodRange`]s.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::budget::BudgetPeriod;
use crate::errors::LedgerError;

/// Parses a ledger date, stripping any time-of-day component.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM[:SS]`
/// forms. Returns `None` for anything else so callers can exclude the record.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|stamp| stamp.date())
}

/// Inclusive `[start, end]` interval of calendar days.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PeriodRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodRange {
    /// Builds a range, swapping the endpoints when given in reverse.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// Explicit user-picked range; a missing end selects a single day.
    pub fn custom(from: NaiveDate, to: Option<NaiveDate>) -> Self {
        Self::new(from, to.unwrap_or(from))
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// The current occurrence of a budget period around `today`.
    pub fn for_budget_period(period: BudgetPeriod, today: NaiveDate) -> Self {
        match period {
            BudgetPeriod::Weekly => Self::week_of(today),
            BudgetPeriod::Monthly => Self::month_of(today),
            BudgetPeriod::Yearly => Self::year_of(today),
        }
    }

    /// Monday-start week containing `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
        Self::new(start, start + Duration::days(6))
    }

    pub fn month_of(date: NaiveDate) -> Self {
        let start = month_start(date);
        let end = start
            .with_day(days_in_month(start.year(), start.month()))
            .unwrap_or(start);
        Self::new(start, end)
    }

    /// Calendar month by number; `None` when `month` is outside 1..=12.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self::month_of)
    }

    pub fn quarter_of(date: NaiveDate) -> Self {
        let first_month = (date.month0() / 3) * 3 + 1;
        let start = date
            .with_day(1)
            .and_then(|d| d.with_month(first_month))
            .unwrap_or(date);
        let end = Self::month_of(shift_month(start, 2)).end;
        Self::new(start, end)
    }

    pub fn year_of(date: NaiveDate) -> Self {
        let year = date.year();
        match (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) {
            (Some(start), Some(end)) => Self::new(start, end),
            _ => Self::single_day(date),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Membership test for a raw ledger date; unparseable dates are outside.
    pub fn contains_str(&self, raw: &str) -> bool {
        parse_iso_date(raw).is_some_and(|date| self.contains(date))
    }

    /// Number of calendar days covered, both endpoints included.
    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Days from `start` through `today` inclusive, clamped to the range.
    pub fn days_elapsed(&self, today: NaiveDate) -> i64 {
        if today < self.start {
            return 0;
        }
        let last = today.min(self.end);
        (last - self.start).num_days() + 1
    }

    /// Share of the period that has passed by `today`, in `[0, 1]`.
    pub fn elapsed_ratio(&self, today: NaiveDate) -> f64 {
        let total = self.total_days();
        if total <= 0 {
            return 0.0;
        }
        (self.days_elapsed(today) as f64 / total as f64).clamp(0.0, 1.0)
    }
}

impl fmt::Display for PeriodRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} – {}", self.start, self.end)
        }
    }
}

/// Named date filters offered next to the custom range picker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum DatePreset {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    Last7Days,
    ThisMonth,
    ThisQuarter,
    ThisYear,
}

impl DatePreset {
    pub const ALL: [DatePreset; 8] = [
        DatePreset::Today,
        DatePreset::Yesterday,
        DatePreset::ThisWeek,
        DatePreset::LastWeek,
        DatePreset::Last7Days,
        DatePreset::ThisMonth,
        DatePreset::ThisQuarter,
        DatePreset::ThisYear,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DatePreset::Today => "today",
            DatePreset::Yesterday => "yesterday",
            DatePreset::ThisWeek => "thisWeek",
            DatePreset::LastWeek => "lastWeek",
            DatePreset::Last7Days => "last7Days",
            DatePreset::ThisMonth => "thisMonth",
            DatePreset::ThisQuarter => "thisQuarter",
            DatePreset::ThisYear => "thisYear",
        }
    }

    /// Resolves the preset to a concrete range anchored at `today`.
    pub fn resolve(self, today: NaiveDate) -> PeriodRange {
        match self {
            DatePreset::Today => PeriodRange::single_day(today),
            DatePreset::Yesterday => PeriodRange::single_day(today - Duration::days(1)),
            DatePreset::ThisWeek => PeriodRange::week_of(today),
            DatePreset::LastWeek => PeriodRange::week_of(today - Duration::days(7)),
            DatePreset::Last7Days => PeriodRange::new(today - Duration::days(6), today),
            DatePreset::ThisMonth => PeriodRange::month_of(today),
            DatePreset::ThisQuarter => PeriodRange::quarter_of(today),
            DatePreset::ThisYear => PeriodRange::year_of(today),
        }
    }
}

impl fmt::Display for DatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatePreset {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        DatePreset::ALL
            .into_iter()
            .find(|preset| normalize_name(preset.name()) == wanted)
            .ok_or_else(|| LedgerError::validation(format!("unknown date preset `{}`", s.trim())))
    }
}

fn normalize_name(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|ch| !matches!(ch, '-' | '_' | ' '))
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Moves `date` by whole months, clamping the day to the target month's length.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|first_next| (first_next - Duration::days(1)).day())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekly_period_starts_on_monday() {
        // 2026-10-18 is a Sunday.
        let range = PeriodRange::for_budget_period(BudgetPeriod::Weekly, date(2026, 10, 18));
        assert_eq!(range.start, date(2026, 10, 12));
        assert_eq!(range.end, date(2026, 10, 18));
        assert_eq!(range.total_days(), 7);
    }

    #[test]
    fn monthly_and_yearly_periods_cover_calendar_units() {
        let month = PeriodRange::for_budget_period(BudgetPeriod::Monthly, date(2024, 2, 10));
        assert_eq!(month, PeriodRange::new(date(2024, 2, 1), date(2024, 2, 29)));
        let year = PeriodRange::for_budget_period(BudgetPeriod::Yearly, date(2024, 2, 10));
        assert_eq!(year, PeriodRange::new(date(2024, 1, 1), date(2024, 12, 31)));
    }

    #[test]
    fn membership_is_inclusive_and_ignores_time_of_day() {
        let range = PeriodRange::month_of(date(2026, 10, 5));
        assert!(range.contains_str("2026-10-01"));
        assert!(range.contains_str("2026-10-31T23:59:59"));
        assert!(range.contains_str("2026-10-31T23:30:00-05:00"));
        assert!(!range.contains_str("2026-11-01"));
        assert!(!range.contains_str("not a date"));
        assert!(!range.contains_str(""));
    }

    #[test]
    fn last_seven_days_includes_today() {
        let today = date(2026, 10, 18);
        let range = DatePreset::Last7Days.resolve(today);
        assert_eq!(range.start, date(2026, 10, 12));
        assert_eq!(range.end, today);
        assert_eq!(range.total_days(), 7);
    }

    #[test]
    fn presets_resolve_relative_to_today() {
        let today = date(2026, 10, 18);
        assert_eq!(
            DatePreset::Yesterday.resolve(today),
            PeriodRange::single_day(date(2026, 10, 17))
        );
        assert_eq!(
            DatePreset::LastWeek.resolve(today),
            PeriodRange::new(date(2026, 10, 5), date(2026, 10, 11))
        );
        assert_eq!(
            DatePreset::ThisQuarter.resolve(today),
            PeriodRange::new(date(2026, 10, 1), date(2026, 12, 31))
        );
        assert_eq!(
            DatePreset::ThisQuarter.resolve(date(2026, 5, 20)),
            PeriodRange::new(date(2026, 4, 1), date(2026, 6, 30))
        );
    }

    #[test]
    fn preset_names_parse_in_several_spellings() {
        assert_eq!("last7Days".parse::<DatePreset>().unwrap(), DatePreset::Last7Days);
        assert_eq!("this-month".parse::<DatePreset>().unwrap(), DatePreset::ThisMonth);
        assert_eq!("THIS_YEAR".parse::<DatePreset>().unwrap(), DatePreset::ThisYear);
        assert!("fortnight".parse::<DatePreset>().is_err());
    }

    #[test]
    fn elapsed_ratio_is_clamped() {
        let range = PeriodRange::new(date(2026, 9, 1), date(2026, 9, 30));
        assert_eq!(range.days_elapsed(date(2026, 9, 10)), 10);
        assert!((range.elapsed_ratio(date(2026, 9, 10)) - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(range.elapsed_ratio(date(2026, 8, 1)), 0.0);
        assert_eq!(range.elapsed_ratio(date(2026, 12, 1)), 1.0);
    }

    #[test]
    fn custom_range_defaults_and_swaps() {
        let single = PeriodRange::custom(date(2026, 1, 5), None);
        assert_eq!(single.total_days(), 1);
        let swapped = PeriodRange::custom(date(2026, 1, 5), Some(date(2026, 1, 1)));
        assert_eq!(swapped.start, date(2026, 1, 1));
    }

    #[test]
    fn shift_month_clamps_day_and_crosses_years() {
        assert_eq!(shift_month(date(2026, 3, 31), -1), date(2026, 2, 28));
        assert_eq!(shift_month(date(2026, 1, 15), -5), date(2025, 8, 15));
        assert_eq!(shift_month(date(2026, 11, 30), 3), date(2027, 2, 28));
    }
}

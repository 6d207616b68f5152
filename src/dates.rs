use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

/// Inclusive calendar-date range used to scope list and dashboard queries.
/// `start <= end` always holds; edits through [`DateRange::with_start`] and
/// [`DateRange::with_end`] snap the other bound instead of inverting.
#[derive(Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum RangePreset {
    Today,
    ThisWeek,
    ThisMonth,
    LastMonth,
    ThisYear,
}

impl DateRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        if start_date > end_date {
            Self {
                start_date: end_date,
                end_date,
            }
        } else {
            Self {
                start_date,
                end_date,
            }
        }
    }

    /// First of the current month through today. Default dashboard range.
    pub fn current_month(today: NaiveDate) -> Self {
        let first = first_of_month(today);
        Self::new(first, today)
    }

    /// Move the start date. If it lands past the end date, the end date
    /// snaps forward to match.
    pub fn with_start(self, start_date: NaiveDate) -> Self {
        if start_date > self.end_date {
            Self {
                start_date,
                end_date: start_date,
            }
        } else {
            Self { start_date, ..self }
        }
    }

    /// Move the end date. If it lands before the start date, the start date
    /// snaps back to match.
    pub fn with_end(self, end_date: NaiveDate) -> Self {
        if end_date < self.start_date {
            Self {
                start_date: end_date,
                end_date,
            }
        } else {
            Self { end_date, ..self }
        }
    }

    /// Quick-select ranges, computed from `today` at selection time.
    pub fn preset(preset: RangePreset, today: NaiveDate) -> Self {
        match preset {
            RangePreset::Today => Self::new(today, today),
            RangePreset::ThisWeek => {
                // Week starts on Sunday, matching the picker this replaces.
                let back = today.weekday().num_days_from_sunday() as i64;
                Self::new(today - Duration::days(back), today)
            }
            RangePreset::ThisMonth => Self::current_month(today),
            RangePreset::LastMonth => {
                let this_first = first_of_month(today);
                let last_end = this_first - Duration::days(1);
                Self::new(first_of_month(last_end), last_end)
            }
            RangePreset::ThisYear => {
                let jan_first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                Self::new(jan_first, today)
            }
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_input_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn start_moved_past_end_snaps_end_forward() {
        let range = DateRange::new(d(2025, 1, 1), d(2025, 1, 15));
        let moved = range.with_start(d(2025, 2, 1));
        assert_eq!(moved.start_date, d(2025, 2, 1));
        assert_eq!(moved.end_date, d(2025, 2, 1));
    }

    #[test]
    fn end_moved_before_start_snaps_start_back() {
        // Start Jan 1, user picks Dec 25 of the previous year as the end.
        let range = DateRange::new(d(2025, 1, 1), d(2025, 1, 31));
        let moved = range.with_end(d(2024, 12, 25));
        assert_eq!(moved.start_date, d(2024, 12, 25));
        assert_eq!(moved.end_date, d(2024, 12, 25));
    }

    #[test]
    fn ordinary_edits_keep_both_bounds() {
        let range = DateRange::new(d(2025, 3, 1), d(2025, 3, 31));
        let moved = range.with_start(d(2025, 3, 10)).with_end(d(2025, 3, 20));
        assert_eq!(moved.start_date, d(2025, 3, 10));
        assert_eq!(moved.end_date, d(2025, 3, 20));
    }

    #[test]
    fn constructor_never_inverts() {
        let range = DateRange::new(d(2025, 5, 20), d(2025, 5, 1));
        assert!(range.start_date <= range.end_date);
    }

    #[test]
    fn preset_this_month() {
        let range = DateRange::preset(RangePreset::ThisMonth, d(2025, 6, 18));
        assert_eq!(range.start_date, d(2025, 6, 1));
        assert_eq!(range.end_date, d(2025, 6, 18));
    }

    #[test]
    fn preset_this_week_starts_sunday() {
        // 2025-06-18 is a Wednesday; the preceding Sunday is 2025-06-15.
        let range = DateRange::preset(RangePreset::ThisWeek, d(2025, 6, 18));
        assert_eq!(range.start_date, d(2025, 6, 15));
        assert_eq!(range.end_date, d(2025, 6, 18));
    }

    #[test]
    fn preset_last_month_spans_whole_month() {
        let range = DateRange::preset(RangePreset::LastMonth, d(2025, 3, 12));
        assert_eq!(range.start_date, d(2025, 2, 1));
        assert_eq!(range.end_date, d(2025, 2, 28));
    }

    #[test]
    fn preset_last_month_across_year_boundary() {
        let range = DateRange::preset(RangePreset::LastMonth, d(2025, 1, 5));
        assert_eq!(range.start_date, d(2024, 12, 1));
        assert_eq!(range.end_date, d(2024, 12, 31));
    }

    #[test]
    fn preset_this_year() {
        let range = DateRange::preset(RangePreset::ThisYear, d(2025, 8, 27));
        assert_eq!(range.start_date, d(2025, 1, 1));
        assert_eq!(range.end_date, d(2025, 8, 27));
    }

    #[test]
    fn serializes_iso_dates_with_camel_case_keys() {
        let range = DateRange::new(d(2025, 1, 1), d(2025, 1, 31));
        let json = serde_json::to_value(&range).unwrap();
        assert_eq!(json["startDate"], "2025-01-01");
        assert_eq!(json["endDate"], "2025-01-31");
    }
}

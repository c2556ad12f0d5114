// src/detail.rs
use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};
use std::str::FromStr;
use tracing::{info, warn};

use crate::error::{Result, TimecardError};
use crate::hours::parse_hours;
use crate::input::AttendanceRow;

/// Reported as the starting week when there is no attendance data at all.
pub const NO_DATA_START_WEEK: u32 = 52;

/// Rendered in place of a period boundary when there is no attendance data.
pub const NO_DATE: &str = "NONE";

const DATE_FORMAT: &str = "%Y-%m-%d";

// --- Week Numbering ---

/// How attendance dates map to week numbers.
///
/// The payroll system starts its work week on Sunday, one day ahead of the ISO
/// Monday, and labels weeks one higher than the ISO number of the shifted date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum WeekNumbering {
    /// ISO week of `date + 1 day`, plus one. Weeks run Sunday to Saturday.
    #[default]
    Payroll,
    /// Plain ISO week. Weeks run Monday to Sunday.
    Iso,
}

impl WeekNumbering {
    pub fn week_of(self, date: NaiveDate) -> u32 {
        match self {
            WeekNumbering::Payroll => (date + Duration::days(1)).iso_week().week() + 1,
            WeekNumbering::Iso => date.iso_week().week(),
        }
    }

    /// First and last calendar day of the work week containing `date`.
    pub fn week_bounds(self, date: NaiveDate) -> (NaiveDate, NaiveDate) {
        let offset = match self {
            WeekNumbering::Payroll => date.weekday().num_days_from_sunday(),
            WeekNumbering::Iso => date.weekday().num_days_from_monday(),
        };
        let start = date - Duration::days(offset as i64);
        (start, start + Duration::days(6))
    }
}

impl FromStr for WeekNumbering {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "payroll" => Ok(WeekNumbering::Payroll),
            "iso" => Ok(WeekNumbering::Iso),
            other => Err(format!(
                "unknown week numbering '{other}' (expected 'payroll' or 'iso')"
            )),
        }
    }
}

impl<'de> Deserialize<'de> for WeekNumbering {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

// --- Records ---

#[derive(Debug, Clone, PartialEq)]
pub struct DetailRecord {
    pub employee_id: String,
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub week: u32,
    /// First day of the work week holding `date`.
    pub week_start: NaiveDate,
    pub regular: Decimal,
    pub overtime: Decimal,
}

impl DetailRecord {
    /// Hours the attendance row carries. The export has no leave columns, so
    /// this is regular plus overtime.
    pub fn total(&self) -> Decimal {
        self.regular + self.overtime
    }
}

/// Date and week boundaries of the reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodBounds {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_week: u32,
    /// First day of the earliest work week.
    pub first_week_start: Option<NaiveDate>,
}

impl PeriodBounds {
    pub fn start_label(&self) -> String {
        date_label(self.start_date)
    }

    pub fn end_label(&self) -> String {
        date_label(self.end_date)
    }

    /// `<start>_to_<end>`, used to name output files.
    pub fn file_stem(&self) -> String {
        format!("{}_to_{}", self.start_label(), self.end_label())
    }

    /// Week offset of a record from the first week of the period. Counted
    /// between week start dates so a period spanning New Year stays ordered.
    pub fn relative_week(&self, record: &DetailRecord) -> i64 {
        match self.first_week_start {
            Some(first) => (record.week_start - first).num_weeks(),
            None => record.week as i64 - self.start_week as i64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
    }
}

fn date_label(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| NO_DATE.to_string())
}

/// Accumulates period boundaries over a single normalization pass.
#[derive(Debug, Default)]
struct PeriodTracker {
    start_week: Option<u32>,
    first_week_start: Option<NaiveDate>,
    earliest: Option<NaiveDate>,
    latest: Option<NaiveDate>,
}

impl PeriodTracker {
    fn observe(&mut self, date: NaiveDate, week: u32, week_start: NaiveDate) {
        self.start_week = Some(self.start_week.map_or(week, |w| w.min(week)));
        self.first_week_start = Some(
            self.first_week_start
                .map_or(week_start, |d| d.min(week_start)),
        );
        if self.earliest.map_or(true, |d| date < d) {
            self.earliest = Some(date);
        }
        if self.latest.map_or(true, |d| date > d) {
            self.latest = Some(date);
        }
    }

    fn finish(self) -> PeriodBounds {
        PeriodBounds {
            start_date: self.earliest,
            end_date: self.latest,
            start_week: self.start_week.unwrap_or(NO_DATA_START_WEEK),
            first_week_start: self.first_week_start,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedDetail {
    pub records: Vec<DetailRecord>,
    pub period: PeriodBounds,
    pub numbering: WeekNumbering,
}

// --- Normalization ---

/// Parses `YYYY-MM-DD`, ignoring a trailing time component.
pub fn parse_date(raw: &str, row: usize) -> Result<NaiveDate> {
    let malformed = || TimecardError::MalformedDate {
        row,
        value: raw.to_string(),
    };
    let day_part = raw.split_whitespace().next().ok_or_else(malformed)?;
    NaiveDate::parse_from_str(day_part, DATE_FORMAT).map_err(|_| malformed())
}

/// Converts attendance rows into detail records and derives the period
/// boundaries in the same pass. Row numbers in errors are 1-based.
pub fn normalize(rows: &[AttendanceRow], numbering: WeekNumbering) -> Result<NormalizedDetail> {
    let mut tracker = PeriodTracker::default();
    let mut records = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        let row_num = idx + 1;
        let date = parse_date(&row.date, row_num)?;
        let week = numbering.week_of(date);
        let (week_start, _) = numbering.week_bounds(date);
        tracker.observe(date, week, week_start);

        records.push(DetailRecord {
            employee_id: row.employee_number.trim().to_string(),
            date,
            year: date.year(),
            month: date.month(),
            day: date.day(),
            week,
            week_start,
            regular: parse_hours(row.reg_hours.as_deref(), row_num, "Reg Hours")?,
            overtime: parse_hours(row.ot_hours.as_deref(), row_num, "OT Hours")?,
        });
    }

    let period = tracker.finish();
    if period.is_empty() {
        warn!("No attendance rows found; period boundaries are unknown");
    } else {
        info!(
            "Normalized {} attendance rows: {} - {} (start week {})",
            records.len(),
            period.start_label(),
            period.end_label(),
            period.start_week
        );
    }

    Ok(NormalizedDetail {
        records,
        period,
        numbering,
    })
}

#[cfg(test)]
pub(crate) fn attendance_row(id: &str, date: &str, reg: &str, ot: &str) -> AttendanceRow {
    let cell = |v: &str| (!v.is_empty()).then(|| v.to_string());
    AttendanceRow {
        employee_number: id.to_string(),
        date: date.to_string(),
        reg_hours: cell(reg),
        ot_hours: cell(ot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| panic!("Invalid date string format: {}", date_str))
    }

    #[test]
    fn payroll_weeks_start_on_sunday() {
        let numbering = WeekNumbering::Payroll;
        // 2025-06-07 is a Saturday, 2025-06-08 the following Sunday.
        let saturday = numbering.week_of(d("2025-06-07"));
        let sunday = numbering.week_of(d("2025-06-08"));
        let next_saturday = numbering.week_of(d("2025-06-14"));
        assert_eq!(sunday, saturday + 1);
        assert_eq!(sunday, next_saturday);
        // ISO week 24 is 2025-06-09..15; shifted Sunday lands in it, then +1.
        assert_eq!(sunday, 25);
    }

    #[test]
    fn numbering_parses_from_config_text() {
        assert_eq!("payroll".parse::<WeekNumbering>(), Ok(WeekNumbering::Payroll));
        assert_eq!(" ISO ".parse::<WeekNumbering>(), Ok(WeekNumbering::Iso));
        assert!("fiscal".parse::<WeekNumbering>().is_err());
    }

    #[test]
    fn iso_weeks_start_on_monday() {
        let numbering = WeekNumbering::Iso;
        assert_eq!(numbering.week_of(d("2025-06-08")), 23);
        assert_eq!(numbering.week_of(d("2025-06-09")), 24);
    }

    #[test]
    fn week_bounds_follow_numbering() {
        assert_eq!(
            WeekNumbering::Payroll.week_bounds(d("2025-06-11")),
            (d("2025-06-08"), d("2025-06-14"))
        );
        assert_eq!(
            WeekNumbering::Payroll.week_bounds(d("2025-06-08")),
            (d("2025-06-08"), d("2025-06-14"))
        );
        assert_eq!(
            WeekNumbering::Iso.week_bounds(d("2025-06-08")),
            (d("2025-06-02"), d("2025-06-08"))
        );
    }

    #[test]
    fn date_with_time_component_is_accepted() {
        assert_eq!(parse_date("2025-06-02 00:00:00", 1).unwrap(), d("2025-06-02"));
        assert_eq!(parse_date("2025-06-02", 1).unwrap(), d("2025-06-02"));
    }

    #[test]
    fn malformed_date_is_fatal_with_row_context() {
        let rows = vec![
            attendance_row("E1", "2025-06-02", "8", ""),
            attendance_row("E1", "06/03/2025", "8", ""),
        ];
        match normalize(&rows, WeekNumbering::Payroll) {
            Err(TimecardError::MalformedDate { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "06/03/2025");
            }
            other => panic!("Expected MalformedDate, got {other:?}"),
        }
    }

    #[test]
    fn malformed_hours_are_fatal() {
        let rows = vec![attendance_row("E1", "2025-06-02", "8", "lots")];
        assert!(matches!(
            normalize(&rows, WeekNumbering::Payroll),
            Err(TimecardError::MalformedNumeric { row: 1, .. })
        ));
    }

    #[test]
    fn period_bounds_cover_every_record() {
        let rows = vec![
            attendance_row("E1", "2025-06-10", "8", ""),
            attendance_row("E2", "2025-06-03", "7.5", "1"),
            attendance_row("E1", "2025-06-13 17:00:00", "", "2"),
            attendance_row("E2", "2025-06-08", "4", ""),
        ];
        let detail = normalize(&rows, WeekNumbering::Payroll).unwrap();
        let period = detail.period;
        assert_eq!(period.start_date, Some(d("2025-06-03")));
        assert_eq!(period.end_date, Some(d("2025-06-13")));
        for record in &detail.records {
            assert!(period.start_date.unwrap() <= record.date);
            assert!(record.date <= period.end_date.unwrap());
        }
        assert_eq!(period.start_week, WeekNumbering::Payroll.week_of(d("2025-06-03")));
        assert_eq!(period.file_stem(), "2025-06-03_to_2025-06-13");
    }

    #[test]
    fn blank_hours_are_zero_and_components_are_split() {
        let rows = vec![attendance_row("E1", "2025-06-13", "", "2")];
        let detail = normalize(&rows, WeekNumbering::Iso).unwrap();
        let record = &detail.records[0];
        assert_eq!(record.regular, Decimal::ZERO);
        assert_eq!(record.overtime, dec!(2));
        assert_eq!(record.total(), dec!(2));
        assert_eq!((record.year, record.month, record.day), (2025, 6, 13));
    }

    #[test]
    fn consecutive_days_share_relative_week_zero() {
        let rows = vec![
            attendance_row("E1", "2025-06-02", "8", ""),
            attendance_row("E1", "2025-06-03", "8", ""),
        ];
        let detail = normalize(&rows, WeekNumbering::Payroll).unwrap();
        for record in &detail.records {
            assert_eq!(detail.period.relative_week(record), 0);
        }
    }

    #[test]
    fn period_across_new_year_keeps_weeks_in_order() {
        let rows = vec![
            attendance_row("E1", "2025-12-23", "8", ""),
            attendance_row("E1", "2025-12-30", "8", ""),
            attendance_row("E1", "2026-01-06", "8", ""),
        ];
        let detail = normalize(&rows, WeekNumbering::Payroll).unwrap();
        let weeks: Vec<i64> = detail
            .records
            .iter()
            .map(|r| detail.period.relative_week(r))
            .collect();
        assert_eq!(weeks, vec![0, 1, 2]);
        assert_eq!(detail.period.first_week_start, Some(d("2025-12-21")));
    }

    #[test]
    fn empty_input_yields_sentinels() {
        let detail = normalize(&[], WeekNumbering::Payroll).unwrap();
        assert!(detail.records.is_empty());
        assert!(detail.period.is_empty());
        assert_eq!(detail.period.start_label(), NO_DATE);
        assert_eq!(detail.period.end_label(), NO_DATE);
        assert_eq!(detail.period.start_week, NO_DATA_START_WEEK);
        assert_eq!(detail.period.first_week_start, None);
        assert_eq!(detail.period.file_stem(), "NONE_to_NONE");
    }
}

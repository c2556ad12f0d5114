// src/lib.rs
//! Payroll timecard reporting: reads the approved-hours, payroll directory and
//! summary-hours exports for one period and produces summary and per-week
//! detail reports as CSV and HTML.

pub mod config;
pub mod detail;
pub mod directory;
pub mod error;
pub mod hours;
pub mod input;
pub mod output;
pub mod render;
pub mod report;
pub mod summary;


use tracing::info;

pub use config::{Cli, Config};
pub use detail::{normalize, DetailRecord, NormalizedDetail, PeriodBounds, WeekNumbering};
pub use directory::{EmployeeDirectory, EmployeeRecord, MISSING};
pub use error::{Result, TimecardError};
pub use output::ReportPaths;
pub use report::{ReportBuilder, Reports};
pub use summary::{aggregate, Category, SummaryLedger, SummaryRecord, Totals};

use input::{AttendanceRow, DirectoryRow, SummaryRow};

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub attendance_rows: usize,
    pub period: PeriodBounds,
    pub totals: Totals,
    pub paths: ReportPaths,
}

/// Loads the inputs named by `config`, builds every report and writes them.
/// Nothing is written unless all inputs parse.
pub fn run(config: &Config) -> Result<RunSummary> {
    let attendance: Vec<AttendanceRow> = input::read_csv_file(&config.detail_path())?;
    let directory_rows: Vec<DirectoryRow> = input::read_csv_file(&config.directory_path())?;
    let summary_rows: Vec<SummaryRow> = input::read_csv_file(&config.summary_path())?;

    let directory = EmployeeDirectory::build(directory_rows);
    let detail = normalize(&attendance, config.week_numbering)?;
    let ledger = aggregate(summary_rows);
    info!("Found {} Timecard Records", attendance.len());

    let reports = ReportBuilder::new(&directory, &ledger, &detail).build()?;
    let paths = output::write_reports(&config.output_dir, &detail.period, &reports)?;

    Ok(RunSummary {
        attendance_rows: attendance.len(),
        period: detail.period,
        totals: ledger.totals().clone(),
        paths,
    })
}

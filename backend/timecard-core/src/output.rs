// src/output.rs
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::detail::PeriodBounds;
use crate::error::Result;
use crate::report::Reports;

/// Destination paths for one period's reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub summary_csv: PathBuf,
    pub detail_csv: PathBuf,
    pub html: PathBuf,
}

impl ReportPaths {
    pub fn for_period(output_dir: &Path, period: &PeriodBounds) -> Self {
        let stem = period.file_stem();
        Self {
            summary_csv: output_dir.join(format!("summary_hours_{stem}.csv")),
            detail_csv: output_dir.join(format!("detail_hours_{stem}.csv")),
            html: output_dir.join(format!("timecard_report_{stem}.html")),
        }
    }
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    fs::write(path, data)?;
    info!("Wrote file: {}", path.display());
    Ok(())
}

/// Writes all three artifacts, creating the output directory if needed.
pub fn write_reports(output_dir: &Path, period: &PeriodBounds, reports: &Reports) -> Result<ReportPaths> {
    fs::create_dir_all(output_dir)?;
    let paths = ReportPaths::for_period(output_dir, period);
    write_file(&paths.summary_csv, &reports.summary_csv)?;
    write_file(&paths.detail_csv, &reports.detail_csv)?;
    write_file(&paths.html, &reports.html)?;
    Ok(paths)
}

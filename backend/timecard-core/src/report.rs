// src/report.rs
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::detail::{DetailRecord, NormalizedDetail, PeriodBounds, WeekNumbering};
use crate::directory::{EmployeeDirectory, EmployeeRecord, MISSING};
use crate::error::Result;
use crate::hours::format_hours;
use crate::render;
use crate::summary::{Category, Placement, SummaryLedger, SummaryRecord, Totals, CATEGORY_TABLE};

pub const TOTAL_LABEL: &str = "TOTAL:";
pub const PERIOD_TOTAL_LABEL: &str = "PERIOD TOTAL:";

pub const DETAIL_HEADERS: [&str; 7] = [
    "Emp #",
    "Employee Name",
    "Week",
    "Date",
    "Reg Hrs",
    "OT Hrs",
    "Total Hours",
];

/// Whether a column holds free text or a number. Decides CSV quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Text,
    Number,
}

/// Kinds of the `DETAIL_HEADERS` columns, in the same order.
pub const DETAIL_KINDS: [CellKind; 7] = [
    CellKind::Text,
    CellKind::Text,
    CellKind::Number,
    CellKind::Text,
    CellKind::Number,
    CellKind::Number,
    CellKind::Number,
];

// --- Summary Model ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryColumn {
    Schedule,
    Status,
    Location,
    Name,
    Manager,
    Hours(Category),
    TotalHours,
    Approved,
}

impl SummaryColumn {
    pub fn header(self) -> &'static str {
        match self {
            SummaryColumn::Schedule => "Work Schedule",
            SummaryColumn::Status => "Emp Status",
            SummaryColumn::Location => "Location",
            SummaryColumn::Name => "Employee Name",
            SummaryColumn::Manager => "Manager",
            SummaryColumn::Hours(category) => category.def().header,
            SummaryColumn::TotalHours => "Total Hrs",
            SummaryColumn::Approved => "Approved?",
        }
    }

    pub fn kind(self) -> CellKind {
        match self {
            SummaryColumn::Hours(_) | SummaryColumn::TotalHours => CellKind::Number,
            _ => CellKind::Text,
        }
    }

    fn cell(self, directory: &EmployeeDirectory, record: &SummaryRecord) -> String {
        let employee = directory.get(&record.employee_id);
        let field = |pick: fn(&EmployeeRecord) -> &str| {
            employee.map(pick).unwrap_or(MISSING).to_string()
        };
        match self {
            SummaryColumn::Schedule => field(|e| e.schedule.as_str()),
            SummaryColumn::Status => field(|e| e.status.as_str()),
            SummaryColumn::Location => field(|e| e.location.as_str()),
            SummaryColumn::Name => field(|e| e.name.as_str()),
            SummaryColumn::Manager => field(|e| e.manager.as_str()),
            SummaryColumn::Hours(category) => format_hours(record.hours(category)),
            SummaryColumn::TotalHours => format_hours(record.total_hours()),
            SummaryColumn::Approved => record.approved.clone(),
        }
    }
}

/// Column layout of the summary report. Optional categories appear only when
/// their period total is material.
pub fn summary_columns(totals: &Totals) -> Vec<SummaryColumn> {
    let by_placement = |placement: Placement| {
        CATEGORY_TABLE
            .iter()
            .filter(move |def| def.placement == placement)
            .map(|def| def.category)
    };

    let mut columns = vec![
        SummaryColumn::Schedule,
        SummaryColumn::Status,
        SummaryColumn::Location,
        SummaryColumn::Name,
        SummaryColumn::Manager,
    ];
    columns.extend(by_placement(Placement::Leading).map(SummaryColumn::Hours));
    columns.extend(
        by_placement(Placement::Optional)
            .filter(|category| totals.is_material(*category))
            .map(SummaryColumn::Hours),
    );
    columns.extend(by_placement(Placement::Trailing).map(SummaryColumn::Hours));
    columns.push(SummaryColumn::TotalHours);
    columns.push(SummaryColumn::Approved);
    columns
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub columns: Vec<SummaryColumn>,
    pub rows: Vec<Vec<String>>,
}

impl SummaryTable {
    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.header()).collect()
    }

    pub fn kinds(&self) -> Vec<CellKind> {
        self.columns.iter().map(|c| c.kind()).collect()
    }
}

// --- Detail Model ---

/// Running sums over a set of detail records.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HoursTotals {
    pub regular: Decimal,
    pub overtime: Decimal,
    pub total: Decimal,
}

impl HoursTotals {
    fn add(&mut self, record: &DetailRecord) {
        self.regular += record.regular;
        self.overtime += record.overtime;
        self.total += record.total();
    }

    fn merge(&mut self, other: &HoursTotals) {
        self.regular += other.regular;
        self.overtime += other.overtime;
        self.total += other.total;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Record,
    Total,
}

/// One rendered row of the detail report.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailLine {
    pub kind: LineKind,
    pub cells: Vec<String>,
}

impl DetailLine {
    fn total(employee_name: &str, label: &str, totals: &HoursTotals) -> Self {
        Self {
            kind: LineKind::Total,
            cells: vec![
                String::new(),
                employee_name.to_string(),
                String::new(),
                label.to_string(),
                format_hours(totals.regular),
                format_hours(totals.overtime),
                format_hours(totals.total),
            ],
        }
    }
}

/// Detail records of one employee in one relative week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekBucket {
    pub relative_week: i64,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub records: Vec<DetailRecord>,
    pub totals: HoursTotals,
}

impl WeekBucket {
    fn new(relative_week: i64, records: Vec<DetailRecord>, numbering: WeekNumbering) -> Self {
        let mut totals = HoursTotals::default();
        records.iter().for_each(|r| totals.add(r));
        // Records are non-empty: a bucket only exists once a record lands in it.
        let anchor = records.iter().map(|r| r.date).min().unwrap_or_default();
        let (week_start, week_end) = numbering.week_bounds(anchor);
        Self {
            relative_week,
            week_start,
            week_end,
            records,
            totals,
        }
    }

    /// Record rows followed by the week's TOTAL row.
    pub fn lines(&self, employee_name: &str) -> Vec<DetailLine> {
        let mut lines: Vec<DetailLine> = self
            .records
            .iter()
            .map(|record| DetailLine {
                kind: LineKind::Record,
                cells: vec![
                    record.employee_id.clone(),
                    employee_name.to_string(),
                    self.relative_week.to_string(),
                    record.date.format("%Y-%m-%d").to_string(),
                    format_hours(record.regular),
                    format_hours(record.overtime),
                    format_hours(record.total()),
                ],
            })
            .collect();
        lines.push(DetailLine::total("", TOTAL_LABEL, &self.totals));
        lines
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDetail {
    pub name: String,
    /// Ascending by relative week.
    pub weeks: Vec<WeekBucket>,
    pub period_totals: HoursTotals,
}

impl EmployeeDetail {
    pub fn period_total_line(&self) -> DetailLine {
        DetailLine::total(&self.name, PERIOD_TOTAL_LABEL, &self.period_totals)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailReport {
    /// In order of first appearance in the attendance data.
    pub employees: Vec<EmployeeDetail>,
    /// First day of the first work week through the last day of the last.
    pub work_period: Option<(NaiveDate, NaiveDate)>,
}

// --- Builder ---

/// Rendered report artifacts, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reports {
    pub summary_csv: String,
    pub detail_csv: String,
    pub html: String,
}

pub struct ReportBuilder<'a> {
    directory: &'a EmployeeDirectory,
    ledger: &'a SummaryLedger,
    detail: &'a NormalizedDetail,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(
        directory: &'a EmployeeDirectory,
        ledger: &'a SummaryLedger,
        detail: &'a NormalizedDetail,
    ) -> Self {
        Self {
            directory,
            ledger,
            detail,
        }
    }

    pub fn period(&self) -> &PeriodBounds {
        &self.detail.period
    }

    pub fn summary_table(&self) -> SummaryTable {
        let columns = summary_columns(self.ledger.totals());
        let rows = self
            .ledger
            .records()
            .iter()
            .map(|record| {
                if self.directory.get(&record.employee_id).is_none() {
                    debug!("No directory entry for summary employee {}", record.employee_id);
                }
                columns
                    .iter()
                    .map(|column| column.cell(self.directory, record))
                    .collect()
            })
            .collect();
        SummaryTable { columns, rows }
    }

    pub fn detail_report(&self) -> DetailReport {
        let period = &self.detail.period;
        let numbering = self.detail.numbering;

        // name -> relative week -> records, names kept in first-seen order
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, BTreeMap<i64, Vec<DetailRecord>>> = HashMap::new();
        for record in &self.detail.records {
            let name = self.directory.name_or_missing(&record.employee_id);
            let weeks = groups.entry(name).or_insert_with(|| {
                order.push(name);
                BTreeMap::new()
            });
            weeks
                .entry(period.relative_week(record))
                .or_default()
                .push(record.clone());
        }

        let employees = order
            .into_iter()
            .map(|name| {
                let weeks: Vec<WeekBucket> = groups
                    .remove(name)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(week, records)| WeekBucket::new(week, records, numbering))
                    .collect();
                let mut period_totals = HoursTotals::default();
                weeks.iter().for_each(|w| period_totals.merge(&w.totals));
                EmployeeDetail {
                    name: name.to_string(),
                    weeks,
                    period_totals,
                }
            })
            .collect();

        let work_period = period.start_date.zip(period.end_date).map(|(start, end)| {
            (numbering.week_bounds(start).0, numbering.week_bounds(end).1)
        });

        DetailReport {
            employees,
            work_period,
        }
    }

    /// Builds both reports and renders them as CSV and HTML.
    pub fn build(&self) -> Result<Reports> {
        let summary = self.summary_table();
        let detail = self.detail_report();
        info!(
            "Built summary with {} rows and {} columns; detail for {} employees",
            summary.rows.len(),
            summary.columns.len(),
            detail.employees.len()
        );

        Ok(Reports {
            summary_csv: render::summary_csv(&summary)?,
            detail_csv: render::detail_csv(&detail)?,
            html: render::html_report(&summary, &detail, self.period()),
        })
    }
}

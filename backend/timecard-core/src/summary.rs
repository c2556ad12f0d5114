// src/summary.rs
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::hours::lenient_hours;
use crate::input::SummaryRow;

pub const EMPLOYEE_COLUMN: &str = "Employee Number";
pub const APPROVED_COLUMN: &str = "Approved?";

/// A category whose period-wide total does not exceed this is treated as
/// unused and left out of the summary report.
pub const MATERIAL_THRESHOLD: Decimal = dec!(0.1);

// --- Category Table ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Regular,
    Overtime,
    Holiday,
    Pto,
    Personal,
    Sick,
    OtherPto,
    TotalPto,
}

pub const CATEGORY_COUNT: usize = 8;

/// Where a category's column sits in the summary report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Always shown, before the optional block.
    Leading,
    /// Shown only when the period total is material.
    Optional,
    /// Always shown, after the optional block.
    Trailing,
}

#[derive(Debug)]
pub struct CategoryDef {
    pub category: Category,
    pub header: &'static str,
    /// Export columns summed into this category.
    pub sources: &'static [&'static str],
    pub placement: Placement,
}

/// Declared in report column order.
pub static CATEGORY_TABLE: [CategoryDef; CATEGORY_COUNT] = [
    CategoryDef {
        category: Category::Regular,
        header: "Reg Hrs",
        sources: &["Regular"],
        placement: Placement::Leading,
    },
    CategoryDef {
        category: Category::Overtime,
        header: "OT Hrs",
        sources: &["Overtime"],
        placement: Placement::Leading,
    },
    CategoryDef {
        category: Category::Holiday,
        header: "Hol Hrs",
        sources: &["Holiday"],
        placement: Placement::Leading,
    },
    CategoryDef {
        category: Category::Pto,
        header: "PTO Hrs",
        sources: &["Paid Time Off"],
        placement: Placement::Optional,
    },
    CategoryDef {
        category: Category::Personal,
        header: "Pers Hrs",
        sources: &["Personal Day"],
        placement: Placement::Optional,
    },
    CategoryDef {
        category: Category::Sick,
        header: "Sick Hrs",
        sources: &["Sick Leave", "Sick Leave (CA)"],
        placement: Placement::Optional,
    },
    CategoryDef {
        category: Category::OtherPto,
        header: "Other PTO",
        sources: &["Bereavement", "Volunteer", "Voting"],
        placement: Placement::Optional,
    },
    CategoryDef {
        category: Category::TotalPto,
        header: "Total PTO",
        sources: &["Total PTO"],
        placement: Placement::Trailing,
    },
];

impl Category {
    fn index(self) -> usize {
        self as usize
    }

    pub fn def(self) -> &'static CategoryDef {
        &CATEGORY_TABLE[self.index()]
    }

    /// Total PTO is already a roll-up of the leave categories.
    pub fn counts_toward_total(self) -> bool {
        self != Category::TotalPto
    }
}

type CategoryHours = [Decimal; CATEGORY_COUNT];

// --- Records ---

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    pub employee_id: String,
    hours: CategoryHours,
    total_hours: Decimal,
    pub approved: String,
}

impl SummaryRecord {
    /// Reads every declared category from an export row. `None` when the row
    /// carries no employee number.
    pub fn from_row(row: &SummaryRow) -> Option<Self> {
        let employee_id = row.get(EMPLOYEE_COLUMN).map(str::trim).filter(|id| !id.is_empty())?;

        let mut hours = [Decimal::ZERO; CATEGORY_COUNT];
        for def in &CATEGORY_TABLE {
            hours[def.category.index()] = def
                .sources
                .iter()
                .map(|column| lenient_hours(row.get(column), column))
                .sum();
        }

        Some(Self::new(
            employee_id,
            hours,
            row.get(APPROVED_COLUMN).unwrap_or_default(),
        ))
    }

    fn new(employee_id: &str, hours: CategoryHours, approved: &str) -> Self {
        let total_hours = CATEGORY_TABLE
            .iter()
            .filter(|def| def.category.counts_toward_total())
            .map(|def| hours[def.category.index()])
            .sum();
        Self {
            employee_id: employee_id.to_string(),
            hours,
            total_hours,
            approved: approved.to_string(),
        }
    }

    pub fn hours(&self, category: Category) -> Decimal {
        self.hours[category.index()]
    }

    /// Sum of every category except Total PTO.
    pub fn total_hours(&self) -> Decimal {
        self.total_hours
    }
}

/// Period-wide sums per category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals {
    hours: CategoryHours,
    total_hours: Decimal,
}

impl Totals {
    fn add(&mut self, record: &SummaryRecord) {
        for (sum, value) in self.hours.iter_mut().zip(record.hours.iter()) {
            *sum += *value;
        }
        self.total_hours += record.total_hours;
    }

    fn subtract(&mut self, record: &SummaryRecord) {
        for (sum, value) in self.hours.iter_mut().zip(record.hours.iter()) {
            *sum -= *value;
        }
        self.total_hours -= record.total_hours;
    }

    pub fn get(&self, category: Category) -> Decimal {
        self.hours[category.index()]
    }

    pub fn total_hours(&self) -> Decimal {
        self.total_hours
    }

    pub fn is_material(&self, category: Category) -> bool {
        self.get(category) > MATERIAL_THRESHOLD
    }

    /// Non-zero category totals followed by total hours, for the run summary.
    pub fn breakdown(&self) -> Vec<(&'static str, Decimal)> {
        CATEGORY_TABLE
            .iter()
            .map(|def| (def.header, self.get(def.category)))
            .chain(std::iter::once(("Total Hrs", self.total_hours)))
            .filter(|(_, value)| *value > Decimal::ZERO)
            .collect()
    }
}

/// Summary records in first-seen order, indexed by employee id.
#[derive(Debug, Clone, Default)]
pub struct SummaryLedger {
    records: Vec<SummaryRecord>,
    index: HashMap<String, usize>,
    totals: Totals,
}

impl SummaryLedger {
    fn insert(&mut self, record: SummaryRecord) {
        self.totals.add(&record);
        match self.index.get(&record.employee_id).copied() {
            Some(pos) => {
                debug!(
                    "Summary row for {} replaces an earlier row",
                    record.employee_id
                );
                self.totals.subtract(&self.records[pos]);
                self.records[pos] = record;
            }
            None => {
                self.index.insert(record.employee_id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn records(&self) -> &[SummaryRecord] {
        &self.records
    }

    pub fn get(&self, employee_id: &str) -> Option<&SummaryRecord> {
        self.index.get(employee_id).map(|&pos| &self.records[pos])
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Builds one summary record per employee and the period totals.
pub fn aggregate(rows: impl IntoIterator<Item = SummaryRow>) -> SummaryLedger {
    let mut ledger = SummaryLedger::default();
    for (idx, row) in rows.into_iter().enumerate() {
        match SummaryRecord::from_row(&row) {
            Some(record) => ledger.insert(record),
            None => warn!("Summary row {} has no employee number; skipped", idx + 1),
        }
    }
    info!(
        "Aggregated summary hours for {} employees ({} total hours)",
        ledger.len(),
        ledger.totals().total_hours()
    );
    ledger
}

#[cfg(test)]
pub(crate) fn summary_row(cells: &[(&str, &str)]) -> SummaryRow {
    cells.iter().copied().collect()
}

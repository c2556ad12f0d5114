// src/input.rs
use serde::{de::DeserializeOwned, Deserialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::error::Result;

// --- Raw Row Types ---

/// One line of the approved-hours export.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceRow {
    #[serde(rename = "Employee Number")]
    pub employee_number: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Reg Hours", default)]
    pub reg_hours: Option<String>,
    #[serde(rename = "OT Hours", default)]
    pub ot_hours: Option<String>,
}

/// One line of the payroll directory export.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryRow {
    #[serde(rename = "Employee #")]
    pub employee_id: String,
    #[serde(rename = "Hire Date", default)]
    pub hire_date: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Job Title", default)]
    pub title: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Work Schedule")]
    pub schedule: String,
    #[serde(rename = "Employment Status")]
    pub status: String,
    #[serde(rename = "Manager")]
    pub manager: String,
}

/// Summary-hours exports change columns between payroll versions, so rows are
/// kept as header -> cell maps and read by name.
#[derive(Debug, Clone, Default)]
pub struct SummaryRow {
    cells: HashMap<String, String>,
}

impl SummaryRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for SummaryRow {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for SummaryRow {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cells = HashMap::<String, String>::deserialize(deserializer)?;
        Ok(Self { cells })
    }
}

// --- Readers ---

fn reader_from<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(source)
}

/// Deserializes every data row of a CSV source.
pub fn read_rows<T: DeserializeOwned, R: Read>(source: R) -> Result<Vec<T>> {
    let mut reader = reader_from(source);
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Reads a whole CSV file into typed rows.
pub fn read_csv_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = std::fs::File::open(path)?;
    let rows = read_rows(file)?;
    info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

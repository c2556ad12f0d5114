// src/directory.rs
use std::collections::HashMap;
use tracing::{debug, info};

use crate::input::DirectoryRow;

/// Placeholder rendered for every directory field of an unknown employee.
pub const MISSING: &str = "*MISSING*";

type EmployeeId = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub hire_date: String,
    pub name: String,
    pub title: String,
    pub location: String,
    pub schedule: String,
    pub status: String,
    pub manager: String,
}

impl From<DirectoryRow> for EmployeeRecord {
    fn from(row: DirectoryRow) -> Self {
        Self {
            id: row.employee_id.trim().to_string(),
            hire_date: row.hire_date,
            name: row.name,
            title: row.title,
            location: row.location,
            schedule: row.schedule,
            status: row.status,
            manager: row.manager,
        }
    }
}

/// Employee id -> directory attributes.
#[derive(Debug, Clone, Default)]
pub struct EmployeeDirectory {
    employees: HashMap<EmployeeId, EmployeeRecord>,
}

impl EmployeeDirectory {
    /// Indexes directory rows. A repeated id replaces the earlier entry.
    pub fn build(rows: impl IntoIterator<Item = DirectoryRow>) -> Self {
        let mut employees = HashMap::new();
        for row in rows {
            let record = EmployeeRecord::from(row);
            if let Some(previous) = employees.insert(record.id.clone(), record) {
                debug!("Directory entry for {} replaced by a later row", previous.id);
            }
        }
        info!("Employee directory indexed {} employees", employees.len());
        Self { employees }
    }

    pub fn get(&self, id: &str) -> Option<&EmployeeRecord> {
        self.employees.get(id)
    }

    pub fn name_or_missing(&self, id: &str) -> &str {
        self.get(id).map(|e| e.name.as_str()).unwrap_or(MISSING)
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn directory_row(id: &str, name: &str, manager: &str) -> DirectoryRow {
    DirectoryRow {
        employee_id: id.to_string(),
        hire_date: "2021-03-01".to_string(),
        name: name.to_string(),
        title: "Engineer".to_string(),
        location: "Remote".to_string(),
        schedule: "Full Time".to_string(),
        status: "Active".to_string(),
        manager: manager.to_string(),
    }
}

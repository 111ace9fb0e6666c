use attend_core::{day_start, AttendanceRecord, AttendanceStatus, Employee, EmployeeId, EpochMillis};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

pub const CSV_HEADER: &str = "record_id,employee_id,employee_name,office_id,status,check_in_at_ms,check_out_at_ms,duration_minutes,check_in_distance_m";

/// Attendance rows as CSV, one line per record in the given order.
/// Employees missing from `employees` get an empty name column.
pub fn export_csv(records: &[AttendanceRecord], employees: &[Employee]) -> String {
    let names: HashMap<EmployeeId, &str> = employees
        .iter()
        .map(|employee| (employee.id, employee.full_name.as_str()))
        .collect();

    let mut out = String::with_capacity(CSV_HEADER.len() + records.len() * 160);
    out.push_str(CSV_HEADER);
    out.push_str("\r\n");

    for record in records {
        let status = match record.status {
            AttendanceStatus::CheckedIn => "checked_in",
            AttendanceStatus::CheckedOut => "checked_out",
        };
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\r\n",
            record.id,
            record.employee_id,
            csv_field(names.get(&record.employee_id).copied().unwrap_or_default()),
            record.office_id,
            status,
            record.check_in_at_ms,
            optional(record.check_out_at_ms),
            optional(record.duration_ms().map(|ms| ms / 60_000)),
            record
                .check_in_distance_m
                .map(|distance| format!("{distance:.1}"))
                .unwrap_or_default(),
        ));
    }
    out
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub day_start_ms: EpochMillis,
    pub check_ins: usize,
    pub check_outs: usize,
    pub unique_employees: usize,
}

/// Per-UTC-day counts, oldest day first. Check-outs count on the day they
/// were checked in.
pub fn summarize(records: &[AttendanceRecord]) -> Vec<DailySummary> {
    let mut days: BTreeMap<EpochMillis, (usize, usize, HashSet<EmployeeId>)> = BTreeMap::new();
    for record in records {
        let entry = days.entry(day_start(record.check_in_at_ms)).or_default();
        entry.0 += 1;
        if record.check_out_at_ms.is_some() {
            entry.1 += 1;
        }
        entry.2.insert(record.employee_id);
    }

    days.into_iter()
        .map(|(day_start_ms, (check_ins, check_outs, employees))| DailySummary {
            day_start_ms,
            check_ins,
            check_outs,
            unique_employees: employees.len(),
        })
        .collect()
}

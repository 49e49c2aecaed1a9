//! Bench and non-billed resource CSV exports.
//!
//! The rows come from the reporting RPCs; this module only orders them,
//! derives the day counts and serializes to CSV.

use serde::{Deserialize, Serialize};

use crate::csv_writer::CsvBuffer;
use crate::error::CoreError;
use crate::types::{Date, DbId};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const BENCH_REPORT_HEADER: [&str; 8] = [
    "Employee Code",
    "Employee Name",
    "Designation",
    "Department",
    "Skills",
    "Bench Since",
    "Days On Bench",
    "Reason",
];

pub const NON_BILLED_REPORT_HEADER: [&str; 8] = [
    "Employee Code",
    "Employee Name",
    "Designation",
    "Project",
    "Allocation %",
    "Non-Billed Since",
    "Days Non-Billed",
    "Expected Billing Date",
];

/// An employee with no active project allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchResource {
    pub employee_id: DbId,
    pub employee_code: String,
    pub employee_name: String,
    pub designation: Option<String>,
    pub department: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub bench_since: Date,
    pub reason: Option<String>,
}

/// An employee allocated to a project without being billed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonBilledResource {
    pub employee_id: DbId,
    pub employee_code: String,
    pub employee_name: String,
    pub designation: Option<String>,
    pub project: String,
    pub allocation_percent: u8,
    pub non_billed_since: Date,
    pub expected_billing_date: Option<Date>,
}

/// Whole days from `since` to `as_of`; zero when `since` is in the future.
pub fn days_between(since: Date, as_of: Date) -> i64 {
    (as_of - since).num_days().max(0)
}

/// Bench report, longest-benched first (ties by employee code).
pub fn bench_report_csv(resources: &[BenchResource], as_of: Date) -> Result<String, CoreError> {
    let mut rows: Vec<(&BenchResource, i64)> = resources
        .iter()
        .map(|r| (r, days_between(r.bench_since, as_of)))
        .collect();
    rows.sort_by(|(a, da), (b, db)| db.cmp(da).then_with(|| a.employee_code.cmp(&b.employee_code)));

    let mut out = CsvBuffer::new();
    out.write_row(BENCH_REPORT_HEADER)?;
    for (r, days) in rows {
        out.write_row([
            r.employee_code.clone(),
            r.employee_name.clone(),
            r.designation.clone().unwrap_or_default(),
            r.department.clone().unwrap_or_default(),
            r.skills.join("; "),
            r.bench_since.format(DATE_FORMAT).to_string(),
            days.to_string(),
            r.reason.clone().unwrap_or_default(),
        ])?;
    }
    out.finish()
}

/// Non-billed report, longest non-billed first (ties by employee code).
pub fn non_billed_report_csv(
    resources: &[NonBilledResource],
    as_of: Date,
) -> Result<String, CoreError> {
    let mut rows: Vec<(&NonBilledResource, i64)> = resources
        .iter()
        .map(|r| (r, days_between(r.non_billed_since, as_of)))
        .collect();
    rows.sort_by(|(a, da), (b, db)| db.cmp(da).then_with(|| a.employee_code.cmp(&b.employee_code)));

    let mut out = CsvBuffer::new();
    out.write_row(NON_BILLED_REPORT_HEADER)?;
    for (r, days) in rows {
        out.write_row([
            r.employee_code.clone(),
            r.employee_name.clone(),
            r.designation.clone().unwrap_or_default(),
            r.project.clone(),
            r.allocation_percent.to_string(),
            r.non_billed_since.format(DATE_FORMAT).to_string(),
            days.to_string(),
            r.expected_billing_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        ])?;
    }
    out.finish()
}

/// Suggested download file name, e.g. `bench_report_2024-03-01.csv`.
pub fn report_file_name(prefix: &str, as_of: Date) -> String {
    format!("{prefix}_{}.csv", as_of.format(DATE_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn bench(code: &str, since: Date) -> BenchResource {
        BenchResource {
            employee_id: 1,
            employee_code: code.into(),
            employee_name: format!("Employee {code}"),
            designation: Some("Software Engineer".into()),
            department: None,
            skills: vec!["Rust".into(), "SQL".into()],
            bench_since: since,
            reason: None,
        }
    }

    #[test]
    fn days_between_counts_whole_days() {
        assert_eq!(days_between(date(2024, 2, 28), date(2024, 3, 1)), 2);
        assert_eq!(days_between(date(2024, 3, 1), date(2024, 3, 1)), 0);
    }

    #[test]
    fn days_between_never_negative() {
        assert_eq!(days_between(date(2024, 4, 1), date(2024, 3, 1)), 0);
    }

    #[test]
    fn bench_report_sorted_by_days_then_code() {
        let as_of = date(2024, 3, 31);
        let resources = vec![
            bench("E003", date(2024, 3, 21)),
            bench("E002", date(2024, 1, 31)),
            bench("E001", date(2024, 3, 21)),
        ];
        let csv = bench_report_csv(&resources, as_of).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Employee Code,Employee Name,Designation,Department,Skills,Bench Since,Days On Bench,Reason"
        );
        assert_eq!(
            lines[1],
            "E002,Employee E002,Software Engineer,,Rust; SQL,2024-01-31,60,"
        );
        assert!(lines[2].starts_with("E001,"));
        assert!(lines[3].starts_with("E003,"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn non_billed_report_formats_optional_date() {
        let as_of = date(2024, 3, 10);
        let resources = vec![
            NonBilledResource {
                employee_id: 7,
                employee_code: "E010".into(),
                employee_name: "Asha Rao".into(),
                designation: None,
                project: "Apollo, Phase 2".into(),
                allocation_percent: 50,
                non_billed_since: date(2024, 3, 1),
                expected_billing_date: Some(date(2024, 4, 1)),
            },
            NonBilledResource {
                employee_id: 8,
                employee_code: "E011".into(),
                employee_name: "Ben Ito".into(),
                designation: Some("QA Engineer".into()),
                project: "Zephyr".into(),
                allocation_percent: 100,
                non_billed_since: date(2024, 2, 1),
                expected_billing_date: None,
            },
        ];
        let csv = non_billed_report_csv(&resources, as_of).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "E011,Ben Ito,QA Engineer,Zephyr,100,2024-02-01,38,");
        assert_eq!(
            lines[2],
            "E010,Asha Rao,,\"Apollo, Phase 2\",50,2024-03-01,9,2024-04-01"
        );
    }

    #[test]
    fn empty_report_is_header_only() {
        let csv = bench_report_csv(&[], date(2024, 1, 1)).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn report_file_name_includes_date() {
        assert_eq!(
            report_file_name("bench_report", date(2024, 3, 1)),
            "bench_report_2024-03-01.csv"
        );
    }
}

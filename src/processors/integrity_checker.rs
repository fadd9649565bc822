use crate::error::ValidationError;
use crate::models::{EnrichedRecord, Granularity, RawDataset, RawRecord};
use chrono::NaiveDate;
use serde::Serialize;

/// Outcome of auditing every record instead of stopping at the first error.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrityReport {
    pub total_records: usize,
    pub valid_records: usize,
    pub invalid_records: usize,
    pub count_mismatches: usize,
    pub violations: Vec<RecordViolation>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordViolation {
    pub file: Granularity,
    pub row: usize,
    pub instant: Option<u32>,
    pub date: NaiveDate,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViolationType {
    UnknownCode,
    OutOfRange,
    NonFinite,
    /// `cnt` differs from `casual + registered`
    CountMismatch,
}

impl From<&ValidationError> for ViolationType {
    fn from(err: &ValidationError) -> Self {
        match err {
            ValidationError::UnknownCode { .. } | ValidationError::UnknownLabel { .. } => {
                ViolationType::UnknownCode
            }
            ValidationError::OutOfRange { .. } => ViolationType::OutOfRange,
            ValidationError::NonFinite { .. } => ViolationType::NonFinite,
        }
    }
}

pub struct IntegrityChecker {
    check_totals: bool,
}

impl IntegrityChecker {
    pub fn new() -> Self {
        Self { check_totals: true }
    }

    pub fn with_total_check(mut self, check_totals: bool) -> Self {
        self.check_totals = check_totals;
        self
    }

    /// Check every record of both files
    pub fn check_dataset(&self, dataset: &RawDataset) -> IntegrityReport {
        let mut report = IntegrityReport::default();
        self.check_records(Granularity::Daily, &dataset.day, &mut report);
        self.check_records(Granularity::Hourly, &dataset.hour, &mut report);
        report
    }

    pub fn check_records(
        &self,
        file: Granularity,
        records: &[RawRecord],
        report: &mut IntegrityReport,
    ) {
        for (row, record) in records.iter().enumerate() {
            report.total_records += 1;

            let errors = EnrichedRecord::violations(record);
            if errors.is_empty() {
                report.valid_records += 1;
            } else {
                report.invalid_records += 1;
            }

            for err in errors {
                report.violations.push(RecordViolation {
                    file,
                    row,
                    instant: record.instant,
                    date: record.date,
                    violation_type: ViolationType::from(&err),
                    details: err.to_string(),
                });
            }

            if self.check_totals && !record.has_consistent_total() {
                report.count_mismatches += 1;
                report.violations.push(RecordViolation {
                    file,
                    row,
                    instant: record.instant,
                    date: record.date,
                    violation_type: ViolationType::CountMismatch,
                    details: format!(
                        "cnt {} != casual {} + registered {}",
                        record.total, record.casual, record.registered
                    ),
                });
            }
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();
        let total = report.total_records.max(1) as f64;

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!(
            "Valid Records: {} ({:.1}%)\n",
            report.valid_records,
            100.0 * report.valid_records as f64 / total
        ));
        summary.push_str(&format!(
            "Invalid Records: {} ({:.1}%)\n",
            report.invalid_records,
            100.0 * report.invalid_records as f64 / total
        ));
        summary.push_str(&format!("Count Mismatches: {}\n", report.count_mismatches));
        summary.push_str(&format!("\nViolations: {}\n", report.violations.len()));

        if !report.violations.is_empty() {
            summary.push_str("\nTop 10 Violations:\n");
            for (i, violation) in report.violations.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. {} file row {} on {}: {}\n",
                    i + 1,
                    violation.file,
                    violation.row,
                    violation.date,
                    violation.details
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}

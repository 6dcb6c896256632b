//! Daily duty report (值日日报)

use shared::models::{DutyRecord, DutyReport, DutyStats};

/// Split a day's records into completed and pending
pub fn build(date: &str, records: Vec<DutyRecord>) -> DutyReport {
    let total = records.len() as i64;
    let (completed, pending): (Vec<_>, Vec<_>) =
        records.into_iter().partition(DutyRecord::is_completed);

    let completion_percent = if total == 0 {
        0
    } else {
        completed.len() as i64 * 100 / total
    };

    DutyReport {
        date: date.to_string(),
        completed,
        pending,
        completion_percent,
    }
}

/// Counters of a report plus the penalty log size
pub fn stats(report: &DutyReport, total_penalties: i64) -> DutyStats {
    DutyStats {
        date: report.date.clone(),
        total_duties: report.completed.len() + report.pending.len(),
        completed: report.completed.len(),
        pending: report.pending.len(),
        completion_percent: report.completion_percent,
        total_penalties,
    }
}

//! Plain-text message bodies

use std::fmt::Write;

use shared::models::{AttendanceReport, DutyReport, DutyView};

pub fn duty_announcement(date: &str, duties: &[DutyView]) -> String {
    let mut text = format!("Cleaning duty for {date}\n");
    for view in duties {
        let _ = write!(
            text,
            "\nFloor {}: room {}",
            view.record.floor, view.record.room_number
        );
        if view.general_cleaning {
            text.push_str(" (general cleaning)");
        }
    }
    if duties.is_empty() {
        text.push_str("\nNo duties scheduled.");
    }
    text
}

pub fn attendance_request(date: &str, floors: &[i64]) -> String {
    let floors: Vec<String> = floors.iter().map(i64::to_string).collect();
    format!(
        "Attendance check for {date}: please submit the student count for floor(s) {}.",
        floors.join(", ")
    )
}

pub fn duty_report(report: &DutyReport) -> String {
    let mut text = format!(
        "Duty report for {} ({}% completed)\n",
        report.date, report.completion_percent
    );
    if !report.completed.is_empty() {
        text.push_str("\nCompleted:");
        for r in &report.completed {
            let _ = write!(text, "\n  Floor {}: room {}", r.floor, r.room_number);
            if let Some(by) = &r.confirmed_by {
                let _ = write!(text, " by {by}");
            }
        }
    }
    if !report.pending.is_empty() {
        text.push_str("\nNot confirmed:");
        for r in &report.pending {
            let _ = write!(text, "\n  Floor {}: room {}", r.floor, r.room_number);
        }
    }
    text
}

pub fn attendance_report(report: &AttendanceReport) -> String {
    let mut text = format!(
        "Attendance for {}: {} students, {}/{} floors reported\n",
        report.date, report.total_students, report.floors_submitted, report.floors_registered
    );
    for r in &report.records {
        let _ = write!(text, "\nFloor {}: {}", r.floor, r.student_count);
        if let Some(notes) = &r.notes {
            let _ = write!(text, " ({notes})");
        }
    }
    text
}

//! Shared fixtures: in-memory documents and a sweep that mirrors the
//! per-stage bulk update.

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use doctrack_lib::entity::{document, milestone_record};
use doctrack_lib::models::{ApprovalStatus, Stage, WorkStatus};
use doctrack_lib::services::workflow::{self, StatusFields};

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
}

/// A document plus its three milestone records, as document creation stores
/// them: all Not Yet / Pending, no actual dates.
pub fn new_document(
    file_name: &str,
    pic: Option<&str>,
    field: &str,
) -> (document::Model, Vec<milestone_record::Model>) {
    let now = epoch();
    let doc = document::Model {
        id: Uuid::new_v4(),
        project_id: Uuid::new_v4(),
        field: field.to_string(),
        file_name: file_name.to_string(),
        document_number: None,
        pic: pic.map(|s| s.to_string()),
        discipline: None,
        created_at: now,
        updated_at: now,
    };

    let records = Stage::ALL
        .iter()
        .map(|stage| milestone_record::Model {
            id: Uuid::new_v4(),
            document_id: doc.id,
            stage: stage.as_str().to_string(),
            status_description: WorkStatus::NotYet.as_str().to_string(),
            target_start: None,
            actual_start: None,
            target_submit: None,
            actual_submit: None,
            approval_status: ApprovalStatus::Pending.as_str().to_string(),
            approval_comment: None,
            created_at: now,
            updated_at: now,
        })
        .collect();

    (doc, records)
}

pub fn record_for<'a>(
    records: &'a mut [milestone_record::Model],
    stage: Stage,
) -> &'a mut milestone_record::Model {
    records
        .iter_mut()
        .find(|r| r.stage == stage.as_str())
        .expect("stage record exists")
}

/// Apply resolved status fields the way the update query does.
pub fn apply_fields(record: &mut milestone_record::Model, fields: StatusFields) {
    record.status_description = fields.status.as_str().to_string();
    record.actual_start = fields.actual_start;
    record.actual_submit = fields.actual_submit;
}

/// In-memory sweep mirroring the SQL: three independent stage passes over
/// the shared predicate. Returns (ifr, ifa, ifb, total) promotion counts.
pub fn run_sweep(
    records: &mut [milestone_record::Model],
    now: DateTime<Utc>,
    threshold: Duration,
) -> (u64, u64, u64, u64) {
    let mut counts = [0u64; 3];

    for (i, stage) in Stage::ALL.iter().enumerate() {
        for record in records.iter_mut().filter(|r| r.stage == stage.as_str()) {
            let status = WorkStatus::parse(&record.status_description).unwrap();
            if workflow::due_for_escalation(status, record.actual_start, now, threshold) {
                record.status_description = WorkStatus::InProgress.as_str().to_string();
                counts[i] += 1;
            }
        }
    }

    (
        counts[0],
        counts[1],
        counts[2],
        counts.iter().copied().sum(),
    )
}

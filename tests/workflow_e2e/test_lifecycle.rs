//! Lifecycle scenarios: creation invariants, start ticket, status edits,
//! approval comment handling.

use chrono::Duration;

use doctrack_lib::models::{
    ApprovalStatus, EditApprovalRequest, EditStatusRequest, Stage, WorkStatus,
};
use doctrack_lib::services::workflow;

use crate::helpers::{apply_fields, epoch, new_document, record_for};

#[test]
fn test_new_document_has_three_pristine_records() {
    let (_doc, records) = new_document("P&ID-001.pdf", Some("Eka"), "Limau");

    assert_eq!(records.len(), 3);
    for record in &records {
        assert_eq!(record.status_description, "Not Yet");
        assert_eq!(record.approval_status, "Pending");
        assert!(record.actual_start.is_none());
        assert!(record.actual_submit.is_none());
        assert!(record.approval_comment.is_none());
    }
}

#[test]
fn test_start_ticket_stamps_actual_start() {
    let (_doc, mut records) = new_document("spec.pdf", Some("Eka"), "Limau");
    let now = epoch();

    let ifr = record_for(&mut records, Stage::Ifr);
    let fields = workflow::start_ticket(WorkStatus::NotYet, now).unwrap();
    apply_fields(ifr, fields);

    assert_eq!(ifr.status_description, "Start");
    assert_eq!(ifr.actual_start, Some(now));
    assert!(ifr.actual_submit.is_none());

    // A second start on the same ticket is rejected
    let again = workflow::start_ticket(WorkStatus::parse(&ifr.status_description).unwrap(), now);
    assert!(again.is_err());
}

#[test]
fn test_status_edit_round_trip_restores_not_yet_invariant() {
    let (_doc, mut records) = new_document("spec.pdf", Some("Eka"), "Limau");
    let now = epoch();
    let ifa = record_for(&mut records, Stage::Ifa);

    // Start, then complete with a submit date
    apply_fields(ifa, workflow::start_ticket(WorkStatus::NotYet, now).unwrap());
    let complete = EditStatusRequest {
        status_description: WorkStatus::Complete,
        actual_submit: Some(now + Duration::days(3)),
        actual_start: None,
    };
    let fields = workflow::apply_status_edit(ifa.actual_start, &complete);
    apply_fields(ifa, fields);
    assert_eq!(ifa.status_description, "Complete");
    assert_eq!(ifa.actual_start, Some(now));
    assert_eq!(ifa.actual_submit, Some(now + Duration::days(3)));

    // Direct edit back to Not Yet clears both actual dates
    let reset = EditStatusRequest {
        status_description: WorkStatus::NotYet,
        actual_submit: None,
        actual_start: None,
    };
    let fields = workflow::apply_status_edit(ifa.actual_start, &reset);
    apply_fields(ifa, fields);
    assert_eq!(ifa.status_description, "Not Yet");
    assert!(ifa.actual_start.is_none());
    assert!(ifa.actual_submit.is_none());
}

#[test]
fn test_approval_comment_follows_status() {
    // Deny with comment, then approve: the comment must not survive
    let deny = EditApprovalRequest {
        approval_status: ApprovalStatus::DeniedWithComment,
        approval_comment: Some("missing vendor data".to_string()),
    };
    let fields = workflow::apply_approval_edit(&deny).unwrap();
    assert_eq!(fields.status, ApprovalStatus::DeniedWithComment);
    assert_eq!(fields.comment.as_deref(), Some("missing vendor data"));

    let approve = EditApprovalRequest {
        approval_status: ApprovalStatus::Approved,
        approval_comment: fields.comment.clone(),
    };
    let fields = workflow::apply_approval_edit(&approve).unwrap();
    assert_eq!(fields.status, ApprovalStatus::Approved);
    assert!(fields.comment.is_none());
}

#[test]
fn test_deny_with_comment_rejected_without_comment() {
    let deny = EditApprovalRequest {
        approval_status: ApprovalStatus::DeniedWithComment,
        approval_comment: None,
    };
    assert!(workflow::apply_approval_edit(&deny).is_err());
}

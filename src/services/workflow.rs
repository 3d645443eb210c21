//! Status and approval state machine for milestone records.
//!
//! Every status or approval write goes through one of these functions before
//! it reaches the database, so the cross-field invariants hold for every row:
//! a Not Yet record has no actual dates, and an approval comment exists
//! exactly when the status is Denied with Comment.

use chrono::{DateTime, Duration, Utc};

use crate::error::{AppError, AppResult};
use crate::models::{
    ApprovalStatus, EditApprovalRequest, EditStatusRequest, ProjectStatus, WorkStatus,
};

/// Resolved lifecycle fields ready to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFields {
    pub status: WorkStatus,
    pub actual_start: Option<DateTime<Utc>>,
    pub actual_submit: Option<DateTime<Utc>>,
}

/// Resolved approval fields ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalFields {
    pub status: ApprovalStatus,
    pub comment: Option<String>,
}

/// The "Start Ticket" transition: Not Yet -> Start, stamping actual_start.
///
/// Only valid from Not Yet; a ticket that is already running cannot be
/// started again.
pub fn start_ticket(current: WorkStatus, now: DateTime<Utc>) -> AppResult<StatusFields> {
    if current != WorkStatus::NotYet {
        return Err(AppError::InvalidInput(format!(
            "Cannot start a ticket in status '{}'",
            current
        )));
    }

    Ok(StatusFields {
        status: WorkStatus::Start,
        actual_start: Some(now),
        actual_submit: None,
    })
}

/// A direct status edit from the edit dialog.
///
/// Any target status is accepted (backward moves included); moving to
/// Not Yet clears both actual dates. An omitted actual_start keeps the
/// stored value; actual_submit is always taken from the request, so leaving
/// it out clears the date. Date ordering is not validated here: the derived
/// submit explanation is the only timeliness signal.
pub fn apply_status_edit(
    current_actual_start: Option<DateTime<Utc>>,
    req: &EditStatusRequest,
) -> StatusFields {
    if req.status_description == WorkStatus::NotYet {
        return StatusFields {
            status: WorkStatus::NotYet,
            actual_start: None,
            actual_submit: None,
        };
    }

    StatusFields {
        status: req.status_description,
        actual_start: req.actual_start.or(current_actual_start),
        actual_submit: req.actual_submit,
    }
}

/// An approval edit.
///
/// Denied with Comment requires a non-empty comment; every other status
/// clears it.
pub fn apply_approval_edit(req: &EditApprovalRequest) -> AppResult<ApprovalFields> {
    let trimmed = req
        .approval_comment
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if req.approval_status.requires_comment() {
        let comment = trimmed.ok_or_else(|| {
            AppError::InvalidInput(
                "A comment is required when the status is Denied with Comment".to_string(),
            )
        })?;
        return Ok(ApprovalFields {
            status: req.approval_status,
            comment: Some(comment.to_string()),
        });
    }

    Ok(ApprovalFields {
        status: req.approval_status,
        comment: None,
    })
}

/// Whether a record qualifies for the escalation promotion.
///
/// Mirrors the sweep's SQL predicate: Start status with an actual_start at
/// least `threshold` in the past.
pub fn due_for_escalation(
    status: WorkStatus,
    actual_start: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    threshold: Duration,
) -> bool {
    status == WorkStatus::Start
        && actual_start.is_some_and(|started| now - started >= threshold)
}

/// The finished_at transition rule for projects.
///
/// Set when the status becomes Completed, kept while it stays Completed,
/// cleared as soon as the status moves away.
pub fn project_finished_at(
    previous: ProjectStatus,
    next: ProjectStatus,
    current: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (previous, next) {
        (ProjectStatus::Completed, ProjectStatus::Completed) => current,
        (_, ProjectStatus::Completed) => Some(now),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_start_ticket_from_not_yet() {
        let now = at(2024, 3, 1, 9);
        let fields = start_ticket(WorkStatus::NotYet, now).unwrap();
        assert_eq!(fields.status, WorkStatus::Start);
        assert_eq!(fields.actual_start, Some(now));
        assert_eq!(fields.actual_submit, None);
    }

    #[test]
    fn test_start_ticket_rejected_when_already_running() {
        let now = at(2024, 3, 1, 9);
        for status in [WorkStatus::Start, WorkStatus::InProgress, WorkStatus::Complete] {
            assert!(start_ticket(status, now).is_err(), "{} should reject", status);
        }
    }

    #[test]
    fn test_status_edit_to_not_yet_clears_actual_dates() {
        let req = EditStatusRequest {
            status_description: WorkStatus::NotYet,
            actual_submit: Some(at(2024, 3, 5, 0)),
            actual_start: Some(at(2024, 3, 1, 0)),
        };
        let fields = apply_status_edit(Some(at(2024, 2, 1, 0)), &req);
        assert_eq!(fields.status, WorkStatus::NotYet);
        assert_eq!(fields.actual_start, None);
        assert_eq!(fields.actual_submit, None);
    }

    #[test]
    fn test_status_edit_keeps_stored_actual_start() {
        let stored = Some(at(2024, 2, 1, 0));
        let req = EditStatusRequest {
            status_description: WorkStatus::Complete,
            actual_submit: Some(at(2024, 3, 5, 0)),
            actual_start: None,
        };
        let fields = apply_status_edit(stored, &req);
        assert_eq!(fields.status, WorkStatus::Complete);
        assert_eq!(fields.actual_start, stored);
        assert_eq!(fields.actual_submit, Some(at(2024, 3, 5, 0)));
    }

    #[test]
    fn test_status_edit_overrides_actual_start() {
        let req = EditStatusRequest {
            status_description: WorkStatus::InProgress,
            actual_submit: None,
            actual_start: Some(at(2024, 3, 2, 0)),
        };
        let fields = apply_status_edit(Some(at(2024, 2, 1, 0)), &req);
        assert_eq!(fields.actual_start, Some(at(2024, 3, 2, 0)));
        assert_eq!(fields.actual_submit, None);
    }

    #[test]
    fn test_approval_denied_with_comment_requires_comment() {
        let req = EditApprovalRequest {
            approval_status: ApprovalStatus::DeniedWithComment,
            approval_comment: None,
        };
        assert!(apply_approval_edit(&req).is_err());

        let req = EditApprovalRequest {
            approval_status: ApprovalStatus::DeniedWithComment,
            approval_comment: Some("   ".to_string()),
        };
        assert!(apply_approval_edit(&req).is_err());

        let req = EditApprovalRequest {
            approval_status: ApprovalStatus::DeniedWithComment,
            approval_comment: Some("  revise section 3  ".to_string()),
        };
        let fields = apply_approval_edit(&req).unwrap();
        assert_eq!(fields.status, ApprovalStatus::DeniedWithComment);
        assert_eq!(fields.comment.as_deref(), Some("revise section 3"));
    }

    #[test]
    fn test_approval_leaving_denied_with_comment_clears_comment() {
        for status in [
            ApprovalStatus::Pending,
            ApprovalStatus::Approved,
            ApprovalStatus::Denied,
        ] {
            let req = EditApprovalRequest {
                approval_status: status,
                approval_comment: Some("stale comment".to_string()),
            };
            let fields = apply_approval_edit(&req).unwrap();
            assert_eq!(fields.status, status);
            assert_eq!(fields.comment, None, "{} should clear the comment", status);
        }
    }

    #[test]
    fn test_escalation_due_at_exactly_24h() {
        let threshold = Duration::hours(24);
        let started = at(2024, 3, 1, 0);

        // 23h59m: not due
        let now = started + Duration::hours(23) + Duration::minutes(59);
        assert!(!due_for_escalation(WorkStatus::Start, Some(started), now, threshold));

        // 24h sharp: due
        let now = started + Duration::hours(24);
        assert!(due_for_escalation(WorkStatus::Start, Some(started), now, threshold));

        // 24h + 1s: due
        let now = started + Duration::hours(24) + Duration::seconds(1);
        assert!(due_for_escalation(WorkStatus::Start, Some(started), now, threshold));
    }

    #[test]
    fn test_escalation_only_applies_to_start() {
        let threshold = Duration::hours(24);
        let started = at(2024, 3, 1, 0);
        let now = started + Duration::hours(48);

        for status in [WorkStatus::NotYet, WorkStatus::InProgress, WorkStatus::Complete] {
            assert!(!due_for_escalation(status, Some(started), now, threshold));
        }
        assert!(!due_for_escalation(WorkStatus::Start, None, now, threshold));
    }

    #[test]
    fn test_project_finished_at_set_on_completion() {
        let now = at(2024, 6, 1, 12);
        assert_eq!(
            project_finished_at(ProjectStatus::Active, ProjectStatus::Completed, None, now),
            Some(now)
        );
    }

    #[test]
    fn test_project_finished_at_kept_while_completed() {
        let stamped = at(2024, 5, 1, 12);
        let now = at(2024, 6, 1, 12);
        assert_eq!(
            project_finished_at(
                ProjectStatus::Completed,
                ProjectStatus::Completed,
                Some(stamped),
                now
            ),
            Some(stamped)
        );
    }

    #[test]
    fn test_project_finished_at_cleared_on_leaving_completed() {
        let stamped = at(2024, 5, 1, 12);
        let now = at(2024, 6, 1, 12);
        for next in [
            ProjectStatus::Active,
            ProjectStatus::OnHold,
            ProjectStatus::Cancelled,
        ] {
            assert_eq!(
                project_finished_at(ProjectStatus::Completed, next, Some(stamped), now),
                None
            );
        }
    }
}

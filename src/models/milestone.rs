//! Milestone domain models: submission stages, status lifecycle, and approval state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Submission stage enum. Every document carries one record per stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stage {
    Ifr,
    Ifa,
    Ifb,
}

impl Stage {
    /// All stages, in submission order.
    pub const ALL: [Stage; 3] = [Stage::Ifr, Stage::Ifa, Stage::Ifb];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ifr => "IFR",
            Self::Ifa => "IFA",
            Self::Ifb => "IFB",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "IFR" => Some(Self::Ifr),
            "IFA" => Some(Self::Ifa),
            "IFB" => Some(Self::Ifb),
            _ => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-stage lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum WorkStatus {
    #[default]
    #[serde(rename = "Not Yet")]
    NotYet,
    Start,
    #[serde(rename = "In-Progress")]
    InProgress,
    Complete,
}

impl WorkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotYet => "Not Yet",
            Self::Start => "Start",
            Self::InProgress => "In-Progress",
            Self::Complete => "Complete",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Not Yet" => Some(Self::NotYet),
            "Start" => Some(Self::Start),
            "In-Progress" => Some(Self::InProgress),
            "Complete" => Some(Self::Complete),
            _ => None,
        }
    }
}

impl std::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Approval state, orthogonal to the lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Denied,
    #[serde(rename = "Denied with Comment")]
    DeniedWithComment,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Denied => "Denied",
            Self::DeniedWithComment => "Denied with Comment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(Self::Pending),
            "Approved" => Some(Self::Approved),
            "Denied" => Some(Self::Denied),
            "Denied with Comment" => Some(Self::DeniedWithComment),
            _ => None,
        }
    }

    /// Whether this status carries a mandatory comment.
    pub fn requires_comment(&self) -> bool {
        matches!(self, Self::DeniedWithComment)
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derived submit timeliness label. Recomputed on read, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum SubmitExplanation {
    #[serde(rename = "Over Due")]
    OverDue,
    #[serde(rename = "On Time")]
    OnTime,
    Ahead,
}

impl SubmitExplanation {
    /// Compare target and actual submit dates, date-only (time of day ignored).
    /// Returns `None` when either date is missing.
    pub fn derive(
        target_submit: Option<DateTime<Utc>>,
        actual_submit: Option<DateTime<Utc>>,
    ) -> Option<Self> {
        let target = target_submit?.date_naive();
        let actual = actual_submit?.date_naive();
        if actual > target {
            Some(Self::OverDue)
        } else if actual == target {
            Some(Self::OnTime)
        } else {
            Some(Self::Ahead)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OverDue => "Over Due",
            Self::OnTime => "On Time",
            Self::Ahead => "Ahead",
        }
    }
}

impl std::fmt::Display for SubmitExplanation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One milestone record as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MilestoneView {
    /// Milestone record UUID.
    pub id: Uuid,
    /// Submission stage.
    pub stage: Stage,
    /// Lifecycle status.
    pub status_description: WorkStatus,
    /// Planned start date.
    pub target_start: Option<DateTime<Utc>>,
    /// When the ticket was actually started.
    pub actual_start: Option<DateTime<Utc>>,
    /// Planned submission date.
    pub target_submit: Option<DateTime<Utc>>,
    /// Actual submission date.
    pub actual_submit: Option<DateTime<Utc>>,
    /// Timeliness label derived from the submit dates (null when either is missing).
    pub submit_explanation: Option<SubmitExplanation>,
    /// Approval state.
    pub approval_status: ApprovalStatus,
    /// Reviewer comment; present exactly when the status is Denied with Comment.
    pub approval_comment: Option<String>,
}

/// Request to edit a milestone's status and actual dates.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EditStatusRequest {
    /// New lifecycle status.
    pub status_description: WorkStatus,
    /// Actual submit date to record (cleared when omitted).
    #[serde(default)]
    pub actual_submit: Option<DateTime<Utc>>,
    /// Actual start date override (left untouched when omitted).
    #[serde(default)]
    pub actual_start: Option<DateTime<Utc>>,
}

/// Request to set a milestone's approval state.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EditApprovalRequest {
    /// New approval status.
    pub approval_status: ApprovalStatus,
    /// Comment; required when the status is Denied with Comment, ignored otherwise.
    #[serde(default)]
    pub approval_comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_stage_parsing() {
        assert_eq!(Stage::parse("IFR"), Some(Stage::Ifr));
        assert_eq!(Stage::parse("ifa"), Some(Stage::Ifa));
        assert_eq!(Stage::parse("IFB"), Some(Stage::Ifb));
        assert_eq!(Stage::parse("IFX"), None);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            WorkStatus::NotYet,
            WorkStatus::Start,
            WorkStatus::InProgress,
            WorkStatus::Complete,
        ] {
            assert_eq!(WorkStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(WorkStatus::parse("Done"), None);
    }

    #[test]
    fn test_approval_round_trip() {
        for status in [
            ApprovalStatus::Pending,
            ApprovalStatus::Approved,
            ApprovalStatus::Denied,
            ApprovalStatus::DeniedWithComment,
        ] {
            assert_eq!(ApprovalStatus::parse(status.as_str()), Some(status));
        }
        assert!(ApprovalStatus::DeniedWithComment.requires_comment());
        assert!(!ApprovalStatus::Denied.requires_comment());
    }

    #[test]
    fn test_explanation_on_time() {
        let explanation =
            SubmitExplanation::derive(Some(date(2024, 1, 10)), Some(date(2024, 1, 10)));
        assert_eq!(explanation, Some(SubmitExplanation::OnTime));
    }

    #[test]
    fn test_explanation_over_due() {
        let explanation =
            SubmitExplanation::derive(Some(date(2024, 1, 10)), Some(date(2024, 1, 12)));
        assert_eq!(explanation, Some(SubmitExplanation::OverDue));
    }

    #[test]
    fn test_explanation_ahead() {
        let explanation =
            SubmitExplanation::derive(Some(date(2024, 1, 10)), Some(date(2024, 1, 8)));
        assert_eq!(explanation, Some(SubmitExplanation::Ahead));
    }

    #[test]
    fn test_explanation_missing_dates() {
        assert_eq!(SubmitExplanation::derive(None, Some(date(2024, 1, 8))), None);
        assert_eq!(SubmitExplanation::derive(Some(date(2024, 1, 8)), None), None);
        assert_eq!(SubmitExplanation::derive(None, None), None);
    }

    #[test]
    fn test_explanation_strips_time_of_day() {
        // Same calendar day at different times still counts as On Time
        let target = Utc.with_ymd_and_hms(2024, 1, 10, 23, 59, 0).unwrap();
        let actual = Utc.with_ymd_and_hms(2024, 1, 10, 0, 1, 0).unwrap();
        assert_eq!(
            SubmitExplanation::derive(Some(target), Some(actual)),
            Some(SubmitExplanation::OnTime)
        );
    }
}

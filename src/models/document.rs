//! Document domain models: field areas, grouped views, and request DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::milestone::{MilestoneView, Stage, WorkStatus};

/// Geographic/organizational field tag, independent of project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FieldArea {
    Limau,
    #[serde(rename = "OK-RT")]
    OkRt,
    Prabumulih,
}

impl FieldArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limau => "Limau",
            Self::OkRt => "OK-RT",
            Self::Prabumulih => "Prabumulih",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Limau" => Some(Self::Limau),
            "OK-RT" => Some(Self::OkRt),
            "Prabumulih" => Some(Self::Prabumulih),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target dates for one stage, supplied at document creation.
#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
pub struct StageTargets {
    #[serde(default)]
    pub target_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub target_submit: Option<DateTime<Utc>>,
}

/// Request to create a document. The three milestone records are created
/// together in one transaction.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateDocumentRequest {
    /// Logical document name (required, max 255 chars).
    pub file_name: String,
    /// Field area tag.
    pub field: FieldArea,
    /// Document number (max 50 chars).
    #[serde(default)]
    pub document_number: Option<String>,
    /// Person in charge (max 100 chars, restricted charset).
    #[serde(default)]
    pub pic: Option<String>,
    /// Engineering discipline (max 100 chars).
    #[serde(default)]
    pub discipline: Option<String>,
    /// Target dates for the IFR stage.
    #[serde(default)]
    pub ifr: StageTargets,
    /// Target dates for the IFA stage.
    #[serde(default)]
    pub ifa: StageTargets,
    /// Target dates for the IFB stage.
    #[serde(default)]
    pub ifb: StageTargets,
}

impl CreateDocumentRequest {
    /// Targets for a given stage.
    pub fn targets(&self, stage: Stage) -> StageTargets {
        match stage {
            Stage::Ifr => self.ifr,
            Stage::Ifa => self.ifa,
            Stage::Ifb => self.ifb,
        }
    }
}

/// Request to edit a document's header info and one stage's target dates.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateDocumentInfoRequest {
    pub file_name: String,
    pub field: FieldArea,
    #[serde(default)]
    pub document_number: Option<String>,
    #[serde(default)]
    pub pic: Option<String>,
    #[serde(default)]
    pub discipline: Option<String>,
    /// Stage whose target dates are being edited (omit to leave targets alone).
    #[serde(default)]
    pub stage: Option<Stage>,
    #[serde(default)]
    pub target_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub target_submit: Option<DateTime<Utc>>,
}

/// Shared header of a document group (identical across its milestone rows).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DocumentHeader {
    /// Document UUID.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Field area tag.
    pub field: FieldArea,
    /// Logical document name.
    pub file_name: String,
    /// Document number.
    pub document_number: Option<String>,
    /// Person in charge.
    pub pic: Option<String>,
    /// Engineering discipline.
    pub discipline: Option<String>,
}

/// One document with its milestone slots, as rendered in the tracking table.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DocumentGroup {
    #[serde(flatten)]
    pub header: DocumentHeader,
    /// IFR milestone (null when filtered out or missing).
    pub ifr: Option<MilestoneView>,
    /// IFA milestone.
    pub ifa: Option<MilestoneView>,
    /// IFB milestone.
    pub ifb: Option<MilestoneView>,
}

/// Collapsed one-row-per-document summary used for print/export.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecapRow {
    pub field: FieldArea,
    pub document_number: Option<String>,
    pub file_name: String,
    pub pic: Option<String>,
    pub discipline: Option<String>,
    pub status_ifr: WorkStatus,
    pub status_ifa: WorkStatus,
    pub status_ifb: WorkStatus,
}

/// Stage restriction filter: ALL or a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
pub enum StageFilter {
    #[default]
    #[serde(rename = "ALL")]
    All,
    #[serde(rename = "IFR")]
    Ifr,
    #[serde(rename = "IFA")]
    Ifa,
    #[serde(rename = "IFB")]
    Ifb,
}

impl StageFilter {
    /// Whether the given stage passes this filter.
    pub fn matches(&self, stage: Stage) -> bool {
        match self {
            Self::All => true,
            Self::Ifr => stage == Stage::Ifr,
            Self::Ifa => stage == Stage::Ifa,
            Self::Ifb => stage == Stage::Ifb,
        }
    }
}

/// Query parameters for the grouped document listing.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ListDocumentsQuery {
    /// Comma-separated field areas, or "all" (default) for no field filter.
    #[serde(default)]
    pub fields: Option<String>,
    /// PIC name to match exactly, or "all" (default).
    #[serde(default)]
    pub pic: Option<String>,
    /// Stage restriction (ALL | IFR | IFA | IFB).
    #[serde(default)]
    pub stage: StageFilter,
}

/// Response for the grouped document listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentGroup>,
    /// Number of groups after filtering.
    pub total: usize,
}

/// Response for the recap view.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecapResponse {
    pub rows: Vec<RecapRow>,
}

/// Distinct PIC names for the filter dropdown.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PicListResponse {
    pub pics: Vec<String>,
}

//! Field validation for document and project writes.
//!
//! Validation rejects before any write happens, with a single descriptive
//! message per failure. Optional fields are trimmed and empty strings
//! normalized to None.

use crate::error::{AppError, AppResult};
use crate::models::{CreateDocumentRequest, UpdateDocumentInfoRequest};

const FILE_NAME_MAX: usize = 255;
const PIC_MAX: usize = 100;
const DOCUMENT_NUMBER_MAX: usize = 50;
const DISCIPLINE_MAX: usize = 100;
const PROJECT_NAME_MAX: usize = 255;
const DESCRIPTION_MAX: usize = 1000;
const COMMENT_MAX: usize = 1000;

fn pic_char_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '\'' | '-' | '.')
}

/// Validate and normalize a document file name.
pub fn file_name(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("File name is required".to_string()));
    }
    if trimmed.chars().count() > FILE_NAME_MAX {
        return Err(AppError::InvalidInput(format!(
            "File name must be less than {} characters",
            FILE_NAME_MAX
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate and normalize a PIC name. Restricted to letters, digits,
/// whitespace, apostrophes, hyphens, and periods.
pub fn pic(raw: Option<&str>) -> AppResult<Option<String>> {
    let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > PIC_MAX {
        return Err(AppError::InvalidInput(format!(
            "PIC name must be less than {} characters",
            PIC_MAX
        )));
    }
    if !trimmed.chars().all(pic_char_allowed) {
        return Err(AppError::InvalidInput(
            "PIC contains invalid characters".to_string(),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

/// Validate and normalize a document number.
pub fn document_number(raw: Option<&str>) -> AppResult<Option<String>> {
    optional_bounded(raw, DOCUMENT_NUMBER_MAX, "Document number")
}

/// Validate and normalize a discipline tag.
pub fn discipline(raw: Option<&str>) -> AppResult<Option<String>> {
    optional_bounded(raw, DISCIPLINE_MAX, "Discipline")
}

/// Validate and normalize an approval comment.
pub fn approval_comment(raw: Option<&str>) -> AppResult<Option<String>> {
    optional_bounded(raw, COMMENT_MAX, "Comment")
}

/// Validate and normalize a project name.
pub fn project_name(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("Project name is required".to_string()));
    }
    if trimmed.chars().count() > PROJECT_NAME_MAX {
        return Err(AppError::InvalidInput(format!(
            "Project name must be less than {} characters",
            PROJECT_NAME_MAX
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate and normalize a project description.
pub fn description(raw: Option<&str>) -> AppResult<Option<String>> {
    optional_bounded(raw, DESCRIPTION_MAX, "Description")
}

fn optional_bounded(raw: Option<&str>, max: usize, label: &str) -> AppResult<Option<String>> {
    let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > max {
        return Err(AppError::InvalidInput(format!(
            "{} must be less than {} characters",
            label, max
        )));
    }
    Ok(Some(trimmed.to_string()))
}

/// Normalize a document-creation request in place, rejecting invalid fields.
pub fn normalize_create_document(req: &mut CreateDocumentRequest) -> AppResult<()> {
    req.file_name = file_name(&req.file_name)?;
    req.pic = pic(req.pic.as_deref())?;
    req.document_number = document_number(req.document_number.as_deref())?;
    req.discipline = discipline(req.discipline.as_deref())?;
    Ok(())
}

/// Normalize a document-info edit in place, rejecting invalid fields.
pub fn normalize_update_document(req: &mut UpdateDocumentInfoRequest) -> AppResult<()> {
    req.file_name = file_name(&req.file_name)?;
    req.pic = pic(req.pic.as_deref())?;
    req.document_number = document_number(req.document_number.as_deref())?;
    req.discipline = discipline(req.discipline.as_deref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_required() {
        assert!(file_name("").is_err());
        assert!(file_name("   ").is_err());
        assert_eq!(file_name("  spec.pdf  ").unwrap(), "spec.pdf");
    }

    #[test]
    fn test_file_name_length_limit() {
        let long = "x".repeat(256);
        assert!(file_name(&long).is_err());
        let ok = "x".repeat(255);
        assert_eq!(file_name(&ok).unwrap(), ok);
    }

    #[test]
    fn test_pic_charset() {
        assert_eq!(pic(Some("Dwi Ayu S.")).unwrap().as_deref(), Some("Dwi Ayu S."));
        assert_eq!(pic(Some("O'Neil-Jr")).unwrap().as_deref(), Some("O'Neil-Jr"));
        assert!(pic(Some("Eka <script>")).is_err());
        assert!(pic(Some("budi;drop")).is_err());
    }

    #[test]
    fn test_pic_empty_normalizes_to_none() {
        assert_eq!(pic(None).unwrap(), None);
        assert_eq!(pic(Some("")).unwrap(), None);
        assert_eq!(pic(Some("   ")).unwrap(), None);
    }

    #[test]
    fn test_document_number_limit() {
        let long = "9".repeat(51);
        assert!(document_number(Some(&long)).is_err());
        assert_eq!(
            document_number(Some(" DOC-042 ")).unwrap().as_deref(),
            Some("DOC-042")
        );
    }

    #[test]
    fn test_comment_limit() {
        let long = "c".repeat(1001);
        assert!(approval_comment(Some(&long)).is_err());
        assert_eq!(approval_comment(Some("too vague")).unwrap().as_deref(), Some("too vague"));
    }

    #[test]
    fn test_project_name_required() {
        assert!(project_name(" ").is_err());
        assert_eq!(project_name(" GP Area 2 ").unwrap(), "GP Area 2");
    }
}

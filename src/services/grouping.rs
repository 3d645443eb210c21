//! Document grouping, filtering, and recap derivation.
//!
//! Pure functions over fetched rows: the tracking table shows one group per
//! document with up to three milestone rows, the recap collapses each
//! document to a single line. Both views share the same sort order.

use crate::entity::{document, milestone_record};
use crate::models::{
    ApprovalStatus, DocumentGroup, DocumentHeader, FieldArea, ListDocumentsQuery, MilestoneView,
    RecapRow, Stage, SubmitExplanation, WorkStatus,
};

/// Field-area filter parsed from the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFilter {
    /// The "all" sentinel: no field restriction.
    All,
    /// Restrict to the given areas.
    Selected(Vec<FieldArea>),
}

impl FieldFilter {
    /// Parse a comma-separated field list. "all" anywhere in the list, an
    /// empty list, and a missing parameter all short-circuit to no filter;
    /// unknown tokens are ignored.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::All;
        };

        let mut selected = Vec::new();
        for token in raw.split(',') {
            let token = token.trim();
            if token.eq_ignore_ascii_case("all") {
                return Self::All;
            }
            if let Some(field) = FieldArea::parse(token) {
                if !selected.contains(&field) {
                    selected.push(field);
                }
            }
        }

        if selected.is_empty() {
            Self::All
        } else {
            Self::Selected(selected)
        }
    }

    /// Whether a document with the given field passes the filter.
    pub fn matches(&self, field: FieldArea) -> bool {
        match self {
            Self::All => true,
            Self::Selected(fields) => fields.contains(&field),
        }
    }
}

/// Convert a stored milestone row into its API view, deriving the submit
/// explanation on the way.
pub fn milestone_view(record: &milestone_record::Model) -> MilestoneView {
    MilestoneView {
        id: record.id,
        stage: Stage::parse(&record.stage).unwrap_or(Stage::Ifr),
        status_description: WorkStatus::parse(&record.status_description).unwrap_or_default(),
        target_start: record.target_start,
        actual_start: record.actual_start,
        target_submit: record.target_submit,
        actual_submit: record.actual_submit,
        submit_explanation: SubmitExplanation::derive(record.target_submit, record.actual_submit),
        approval_status: ApprovalStatus::parse(&record.approval_status).unwrap_or_default(),
        approval_comment: record.approval_comment.clone(),
    }
}

fn header(doc: &document::Model) -> DocumentHeader {
    DocumentHeader {
        id: doc.id,
        project_id: doc.project_id,
        field: FieldArea::parse(&doc.field).unwrap_or(FieldArea::Prabumulih),
        file_name: doc.file_name.clone(),
        document_number: doc.document_number.clone(),
        pic: doc.pic.clone(),
        discipline: doc.discipline.clone(),
    }
}

/// Sort key shared by the tracking table and the recap: PIC ascending
/// case-insensitive, then file name ascending case-insensitive.
fn sort_key(pic: Option<&str>, file_name: &str) -> (String, String) {
    (
        pic.unwrap_or_default().to_lowercase(),
        file_name.to_lowercase(),
    )
}

/// Group fetched rows into the tracking-table view, applying the filters.
///
/// The field and PIC filters decide which groups appear; the stage filter
/// only decides which milestone slots are populated within each group.
pub fn group_documents(
    rows: &[(document::Model, Vec<milestone_record::Model>)],
    query: &ListDocumentsQuery,
) -> Vec<DocumentGroup> {
    let field_filter = FieldFilter::parse(query.fields.as_deref());
    let pic_filter = query
        .pic
        .as_deref()
        .filter(|p| !p.eq_ignore_ascii_case("all"));

    let mut groups: Vec<DocumentGroup> = rows
        .iter()
        .filter(|(doc, _)| {
            let field = FieldArea::parse(&doc.field).unwrap_or(FieldArea::Prabumulih);
            field_filter.matches(field)
        })
        .filter(|(doc, _)| match pic_filter {
            Some(pic) => doc.pic.as_deref() == Some(pic),
            None => true,
        })
        .map(|(doc, records)| {
            let mut group = DocumentGroup {
                header: header(doc),
                ifr: None,
                ifa: None,
                ifb: None,
            };
            for record in records {
                let Some(stage) = Stage::parse(&record.stage) else {
                    continue;
                };
                if !query.stage.matches(stage) {
                    continue;
                }
                let view = milestone_view(record);
                match stage {
                    Stage::Ifr => group.ifr = Some(view),
                    Stage::Ifa => group.ifa = Some(view),
                    Stage::Ifb => group.ifb = Some(view),
                }
            }
            group
        })
        .collect();

    groups.sort_by_key(|g| sort_key(g.header.pic.as_deref(), &g.header.file_name));
    groups
}

/// Collapse each document to one recap row. A missing milestone row reports
/// Not Yet, matching a record that was never touched.
pub fn recap(rows: &[(document::Model, Vec<milestone_record::Model>)]) -> Vec<RecapRow> {
    let mut recap_rows: Vec<RecapRow> = rows
        .iter()
        .map(|(doc, records)| {
            let status_for = |stage: Stage| {
                records
                    .iter()
                    .find(|r| Stage::parse(&r.stage) == Some(stage))
                    .and_then(|r| WorkStatus::parse(&r.status_description))
                    .unwrap_or(WorkStatus::NotYet)
            };

            RecapRow {
                field: FieldArea::parse(&doc.field).unwrap_or(FieldArea::Prabumulih),
                document_number: doc.document_number.clone(),
                file_name: doc.file_name.clone(),
                pic: doc.pic.clone(),
                discipline: doc.discipline.clone(),
                status_ifr: status_for(Stage::Ifr),
                status_ifa: status_for(Stage::Ifa),
                status_ifb: status_for(Stage::Ifb),
            }
        })
        .collect();

    recap_rows.sort_by_key(|r| sort_key(r.pic.as_deref(), &r.file_name));
    recap_rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StageFilter;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn doc(file_name: &str, pic: Option<&str>, field: &str) -> document::Model {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        document::Model {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            field: field.to_string(),
            file_name: file_name.to_string(),
            document_number: None,
            pic: pic.map(|s| s.to_string()),
            discipline: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn record(document_id: Uuid, stage: &str, status: &str) -> milestone_record::Model {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        milestone_record::Model {
            id: Uuid::new_v4(),
            document_id,
            stage: stage.to_string(),
            status_description: status.to_string(),
            target_start: None,
            actual_start: None,
            target_submit: None,
            actual_submit: None,
            approval_status: "Pending".to_string(),
            approval_comment: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn full_rows(
        file_name: &str,
        pic: Option<&str>,
        field: &str,
    ) -> (document::Model, Vec<milestone_record::Model>) {
        let d = doc(file_name, pic, field);
        let records = vec![
            record(d.id, "IFR", "Not Yet"),
            record(d.id, "IFA", "Not Yet"),
            record(d.id, "IFB", "Not Yet"),
        ];
        (d, records)
    }

    #[test]
    fn test_three_records_collapse_into_one_group() {
        let rows = vec![full_rows("P&ID-001.pdf", Some("Eka"), "Limau")];
        let groups = group_documents(&rows, &ListDocumentsQuery::default());

        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert!(group.ifr.is_some());
        assert!(group.ifa.is_some());
        assert!(group.ifb.is_some());
    }

    #[test]
    fn test_missing_ifb_yields_empty_slot() {
        let d = doc("spec.pdf", Some("Eka"), "Limau");
        let records = vec![record(d.id, "IFR", "Start"), record(d.id, "IFA", "Not Yet")];
        let groups = group_documents(&[(d, records)], &ListDocumentsQuery::default());

        assert_eq!(groups.len(), 1);
        assert!(groups[0].ifr.is_some());
        assert!(groups[0].ifa.is_some());
        assert!(groups[0].ifb.is_none());
    }

    #[test]
    fn test_stage_filter_restricts_slots_not_groups() {
        let rows = vec![full_rows("spec.pdf", Some("Eka"), "Limau")];
        let query = ListDocumentsQuery {
            stage: StageFilter::Ifa,
            ..Default::default()
        };
        let groups = group_documents(&rows, &query);

        assert_eq!(groups.len(), 1);
        assert!(groups[0].ifr.is_none());
        assert!(groups[0].ifa.is_some());
        assert!(groups[0].ifb.is_none());
    }

    #[test]
    fn test_field_filter_all_sentinel() {
        assert_eq!(FieldFilter::parse(None), FieldFilter::All);
        assert_eq!(FieldFilter::parse(Some("all")), FieldFilter::All);
        assert_eq!(FieldFilter::parse(Some("Limau,all")), FieldFilter::All);
        assert_eq!(FieldFilter::parse(Some("")), FieldFilter::All);
        assert_eq!(
            FieldFilter::parse(Some("Limau,OK-RT")),
            FieldFilter::Selected(vec![FieldArea::Limau, FieldArea::OkRt])
        );
    }

    #[test]
    fn test_field_filter_selects_groups() {
        let rows = vec![
            full_rows("a.pdf", Some("Eka"), "Limau"),
            full_rows("b.pdf", Some("Eka"), "Prabumulih"),
        ];
        let query = ListDocumentsQuery {
            fields: Some("Limau".to_string()),
            ..Default::default()
        };
        let groups = group_documents(&rows, &query);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].header.file_name, "a.pdf");
    }

    #[test]
    fn test_pic_filter_exact_match() {
        let rows = vec![
            full_rows("a.pdf", Some("Eka"), "Limau"),
            full_rows("b.pdf", Some("Budi"), "Limau"),
            full_rows("c.pdf", None, "Limau"),
        ];
        let query = ListDocumentsQuery {
            pic: Some("Budi".to_string()),
            ..Default::default()
        };
        let groups = group_documents(&rows, &query);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].header.file_name, "b.pdf");

        // "all" sentinel keeps everything
        let query = ListDocumentsQuery {
            pic: Some("all".to_string()),
            ..Default::default()
        };
        assert_eq!(group_documents(&rows, &query).len(), 3);
    }

    #[test]
    fn test_sort_by_pic_then_file_name_case_insensitive() {
        let rows = vec![
            full_rows("zeta.pdf", Some("Eka"), "Limau"),
            full_rows("Alpha.pdf", Some("Eka"), "Limau"),
            full_rows("m.pdf", Some("budi"), "Limau"),
        ];
        let groups = group_documents(&rows, &ListDocumentsQuery::default());

        let names: Vec<&str> = groups.iter().map(|g| g.header.file_name.as_str()).collect();
        assert_eq!(names, vec!["m.pdf", "Alpha.pdf", "zeta.pdf"]);
    }

    #[test]
    fn test_recap_missing_stage_reports_not_yet() {
        let d = doc("spec.pdf", Some("Eka"), "OK-RT");
        let records = vec![
            record(d.id, "IFR", "Complete"),
            record(d.id, "IFA", "In-Progress"),
        ];
        let rows = recap(&[(d, records)]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status_ifr, WorkStatus::Complete);
        assert_eq!(rows[0].status_ifa, WorkStatus::InProgress);
        assert_eq!(rows[0].status_ifb, WorkStatus::NotYet);
    }

    #[test]
    fn test_recap_sorted_like_the_table() {
        let rows = vec![
            full_rows("zeta.pdf", Some("Eka"), "Limau"),
            full_rows("Alpha.pdf", Some("Eka"), "Limau"),
        ];
        let recap_rows = recap(&rows);
        assert_eq!(recap_rows[0].file_name, "Alpha.pdf");
        assert_eq!(recap_rows[1].file_name, "zeta.pdf");
    }
}

//! View scenarios: header edits observed across stages, grouped listing,
//! and the derived submit explanation.

use chrono::{Duration, TimeZone, Utc};

use doctrack_lib::models::{ListDocumentsQuery, Stage, StageFilter, SubmitExplanation, WorkStatus};
use doctrack_lib::services::grouping;

use crate::helpers::{new_document, record_for};

#[test]
fn test_header_edit_observed_from_every_stage_view() {
    let (mut doc, records) = new_document("spec.pdf", Some("Eka"), "Limau");

    // The reviewer edit dialog changes the PIC once on the document
    doc.pic = Some("Budi".to_string());

    let rows = vec![(doc, records)];
    let groups = grouping::group_documents(&rows, &ListDocumentsQuery::default());
    assert_eq!(groups[0].header.pic.as_deref(), Some("Budi"));

    // The recap sees the same header
    let recap = grouping::recap(&rows);
    assert_eq!(recap[0].pic.as_deref(), Some("Budi"));
}

#[test]
fn test_grouped_view_derives_explanation_per_stage() {
    let (doc, mut records) = new_document("spec.pdf", Some("Eka"), "Limau");
    let target = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();

    {
        let ifr = record_for(&mut records, Stage::Ifr);
        ifr.target_submit = Some(target);
        ifr.actual_submit = Some(target + Duration::days(2));
    }
    {
        let ifa = record_for(&mut records, Stage::Ifa);
        ifa.target_submit = Some(target);
        ifa.actual_submit = Some(target);
    }

    let rows = vec![(doc, records)];
    let groups = grouping::group_documents(&rows, &ListDocumentsQuery::default());
    let group = &groups[0];

    assert_eq!(
        group.ifr.as_ref().unwrap().submit_explanation,
        Some(SubmitExplanation::OverDue)
    );
    assert_eq!(
        group.ifa.as_ref().unwrap().submit_explanation,
        Some(SubmitExplanation::OnTime)
    );
    // IFB has neither date: no explanation
    assert_eq!(group.ifb.as_ref().unwrap().submit_explanation, None);
}

#[test]
fn test_stage_filter_keeps_group_with_empty_slots() {
    let (doc, records) = new_document("spec.pdf", Some("Eka"), "Limau");
    let rows = vec![(doc, records)];

    let query = ListDocumentsQuery {
        stage: StageFilter::Ifb,
        ..Default::default()
    };
    let groups = grouping::group_documents(&rows, &query);

    assert_eq!(groups.len(), 1);
    assert!(groups[0].ifr.is_none());
    assert!(groups[0].ifa.is_none());
    assert_eq!(
        groups[0].ifb.as_ref().unwrap().status_description,
        WorkStatus::NotYet
    );
}

#[test]
fn test_listing_and_recap_share_sort_order() {
    let rows = vec![
        new_document("zeta.pdf", Some("Eka"), "Limau"),
        new_document("Alpha.pdf", Some("eka"), "Limau"),
        new_document("beta.pdf", Some("Budi"), "Limau"),
    ];

    let groups = grouping::group_documents(&rows, &ListDocumentsQuery::default());
    let group_order: Vec<&str> = groups.iter().map(|g| g.header.file_name.as_str()).collect();

    let recap = grouping::recap(&rows);
    let recap_order: Vec<&str> = recap.iter().map(|r| r.file_name.as_str()).collect();

    assert_eq!(group_order, vec!["beta.pdf", "Alpha.pdf", "zeta.pdf"]);
    assert_eq!(group_order, recap_order);
}

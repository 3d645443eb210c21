//! Escalation scenarios: the spec's end-to-end flow, the 24-hour boundary,
//! and idempotence.

use chrono::Duration;

use doctrack_lib::models::{Stage, WorkStatus};
use doctrack_lib::services::workflow;

use crate::helpers::{apply_fields, epoch, new_document, record_for, run_sweep};

fn threshold() -> Duration {
    Duration::hours(24)
}

#[test]
fn test_start_ifr_sweep_after_25h_promotes_only_ifr() {
    let (_doc, mut records) = new_document("spec.pdf", Some("Eka"), "Prabumulih");
    let started = epoch();

    let ifr = record_for(&mut records, Stage::Ifr);
    apply_fields(ifr, workflow::start_ticket(WorkStatus::NotYet, started).unwrap());

    let now = started + Duration::hours(25);
    let (ifr_count, ifa_count, ifb_count, total) = run_sweep(&mut records, now, threshold());

    assert_eq!((ifr_count, ifa_count, ifb_count, total), (1, 0, 0, 1));
    assert_eq!(record_for(&mut records, Stage::Ifr).status_description, "In-Progress");
    assert_eq!(record_for(&mut records, Stage::Ifa).status_description, "Not Yet");
    assert_eq!(record_for(&mut records, Stage::Ifb).status_description, "Not Yet");
}

#[test]
fn test_sweep_is_idempotent() {
    let (_doc, mut records) = new_document("spec.pdf", Some("Eka"), "Prabumulih");
    let started = epoch();

    let ifr = record_for(&mut records, Stage::Ifr);
    apply_fields(ifr, workflow::start_ticket(WorkStatus::NotYet, started).unwrap());

    let now = started + Duration::hours(30);
    let (_, _, _, first_total) = run_sweep(&mut records, now, threshold());
    assert_eq!(first_total, 1);

    let snapshot: Vec<String> = records.iter().map(|r| r.status_description.clone()).collect();
    let (_, _, _, second_total) = run_sweep(&mut records, now, threshold());
    let after: Vec<String> = records.iter().map(|r| r.status_description.clone()).collect();

    assert_eq!(second_total, 0);
    assert_eq!(snapshot, after);
}

#[test]
fn test_sweep_boundary_23h59_untouched_24h01_promoted() {
    let (_doc, mut records) = new_document("spec.pdf", Some("Eka"), "Prabumulih");
    let started = epoch();

    let ifb = record_for(&mut records, Stage::Ifb);
    apply_fields(ifb, workflow::start_ticket(WorkStatus::NotYet, started).unwrap());

    // 23h59m: untouched
    let now = started + Duration::hours(23) + Duration::minutes(59);
    let (_, _, _, total) = run_sweep(&mut records, now, threshold());
    assert_eq!(total, 0);
    assert_eq!(record_for(&mut records, Stage::Ifb).status_description, "Start");

    // 24h + 1s: promoted
    let now = started + Duration::hours(24) + Duration::seconds(1);
    let (ifr_count, ifa_count, ifb_count, total) = run_sweep(&mut records, now, threshold());
    assert_eq!((ifr_count, ifa_count, ifb_count, total), (0, 0, 1, 1));
    assert_eq!(record_for(&mut records, Stage::Ifb).status_description, "In-Progress");
}

#[test]
fn test_sweep_skips_manually_advanced_records() {
    let (_doc, mut records) = new_document("spec.pdf", Some("Eka"), "Prabumulih");
    let started = epoch();

    // Started, then manually completed before the dwell elapsed
    let ifr = record_for(&mut records, Stage::Ifr);
    apply_fields(ifr, workflow::start_ticket(WorkStatus::NotYet, started).unwrap());
    ifr.status_description = "Complete".to_string();

    let now = started + Duration::days(7);
    let (_, _, _, total) = run_sweep(&mut records, now, threshold());
    assert_eq!(total, 0);
    assert_eq!(record_for(&mut records, Stage::Ifr).status_description, "Complete");
}

#[test]
fn test_stage_failures_would_not_mask_other_stages() {
    // Two documents with stale Start records in different stages: each stage
    // pass counts independently, so one stage's outcome never hides another's.
    let (_d1, mut r1) = new_document("a.pdf", Some("Eka"), "Limau");
    let (_d2, mut r2) = new_document("b.pdf", Some("Eka"), "Limau");
    let started = epoch();

    apply_fields(
        record_for(&mut r1, Stage::Ifr),
        workflow::start_ticket(WorkStatus::NotYet, started).unwrap(),
    );
    apply_fields(
        record_for(&mut r2, Stage::Ifa),
        workflow::start_ticket(WorkStatus::NotYet, started).unwrap(),
    );

    let mut all: Vec<_> = r1.into_iter().chain(r2).collect();
    let now = started + Duration::hours(26);
    let (ifr_count, ifa_count, ifb_count, total) = run_sweep(&mut all, now, threshold());

    assert_eq!(ifr_count, 1);
    assert_eq!(ifa_count, 1);
    assert_eq!(ifb_count, 0);
    assert_eq!(total, 2);
}

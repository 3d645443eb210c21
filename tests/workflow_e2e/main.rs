//! End-to-end scenario tests for the document workflow core.
//!
//! These drive the same write-boundary functions the HTTP handlers call,
//! against in-memory records, so the full lifecycle (create, start ticket,
//! escalate, approve, view) is exercised without a database.

mod helpers;
mod test_escalation;
mod test_lifecycle;
mod test_views;

//! Escalation service: promotes stale Start records to In-Progress.
//!
//! A ticket left in Start for more than the dwell threshold (24 hours by
//! default) is considered in progress whether or not anyone edited it. The
//! sweep runs one bulk update per stage so a failure in one stage never
//! blocks the others; promoted rows drop out of the predicate, so re-running
//! is a no-op and at-least-once scheduling is safe.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::time::interval;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::models::Stage;

/// Configuration for the escalation service.
#[derive(Clone)]
pub struct EscalationConfig {
    /// Dwell time before a Start status is promoted, in hours.
    pub threshold_hours: u64,
    /// How often to run the sweep (in seconds).
    pub interval_secs: u64,
}

/// Per-stage promotion counts from one sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SweepSummary {
    pub updated_ifr: u64,
    pub updated_ifa: u64,
    pub updated_ifb: u64,
    pub total: u64,
}

impl SweepSummary {
    fn record(&mut self, stage: Stage, count: u64) {
        match stage {
            Stage::Ifr => self.updated_ifr = count,
            Stage::Ifa => self.updated_ifa = count,
            Stage::Ifb => self.updated_ifb = count,
        }
        self.total += count;
    }
}

/// Start the escalation background task.
///
/// Spawns a tokio task that periodically promotes stale Start records.
pub fn start_escalation_task(pool: Arc<DbPool>, config: EscalationConfig) {
    tokio::spawn(async move {
        info!(
            "Starting escalation service (threshold: {} hours, interval: {} seconds)",
            config.threshold_hours, config.interval_secs
        );

        let mut ticker = interval(Duration::from_secs(config.interval_secs));

        loop {
            ticker.tick().await;

            let summary = run_sweep(&pool, config.threshold_hours).await;
            if summary.total > 0 {
                info!(
                    "Escalation sweep promoted {} records (IFR: {}, IFA: {}, IFB: {})",
                    summary.total, summary.updated_ifr, summary.updated_ifa, summary.updated_ifb
                );
            }
        }
    });
}

/// Run a single sweep across all three stages.
///
/// Errors are logged per stage, not returned: the next scheduled run picks
/// up whatever this one missed.
pub async fn run_sweep(pool: &DbPool, threshold_hours: u64) -> SweepSummary {
    let cutoff = Utc::now() - chrono::Duration::hours(threshold_hours as i64);
    let mut summary = SweepSummary::default();

    for stage in Stage::ALL {
        match pool.promote_stale_milestones(stage, cutoff).await {
            Ok(count) => summary.record(stage, count),
            Err(e) => error!("Escalation sweep failed for {}: {}", stage, e),
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_records_per_stage() {
        let mut summary = SweepSummary::default();
        summary.record(Stage::Ifr, 3);
        summary.record(Stage::Ifa, 0);
        summary.record(Stage::Ifb, 2);

        assert_eq!(summary.updated_ifr, 3);
        assert_eq!(summary.updated_ifa, 0);
        assert_eq!(summary.updated_ifb, 2);
        assert_eq!(summary.total, 5);
    }

    #[test]
    fn test_empty_sweep_totals_zero() {
        let mut summary = SweepSummary::default();
        for stage in Stage::ALL {
            summary.record(stage, 0);
        }
        assert_eq!(summary, SweepSummary::default());
    }
}

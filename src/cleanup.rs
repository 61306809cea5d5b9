//! Retention cleanup for past bookings.
//!
//! Past bookings older than the retention window are archived with
//! `deleted_by = NULL`, which distinguishes system-initiated archival from a
//! customer or admin doing it. Runs from the `cleanup-bookings` CLI
//! subcommand and, when enabled, from an in-process cron job. Re-running
//! after a successful pass finds nothing new: archived rows are excluded by
//! the `is_deleted = 0` filter.

use sqlx::SqlitePool;
use time::OffsetDateTime;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use chefbook_booking::retention_cutoff;

use crate::config::BookingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub eligible: u64,
    pub archived: u64,
    pub dry_run: bool,
}

/// Archive every non-deleted booking scheduled before `now - retention_days`.
///
/// A dry run reports the eligible count without mutating anything.
pub async fn run(
    pool: &SqlitePool,
    retention_days: u32,
    dry_run: bool,
    now: OffsetDateTime,
) -> anyhow::Result<CleanupReport> {
    let cutoff = retention_cutoff(now, retention_days);

    let eligible: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM bookings
         WHERE is_deleted = 0 AND (date < ?1 OR (date = ?1 AND time < ?2))",
    )
    .bind(cutoff.date_string())
    .bind(cutoff.time_string())
    .fetch_one(pool)
    .await?;

    if dry_run {
        tracing::info!(
            eligible,
            retention_days,
            "Dry run: {} booking(s) eligible for cleanup",
            eligible
        );
        return Ok(CleanupReport {
            eligible: eligible as u64,
            archived: 0,
            dry_run: true,
        });
    }

    let result = sqlx::query(
        "UPDATE bookings SET is_deleted = 1, deleted_at = ?1, deleted_by = NULL
         WHERE is_deleted = 0 AND (date < ?2 OR (date = ?2 AND time < ?3))",
    )
    .bind(now.unix_timestamp())
    .bind(cutoff.date_string())
    .bind(cutoff.time_string())
    .execute(pool)
    .await?;

    let archived = result.rows_affected();
    tracing::info!(archived, retention_days, "Soft-deleted {} booking(s)", archived);

    Ok(CleanupReport {
        eligible: eligible as u64,
        archived,
        dry_run: false,
    })
}

/// Periodic cleanup job running inside the server process.
pub async fn scheduler(
    pool: &SqlitePool,
    config: &BookingConfig,
) -> Result<JobScheduler, JobSchedulerError> {
    let sched = JobScheduler::new().await?;
    let pool = pool.clone();
    let retention_days = config.retention_days;

    sched
        .add(Job::new_async(
            config.cleanup_schedule.as_str(),
            move |uuid, mut l| {
                let pool = pool.clone();

                Box::pin(async move {
                    if let Err(err) = run(&pool, retention_days, false, OffsetDateTime::now_utc())
                        .await
                    {
                        tracing::error!(err = %err, "failed to clean up past bookings");
                    }

                    if let Err(err) = l.next_tick_for_job(uuid).await {
                        tracing::error!(err = %err, "failed to get next tick for booking cleanup");
                    }
                })
            },
        )?)
        .await?;

    Ok(sched)
}

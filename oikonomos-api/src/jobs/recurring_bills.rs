use crate::database::{pending_transactions, scheduled_transactions as bills_db, AsyncDbConnection};
use crate::helpers::dates::{add_one_month, parse_date};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use shared_types::JobReport;
use std::collections::HashSet;

/// Account choices older than this are dropped
pub const PENDING_TTL_SECS: i64 = 24 * 60 * 60;

pub struct RecurringBillsJob {
    db_conn: AsyncDbConnection,
}

impl RecurringBillsJob {
    pub fn new(db_conn: AsyncDbConnection) -> Self {
        Self { db_conn }
    }

    /// Creates next month's occurrence of every paid recurring bill
    pub async fn run(&self, now: DateTime<Utc>) -> Result<JobReport> {
        let mut report = JobReport::new("recurring-bills");
        let due = bills_db::list_due_for_reschedule(self.db_conn.clone()).await?;

        let users: HashSet<i64> = due.iter().map(|b| b.user_id).collect();
        report.users_processed = users.len();

        for bill in &due {
            let next = parse_date(&bill.due_date).and_then(|date| {
                add_one_month(date).ok_or_else(|| anyhow!("no month after {}", bill.due_date))
            });

            let result = match next {
                Ok(next) => {
                    let next = next.format("%Y-%m-%d").to_string();
                    bills_db::reschedule(self.db_conn.clone(), bill, &next).await
                }
                Err(e) => Err(e),
            };

            match result {
                Ok(created) => {
                    tracing::debug!(
                        "Rescheduled bill {} ({}) to {}",
                        bill.id,
                        bill.description,
                        created.due_date
                    );
                    report.records_created += 1;
                }
                Err(e) => {
                    tracing::warn!("Could not reschedule bill {}: {:#}", bill.id, e);
                    report.records_skipped += 1;
                    report.errors.push(format!("bill {}: {}", bill.id, e));
                }
            }
        }

        let purged = pending_transactions::purge_older_than(
            self.db_conn.clone(),
            now.timestamp() - PENDING_TTL_SECS,
        )
        .await?;
        if purged > 0 {
            tracing::info!("Purged {} expired account selections", purged);
        }

        tracing::info!(
            "Recurring bills: {} rescheduled, {} failed",
            report.records_created,
            report.records_skipped
        );
        Ok(report)
    }
}

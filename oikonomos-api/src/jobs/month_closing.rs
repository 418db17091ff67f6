use crate::database::{accounts, transactions, users, AsyncDbConnection};
use crate::helpers::dates::{format_period, local_today, month_bounds, previous_month};
use crate::helpers::money::format_brl;
use crate::integrations::TelegramApi;
use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use shared_types::{Account, JobReport, TransactionKind, User};
use std::collections::HashMap;
use std::sync::Arc;

/// Snapshots every account balance at the end of a month
pub struct MonthClosingJob {
    db_conn: AsyncDbConnection,
    telegram: Option<Arc<dyn TelegramApi>>,
    tz: Tz,
}

impl MonthClosingJob {
    /// Without a Telegram client no summaries are sent
    pub fn new(db_conn: AsyncDbConnection, telegram: Option<Arc<dyn TelegramApi>>, tz: Tz) -> Self {
        Self {
            db_conn,
            telegram,
            tz,
        }
    }

    /// Closes `period` (year, month), or the month before `now` when absent
    pub async fn run(&self, period: Option<(i32, u32)>, now: DateTime<Utc>) -> Result<JobReport> {
        let (year, month) = period.unwrap_or_else(|| previous_month(local_today(now, self.tz)));
        let label = format_period(year, month);
        let (start, end) = month_bounds(year, month, self.tz)?;

        let mut report = JobReport::new("month-closing");
        let mut by_user: HashMap<i64, Vec<Account>> = HashMap::new();
        for account in accounts::list_all_accounts(self.db_conn.clone()).await? {
            by_user.entry(account.user_id).or_default().push(account);
        }

        for user in users::list_users(self.db_conn.clone()).await? {
            let Some(owned) = by_user.get(&user.id) else {
                continue;
            };
            report.users_processed += 1;

            let mut created = 0;
            for account in owned {
                match transactions::insert_closing(self.db_conn.clone(), account, &label, end - 1).await {
                    Ok(true) => created += 1,
                    Ok(false) => report.records_skipped += 1,
                    Err(e) => {
                        tracing::warn!("Closing account {} for {} failed: {:#}", account.id, label, e);
                        report.errors.push(format!("account {}: {}", account.id, e));
                    }
                }
            }
            report.records_created += created;

            // a re-run that created nothing has already notified the user
            if created == 0 {
                continue;
            }
            let (Some(telegram), Some(chat_id)) = (&self.telegram, user.telegram_chat_id) else {
                continue;
            };

            let sent = match self.summary(&user, owned, &label, start, end).await {
                Ok(text) => telegram.send_message(chat_id, &text, None).await,
                Err(e) => Err(e),
            };
            match sent {
                Ok(()) => report.notifications_sent += 1,
                Err(e) => {
                    tracing::warn!("Could not send closing summary to user {}: {:#}", user.id, e);
                    report.errors.push(format!("user {}: {}", user.id, e));
                }
            }
        }

        tracing::info!(
            "Month closing {}: {} records created, {} already closed, {} notifications",
            label,
            report.records_created,
            report.records_skipped,
            report.notifications_sent
        );
        Ok(report)
    }

    async fn summary(
        &self,
        user: &User,
        owned: &[Account],
        label: &str,
        start: i64,
        end: i64,
    ) -> Result<String> {
        let income = transactions::sum_by_kind_between(
            self.db_conn.clone(),
            user.id,
            TransactionKind::Income,
            start,
            end,
        )
        .await?;
        let expenses = transactions::sum_by_kind_between(
            self.db_conn.clone(),
            user.id,
            TransactionKind::Expense,
            start,
            end,
        )
        .await?;

        Ok(summary_text(user, owned, label, income, expenses))
    }
}

fn summary_text(user: &User, owned: &[Account], label: &str, income: f64, expenses: f64) -> String {
    let net = income - expenses;
    let (year, month) = label.split_once('-').unwrap_or((label, ""));

    let mut lines = vec![
        format!("📒 Fechamento de {}/{}, {}", month, year, user.display_name()),
        String::new(),
        format!("💵 Rendas: {}", format_brl(income)),
        format!("💸 Despesas: {}", format_brl(expenses)),
        format!(
            "{} Resultado: {}",
            if net >= 0.0 { "📈" } else { "📉" },
            format_brl(net)
        ),
        String::new(),
        "🏦 Saldos:".to_string(),
    ];
    lines.extend(
        owned
            .iter()
            .map(|a| format!("• {}: {}", a.name, format_brl(a.balance))),
    );
    let total: f64 = owned.iter().map(|a| a.balance).sum();
    lines.push(format!("💰 Total: {}", format_brl(total)));

    lines.join("\n")
}

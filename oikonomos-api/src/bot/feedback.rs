//! Safe-to-spend numbers derived from a monthly category budget.

use crate::database::{budgets, transactions, AsyncDbConnection};
use crate::helpers::dates::{day_bounds, days_in_month, month_bounds};
use crate::helpers::money::{format_brl, percent};
use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub category: String,
    pub budget: f64,
    pub spent_month: f64,
    pub spent_today: f64,
    pub remaining: f64,
    /// Days left in the month, today included
    pub remaining_days: u32,
    pub daily_allowance: f64,
    pub weekly_allowance: f64,
    /// What can still be spent today if the rest of the month is spread evenly
    pub left_today: f64,
    pub exceeded: bool,
}

impl BudgetStatus {
    pub fn compute(
        category: &str,
        budget: f64,
        spent_month: f64,
        spent_today: f64,
        today: NaiveDate,
    ) -> Self {
        let remaining = budget - spent_month;
        let remaining_days = (days_in_month(today.year(), today.month()) - today.day() + 1).max(1);
        let days = remaining_days as f64;

        let daily_allowance = remaining.max(0.0) / days;
        let weekly_allowance = daily_allowance * remaining_days.min(7) as f64;
        let before_today = spent_month - spent_today;
        let left_today = (budget - before_today).max(0.0) / days - spent_today;

        Self {
            category: category.to_string(),
            budget,
            spent_month,
            spent_today,
            remaining,
            remaining_days,
            daily_allowance,
            weekly_allowance,
            left_today,
            exceeded: remaining < 0.0,
        }
    }

    /// Lines appended to an expense confirmation
    pub fn expense_feedback(&self) -> String {
        if self.exceeded {
            return format!(
                "⚠️ Orçamento de {} estourado em {} ({} de {}).",
                self.category,
                format_brl(-self.remaining),
                format_brl(self.spent_month),
                format_brl(self.budget)
            );
        }

        format!(
            "📊 {}: restam {} de {} no mês.\n💡 Dá para gastar {} por dia ou {} nos próximos {} dias.",
            self.category,
            format_brl(self.remaining),
            format_brl(self.budget),
            format_brl(self.daily_allowance),
            format_brl(self.weekly_allowance),
            self.remaining_days.min(7)
        )
    }

    /// One entry of `ver orçamentos`
    pub fn summary_line(&self) -> String {
        let head = format!(
            "• {}: {} de {} ({}%)",
            self.category,
            format_brl(self.spent_month),
            format_brl(self.budget),
            percent(self.spent_month, self.budget)
        );
        if self.exceeded {
            format!("{}\n   ⚠️ estourado em {}", head, format_brl(-self.remaining))
        } else {
            format!(
                "{}\n   restam {} ({} por dia)",
                head,
                format_brl(self.remaining),
                format_brl(self.daily_allowance)
            )
        }
    }

    /// One entry of `ver hoje`
    pub fn today_line(&self) -> String {
        if self.left_today >= 0.0 {
            format!("• {}: {}", self.category, format_brl(self.left_today))
        } else {
            format!(
                "• {}: limite de hoje ultrapassado em {}",
                self.category,
                format_brl(-self.left_today)
            )
        }
    }
}

/// Status for one budget row, reading this month's and today's spending
pub async fn status_for(
    db: &AsyncDbConnection,
    user_id: i64,
    category: &str,
    budget: f64,
    today: NaiveDate,
    tz: Tz,
) -> anyhow::Result<BudgetStatus> {
    let (month_start, month_end) = month_bounds(today.year(), today.month(), tz)?;
    let (day_start, day_end) = day_bounds(today, tz);

    let spent_month =
        transactions::category_total_between(db.clone(), user_id, category, month_start, month_end)
            .await?;
    let spent_today =
        transactions::category_total_between(db.clone(), user_id, category, day_start, day_end)
            .await?;

    Ok(BudgetStatus::compute(category, budget, spent_month, spent_today, today))
}

/// `None` when the category has no budget this month
pub async fn load(
    db: &AsyncDbConnection,
    user_id: i64,
    category: &str,
    today: NaiveDate,
    tz: Tz,
) -> anyhow::Result<Option<BudgetStatus>> {
    let budget =
        budgets::get_budget(db.clone(), user_id, category, today.year(), today.month()).await?;

    match budget {
        Some(budget) => Ok(Some(
            status_for(db, user_id, &budget.category_name, budget.amount, today, tz).await?,
        )),
        None => Ok(None),
    }
}

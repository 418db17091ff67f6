use super::feedback::{self, BudgetStatus};
use super::{Bot, BotError, Reply};
use crate::database::{budgets, categories, transactions};
use crate::helpers::dates::day_bounds;
use crate::helpers::money::format_brl;
use chrono::{DateTime, Datelike, Utc};
use commands::find_by_name;
use shared_types::{CategoryKind, TransactionKind, User};

impl Bot {
    pub(super) async fn list_categories(&self, user: &User) -> Result<Reply, BotError> {
        let all = categories::list_categories(self.db.clone(), user.id, None).await?;

        let mut sections = Vec::new();
        for (kind, title) in [
            (CategoryKind::Expense, "📂 Categorias de despesa:"),
            (CategoryKind::Income, "📂 Categorias de renda:"),
        ] {
            let mut lines = vec![title.to_string()];
            let names: Vec<_> = all.iter().filter(|c| c.kind == kind).collect();
            if names.is_empty() {
                lines.push("• (nenhuma)".to_string());
            }
            lines.extend(names.iter().map(|c| format!("• {}", c.name)));
            sections.push(lines.join("\n"));
        }

        Ok(Reply::text(sections.join("\n\n")))
    }

    async fn month_statuses(
        &self,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<Vec<BudgetStatus>, BotError> {
        let today = self.today(now);
        let month = budgets::list_budgets(self.db.clone(), user.id, today.year(), today.month()).await?;

        let mut statuses = Vec::with_capacity(month.len());
        for budget in &month {
            statuses.push(
                feedback::status_for(
                    &self.db,
                    user.id,
                    &budget.category_name,
                    budget.amount,
                    today,
                    self.tz,
                )
                .await?,
            );
        }
        Ok(statuses)
    }

    pub(super) async fn list_budgets(
        &self,
        user: &User,
        category: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Reply, BotError> {
        let today = self.today(now);
        let statuses = self.month_statuses(user, now).await?;
        let month = today.format("%m/%Y");

        if let Some(wanted) = category {
            let names: Vec<String> = statuses.iter().map(|s| s.category.clone()).collect();
            let name = find_by_name(wanted, &names)
                .ok_or_else(|| BotError::BudgetNotFound(wanted.to_string()))?;
            let status = statuses
                .iter()
                .find(|s| &s.category == name)
                .ok_or_else(|| BotError::BudgetNotFound(wanted.to_string()))?;
            return Ok(Reply::text(format!(
                "📊 Orçamento de {} em {}:\n{}",
                status.category,
                month,
                status.summary_line()
            )));
        }

        if statuses.is_empty() {
            return Ok(Reply::text(format!("📊 Nenhum orçamento definido para {}.", month)));
        }

        let mut lines = vec![format!("📊 Orçamentos de {}:", month)];
        lines.extend(statuses.iter().map(|s| s.summary_line()));

        let budgeted: f64 = statuses.iter().map(|s| s.budget).sum();
        let spent: f64 = statuses.iter().map(|s| s.spent_month).sum();
        lines.push(String::new());
        lines.push(format!(
            "Total: {} de {}",
            format_brl(spent),
            format_brl(budgeted)
        ));

        Ok(Reply::text(lines.join("\n")))
    }

    pub(super) async fn today_spending(
        &self,
        user: &User,
        by_category: bool,
        now: DateTime<Utc>,
    ) -> Result<Reply, BotError> {
        let (start, end) = day_bounds(self.today(now), self.tz);
        let total = transactions::sum_by_kind_between(
            self.db.clone(),
            user.id,
            TransactionKind::Expense,
            start,
            end,
        )
        .await?;

        if total == 0.0 {
            return Ok(Reply::text("💸 Nenhum gasto registrado hoje."));
        }

        let mut lines = vec![format!("💸 Gastos de hoje: {}", format_brl(total))];
        if by_category {
            let grouped =
                transactions::expense_totals_by_category(self.db.clone(), user.id, start, end).await?;
            lines.extend(
                grouped
                    .iter()
                    .map(|(name, amount)| format!("• {}: {}", name, format_brl(*amount))),
            );
        }

        Ok(Reply::text(lines.join("\n")))
    }

    /// `ver hoje`: what each budget still allows today
    pub(super) async fn daily_allowance(&self, user: &User, now: DateTime<Utc>) -> Result<Reply, BotError> {
        let statuses = self.month_statuses(user, now).await?;
        if statuses.is_empty() {
            return Ok(Reply::text("📊 Nenhum orçamento definido para este mês."));
        }

        let mut lines = vec!["📆 Hoje você ainda pode gastar:".to_string()];
        lines.extend(statuses.iter().map(|s| s.today_line()));

        let total: f64 = statuses.iter().map(|s| s.left_today.max(0.0)).sum();
        lines.push(String::new());
        lines.push(format!("Total livre hoje: {}", format_brl(total)));

        Ok(Reply::text(lines.join("\n")))
    }
}

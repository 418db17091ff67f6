use super::{feedback, Bot, BotError, Reply};
use crate::database::{accounts, scheduled_transactions};
use crate::helpers::dates::{first_of_month, short_date};
use crate::helpers::money::format_brl;
use chrono::{DateTime, Datelike, Months, Utc};
use commands::find_by_name;
use shared_types::{BillStatus, User};
use tracing::info;

impl Bot {
    pub(super) async fn pay_bill(
        &self,
        user: &User,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Reply, BotError> {
        // earliest due date first, so duplicates resolve to the oldest open bill
        let pending = scheduled_transactions::list_bills(
            self.db.clone(),
            user.id,
            Some(BillStatus::Pending),
            None,
            None,
        )
        .await?;
        let bill =
            find_by_name(name, &pending).ok_or_else(|| BotError::BillNotFound(name.to_string()))?;
        let account = accounts::get_default(self.db.clone(), user.id)
            .await?
            .ok_or(BotError::NoDefaultAccount)?;

        let (bill, _) =
            scheduled_transactions::pay_bill(self.db.clone(), bill.id, account.id, now.timestamp())
                .await?;
        info!("User {} paid bill {}", user.id, bill.id);

        let mut text = format!(
            "✅ Conta {} paga: {} em {}\n🏦 Debitado de {}: saldo {}",
            bill.description,
            format_brl(bill.amount),
            bill.category_name,
            account.name,
            format_brl(account.balance - bill.amount)
        );
        if bill.is_recurring {
            text.push_str("\n🔁 A próxima ocorrência será agendada automaticamente.");
        }

        let today = self.today(now);
        if let Some(status) =
            feedback::load(&self.db, user.id, &bill.category_name, today, self.tz).await?
        {
            text.push_str("\n\n");
            text.push_str(&status.expense_feedback());
        }

        Ok(Reply::text(text))
    }

    /// Bills due in the current month
    pub(super) async fn list_bills(
        &self,
        user: &User,
        filter: Option<BillStatus>,
        now: DateTime<Utc>,
    ) -> Result<Reply, BotError> {
        let today = self.today(now);
        let first = first_of_month(today.year(), today.month())?;
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(first);

        let from = first.format("%Y-%m-%d").to_string();
        let to = last.format("%Y-%m-%d").to_string();
        let bills =
            scheduled_transactions::list_bills(self.db.clone(), user.id, filter, Some(&from), Some(&to))
                .await?;

        let month = first.format("%m/%Y");
        if bills.is_empty() {
            let text = match filter {
                Some(BillStatus::Pending) => format!("📅 Nenhuma conta pendente em {}.", month),
                Some(BillStatus::Paid) => format!("📅 Nenhuma conta paga em {}.", month),
                None => format!("📅 Nenhuma conta agendada em {}.", month),
            };
            return Ok(Reply::text(text));
        }

        let mut lines = vec![format!("📅 Contas de {}:", month)];
        for bill in &bills {
            lines.push(format!(
                "• {} {}: {} ({}){}",
                short_date(&bill.due_date),
                bill.description,
                format_brl(bill.amount),
                bill.status.label(),
                if bill.is_recurring { " 🔁" } else { "" }
            ));
        }

        let open: f64 = bills
            .iter()
            .filter(|b| b.status == BillStatus::Pending)
            .map(|b| b.amount)
            .sum();
        if open > 0.0 {
            lines.push(String::new());
            lines.push(format!("⏳ Total pendente: {}", format_brl(open)));
        }

        Ok(Reply::text(lines.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use crate::bot::test_support::*;
    use crate::bot::BotError;
    use crate::database::{accounts, scheduled_transactions, test_support as db_support};
    use shared_types::BillStatus;

    async fn bill(h: &Harness, description: &str, amount: f64, due: &str, recurring: bool) -> i64 {
        scheduled_transactions::create_bill(
            h.db.clone(),
            h.user.id,
            description,
            amount,
            "Casa",
            due,
            recurring,
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_pay_earliest_matching_bill() {
        let h = harness(vec![]).await;
        let account = db_support::account(&h.db, h.user.id, "Nubank", 2000.0).await;
        let november = bill(&h, "Aluguel", 1500.0, "2026-11-05", true).await;
        let october = bill(&h, "Aluguel", 1500.0, "2026-10-05", true).await;

        let reply = h.say("pagar alug").await;
        assert!(reply.starts_with("✅ Conta Aluguel paga: R$ 1.500,00 em Casa"));
        assert!(reply.contains("próxima ocorrência"));

        let paid = scheduled_transactions::list_bills(
            h.db.clone(),
            h.user.id,
            Some(BillStatus::Paid),
            None,
            None,
        )
        .await
        .unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].id, october);
        assert_ne!(paid[0].id, november);

        let account = accounts::get_account(h.db.clone(), h.user.id, account.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.balance, 500.0);
    }

    #[tokio::test]
    async fn test_pay_unknown_bill() {
        let h = harness(vec![]).await;
        db_support::account(&h.db, h.user.id, "Nubank", 0.0).await;
        assert_eq!(
            h.say("pagar luz").await,
            BotError::BillNotFound("luz".to_string()).to_string()
        );
    }

    #[tokio::test]
    async fn test_list_bills_of_month() {
        let h = harness(vec![]).await;
        db_support::account(&h.db, h.user.id, "Nubank", 2000.0).await;
        bill(&h, "Internet", 99.9, "2026-10-20", true).await;
        bill(&h, "Aluguel", 1500.0, "2026-10-05", true).await;
        bill(&h, "IPVA", 800.0, "2026-11-10", false).await;
        h.say("pagar aluguel").await;

        let reply = h.say("ver contas").await;
        assert_eq!(
            reply,
            "📅 Contas de 10/2026:\n\
             • 05/10 Aluguel: R$ 1.500,00 (paga) 🔁\n\
             • 20/10 Internet: R$ 99,90 (pendente) 🔁\n\
             \n\
             ⏳ Total pendente: R$ 99,90"
        );

        let reply = h.say("ver contas pagas").await;
        assert!(reply.contains("Aluguel") && !reply.contains("Internet"));

        let reply = h.say("ver contas pendentes").await;
        assert!(reply.contains("Internet") && !reply.contains("Aluguel"));
    }
}

use super::{Bot, BotError, Reply};
use crate::database::{accounts, transactions};
use crate::helpers::money::format_brl;
use chrono::{DateTime, Utc};
use commands::find_by_name;
use shared_types::{NewTransaction, TransactionKind, User};
use tracing::info;

impl Bot {
    pub(super) async fn transfer(
        &self,
        user: &User,
        amount: f64,
        from_name: &str,
        to_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Reply, BotError> {
        let owned = accounts::list_accounts(self.db.clone(), user.id).await?;
        if owned.is_empty() {
            return Err(BotError::NoAccounts);
        }

        let from = find_by_name(from_name, &owned)
            .ok_or_else(|| BotError::AccountNotFound(from_name.to_string()))?;
        let to = find_by_name(to_name, &owned)
            .ok_or_else(|| BotError::AccountNotFound(to_name.to_string()))?;
        if from.id == to.id {
            return Err(BotError::SameAccount);
        }

        let entry = NewTransaction {
            user_id: user.id,
            kind: TransactionKind::Transfer,
            amount,
            category: None,
            account_id: Some(from.id),
            destination_account_id: Some(to.id),
            description: Some(format!("Transferência {} → {}", from.name, to.name)),
        };
        transactions::record_entry(self.db.clone(), &entry, now.timestamp()).await?;
        info!("User {} moved {} from account {} to {}", user.id, amount, from.id, to.id);

        Ok(Reply::text(format!(
            "🔁 Transferido {} de {} para {}.\n🏦 {}: {}\n🏦 {}: {}",
            format_brl(amount),
            from.name,
            to.name,
            from.name,
            format_brl(from.balance - amount),
            to.name,
            format_brl(to.balance + amount)
        )))
    }

    pub(super) async fn list_accounts(&self, user: &User) -> Result<Reply, BotError> {
        let owned = accounts::list_accounts(self.db.clone(), user.id).await?;
        if owned.is_empty() {
            return Err(BotError::NoAccounts);
        }

        let mut lines = vec!["🏦 Seus saldos:".to_string()];
        for account in &owned {
            let star = if account.is_default { "⭐ " } else { "" };
            let reserve = if account.is_reserve { " (reserva)" } else { "" };
            lines.push(format!(
                "• {}{}{}: {}",
                star,
                account.name,
                reserve,
                format_brl(account.balance)
            ));
        }

        let total: f64 = owned.iter().map(|a| a.balance).sum();
        let reserved: f64 = owned.iter().filter(|a| a.is_reserve).map(|a| a.balance).sum();
        lines.push(String::new());
        lines.push(format!("💰 Total: {}", format_brl(total)));
        if reserved != 0.0 {
            lines.push(format!(
                "🛟 Em reserva: {} | disponível: {}",
                format_brl(reserved),
                format_brl(total - reserved)
            ));
        }

        Ok(Reply::text(lines.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use crate::bot::test_support::*;
    use crate::bot::BotError;
    use crate::database::{accounts, test_support as db_support};

    #[tokio::test]
    async fn test_transfer_between_accounts() {
        let h = harness(vec![]).await;
        let nubank = db_support::account(&h.db, h.user.id, "Nubank", 100.0).await;
        let carteira = db_support::account(&h.db, h.user.id, "Carteira", 0.0).await;

        let reply = h.say("transferir 40 da nubank para carteira").await;
        assert!(reply.starts_with("🔁 Transferido R$ 40,00 de Nubank para Carteira."));

        let nubank = accounts::get_account(h.db.clone(), h.user.id, nubank.id)
            .await
            .unwrap()
            .unwrap();
        let carteira = accounts::get_account(h.db.clone(), h.user.id, carteira.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!((nubank.balance, carteira.balance), (60.0, 40.0));
    }

    #[tokio::test]
    async fn test_transfer_validation() {
        let h = harness(vec![]).await;
        db_support::account(&h.db, h.user.id, "Nubank", 100.0).await;
        db_support::account(&h.db, h.user.id, "Carteira", 0.0).await;

        assert_eq!(
            h.say("transferir 10 do nubank para nubank").await,
            BotError::SameAccount.to_string()
        );
        assert_eq!(
            h.say("transferir 10 de itau para carteira").await,
            BotError::AccountNotFound("itau".to_string()).to_string()
        );
    }

    #[tokio::test]
    async fn test_list_accounts() {
        let h = harness(vec![]).await;
        db_support::account(&h.db, h.user.id, "Nubank", 1200.0).await;
        accounts::create_account(h.db.clone(), h.user.id, "Poupança", 300.0, true)
            .await
            .unwrap();

        let reply = h.say("ver saldos").await;
        assert!(reply.contains("• ⭐ Nubank: R$ 1.200,00"));
        assert!(reply.contains("• Poupança (reserva): R$ 300,00"));
        assert!(reply.contains("💰 Total: R$ 1.500,00"));
        assert!(reply.contains("disponível: R$ 1.200,00"));
    }
}

use super::{feedback, Bot, BotError, Reply};
use crate::database::{accounts, categories, pending_transactions, transactions, users};
use crate::helpers::money::format_brl;
use chrono::{DateTime, Utc};
use commands::best_prefix_match;
use shared_types::{
    Account, CallbackQuery, CategoryKind, InlineKeyboardButton, InlineKeyboardMarkup,
    NewTransaction, PendingTransaction, Transaction, User,
};
use tracing::info;

const CALLBACK_PREFIX: &str = "conta";

fn callback_data(pending_id: &str, account_id: i64) -> String {
    format!("{}:{}:{}", CALLBACK_PREFIX, pending_id, account_id)
}

/// Splits `conta:<pending id>:<account id>`
fn parse_callback_data(data: &str) -> Option<(&str, i64)> {
    let mut parts = data.splitn(3, ':');
    if parts.next()? != CALLBACK_PREFIX {
        return None;
    }
    let pending_id = parts.next().filter(|id| !id.is_empty())?;
    let account_id = parts.next()?.parse().ok()?;
    Some((pending_id, account_id))
}

impl Bot {
    #[allow(clippy::too_many_arguments)]
    pub(super) async fn record(
        &self,
        user: &User,
        chat_id: i64,
        kind: CategoryKind,
        quick: bool,
        amount: f64,
        rest: &str,
        now: DateTime<Utc>,
    ) -> Result<Reply, BotError> {
        let available = categories::list_categories(self.db.clone(), user.id, Some(kind)).await?;
        let Some((category, description)) = best_prefix_match(rest, &available) else {
            return Err(BotError::UnknownCategory {
                kind,
                available: available.iter().map(|c| c.name.clone()).collect(),
            });
        };

        let account = if quick {
            accounts::get_default(self.db.clone(), user.id)
                .await?
                .ok_or(BotError::NoDefaultAccount)?
        } else {
            let mut owned = accounts::list_accounts(self.db.clone(), user.id).await?;
            match owned.len() {
                0 => return Err(BotError::NoAccounts),
                1 => owned.remove(0),
                _ => {
                    let pending = PendingTransaction {
                        id: uuid::Uuid::new_v4().to_string(),
                        user_id: user.id,
                        chat_id,
                        kind,
                        amount,
                        category: category.name.clone(),
                        description,
                        created_at: now.timestamp(),
                    };
                    pending_transactions::insert_pending(self.db.clone(), &pending).await?;
                    return Ok(account_choice(&pending, &owned));
                }
            }
        };

        self.commit_entry(
            user.id,
            kind,
            amount,
            &category.name,
            description,
            &account,
            now,
        )
        .await
    }

    /// Inline keyboard answer: records the pending entry on the chosen account
    pub(super) async fn select_account(
        &self,
        callback: &CallbackQuery,
        chat_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Reply, BotError> {
        let Some((pending_id, account_id)) =
            callback.data.as_deref().and_then(parse_callback_data)
        else {
            return Err(BotError::SelectionExpired);
        };

        let Some(user) = users::find_by_chat_id(self.db.clone(), chat_id).await? else {
            return Err(BotError::SelectionExpired);
        };
        let account = accounts::get_account(self.db.clone(), user.id, account_id)
            .await?
            .ok_or_else(|| BotError::AccountNotFound(account_id.to_string()))?;
        let recorded = pending_transactions::record_pending(
            self.db.clone(),
            user.id,
            pending_id,
            account.id,
            now.timestamp(),
        )
        .await?;
        let Some((pending, transaction)) = recorded else {
            return Err(BotError::SelectionExpired);
        };
        info!(
            "Recorded pending {} on account {} for user {}",
            pending.id, account.id, user.id
        );

        self.confirmation(user.id, pending.kind, &pending.category, &account, &transaction, now)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn commit_entry(
        &self,
        user_id: i64,
        kind: CategoryKind,
        amount: f64,
        category: &str,
        description: Option<String>,
        account: &Account,
        now: DateTime<Utc>,
    ) -> Result<Reply, BotError> {
        let entry = NewTransaction {
            user_id,
            kind: kind.into(),
            amount,
            category: Some(category.to_string()),
            account_id: Some(account.id),
            destination_account_id: None,
            description,
        };
        let transaction = transactions::record_entry(self.db.clone(), &entry, now.timestamp()).await?;
        info!(
            "Recorded {} {} in '{}' on account {} for user {}",
            kind,
            amount,
            category,
            account.id,
            user_id
        );

        self.confirmation(user_id, kind, category, account, &transaction, now)
            .await
    }

    /// Confirmation text for an entry just recorded on `account`, which still holds the old balance
    async fn confirmation(
        &self,
        user_id: i64,
        kind: CategoryKind,
        category: &str,
        account: &Account,
        transaction: &Transaction,
        now: DateTime<Utc>,
    ) -> Result<Reply, BotError> {
        let amount = transaction.amount;
        let balance = account.balance + transaction.kind.signed(amount);
        let mut text = format!(
            "✅ {} registrada: {} em {}\n🏦 {}: saldo {}",
            kind.label(),
            format_brl(amount),
            category,
            account.name,
            format_brl(balance)
        );
        if let Some(description) = &transaction.description {
            text.push_str(&format!("\n📝 {}", description));
        }

        if kind == CategoryKind::Expense {
            let today = self.today(now);
            if let Some(status) = feedback::load(&self.db, user_id, category, today, self.tz).await? {
                text.push_str("\n\n");
                text.push_str(&status.expense_feedback());
            }
        }

        Ok(Reply::text(text))
    }
}

/// Keyboard with one button per account, default account first
fn account_choice(pending: &PendingTransaction, accounts: &[Account]) -> Reply {
    let buttons = accounts
        .iter()
        .map(|account| InlineKeyboardButton {
            text: if account.is_default {
                format!("⭐ {}", account.name)
            } else {
                account.name.clone()
            },
            callback_data: callback_data(&pending.id, account.id),
        })
        .collect();

    Reply::with_keyboard(
        format!(
            "🏦 Em qual conta lançar {} de {} em {}?",
            pending.kind.label().to_lowercase(),
            format_brl(pending.amount),
            pending.category
        ),
        InlineKeyboardMarkup::single_column(buttons),
    )
}

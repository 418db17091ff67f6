use crate::database::transactions::apply_entry;
use crate::database::{column_enum, AsyncDbConnection};
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use shared_types::{NewTransaction, PendingTransaction, Transaction};

pub async fn insert_pending(conn: AsyncDbConnection, pending: &PendingTransaction) -> Result<()> {
    let conn = conn.lock().await?;

    conn.execute(
        "INSERT INTO pending_transactions
         (id, user_id, chat_id, kind, amount, category, description, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            pending.id,
            pending.user_id,
            pending.chat_id,
            pending.kind.as_str(),
            pending.amount,
            pending.category,
            pending.description,
            pending.created_at,
        ],
    )?;

    Ok(())
}

fn take_row(conn: &Connection, user_id: i64, id: &str) -> rusqlite::Result<Option<PendingTransaction>> {
    conn.query_row(
        "DELETE FROM pending_transactions WHERE id = ? AND user_id = ?
         RETURNING id, user_id, chat_id, kind, amount, category, description, created_at",
        params![id, user_id],
        |row| {
            Ok(PendingTransaction {
                id: row.get(0)?,
                user_id: row.get(1)?,
                chat_id: row.get(2)?,
                kind: column_enum(row, 3)?,
                amount: row.get(4)?,
                category: row.get(5)?,
                description: row.get(6)?,
                created_at: row.get(7)?,
            })
        },
    )
    .optional()
}

/// Records the pending entry on `account_id` and removes it.
///
/// Returns `None` when it no longer exists for this user. Removal and
/// recording commit together, so a failed entry stays pending.
pub async fn record_pending(
    conn: AsyncDbConnection,
    user_id: i64,
    id: &str,
    account_id: i64,
    created_at: i64,
) -> Result<Option<(PendingTransaction, Transaction)>> {
    let mut conn = conn.lock().await?;
    let tx = conn.transaction()?;

    let Some(pending) = take_row(&tx, user_id, id)? else {
        return Ok(None);
    };
    let transaction = apply_entry(
        &tx,
        &NewTransaction {
            user_id,
            kind: pending.kind.into(),
            amount: pending.amount,
            category: Some(pending.category.clone()),
            account_id: Some(account_id),
            destination_account_id: None,
            description: pending.description.clone(),
        },
        created_at,
    )?;

    tx.commit()?;
    Ok(Some((pending, transaction)))
}

pub async fn purge_older_than(conn: AsyncDbConnection, cutoff: i64) -> Result<usize> {
    let conn = conn.lock().await?;
    let deleted = conn.execute(
        "DELETE FROM pending_transactions WHERE created_at < ?",
        [cutoff],
    )?;
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{accounts, test_support};
    use shared_types::{CategoryKind, TransactionKind};

    fn pending(id: &str, user_id: i64, created_at: i64) -> PendingTransaction {
        PendingTransaction {
            id: id.to_string(),
            user_id,
            chat_id: 42,
            kind: CategoryKind::Expense,
            amount: 12.5,
            category: "Mercado".to_string(),
            description: Some("feira".to_string()),
            created_at,
        }
    }

    async fn balance(db: &AsyncDbConnection, user_id: i64, account_id: i64) -> f64 {
        accounts::get_account(db.clone(), user_id, account_id)
            .await
            .unwrap()
            .unwrap()
            .balance
    }

    #[tokio::test]
    async fn test_record_only_once() {
        let db = test_support::db();
        let user = test_support::user(&db, "ana@example.com").await;
        let account = test_support::account(&db, user.id, "Nubank", 100.0).await;
        insert_pending(db.clone(), &pending("abc", user.id, 100)).await.unwrap();

        let (taken, transaction) = record_pending(db.clone(), user.id, "abc", account.id, 200)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(taken, pending("abc", user.id, 100));
        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(transaction.description.as_deref(), Some("feira"));
        assert_eq!(balance(&db, user.id, account.id).await, 87.5);

        let again = record_pending(db.clone(), user.id, "abc", account.id, 300).await.unwrap();
        assert!(again.is_none());
        assert_eq!(balance(&db, user.id, account.id).await, 87.5);
    }

    #[tokio::test]
    async fn test_record_checks_owner() {
        let db = test_support::db();
        let ana = test_support::user(&db, "ana@example.com").await;
        let bia = test_support::user(&db, "bia@example.com").await;
        let account = test_support::account(&db, ana.id, "Nubank", 0.0).await;
        insert_pending(db.clone(), &pending("abc", ana.id, 100)).await.unwrap();

        let stolen = record_pending(db.clone(), bia.id, "abc", account.id, 200).await.unwrap();
        assert!(stolen.is_none());
        let own = record_pending(db.clone(), ana.id, "abc", account.id, 200).await.unwrap();
        assert!(own.is_some());
    }

    #[tokio::test]
    async fn test_failed_record_keeps_pending() {
        let db = test_support::db();
        let user = test_support::user(&db, "ana@example.com").await;
        let account = test_support::account(&db, user.id, "Nubank", 100.0).await;
        insert_pending(db.clone(), &pending("abc", user.id, 100)).await.unwrap();

        assert!(record_pending(db.clone(), user.id, "abc", 9999, 200).await.is_err());

        let retried = record_pending(db.clone(), user.id, "abc", account.id, 300).await.unwrap();
        assert!(retried.is_some());
        assert_eq!(balance(&db, user.id, account.id).await, 87.5);
    }

    #[tokio::test]
    async fn test_purge() {
        let db = test_support::db();
        let user = test_support::user(&db, "ana@example.com").await;
        let account = test_support::account(&db, user.id, "Nubank", 100.0).await;
        insert_pending(db.clone(), &pending("old", user.id, 100)).await.unwrap();
        insert_pending(db.clone(), &pending("new", user.id, 500)).await.unwrap();

        assert_eq!(purge_older_than(db.clone(), 200).await.unwrap(), 1);
        let old = record_pending(db.clone(), user.id, "old", account.id, 600).await.unwrap();
        assert!(old.is_none());
        let new = record_pending(db.clone(), user.id, "new", account.id, 600).await.unwrap();
        assert!(new.is_some());
    }
}

use crate::database::{column_enum, AsyncDbConnection};
use anyhow::{bail, Result};
use commands::normalize::normalize;
use rusqlite::{params, Connection};
use shared_types::{Account, NewTransaction, Transaction, TransactionKind};

const TRANSACTION_COLUMNS: &str = "id, user_id, kind, amount, category, account_id,
    destination_account_id, description, period, created_at";

fn row_to_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: column_enum(row, 2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        account_id: row.get(5)?,
        destination_account_id: row.get(6)?,
        description: row.get(7)?,
        period: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn adjust_balance(conn: &Connection, user_id: i64, account_id: i64, delta: f64) -> Result<()> {
    let updated = conn.execute(
        "UPDATE accounts SET balance = balance + ? WHERE id = ? AND user_id = ?",
        params![delta, account_id, user_id],
    )?;
    if updated == 0 {
        bail!("account {} not found for user {}", account_id, user_id);
    }
    Ok(())
}

/// Inserts one entry and applies it to the balances it touches.
///
/// Runs on whatever connection or open transaction it is given, so callers
/// that need more writes in the same unit of work pass their `Transaction`.
pub(crate) fn apply_entry(
    conn: &Connection,
    entry: &NewTransaction,
    created_at: i64,
) -> Result<Transaction> {
    if entry.amount.is_nan() || entry.amount <= 0.0 {
        bail!("amount must be positive, got {}", entry.amount);
    }

    match entry.kind {
        TransactionKind::Expense | TransactionKind::Income => {
            if let Some(account_id) = entry.account_id {
                adjust_balance(conn, entry.user_id, account_id, entry.kind.signed(entry.amount))?;
            }
        }
        TransactionKind::Transfer => {
            let (Some(from), Some(to)) = (entry.account_id, entry.destination_account_id) else {
                bail!("a transfer needs both accounts");
            };
            if from == to {
                bail!("cannot transfer to the same account");
            }
            adjust_balance(conn, entry.user_id, from, -entry.amount)?;
            adjust_balance(conn, entry.user_id, to, entry.amount)?;
        }
        TransactionKind::Closing => bail!("closing records are written by insert_closing"),
    }

    let transaction = conn.query_row(
        &format!(
            "INSERT INTO transactions
             (user_id, kind, amount, category, account_id, destination_account_id, description, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {TRANSACTION_COLUMNS}"
        ),
        params![
            entry.user_id,
            entry.kind.as_str(),
            entry.amount,
            entry.category.as_deref(),
            entry.account_id,
            entry.destination_account_id,
            entry.description.as_deref(),
            created_at,
        ],
        row_to_transaction,
    )?;

    Ok(transaction)
}

/// Records an expense, income or transfer together with its balance updates
pub async fn record_entry(
    conn: AsyncDbConnection,
    entry: &NewTransaction,
    created_at: i64,
) -> Result<Transaction> {
    let mut conn = conn.lock().await?;
    let tx = conn.transaction()?;
    let transaction = apply_entry(&tx, entry, created_at)?;
    tx.commit()?;
    Ok(transaction)
}

/// Expenses in one category inside `[start, end)`; names compare after normalization
pub async fn category_total_between(
    conn: AsyncDbConnection,
    user_id: i64,
    category: &str,
    start: i64,
    end: i64,
) -> Result<f64> {
    let wanted = normalize(category);
    let total = expense_totals_by_category(conn, user_id, start, end)
        .await?
        .into_iter()
        .filter(|(name, _)| normalize(name) == wanted)
        .map(|(_, total)| total)
        .sum();

    Ok(total)
}

/// Expenses inside `[start, end)` grouped by category, largest first
pub async fn expense_totals_by_category(
    conn: AsyncDbConnection,
    user_id: i64,
    start: i64,
    end: i64,
) -> Result<Vec<(String, f64)>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT COALESCE(category, 'Sem categoria') AS name, SUM(amount) AS total
         FROM transactions
         WHERE user_id = ? AND kind = 'expense' AND created_at >= ? AND created_at < ?
         GROUP BY name
         ORDER BY total DESC, name",
    )?;
    let totals = stmt
        .query_map(params![user_id, start, end], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(totals)
}

pub async fn sum_by_kind_between(
    conn: AsyncDbConnection,
    user_id: i64,
    kind: TransactionKind,
    start: i64,
    end: i64,
) -> Result<f64> {
    let conn = conn.lock().await?;

    let total: f64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM transactions
         WHERE user_id = ? AND kind = ? AND created_at >= ? AND created_at < ?",
        params![user_id, kind.as_str(), start, end],
        |row| row.get(0),
    )?;

    Ok(total)
}

/// Most recent first
pub async fn list_transactions(
    conn: AsyncDbConnection,
    user_id: i64,
    limit: usize,
) -> Result<Vec<Transaction>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions
         WHERE user_id = ?
         ORDER BY created_at DESC, id DESC
         LIMIT ?"
    ))?;
    let transactions = stmt
        .query_map(params![user_id, limit], row_to_transaction)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(transactions)
}

/// Snapshot of an account balance for `period`; returns false when it already exists
pub async fn insert_closing(
    conn: AsyncDbConnection,
    account: &Account,
    period: &str,
    created_at: i64,
) -> Result<bool> {
    let conn = conn.lock().await?;

    let inserted = conn.execute(
        "INSERT OR IGNORE INTO transactions
         (user_id, kind, amount, account_id, description, period, created_at)
         VALUES (?, 'closing', ?, ?, ?, ?, ?)",
        params![
            account.user_id,
            account.balance,
            account.id,
            format!("Fechamento {} - {}", period, account.name),
            period,
            created_at,
        ],
    )?;

    Ok(inserted > 0)
}

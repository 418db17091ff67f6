use crate::database::AsyncDbConnection;
use anyhow::{bail, Result};
use rusqlite::{params, OptionalExtension};
use shared_types::Account;

pub(crate) const ACCOUNT_COLUMNS: &str =
    "id, user_id, name, balance, is_reserve, is_default, created_at";

pub(crate) fn row_to_account(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        balance: row.get(3)?,
        is_reserve: row.get(4)?,
        is_default: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// The first account a user creates becomes the default one
pub async fn create_account(
    conn: AsyncDbConnection,
    user_id: i64,
    name: &str,
    balance: f64,
    is_reserve: bool,
) -> Result<Account> {
    let name = commands::normalize::clean(name);
    if name.is_empty() {
        bail!("account name is required");
    }

    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let existing: i64 = conn.query_row(
        "SELECT COUNT(*) FROM accounts WHERE user_id = ?",
        [user_id],
        |row| row.get(0),
    )?;

    let account = conn.query_row(
        &format!(
            "INSERT INTO accounts (user_id, name, balance, is_reserve, is_default, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {ACCOUNT_COLUMNS}"
        ),
        params![user_id, name, balance, is_reserve, existing == 0, now],
        row_to_account,
    )?;

    Ok(account)
}

/// Default account first, then by name
pub async fn list_accounts(conn: AsyncDbConnection, user_id: i64) -> Result<Vec<Account>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts
         WHERE user_id = ?
         ORDER BY is_default DESC, name COLLATE NOCASE, id"
    ))?;
    let accounts = stmt
        .query_map([user_id], row_to_account)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(accounts)
}

pub async fn list_all_accounts(conn: AsyncDbConnection) -> Result<Vec<Account>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY user_id, id"
    ))?;
    let accounts = stmt
        .query_map([], row_to_account)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(accounts)
}

pub async fn get_account(
    conn: AsyncDbConnection,
    user_id: i64,
    account_id: i64,
) -> Result<Option<Account>> {
    let conn = conn.lock().await?;

    let account = conn
        .query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE user_id = ? AND id = ?"),
            params![user_id, account_id],
            row_to_account,
        )
        .optional()?;

    Ok(account)
}

pub async fn get_default(conn: AsyncDbConnection, user_id: i64) -> Result<Option<Account>> {
    let conn = conn.lock().await?;

    let account = conn
        .query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE user_id = ? AND is_default"),
            [user_id],
            row_to_account,
        )
        .optional()?;

    Ok(account)
}

pub async fn set_default(conn: AsyncDbConnection, user_id: i64, account_id: i64) -> Result<Account> {
    let mut conn = conn.lock().await?;
    let tx = conn.transaction()?;

    let exists: i64 = tx.query_row(
        "SELECT COUNT(*) FROM accounts WHERE user_id = ? AND id = ?",
        params![user_id, account_id],
        |row| row.get(0),
    )?;
    if exists == 0 {
        bail!("account {} not found for user {}", account_id, user_id);
    }

    tx.execute(
        "UPDATE accounts SET is_default = false WHERE user_id = ? AND is_default",
        [user_id],
    )?;
    let account = tx.query_row(
        &format!(
            "UPDATE accounts SET is_default = true WHERE id = ?
             RETURNING {ACCOUNT_COLUMNS}"
        ),
        [account_id],
        row_to_account,
    )?;

    tx.commit()?;
    Ok(account)
}

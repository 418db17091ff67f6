use crate::database::transactions::apply_entry;
use crate::database::{column_enum, AsyncDbConnection};
use anyhow::{bail, Result};
use rusqlite::{params, OptionalExtension};
use shared_types::{BillStatus, NewTransaction, ScheduledTransaction, Transaction, TransactionKind};

const BILL_COLUMNS: &str = "id, user_id, description, amount, category_name, due_date, status,
    is_recurring, paid_at, rescheduled";

fn row_to_bill(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScheduledTransaction> {
    Ok(ScheduledTransaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        description: row.get(2)?,
        amount: row.get(3)?,
        category_name: row.get(4)?,
        due_date: row.get(5)?,
        status: column_enum(row, 6)?,
        is_recurring: row.get(7)?,
        paid_at: row.get(8)?,
        rescheduled: row.get(9)?,
    })
}

pub async fn create_bill(
    conn: AsyncDbConnection,
    user_id: i64,
    description: &str,
    amount: f64,
    category_name: &str,
    due_date: &str,
    is_recurring: bool,
) -> Result<ScheduledTransaction> {
    let description = commands::normalize::clean(description);
    if description.is_empty() {
        bail!("bill description is required");
    }
    if amount <= 0.0 {
        bail!("bill amount must be positive");
    }
    crate::helpers::dates::parse_date(due_date)?;

    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let bill = conn.query_row(
        &format!(
            "INSERT INTO scheduled_transactions
             (user_id, description, amount, category_name, due_date, is_recurring, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {BILL_COLUMNS}"
        ),
        params![user_id, description, amount, category_name.trim(), due_date, is_recurring, now],
        row_to_bill,
    )?;

    Ok(bill)
}

/// Bills due inside `[from, to]` (inclusive `YYYY-MM-DD` dates), earliest first
pub async fn list_bills(
    conn: AsyncDbConnection,
    user_id: i64,
    status: Option<BillStatus>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Vec<ScheduledTransaction>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {BILL_COLUMNS} FROM scheduled_transactions
         WHERE user_id = ?1
           AND (?2 IS NULL OR status = ?2)
           AND (?3 IS NULL OR due_date >= ?3)
           AND (?4 IS NULL OR due_date <= ?4)
         ORDER BY due_date, id"
    ))?;
    let bills = stmt
        .query_map(
            params![user_id, status.map(|s| s.as_str()), from, to],
            row_to_bill,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(bills)
}

/// Records the bill as an expense on `account_id` and marks it paid
pub async fn pay_bill(
    conn: AsyncDbConnection,
    bill_id: i64,
    account_id: i64,
    paid_at: i64,
) -> Result<(ScheduledTransaction, Transaction)> {
    let mut conn = conn.lock().await?;
    let tx = conn.transaction()?;

    let bill = tx
        .query_row(
            &format!("SELECT {BILL_COLUMNS} FROM scheduled_transactions WHERE id = ?"),
            [bill_id],
            row_to_bill,
        )
        .optional()?;
    let Some(bill) = bill else {
        bail!("bill {} not found", bill_id);
    };
    if bill.status == BillStatus::Paid {
        bail!("bill '{}' is already paid", bill.description);
    }

    let transaction = apply_entry(
        &tx,
        &NewTransaction {
            user_id: bill.user_id,
            kind: TransactionKind::Expense,
            amount: bill.amount,
            category: Some(bill.category_name.clone()),
            account_id: Some(account_id),
            destination_account_id: None,
            description: Some(bill.description.clone()),
        },
        paid_at,
    )?;

    let bill = tx.query_row(
        &format!(
            "UPDATE scheduled_transactions SET status = 'paid', paid_at = ? WHERE id = ?
             RETURNING {BILL_COLUMNS}"
        ),
        params![paid_at, bill_id],
        row_to_bill,
    )?;

    tx.commit()?;
    Ok((bill, transaction))
}

/// Paid recurring bills whose next occurrence has not been created yet
pub async fn list_due_for_reschedule(conn: AsyncDbConnection) -> Result<Vec<ScheduledTransaction>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {BILL_COLUMNS} FROM scheduled_transactions
         WHERE is_recurring AND status = 'paid' AND NOT rescheduled
         ORDER BY user_id, due_date, id"
    ))?;
    let bills = stmt
        .query_map([], row_to_bill)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(bills)
}

/// Creates the next pending occurrence and flags the paid one, atomically
pub async fn reschedule(
    conn: AsyncDbConnection,
    bill: &ScheduledTransaction,
    next_due_date: &str,
) -> Result<ScheduledTransaction> {
    let mut conn = conn.lock().await?;
    let tx = conn.transaction()?;
    let now = chrono::Utc::now().timestamp();

    let flagged = tx.execute(
        "UPDATE scheduled_transactions SET rescheduled = true WHERE id = ? AND NOT rescheduled",
        [bill.id],
    )?;
    if flagged == 0 {
        bail!("bill {} was already rescheduled", bill.id);
    }

    let next = tx.query_row(
        &format!(
            "INSERT INTO scheduled_transactions
             (user_id, description, amount, category_name, due_date, is_recurring, created_at)
             VALUES (?, ?, ?, ?, ?, true, ?)
             RETURNING {BILL_COLUMNS}"
        ),
        params![
            bill.user_id,
            bill.description,
            bill.amount,
            bill.category_name,
            next_due_date,
            now
        ],
        row_to_bill,
    )?;

    tx.commit()?;
    Ok(next)
}

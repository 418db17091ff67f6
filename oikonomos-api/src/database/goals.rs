use crate::database::transactions::apply_entry;
use crate::database::{column_enum, AsyncDbConnection};
use anyhow::{bail, Result};
use rusqlite::{params, OptionalExtension};
use shared_types::{Goal, GoalStatus, NewTransaction, TransactionKind};

const GOAL_COLUMNS: &str = "id, user_id, name, target_amount, saved_amount, status, created_at";

fn row_to_goal(row: &rusqlite::Row<'_>) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        target_amount: row.get(3)?,
        saved_amount: row.get(4)?,
        status: column_enum(row, 5)?,
        created_at: row.get(6)?,
    })
}

fn status_for(saved_amount: f64, target_amount: f64) -> GoalStatus {
    if target_amount > 0.0 && saved_amount >= target_amount {
        GoalStatus::Completed
    } else {
        GoalStatus::Active
    }
}

pub async fn create_goal(
    conn: AsyncDbConnection,
    user_id: i64,
    name: &str,
    target_amount: f64,
) -> Result<Goal> {
    let name = commands::normalize::clean(name);
    if name.is_empty() {
        bail!("goal name is required");
    }
    if target_amount <= 0.0 {
        bail!("goal target must be positive");
    }

    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let goal = conn.query_row(
        &format!(
            "INSERT INTO goals (user_id, name, target_amount, created_at) VALUES (?, ?, ?, ?)
             RETURNING {GOAL_COLUMNS}"
        ),
        params![user_id, name, target_amount, now],
        row_to_goal,
    )?;

    Ok(goal)
}

pub async fn list_goals(
    conn: AsyncDbConnection,
    user_id: i64,
    status: Option<GoalStatus>,
) -> Result<Vec<Goal>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {GOAL_COLUMNS} FROM goals
         WHERE user_id = ?1 AND (?2 IS NULL OR status = ?2)
         ORDER BY status, name COLLATE NOCASE"
    ))?;
    let goals = stmt
        .query_map(params![user_id, status.map(|s| s.as_str())], row_to_goal)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(goals)
}

/// Moves `amount` from the account into the goal: an expense categorized as the goal name
pub async fn contribute(
    conn: AsyncDbConnection,
    goal_id: i64,
    account_id: i64,
    amount: f64,
    created_at: i64,
) -> Result<Goal> {
    let mut conn = conn.lock().await?;
    let tx = conn.transaction()?;

    let goal = tx
        .query_row(
            &format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = ?"),
            [goal_id],
            row_to_goal,
        )
        .optional()?;
    let Some(goal) = goal else {
        bail!("goal {} not found", goal_id);
    };

    apply_entry(
        &tx,
        &NewTransaction {
            user_id: goal.user_id,
            kind: TransactionKind::Expense,
            amount,
            category: Some(goal.name.clone()),
            account_id: Some(account_id),
            destination_account_id: None,
            description: Some(format!("Guardado na meta {}", goal.name)),
        },
        created_at,
    )?;

    let saved = goal.saved_amount + amount;
    let updated = tx.query_row(
        &format!(
            "UPDATE goals SET saved_amount = ?, status = ? WHERE id = ?
             RETURNING {GOAL_COLUMNS}"
        ),
        params![saved, status_for(saved, goal.target_amount).as_str(), goal_id],
        row_to_goal,
    )?;

    tx.commit()?;
    Ok(updated)
}

/// Moves `amount` out of the goal into the account as income in `category`
pub async fn withdraw(
    conn: AsyncDbConnection,
    goal_id: i64,
    account_id: i64,
    amount: f64,
    category: &str,
    created_at: i64,
) -> Result<Goal> {
    let mut conn = conn.lock().await?;
    let tx = conn.transaction()?;

    let goal = tx
        .query_row(
            &format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = ?"),
            [goal_id],
            row_to_goal,
        )
        .optional()?;
    let Some(goal) = goal else {
        bail!("goal {} not found", goal_id);
    };
    if amount > goal.saved_amount + 1e-9 {
        bail!(
            "cannot withdraw {:.2} from goal '{}' holding {:.2}",
            amount,
            goal.name,
            goal.saved_amount
        );
    }

    apply_entry(
        &tx,
        &NewTransaction {
            user_id: goal.user_id,
            kind: TransactionKind::Income,
            amount,
            category: Some(category.to_string()),
            account_id: Some(account_id),
            destination_account_id: None,
            description: Some(format!("Resgate da meta {}", goal.name)),
        },
        created_at,
    )?;

    let saved = (goal.saved_amount - amount).max(0.0);
    let updated = tx.query_row(
        &format!(
            "UPDATE goals SET saved_amount = ?, status = ? WHERE id = ?
             RETURNING {GOAL_COLUMNS}"
        ),
        params![saved, status_for(saved, goal.target_amount).as_str(), goal_id],
        row_to_goal,
    )?;

    tx.commit()?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{accounts, test_support, transactions};

    #[tokio::test]
    async fn test_contribute_completes_goal() {
        let db = test_support::db();
        let user = test_support::user(&db, "ana@example.com").await;
        let account = test_support::account(&db, user.id, "Nubank", 1000.0).await;
        let goal = create_goal(db.clone(), user.id, "Viagem", 500.0).await.unwrap();

        let goal = contribute(db.clone(), goal.id, account.id, 200.0, 10).await.unwrap();
        assert_eq!(goal.saved_amount, 200.0);
        assert_eq!(goal.status, GoalStatus::Active);

        let goal = contribute(db.clone(), goal.id, account.id, 300.0, 20).await.unwrap();
        assert_eq!(goal.status, GoalStatus::Completed);

        let account = accounts::get_account(db.clone(), user.id, account.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.balance, 500.0);

        let spent = transactions::category_total_between(db.clone(), user.id, "Viagem", 0, 100)
            .await
            .unwrap();
        assert_eq!(spent, 500.0);
    }

    #[tokio::test]
    async fn test_withdraw_reactivates_goal() {
        let db = test_support::db();
        let user = test_support::user(&db, "ana@example.com").await;
        let account = test_support::account(&db, user.id, "Nubank", 500.0).await;
        let goal = create_goal(db.clone(), user.id, "Viagem", 500.0).await.unwrap();
        contribute(db.clone(), goal.id, account.id, 500.0, 10).await.unwrap();

        let goal = withdraw(db.clone(), goal.id, account.id, 120.0, "Resgate", 20)
            .await
            .unwrap();
        assert_eq!(goal.saved_amount, 380.0);
        assert_eq!(goal.status, GoalStatus::Active);

        let account = accounts::get_account(db.clone(), user.id, account.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.balance, 120.0);
    }

    #[tokio::test]
    async fn test_withdraw_more_than_saved_changes_nothing() {
        let db = test_support::db();
        let user = test_support::user(&db, "ana@example.com").await;
        let account = test_support::account(&db, user.id, "Nubank", 100.0).await;
        let goal = create_goal(db.clone(), user.id, "Viagem", 500.0).await.unwrap();
        contribute(db.clone(), goal.id, account.id, 50.0, 10).await.unwrap();

        assert!(withdraw(db.clone(), goal.id, account.id, 80.0, "Resgate", 20).await.is_err());

        let goals = list_goals(db.clone(), user.id, None).await.unwrap();
        assert_eq!(goals[0].saved_amount, 50.0);
        let account = accounts::get_account(db.clone(), user.id, account.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.balance, 50.0);
    }
}

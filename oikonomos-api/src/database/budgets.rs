use crate::database::AsyncDbConnection;
use anyhow::{bail, Result};
use commands::normalize::normalize;
use rusqlite::params;
use shared_types::{Budget, BudgetEntry};

fn row_to_budget(row: &rusqlite::Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        user_id: row.get(0)?,
        category_name: row.get(1)?,
        year: row.get(2)?,
        month: row.get(3)?,
        amount: row.get(4)?,
    })
}

pub async fn list_budgets(
    conn: AsyncDbConnection,
    user_id: i64,
    year: i32,
    month: u32,
) -> Result<Vec<Budget>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT user_id, category_name, year, month, amount FROM budgets
         WHERE user_id = ? AND year = ? AND month = ?
         ORDER BY category_name COLLATE NOCASE",
    )?;
    let budgets = stmt
        .query_map(params![user_id, year, month], row_to_budget)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(budgets)
}

pub async fn get_budget(
    conn: AsyncDbConnection,
    user_id: i64,
    category_name: &str,
    year: i32,
    month: u32,
) -> Result<Option<Budget>> {
    let wanted = normalize(category_name);
    let budget = list_budgets(conn, user_id, year, month)
        .await?
        .into_iter()
        .find(|b| normalize(&b.category_name) == wanted);

    Ok(budget)
}

/// Replaces every budget of the month with `entries`.
///
/// Each entry names one of the user's expense categories, compared after
/// normalization; the budget is stored under the category's own spelling.
pub async fn set_budgets(
    conn: AsyncDbConnection,
    user_id: i64,
    year: i32,
    month: u32,
    entries: &[BudgetEntry],
) -> Result<Vec<Budget>> {
    if !(1..=12).contains(&month) {
        bail!("invalid month {}", month);
    }
    if let Some(entry) = entries.iter().find(|e| e.amount < 0.0 || e.category_name.trim().is_empty()) {
        bail!("invalid budget for '{}': {}", entry.category_name, entry.amount);
    }

    {
        let mut conn = conn.lock().await?;
        let tx = conn.transaction()?;

        let names = {
            let mut stmt =
                tx.prepare("SELECT name FROM categories WHERE user_id = ? AND kind = 'expense'")?;
            let names = stmt
                .query_map([user_id], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            names
        };
        let mut resolved = Vec::with_capacity(entries.len());
        for entry in entries {
            let wanted = normalize(&entry.category_name);
            let Some(name) = names.iter().find(|n| normalize(n) == wanted) else {
                bail!("unknown expense category '{}'", entry.category_name.trim());
            };
            resolved.push((name.clone(), entry.amount));
        }

        tx.execute(
            "DELETE FROM budgets WHERE user_id = ? AND year = ? AND month = ?",
            params![user_id, year, month],
        )?;
        for (name, amount) in &resolved {
            tx.execute(
                "INSERT OR REPLACE INTO budgets (user_id, category_name, year, month, amount)
                 VALUES (?, ?, ?, ?, ?)",
                params![user_id, name, year, month, amount],
            )?;
        }

        tx.commit()?;
    }

    list_budgets(conn, user_id, year, month).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support;
    use shared_types::{CategoryKind, User};

    async fn user_with_categories(db: &AsyncDbConnection) -> User {
        let user = test_support::user(db, "ana@example.com").await;
        for name in ["Mercado", "Lazer", "Alimentação"] {
            test_support::category(db, user.id, name, CategoryKind::Expense).await;
        }
        test_support::category(db, user.id, "Salário", CategoryKind::Income).await;
        user
    }

    fn entry(name: &str, amount: f64) -> BudgetEntry {
        BudgetEntry {
            category_name: name.to_string(),
            amount,
        }
    }

    #[tokio::test]
    async fn test_set_budgets_replaces_month() {
        let db = test_support::db();
        let user = user_with_categories(&db).await;

        set_budgets(db.clone(), user.id, 2026, 10, &[entry("Mercado", 600.0), entry("Lazer", 200.0)])
            .await
            .unwrap();
        set_budgets(db.clone(), user.id, 2026, 11, &[entry("Mercado", 650.0)])
            .await
            .unwrap();

        let saved = set_budgets(db.clone(), user.id, 2026, 10, &[entry("Mercado", 700.0)])
            .await
            .unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].amount, 700.0);

        let november = list_budgets(db.clone(), user.id, 2026, 11).await.unwrap();
        assert_eq!(november[0].amount, 650.0);
    }

    #[tokio::test]
    async fn test_get_budget_ignores_case() {
        let db = test_support::db();
        let user = user_with_categories(&db).await;
        set_budgets(db.clone(), user.id, 2026, 10, &[entry("Mercado", 600.0)])
            .await
            .unwrap();

        let budget = get_budget(db.clone(), user.id, "mercado", 2026, 10).await.unwrap();
        assert_eq!(budget.map(|b| b.amount), Some(600.0));
        assert!(get_budget(db.clone(), user.id, "Mercado", 2026, 9).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejects_invalid_entries() {
        let db = test_support::db();
        let user = user_with_categories(&db).await;

        assert!(set_budgets(db.clone(), user.id, 2026, 13, &[]).await.is_err());
        assert!(set_budgets(db.clone(), user.id, 2026, 10, &[entry("Mercado", -1.0)])
            .await
            .is_err());
        assert!(set_budgets(db.clone(), user.id, 2026, 10, &[entry("Padaria", 50.0)])
            .await
            .is_err());
        // income categories cannot be budgeted
        assert!(set_budgets(db.clone(), user.id, 2026, 10, &[entry("Salário", 50.0)])
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_budget_names_resolve_to_category_spelling() {
        let db = test_support::db();
        let user = user_with_categories(&db).await;

        let saved = set_budgets(db.clone(), user.id, 2026, 10, &[entry("ALIMENTACAO", 800.0)])
            .await
            .unwrap();
        assert_eq!(saved[0].category_name, "Alimentação");

        for typed in ["alimentação", "Alimentacao", "ALIMENTAÇÃO"] {
            let budget = get_budget(db.clone(), user.id, typed, 2026, 10).await.unwrap();
            assert_eq!(budget.map(|b| b.amount), Some(800.0), "{typed}");
        }
    }
}

use crate::database::{column_enum, AsyncDbConnection};
use anyhow::{bail, Result};
use commands::normalize::{clean, normalize};
use rusqlite::params;
use shared_types::{Category, CategoryKind};

fn row_to_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        kind: column_enum(row, 3)?,
    })
}

/// Names must be unique per user and kind once accents and case are ignored
pub async fn create_category(
    conn: AsyncDbConnection,
    user_id: i64,
    name: &str,
    kind: CategoryKind,
) -> Result<Category> {
    let name = clean(name);
    if name.is_empty() {
        bail!("category name is required");
    }

    let conn = conn.lock().await?;

    let mut stmt = conn.prepare("SELECT name FROM categories WHERE user_id = ? AND kind = ?")?;
    let existing = stmt
        .query_map(params![user_id, kind.as_str()], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let wanted = normalize(&name);
    if existing.iter().any(|n| normalize(n) == wanted) {
        bail!("category '{}' already exists", name);
    }

    let now = chrono::Utc::now().timestamp();
    let category = conn.query_row(
        "INSERT INTO categories (user_id, name, kind, created_at) VALUES (?, ?, ?, ?)
         RETURNING id, user_id, name, kind",
        params![user_id, name, kind.as_str(), now],
        row_to_category,
    )?;

    Ok(category)
}

pub async fn list_categories(
    conn: AsyncDbConnection,
    user_id: i64,
    kind: Option<CategoryKind>,
) -> Result<Vec<Category>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, kind FROM categories
         WHERE user_id = ?1 AND (?2 IS NULL OR kind = ?2)
         ORDER BY kind, name COLLATE NOCASE",
    )?;
    let categories = stmt
        .query_map(params![user_id, kind.map(|k| k.as_str())], row_to_category)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(categories)
}

use crate::database::AsyncDbConnection;
use anyhow::{bail, Result};
use rusqlite::{params, OptionalExtension};
use shared_types::User;

const USER_COLUMNS: &str = "id, email, nickname, telegram_chat_id, created_at";

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        nickname: row.get(2)?,
        telegram_chat_id: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub async fn create_user(
    conn: AsyncDbConnection,
    email: &str,
    nickname: Option<&str>,
) -> Result<User> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        bail!("invalid e-mail address: '{}'", email);
    }

    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let user = conn.query_row(
        &format!(
            "INSERT INTO users (email, nickname, created_at) VALUES (?, ?, ?)
             RETURNING {USER_COLUMNS}"
        ),
        params![email, nickname, now],
        row_to_user,
    )?;

    Ok(user)
}

pub async fn list_users(conn: AsyncDbConnection) -> Result<Vec<User>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;
    let users = stmt
        .query_map([], row_to_user)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(users)
}

pub async fn get_user(conn: AsyncDbConnection, id: i64) -> Result<Option<User>> {
    let conn = conn.lock().await?;

    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"),
            [id],
            row_to_user,
        )
        .optional()?;

    Ok(user)
}

pub async fn find_by_chat_id(conn: AsyncDbConnection, chat_id: i64) -> Result<Option<User>> {
    let conn = conn.lock().await?;

    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE telegram_chat_id = ?"),
            [chat_id],
            row_to_user,
        )
        .optional()?;

    Ok(user)
}

/// Case-insensitive lookup; the column is declared `COLLATE NOCASE`
pub async fn find_by_email(conn: AsyncDbConnection, email: &str) -> Result<Option<User>> {
    let conn = conn.lock().await?;

    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"),
            [email.trim()],
            row_to_user,
        )
        .optional()?;

    Ok(user)
}

pub async fn link_chat(conn: AsyncDbConnection, user_id: i64, chat_id: i64) -> Result<()> {
    let conn = conn.lock().await?;

    let updated = conn.execute(
        "UPDATE users SET telegram_chat_id = ? WHERE id = ?",
        params![chat_id, user_id],
    )?;
    if updated == 0 {
        bail!("user {} not found", user_id);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support;

    #[tokio::test]
    async fn test_create_and_find_user() {
        let db = test_support::db();
        let created = create_user(db.clone(), "Ana@Example.com", Some("Ana"))
            .await
            .unwrap();

        let by_email = find_by_email(db.clone(), "ana@example.COM").await.unwrap();
        assert_eq!(by_email, Some(created.clone()));

        assert_eq!(get_user(db.clone(), created.id).await.unwrap(), Some(created));
        assert_eq!(list_users(db.clone()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = test_support::db();
        test_support::user(&db, "ana@example.com").await;

        assert!(create_user(db.clone(), "ANA@example.com", None).await.is_err());
        assert!(create_user(db.clone(), "not-an-email", None).await.is_err());
    }

    #[tokio::test]
    async fn test_link_chat() {
        let db = test_support::db();
        let user = test_support::user(&db, "ana@example.com").await;

        assert_eq!(find_by_chat_id(db.clone(), 42).await.unwrap(), None);
        link_chat(db.clone(), user.id, 42).await.unwrap();

        let linked = find_by_chat_id(db.clone(), 42).await.unwrap().unwrap();
        assert_eq!(linked.id, user.id);
        assert_eq!(linked.telegram_chat_id, Some(42));

        assert!(link_chat(db.clone(), 999, 43).await.is_err());
    }
}

use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    // Create users table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email VARCHAR NOT NULL UNIQUE COLLATE NOCASE,
            nickname VARCHAR,
            telegram_chat_id BIGINT UNIQUE,
            created_at BIGINT NOT NULL
        )",
        [],
    )?;

    // Create accounts table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS accounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            name VARCHAR NOT NULL,
            balance DOUBLE NOT NULL DEFAULT 0,
            is_reserve BOOLEAN NOT NULL DEFAULT false,
            is_default BOOLEAN NOT NULL DEFAULT false,
            created_at BIGINT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users (id)
        )",
        [],
    )?;

    // At most one default account per user
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_accounts_default
            ON accounts(user_id) WHERE is_default",
        [],
    )?;

    // Create categories table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            name VARCHAR NOT NULL,
            kind VARCHAR NOT NULL CHECK (kind IN ('expense', 'income')),
            created_at BIGINT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_categories_user_kind
            ON categories(user_id, kind)",
        [],
    )?;

    // Create goals table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS goals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            name VARCHAR NOT NULL,
            target_amount DOUBLE NOT NULL,
            saved_amount DOUBLE NOT NULL DEFAULT 0,
            status VARCHAR NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'completed')),
            created_at BIGINT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users (id)
        )",
        [],
    )?;

    // Create budgets table, one row per category and month
    conn.execute(
        "CREATE TABLE IF NOT EXISTS budgets (
            user_id INTEGER NOT NULL,
            category_name VARCHAR NOT NULL,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
            amount DOUBLE NOT NULL,
            PRIMARY KEY (user_id, category_name, year, month),
            FOREIGN KEY (user_id) REFERENCES users (id)
        )",
        [],
    )?;

    // Create scheduled_transactions table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS scheduled_transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            description VARCHAR NOT NULL,
            amount DOUBLE NOT NULL,
            category_name VARCHAR NOT NULL,
            due_date VARCHAR NOT NULL,
            status VARCHAR NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'paid')),
            is_recurring BOOLEAN NOT NULL DEFAULT false,
            paid_at BIGINT,
            rescheduled BOOLEAN NOT NULL DEFAULT false,
            created_at BIGINT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_scheduled_user_status_due
            ON scheduled_transactions(user_id, status, due_date)",
        [],
    )?;

    // Create transactions table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            kind VARCHAR NOT NULL CHECK (kind IN ('expense', 'income', 'transfer', 'closing')),
            amount DOUBLE NOT NULL,
            category VARCHAR,
            account_id INTEGER,
            destination_account_id INTEGER,
            description VARCHAR,
            period VARCHAR,
            created_at BIGINT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users (id),
            FOREIGN KEY (account_id) REFERENCES accounts (id),
            FOREIGN KEY (destination_account_id) REFERENCES accounts (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_user_kind_created
            ON transactions(user_id, kind, created_at)",
        [],
    )?;

    // One closing record per account and month
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_transactions_closing
            ON transactions(account_id, period) WHERE kind = 'closing'",
        [],
    )?;

    // Create pending_transactions table (waiting for an account choice)
    conn.execute(
        "CREATE TABLE IF NOT EXISTS pending_transactions (
            id VARCHAR PRIMARY KEY,
            user_id INTEGER NOT NULL,
            chat_id BIGINT NOT NULL,
            kind VARCHAR NOT NULL CHECK (kind IN ('expense', 'income')),
            amount DOUBLE NOT NULL,
            category VARCHAR NOT NULL,
            description VARCHAR,
            created_at BIGINT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users (id)
        )",
        [],
    )?;

    Ok(())
}

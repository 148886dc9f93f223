use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

const CREATE_PRODUCT_TABLE: &str = r#"
    CREATE TABLE a001_product (
        id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        price INTEGER NOT NULL DEFAULT 0,
        image_urls TEXT NOT NULL DEFAULT '[]',
        is_deleted INTEGER NOT NULL DEFAULT 0,
        created_at TEXT,
        updated_at TEXT,
        version INTEGER NOT NULL DEFAULT 0
    );
"#;

const CREATE_SALES_ENTRY_TABLE: &str = r#"
    CREATE TABLE p001_sales_entry (
        id TEXT PRIMARY KEY NOT NULL,
        product_id TEXT NOT NULL,
        sold_on TEXT NOT NULL,
        quantity INTEGER NOT NULL,
        amount INTEGER NOT NULL,
        created_at TEXT
    );
"#;

const CREATE_SALES_ENTRY_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_p001_sales_entry_sold_on
        ON p001_sales_entry (sold_on, product_id);
"#;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE sys_users (
        id TEXT PRIMARY KEY NOT NULL,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        full_name TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        is_admin INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        last_login_at TEXT
    );
"#;

const CREATE_REFRESH_TOKENS_TABLE: &str = r#"
    CREATE TABLE sys_refresh_tokens (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL,
        token_hash TEXT NOT NULL,
        expires_at TEXT NOT NULL,
        created_at TEXT NOT NULL,
        revoked_at TEXT
    );
"#;

const CREATE_SETTINGS_TABLE: &str = r#"
    CREATE TABLE sys_settings (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL,
        description TEXT,
        created_at TEXT,
        updated_at TEXT
    );
"#;

/// Open (or create) the SQLite file and make sure every table exists
pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/app.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    ensure_table(&conn, "a001_product", CREATE_PRODUCT_TABLE).await?;
    ensure_table(&conn, "p001_sales_entry", CREATE_SALES_ENTRY_TABLE).await?;
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        CREATE_SALES_ENTRY_INDEX.to_string(),
    ))
    .await?;
    ensure_table(&conn, "sys_users", CREATE_USERS_TABLE).await?;
    ensure_table(&conn, "sys_refresh_tokens", CREATE_REFRESH_TOKENS_TABLE).await?;
    ensure_table(&conn, "sys_settings", CREATE_SETTINGS_TABLE).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

async fn ensure_table(conn: &DatabaseConnection, name: &str, create_sql: &str) -> anyhow::Result<()> {
    let existing = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type='table' AND name = ?",
            [name.into()],
        ))
        .await?;

    if existing.is_empty() {
        tracing::info!("Creating {} table", name);
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_sql.to_string(),
        ))
        .await?;
    }
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

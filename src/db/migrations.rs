//! Database migrations module
//!
//! Code-based migrations for the Inkpost schema. All migrations are embedded
//! as SQL strings, with variants for SQLite and MySQL, so a single binary can
//! bootstrap its own database.
//!
//! Each migration is a `Migration` struct with a unique `version`, a
//! human-readable `name`, and per-driver SQL. Applied versions are tracked in
//! the `_migrations` table.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};

use super::DynDatabasePool;
use crate::config::DatabaseDriver;

/// A database migration with SQL for both SQLite and MySQL
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (must be unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements for SQLite
    pub up_sqlite: &'static str,
    /// SQL statements for MySQL
    pub up_mysql: &'static str,
}

/// Migration record stored in the database
#[derive(Debug, Clone)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

/// All migrations for the Inkpost schema.
///
/// One store holds users, sessions, posts, and comments, with foreign keys
/// carrying the referential invariants: comments cascade away with their
/// post, sessions with their user.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_users",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email VARCHAR(250) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL,
                name VARCHAR(250) NOT NULL,
                role VARCHAR(20) NOT NULL DEFAULT 'member',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                email VARCHAR(250) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL,
                name VARCHAR(250) NOT NULL,
                role VARCHAR(20) NOT NULL DEFAULT 'member',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX idx_users_email ON users(email);
        "#,
    },
    Migration {
        version: 2,
        name: "create_sessions",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id VARCHAR(64) PRIMARY KEY,
                user_id INTEGER NOT NULL,
                expires_at TIMESTAMP NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id);
            CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id VARCHAR(64) PRIMARY KEY,
                user_id BIGINT NOT NULL,
                expires_at TIMESTAMP NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX idx_sessions_user_id ON sessions(user_id);
            CREATE INDEX idx_sessions_expires_at ON sessions(expires_at);
        "#,
    },
    Migration {
        version: 3,
        name: "create_posts",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(250) NOT NULL UNIQUE,
                subtitle VARCHAR(250) NOT NULL,
                body TEXT NOT NULL,
                image_url VARCHAR(250) NOT NULL,
                date VARCHAR(250) NOT NULL,
                author_id INTEGER NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (author_id) REFERENCES users(id)
            );
            CREATE INDEX IF NOT EXISTS idx_posts_title ON posts(title);
            CREATE INDEX IF NOT EXISTS idx_posts_author_id ON posts(author_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS posts (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                title VARCHAR(250) NOT NULL UNIQUE,
                subtitle VARCHAR(250) NOT NULL,
                body TEXT NOT NULL,
                image_url VARCHAR(250) NOT NULL,
                date VARCHAR(250) NOT NULL,
                author_id BIGINT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
                FOREIGN KEY (author_id) REFERENCES users(id)
            );
            CREATE INDEX idx_posts_title ON posts(title);
            CREATE INDEX idx_posts_author_id ON posts(author_id);
        "#,
    },
    Migration {
        version: 4,
        name: "create_comments",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                body TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE,
                FOREIGN KEY (user_id) REFERENCES users(id)
            );
            CREATE INDEX IF NOT EXISTS idx_comments_post_id ON comments(post_id);
            CREATE INDEX IF NOT EXISTS idx_comments_user_id ON comments(user_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS comments (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                post_id BIGINT NOT NULL,
                user_id BIGINT NOT NULL,
                body TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE,
                FOREIGN KEY (user_id) REFERENCES users(id)
            );
            CREATE INDEX idx_comments_post_id ON comments(post_id);
            CREATE INDEX idx_comments_user_id ON comments(user_id);
        "#,
    },
];

/// Run all pending migrations, returning how many were applied
pub async fn run_migrations(pool: &DynDatabasePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = get_applied_migrations(pool).await?;
    let applied_versions: Vec<i32> = applied.iter().map(|m| m.version as i32).collect();

    let mut count = 0;

    for migration in MIGRATIONS {
        if !applied_versions.contains(&migration.version) {
            tracing::info!(
                "Applying migration {}: {}",
                migration.version,
                migration.name
            );
            apply_migration(pool, migration)
                .await
                .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

/// Create the migrations tracking table if it doesn't exist
async fn create_migrations_table(pool: &DynDatabasePool) -> Result<()> {
    let sql = match pool.driver() {
        DatabaseDriver::Sqlite => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
        DatabaseDriver::Mysql => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INT PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
    };

    pool.execute(sql).await?;
    Ok(())
}

/// Get list of already applied migrations
async fn get_applied_migrations(pool: &DynDatabasePool) -> Result<Vec<MigrationRecord>> {
    match pool.driver() {
        DatabaseDriver::Sqlite => get_applied_migrations_sqlite(pool.as_sqlite().unwrap()).await,
        DatabaseDriver::Mysql => get_applied_migrations_mysql(pool.as_mysql().unwrap()).await,
    }
}

async fn get_applied_migrations_sqlite(pool: &SqlitePool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    let mut records = Vec::new();
    for row in rows {
        records.push(MigrationRecord {
            version: row.get("version"),
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        });
    }

    Ok(records)
}

async fn get_applied_migrations_mysql(pool: &MySqlPool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    let mut records = Vec::new();
    for row in rows {
        records.push(MigrationRecord {
            version: row.get("version"),
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        });
    }

    Ok(records)
}

/// Apply a single migration
async fn apply_migration(pool: &DynDatabasePool, migration: &Migration) -> Result<()> {
    match pool.driver() {
        DatabaseDriver::Sqlite => {
            apply_migration_sqlite(pool.as_sqlite().unwrap(), migration).await
        }
        DatabaseDriver::Mysql => apply_migration_mysql(pool.as_mysql().unwrap(), migration).await,
    }
}

async fn apply_migration_sqlite(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    // Migration SQL may contain multiple statements
    for statement in split_sql_statements(migration.up_sqlite) {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement)
                .execute(pool)
                .await
                .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
        }
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

async fn apply_migration_mysql(pool: &MySqlPool, migration: &Migration) -> Result<()> {
    for statement in split_sql_statements(migration.up_mysql) {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement)
                .execute(pool)
                .await
                .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
        }
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

/// Truncate SQL for error messages
fn truncate_sql(sql: &str) -> String {
    if sql.len() > 100 {
        format!("{}...", &sql[..100])
    } else {
        sql.to_string()
    }
}

/// Split SQL into individual statements, skipping comment-only fragments
fn split_sql_statements(sql: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut current_start = 0;
    let mut in_statement = false;

    for (i, c) in sql.char_indices() {
        match c {
            ';' => {
                if in_statement {
                    let stmt = sql[current_start..i].trim();
                    if !stmt.is_empty() && !is_comment_only(stmt) {
                        statements.push(stmt);
                    }
                    in_statement = false;
                }
                current_start = i + 1;
            }
            _ if !c.is_whitespace() && !in_statement => {
                current_start = i;
                in_statement = true;
            }
            _ => {}
        }
    }

    // Last statement without trailing semicolon
    if in_statement {
        let stmt = sql[current_start..].trim();
        if !stmt.is_empty() && !is_comment_only(stmt) {
            statements.push(stmt);
        }
    }

    statements
}

/// Check if a string contains only SQL comments
fn is_comment_only(s: &str) -> bool {
    for line in s.lines() {
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with("--") {
            return false;
        }
    }
    true
}

/// Check if migrations are up to date
pub async fn is_up_to_date(pool: &DynDatabasePool) -> Result<bool> {
    let _ = create_migrations_table(pool).await;

    let applied = get_applied_migrations(pool).await?;
    Ok(applied.len() == MIGRATIONS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[test]
    fn test_migration_versions_unique_and_sequential() {
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version, (i + 1) as i32);
        }
    }

    #[test]
    fn test_split_sql_statements() {
        let sql = "CREATE TABLE a (id INTEGER);\n-- just a comment\nCREATE INDEX i ON a(id);";
        let stmts = split_sql_statements(sql);
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].starts_with("CREATE TABLE"));
        assert!(stmts[1].starts_with("-- just a comment"));
    }

    #[test]
    fn test_split_sql_skips_comment_only_fragments() {
        let sql = "-- nothing here;\n";
        assert!(split_sql_statements(sql).is_empty());
    }

    #[tokio::test]
    async fn test_run_migrations_twice_is_idempotent() {
        let pool = create_test_pool().await.expect("Failed to create test pool");

        let first = run_migrations(&pool).await.expect("First run failed");
        assert_eq!(first, MIGRATIONS.len());

        let second = run_migrations(&pool).await.expect("Second run failed");
        assert_eq!(second, 0);

        assert!(is_up_to_date(&pool).await.unwrap());
    }

    #[tokio::test]
    async fn test_users_table_created() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();

        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, name, role) VALUES (?, ?, ?, ?)",
        )
        .bind("writer@example.com")
        .bind("hash123")
        .bind("Writer")
        .bind("admin")
        .execute(sqlite_pool)
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();

        sqlx::query("INSERT INTO users (email, password_hash, name) VALUES (?, ?, ?)")
            .bind("dup@example.com")
            .bind("hash")
            .bind("First")
            .execute(sqlite_pool)
            .await
            .expect("First insert should succeed");

        let result = sqlx::query("INSERT INTO users (email, password_hash, name) VALUES (?, ?, ?)")
            .bind("dup@example.com")
            .bind("hash")
            .bind("Second")
            .execute(sqlite_pool)
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_title_rejected() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();

        sqlx::query("INSERT INTO users (email, password_hash, name) VALUES (?, ?, ?)")
            .bind("author@example.com")
            .bind("hash")
            .bind("Author")
            .execute(sqlite_pool)
            .await
            .expect("Failed to create user");

        sqlx::query(
            "INSERT INTO posts (title, subtitle, body, image_url, date, author_id) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind("Unique Title")
        .bind("sub")
        .bind("body")
        .bind("https://img.example/a.jpg")
        .bind("August 30, 2026")
        .bind(1i64)
        .execute(sqlite_pool)
        .await
        .expect("First post should succeed");

        let result = sqlx::query(
            "INSERT INTO posts (title, subtitle, body, image_url, date, author_id) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind("Unique Title")
        .bind("other sub")
        .bind("other body")
        .bind("https://img.example/b.jpg")
        .bind("August 30, 2026")
        .bind(1i64)
        .execute(sqlite_pool)
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_comment_requires_existing_post_and_user() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();

        let result = sqlx::query("INSERT INTO comments (post_id, user_id, body) VALUES (?, ?, ?)")
            .bind(999i64)
            .bind(999i64)
            .bind("orphan")
            .execute(sqlite_pool)
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_deleting_post_cascades_comments() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();

        sqlx::query("INSERT INTO users (email, password_hash, name) VALUES (?, ?, ?)")
            .bind("c@example.com")
            .bind("hash")
            .bind("C")
            .execute(sqlite_pool)
            .await
            .unwrap();

        sqlx::query(
            "INSERT INTO posts (title, subtitle, body, image_url, date, author_id) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind("Cascade Test")
        .bind("sub")
        .bind("body")
        .bind("https://img.example/c.jpg")
        .bind("August 30, 2026")
        .bind(1i64)
        .execute(sqlite_pool)
        .await
        .unwrap();

        sqlx::query("INSERT INTO comments (post_id, user_id, body) VALUES (?, ?, ?)")
            .bind(1i64)
            .bind(1i64)
            .bind("nice post")
            .execute(sqlite_pool)
            .await
            .unwrap();

        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(1i64)
            .execute(sqlite_pool)
            .await
            .unwrap();

        let row = sqlx::query("SELECT COUNT(*) as count FROM comments")
            .fetch_one(sqlite_pool)
            .await
            .unwrap();
        let count: i64 = row.get("count");
        assert_eq!(count, 0);
    }
}

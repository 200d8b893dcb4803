use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{fs, str::FromStr};
use tracing::debug;

pub const MEMORY_DATABASE_URL: &str = "sqlite::memory:";

/// SQLite-backed key/value store for board display preferences.
#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url '{database_url}'"))?
            .create_if_missing(true);

        let in_memory = is_memory_url(database_url);
        if !in_memory {
            ensure_parent_dir(&connect_options)?;
        }

        // Every pooled connection to an in-memory database sees its own empty database.
        let max_connections = if in_memory { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open database '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run preference migrations")?;
        debug!(database_url, "preference storage ready");
        Ok(Self { pool })
    }

    pub async fn in_memory() -> Result<Self> {
        Self::new(MEMORY_DATABASE_URL).await
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn get_preference(&self, name: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM preferences WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read preference '{name}'"))?;
        Ok(row.map(|r| r.get::<String, _>(0)))
    }

    pub async fn set_preference(&self, name: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO preferences (name, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(name) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(name)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to write preference '{name}'"))?;
        Ok(())
    }
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

fn ensure_parent_dir(options: &SqliteConnectOptions) -> Result<()> {
    let Some(parent) = options.get_filename().parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent.exists() {
        return Ok(());
    }

    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create database directory '{}'", parent.display()))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

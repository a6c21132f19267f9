use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

use shared::{
    domain::{Item, ItemId},
    protocol::{CreateItemRequest, ItemPatch},
};

const ITEM_COLUMNS: &str = "id, title, description, completed, created_at, updated_at";

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// All items, newest first.
    pub async fn list_items(&self) -> Result<Vec<Item>> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .context("failed to list items")?;
        rows.iter().map(item_from_row).collect()
    }

    pub async fn get_item(&self, id: ItemId) -> Result<Option<Item>> {
        let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load item {id}"))?;
        row.as_ref().map(item_from_row).transpose()
    }

    pub async fn create_item(&self, request: &CreateItemRequest) -> Result<Item> {
        let now = Utc::now();
        let row = sqlx::query(&format!(
            "INSERT INTO items (title, description, completed, created_at, updated_at)
             VALUES (?, ?, 0, ?, ?)
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(&request.title)
        .bind(&request.description)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .context("failed to insert item")?;
        let item = item_from_row(&row)?;
        debug!(item_id = item.id.0, "stored new item");
        Ok(item)
    }

    /// Applies the present fields of `patch`; returns `None` when no such item exists.
    pub async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<Option<Item>> {
        let row = sqlx::query(&format!(
            "UPDATE items
             SET title = COALESCE(?, title),
                 description = COALESCE(?, description),
                 completed = COALESCE(?, completed),
                 updated_at = ?
             WHERE id = ?
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.completed)
        .bind(Utc::now())
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to update item {id}"))?;
        row.as_ref().map(item_from_row).transpose()
    }

    /// Returns whether a row was removed.
    pub async fn delete_item(&self, id: ItemId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete item {id}"))?;
        Ok(result.rows_affected() > 0)
    }
}

fn item_from_row(row: &SqliteRow) -> Result<Item> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
    Ok(Item {
        id: ItemId(row.try_get("id")?),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        completed: row.try_get("completed")?,
        created_at: Some(created_at),
        updated_at: Some(updated_at),
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

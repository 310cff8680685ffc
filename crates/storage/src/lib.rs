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
    domain::{Creator, CreatorId},
    protocol::IdOrder,
    schema::CreatorRecord,
};

const CREATOR_COLUMNS: &str = r#"id, name, url, description, "imageURL", created_at"#;

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

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn list_creators(&self, order: IdOrder) -> Result<Vec<Creator>> {
        let direction = match order {
            IdOrder::Ascending => "ASC",
            IdOrder::Descending => "DESC",
        };
        let rows = sqlx::query(&format!(
            "SELECT {CREATOR_COLUMNS} FROM creators ORDER BY id {direction}"
        ))
        .fetch_all(&self.pool)
        .await
        .context("failed to list creators")?;
        rows.iter().map(creator_from_row).collect()
    }

    pub async fn get_creator(&self, id: CreatorId) -> Result<Option<Creator>> {
        let row = sqlx::query(&format!(
            "SELECT {CREATOR_COLUMNS} FROM creators WHERE id = ?"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to load creator {id}"))?;
        row.as_ref().map(creator_from_row).transpose()
    }

    pub async fn insert_creator(&self, record: &CreatorRecord) -> Result<Creator> {
        let row = sqlx::query(&format!(
            r#"INSERT INTO creators (name, url, description, "imageURL", created_at)
               VALUES (?, ?, ?, ?, ?)
               RETURNING {CREATOR_COLUMNS}"#
        ))
        .bind(&record.name)
        .bind(&record.url)
        .bind(&record.description)
        .bind(record.image_url.as_deref())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("failed to insert creator")?;
        let creator = creator_from_row(&row)?;
        debug!(id = creator.id.0, "inserted creator");
        Ok(creator)
    }

    /// Replaces every writable column. `None` when no row has this id.
    pub async fn update_creator(
        &self,
        id: CreatorId,
        record: &CreatorRecord,
    ) -> Result<Option<Creator>> {
        let row = sqlx::query(&format!(
            r#"UPDATE creators
               SET name = ?, url = ?, description = ?, "imageURL" = ?
               WHERE id = ?
               RETURNING {CREATOR_COLUMNS}"#
        ))
        .bind(&record.name)
        .bind(&record.url)
        .bind(&record.description)
        .bind(record.image_url.as_deref())
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to update creator {id}"))?;
        row.as_ref().map(creator_from_row).transpose()
    }

    /// Returns whether a row was removed.
    pub async fn delete_creator(&self, id: CreatorId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM creators WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete creator {id}"))?;
        Ok(result.rows_affected() > 0)
    }
}

fn creator_from_row(row: &SqliteRow) -> Result<Creator> {
    Ok(Creator {
        id: CreatorId(row.try_get::<i64, _>("id")?),
        name: row.try_get("name")?,
        url: row.try_get("url")?,
        description: row.try_get("description")?,
        image_url: row.try_get::<Option<String>, _>("imageURL")?,
        created_at: row.try_get::<Option<DateTime<Utc>>, _>("created_at")?,
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
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
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
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

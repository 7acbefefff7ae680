use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, Sqlite, SqlitePool, migrate::MigrateDatabase};
use std::collections::HashSet;
use tracing::info;

use crate::models::CardRecord;

/// SQLite store of scraped cards, keyed by card id
#[derive(Clone)]
pub struct CardStore {
    pool: SqlitePool,
}

impl CardStore {
    pub async fn new(db_url: &str) -> Result<Self> {
        // Create database file if it doesn't exist
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            info!("Creating database file {}", db_url);
            Sqlite::create_database(db_url).await?;
        }

        // Every connection to `:memory:` is its own database
        let max_connections = if db_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(db_url)
            .await?;

        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;

        info!("Database initialized successfully");
        Ok(Self { pool })
    }

    pub async fn existing_card_ids(&self) -> Result<HashSet<String>> {
        let rows = sqlx::query("SELECT id FROM cards")
            .fetch_all(&self.pool)
            .await?;

        let ids = rows
            .into_iter()
            .map(|row| row.get::<String, _>("id"))
            .collect();

        Ok(ids)
    }

    /// Insert or replace the stored record for this card
    pub async fn save_card(&self, record: &CardRecord, scraped_at: DateTime<Utc>) -> Result<()> {
        let card = record.as_card();

        sqlx::query(
            r"
            INSERT INTO cards (id, name, super_type, detailed, record, scraped_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                super_type = excluded.super_type,
                detailed = excluded.detailed,
                record = excluded.record,
                scraped_at = excluded.scraped_at
            ",
        )
        .bind(record.id())
        .bind(card.map(|c| c.name.as_str()))
        .bind(card.map(|c| c.super_type().as_str()))
        .bind(card.is_some())
        .bind(serde_json::to_string(record)?)
        .bind(scraped_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn load_card(&self, id: &str) -> Result<Option<CardRecord>> {
        let row = sqlx::query("SELECT record FROM cards WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            let json: String = row.get("record");
            serde_json::from_str(&json).map_err(anyhow::Error::from)
        })
        .transpose()
    }

    pub async fn card_count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM cards")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("count"))
    }
}

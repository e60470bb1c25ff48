//! Prelaunch lead repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Prelaunch lead record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LeadRecord {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a lead
#[derive(Debug, Clone)]
pub struct CreateLead {
    pub email: String,
    pub name: Option<String>,
    pub source: Option<String>,
}

/// Lead repository for database operations
pub struct LeadRepository;

impl LeadRepository {
    /// Insert a new lead
    pub async fn create(pool: &PgPool, input: CreateLead) -> Result<LeadRecord> {
        let record = sqlx::query_as::<_, LeadRecord>(
            r#"
            INSERT INTO prelaunch_leads (email, name, source)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, source, created_at
            "#,
        )
        .bind(&input.email)
        .bind(&input.name)
        .bind(&input.source)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// List all leads, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<LeadRecord>> {
        let records = sqlx::query_as::<_, LeadRecord>(
            r#"
            SELECT id, email, name, source, created_at
            FROM prelaunch_leads
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Delete every lead with the given email, returning the deleted rows
    pub async fn delete_by_email(pool: &PgPool, email: &str) -> Result<Vec<LeadRecord>> {
        let records = sqlx::query_as::<_, LeadRecord>(
            r#"
            DELETE FROM prelaunch_leads
            WHERE LOWER(email) = LOWER($1)
            RETURNING id, email, name, source, created_at
            "#,
        )
        .bind(email)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}

//! Brotherhood repository - groups, events, RSVPs and the forum

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Group with membership information for the viewing member
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub member_count: i64,
    pub is_member: bool,
    pub created_at: DateTime<Utc>,
}

/// Event with RSVP counts and the viewer's own answer
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRecord {
    pub id: Uuid,
    pub group_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: Option<i32>,
    pub going: i64,
    pub maybe: i64,
    pub not_going: i64,
    pub my_rsvp: Option<String>,
}

/// Input for creating an event
#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub group_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: Option<i32>,
    pub created_by: Uuid,
}

/// Forum topic with its reply count
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TopicRecord {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub reply_count: i64,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

/// Forum post record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRecord {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Result of storing an RSVP against a possibly full event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpWrite {
    Stored,
    Full,
    EventMissing,
}

/// Whether one more member fits next to `others_going` attendees
pub fn seat_available(capacity: Option<i32>, others_going: i64) -> bool {
    capacity.map_or(true, |capacity| others_going < i64::from(capacity))
}

const GROUP_SELECT: &str = r#"
    SELECT g.id, g.name, g.description,
           (SELECT COUNT(*) FROM group_members m WHERE m.group_id = g.id) AS member_count,
           EXISTS(SELECT 1 FROM group_members m WHERE m.group_id = g.id AND m.user_id = $1) AS is_member,
           g.created_at
    FROM brotherhood_groups g
"#;

const EVENT_SELECT: &str = r#"
    SELECT e.id, e.group_id, e.title, e.description, e.location, e.starts_at, e.ends_at, e.capacity,
           COUNT(r.user_id) FILTER (WHERE r.status = 'going') AS going,
           COUNT(r.user_id) FILTER (WHERE r.status = 'maybe') AS maybe,
           COUNT(r.user_id) FILTER (WHERE r.status = 'not_going') AS not_going,
           MAX(r.status) FILTER (WHERE r.user_id = $1) AS my_rsvp
    FROM brotherhood_events e
    LEFT JOIN event_rsvps r ON r.event_id = e.id
"#;

const TOPIC_SELECT: &str = r#"
    SELECT t.id, t.title, t.body, t.author_id, t.group_id,
           (SELECT COUNT(*) FROM forum_posts p WHERE p.topic_id = t.id) AS reply_count,
           t.created_at, t.last_activity_at
    FROM forum_topics t
"#;

/// Group repository
pub struct GroupRepository;

impl GroupRepository {
    pub async fn list(pool: &PgPool, viewer: Uuid) -> Result<Vec<GroupRecord>> {
        let sql = format!("{GROUP_SELECT} ORDER BY g.name");

        let records = sqlx::query_as::<_, GroupRecord>(&sql)
            .bind(viewer)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    pub async fn find_by_id(pool: &PgPool, viewer: Uuid, id: Uuid) -> Result<Option<GroupRecord>> {
        let sql = format!("{GROUP_SELECT} WHERE g.id = $2");

        let record = sqlx::query_as::<_, GroupRecord>(&sql)
            .bind(viewer)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    pub async fn create(
        pool: &PgPool,
        created_by: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO brotherhood_groups (name, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(created_by)
        .fetch_one(pool)
        .await?;

        Ok(id)
    }

    /// Add a member; joining twice is a no-op
    pub async fn add_member(pool: &PgPool, group_id: Uuid, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO group_members (group_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (group_id, user_id) DO NOTHING
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn remove_member(pool: &PgPool, group_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Event repository
pub struct EventRepository;

impl EventRepository {
    /// Events that have not ended yet, soonest first
    pub async fn list_upcoming(
        pool: &PgPool,
        viewer: Uuid,
        group_id: Option<Uuid>,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<EventRecord>> {
        let sql = format!(
            r#"
            {EVENT_SELECT}
            WHERE e.ends_at >= $2 AND ($3::uuid IS NULL OR e.group_id = $3)
            GROUP BY e.id
            ORDER BY e.starts_at
            LIMIT $4
            "#
        );

        let records = sqlx::query_as::<_, EventRecord>(&sql)
            .bind(viewer)
            .bind(now)
            .bind(group_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    pub async fn find_by_id(pool: &PgPool, viewer: Uuid, id: Uuid) -> Result<Option<EventRecord>> {
        let sql = format!("{EVENT_SELECT} WHERE e.id = $2 GROUP BY e.id");

        let record = sqlx::query_as::<_, EventRecord>(&sql)
            .bind(viewer)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    pub async fn create(pool: &PgPool, input: CreateEvent) -> Result<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO brotherhood_events
                (group_id, title, description, location, starts_at, ends_at, capacity, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(input.group_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.location)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .bind(input.capacity)
        .bind(input.created_by)
        .fetch_one(pool)
        .await?;

        Ok(id)
    }

    /// Insert or replace a member's RSVP
    ///
    /// The event row stays locked until commit, so concurrent "going"
    /// answers are counted one after another against the capacity.
    pub async fn upsert_rsvp(
        pool: &PgPool,
        event_id: Uuid,
        user_id: Uuid,
        status: &str,
        needs_seat: bool,
    ) -> Result<RsvpWrite> {
        let mut tx = pool.begin().await?;

        let capacity: Option<Option<i32>> =
            sqlx::query_scalar("SELECT capacity FROM brotherhood_events WHERE id = $1 FOR UPDATE")
                .bind(event_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(capacity) = capacity else {
            return Ok(RsvpWrite::EventMissing);
        };

        if needs_seat && capacity.is_some() {
            let others_going: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(*) FROM event_rsvps
                WHERE event_id = $1 AND status = 'going' AND user_id <> $2
                "#,
            )
            .bind(event_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

            if !seat_available(capacity, others_going) {
                return Ok(RsvpWrite::Full);
            }
        }

        sqlx::query(
            r#"
            INSERT INTO event_rsvps (event_id, user_id, status)
            VALUES ($1, $2, $3)
            ON CONFLICT (event_id, user_id)
            DO UPDATE SET status = EXCLUDED.status, updated_at = NOW()
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .bind(status)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(RsvpWrite::Stored)
    }
}

/// Forum repository
pub struct ForumRepository;

impl ForumRepository {
    /// Topics by most recent activity
    pub async fn list_topics(
        pool: &PgPool,
        group_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<TopicRecord>> {
        let sql = format!(
            r#"
            {TOPIC_SELECT}
            WHERE ($1::uuid IS NULL OR t.group_id = $1)
            ORDER BY t.last_activity_at DESC
            LIMIT $2
            "#
        );

        let records = sqlx::query_as::<_, TopicRecord>(&sql)
            .bind(group_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    pub async fn find_topic(pool: &PgPool, id: Uuid) -> Result<Option<TopicRecord>> {
        let sql = format!("{TOPIC_SELECT} WHERE t.id = $1");

        let record = sqlx::query_as::<_, TopicRecord>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    pub async fn create_topic(
        pool: &PgPool,
        author_id: Uuid,
        title: &str,
        body: &str,
        group_id: Option<Uuid>,
    ) -> Result<TopicRecord> {
        let record = sqlx::query_as::<_, TopicRecord>(
            r#"
            INSERT INTO forum_topics (title, body, author_id, group_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, body, author_id, group_id, 0::bigint AS reply_count,
                      created_at, last_activity_at
            "#,
        )
        .bind(title)
        .bind(body)
        .bind(author_id)
        .bind(group_id)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Posts of a topic, oldest first
    pub async fn list_posts(pool: &PgPool, topic_id: Uuid) -> Result<Vec<PostRecord>> {
        let records = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT id, topic_id, author_id, body, created_at
            FROM forum_posts
            WHERE topic_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(topic_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Add a reply and bump the topic's last activity in one transaction
    pub async fn create_post(
        pool: &PgPool,
        topic_id: Uuid,
        author_id: Uuid,
        body: &str,
    ) -> Result<PostRecord> {
        let mut tx = pool.begin().await?;

        let record = sqlx::query_as::<_, PostRecord>(
            r#"
            INSERT INTO forum_posts (topic_id, author_id, body)
            VALUES ($1, $2, $3)
            RETURNING id, topic_id, author_id, body, created_at
            "#,
        )
        .bind(topic_id)
        .bind(author_id)
        .bind(body)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE forum_topics SET last_activity_at = $2 WHERE id = $1")
            .bind(topic_id)
            .bind(record.created_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, 100, true)]
    #[case(Some(10), 9, true)]
    #[case(Some(10), 10, false)]
    #[case(Some(0), 0, false)]
    fn test_seat_available(
        #[case] capacity: Option<i32>,
        #[case] others_going: i64,
        #[case] expected: bool,
    ) {
        assert_eq!(seat_available(capacity, others_going), expected);
    }
}

//! Brotherhood service - groups, events and the forum

use crate::error::{is_unique_violation, ApiError};
use crate::repositories::{
    CreateEvent, EventRecord, EventRepository, ForumRepository, GroupRecord, GroupRepository,
    PostRecord, RsvpWrite, TopicRecord,
};
use crate::services::nutrition::parse_id;
use crate::services::workout::normalize_limit;
use chrono::Utc;
use sqlx::PgPool;
use top_tier_shared::calendar::{CalendarEvent, CalendarLinks};
use top_tier_shared::types::{
    CreateEventRequest, CreateGroupRequest, CreatePostRequest, CreateTopicRequest, EventQuery,
    EventResponse, GroupResponse, PostResponse, RsvpCounts, RsvpRequest, TopicResponse,
};
use top_tier_shared::validation::validate_name;
use top_tier_shared::RsvpStatus;
use tracing::info;
use uuid::Uuid;

const MAX_POST_LEN: usize = 10_000;

impl From<GroupRecord> for GroupResponse {
    fn from(r: GroupRecord) -> Self {
        GroupResponse {
            id: r.id.to_string(),
            name: r.name,
            description: r.description,
            member_count: r.member_count,
            is_member: r.is_member,
            created_at: r.created_at,
        }
    }
}

impl From<EventRecord> for EventResponse {
    fn from(r: EventRecord) -> Self {
        EventResponse {
            id: r.id.to_string(),
            group_id: r.group_id.map(|id| id.to_string()),
            title: r.title,
            description: r.description,
            location: r.location,
            starts_at: r.starts_at,
            ends_at: r.ends_at,
            capacity: r.capacity,
            rsvps: RsvpCounts {
                going: r.going,
                maybe: r.maybe,
                not_going: r.not_going,
            },
            my_rsvp: r.my_rsvp,
        }
    }
}

impl From<TopicRecord> for TopicResponse {
    fn from(r: TopicRecord) -> Self {
        TopicResponse {
            id: r.id.to_string(),
            title: r.title,
            body: r.body,
            author_id: r.author_id.to_string(),
            group_id: r.group_id.map(|id| id.to_string()),
            reply_count: r.reply_count,
            created_at: r.created_at,
            last_activity_at: r.last_activity_at,
        }
    }
}

impl From<PostRecord> for PostResponse {
    fn from(r: PostRecord) -> Self {
        PostResponse {
            id: r.id.to_string(),
            topic_id: r.topic_id.to_string(),
            author_id: r.author_id.to_string(),
            body: r.body,
            created_at: r.created_at,
        }
    }
}

/// Calendar representation of a stored event
pub fn calendar_event(record: &EventRecord) -> Result<CalendarEvent, ApiError> {
    let event = CalendarEvent::new(
        format!("{}@toptiermen.eu", record.id),
        record.title.clone(),
        record.starts_at,
        record.ends_at,
    )?
    .with_description(record.description.clone())
    .with_location(record.location.clone());
    Ok(event)
}

fn validate_post_body(body: &str) -> Result<String, ApiError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(ApiError::field("body", "Message cannot be empty"));
    }
    if body.len() > MAX_POST_LEN {
        return Err(ApiError::field(
            "body",
            format!("Message cannot exceed {} characters", MAX_POST_LEN),
        ));
    }
    Ok(body.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Brotherhood service for business logic
pub struct BrotherhoodService;

impl BrotherhoodService {
    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    pub async fn list_groups(pool: &PgPool, viewer: Uuid) -> Result<Vec<GroupResponse>, ApiError> {
        let records = GroupRepository::list(pool, viewer)
            .await
            .map_err(ApiError::Internal)?;
        Ok(records.into_iter().map(GroupResponse::from).collect())
    }

    pub async fn create_group(
        pool: &PgPool,
        admin: Uuid,
        req: CreateGroupRequest,
    ) -> Result<GroupResponse, ApiError> {
        validate_name("Group name", &req.name).map_err(|msg| ApiError::field("name", msg))?;
        let description = optional_text(req.description);

        let id = GroupRepository::create(pool, admin, req.name.trim(), description.as_deref())
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ApiError::Conflict("A group with this name already exists".to_string())
                } else {
                    ApiError::Internal(e)
                }
            })?;

        info!(group_id = %id, "Brotherhood group created");
        Self::group(pool, admin, id).await
    }

    pub async fn join_group(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<GroupResponse, ApiError> {
        Self::group(pool, user_id, id).await?;
        GroupRepository::add_member(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        info!(group_id = %id, user_id = %user_id, "Member joined group");
        Self::group(pool, user_id, id).await
    }

    pub async fn leave_group(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<GroupResponse, ApiError> {
        Self::group(pool, user_id, id).await?;
        let left = GroupRepository::remove_member(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        if left {
            info!(group_id = %id, user_id = %user_id, "Member left group");
        }
        Self::group(pool, user_id, id).await
    }

    async fn group(pool: &PgPool, viewer: Uuid, id: Uuid) -> Result<GroupResponse, ApiError> {
        GroupRepository::find_by_id(pool, viewer, id)
            .await
            .map_err(ApiError::Internal)?
            .map(GroupResponse::from)
            .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Events that have not ended, soonest first
    pub async fn list_events(
        pool: &PgPool,
        viewer: Uuid,
        query: EventQuery,
    ) -> Result<Vec<EventResponse>, ApiError> {
        let group_id = query
            .group_id
            .as_deref()
            .map(|id| parse_id("group_id", id))
            .transpose()?;

        let records = EventRepository::list_upcoming(
            pool,
            viewer,
            group_id,
            Utc::now(),
            normalize_limit(query.limit),
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(EventResponse::from).collect())
    }

    pub async fn get_event(pool: &PgPool, viewer: Uuid, id: Uuid) -> Result<EventResponse, ApiError> {
        Self::event(pool, viewer, id).await.map(EventResponse::from)
    }

    pub async fn create_event(
        pool: &PgPool,
        admin: Uuid,
        req: CreateEventRequest,
    ) -> Result<EventResponse, ApiError> {
        CalendarEvent::new("", req.title.clone(), req.starts_at, req.ends_at)?;
        if matches!(req.capacity, Some(c) if c <= 0) {
            return Err(ApiError::field("capacity", "Capacity must be positive"));
        }

        let group_id = match req.group_id.as_deref() {
            Some(raw) => {
                let id = parse_id("group_id", raw)?;
                Self::group(pool, admin, id).await?;
                Some(id)
            }
            None => None,
        };

        let id = EventRepository::create(
            pool,
            CreateEvent {
                group_id,
                title: req.title.trim().to_string(),
                description: optional_text(req.description),
                location: optional_text(req.location),
                starts_at: req.starts_at,
                ends_at: req.ends_at,
                capacity: req.capacity,
                created_by: admin,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        info!(event_id = %id, starts_at = %req.starts_at, "Brotherhood event created");
        Self::get_event(pool, admin, id).await
    }

    /// Set the member's answer for an event, replacing any earlier one
    pub async fn rsvp(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: RsvpRequest,
    ) -> Result<EventResponse, ApiError> {
        let status: RsvpStatus = req
            .status
            .parse()
            .map_err(|msg: String| ApiError::field("status", msg))?;

        let needs_seat = status == RsvpStatus::Going;
        match EventRepository::upsert_rsvp(pool, id, user_id, status.as_str(), needs_seat)
            .await
            .map_err(ApiError::Internal)?
        {
            RsvpWrite::Stored => {}
            RsvpWrite::Full => return Err(ApiError::Conflict("Event is full".to_string())),
            RsvpWrite::EventMissing => {
                return Err(ApiError::NotFound("Event not found".to_string()))
            }
        }

        info!(event_id = %id, user_id = %user_id, status = %status, "RSVP stored");
        Self::get_event(pool, user_id, id).await
    }

    /// iCalendar document and download file name for an event
    pub async fn event_ics(pool: &PgPool, viewer: Uuid, id: Uuid) -> Result<(String, String), ApiError> {
        let record = Self::event(pool, viewer, id).await?;
        let event = calendar_event(&record)?;
        Ok((event.ics_filename(), event.to_ics(Utc::now())))
    }

    pub async fn event_links(pool: &PgPool, viewer: Uuid, id: Uuid) -> Result<CalendarLinks, ApiError> {
        let record = Self::event(pool, viewer, id).await?;
        Ok(calendar_event(&record)?.links())
    }

    async fn event(pool: &PgPool, viewer: Uuid, id: Uuid) -> Result<EventRecord, ApiError> {
        EventRepository::find_by_id(pool, viewer, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))
    }

    // ------------------------------------------------------------------
    // Forum
    // ------------------------------------------------------------------

    pub async fn list_topics(
        pool: &PgPool,
        group_id: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<TopicResponse>, ApiError> {
        let group_id = group_id.map(|id| parse_id("group_id", id)).transpose()?;
        let records = ForumRepository::list_topics(pool, group_id, normalize_limit(limit))
            .await
            .map_err(ApiError::Internal)?;
        Ok(records.into_iter().map(TopicResponse::from).collect())
    }

    pub async fn create_topic(
        pool: &PgPool,
        author_id: Uuid,
        req: CreateTopicRequest,
    ) -> Result<TopicResponse, ApiError> {
        validate_name("Title", &req.title).map_err(|msg| ApiError::field("title", msg))?;
        let body = validate_post_body(&req.body)?;
        let group_id = match req.group_id.as_deref() {
            Some(raw) => {
                let id = parse_id("group_id", raw)?;
                Self::group(pool, author_id, id).await?;
                Some(id)
            }
            None => None,
        };

        let record = ForumRepository::create_topic(pool, author_id, req.title.trim(), &body, group_id)
            .await
            .map_err(ApiError::Internal)?;

        info!(topic_id = %record.id, author_id = %author_id, "Forum topic created");
        Ok(record.into())
    }

    pub async fn list_posts(pool: &PgPool, topic_id: Uuid) -> Result<Vec<PostResponse>, ApiError> {
        Self::topic(pool, topic_id).await?;
        let records = ForumRepository::list_posts(pool, topic_id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(records.into_iter().map(PostResponse::from).collect())
    }

    /// Reply to a topic; bumps the topic's last activity
    pub async fn reply(
        pool: &PgPool,
        author_id: Uuid,
        topic_id: Uuid,
        req: CreatePostRequest,
    ) -> Result<PostResponse, ApiError> {
        let body = validate_post_body(&req.body)?;
        Self::topic(pool, topic_id).await?;

        let record = ForumRepository::create_post(pool, topic_id, author_id, &body)
            .await
            .map_err(ApiError::Internal)?;

        info!(topic_id = %topic_id, post_id = %record.id, "Forum reply posted");
        Ok(record.into())
    }

    async fn topic(pool: &PgPool, id: Uuid) -> Result<TopicRecord, ApiError> {
        ForumRepository::find_topic(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Topic not found".to_string()))
    }
}

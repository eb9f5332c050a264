use super::IEventRepo;
use anyhow::Context;
use lull_domain::{EventStatus, Feedback, ReminderEvent, ID};
use sqlx::{FromRow, PgPool};
use std::convert::TryFrom;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventRaw {
    event_id: i64,
    owner_ref: String,
    raw_input: String,
    event_ts: i64,
    trigger_ts: i64,
    status: String,
    bucket: String,
    intent: String,
    complexity: String,
    prep_required: bool,
    dependencies_json: String,
    reason: String,
    feedback: Option<String>,
    created: i64,
}

impl TryFrom<EventRaw> for ReminderEvent {
    type Error = anyhow::Error;

    fn try_from(raw: EventRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: ID::new(raw.event_id),
            owner_ref: raw.owner_ref,
            raw_input: raw.raw_input,
            event_ts: raw.event_ts,
            trigger_ts: raw.trigger_ts,
            status: raw.status.parse()?,
            bucket: raw.bucket.parse()?,
            intent: raw.intent.parse()?,
            complexity: raw.complexity.parse()?,
            prep_required: raw.prep_required,
            dependencies: ReminderEvent::parse_dependencies_json(&raw.dependencies_json),
            reason: raw.reason,
            feedback: raw.feedback.map(|f| f.parse::<Feedback>()).transpose()?,
            created: raw.created,
        })
    }
}

fn into_events(rows: Vec<EventRaw>) -> anyhow::Result<Vec<ReminderEvent>> {
    rows.into_iter().map(ReminderEvent::try_from).collect()
}

const SELECT_EVENTS: &str = r#"
    SELECT event_id, owner_ref, raw_input, event_ts, trigger_ts, status, bucket,
        intent, complexity, prep_required, dependencies_json, reason, feedback, created
    FROM events
"#;

#[async_trait::async_trait]
impl IEventRepo for PostgresEventRepo {
    async fn insert(&self, e: &ReminderEvent) -> anyhow::Result<ReminderEvent> {
        let (event_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO events(
                owner_ref,
                raw_input,
                event_ts,
                trigger_ts,
                status,
                bucket,
                intent,
                complexity,
                prep_required,
                dependencies_json,
                reason,
                feedback,
                created
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING event_id
            "#,
        )
        .bind(&e.owner_ref)
        .bind(&e.raw_input)
        .bind(e.event_ts)
        .bind(e.trigger_ts)
        .bind(e.status.as_str())
        .bind(e.bucket.as_str())
        .bind(e.intent.as_str())
        .bind(e.complexity.as_str())
        .bind(e.prep_required)
        .bind(e.dependencies_json())
        .bind(&e.reason)
        .bind(e.feedback.map(|f| f.as_str()))
        .bind(e.created)
        .fetch_one(&self.pool)
        .await
        .context("Unable to insert event")?;

        let mut stored = e.clone();
        stored.id = ID::new(event_id);
        Ok(stored)
    }

    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<ReminderEvent>> {
        let query = format!("{} WHERE event_id = $1", SELECT_EVENTS);
        let raw: Option<EventRaw> = sqlx::query_as(&query)
            .bind(event_id.inner())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Unable to load event {}", event_id))?;
        raw.map(|raw| {
            ReminderEvent::try_from(raw)
                .with_context(|| format!("Stored event {} is corrupt", event_id))
        })
        .transpose()
    }

    async fn list_pending_future(&self, now: i64) -> anyhow::Result<Vec<ReminderEvent>> {
        let query = format!(
            "{} WHERE status = 'SILENT' AND trigger_ts > $1 ORDER BY trigger_ts",
            SELECT_EVENTS
        );
        let rows: Vec<EventRaw> = sqlx::query_as(&query)
            .bind(now)
            .fetch_all(&self.pool)
            .await?;
        into_events(rows)
    }

    async fn list_missed(&self, now: i64) -> anyhow::Result<Vec<ReminderEvent>> {
        let query = format!(
            "{} WHERE status = 'SILENT' AND trigger_ts <= $1 ORDER BY trigger_ts",
            SELECT_EVENTS
        );
        let rows: Vec<EventRaw> = sqlx::query_as(&query)
            .bind(now)
            .fetch_all(&self.pool)
            .await?;
        into_events(rows)
    }

    async fn list_recent_by_owner(
        &self,
        owner_ref: &str,
        limit: i64,
    ) -> anyhow::Result<Vec<ReminderEvent>> {
        let query = format!(
            "{} WHERE owner_ref = $1 ORDER BY created DESC, event_id DESC LIMIT $2",
            SELECT_EVENTS
        );
        let rows: Vec<EventRaw> = sqlx::query_as(&query)
            .bind(owner_ref)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        into_events(rows)
    }

    async fn list_recent_by_owner_and_status(
        &self,
        owner_ref: &str,
        status: EventStatus,
        limit: i64,
    ) -> anyhow::Result<Vec<ReminderEvent>> {
        let query = format!(
            "{} WHERE owner_ref = $1 AND status = $2 ORDER BY created DESC, event_id DESC LIMIT $3",
            SELECT_EVENTS
        );
        let rows: Vec<EventRaw> = sqlx::query_as(&query)
            .bind(owner_ref)
            .bind(status.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        into_events(rows)
    }

    async fn mark_delivered(&self, event_id: &ID) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE events SET status = 'DELIVERED'
            WHERE event_id = $1 AND status = 'SILENT'
            "#,
        )
        .bind(event_id.inner())
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn mark_canceled(&self, event_id: &ID) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE events SET status = 'CANCELED'
            WHERE event_id = $1 AND status = 'SILENT'
            "#,
        )
        .bind(event_id.inner())
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn set_feedback(&self, event_id: &ID, feedback: Feedback) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE events SET feedback = $2
            WHERE event_id = $1 AND status = 'DELIVERED'
            "#,
        )
        .bind(event_id.inner())
        .bind(feedback.as_str())
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn append_reason(&self, event_id: &ID, suffix: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE events SET reason = reason || $2 WHERE event_id = $1")
            .bind(event_id.inner())
            .bind(suffix)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

use super::IEventRepo;
use gatherly_domain::{Event, ReminderWindow, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

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
    event_uid: Uuid,
    title: String,
    description: Option<String>,
    start_ts: i64,
    capacity: Option<i64>,
    owner_uid: Uuid,
    created: i64,
    updated: i64,
}

impl From<EventRaw> for Event {
    fn from(e: EventRaw) -> Self {
        Self {
            id: e.event_uid.into(),
            title: e.title,
            description: e.description,
            start_ts: e.start_ts,
            capacity: e.capacity,
            owner_id: e.owner_uid.into(),
            created: e.created,
            updated: e.updated,
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for PostgresEventRepo {
    async fn insert(&self, e: &Event) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events(
                event_uid,
                title,
                description,
                start_ts,
                capacity,
                owner_uid,
                created,
                updated
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(e.id.inner_ref())
        .bind(&e.title)
        .bind(&e.description)
        .bind(e.start_ts)
        .bind(e.capacity)
        .bind(e.owner_id.inner_ref())
        .bind(e.created)
        .bind(e.updated)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            error!("Unable to insert event: {:?}. DB returned error: {:?}", e, err);
            err
        })?;

        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<Event> {
        sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT * FROM events AS e
            WHERE e.event_uid = $1
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            error!("Find event with id: {} failed. DB returned error: {:?}", event_id, err);
            err
        })
        .ok()
        .flatten()
        .map(|e| e.into())
    }

    async fn find_in_window(&self, window: &ReminderWindow) -> anyhow::Result<Vec<Event>> {
        let events = sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT * FROM events AS e
            WHERE e.start_ts >= $1 AND e.start_ts < $2
            ORDER BY e.start_ts
            "#,
        )
        .bind(window.start())
        .bind(window.end())
        .fetch_all(&self.pool)
        .await?;

        Ok(events.into_iter().map(|e| e.into()).collect())
    }

    async fn delete(&self, event_id: &ID) -> Option<Event> {
        sqlx::query_as::<_, EventRaw>(
            r#"
            DELETE FROM events AS e
            WHERE e.event_uid = $1
            RETURNING *
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            error!("Delete event with id: {} failed. DB returned error: {:?}", event_id, err);
            err
        })
        .ok()
        .flatten()
        .map(|e| e.into())
    }
}

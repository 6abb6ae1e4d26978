use super::{IParticipantRepo, InsertParticipantResult};
use crate::repos::shared::repo::DeleteResult;
use gatherly_domain::{Event, Participant, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresParticipantRepo {
    pool: PgPool,
}

impl PostgresParticipantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ParticipantRaw {
    participant_uid: Uuid,
    event_uid: Uuid,
    email: String,
    name: Option<String>,
    notified: bool,
    created: i64,
}

impl From<ParticipantRaw> for Participant {
    fn from(e: ParticipantRaw) -> Self {
        Self {
            id: e.participant_uid.into(),
            event_id: e.event_uid.into(),
            email: e.email,
            name: e.name,
            notified: e.notified,
            created: e.created,
        }
    }
}

#[async_trait::async_trait]
impl IParticipantRepo for PostgresParticipantRepo {
    async fn insert_within_capacity(
        &self,
        participant: &Participant,
        capacity: Option<i64>,
    ) -> anyhow::Result<InsertParticipantResult> {
        let mut tx = self.pool.begin().await?;

        // Concurrent subscribers to the same event queue up on this row lock
        let locked_event: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT e.event_uid FROM events AS e
            WHERE e.event_uid = $1
            FOR UPDATE
            "#,
        )
        .bind(participant.event_id.inner_ref())
        .fetch_optional(&mut *tx)
        .await?;
        if locked_event.is_none() {
            anyhow::bail!("Event with id: {} was not found", participant.event_id);
        }

        let existing = sqlx::query_as::<_, ParticipantRaw>(
            r#"
            SELECT * FROM participants AS p
            WHERE p.event_uid = $1 AND p.email = $2
            "#,
        )
        .bind(participant.event_id.inner_ref())
        .bind(&participant.email)
        .fetch_optional(&mut *tx)
        .await?;
        if let Some(existing) = existing {
            tx.commit().await?;
            return Ok(InsertParticipantResult::AlreadySubscribed(existing.into()));
        }

        if let Some(capacity) = capacity {
            let (count,): (i64,) = sqlx::query_as(
                r#"
                SELECT COUNT(*) FROM participants AS p
                WHERE p.event_uid = $1
                "#,
            )
            .bind(participant.event_id.inner_ref())
            .fetch_one(&mut *tx)
            .await?;
            if !Event::has_room_for_one_more(Some(capacity), count) {
                tx.rollback().await?;
                return Ok(InsertParticipantResult::CapacityExceeded);
            }
        }

        sqlx::query(
            r#"
            INSERT INTO participants(participant_uid, event_uid, email, name, notified, created)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(participant.id.inner_ref())
        .bind(participant.event_id.inner_ref())
        .bind(&participant.email)
        .bind(&participant.name)
        .bind(participant.notified)
        .bind(participant.created)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert participant: {:?}. DB returned error: {:?}",
                participant, e
            );
            e
        })?;
        tx.commit().await?;

        Ok(InsertParticipantResult::Inserted(participant.clone()))
    }

    async fn find_by_event_and_email(&self, event_id: &ID, email: &str) -> Option<Participant> {
        sqlx::query_as::<_, ParticipantRaw>(
            r#"
            SELECT * FROM participants AS p
            WHERE p.event_uid = $1 AND p.email = $2
            "#,
        )
        .bind(event_id.inner_ref())
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find participant {} of event {} failed. DB returned error: {:?}",
                email, event_id, e
            );
            e
        })
        .ok()
        .flatten()
        .map(|p| p.into())
    }

    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Participant>> {
        let participants = sqlx::query_as::<_, ParticipantRaw>(
            r#"
            SELECT * FROM participants AS p
            WHERE p.event_uid = $1
            ORDER BY p.created
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        Ok(participants.into_iter().map(|p| p.into()).collect())
    }

    async fn find_unnotified_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Participant>> {
        let participants = sqlx::query_as::<_, ParticipantRaw>(
            r#"
            SELECT * FROM participants AS p
            WHERE p.event_uid = $1 AND p.notified = false
            ORDER BY p.created
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        Ok(participants.into_iter().map(|p| p.into()).collect())
    }

    async fn count_by_event(&self, event_id: &ID) -> anyhow::Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM participants AS p
            WHERE p.event_uid = $1
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn delete_by_event_and_email(&self, event_id: &ID, email: &str) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            DELETE FROM participants AS p
            WHERE p.event_uid = $1 AND p.email = $2
            "#,
        )
        .bind(event_id.inner_ref())
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() > 0)
    }

    async fn delete_by_event(&self, event_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM participants AS p
            WHERE p.event_uid = $1
            "#,
        )
        .bind(event_id.inner_ref())
        .execute(&self.pool)
        .await?;

        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }

    async fn set_notified(&self, participant_id: &ID) -> anyhow::Result<()> {
        let res = sqlx::query(
            r#"
            UPDATE participants
            SET notified = true
            WHERE participant_uid = $1
            "#,
        )
        .bind(participant_id.inner_ref())
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            anyhow::bail!("Participant with id: {} was not found", participant_id);
        }
        Ok(())
    }
}

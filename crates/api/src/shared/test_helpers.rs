use gatherly_domain::{DailyTrigger, Event, Participant, ID};
use gatherly_infra::{
    DeleteResult, GatherlyContext, IParticipantRepo, ISys, InMemoryMailer, InsertParticipantResult,
};
use std::sync::Arc;

pub const HOUR_MILLIS: i64 = 1000 * 60 * 60;

/// Sun Feb 21 2021 00:00:00 GMT+0100
pub const NOW: i64 = 1613862000000;

pub struct StaticTimeSys(pub i64);
impl ISys for StaticTimeSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.0
    }
}

pub struct TestContext {
    pub ctx: GatherlyContext,
    pub mailer: Arc<InMemoryMailer>,
}

pub fn setup() -> TestContext {
    let mut ctx = GatherlyContext::create_inmemory();
    ctx.sys = Arc::new(StaticTimeSys(NOW));
    ctx.config.reminder_trigger = DailyTrigger::morning(chrono_tz::UTC);
    let mailer = Arc::new(InMemoryMailer::new());
    ctx.mailer = mailer.clone();

    TestContext { ctx, mailer }
}

pub async fn insert_event(ctx: &GatherlyContext, start_ts: i64, capacity: Option<i64>) -> Event {
    let event = Event::new("Rust meetup".into(), start_ts, capacity, ID::default(), NOW);
    ctx.repos
        .events
        .insert(&event)
        .await
        .expect("To insert event");
    event
}

/// Participant storage that fails every operation scoped to one `Event`
pub struct BrokenEventParticipants {
    inner: Arc<dyn IParticipantRepo>,
    broken_event_id: ID,
}

impl BrokenEventParticipants {
    pub fn wrap(ctx: &GatherlyContext, broken_event_id: ID) -> Arc<dyn IParticipantRepo> {
        Arc::new(Self {
            inner: ctx.repos.participants.clone(),
            broken_event_id,
        })
    }

    fn check(&self, event_id: &ID) -> anyhow::Result<()> {
        if *event_id == self.broken_event_id {
            anyhow::bail!("Connection reset");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl IParticipantRepo for BrokenEventParticipants {
    async fn insert_within_capacity(
        &self,
        participant: &Participant,
        capacity: Option<i64>,
    ) -> anyhow::Result<InsertParticipantResult> {
        self.check(&participant.event_id)?;
        self.inner.insert_within_capacity(participant, capacity).await
    }

    async fn find_by_event_and_email(&self, event_id: &ID, email: &str) -> Option<Participant> {
        self.inner.find_by_event_and_email(event_id, email).await
    }

    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Participant>> {
        self.check(event_id)?;
        self.inner.find_by_event(event_id).await
    }

    async fn find_unnotified_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Participant>> {
        self.check(event_id)?;
        self.inner.find_unnotified_by_event(event_id).await
    }

    async fn count_by_event(&self, event_id: &ID) -> anyhow::Result<i64> {
        self.inner.count_by_event(event_id).await
    }

    async fn delete_by_event_and_email(&self, event_id: &ID, email: &str) -> anyhow::Result<bool> {
        self.check(event_id)?;
        self.inner.delete_by_event_and_email(event_id, email).await
    }

    async fn delete_by_event(&self, event_id: &ID) -> anyhow::Result<DeleteResult> {
        self.check(event_id)?;
        self.inner.delete_by_event(event_id).await
    }

    async fn set_notified(&self, participant_id: &ID) -> anyhow::Result<()> {
        self.inner.set_notified(participant_id).await
    }
}

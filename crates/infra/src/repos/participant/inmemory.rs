use super::{IParticipantRepo, InsertParticipantResult};
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::repo::DeleteResult;
use gatherly_domain::{Event, Participant, ID};

pub struct InMemoryParticipantRepo {
    participants: std::sync::Mutex<Vec<Participant>>,
}

impl InMemoryParticipantRepo {
    pub fn new() -> Self {
        Self {
            participants: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IParticipantRepo for InMemoryParticipantRepo {
    async fn insert_within_capacity(
        &self,
        participant: &Participant,
        capacity: Option<i64>,
    ) -> anyhow::Result<InsertParticipantResult> {
        // Single guard for the whole check then insert
        let mut participants = lock(&self.participants);

        if let Some(existing) = participants
            .iter()
            .find(|p| p.event_id == participant.event_id && p.email == participant.email)
        {
            return Ok(InsertParticipantResult::AlreadySubscribed(existing.clone()));
        }

        let count = participants
            .iter()
            .filter(|p| p.event_id == participant.event_id)
            .count() as i64;
        if !Event::has_room_for_one_more(capacity, count) {
            return Ok(InsertParticipantResult::CapacityExceeded);
        }

        participants.push(participant.clone());
        Ok(InsertParticipantResult::Inserted(participant.clone()))
    }

    async fn find_by_event_and_email(&self, event_id: &ID, email: &str) -> Option<Participant> {
        find_by(&self.participants, |p| p.event_id == *event_id && p.email == email)
            .into_iter()
            .next()
    }

    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Participant>> {
        Ok(find_by(&self.participants, |p| p.event_id == *event_id))
    }

    async fn find_unnotified_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Participant>> {
        Ok(find_by(&self.participants, |p| {
            p.event_id == *event_id && !p.notified
        }))
    }

    async fn count_by_event(&self, event_id: &ID) -> anyhow::Result<i64> {
        Ok(find_by(&self.participants, |p| p.event_id == *event_id).len() as i64)
    }

    async fn delete_by_event_and_email(&self, event_id: &ID, email: &str) -> anyhow::Result<bool> {
        let res = delete_by(&self.participants, |p| {
            p.event_id == *event_id && p.email == email
        });
        Ok(res.deleted_count > 0)
    }

    async fn delete_by_event(&self, event_id: &ID) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.participants, |p| p.event_id == *event_id))
    }

    async fn set_notified(&self, participant_id: &ID) -> anyhow::Result<()> {
        let updated = update_many(
            &self.participants,
            |p| p.id == *participant_id,
            |p| p.notified = true,
        );
        if updated == 0 {
            anyhow::bail!("Participant with id: {} was not found", participant_id);
        }
        Ok(())
    }
}

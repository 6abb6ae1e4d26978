mod inmemory;
mod postgres;

use crate::repos::shared::repo::DeleteResult;
use gatherly_domain::{Participant, ID};
pub use inmemory::InMemoryParticipantRepo;
pub use postgres::PostgresParticipantRepo;

/// Result of trying to subscribe a `Participant` to an `Event`
#[derive(Debug, Clone, PartialEq)]
pub enum InsertParticipantResult {
    Inserted(Participant),
    /// The email was already subscribed to the `Event`, contains the existing `Participant`
    AlreadySubscribed(Participant),
    CapacityExceeded,
}

#[async_trait::async_trait]
pub trait IParticipantRepo: Send + Sync {
    /// Inserts the `Participant` unless its email is already subscribed to the `Event`
    /// or the `Event` already has `capacity` participants.
    ///
    /// Checking and inserting is atomic with respect to concurrent calls for the same `Event`.
    async fn insert_within_capacity(
        &self,
        participant: &Participant,
        capacity: Option<i64>,
    ) -> anyhow::Result<InsertParticipantResult>;
    async fn find_by_event_and_email(&self, event_id: &ID, email: &str) -> Option<Participant>;
    /// Oldest subscription first
    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Participant>>;
    /// Participants that have not received a reminder yet, oldest subscription first
    async fn find_unnotified_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Participant>>;
    async fn count_by_event(&self, event_id: &ID) -> anyhow::Result<i64>;
    /// Returns whether a `Participant` was deleted
    async fn delete_by_event_and_email(&self, event_id: &ID, email: &str) -> anyhow::Result<bool>;
    async fn delete_by_event(&self, event_id: &ID) -> anyhow::Result<DeleteResult>;
    async fn set_notified(&self, participant_id: &ID) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::InsertParticipantResult;
    use crate::GatherlyContext;
    use gatherly_domain::{Participant, ID};

    #[tokio::test]
    async fn inserts_until_capacity_is_reached() {
        let ctx = GatherlyContext::create_inmemory();
        let event_id = ID::default();
        let capacity = Some(2);

        for email in ["a@x.com", "b@x.com"] {
            let p = Participant::new(event_id, email, None, 0);
            let res = ctx
                .repos
                .participants
                .insert_within_capacity(&p, capacity)
                .await
                .expect("To insert participant");
            assert_eq!(res, InsertParticipantResult::Inserted(p));
        }

        let p = Participant::new(event_id, "c@x.com", None, 0);
        let res = ctx
            .repos
            .participants
            .insert_within_capacity(&p, capacity)
            .await
            .expect("To run insert");
        assert_eq!(res, InsertParticipantResult::CapacityExceeded);
        assert_eq!(ctx.repos.participants.count_by_event(&event_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn existing_subscription_is_returned_even_when_full() {
        let ctx = GatherlyContext::create_inmemory();
        let event_id = ID::default();

        let existing = Participant::new(event_id, "a@x.com", None, 0);
        ctx.repos
            .participants
            .insert_within_capacity(&existing, Some(1))
            .await
            .unwrap();

        let duplicate = Participant::new(event_id, "a@x.com", Some("A".into()), 5);
        let res = ctx
            .repos
            .participants
            .insert_within_capacity(&duplicate, Some(1))
            .await
            .unwrap();
        assert_eq!(res, InsertParticipantResult::AlreadySubscribed(existing));
        assert_eq!(ctx.repos.participants.count_by_event(&event_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn set_notified_only_touches_one_participant() {
        let ctx = GatherlyContext::create_inmemory();
        let event_id = ID::default();
        let a = Participant::new(event_id, "a@x.com", None, 0);
        let b = Participant::new(event_id, "b@x.com", None, 1);
        for p in [&a, &b] {
            ctx.repos
                .participants
                .insert_within_capacity(p, None)
                .await
                .unwrap();
        }

        ctx.repos.participants.set_notified(&a.id).await.unwrap();

        let unnotified = ctx
            .repos
            .participants
            .find_unnotified_by_event(&event_id)
            .await
            .unwrap();
        assert_eq!(unnotified, vec![b.clone()]);
        let a = ctx
            .repos
            .participants
            .find_by_event_and_email(&event_id, "a@x.com")
            .await
            .expect("To find participant");
        assert!(a.notified);
    }

    #[tokio::test]
    async fn delete_by_event_and_email() {
        let ctx = GatherlyContext::create_inmemory();
        let event_id = ID::default();
        let other_event_id = ID::default();
        let p = Participant::new(event_id, "a@x.com", None, 0);
        let other = Participant::new(other_event_id, "a@x.com", None, 0);
        for p in [&p, &other] {
            ctx.repos
                .participants
                .insert_within_capacity(p, None)
                .await
                .unwrap();
        }

        let repo = &ctx.repos.participants;
        assert!(repo.delete_by_event_and_email(&event_id, "a@x.com").await.unwrap());
        assert!(!repo.delete_by_event_and_email(&event_id, "a@x.com").await.unwrap());
        assert!(repo.find_by_event_and_email(&event_id, "a@x.com").await.is_none());
        assert!(repo
            .find_by_event_and_email(&other_event_id, "a@x.com")
            .await
            .is_some());

        let res = repo.delete_by_event(&other_event_id).await.unwrap();
        assert_eq!(res.deleted_count, 1);
        assert!(repo.find_by_event(&other_event_id).await.unwrap().is_empty());
    }
}

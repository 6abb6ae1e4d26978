use crate::shared::entity::{Entity, ID};

/// An `Event` is a scheduled happening that `Participant`s can subscribe to.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: ID,
    pub title: String,
    pub description: Option<String>,
    /// Start instant of the `Event` in unix millis
    pub start_ts: i64,
    /// Maximum number of `Participant`s. No limit when `None`.
    pub capacity: Option<i64>,
    pub owner_id: ID,
    pub created: i64,
    pub updated: i64,
}

impl Entity for Event {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl Event {
    pub fn new(title: String, start_ts: i64, capacity: Option<i64>, owner_id: ID, now: i64) -> Self {
        Self {
            id: Default::default(),
            title,
            description: None,
            start_ts,
            capacity,
            owner_id,
            created: now,
            updated: now,
        }
    }

    pub fn has_started(&self, now: i64) -> bool {
        self.start_ts <= now
    }

    /// Whether one more `Participant` fits given the capacity and the current participant count
    pub fn has_room_for_one_more(capacity: Option<i64>, participants_count: i64) -> bool {
        match capacity {
            Some(capacity) => participants_count < capacity,
            None => true,
        }
    }

    pub fn is_valid_capacity(capacity: Option<i64>) -> bool {
        capacity.map(|c| c > 0).unwrap_or(true)
    }
}

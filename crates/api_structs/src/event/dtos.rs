use gatherly_domain::{Event, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventDTO {
    pub id: ID,
    pub title: String,
    pub description: Option<String>,
    pub start_ts: i64,
    pub capacity: Option<i64>,
    pub owner_id: ID,
    pub created: i64,
    pub updated: i64,
}

impl EventDTO {
    pub fn new(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            start_ts: event.start_ts,
            capacity: event.capacity,
            owner_id: event.owner_id,
            created: event.created,
            updated: event.updated,
        }
    }
}

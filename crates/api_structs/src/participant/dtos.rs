use gatherly_domain::{Participant, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDTO {
    pub id: ID,
    pub event_id: ID,
    pub email: String,
    pub name: Option<String>,
    pub notified: bool,
    pub created: i64,
}

impl ParticipantDTO {
    pub fn new(participant: Participant) -> Self {
        Self {
            id: participant.id,
            event_id: participant.event_id,
            email: participant.email,
            name: participant.name,
            notified: participant.notified,
            created: participant.created,
        }
    }
}

use crate::dtos::ParticipantDTO;
use gatherly_domain::{Participant, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub participant: ParticipantDTO,
}

impl ParticipantResponse {
    pub fn new(participant: Participant) -> Self {
        Self {
            participant: ParticipantDTO::new(participant),
        }
    }
}

pub mod subscribe {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub email: String,
        pub name: Option<String>,
    }

    pub type APIResponse = ParticipantResponse;
}

pub mod unsubscribe {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
        pub email: String,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub unsubscribed: bool,
    }
}

pub mod get_participants {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub participants: Vec<ParticipantDTO>,
    }

    impl APIResponse {
        pub fn new(participants: Vec<Participant>) -> Self {
            Self {
                participants: participants.into_iter().map(ParticipantDTO::new).collect(),
            }
        }
    }
}

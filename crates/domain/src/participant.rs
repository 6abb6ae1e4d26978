use crate::shared::entity::{Entity, ID};

/// A `Participant` is a subscription of an email address to an `Event`
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: ID,
    pub event_id: ID,
    /// Normalized email, unique per `Event`
    pub email: String,
    pub name: Option<String>,
    /// Set once the reminder for the `Event` has been delivered.
    /// It is never reset.
    pub notified: bool,
    pub created: i64,
}

impl Entity for Participant {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl Participant {
    pub fn new(event_id: ID, email: &str, name: Option<String>, now: i64) -> Self {
        Self {
            id: Default::default(),
            event_id,
            email: Self::normalize_email(email),
            name,
            notified: false,
            created: now,
        }
    }

    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    /// Sent right after a `Participant` subscribed to an `Event`
    Confirmation,
    /// Sent the day before an `Event` starts
    Reminder,
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirmation => write!(f, "confirmation"),
            Self::Reminder => write!(f, "reminder"),
        }
    }
}

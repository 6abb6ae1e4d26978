mod date;
mod event;
mod notification;
mod participant;
mod reminder;
mod shared;

pub use date::{format_timestamp, DailyTrigger, InvalidDailyTriggerError};
pub use event::Event;
pub use notification::NotificationKind;
pub use participant::Participant;
pub use reminder::{
    DispatchOutcome, ReminderWindow, REMINDER_LOOKAHEAD_FROM_MILLIS, REMINDER_LOOKAHEAD_TO_MILLIS,
};
pub use shared::entity::{Entity, ID};

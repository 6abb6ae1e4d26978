mod event;
mod participant;
mod reminder;
mod status;

pub mod dtos {
    pub use crate::event::dtos::*;
    pub use crate::participant::dtos::*;
}

pub use crate::event::api::*;
pub use crate::participant::api::*;
pub use crate::reminder::api::*;
pub use crate::status::api::*;

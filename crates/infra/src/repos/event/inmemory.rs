use super::IEventRepo;
use crate::repos::shared::inmemory_repo::*;
use gatherly_domain::{Event, ReminderWindow, ID};

pub struct InMemoryEventRepo {
    events: std::sync::Mutex<Vec<Event>>,
}

impl InMemoryEventRepo {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for InMemoryEventRepo {
    async fn insert(&self, e: &Event) -> anyhow::Result<()> {
        insert(e, &self.events);
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<Event> {
        find(event_id, &self.events)
    }

    async fn find_in_window(&self, window: &ReminderWindow) -> anyhow::Result<Vec<Event>> {
        let mut events = find_by(&self.events, |e| window.contains(e.start_ts));
        events.sort_by_key(|e| e.start_ts);
        Ok(events)
    }

    async fn delete(&self, event_id: &ID) -> Option<Event> {
        delete(event_id, &self.events)
    }
}

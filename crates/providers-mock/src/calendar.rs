/// Deterministic `CalendarProvider` stub backed by an in-memory event store
/// behind a mutex, so the scheduling sub-agent's tool loop can run end to
/// end against predictable free/busy data without a real calendar backend.
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use replyforge_core::{BusyRange, CalendarEvent, CalendarProvider, ProviderError};

pub struct MockCalendarProvider {
    events: Mutex<Vec<CalendarEvent>>,
    next_id: Mutex<u64>,
}

impl MockCalendarProvider {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
        }
    }

    pub fn with_events(self, events: Vec<CalendarEvent>) -> Self {
        *self.events.lock().expect("lock poisoned") = events;
        self
    }

    fn allocate_id(&self) -> String {
        let mut next = self.next_id.lock().expect("lock poisoned");
        let id = format!("mock-event-{next}");
        *next += 1;
        id
    }
}

impl Default for MockCalendarProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CalendarProvider for MockCalendarProvider {
    async fn free_busy(&self, _email: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<BusyRange>, ProviderError> {
        Ok(self
            .events
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|event| event.start < end && event.end > start)
            .map(|event| BusyRange { start: event.start, end: event.end })
            .collect())
    }

    async fn insert_event(
        &self,
        summary: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        _attendees: &[String],
        _description: Option<&str>,
    ) -> Result<CalendarEvent, ProviderError> {
        let event = CalendarEvent {
            id: self.allocate_id(),
            summary: summary.to_string(),
            start,
            end,
            link: "https://mock.calendar.example/event".to_string(),
        };
        self.events.lock().expect("lock poisoned").push(event.clone());
        Ok(event)
    }

    async fn list_upcoming(&self, max_results: u32) -> Result<Vec<CalendarEvent>, ProviderError> {
        let mut events = self.events.lock().expect("lock poisoned").clone();
        events.sort_by_key(|e| e.start);
        events.truncate(max_results as usize);
        Ok(events)
    }

    async fn update_event(&self, event_id: &str, new_start: DateTime<Utc>, new_end: DateTime<Utc>) -> Result<CalendarEvent, ProviderError> {
        let mut events = self.events.lock().expect("lock poisoned");
        let event = events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| ProviderError::Rejected(format!("no mock event with id {event_id}")))?;
        event.start = new_start;
        event.end = new_end;
        Ok(event.clone())
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), ProviderError> {
        let mut events = self.events.lock().expect("lock poisoned");
        let before = events.len();
        events.retain(|e| e.id != event_id);
        if events.len() == before {
            return Err(ProviderError::Rejected(format!("no mock event with id {event_id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(id: &str, start: DateTime<Utc>) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            summary: "Existing meeting".to_string(),
            start,
            end: start + Duration::hours(1),
            link: "https://mock.calendar.example/existing".to_string(),
        }
    }

    #[tokio::test]
    async fn free_busy_returns_overlapping_events_only() {
        let now = Utc::now();
        let calendar = MockCalendarProvider::new().with_events(vec![event("1", now)]);
        let busy = calendar.free_busy("a@b.com", now - Duration::hours(2), now - Duration::hours(1)).await.unwrap();
        assert!(busy.is_empty());
        let busy = calendar.free_busy("a@b.com", now, now + Duration::hours(2)).await.unwrap();
        assert_eq!(busy.len(), 1);
    }

    #[tokio::test]
    async fn insert_then_cancel_round_trips() {
        let calendar = MockCalendarProvider::new();
        let now = Utc::now();
        let created = calendar.insert_event("Sync", now, now + Duration::hours(1), &[], None).await.unwrap();
        assert_eq!(calendar.list_upcoming(10).await.unwrap().len(), 1);
        calendar.delete_event(&created.id).await.unwrap();
        assert!(calendar.list_upcoming(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_unknown_event_errors() {
        let calendar = MockCalendarProvider::new();
        let now = Utc::now();
        assert!(calendar.update_event("missing", now, now + Duration::hours(1)).await.is_err());
    }
}

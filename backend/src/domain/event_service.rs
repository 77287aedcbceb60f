//! Event lifecycle domain service.
//!
//! Implements the [`EventLifecycle`] driving port: validates drafts against
//! the injected clock, gates mutation on ownership, and orchestrates the
//! event repository. This is the single validation point for the temporal
//! and uniqueness rules; neither the HTTP adapter nor the repository
//! re-implement them.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::debug;

use crate::domain::Error;
use crate::domain::event::{Event, EventDraft, EventId};
use crate::domain::policy;
use crate::domain::ports::{
    EventFilter, EventLifecycle, EventListing, EventRepository, EventStoreError,
};
use crate::domain::tag_filter::TagFilter;
use crate::domain::user::UserId;

fn map_store_error(error: EventStoreError) -> Error {
    match error {
        EventStoreError::Connection { message } => {
            Error::service_unavailable(format!("event repository unavailable: {message}"))
        }
        EventStoreError::Query { message } => {
            Error::internal(format!("event repository error: {message}"))
        }
        EventStoreError::DuplicateTitle => duplicate_title_error(),
    }
}

fn duplicate_title_error() -> Error {
    Error::invalid_request("an event with this title already exists")
        .with_details(json!({ "field": "title", "code": "duplicate_title" }))
}

fn past_date_error() -> Error {
    Error::invalid_request("the event date must be in the future")
        .with_details(json!({ "field": "date", "code": "past_date" }))
}

/// Event lifecycle service backed by a repository and a clock.
#[derive(Clone)]
pub struct EventLifecycleService<R> {
    event_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> EventLifecycleService<R> {
    /// Create a new service with the event repository and clock.
    ///
    /// # Examples
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// use backend::domain::EventLifecycleService;
    /// use backend::outbound::memory::InMemoryEventRepository;
    ///
    /// let service = EventLifecycleService::new(
    ///     Arc::new(InMemoryEventRepository::default()),
    ///     Arc::new(DefaultClock),
    /// );
    /// ```
    pub fn new(event_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { event_repo, clock }
    }
}

impl<R> EventLifecycleService<R>
where
    R: EventRepository,
{
    /// Fail when another event already holds `title`.
    ///
    /// `exclude` carries the id of the event being updated so it does not
    /// collide with itself.
    async fn ensure_title_free(&self, title: &str, exclude: Option<&EventId>) -> Result<(), Error> {
        let existing = self
            .event_repo
            .find_by_title(title)
            .await
            .map_err(map_store_error)?;
        match existing {
            Some(event) if Some(event.id()) != exclude => Err(duplicate_title_error()),
            _ => Ok(()),
        }
    }

    async fn load_owned(&self, actor: &UserId, id: &EventId) -> Result<Event, Error> {
        let event = self
            .event_repo
            .find_by_id(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("event {id} not found")))?;
        if !policy::can_mutate(actor, &event) {
            return Err(Error::forbidden(
                "only the organizer may modify this event",
            ));
        }
        Ok(event)
    }
}

#[async_trait]
impl<R> EventLifecycle for EventLifecycleService<R>
where
    R: EventRepository,
{
    async fn create_event(&self, actor: &UserId, draft: EventDraft) -> Result<Event, Error> {
        let now = self.clock.utc();
        if draft.date <= now {
            return Err(past_date_error());
        }
        self.ensure_title_free(draft.title.as_ref(), None).await?;

        let event = Event::new(EventId::random(), *actor, draft);
        self.event_repo
            .insert(&event)
            .await
            .map_err(map_store_error)?;
        debug!(event = %event.id(), organizer = %actor, "event created");
        Ok(event)
    }

    async fn list_events(
        &self,
        filter: TagFilter,
        only_upcoming: bool,
    ) -> Result<EventListing, Error> {
        let filter = EventFilter {
            tags: filter,
            starts_after: only_upcoming.then(|| self.clock.utc()),
        };
        let events = self
            .event_repo
            .list(&filter)
            .await
            .map_err(map_store_error)?;
        Ok(EventListing::from_events(events))
    }

    async fn get_event(&self, id: &EventId) -> Result<Event, Error> {
        self.event_repo
            .find_by_id(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("event {id} not found")))
    }

    async fn update_event(
        &self,
        actor: &UserId,
        id: &EventId,
        draft: EventDraft,
    ) -> Result<Event, Error> {
        let existing = self.load_owned(actor, id).await?;

        // An event legitimately drifts into the past; re-check the
        // future-date rule only when the update actually moves the date.
        if draft.date != existing.date() && draft.date <= self.clock.utc() {
            return Err(past_date_error());
        }
        if draft.title != *existing.title() {
            self.ensure_title_free(draft.title.as_ref(), Some(id)).await?;
        }

        let updated = existing.apply(draft);
        self.event_repo
            .update(&updated)
            .await
            .map_err(map_store_error)?;
        debug!(event = %id, "event updated");
        Ok(updated)
    }

    async fn delete_event(&self, actor: &UserId, id: &EventId) -> Result<(), Error> {
        self.load_owned(actor, id).await?;
        self.event_repo
            .delete(id)
            .await
            .map_err(map_store_error)?;
        debug!(event = %id, "event deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "event_service_tests.rs"]
mod tests;

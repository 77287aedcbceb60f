//! Driving port for event lifecycle use-cases.
//!
//! Inbound adapters call this port to run create/read/update/delete/list
//! operations without knowing the backing repository. The acting user is
//! always passed explicitly; nothing here reads ambient request state.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::event::{Event, EventDraft, EventId};
use crate::domain::tag_filter::TagFilter;
use crate::domain::user::UserId;

/// Result of a list operation.
///
/// An empty result is a distinct signal, not a plain empty vector: callers
/// must surface it as a "no records" condition rather than a successful
/// empty page.
#[derive(Debug, Clone, PartialEq)]
pub enum EventListing {
    /// At least one event matched.
    Events(Vec<Event>),
    /// Nothing matched the filters.
    Empty,
}

impl EventListing {
    /// Wrap a repository result, collapsing an empty vector into
    /// [`EventListing::Empty`].
    pub fn from_events(events: Vec<Event>) -> Self {
        if events.is_empty() {
            Self::Empty
        } else {
            Self::Events(events)
        }
    }
}

/// Domain use-case port for the event lifecycle.
#[async_trait]
pub trait EventLifecycle: Send + Sync {
    /// Validate and persist a new event with `actor` as organizer.
    async fn create_event(&self, actor: &UserId, draft: EventDraft) -> Result<Event, Error>;

    /// List events matching the tag filter and, optionally, only those
    /// still upcoming at call time.
    async fn list_events(
        &self,
        filter: TagFilter,
        only_upcoming: bool,
    ) -> Result<EventListing, Error>;

    /// Fetch a single event. Readable by any authenticated actor.
    async fn get_event(&self, id: &EventId) -> Result<Event, Error>;

    /// Validate and fully replace an event's caller-editable fields.
    /// Only the organizer may update.
    async fn update_event(
        &self,
        actor: &UserId,
        id: &EventId,
        draft: EventDraft,
    ) -> Result<Event, Error>;

    /// Delete an event. Only the organizer may delete; allowed regardless
    /// of whether the event is upcoming or past.
    async fn delete_event(&self, actor: &UserId, id: &EventId) -> Result<(), Error>;
}

//! Driven port for event persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::event::{Event, EventId};
use crate::domain::tag_filter::TagFilter;

/// Persistence errors raised by event repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventStoreError {
    /// Repository connection could not be established.
    #[error("event repository connection failed: {message}")]
    Connection {
        /// Adapter-specific failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("event repository query failed: {message}")]
    Query {
        /// Adapter-specific failure description.
        message: String,
    },
    /// A write collided with another event's title.
    #[error("event title is already in use")]
    DuplicateTitle,
}

impl EventStoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Predicate bundle for listing events.
///
/// The tag predicate and the temporal predicate compose with logical AND;
/// either may be absent.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Tag membership filter; empty means no tag restriction.
    pub tags: TagFilter,
    /// When set, only events strictly later than this instant qualify.
    pub starts_after: Option<DateTime<Utc>>,
}

impl EventFilter {
    /// Whether the given event satisfies both predicates.
    pub fn matches(&self, event: &Event) -> bool {
        let tag_ok = self.tags.matches(event.tags());
        let time_ok = self
            .starts_after
            .is_none_or(|after| event.is_upcoming(after));
        tag_ok && time_ok
    }
}

/// Port for persistent `EventId -> Event` storage.
///
/// Adapters own the uniqueness of event titles; a violated unique
/// constraint surfaces as [`EventStoreError::DuplicateTitle`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persist a new event.
    async fn insert(&self, event: &Event) -> Result<(), EventStoreError>;

    /// Fetch an event by identifier.
    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, EventStoreError>;

    /// Fetch an event by its unique title.
    async fn find_by_title(&self, title: &str) -> Result<Option<Event>, EventStoreError>;

    /// Replace a stored event's caller-editable fields.
    async fn update(&self, event: &Event) -> Result<(), EventStoreError>;

    /// Remove an event and its tag associations. Removing an id that is
    /// already gone is not an error.
    async fn delete(&self, id: &EventId) -> Result<(), EventStoreError>;

    /// List events satisfying the filter, ordered by date then title.
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, EventStoreError>;
}

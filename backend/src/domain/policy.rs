//! Access control policy for event mutation.
//!
//! Read access needs only a valid authenticated actor; mutation is gated on
//! ownership. The policy is a pure total function so the lifecycle service
//! stays testable without any request framework.

use crate::domain::event::Event;
use crate::domain::user::UserId;

/// Whether `actor` may mutate (update or delete) `event`.
///
/// True iff the actor is the event's organizer.
///
/// # Examples
/// ```
/// use backend::domain::policy::can_mutate;
/// use backend::domain::{Event, EventDraft, EventId, EventTitle, Location, TagSet, TicketPrice, UserId};
/// use chrono::{TimeZone, Utc};
///
/// let organizer = UserId::random();
/// let event = Event::new(
///     EventId::random(),
///     organizer,
///     EventDraft {
///         title: EventTitle::new("Gig").unwrap(),
///         description: String::new(),
///         date: Utc.with_ymd_and_hms(2027, 1, 1, 20, 0, 0).unwrap(),
///         location: Location::new("Town Hall").unwrap(),
///         ticket_price: TicketPrice::FREE,
///         tags: TagSet::default(),
///     },
/// );
/// assert!(can_mutate(&organizer, &event));
/// assert!(!can_mutate(&UserId::random(), &event));
/// ```
pub fn can_mutate(actor: &UserId, event: &Event) -> bool {
    actor == event.organizer()
}

//! Event listing data model.
//!
//! An event is owned by the user who created it (the organizer). Temporal
//! state is derived from the event date at evaluation time and never stored.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::UserId;

/// Maximum allowed length for an event title.
pub const TITLE_MAX: usize = 150;
/// Maximum allowed length for an event location.
pub const LOCATION_MAX: usize = 150;

/// Validation errors returned by the event constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    /// Title was missing or blank once trimmed.
    EmptyTitle,
    /// Title exceeded [`TITLE_MAX`] characters.
    TitleTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// Location was missing or blank once trimmed.
    EmptyLocation,
    /// Location exceeded [`LOCATION_MAX`] characters.
    LocationTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// Ticket price was negative or not a finite number.
    InvalidTicketPrice,
}

impl fmt::Display for EventValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyLocation => write!(f, "location must not be empty"),
            Self::LocationTooLong { max } => {
                write!(f, "location must be at most {max} characters")
            }
            Self::InvalidTicketPrice => {
                write!(f, "ticket price must be a non-negative number")
            }
        }
    }
}

impl std::error::Error for EventValidationError {}

/// Stable event identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Generate a new random [`EventId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event title, unique across all events.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventTitle(String);

impl EventTitle {
    /// Validate and construct an [`EventTitle`] from raw input.
    pub fn new(title: impl AsRef<str>) -> Result<Self, EventValidationError> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EventValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(EventValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EventTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EventTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EventTitle> for String {
    fn from(value: EventTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for EventTitle {
    type Error = EventValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Venue description for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location(String);

impl Location {
    /// Validate and construct a [`Location`] from raw input.
    pub fn new(location: impl AsRef<str>) -> Result<Self, EventValidationError> {
        let trimmed = location.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EventValidationError::EmptyLocation);
        }
        if trimmed.chars().count() > LOCATION_MAX {
            return Err(EventValidationError::LocationTooLong { max: LOCATION_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Location {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Location> for String {
    fn from(value: Location) -> Self {
        value.0
    }
}

impl TryFrom<String> for Location {
    type Error = EventValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Ticket price in the venue's currency. Free events price at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TicketPrice(f64);

impl TicketPrice {
    /// A free ticket.
    pub const FREE: Self = Self(0.0);

    /// Validate and construct a [`TicketPrice`].
    ///
    /// The value must be finite and non-negative.
    pub fn new(price: f64) -> Result<Self, EventValidationError> {
        if !price.is_finite() || price < 0.0 {
            return Err(EventValidationError::InvalidTicketPrice);
        }
        Ok(Self(price))
    }

    /// Numeric price value.
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl Default for TicketPrice {
    fn default() -> Self {
        Self::FREE
    }
}

impl From<TicketPrice> for f64 {
    fn from(value: TicketPrice) -> Self {
        value.0
    }
}

impl TryFrom<f64> for TicketPrice {
    type Error = EventValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A shared label attachable to many events.
///
/// Names compare case-sensitively; surrounding whitespace is trimmed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TagName(String);

impl TagName {
    /// Normalize a raw tag name, returning `None` when it is blank.
    pub fn parse(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Tag name as presented to clients.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deduplicated, unordered set of tag names on an event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TagSet(BTreeSet<TagName>);

impl TagSet {
    /// Build a tag set from raw names, trimming and dropping blanks.
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(raw.into_iter().filter_map(TagName::parse).collect())
    }

    /// Whether the set holds no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the given tag is present.
    pub fn contains(&self, tag: &TagName) -> bool {
        self.0.contains(tag)
    }

    /// Whether this set shares at least one tag with `other`.
    pub fn intersects(&self, other: &Self) -> bool {
        self.0.intersection(&other.0).next().is_some()
    }

    /// Iterate the tags in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &TagName> {
        self.0.iter()
    }

    /// Tag names as plain strings, in lexicographic order.
    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|tag| tag.as_str().to_owned()).collect()
    }
}

impl FromIterator<TagName> for TagSet {
    fn from_iter<I: IntoIterator<Item = TagName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Derived temporal classification of an event relative to a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleStatus {
    /// The event date is strictly in the future.
    Upcoming,
    /// The event date has passed (or is exactly now).
    Past,
}

/// Validated field bundle used to create or fully replace an event.
///
/// The draft carries no identity and no organizer; both are decided by the
/// lifecycle service, never by the caller's payload.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    /// Unique event title.
    pub title: EventTitle,
    /// Free-form description, may be empty.
    pub description: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Venue description.
    pub location: Location,
    /// Admission price, zero for free events.
    pub ticket_price: TicketPrice,
    /// Labels attached to the event.
    pub tags: TagSet,
}

/// A stored event listing.
///
/// ## Invariants
/// - `title` is unique across all events (enforced by the repository).
/// - `organizer` is set exactly once at creation and never reassigned.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    id: EventId,
    organizer: UserId,
    title: EventTitle,
    description: String,
    date: DateTime<Utc>,
    location: Location,
    ticket_price: TicketPrice,
    tags: TagSet,
}

impl Event {
    /// Materialize an event from an identity, its organizer, and a draft.
    ///
    /// Used both when creating a new event and when rehydrating one from
    /// storage.
    pub fn new(id: EventId, organizer: UserId, draft: EventDraft) -> Self {
        let EventDraft {
            title,
            description,
            date,
            location,
            ticket_price,
            tags,
        } = draft;
        Self {
            id,
            organizer,
            title,
            description,
            date,
            location,
            ticket_price,
            tags,
        }
    }

    /// Replace every caller-editable field from a draft.
    ///
    /// Identity and organizer are preserved; the organizer field of an
    /// update payload is ignored by construction since drafts cannot carry
    /// one.
    pub fn apply(self, draft: EventDraft) -> Self {
        Self::new(self.id, self.organizer, draft)
    }

    /// Stable event identifier.
    pub const fn id(&self) -> &EventId {
        &self.id
    }

    /// The user who created the event; sole holder of mutation rights.
    pub const fn organizer(&self) -> &UserId {
        &self.organizer
    }

    /// Unique event title.
    pub const fn title(&self) -> &EventTitle {
        &self.title
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// When the event takes place.
    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Venue description.
    pub const fn location(&self) -> &Location {
        &self.location
    }

    /// Admission price.
    pub const fn ticket_price(&self) -> TicketPrice {
        self.ticket_price
    }

    /// Labels attached to the event.
    pub const fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Derived temporal state relative to `now`; never stored.
    pub fn schedule_status(&self, now: DateTime<Utc>) -> ScheduleStatus {
        if self.date > now {
            ScheduleStatus::Upcoming
        } else {
            ScheduleStatus::Past
        }
    }

    /// Whether the event is still upcoming relative to `now`.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        matches!(self.schedule_status(now), ScheduleStatus::Upcoming)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn draft(title: &str) -> EventDraft {
        EventDraft {
            title: EventTitle::new(title).expect("valid title"),
            description: "a show".to_owned(),
            date: Utc.with_ymd_and_hms(2026, 9, 1, 19, 0, 0).single().expect("valid date"),
            location: Location::new("Town Hall").expect("valid location"),
            ticket_price: TicketPrice::new(10.0).expect("valid price"),
            tags: TagSet::from_raw(["music"]),
        }
    }

    #[rstest]
    #[case("", EventValidationError::EmptyTitle)]
    #[case("   ", EventValidationError::EmptyTitle)]
    fn title_rejects_blank(#[case] raw: &str, #[case] expected: EventValidationError) {
        assert_eq!(EventTitle::new(raw).expect_err("must fail"), expected);
    }

    #[test]
    fn title_rejects_overlong() {
        let raw = "x".repeat(TITLE_MAX + 1);
        assert_eq!(
            EventTitle::new(raw).expect_err("must fail"),
            EventValidationError::TitleTooLong { max: TITLE_MAX }
        );
    }

    #[rstest]
    #[case(-0.01)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn price_rejects_invalid(#[case] raw: f64) {
        assert_eq!(
            TicketPrice::new(raw).expect_err("must fail"),
            EventValidationError::InvalidTicketPrice
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(10.5)]
    fn price_accepts_non_negative(#[case] raw: f64) {
        let price = TicketPrice::new(raw).expect("valid price");
        assert_eq!(price.value(), raw);
    }

    #[test]
    fn tag_set_dedups_and_drops_blanks() {
        let tags = TagSet::from_raw(["music", " music ", "", "  ", "art"]);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.names(), vec!["art".to_owned(), "music".to_owned()]);
    }

    #[test]
    fn tag_names_are_case_sensitive() {
        let tags = TagSet::from_raw(["Music", "music"]);
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn schedule_status_is_derived_from_date() {
        let event = Event::new(EventId::random(), UserId::random(), draft("Gig"));
        let before = event.date() - chrono::TimeDelta::seconds(1);
        let after = event.date() + chrono::TimeDelta::seconds(1);
        assert_eq!(event.schedule_status(before), ScheduleStatus::Upcoming);
        assert_eq!(event.schedule_status(event.date()), ScheduleStatus::Past);
        assert_eq!(event.schedule_status(after), ScheduleStatus::Past);
    }

    #[test]
    fn apply_preserves_identity_and_organizer() {
        let organizer = UserId::random();
        let event = Event::new(EventId::random(), organizer, draft("Gig"));
        let id = *event.id();
        let updated = event.apply(draft("Gig2"));
        assert_eq!(updated.id(), &id);
        assert_eq!(updated.organizer(), &organizer);
        assert_eq!(updated.title().as_ref(), "Gig2");
    }
}

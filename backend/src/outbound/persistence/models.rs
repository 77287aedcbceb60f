//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{auth_tokens, event_tags, events, tags, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_digest: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_digest: &'a str,
}

/// Insertable struct for issuing a session token.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = auth_tokens)]
pub(crate) struct NewTokenRow<'a> {
    pub key: &'a str,
    pub user_id: Uuid,
}

/// Row struct for reading from the events table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub ticket_price: f64,
    pub organizer_id: Uuid,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new event records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub date: DateTime<Utc>,
    pub location: &'a str,
    pub ticket_price: f64,
    pub organizer_id: Uuid,
}

/// Changeset struct for replacing an event's caller-editable fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = events)]
pub(crate) struct EventChangeset<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub date: DateTime<Utc>,
    pub location: &'a str,
    pub ticket_price: f64,
}

/// Insertable struct for implicitly creating tags.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tags)]
pub(crate) struct NewTagRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
}

/// Insertable struct for linking an event to a tag.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = event_tags)]
pub(crate) struct NewEventTagRow {
    pub event_id: Uuid,
    pub tag_id: Uuid,
}

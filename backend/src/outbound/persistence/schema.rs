//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `migrations/` exactly;
//! `diesel print-schema` can regenerate them from a live database.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login name (max 150 characters).
        username -> Varchar,
        /// Contact address (max 254 characters).
        email -> Varchar,
        /// Salted password digest; never leaves the persistence layer.
        password_digest -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Opaque session tokens, one live token per user.
    auth_tokens (key) {
        /// Primary key: 40-hex-character token key.
        key -> Varchar,
        /// Owning user (unique: 1:1 with users).
        user_id -> Uuid,
        /// Token issuance timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Event listings.
    events (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique event title (max 150 characters).
        title -> Varchar,
        /// Free-form description.
        description -> Text,
        /// When the event takes place.
        date -> Timestamptz,
        /// Venue description (max 150 characters).
        location -> Varchar,
        /// Admission price; zero for free events.
        ticket_price -> Float8,
        /// Organizer user id, immutable after creation.
        organizer_id -> Uuid,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Shared tag labels, created implicitly when first referenced.
    tags (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique, case-sensitive tag name.
        name -> Text,
    }
}

diesel::table! {
    /// Event/tag association rows.
    event_tags (event_id, tag_id) {
        /// Tagged event.
        event_id -> Uuid,
        /// Applied tag.
        tag_id -> Uuid,
    }
}

diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(events -> users (organizer_id));
diesel::joinable!(event_tags -> events (event_id));
diesel::joinable!(event_tags -> tags (tag_id));

diesel::allow_tables_to_appear_in_same_query!(users, auth_tokens, events, tags, event_tags);

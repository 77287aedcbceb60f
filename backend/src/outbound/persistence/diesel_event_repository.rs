//! PostgreSQL-backed `EventRepository` implementation using Diesel.
//!
//! Events and their tag associations are written inside one transaction so
//! no partial mutation is ever observable. Tags are created implicitly on
//! first reference and never deleted here; they are shared across events.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::event::{
    Event, EventDraft, EventId, EventTitle, Location, TagName, TagSet, TicketPrice,
};
use crate::domain::ports::{EventFilter, EventRepository, EventStoreError};
use crate::domain::user::UserId;

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{EventChangeset, EventRow, NewEventRow, NewEventTagRow, NewTagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{event_tags, events, tags};

/// Diesel-backed implementation of the event repository port.
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> EventStoreError {
    map_pool_error(error, EventStoreError::connection)
}

/// Map Diesel errors, routing unique violations to the duplicate-title
/// variant. The events table's title index is the only unique constraint a
/// caller can trip through this adapter.
fn map_write_error(error: diesel::result::Error) -> EventStoreError {
    map_diesel_error(
        error,
        || EventStoreError::DuplicateTitle,
        EventStoreError::query,
        EventStoreError::connection,
    )
}

fn map_read_error(error: diesel::result::Error) -> EventStoreError {
    map_diesel_error(
        error,
        || EventStoreError::query("unexpected unique violation"),
        EventStoreError::query,
        EventStoreError::connection,
    )
}

/// Convert a database row plus its tag names into a validated domain event.
fn row_to_event(row: EventRow, tag_names: Vec<String>) -> Result<Event, EventStoreError> {
    let EventRow {
        id,
        title,
        description,
        date,
        location,
        ticket_price,
        organizer_id,
        created_at: _,
    } = row;

    let draft = EventDraft {
        title: EventTitle::new(title).map_err(|err| EventStoreError::query(err.to_string()))?,
        description,
        date,
        location: Location::new(location)
            .map_err(|err| EventStoreError::query(err.to_string()))?,
        ticket_price: TicketPrice::new(ticket_price)
            .map_err(|err| EventStoreError::query(err.to_string()))?,
        tags: TagSet::from_raw(tag_names),
    };
    Ok(Event::new(
        EventId::from_uuid(id),
        UserId::from_uuid(organizer_id),
        draft,
    ))
}

fn new_event_row(event: &Event) -> NewEventRow<'_> {
    NewEventRow {
        id: *event.id().as_uuid(),
        title: event.title().as_ref(),
        description: event.description(),
        date: event.date(),
        location: event.location().as_ref(),
        ticket_price: event.ticket_price().value(),
        organizer_id: *event.organizer().as_uuid(),
    }
}

/// Rewrite the event's tag links, creating missing tags along the way.
async fn replace_tag_links(
    conn: &mut AsyncPgConnection,
    event: &Event,
) -> Result<(), diesel::result::Error> {
    diesel::delete(event_tags::table.filter(event_tags::event_id.eq(event.id().as_uuid())))
        .execute(conn)
        .await?;
    if event.tags().is_empty() {
        return Ok(());
    }

    let new_tags: Vec<NewTagRow<'_>> = event
        .tags()
        .iter()
        .map(|tag| NewTagRow {
            id: Uuid::new_v4(),
            name: tag.as_str(),
        })
        .collect();
    diesel::insert_into(tags::table)
        .values(&new_tags)
        .on_conflict(tags::name)
        .do_nothing()
        .execute(conn)
        .await?;

    let names: Vec<&str> = event.tags().iter().map(TagName::as_str).collect();
    let tag_ids: Vec<Uuid> = tags::table
        .filter(tags::name.eq_any(names))
        .select(tags::id)
        .load(conn)
        .await?;
    let links: Vec<NewEventTagRow> = tag_ids
        .into_iter()
        .map(|tag_id| NewEventTagRow {
            event_id: *event.id().as_uuid(),
            tag_id,
        })
        .collect();
    diesel::insert_into(event_tags::table)
        .values(&links)
        .execute(conn)
        .await?;
    Ok(())
}

/// Load the tag names for each of the given events in one query.
async fn load_tag_names(
    conn: &mut AsyncPgConnection,
    event_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<String>>, diesel::result::Error> {
    let rows: Vec<(Uuid, String)> = event_tags::table
        .inner_join(tags::table)
        .filter(event_tags::event_id.eq_any(event_ids))
        .select((event_tags::event_id, tags::name))
        .load(conn)
        .await?;

    let mut by_event: HashMap<Uuid, Vec<String>> = HashMap::new();
    for (event_id, name) in rows {
        by_event.entry(event_id).or_default().push(name);
    }
    Ok(by_event)
}

impl DieselEventRepository {
    async fn load_one(
        &self,
        row: Option<EventRow>,
        conn: &mut AsyncPgConnection,
    ) -> Result<Option<Event>, EventStoreError> {
        let Some(row) = row else {
            return Ok(None);
        };
        let mut tag_names = load_tag_names(conn, &[row.id])
            .await
            .map_err(map_read_error)?;
        let names = tag_names.remove(&row.id).unwrap_or_default();
        row_to_event(row, names).map(Some)
    }
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn insert(&self, event: &Event) -> Result<(), EventStoreError> {
        let mut pooled = self.pool.get().await.map_err(map_pool)?;
        let conn = &mut *pooled;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(events::table)
                    .values(&new_event_row(event))
                    .execute(conn)
                    .await?;
                replace_tag_links(conn, event).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_write_error)
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, EventStoreError> {
        let mut pooled = self.pool.get().await.map_err(map_pool)?;
        let conn = &mut *pooled;
        let row: Option<EventRow> = events::table
            .find(id.as_uuid())
            .select(EventRow::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        self.load_one(row, conn).await
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Event>, EventStoreError> {
        let mut pooled = self.pool.get().await.map_err(map_pool)?;
        let conn = &mut *pooled;
        let row: Option<EventRow> = events::table
            .filter(events::title.eq(title))
            .select(EventRow::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        self.load_one(row, conn).await
    }

    async fn update(&self, event: &Event) -> Result<(), EventStoreError> {
        let mut pooled = self.pool.get().await.map_err(map_pool)?;
        let conn = &mut *pooled;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let changeset = EventChangeset {
                    title: event.title().as_ref(),
                    description: event.description(),
                    date: event.date(),
                    location: event.location().as_ref(),
                    ticket_price: event.ticket_price().value(),
                };
                diesel::update(events::table.find(event.id().as_uuid()))
                    .set(&changeset)
                    .execute(conn)
                    .await?;
                replace_tag_links(conn, event).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_write_error)
    }

    async fn delete(&self, id: &EventId) -> Result<(), EventStoreError> {
        let mut pooled = self.pool.get().await.map_err(map_pool)?;
        let conn = &mut *pooled;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::delete(event_tags::table.filter(event_tags::event_id.eq(id.as_uuid())))
                    .execute(conn)
                    .await?;
                diesel::delete(events::table.find(id.as_uuid()))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_read_error)
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, EventStoreError> {
        let mut pooled = self.pool.get().await.map_err(map_pool)?;
        let conn = &mut *pooled;

        let mut query = events::table.select(EventRow::as_select()).into_boxed();
        if let Some(after) = filter.starts_after {
            query = query.filter(events::date.gt(after));
        }
        if !filter.tags.is_empty() {
            let tagged = event_tags::table
                .inner_join(tags::table)
                .filter(tags::name.eq_any(filter.tags.names()))
                .select(event_tags::event_id);
            query = query.filter(events::id.eq_any(tagged));
        }

        let rows: Vec<EventRow> = query
            .order((events::date.asc(), events::title.asc()))
            .load(conn)
            .await
            .map_err(map_read_error)?;

        let event_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut tag_names = load_tag_names(conn, &event_ids)
            .await
            .map_err(map_read_error)?;

        rows.into_iter()
            .map(|row| {
                let names = tag_names.remove(&row.id).unwrap_or_default();
                row_to_event(row, names)
            })
            .collect()
    }
}

//! Event API handlers.
//!
//! ```text
//! GET /api/events?tags=music&tags=art&upcoming
//! POST /api/events {"title":"Gig","date":"2026-09-01T19:00:00Z","location":"Town Hall", ...}
//! GET|PUT|DELETE /api/events/{id}
//! ```
//!
//! Every handler requires a token; create/update/delete act on behalf of
//! the authenticated user, and the lifecycle service enforces ownership.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::{EventLifecycle, EventListing};
use crate::domain::{
    Error, Event, EventDraft, EventId, EventTitle, EventValidationError, Location, TagFilter,
    TagSet, TicketPrice, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::state::HttpState;

/// Event request body for create and update.
///
/// `organizer` is deliberately absent: the acting user becomes the
/// organizer on create, and the field is immutable afterwards.
#[derive(Debug, Deserialize, Serialize)]
pub struct EventPayload {
    /// Unique event title.
    pub title: String,
    /// Free-form description; defaults to empty.
    #[serde(default)]
    pub description: String,
    /// When the event takes place (RFC 3339).
    pub date: DateTime<Utc>,
    /// Venue description.
    pub location: String,
    /// Admission price; defaults to free.
    #[serde(default)]
    pub ticket_price: f64,
    /// Labels to attach; duplicates collapse.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TryFrom<EventPayload> for EventDraft {
    type Error = EventValidationError;

    fn try_from(value: EventPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            title: EventTitle::new(&value.title)?,
            description: value.description,
            date: value.date,
            location: Location::new(&value.location)?,
            ticket_price: TicketPrice::new(value.ticket_price)?,
            tags: TagSet::from_raw(value.tags),
        })
    }
}

/// Event representation returned to clients.
///
/// Tags always serialize as an array of plain strings and the organizer as
/// their user id, regardless of internal storage shape.
#[derive(Debug, Serialize)]
pub struct EventBody {
    /// Stable event identifier.
    pub id: EventId,
    /// Unique event title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Venue description.
    pub location: String,
    /// Admission price.
    pub ticket_price: f64,
    /// Tag names in lexicographic order.
    pub tags: Vec<String>,
    /// Organizer's user id.
    pub organizer: UserId,
}

impl From<&Event> for EventBody {
    fn from(event: &Event) -> Self {
        Self {
            id: *event.id(),
            title: event.title().as_ref().to_owned(),
            description: event.description().to_owned(),
            date: event.date(),
            location: event.location().as_ref().to_owned(),
            ticket_price: event.ticket_price().value(),
            tags: event.tags().names(),
            organizer: *event.organizer(),
        }
    }
}

fn map_event_validation_error(err: EventValidationError) -> Error {
    let (field, code) = match &err {
        EventValidationError::EmptyTitle => ("title", "empty_title"),
        EventValidationError::TitleTooLong { .. } => ("title", "title_too_long"),
        EventValidationError::EmptyLocation => ("location", "empty_location"),
        EventValidationError::LocationTooLong { .. } => ("location", "location_too_long"),
        EventValidationError::InvalidTicketPrice => ("ticket_price", "invalid_ticket_price"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Listing filters parsed from the raw query string.
///
/// `tags` repeats and ORs across values; `upcoming` is a bare flag that
/// also accepts explicit boolean-ish values.
#[derive(Debug, Default, PartialEq, Eq)]
struct ListQuery {
    tags: TagFilter,
    upcoming: bool,
}

impl ListQuery {
    fn from_query_string(query: &str) -> Self {
        let mut raw_tags = Vec::new();
        let mut upcoming = false;
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "tags" => raw_tags.push(value.into_owned()),
                "upcoming" => upcoming = !matches!(value.as_ref(), "false" | "0"),
                _ => {}
            }
        }
        Self {
            tags: TagFilter::from_raw(raw_tags),
            upcoming,
        }
    }
}

/// List events, optionally filtered by tags and upcoming-only.
///
/// An empty result is a 404 "no records" condition, not an empty page.
#[get("/events")]
pub async fn list_events(
    req: HttpRequest,
    state: web::Data<HttpState>,
    _auth: Authenticated,
) -> ApiResult<HttpResponse> {
    let query = ListQuery::from_query_string(req.query_string());
    match state.events.list_events(query.tags, query.upcoming).await? {
        EventListing::Events(events) => {
            let events: Vec<EventBody> = events.iter().map(EventBody::from).collect();
            Ok(HttpResponse::Ok().json(json!({ "events": events })))
        }
        EventListing::Empty => Err(Error::not_found("no event records available")),
    }
}

/// Create an event with the acting user as organizer.
#[post("/events")]
pub async fn create_event(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<EventPayload>,
) -> ApiResult<HttpResponse> {
    let draft = EventDraft::try_from(payload.into_inner()).map_err(map_event_validation_error)?;
    let event = state.events.create_event(auth.user_id(), draft).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "new event created successfully",
        "event": EventBody::from(&event),
    })))
}

/// Fetch a single event. Any authenticated actor may read.
#[get("/events/{id}")]
pub async fn get_event(
    state: web::Data<HttpState>,
    _auth: Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<EventBody>> {
    let id = EventId::from_uuid(path.into_inner());
    let event = state.events.get_event(&id).await?;
    Ok(web::Json(EventBody::from(&event)))
}

/// Fully replace an event's caller-editable fields. Organizer only.
#[put("/events/{id}")]
pub async fn update_event(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<EventPayload>,
) -> ApiResult<web::Json<EventBody>> {
    let id = EventId::from_uuid(path.into_inner());
    let draft = EventDraft::try_from(payload.into_inner()).map_err(map_event_validation_error)?;
    let event = state.events.update_event(auth.user_id(), &id, draft).await?;
    Ok(web::Json(EventBody::from(&event)))
}

/// Delete an event. Organizer only; allowed for past events too.
#[delete("/events/{id}")]
pub async fn delete_event(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = EventId::from_uuid(path.into_inner());
    state.events.delete_event(auth.user_id(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::{TestRequest, call_service, init_service, read_body_json};
    use chrono::TimeDelta;
    use rstest::rstest;
    use serde_json::Value;

    use crate::inbound::http::test_utils::{register_user, test_app};

    fn event_body(title: &str, date: DateTime<Utc>, tags: &[&str]) -> Value {
        json!({
            "title": title,
            "description": "a show",
            "date": date.to_rfc3339(),
            "location": "Town Hall",
            "ticket_price": 10.0,
            "tags": tags,
        })
    }

    fn tomorrow() -> DateTime<Utc> {
        Utc::now() + TimeDelta::days(1)
    }

    async fn create(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        token: &str,
        body: Value,
    ) -> Value {
        let req = TestRequest::post()
            .uri("/api/events")
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(body)
            .to_request();
        let res = call_service(app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        read_body_json(res).await
    }

    #[rstest]
    #[case("", TagFilter::default(), false)]
    #[case("upcoming", TagFilter::default(), true)]
    #[case("upcoming=true", TagFilter::default(), true)]
    #[case("upcoming=false", TagFilter::default(), false)]
    #[case("tags=music&tags=art", TagFilter::from_raw(["music", "art"]), false)]
    #[case("tags=music&upcoming=1", TagFilter::from_raw(["music"]), true)]
    #[case("other=x", TagFilter::default(), false)]
    fn list_query_parses_repeated_params(
        #[case] raw: &str,
        #[case] tags: TagFilter,
        #[case] upcoming: bool,
    ) {
        assert_eq!(
            ListQuery::from_query_string(raw),
            ListQuery { tags, upcoming }
        );
    }

    #[actix_web::test]
    async fn create_assigns_the_acting_user_as_organizer() {
        let app = init_service(test_app()).await;
        let token = register_user(&app, "alice").await;

        let body = create(&app, &token, event_body("Gig", tomorrow(), &["music"])).await;
        assert_eq!(
            body.pointer("/event/title").and_then(Value::as_str),
            Some("Gig")
        );
        assert_eq!(
            body.pointer("/event/tags"),
            Some(&json!(["music"]))
        );
        assert!(body.pointer("/event/organizer").and_then(Value::as_str).is_some());
    }

    #[actix_web::test]
    async fn create_rejects_past_dates() {
        let app = init_service(test_app()).await;
        let token = register_user(&app, "alice").await;

        let req = TestRequest::post()
            .uri("/api/events")
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(event_body("Gig", Utc::now() - TimeDelta::days(1), &[]))
            .to_request();
        let res = call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = read_body_json(res).await;
        assert_eq!(
            body.pointer("/details/code").and_then(Value::as_str),
            Some("past_date")
        );
    }

    #[actix_web::test]
    async fn create_rejects_negative_price() {
        let app = init_service(test_app()).await;
        let token = register_user(&app, "alice").await;

        let req = TestRequest::post()
            .uri("/api/events")
            .insert_header(("Authorization", format!("Token {token}")))
            .set_json(json!({
                "title": "Gig",
                "date": tomorrow().to_rfc3339(),
                "location": "Town Hall",
                "ticket_price": -1.0,
            }))
            .to_request();
        let res = call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = read_body_json(res).await;
        assert_eq!(
            body.pointer("/details/field").and_then(Value::as_str),
            Some("ticket_price")
        );
    }

    #[actix_web::test]
    async fn listing_without_records_is_not_found() {
        let app = init_service(test_app()).await;
        let token = register_user(&app, "alice").await;

        let req = TestRequest::get()
            .uri("/api/events")
            .insert_header(("Authorization", format!("Token {token}")))
            .to_request();
        let res = call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body: Value = read_body_json(res).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("no event records available")
        );
    }

    #[actix_web::test]
    async fn listing_requires_authentication() {
        let app = init_service(test_app()).await;
        let req = TestRequest::get().uri("/api/events").to_request();
        let res = call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn tag_filter_keeps_only_intersecting_events() {
        let app = init_service(test_app()).await;
        let token = register_user(&app, "alice").await;
        create(&app, &token, event_body("Gig", tomorrow(), &["music", "art"])).await;
        create(&app, &token, event_body("Vernissage", tomorrow(), &["art"])).await;

        let req = TestRequest::get()
            .uri("/api/events?tags=music")
            .insert_header(("Authorization", format!("Token {token}")))
            .to_request();
        let res = call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = read_body_json(res).await;
        let events = body.get("events").and_then(Value::as_array).expect("events");
        assert_eq!(events.len(), 1);
        assert_eq!(
            events.first().and_then(|e| e.get("title")).and_then(Value::as_str),
            Some("Gig")
        );
    }

    #[actix_web::test]
    async fn full_lifecycle_scenario() {
        let app = init_service(test_app()).await;

        // Register user A and create an event as them.
        let alice = register_user(&app, "alice").await;
        let created = create(
            &app,
            &alice,
            event_body("Gig", tomorrow(), &["music"]),
        )
        .await;
        let event_id = created
            .pointer("/event/id")
            .and_then(Value::as_str)
            .expect("event id")
            .to_owned();

        // User B may read the event but not update it.
        let bob = register_user(&app, "bob").await;
        let req = TestRequest::get()
            .uri(&format!("/api/events/{event_id}"))
            .insert_header(("Authorization", format!("Token {bob}")))
            .to_request();
        let res = call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let req = TestRequest::put()
            .uri(&format!("/api/events/{event_id}"))
            .insert_header(("Authorization", format!("Token {bob}")))
            .set_json(event_body("Hijacked", tomorrow(), &[]))
            .to_request();
        let res = call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        // The organizer renames it.
        let req = TestRequest::put()
            .uri(&format!("/api/events/{event_id}"))
            .insert_header(("Authorization", format!("Token {alice}")))
            .set_json(event_body("Gig2", tomorrow(), &["music"]))
            .to_request();
        let res = call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = read_body_json(res).await;
        assert_eq!(body.get("title").and_then(Value::as_str), Some("Gig2"));

        // Only the organizer may delete; afterwards the event is gone.
        let req = TestRequest::delete()
            .uri(&format!("/api/events/{event_id}"))
            .insert_header(("Authorization", format!("Token {bob}")))
            .to_request();
        let res = call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let req = TestRequest::delete()
            .uri(&format!("/api/events/{event_id}"))
            .insert_header(("Authorization", format!("Token {alice}")))
            .to_request();
        let res = call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let req = TestRequest::get()
            .uri(&format!("/api/events/{event_id}"))
            .insert_header(("Authorization", format!("Token {alice}")))
            .to_request();
        let res = call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}

//! Test helpers wiring the HTTP adapter to the in-memory stores.

use std::sync::Arc;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::Value;

use crate::domain::{AuthService, EventLifecycleService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryCredentialStore, InMemoryEventRepository};

/// HTTP state backed by fresh in-memory stores and the real clock.
pub(crate) fn test_state() -> web::Data<HttpState> {
    let credentials = Arc::new(InMemoryCredentialStore::default());
    let events = Arc::new(InMemoryEventRepository::default());
    web::Data::new(HttpState::new(
        Arc::new(AuthService::new(credentials)),
        Arc::new(EventLifecycleService::new(events, Arc::new(DefaultClock))),
    ))
}

/// An app exposing the full `/api` surface over in-memory stores.
pub(crate) fn test_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(test_state())
        .service(crate::inbound::http::api_scope())
}

/// Register a user through the API and return their token.
pub(crate) async fn register_user<S, B>(app: &S, username: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(serde_json::json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "password123",
        }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    body.get("token")
        .and_then(Value::as_str)
        .expect("registration returns a token")
        .to_owned()
}

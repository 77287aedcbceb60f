//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod events;
pub mod health;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

use actix_web::{Scope, web};

/// The `/api` scope with every user and event route registered.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(events::list_events)
        .service(events::create_event)
        .service(events::get_event)
        .service(events::update_event)
        .service(events::delete_event)
}

//! User API handlers: registration, login, logout.
//!
//! ```text
//! POST /api/users/register {"username":"alice","email":"alice@example.com","password":"pw"}
//! POST /api/users/login {"username":"alice","password":"pw"}
//! GET|POST /api/users/logout
//! ```

use actix_web::{HttpResponse, post, route, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::Authenticator;
use crate::domain::{
    AuthSession, AuthValidationError, Error, LoginCredentials, RegistrationRequest, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/users/register`.
#[derive(Debug, Deserialize, Serialize)]
pub struct RegisterRequest {
    /// Requested unique login name.
    pub username: String,
    /// Contact email address.
    pub email: String,
    /// Plaintext password; hashed by the credential store.
    pub password: String,
}

impl TryFrom<RegisterRequest> for RegistrationRequest {
    type Error = AuthValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.email, &value.password)
    }
}

/// Login request body for `POST /api/users/login`.
#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = AuthValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

#[derive(Serialize)]
struct AuthResponse<'a> {
    message: &'static str,
    user: &'a User,
    token: &'a str,
}

impl<'a> AuthResponse<'a> {
    fn new(message: &'static str, session: &'a AuthSession) -> Self {
        Self {
            message,
            user: session.user(),
            token: session.token().as_str(),
        }
    }
}

fn map_auth_validation_error(err: AuthValidationError) -> Error {
    let (field, code) = match &err {
        AuthValidationError::Username(_) => ("username", "invalid_username"),
        AuthValidationError::Email(_) => ("email", "invalid_email"),
        AuthValidationError::EmptyPassword => ("password", "empty_password"),
        AuthValidationError::EmptyToken => ("token", "empty_token"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Create an account and immediately authenticate it.
///
/// The response carries a token so the fresh user needs no separate login
/// step.
#[post("/users/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request =
        RegistrationRequest::try_from(payload.into_inner()).map_err(map_auth_validation_error)?;
    let session = state.auth.register(request).await?;
    Ok(HttpResponse::Created().json(AuthResponse::new(
        "new user registration successful",
        &session,
    )))
}

/// Authenticate credentials, reusing the user's live token if one exists.
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_auth_validation_error)?;
    let session = state.auth.login(credentials).await?;
    Ok(HttpResponse::Ok().json(AuthResponse::new("user logged in successfully", &session)))
}

/// Revoke the presented token.
///
/// Reaching this handler already required authentication, so revocation is
/// unconditional. GET is kept alongside POST for older clients that log
/// out with a plain link.
#[route("/users/logout", method = "GET", method = "POST")]
pub async fn logout(state: web::Data<HttpState>, auth: Authenticated) -> ApiResult<HttpResponse> {
    state.auth.logout(auth.token()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "user logged out successfully" })))
}

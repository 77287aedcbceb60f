//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers that require authentication take an [`Authenticated`] extractor
//! argument; extraction parses the `Authorization` header and resolves the
//! token through the [`Authenticator`] port, so handlers never touch
//! framework-level auth plumbing.
//!
//! Clients send `Authorization: Token <key>`; `Bearer <key>` is accepted
//! as an alias.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::ports::Authenticator;
use crate::domain::{Error, SessionToken, User, UserId};
use crate::inbound::http::state::HttpState;

const SCHEMES: [&str; 2] = ["Token", "Bearer"];

fn token_from_header(req: &HttpRequest) -> Result<SessionToken, Error> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("authentication credentials were not provided"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;

    let (scheme, key) = value
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized("malformed authorization header"))?;
    if !SCHEMES.iter().any(|accepted| accepted.eq_ignore_ascii_case(scheme)) {
        return Err(Error::unauthorized("unsupported authorization scheme"));
    }
    SessionToken::new(key).map_err(|_| Error::unauthorized("malformed authorization header"))
}

/// An authenticated request actor: the resolved user plus the token that
/// proved them.
#[derive(Debug, Clone)]
pub struct Authenticated {
    user: User,
    token: SessionToken,
}

impl Authenticated {
    /// The authenticated user.
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// The authenticated user's id, the acting subject for domain calls.
    pub const fn user_id(&self) -> &UserId {
        self.user.id()
    }

    /// The token presented on this request (needed by logout).
    pub const fn token(&self) -> &SessionToken {
        &self.token
    }
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = token_from_header(req);
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("http state is not configured"))?;
            let token = token?;
            let user = state
                .auth
                .identify(&token)
                .await?
                .ok_or_else(|| Error::unauthorized("invalid authentication token"))?;
            Ok(Self { user, token })
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{HttpResponse, test, web};
    use rstest::rstest;

    use crate::inbound::http::test_utils::{register_user, test_app};

    async fn whoami(auth: Authenticated) -> HttpResponse {
        HttpResponse::Ok().body(auth.user().username().to_string())
    }

    #[actix_web::test]
    async fn resolves_a_live_token() {
        let app = test::init_service(
            test_app().route("/whoami", web::get().to(whoami)),
        )
        .await;
        let token = register_user(&app, "alice").await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Token {token}")))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, "alice");
    }

    #[actix_web::test]
    async fn accepts_the_bearer_alias() {
        let app = test::init_service(
            test_app().route("/whoami", web::get().to(whoami)),
        )
        .await;
        let token = register_user(&app, "alice").await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[rstest]
    #[case::missing_header(None)]
    #[case::unknown_scheme(Some("Basic abc"))]
    #[case::no_scheme(Some("abcdef"))]
    #[case::unknown_token(Some("Token ffffffffffffffffffffffffffffffffffffffff"))]
    #[actix_web::test]
    async fn rejects_bad_credentials(#[case] header: Option<&str>) {
        let app = test::init_service(
            test_app().route("/whoami", web::get().to(whoami)),
        )
        .await;

        let mut req = test::TestRequest::get().uri("/whoami");
        if let Some(value) = header {
            req = req.insert_header(("Authorization", value));
        }
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}

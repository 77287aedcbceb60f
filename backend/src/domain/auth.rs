//! Authentication primitives: credentials, registration payloads, tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::user::{EmailAddress, User, UserValidationError, Username};

/// Domain error returned when an authentication payload is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// Username failed the user model's validation rules.
    Username(UserValidationError),
    /// Email failed the user model's validation rules.
    Email(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Token was blank once trimmed.
    EmptyToken,
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username(err) | Self::Email(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::EmptyToken => write!(f, "token must not be empty"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice", "secret").unwrap();
/// assert_eq!(creds.username(), "alice");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, AuthValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(AuthValidationError::Username(
                UserValidationError::EmptyUsername,
            ));
        }
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload for creating an account.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl RegistrationRequest {
    /// Construct a registration request from raw inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, AuthValidationError> {
        let username = Username::new(username).map_err(AuthValidationError::Username)?;
        let email = EmailAddress::new(email).map_err(AuthValidationError::Email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }

        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested unique login name.
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Requested contact address.
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password, handed to the credential store for hashing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Opaque bearer credential bound 1:1 to a user.
///
/// The key itself is secret; `Debug` is redacted so tokens never leak
/// through logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Validate and wrap a raw token key.
    pub fn new(key: impl AsRef<str>) -> Result<Self, AuthValidationError> {
        let trimmed = key.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AuthValidationError::EmptyToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw key presented in the `Authorization` header.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// An authenticated user together with the token proving it.
#[derive(Debug, Clone)]
pub struct AuthSession {
    user: User,
    token: SessionToken,
}

impl AuthSession {
    /// Bundle a user with their session token.
    pub const fn new(user: User, token: SessionToken) -> Self {
        Self { user, token }
    }

    /// The authenticated user.
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// The bearer token for subsequent requests.
    pub const fn token(&self) -> &SessionToken {
        &self.token
    }
}

//! User data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 150;
/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 254;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Username exceeded [`USERNAME_MAX`] characters.
    UsernameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// Email address was missing or blank once trimmed.
    EmptyEmail,
    /// Email address exceeded [`EMAIL_MAX`] characters.
    EmailTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// Email address did not contain an `@` separator.
    EmailMissingAtSign,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => {
                write!(f, "email must be at most {max} characters")
            }
            Self::EmailMissingAtSign => write!(f, "email must contain an '@' sign"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random [`UserId`].
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

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Login name chosen by the user, unique across all accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`] from raw input.
    ///
    /// Surrounding whitespace is trimmed before validation.
    pub fn new(username: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = username.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Contact email address for the account.
///
/// Validation is deliberately shallow: the address must be non-empty,
/// within length bounds, and contain an `@` sign. Deliverability is the
/// mail system's problem, not this model's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`] from raw input.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !trimmed.contains('@') {
            return Err(UserValidationError::EmailMissingAtSign);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user.
///
/// Password material never appears on this type; only the credential
/// store's adapters ever see a digest.
///
/// ## Invariants
/// - `username` is unique across accounts (enforced by the credential store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub const fn new(id: UserId, username: Username, email: EmailAddress) -> Self {
        Self {
            id,
            username,
            email,
        }
    }

    /// Stable user identifier.
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Unique login name.
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Contact email address.
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyUsername)]
    #[case("   ", UserValidationError::EmptyUsername)]
    fn username_rejects_blank(#[case] raw: &str, #[case] expected: UserValidationError) {
        let err = Username::new(raw).expect_err("blank usernames must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn username_rejects_overlong() {
        let raw = "a".repeat(USERNAME_MAX + 1);
        let err = Username::new(raw).expect_err("overlong usernames must fail");
        assert_eq!(err, UserValidationError::UsernameTooLong { max: USERNAME_MAX });
    }

    #[test]
    fn username_trims_whitespace() {
        let username = Username::new("  alice  ").expect("valid username");
        assert_eq!(username.as_ref(), "alice");
    }

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("not-an-email", UserValidationError::EmailMissingAtSign)]
    fn email_rejects_invalid(#[case] raw: &str, #[case] expected: UserValidationError) {
        let err = EmailAddress::new(raw).expect_err("invalid emails must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn email_accepts_plain_address() {
        let email = EmailAddress::new("alice@example.com").expect("valid email");
        assert_eq!(email.as_ref(), "alice@example.com");
    }

    #[test]
    fn user_serializes_without_password_material() {
        let user = User::new(
            UserId::random(),
            Username::new("alice").expect("valid username"),
            EmailAddress::new("alice@example.com").expect("valid email"),
        );
        let value = serde_json::to_value(&user).expect("user serializes");
        let object = value.as_object().expect("user is a JSON object");
        assert!(object.contains_key("id"));
        assert!(object.contains_key("username"));
        assert!(object.contains_key("email"));
        assert!(!object.contains_key("password"));
    }
}

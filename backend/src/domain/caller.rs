//! Authenticated callers and the roles that scope what they may see.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::Email;

/// Role attached to an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Administrative staff maintaining the course catalogue.
    Editor,
    /// Teaching staff; restricted to their own courses.
    Lecturer,
    /// Enrolled learners; never see rosters or calendars.
    Student,
}

impl Role {
    /// Canonical upper-case label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Editor => "EDITOR",
            Self::Lecturer => "LECTURER",
            Self::Student => "STUDENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError(String);

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        [Self::Editor, Self::Lecturer, Self::Student]
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseRoleError(trimmed.to_owned()))
    }
}

/// Identity and role resolved from an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    role: Role,
    email: Email,
}

impl Caller {
    /// Bind a role to the caller's email.
    pub fn new(role: Role, email: Email) -> Self {
        Self { role, email }
    }

    /// Resolved role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Caller's email; lecturers are matched on it.
    pub fn email(&self) -> &Email {
        &self.email
    }
}

/// Error returned for blank access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyAccessToken;

impl fmt::Display for EmptyAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "access token must not be empty")
    }
}

impl std::error::Error for EmptyAccessToken {}

/// Opaque bearer token presented by a caller.
///
/// The secret is wiped from memory on drop and never printed by `Debug`.
/// Hashing and equality use the raw value, so tokens can key lookup maps.
///
/// # Examples
/// ```
/// use attendance::domain::AccessToken;
///
/// let token = AccessToken::new("abc123").expect("non-empty token");
/// assert_eq!(token.expose(), "abc123");
/// assert_eq!(format!("{token:?}"), "AccessToken(<redacted>)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a raw token, rejecting blank values.
    pub fn new(raw: impl Into<String>) -> Result<Self, EmptyAccessToken> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(EmptyAccessToken);
        }
        Ok(Self(Zeroizing::new(raw)))
    }

    /// Raw token value for collaborators that validate it.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl Hash for AccessToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.expose().hash(state);
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

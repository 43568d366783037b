//! User aggregate and the value types that mutate it.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Validation errors raised when constructing user primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a positive integer"),
        }
    }
}

impl std::error::Error for UserValidationError {}

impl From<ParseIntError> for UserValidationError {
    fn from(_: ParseIntError) -> Self {
        Self::InvalidId
    }
}

/// Database-assigned user identifier.
///
/// # Examples
/// ```
/// use user_service::domain::UserId;
///
/// let id: UserId = "42".parse().expect("valid id");
/// assert_eq!(id.get(), 42);
/// assert!("0".parse::<UserId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct UserId(i32);

impl UserId {
    /// Validate a raw key. Identifiers start at one.
    pub fn new(raw: i32) -> Result<Self, UserValidationError> {
        if raw <= 0 {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(raw))
    }

    /// Raw database key.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.parse::<i32>()?)
    }
}

impl TryFrom<i32> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i32 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// The two one-to-many relations reconciled from the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Followers,
    Repositories,
}

impl RelationKind {
    pub const ALL: [Self; 2] = [Self::Followers, Self::Repositories];

    /// Lowercase name used in logs and events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Followers => "followers",
            Self::Repositories => "repositories",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial update of the four mutable profile fields.
///
/// `None` and empty strings both leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub time_zone_id: Option<String>,
}

/// Snapshot of what the identity provider reported for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderProfile {
    pub email: Option<String>,
    pub username: Option<String>,
    pub followers: Vec<String>,
    pub repositories: Vec<String>,
}

/// Application user.
///
/// Users loaded from the store carry empty relation lists; reconciliation
/// fills them with what the provider observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    time_zone_id: String,
    followers: Vec<String>,
    repositories: Vec<String>,
}

impl User {
    /// Build a user with blank names, time zone and relations.
    pub fn new(id: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            time_zone_id: String::new(),
            followers: Vec::new(),
            repositories: Vec::new(),
        }
    }

    /// Set the first and last name.
    pub fn with_names(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Set the time zone identifier.
    pub fn with_time_zone_id(mut self, time_zone_id: impl Into<String>) -> Self {
        self.time_zone_id = time_zone_id.into();
        self
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn time_zone_id(&self) -> &str {
        &self.time_zone_id
    }

    pub fn followers(&self) -> &[String] {
        &self.followers
    }

    pub fn repositories(&self) -> &[String] {
        &self.repositories
    }

    /// In-memory values of the given relation.
    pub fn relation(&self, kind: RelationKind) -> &[String] {
        match kind {
            RelationKind::Followers => &self.followers,
            RelationKind::Repositories => &self.repositories,
        }
    }

    /// Replace the in-memory values of the given relation.
    pub fn set_relation(&mut self, kind: RelationKind, values: Vec<String>) {
        match kind {
            RelationKind::Followers => self.followers = values,
            RelationKind::Repositories => self.repositories = values,
        }
    }

    /// Apply a partial profile update field by field.
    ///
    /// # Examples
    /// ```
    /// use user_service::domain::{ProfileUpdate, User, UserId};
    ///
    /// let id = UserId::new(1).expect("valid id");
    /// let mut user = User::new(id, "alice", "a@x.com");
    /// user.apply_profile_update(&ProfileUpdate {
    ///     first_name: Some("Alice".into()),
    ///     email: Some(String::new()),
    ///     ..ProfileUpdate::default()
    /// });
    /// assert_eq!(user.first_name(), "Alice");
    /// assert_eq!(user.email(), "a@x.com");
    /// ```
    pub fn apply_profile_update(&mut self, update: &ProfileUpdate) {
        overwrite_if_present(&mut self.email, update.email.as_deref());
        overwrite_if_present(&mut self.first_name, update.first_name.as_deref());
        overwrite_if_present(&mut self.last_name, update.last_name.as_deref());
        overwrite_if_present(&mut self.time_zone_id, update.time_zone_id.as_deref());
    }

    /// Merge the provider's scalar fields and observed relations.
    ///
    /// Email and username are only replaced by non-empty provider values.
    /// The relation lists always take the observed values, which may be
    /// empty.
    pub fn merge_provider_profile(&mut self, profile: &ProviderProfile) {
        overwrite_if_present(&mut self.email, profile.email.as_deref());
        overwrite_if_present(&mut self.username, profile.username.as_deref());
        self.followers = profile.followers.clone();
        self.repositories = profile.repositories.clone();
    }
}

fn overwrite_if_present(target: &mut String, candidate: Option<&str>) {
    if let Some(value) = candidate.filter(|value| !value.is_empty()) {
        value.clone_into(target);
    }
}

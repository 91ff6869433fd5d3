//! [`Contact`] definitions.

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::property;
#[cfg(doc)]
use super::{Lead, Property};

/// Inbound enquiry, persisted as the durable audit trail.
///
/// A [`Contact`] is created once per enquiry and exists even when the
/// derived [`Lead`] could not be created. Only its [`Status`] is mutated
/// afterwards.
#[derive(Clone, Debug)]
pub struct Contact {
    /// ID of this [`Contact`].
    pub id: Id,

    /// [`Name`] of the enquirer.
    pub name: Name,

    /// [`Email`] of the enquirer.
    pub email: Email,

    /// [`Phone`] of the enquirer.
    pub phone: Option<Phone>,

    /// [`Message`] of the enquiry.
    pub message: Message,

    /// ID of the [`Property`] the enquiry is about, if any.
    pub property_id: Option<property::Id>,

    /// Processing [`Status`] of this [`Contact`].
    pub status: Status,

    /// [`DateTime`] when this enquiry was submitted.
    pub created_at: SubmissionDateTime,
}

/// ID of a [`Contact`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Name of an enquirer.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Email address of an enquirer.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `email` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    /// Creates a new [`Email`] if the given `email` is valid.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Option<Self> {
        let email = email.into();
        Self::check(&email).then_some(Self(email))
    }

    /// Checks whether the given `email` is a valid [`Email`].
    fn check(email: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] invariants:
        /// - Must contain exactly one `@`;
        /// - Must not contain whitespace or control characters;
        /// - Must have a dotted domain part.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex")
        });

        let email = email.as_ref();
        email.len() <= 512 && REGEX.is_match(email)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Phone number of an enquirer.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `phone` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(phone: impl Into<String>) -> Self {
        Self(phone.into())
    }

    /// Creates a new [`Phone`] if the given `phone` is valid.
    #[must_use]
    pub fn new(phone: impl Into<String>) -> Option<Self> {
        let phone = phone.into();
        Self::check(&phone).then_some(Self(phone))
    }

    /// Checks whether the given `phone` is a valid [`Phone`].
    fn check(phone: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] invariants:
        /// - Optional leading `+`;
        /// - Digits, spaces, parentheses and dashes only;
        /// - Between 5 and 20 characters long.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\+?[0-9 ()-]{5,20}$").expect("valid regex")
        });

        REGEX.is_match(phone.as_ref())
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// Message of an enquiry.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Message(String);

impl Message {
    /// Creates a new [`Message`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `message` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Creates a new [`Message`] if the given `message` is valid.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Option<Self> {
        let message = message.into();
        Self::check(&message).then_some(Self(message))
    }

    /// Checks whether the given `message` is a valid [`Message`].
    fn check(message: impl AsRef<str>) -> bool {
        let message = message.as_ref();
        !message.trim().is_empty() && message.len() <= 4096
    }
}

impl FromStr for Message {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Message`")
    }
}

define_kind! {
    #[doc = "Processing status of a [`Contact`]."]
    enum Status {
        #[doc = "The enquiry has not been looked at yet."]
        New = 1,

        #[doc = "The enquiry is being worked on."]
        InProgress = 2,

        #[doc = "The enquiry has been resolved."]
        Resolved = 3,
    }
}

/// [`DateTime`] when an enquiry was submitted.
pub type SubmissionDateTime = DateTimeOf<(Contact, unit::Submission)>;

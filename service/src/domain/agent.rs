//! [`Agent`] definitions.

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
use super::Property;

/// Real-estate agent handling [`Property`] listings.
#[derive(Clone, Debug)]
pub struct Agent {
    /// ID of this [`Agent`].
    pub id: Id,

    /// [`Name`] of this [`Agent`].
    pub name: Name,

    /// [`Email`] of this [`Agent`].
    pub email: Option<Email>,

    /// [`Phone`] of this [`Agent`].
    pub phone: Option<Phone>,

    /// [`Role`] of this [`Agent`].
    pub role: Role,

    /// IDs of [`Property`]s assigned to this [`Agent`].
    ///
    /// Mutated only by assignment reconciliation and by the [`Property`]
    /// deletion cascade.
    pub assigned_properties: Vec<property::Id>,

    /// [`DateTime`] when this [`Agent`] was created.
    pub created_at: CreationDateTime,
}

/// ID of an [`Agent`].
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
    Ord,
    PartialEq,
    PartialOrd,
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

/// Name of an [`Agent`].
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

/// Email address of an [`Agent`].
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

/// Phone number of an [`Agent`].
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

define_kind! {
    #[doc = "Role of an [`Agent`]."]
    enum Role {
        #[doc = "A regular listing agent."]
        Agent = 1,

        #[doc = "An administrator of the agency."]
        Admin = 2,
    }
}

/// [`DateTime`] when an [`Agent`] was created.
pub type CreationDateTime = DateTimeOf<(Agent, unit::Creation)>;

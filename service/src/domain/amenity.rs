//! [`Amenity`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use super::Property;

/// Catalog amenity referenced by [`Property`]s.
///
/// An independent catalog entity: deleting a [`Property`] never touches the
/// catalog, and a dangling reference from a [`Property`] simply resolves to
/// nothing at read time.
#[derive(Clone, Debug)]
pub struct Amenity {
    /// ID of this [`Amenity`].
    pub id: Id,

    /// [`Name`] of this [`Amenity`].
    pub name: Name,

    /// [`Icon`] of this [`Amenity`], if any.
    pub icon: Option<Icon>,

    /// [`DateTime`] when this [`Amenity`] was created.
    pub created_at: CreationDateTime,
}

/// ID of an [`Amenity`].
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

/// Name of an [`Amenity`].
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

/// Icon identifier of an [`Amenity`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Icon(String);

impl Icon {
    /// Creates a new [`Icon`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `icon` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(icon: impl Into<String>) -> Self {
        Self(icon.into())
    }

    /// Creates a new [`Icon`] if the given `icon` is valid.
    #[must_use]
    pub fn new(icon: impl Into<String>) -> Option<Self> {
        let icon = icon.into();
        Self::check(&icon).then_some(Self(icon))
    }

    /// Checks whether the given `icon` is a valid [`Icon`].
    fn check(icon: impl AsRef<str>) -> bool {
        let icon = icon.as_ref();
        icon.trim() == icon && !icon.is_empty() && icon.len() <= 512
    }
}

impl FromStr for Icon {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Icon`")
    }
}

/// [`DateTime`] when an [`Amenity`] was created.
pub type CreationDateTime = DateTimeOf<(Amenity, unit::Creation)>;

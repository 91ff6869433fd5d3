//! [`Property`] definitions.

pub mod specifications;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{agent, amenity};
#[cfg(doc)]
use super::{Agent, Amenity};

pub use self::specifications::Specifications;

/// Real-estate listing.
#[derive(Clone, Debug)]
pub struct Property {
    /// ID of this [`Property`].
    pub id: Id,

    /// [`Title`] of this [`Property`].
    pub title: Title,

    /// [`City`] this [`Property`] is located in.
    pub city: City,

    /// [`Address`] of this [`Property`], if known.
    pub address: Option<Address>,

    /// [`Kind`] of this [`Property`].
    ///
    /// Selects which [`Specifications`] variant this [`Property`] may carry.
    pub kind: Kind,

    /// Asking [`Price`] of this [`Property`].
    pub price: Option<Price>,

    /// [`Area`] of this [`Property`] in square feet.
    pub area: Option<Area>,

    /// Derived price per square foot.
    ///
    /// Present if and only if both [`Price`] and [`Area`] are present, and
    /// recomputed on every write touching either of them.
    pub price_per_sqft: Option<PricePerSqft>,

    /// Type-specific [`Specifications`] of this [`Property`], if provided.
    pub specifications: Option<Specifications>,

    /// IDs of [`Agent`]s assigned to this [`Property`].
    ///
    /// Mutated only by assignment reconciliation and by the [`Agent`]
    /// deletion cascade.
    pub assigned_agents: Vec<agent::Id>,

    /// IDs of [`Amenity`]s this [`Property`] offers.
    ///
    /// Dangling references are tolerated and resolve to nothing at read
    /// time.
    pub amenities: Vec<amenity::Id>,

    /// [`DateTime`] when this [`Property`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Property`].
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

define_kind! {
    #[doc = "Kind of a [`Property`]."]
    enum Kind {
        #[doc = "An apartment in a residential building."]
        Apartment = 1,

        #[doc = "A standalone villa."]
        Villa = 2,

        #[doc = "A commercial space."]
        Commercial = 3,

        #[doc = "An open plot of land."]
        OpenPlot = 4,

        #[doc = "Agricultural farm land."]
        FarmLand = 5,
    }
}

/// Title of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `title` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title && !title.is_empty() && title.len() <= 512
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// City a [`Property`] is located in.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct City(String);

impl City {
    /// Creates a new [`City`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `city` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(city: impl Into<String>) -> Self {
        Self(city.into())
    }

    /// Creates a new [`City`] if the given `city` is valid.
    #[must_use]
    pub fn new(city: impl Into<String>) -> Option<Self> {
        let city = city.into();
        Self::check(&city).then_some(Self(city))
    }

    /// Checks whether the given `city` is a valid [`City`].
    fn check(city: impl AsRef<str>) -> bool {
        let city = city.as_ref();
        city.trim() == city && !city.is_empty() && city.len() <= 512
    }
}

impl FromStr for City {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `City`")
    }
}

/// Street address of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Address(String);

impl Address {
    /// Creates a new [`Address`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Address`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Address`].
    fn check(address: impl AsRef<str>) -> bool {
        let address = address.as_ref();
        address.trim() == address && !address.is_empty() && address.len() <= 512
    }
}

impl FromStr for Address {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Address`")
    }
}

/// Asking price of a [`Property`].
#[derive(
    AsRef, Clone, Copy, Debug, Display, Eq, Hash, Into, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Price(Decimal);

impl Price {
    /// Creates a new [`Price`] if the given `price` is positive.
    #[must_use]
    pub fn new(price: Decimal) -> Option<Self> {
        price.is_sign_positive().then_some(Self(price))
    }
}

impl FromStr for Price {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Price`")
    }
}

/// Area of a [`Property`] in square feet.
#[derive(
    AsRef, Clone, Copy, Debug, Display, Eq, Hash, Into, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Area(Decimal);

impl Area {
    /// Creates a new [`Area`] if the given `area` is positive and non-zero.
    #[must_use]
    pub fn new(area: Decimal) -> Option<Self> {
        (area.is_sign_positive() && !area.is_zero()).then_some(Self(area))
    }
}

impl FromStr for Area {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().ok().and_then(Self::new).ok_or("invalid `Area`")
    }
}

/// Derived price per square foot of a [`Property`].
#[derive(
    AsRef, Clone, Copy, Debug, Display, Eq, Hash, Into, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct PricePerSqft(Decimal);

impl PricePerSqft {
    /// Derives a [`PricePerSqft`] from the given [`Price`] and [`Area`].
    ///
    /// [`None`] is returned whenever either of them is absent.
    #[must_use]
    pub fn derive(price: Option<Price>, area: Option<Area>) -> Option<Self> {
        let (price, area) = price.zip(area)?;
        Some(Self((price.0 / area.0).round()))
    }
}

/// [`DateTime`] when a [`Property`] was created.
pub type CreationDateTime = DateTimeOf<(Property, unit::Creation)>;

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::{Area, Price, PricePerSqft};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn derives_rounded_price_per_sqft() {
        let price = Price::new(decimal("7500000")).unwrap();
        let area = Area::new(decimal("1350")).unwrap();

        let derived = PricePerSqft::derive(Some(price), Some(area)).unwrap();
        assert_eq!(Decimal::from(derived), decimal("5556"));
    }

    #[test]
    fn price_per_sqft_absent_without_both_parts() {
        let price = Price::new(decimal("100")).unwrap();
        let area = Area::new(decimal("10")).unwrap();

        assert_eq!(PricePerSqft::derive(Some(price), None), None);
        assert_eq!(PricePerSqft::derive(None, Some(area)), None);
        assert_eq!(PricePerSqft::derive(None, None), None);
    }

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(Price::new(decimal("-1")).is_none());
        assert!(Area::new(decimal("0")).is_none());
        assert!(Area::new(decimal("-42")).is_none());
    }
}

//! [`Lead`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{agent, contact, property};
#[cfg(doc)]
use super::{Agent, Contact, Property};

/// Actionable sales lead derived from an enquiry.
///
/// Created once, at enquiry time. Its `assigned_agents` is a point-in-time
/// snapshot of the referenced [`Property`]'s assignment and is never updated
/// when that assignment later changes.
#[derive(Clone, Debug)]
pub struct Lead {
    /// ID of this [`Lead`].
    pub id: Id,

    /// Name of the enquirer.
    ///
    /// Shares the format of the originating [`Contact`] fields.
    pub name: contact::Name,

    /// Email address of the enquirer.
    pub email: contact::Email,

    /// Phone number of the enquirer.
    pub phone: Option<contact::Phone>,

    /// Message of the enquiry.
    pub message: contact::Message,

    /// ID of the [`Property`] the enquiry is about, if any.
    pub property_id: Option<property::Id>,

    /// Snapshot of the [`Property`]'s assigned [`Agent`]s taken at enquiry
    /// time.
    pub assigned_agents: Vec<agent::Id>,

    /// [`Status`] of this [`Lead`].
    pub status: Status,

    /// [`Priority`] of this [`Lead`].
    pub priority: Priority,

    /// [`Source`] this [`Lead`] came from.
    pub source: Source,

    /// Ordered [`Note`]s attached to this [`Lead`].
    pub notes: Vec<Note>,

    /// [`DateTime`] when the originating enquiry was submitted.
    pub created_at: SubmissionDateTime,
}

/// ID of a [`Lead`].
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

define_kind! {
    #[doc = "Status of a [`Lead`]."]
    enum Status {
        #[doc = "The lead has not been worked yet."]
        New = 1,

        #[doc = "The enquirer has been contacted."]
        Contacted = 2,

        #[doc = "The lead is qualified."]
        Qualified = 3,

        #[doc = "The lead is closed."]
        Closed = 4,
    }
}

define_kind! {
    #[doc = "Priority of a [`Lead`]."]
    enum Priority {
        #[doc = "Low priority."]
        Low = 1,

        #[doc = "Medium priority."]
        Medium = 2,

        #[doc = "High priority."]
        High = 3,
    }
}

define_kind! {
    #[doc = "Source a [`Lead`] came from."]
    enum Source {
        #[doc = "The general contact form."]
        GeneralContactForm = 1,

        #[doc = "A property-specific contact form."]
        PropertyContactForm = 2,
    }
}

/// Note attached to a [`Lead`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Note(String);

impl Note {
    /// Creates a new [`Note`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `note` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(note: impl Into<String>) -> Self {
        Self(note.into())
    }

    /// Creates a new [`Note`] if the given `note` is valid.
    #[must_use]
    pub fn new(note: impl Into<String>) -> Option<Self> {
        let note = note.into();
        Self::check(&note).then_some(Self(note))
    }

    /// Checks whether the given `note` is a valid [`Note`].
    fn check(note: impl AsRef<str>) -> bool {
        let note = note.as_ref();
        !note.trim().is_empty() && note.len() <= 4096
    }
}

impl FromStr for Note {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Note`")
    }
}

/// [`DateTime`] when the enquiry originating a [`Lead`] was submitted.
pub type SubmissionDateTime = DateTimeOf<(Lead, unit::Submission)>;

pub mod draft {
    //! [`Draft`] outbox records of [`Lead`]s awaiting delivery.

    use super::Lead;

    /// Outbox record of a [`Lead`] awaiting delivery.
    ///
    /// Persisted in the same transaction as the originating enquiry's
    /// `Contact`, and drained asynchronously with retry. Delivery is
    /// idempotent: the [`Lead`] insert upserts by its id, so replaying a
    /// partially delivered [`Draft`] is harmless.
    #[derive(Clone, Debug)]
    pub struct Draft {
        /// [`Lead`] to be delivered.
        pub lead: Lead,

        /// Number of failed delivery attempts so far.
        pub attempts: Attempts,
    }

    impl Draft {
        /// Creates a new [`Draft`] of the provided [`Lead`].
        #[must_use]
        pub fn new(lead: Lead) -> Self {
            Self { lead, attempts: 0 }
        }
    }

    /// Number of failed delivery attempts of a [`Draft`].
    pub type Attempts = u16;

    /// Selector of the next [`Draft`]s to deliver, least-retried first.
    #[derive(Clone, Copy, Debug)]
    pub struct Batch {
        /// Maximum number of [`Draft`]s to select.
        pub limit: u16,
    }
}

pub use self::draft::Draft;

mod driver;
pub mod share_link;

pub use driver::Driver;
pub use share_link::{share_link, share_message};

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

pub type TripId = String;

/// Where a record came from. Local records were created while the remote store was unreachable
/// and live in the pending queue until replayed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    #[default]
    Remote,
    Local,
}

/// One scheduled trip, in the single shape used everywhere past the remote client boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "strict", serde(deny_unknown_fields))]
pub struct Trip {
    pub id: TripId,
    pub date: String,
    pub time: String,
    pub driver: Driver,
    pub origin: String,
    pub destination: String,

    #[serde(default)]
    pub passenger: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub share_link: String,

    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,

    /// Set once the record is confirmed written to the remote store.
    pub synced: bool,

    #[serde(default)]
    pub source: SourceTag,
}

impl Trip {
    /// A trip about to be written to the remote store. The identifier is left empty for the
    /// remote to assign.
    pub fn draft(input: &TripInput, created_at: Option<OffsetDateTime>) -> Self {
        Self {
            id: TripId::new(),
            date: input.date.trim().to_string(),
            time: input.time.trim().to_string(),
            driver: Driver::from(input.driver.as_str()),
            origin: input.origin.trim().to_string(),
            destination: input.destination.trim().to_string(),
            passenger: non_empty(input.passenger.as_deref()),
            notes: non_empty(input.notes.as_deref()),
            share_link: share_link(input),
            created_at,
            synced: false,
            source: SourceTag::Remote,
        }
    }

    /// Builds the queued form of a trip that couldn't be written remotely.
    pub fn local(id: TripId, input: &TripInput, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            source: SourceTag::Local,
            ..Self::draft(input, Some(created_at))
        }
    }

    pub fn is_pending(&self) -> bool {
        self.source == SourceTag::Local && !self.synced
    }

    /// The instant used to order listings, newest first. Falls back to midnight of the trip date
    /// when the creation time is unknown.
    pub fn sort_timestamp(&self) -> Option<OffsetDateTime> {
        if self.created_at.is_some() {
            return self.created_at;
        }

        let iso = format_description!("[year]-[month]-[day]");
        Date::parse(self.date.trim(), iso)
            .ok()
            .map(|date| date.midnight().assume_utc())
    }
}

/// Orders trips newest first. Records that are still pending sort ahead of everything else
/// carrying the same timestamp, and records without any usable timestamp sort last.
pub fn newest_first(a: &Trip, b: &Trip) -> Ordering {
    b.sort_timestamp()
        .cmp(&a.sort_timestamp())
        .then_with(|| b.is_pending().cmp(&a.is_pending()))
}

/// The fields collected by a trip form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TripInput {
    pub date: String,
    pub time: String,
    pub driver: String,
    pub origin: String,
    pub destination: String,

    #[serde(default)]
    pub passenger: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl TripInput {
    /// Checks the required fields in form order and reports the first missing one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("date", &self.date),
            ("time", &self.time),
            ("driver", &self.driver),
            ("origin", &self.origin),
            ("destination", &self.destination),
        ];

        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(ValidationError::MissingField(*field)),
            None => Ok(()),
        }
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required field '{0}' is missing")]
    MissingField(&'static str),
}

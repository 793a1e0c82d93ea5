//! Parcel domain model.
//!
//! # Responsibility
//! - Define the parcel record and its status lifecycle.
//! - Own the string mapping used by the `parcel.status` column.
//!
//! # Invariants
//! - `number` is assigned by storage and never changes afterwards.
//! - Lifecycle order is `registered -> sent -> delivered`; forward-only
//!   movement is enforced only by `ParcelService::next_status`, the store
//!   writes any status it is given.
//! - `address` may only change while status is `registered`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage-assigned parcel identifier.
pub type ParcelNumber = i64;

/// Opaque client identifier. Not enforced as a foreign key in this layer.
pub type ClientId = i64;

/// Number carried by a parcel that has not been stored yet.
pub const UNASSIGNED_NUMBER: ParcelNumber = 0;

/// Delivery lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Accepted but not shipped. Address edits and deletion are allowed.
    Registered,
    /// Handed over to the carrier.
    Sent,
    /// Received by the client.
    Delivered,
}

impl ParcelStatus {
    /// Returns the value persisted in `parcel.status`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
        }
    }

    /// Returns the following lifecycle state, or `None` once delivered.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Registered => Some(Self::Sent),
            Self::Sent => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }
}

impl Display for ParcelStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseParcelStatusError(pub String);

impl Display for ParseParcelStatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown parcel status `{}`; expected registered|sent|delivered",
            self.0
        )
    }
}

impl Error for ParseParcelStatusError {}

impl FromStr for ParcelStatus {
    type Err = ParseParcelStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "registered" => Ok(Self::Registered),
            "sent" => Ok(Self::Sent),
            "delivered" => Ok(Self::Delivered),
            other => Err(ParseParcelStatusError(other.to_string())),
        }
    }
}

/// Canonical parcel record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// Storage-assigned identity. `UNASSIGNED_NUMBER` before insertion.
    pub number: ParcelNumber,
    pub client: ClientId,
    pub status: ParcelStatus,
    /// Free-text delivery address.
    pub address: String,
    /// Creation timestamp, stored verbatim.
    pub created_at: String,
}

impl Parcel {
    /// Creates an unsaved parcel in `registered` status.
    pub fn new(
        client: ClientId,
        address: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            number: UNASSIGNED_NUMBER,
            client,
            status: ParcelStatus::Registered,
            address: address.into(),
            created_at: created_at.into(),
        }
    }

    /// Returns whether address edits and deletion are currently allowed.
    pub fn is_mutable(&self) -> bool {
        self.status == ParcelStatus::Registered
    }
}

#[cfg(test)]
mod tests {
    use super::ParcelStatus;

    #[test]
    fn status_strings_parse_back() {
        for status in [
            ParcelStatus::Registered,
            ParcelStatus::Sent,
            ParcelStatus::Delivered,
        ] {
            assert_eq!(status.as_str().parse::<ParcelStatus>(), Ok(status));
        }
    }

    #[test]
    fn status_parsing_is_case_sensitive() {
        let err = "Registered".parse::<ParcelStatus>().unwrap_err();
        assert_eq!(err.0, "Registered");
    }
}

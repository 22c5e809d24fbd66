//! Parcel entity model
//!
//! A parcel moves through three statuses, in order:
//! - `Registered`: accepted, address may still change
//! - `Sent`: handed to the carrier
//! - `Delivered`: terminal

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Lifecycle status of a parcel.
///
/// Stored as its lowercase name in the `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParcelStatus {
    Registered,
    Sent,
    Delivered,
}

impl ParcelStatus {
    /// Get the string representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            ParcelStatus::Registered => "registered",
            ParcelStatus::Sent => "sent",
            ParcelStatus::Delivered => "delivered",
        }
    }

    /// Get all statuses in lifecycle order
    pub fn all() -> &'static [ParcelStatus] {
        &[
            ParcelStatus::Registered,
            ParcelStatus::Sent,
            ParcelStatus::Delivered,
        ]
    }

    /// The status that follows this one, `None` once delivered
    pub fn next(&self) -> Option<ParcelStatus> {
        match self {
            ParcelStatus::Registered => Some(ParcelStatus::Sent),
            ParcelStatus::Sent => Some(ParcelStatus::Delivered),
            ParcelStatus::Delivered => None,
        }
    }

    /// Decode a value read from the `status` column. Only the exact lowercase
    /// names are accepted; `FromStr` is the lenient parser for user input.
    pub fn from_db(s: &str) -> Result<Self> {
        ParcelStatus::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::InvalidStatus(s.to_string()))
    }
}

impl FromStr for ParcelStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "registered" => Ok(ParcelStatus::Registered),
            "sent" => Ok(ParcelStatus::Sent),
            "delivered" => Ok(ParcelStatus::Delivered),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parcel record as stored in the `parcel` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// Identifier assigned by the database; 0 until stored
    pub number: i64,
    /// Owning client id
    pub client: i64,
    pub status: ParcelStatus,
    /// Delivery address
    pub address: String,
    /// RFC 3339 UTC creation time, e.g. `2023-06-01T12:00:00Z`
    pub created_at: String,
}

impl Parcel {
    /// Create a registered parcel stamped with the current time
    pub fn new(client: i64, address: impl Into<String>) -> Result<Self> {
        Ok(Self {
            number: 0,
            client,
            status: ParcelStatus::Registered,
            address: address.into(),
            created_at: timestamp_now()?,
        })
    }

    /// Set the status
    pub fn with_status(mut self, status: ParcelStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the creation timestamp
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }
}

/// Current UTC time as an RFC 3339 string with whole seconds.
pub fn timestamp_now() -> Result<String> {
    let now = OffsetDateTime::now_utc()
        .replace_nanosecond(0)
        .map_err(|e| Error::Timestamp(e.to_string()))?;
    now.format(&Rfc3339)
        .map_err(|e| Error::Timestamp(e.to_string()))
}

//! # Parcelstore - SQLite persistence for parcel records
//!
//! Parcelstore provides:
//! - A `Parcel` record and the closed set of parcel statuses
//! - A `ParcelStore` that runs CRUD statements over an injected SQLite connection
//! - A `ParcelService` holding the registration and status rules
//! - TOML configuration and terminal output helpers for the CLI

pub mod parcel;
pub mod storage;
pub mod service;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use parcel::{Parcel, ParcelStatus};
pub use storage::ParcelStore;
pub use service::ParcelService;

/// Result type alias for parcel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for parcel operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Parcel not found: {0}")]
    ParcelNotFound(i64),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Parcel {number} is {status}, only registered parcels can be changed")]
    NotRegistered { number: i64, status: ParcelStatus },

    #[error("Parcel {0} is already delivered")]
    AlreadyDelivered(i64),

    #[error("Address must not be empty")]
    InvalidAddress,

    #[error("Timestamp error: {0}")]
    Timestamp(String),
}

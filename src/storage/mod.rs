//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite table:
//! - parcel(number, client, status, address, created_at)
//!
//! The store borrows a connection opened by the caller. Creating the table is
//! the caller's job too, see [`schema::initialize_schema`].

pub mod schema;
pub mod sqlite;

pub use sqlite::ParcelStore;

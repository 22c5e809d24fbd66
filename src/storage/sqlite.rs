//! SQLite storage implementation

use rusqlite::{Connection, OptionalExtension, params};
use crate::{Error, Result};
use crate::parcel::{Parcel, ParcelStatus};

const SELECT_PARCEL: &str = "SELECT number, client, status, address, created_at FROM parcel";

/// CRUD access to the `parcel` table over a borrowed connection.
///
/// The store never opens, closes or migrates the database. Every method runs
/// exactly one statement, so there is nothing to roll back on failure.
pub struct ParcelStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> ParcelStore<'conn> {
    /// Wrap an already-open connection whose schema is in place
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Insert a parcel and return the number assigned by the database.
    ///
    /// `parcel.number` is ignored.
    pub fn add(&self, parcel: &Parcel) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO parcel (client, status, address, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                parcel.client,
                parcel.status.as_str(),
                parcel.address,
                parcel.created_at,
            ],
        )?;
        let number = self.conn.last_insert_rowid();
        tracing::debug!(number, client = parcel.client, "inserted parcel");
        Ok(number)
    }

    /// Get a parcel by number
    pub fn get(&self, number: i64) -> Result<Parcel> {
        self.conn
            .query_row(
                &format!("{SELECT_PARCEL} WHERE number = ?1"),
                [number],
                |row| self.row_to_parcel(row),
            )
            .optional()?
            .ok_or(Error::ParcelNotFound(number))
    }

    /// Get every parcel of a client, ordered by number
    pub fn get_by_client(&self, client: i64) -> Result<Vec<Parcel>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_PARCEL} WHERE client = ?1 ORDER BY number"
        ))?;

        let parcels = stmt
            .query_map([client], |row| self.row_to_parcel(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(client, count = parcels.len(), "loaded client parcels");
        Ok(parcels)
    }

    /// Overwrite the address of a parcel.
    ///
    /// Fails with [`Error::ParcelNotFound`] when no row has this number.
    pub fn set_address(&self, number: i64, address: &str) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE parcel SET address = ?1 WHERE number = ?2",
            params![address, number],
        )?;
        self.expect_one_row(number, changed)
    }

    /// Overwrite the status of a parcel. Transitions are not checked here.
    ///
    /// Fails with [`Error::ParcelNotFound`] when no row has this number.
    pub fn set_status(&self, number: i64, status: ParcelStatus) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE parcel SET status = ?1 WHERE number = ?2",
            params![status.as_str(), number],
        )?;
        self.expect_one_row(number, changed)
    }

    /// Delete a parcel permanently.
    ///
    /// Fails with [`Error::ParcelNotFound`] when no row has this number.
    pub fn delete(&self, number: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM parcel WHERE number = ?1", [number])?;
        self.expect_one_row(number, changed)
    }

    /// Overwrite the address only if the parcel currently has `expected`
    /// status. Returns whether a row was changed; `false` covers both a
    /// missing parcel and one in another status.
    pub fn set_address_when(&self, number: i64, address: &str, expected: ParcelStatus) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE parcel SET address = ?1 WHERE number = ?2 AND status = ?3",
            params![address, number, expected.as_str()],
        )?;
        tracing::debug!(number, changed, expected = %expected, "conditional address update");
        Ok(changed > 0)
    }

    /// Delete the parcel only if it currently has `expected` status.
    /// Returns whether a row was removed.
    pub fn delete_when(&self, number: i64, expected: ParcelStatus) -> Result<bool> {
        let changed = self.conn.execute(
            "DELETE FROM parcel WHERE number = ?1 AND status = ?2",
            params![number, expected.as_str()],
        )?;
        tracing::debug!(number, changed, expected = %expected, "conditional delete");
        Ok(changed > 0)
    }

    fn expect_one_row(&self, number: i64, changed: usize) -> Result<()> {
        tracing::debug!(number, changed, "parcel statement done");
        if changed == 0 {
            return Err(Error::ParcelNotFound(number));
        }
        Ok(())
    }

    /// Helper to convert a row to a Parcel
    fn row_to_parcel(&self, row: &rusqlite::Row) -> rusqlite::Result<Parcel> {
        let status_str: String = row.get(2)?;

        let status = ParcelStatus::from_db(&status_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Parcel {
            number: row.get(0)?,
            client: row.get(1)?,
            status,
            address: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

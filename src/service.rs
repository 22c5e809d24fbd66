//! Parcel service - registration and status rules on top of the store
//!
//! The store writes whatever it is given. The service is where a parcel's
//! lifecycle is respected: addresses change and parcels are removed only while
//! `registered`, and status only moves forward.

use rusqlite::Connection;
use crate::{Error, Result};
use crate::parcel::{Parcel, ParcelStatus};
use crate::storage::ParcelStore;

pub struct ParcelService<'conn> {
    store: ParcelStore<'conn>,
}

impl<'conn> ParcelService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            store: ParcelStore::new(conn),
        }
    }

    /// Access the underlying store
    pub fn store(&self) -> &ParcelStore<'conn> {
        &self.store
    }

    /// Register a new parcel for `client`, returning it with its number set
    pub fn register(&self, client: i64, address: &str) -> Result<Parcel> {
        validate_address(address)?;
        let mut parcel = Parcel::new(client, address)?;
        parcel.number = self.store.add(&parcel)?;

        tracing::info!(
            number = parcel.number,
            client,
            address,
            created_at = %parcel.created_at,
            "registered parcel"
        );
        Ok(parcel)
    }

    pub fn get(&self, number: i64) -> Result<Parcel> {
        self.store.get(number)
    }

    pub fn client_parcels(&self, client: i64) -> Result<Vec<Parcel>> {
        self.store.get_by_client(client)
    }

    /// Move a parcel to the next status and return it
    pub fn next_status(&self, number: i64) -> Result<ParcelStatus> {
        let parcel = self.store.get(number)?;
        let next = parcel
            .status
            .next()
            .ok_or(Error::AlreadyDelivered(number))?;

        self.store.set_status(number, next)?;
        tracing::info!(number, from = %parcel.status, to = %next, "advanced parcel status");
        Ok(next)
    }

    /// Change the delivery address of a registered parcel.
    ///
    /// The status check and the update are one statement, so a parcel sent
    /// concurrently is never re-addressed.
    pub fn change_address(&self, number: i64, address: &str) -> Result<()> {
        validate_address(address)?;

        if !self.store.set_address_when(number, address, ParcelStatus::Registered)? {
            return Err(self.not_registered(number));
        }
        tracing::info!(number, address, "changed parcel address");
        Ok(())
    }

    /// Delete a registered parcel, in a single conditional statement
    pub fn remove(&self, number: i64) -> Result<()> {
        if !self.store.delete_when(number, ParcelStatus::Registered)? {
            return Err(self.not_registered(number));
        }
        tracing::info!(number, "removed parcel");
        Ok(())
    }

    /// Explain why a registered-only write matched no row
    fn not_registered(&self, number: i64) -> Error {
        match self.store.get(number) {
            Ok(parcel) => Error::NotRegistered {
                number,
                status: parcel.status,
            },
            Err(e) => e,
        }
    }
}

fn validate_address(address: &str) -> Result<()> {
    if address.trim().is_empty() {
        return Err(Error::InvalidAddress);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema;

    fn open() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::initialize_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_register() {
        let conn = open();
        let service = ParcelService::new(&conn);

        let parcel = service.register(5, "Main St 1").unwrap();
        assert_ne!(parcel.number, 0);
        assert_eq!(service.get(parcel.number).unwrap(), parcel);
    }

    #[test]
    fn test_register_rejects_blank_address() {
        let conn = open();
        let service = ParcelService::new(&conn);

        assert!(matches!(service.register(5, "  "), Err(Error::InvalidAddress)));
        assert!(service.client_parcels(5).unwrap().is_empty());
    }

    #[test]
    fn test_next_status_walks_lifecycle() {
        let conn = open();
        let service = ParcelService::new(&conn);
        let number = service.register(5, "Main St 1").unwrap().number;

        assert_eq!(service.next_status(number).unwrap(), ParcelStatus::Sent);
        assert_eq!(service.next_status(number).unwrap(), ParcelStatus::Delivered);
        assert!(matches!(
            service.next_status(number),
            Err(Error::AlreadyDelivered(n)) if n == number
        ));
        assert_eq!(service.get(number).unwrap().status, ParcelStatus::Delivered);
    }

    #[test]
    fn test_change_address_only_while_registered() {
        let conn = open();
        let service = ParcelService::new(&conn);
        let number = service.register(5, "Main St 1").unwrap().number;

        service.change_address(number, "Main St 2").unwrap();
        assert_eq!(service.get(number).unwrap().address, "Main St 2");

        service.next_status(number).unwrap();
        assert!(matches!(
            service.change_address(number, "Main St 3"),
            Err(Error::NotRegistered { status: ParcelStatus::Sent, .. })
        ));
        assert_eq!(service.get(number).unwrap().address, "Main St 2");
    }

    #[test]
    fn test_remove_only_while_registered() {
        let conn = open();
        let service = ParcelService::new(&conn);
        let kept = service.register(5, "Main St 1").unwrap().number;
        let dropped = service.register(5, "Main St 2").unwrap().number;

        service.next_status(kept).unwrap();
        assert!(matches!(service.remove(kept), Err(Error::NotRegistered { .. })));

        service.remove(dropped).unwrap();
        let remaining: Vec<i64> = service
            .client_parcels(5)
            .unwrap()
            .iter()
            .map(|p| p.number)
            .collect();
        assert_eq!(remaining, vec![kept]);
    }

    #[test]
    fn test_writes_after_concurrent_advance() {
        let conn = open();
        let service = ParcelService::new(&conn);
        let number = service.register(5, "Main St 1").unwrap().number;

        // another client moves the parcel on through its own store
        let other = ParcelStore::new(&conn);
        other.set_status(number, ParcelStatus::Sent).unwrap();

        assert!(matches!(
            service.change_address(number, "Main St 2"),
            Err(Error::NotRegistered { status: ParcelStatus::Sent, .. })
        ));
        assert!(matches!(service.remove(number), Err(Error::NotRegistered { .. })));
        let parcel = service.get(number).unwrap();
        assert_eq!(parcel.address, "Main St 1");
        assert_eq!(parcel.status, ParcelStatus::Sent);
    }

    #[test]
    fn test_missing_parcel() {
        let conn = open();
        let service = ParcelService::new(&conn);

        assert!(matches!(service.next_status(9), Err(Error::ParcelNotFound(9))));
        assert!(matches!(service.remove(9), Err(Error::ParcelNotFound(9))));
        assert!(matches!(
            service.change_address(9, "Main St 1"),
            Err(Error::ParcelNotFound(9))
        ));
    }
}

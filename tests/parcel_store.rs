//! End-to-end store behaviour against a file-backed database.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use parcelstore::parcel::timestamp_now;
use parcelstore::storage::schema;
use parcelstore::{Error, Parcel, ParcelStatus, ParcelStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rusqlite::Connection;
use tempfile::TempDir;

struct Harness {
    _dir: TempDir,
    conn: Connection,
}

fn setup() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let conn = Connection::open(dir.path().join("parcels.db")).unwrap();
    schema::initialize_schema(&conn).unwrap();
    Harness { _dir: dir, conn }
}

fn seeded_rng() -> StdRng {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos() as u64;
    StdRng::seed_from_u64(seed)
}

fn test_parcel() -> Parcel {
    Parcel {
        number: 0,
        client: 1000,
        status: ParcelStatus::Registered,
        address: "test".to_string(),
        created_at: timestamp_now().unwrap(),
    }
}

#[test]
fn add_get_delete() {
    let h = setup();
    let store = ParcelStore::new(&h.conn);
    let parcel = test_parcel();

    let id = store.add(&parcel).unwrap();
    assert_ne!(id, 0);

    let mut retrieved = store.get(id).unwrap();
    assert_eq!(retrieved.number, id);
    retrieved.number = parcel.number;
    assert_eq!(retrieved, parcel);

    store.delete(id).unwrap();
    assert!(matches!(store.get(id), Err(Error::ParcelNotFound(n)) if n == id));
}

#[test]
fn set_address_keeps_other_fields() {
    let h = setup();
    let store = ParcelStore::new(&h.conn);
    let parcel = test_parcel();
    let id = store.add(&parcel).unwrap();

    store.set_address(id, "new test address").unwrap();

    let retrieved = store.get(id).unwrap();
    assert_eq!(
        retrieved,
        Parcel {
            number: id,
            address: "new test address".to_string(),
            ..parcel
        }
    );
}

#[test]
fn set_status_keeps_other_fields() {
    let h = setup();
    let store = ParcelStore::new(&h.conn);
    let parcel = test_parcel();
    let id = store.add(&parcel).unwrap();

    store.set_status(id, ParcelStatus::Sent).unwrap();

    let retrieved = store.get(id).unwrap();
    assert_eq!(
        retrieved,
        Parcel {
            number: id,
            status: ParcelStatus::Sent,
            ..parcel
        }
    );
}

#[test]
fn get_by_client_returns_exact_subset() {
    let h = setup();
    let store = ParcelStore::new(&h.conn);
    let mut rng = seeded_rng();

    let mut clients: Vec<i64> = Vec::new();
    while clients.len() < 3 {
        let client = rng.random_range(0..10_000_000);
        if !clients.contains(&client) {
            clients.push(client);
        }
    }

    let mut stored = HashMap::new();
    for (i, client) in clients.iter().enumerate() {
        let mut parcel = Parcel {
            number: 0,
            client: *client,
            status: ParcelStatus::Registered,
            address: format!("test address {}", i + 1),
            created_at: timestamp_now().unwrap(),
        };
        parcel.number = store.add(&parcel).unwrap();
        stored.insert(parcel.number, parcel);
    }

    let found = store.get_by_client(clients[0]).unwrap();
    assert_eq!(found.len(), 1);
    for parcel in found {
        let expected = stored.get(&parcel.number).unwrap();
        assert_eq!(&parcel, expected);
    }
}

#[test]
fn stores_share_one_connection() {
    let h = setup();
    let writer = ParcelStore::new(&h.conn);
    let reader = ParcelStore::new(&h.conn);

    let id = writer.add(&test_parcel()).unwrap();
    assert_eq!(reader.get(id).unwrap().address, "test");
}

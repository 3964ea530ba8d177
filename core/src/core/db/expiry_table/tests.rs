use super::*;
use std::time::Duration;
use tempfile::tempdir;

mod common {
    use super::*;
    pub(super) use redb::ReadableDatabase;

    pub(super) const TEST_TABLE: ExpiryTable = ExpiryTable::new("test_expiry");

    pub(super) fn create_test_db() -> (redb::Database, tempfile::TempDir) {
        let temp = tempdir().unwrap();
        let db = redb::Database::create(temp.path().join("test.redb")).unwrap();
        (db, temp)
    }

    pub(super) fn make_key(id: u64, expires_at: SystemTime) -> ExpiryKey {
        ExpiryKey { expires_at, id }
    }
}

mod init {
    use super::common::*;

    #[test]
    fn test_init_creates_table() {
        let (db, _temp) = create_test_db();
        let write_txn = db.begin_write().unwrap();
        TEST_TABLE.init(&write_txn).unwrap();
        write_txn.commit().unwrap();

        let read_txn = db.begin_read().unwrap();
        assert!(TEST_TABLE.all(&read_txn).unwrap().is_empty());
        assert_eq!(TEST_TABLE.len(&read_txn).unwrap(), 0);
    }

    #[test]
    fn test_init_idempotent() {
        let (db, _temp) = create_test_db();

        let write_txn = db.begin_write().unwrap();
        TEST_TABLE.init(&write_txn).unwrap();
        write_txn.commit().unwrap();

        let write_txn = db.begin_write().unwrap();
        TEST_TABLE.init(&write_txn).unwrap();
        write_txn.commit().unwrap();
    }
}

mod insert_remove {
    use super::common::*;
    use super::*;

    #[test]
    fn test_insert_duplicate_is_idempotent() {
        let (db, _temp) = create_test_db();
        let key = make_key(1, SystemTime::now());

        let write_txn = db.begin_write().unwrap();
        TEST_TABLE.init(&write_txn).unwrap();
        TEST_TABLE.insert(&write_txn, &key).unwrap();
        TEST_TABLE.insert(&write_txn, &key).unwrap();
        write_txn.commit().unwrap();

        let read_txn = db.begin_read().unwrap();
        assert_eq!(TEST_TABLE.len(&read_txn).unwrap(), 1);
    }

    #[test]
    fn test_remove_existing_key() {
        let (db, _temp) = create_test_db();
        let key = make_key(1, SystemTime::now());

        let write_txn = db.begin_write().unwrap();
        TEST_TABLE.init(&write_txn).unwrap();
        TEST_TABLE.insert(&write_txn, &key).unwrap();
        write_txn.commit().unwrap();

        let write_txn = db.begin_write().unwrap();
        assert!(TEST_TABLE.remove(&write_txn, &key).unwrap());
        write_txn.commit().unwrap();

        let read_txn = db.begin_read().unwrap();
        assert!(TEST_TABLE.all(&read_txn).unwrap().is_empty());
    }

    #[test]
    fn test_remove_wrong_instant() {
        let (db, _temp) = create_test_db();
        let now = SystemTime::now();

        let write_txn = db.begin_write().unwrap();
        TEST_TABLE.init(&write_txn).unwrap();
        TEST_TABLE.insert(&write_txn, &make_key(1, now)).unwrap();
        write_txn.commit().unwrap();

        let write_txn = db.begin_write().unwrap();
        let removed = TEST_TABLE
            .remove(&write_txn, &make_key(1, now + Duration::from_secs(1)))
            .unwrap();
        write_txn.commit().unwrap();

        assert!(!removed);
        let read_txn = db.begin_read().unwrap();
        assert_eq!(TEST_TABLE.len(&read_txn).unwrap(), 1);
    }
}

mod expired {
    use super::common::*;
    use super::*;

    #[test]
    fn test_nothing_due() {
        let (db, _temp) = create_test_db();
        let now = SystemTime::now();

        let write_txn = db.begin_write().unwrap();
        TEST_TABLE.init(&write_txn).unwrap();
        TEST_TABLE
            .insert(&write_txn, &make_key(1, now + Duration::from_secs(60)))
            .unwrap();
        write_txn.commit().unwrap();

        let read_txn = db.begin_read().unwrap();
        assert!(TEST_TABLE.expired(&read_txn, now).unwrap().is_empty());
    }

    #[test]
    fn test_some_due_in_expiry_order() {
        let (db, _temp) = create_test_db();
        let now = SystemTime::now();

        let write_txn = db.begin_write().unwrap();
        TEST_TABLE.init(&write_txn).unwrap();
        TEST_TABLE
            .insert(&write_txn, &make_key(7, now - Duration::from_secs(10)))
            .unwrap();
        TEST_TABLE
            .insert(&write_txn, &make_key(3, now - Duration::from_secs(100)))
            .unwrap();
        TEST_TABLE
            .insert(&write_txn, &make_key(9, now + Duration::from_secs(100)))
            .unwrap();
        write_txn.commit().unwrap();

        let read_txn = db.begin_read().unwrap();
        let due: Vec<u64> = TEST_TABLE
            .expired(&read_txn, now)
            .unwrap()
            .into_iter()
            .map(|key| key.id)
            .collect();

        assert_eq!(due, vec![3, 7]);
    }

    #[test]
    fn test_boundary_is_expired() {
        let (db, _temp) = create_test_db();
        let now = SystemTime::now();

        let write_txn = db.begin_write().unwrap();
        TEST_TABLE.init(&write_txn).unwrap();
        // expires_at == now counts as expired
        TEST_TABLE.insert(&write_txn, &make_key(1, now)).unwrap();
        TEST_TABLE
            .insert(&write_txn, &make_key(2, now + Duration::from_nanos(1)))
            .unwrap();
        write_txn.commit().unwrap();

        let read_txn = db.begin_read().unwrap();
        let due = TEST_TABLE.expired(&read_txn, now).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, 1);
    }
}

mod common {
    use crate::core::db::{Claim, Store};
    use crate::types::{Config, DeviceToken, IdentityHash, Windows, Word};
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    pub(super) fn create_test_store() -> (Store, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            base_path: temp_dir.path().to_path_buf(),
            windows: Windows::default(),
        };
        let store = Store::open(&config).unwrap();
        (store, temp_dir)
    }

    pub(super) fn epoch() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    pub(super) fn word(s: &str) -> Word {
        Word::try_new(s).unwrap()
    }

    pub(super) fn hash(seed: &str) -> IdentityHash {
        IdentityHash::from_hash(blake3::hash(seed.as_bytes()))
    }

    pub(super) fn token(s: &str) -> DeviceToken {
        DeviceToken::try_new(s).unwrap()
    }

    pub(super) fn claim(w: &str, identity: &str, device: Option<&str>) -> Claim {
        Claim {
            word: word(w),
            identity_hash: hash(identity),
            device_token: device.map(token),
        }
    }
}

mod claim {
    use super::common::{claim, create_test_store, epoch, word};
    use crate::core::db::ClaimOutcome;
    use crate::types::Windows;
    use std::time::Duration;

    #[test]
    fn test_first_claim_creates_record() {
        let (store, _temp) = create_test_store();
        let windows = Windows::default();
        let now = epoch();

        let outcome = store
            .claim(claim("joy", "alice", Some("dev-a")), windows, now)
            .unwrap();

        let ClaimOutcome::Created(record) = outcome else {
            panic!("expected Created, got {outcome:?}");
        };
        assert_eq!(record.word, word("joy"));
        assert_eq!(record.created_at, now);
        assert_eq!(record.updated_at, now);
        assert_eq!(record.expires_at, now + windows.retention);
        assert_eq!(store.get(record.id).unwrap(), Some(record));
    }

    #[test]
    fn test_ids_are_sequential() {
        let (store, _temp) = create_test_store();
        let windows = Windows::default();
        let now = epoch();

        let first = store.claim(claim("joy", "alice", None), windows, now).unwrap();
        let second = store.claim(claim("calm", "bob", None), windows, now).unwrap();

        let (ClaimOutcome::Created(a), ClaimOutcome::Created(b)) = (first, second) else {
            panic!("both claims should create");
        };
        assert_eq!(b.id, a.id + 1);
    }

    #[test]
    fn test_claim_inside_edit_window_updates_in_place() {
        let (store, _temp) = create_test_store();
        let windows = Windows::default();
        let now = epoch();

        let ClaimOutcome::Created(created) = store
            .claim(claim("joy", "alice", None), windows, now)
            .unwrap()
        else {
            panic!("expected Created");
        };

        let later = now + Duration::from_secs(4 * 60);
        let outcome = store
            .claim(claim("calm", "alice", None), windows, later)
            .unwrap();

        let ClaimOutcome::Updated {
            record,
            previous_word,
        } = outcome
        else {
            panic!("expected Updated, got {outcome:?}");
        };
        assert_eq!(previous_word, word("joy"));
        assert_eq!(record.id, created.id);
        assert_eq!(record.word, word("calm"));
        assert_eq!(record.created_at, now);
        assert_eq!(record.updated_at, later);
        assert_eq!(record.expires_at, created.expires_at);
        assert_eq!(store.active_records(later).unwrap().len(), 1);
    }

    #[test]
    fn test_claim_exactly_at_edit_window_still_updates() {
        let (store, _temp) = create_test_store();
        let windows = Windows::default();
        let now = epoch();

        store.claim(claim("joy", "alice", None), windows, now).unwrap();
        let outcome = store
            .claim(claim("calm", "alice", None), windows, now + windows.edit_window)
            .unwrap();

        assert!(matches!(outcome, ClaimOutcome::Updated { .. }));
    }

    #[test]
    fn test_claim_after_edit_window_is_locked() {
        let (store, _temp) = create_test_store();
        let windows = Windows::default();
        let now = epoch();

        store.claim(claim("joy", "alice", None), windows, now).unwrap();
        let later = now + windows.edit_window + Duration::from_millis(1);
        let outcome = store
            .claim(claim("calm", "alice", None), windows, later)
            .unwrap();

        let ClaimOutcome::Locked(existing) = outcome else {
            panic!("expected Locked, got {outcome:?}");
        };
        assert_eq!(existing.word, word("joy"));

        // Nothing was written.
        let active = store.active_records(later).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].word, word("joy"));
        assert_eq!(active[0].updated_at, now);
    }

    #[test]
    fn test_claim_after_expiry_creates_new_record() {
        let (store, _temp) = create_test_store();
        let windows = Windows::default();
        let now = epoch();

        store.claim(claim("joy", "alice", None), windows, now).unwrap();
        let outcome = store
            .claim(claim("calm", "alice", None), windows, now + windows.retention)
            .unwrap();

        assert!(matches!(outcome, ClaimOutcome::Created(_)));
    }

    #[test]
    fn test_device_token_matches_across_identities() {
        let (store, _temp) = create_test_store();
        let windows = Windows::default();
        let now = epoch();

        store
            .claim(claim("joy", "alice-home", Some("dev-a")), windows, now)
            .unwrap();

        // Same device, different network address.
        let outcome = store
            .claim(
                claim("calm", "alice-office", Some("dev-a")),
                windows,
                now + Duration::from_secs(60),
            )
            .unwrap();
        assert!(matches!(outcome, ClaimOutcome::Updated { .. }));

        // The new identity now reaches the record without the token.
        let outcome = store
            .claim(
                claim("hope", "alice-office", None),
                windows,
                now + windows.edit_window + Duration::from_secs(1),
            )
            .unwrap();
        let ClaimOutcome::Locked(existing) = outcome else {
            panic!("expected Locked, got {outcome:?}");
        };
        assert_eq!(existing.word, word("calm"));
    }

    #[test]
    fn test_identity_matches_without_device_token() {
        let (store, _temp) = create_test_store();
        let windows = Windows::default();
        let now = epoch();

        store.claim(claim("joy", "alice", None), windows, now).unwrap();
        let outcome = store
            .claim(claim("calm", "alice", Some("dev-a")), windows, now)
            .unwrap();

        let ClaimOutcome::Updated { record, .. } = outcome else {
            panic!("expected Updated, got {outcome:?}");
        };
        assert_eq!(record.device_token.map(|t| t.into_inner()), Some("dev-a".to_string()));
    }

    #[test]
    fn test_different_identities_do_not_collide() {
        let (store, _temp) = create_test_store();
        let windows = Windows::default();
        let now = epoch();

        store.claim(claim("joy", "alice", Some("dev-a")), windows, now).unwrap();
        let outcome = store
            .claim(claim("joy", "bob", Some("dev-b")), windows, now)
            .unwrap();

        assert!(matches!(outcome, ClaimOutcome::Created(_)));
        assert_eq!(store.active_records(now).unwrap().len(), 2);
    }
}

mod reads {
    use super::common::{claim, create_test_store, epoch, hash, token, word};
    use crate::types::Windows;
    use std::time::Duration;

    #[test]
    fn test_active_records_excludes_expired() {
        let (store, _temp) = create_test_store();
        let windows = Windows::default();
        let now = epoch();

        store.claim(claim("joy", "alice", None), windows, now).unwrap();
        store
            .claim(claim("calm", "bob", None), windows, now + Duration::from_secs(3600))
            .unwrap();

        let at_expiry = now + windows.retention;
        let active = store.active_records(at_expiry).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].word, word("calm"));

        // Not purged yet, still retrievable by id.
        assert_eq!(store.active_records(now).unwrap().len(), 2);
    }

    #[test]
    fn test_latest_active_for_by_either_key() {
        let (store, _temp) = create_test_store();
        let windows = Windows::default();
        let now = epoch();

        store.claim(claim("joy", "alice", Some("dev-a")), windows, now).unwrap();

        let by_identity = store
            .latest_active_for(Some(&hash("alice")), None, now)
            .unwrap()
            .unwrap();
        let by_device = store
            .latest_active_for(None, Some(&token("dev-a")), now)
            .unwrap()
            .unwrap();
        assert_eq!(by_identity, by_device);

        assert!(
            store
                .latest_active_for(Some(&hash("bob")), Some(&token("dev-b")), now)
                .unwrap()
                .is_none()
        );
        assert!(store.latest_active_for(None, None, now).unwrap().is_none());
    }

    #[test]
    fn test_latest_active_for_picks_newest_of_two() {
        let (store, _temp) = create_test_store();
        let windows = Windows::default();
        let now = epoch();

        store.claim(claim("joy", "alice", None), windows, now).unwrap();
        store
            .claim(
                claim("calm", "alice-office", Some("dev-a")),
                windows,
                now + Duration::from_secs(60),
            )
            .unwrap();

        let latest = store
            .latest_active_for(Some(&hash("alice")), Some(&token("dev-a")), now + Duration::from_secs(61))
            .unwrap()
            .unwrap();
        assert_eq!(latest.word, word("calm"));
    }

    #[test]
    fn test_latest_active_for_ignores_expired() {
        let (store, _temp) = create_test_store();
        let windows = Windows::default();
        let now = epoch();

        store.claim(claim("joy", "alice", None), windows, now).unwrap();
        let found = store
            .latest_active_for(Some(&hash("alice")), None, now + windows.retention)
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_get_nonexistent() {
        let (store, _temp) = create_test_store();
        assert!(store.get(42).unwrap().is_none());
    }
}

mod unknown_words {
    use super::common::{create_test_store, word};

    #[test]
    fn test_record_unknown_word_counts_sightings() {
        let (store, _temp) = create_test_store();

        assert_eq!(store.record_unknown_word(&word("meh")).unwrap(), 1);
        assert_eq!(store.record_unknown_word(&word("meh")).unwrap(), 2);
        assert_eq!(store.record_unknown_word(&word("blah")).unwrap(), 1);

        let words = store.unknown_words().unwrap();
        assert_eq!(
            words,
            vec![("meh".to_string(), 2), ("blah".to_string(), 1)]
        );
    }

    #[test]
    fn test_unknown_words_empty() {
        let (store, _temp) = create_test_store();
        assert!(store.unknown_words().unwrap().is_empty());
    }
}

mod maintenance {
    use super::common::{claim, create_test_store, epoch, hash, token};
    use crate::core::db::ClaimOutcome;
    use crate::types::Windows;
    use std::time::Duration;

    #[test]
    fn test_purge_expired_removes_record_and_indexes() {
        let (store, _temp) = create_test_store();
        let windows = Windows::default();
        let now = epoch();

        let ClaimOutcome::Created(old) = store
            .claim(claim("joy", "alice", Some("dev-a")), windows, now)
            .unwrap()
        else {
            panic!("expected Created");
        };
        let ClaimOutcome::Created(young) = store
            .claim(
                claim("calm", "bob", Some("dev-b")),
                windows,
                now + Duration::from_secs(3600),
            )
            .unwrap()
        else {
            panic!("expected Created");
        };

        let at_expiry = now + windows.retention;
        let purged = store.purge_expired(at_expiry).unwrap();
        assert_eq!(purged, vec![old.id]);

        assert!(store.get(old.id).unwrap().is_none());
        assert!(store.get(young.id).unwrap().is_some());

        // Index entries are gone: looking up with an earlier clock finds nothing.
        assert!(
            store
                .latest_active_for(Some(&hash("alice")), Some(&token("dev-a")), now)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_purge_keeps_index_repointed_at_newer_record() {
        let (store, _temp) = create_test_store();
        let windows = Windows::default();
        let now = epoch();

        store.claim(claim("joy", "alice", Some("dev-a")), windows, now).unwrap();
        let later = now + windows.retention;
        let ClaimOutcome::Created(fresh) = store
            .claim(claim("calm", "alice", Some("dev-a")), windows, later)
            .unwrap()
        else {
            panic!("expected Created");
        };

        store.purge_expired(later).unwrap();

        let found = store
            .latest_active_for(Some(&hash("alice")), Some(&token("dev-a")), later)
            .unwrap();
        assert_eq!(found, Some(fresh));
    }

    #[test]
    fn test_purge_drops_keys_added_by_edits() {
        let (store, _temp) = create_test_store();
        let windows = Windows::default();
        let now = epoch();

        store.claim(claim("joy", "alice", Some("dev-a")), windows, now).unwrap();
        // Same device from a new address, then same address with a new device.
        let ClaimOutcome::Updated { .. } = store
            .claim(
                claim("calm", "alice-2", Some("dev-a")),
                windows,
                now + Duration::from_secs(60),
            )
            .unwrap()
        else {
            panic!("expected Updated");
        };
        let ClaimOutcome::Updated { record, .. } = store
            .claim(
                claim("sad", "alice", Some("dev-new")),
                windows,
                now + Duration::from_secs(120),
            )
            .unwrap()
        else {
            panic!("expected Updated");
        };
        assert_eq!(store.index_sizes().unwrap(), (2, 2));

        let found = store
            .latest_active_for(Some(&hash("alice-2")), Some(&token("dev-new")), now)
            .unwrap();
        assert_eq!(found.map(|r| r.id), Some(record.id));

        store.purge_expired(now + windows.retention).unwrap();
        assert_eq!(store.index_sizes().unwrap(), (0, 0));
    }

    #[test]
    fn test_purge_nothing_due() {
        let (store, _temp) = create_test_store();
        let windows = Windows::default();
        let now = epoch();

        store.claim(claim("joy", "alice", None), windows, now).unwrap();
        assert!(store.purge_expired(now).unwrap().is_empty());
        assert_eq!(store.active_records(now).unwrap().len(), 1);
    }

    #[test]
    fn test_should_run_maintenance() {
        let (store, _temp) = create_test_store();
        let interval = Duration::from_secs(300);
        let now = epoch();

        assert!(store.should_run_maintenance(now, interval));

        store.purge_expired(now).unwrap();
        assert!(!store.should_run_maintenance(now + Duration::from_secs(299), interval));
        assert!(store.should_run_maintenance(now + interval, interval));
    }

    #[test]
    fn test_should_run_maintenance_clock_backwards() {
        let (store, _temp) = create_test_store();
        let interval = Duration::from_secs(300);
        let now = epoch();

        store.purge_expired(now).unwrap();
        assert!(store.should_run_maintenance(now - Duration::from_secs(1), interval));
    }
}

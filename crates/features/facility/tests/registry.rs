use freg_event_bus::{EventBus, EventReceiverExt};
use freg_facility::store::{FacilityStore, LedgerStore, MemoryStore};
use freg_facility::{Facility, FacilityDetails, FacilityError, FacilityEvent, FacilityRegistry};
use freg_kernel::clock::{Clock, FixedClock};
use freg_kernel::context::CallContext;
use freg_kernel::domain::Principal;
use freg_storage::Compression;
use std::time::Duration;

const OWNER: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";
const STRANGER: &str = "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG";

fn principal(raw: &str) -> Principal {
    Principal::parse(raw).unwrap()
}

fn ctx(caller: &str) -> CallContext {
    CallContext::new(principal(caller), 1_234_567_890)
}

fn sample() -> FacilityDetails {
    FacilityDetails::new("Test Facility", "123 Test St", "John Doe", "555-1234")
}

fn memory_registry() -> FacilityRegistry<MemoryStore> {
    FacilityRegistry::new(MemoryStore::new(), EventBus::new())
}

#[tokio::test]
async fn register_then_read_back() {
    let registry = memory_registry();

    let id = registry.register_facility(&ctx(OWNER), sample()).await.unwrap();
    assert_eq!(id, 1);

    let facility = registry.get_facility(1).await.unwrap();
    assert_eq!(facility.name, "Test Facility");
    assert_eq!(facility.address, "123 Test St");
    assert_eq!(facility.contact_name, "John Doe");
    assert_eq!(facility.contact_phone, "555-1234");
    assert_eq!(facility.registration_date, 1_234_567_890);
    assert!(facility.active);
    assert_eq!(facility.owner.as_str(), OWNER);

    assert!(registry.is_facility_owner(1, &principal(OWNER)).await.unwrap());
    assert!(!registry.is_facility_owner(1, &principal(STRANGER)).await.unwrap());
}

#[tokio::test]
async fn ids_are_sequential_and_counted() {
    let registry = memory_registry();
    assert_eq!(registry.facility_count().await.unwrap(), 0);

    for expected in 1..=3 {
        let id = registry.register_facility(&ctx(OWNER), sample()).await.unwrap();
        assert_eq!(id, expected);
        assert_eq!(registry.facility_count().await.unwrap(), expected);
    }
}

#[tokio::test]
async fn rejected_registration_consumes_no_id() {
    let registry = memory_registry();
    let blank = FacilityDetails::new("  ", "", "", "");

    let err = registry.register_facility(&ctx(OWNER), blank).await.unwrap_err();
    assert!(matches!(err, FacilityError::Validation { .. }));
    assert_eq!(registry.facility_count().await.unwrap(), 0);

    assert_eq!(registry.register_facility(&ctx(OWNER), sample()).await.unwrap(), 1);
}

#[tokio::test]
async fn clock_stamps_registration_date() {
    let registry = memory_registry();
    let clock = FixedClock::new(100);
    clock.advance(50);

    let call = CallContext::at(principal(OWNER), &clock);
    let id = registry.register_facility(&call, sample()).await.unwrap();
    assert_eq!(clock.now(), 150);
    assert_eq!(registry.get_facility(id).await.unwrap().registration_date, 150);
}

#[tokio::test]
async fn owner_updates_details() {
    let registry = memory_registry();
    let id = registry.register_facility(&ctx(OWNER), sample()).await.unwrap();

    let later = CallContext::new(principal(OWNER), 1_300_000_000);
    let changed = FacilityDetails::new("Updated Facility", "456 Main St", "Jane Roe", "555-9876");
    registry.update_facility(&later, id, changed.clone()).await.unwrap();

    let facility = registry.get_facility(id).await.unwrap();
    assert_eq!(facility.details(), changed);
    assert_eq!(facility.registration_date, 1_234_567_890);
    assert_eq!(facility.owner.as_str(), OWNER);
}

#[tokio::test]
async fn stranger_cannot_touch_a_facility() {
    let registry = memory_registry();
    let id = registry.register_facility(&ctx(OWNER), sample()).await.unwrap();
    let before = registry.get_facility(id).await.unwrap();

    let changed = FacilityDetails::new("Hijacked", "", "", "");
    let err = registry.update_facility(&ctx(STRANGER), id, changed).await.unwrap_err();
    assert!(matches!(err, FacilityError::Unauthorized { .. }));

    let err = registry.deactivate_facility(&ctx(STRANGER), id).await.unwrap_err();
    assert!(matches!(err, FacilityError::Unauthorized { .. }));

    assert_eq!(registry.get_facility(id).await.unwrap(), before);
}

#[tokio::test]
async fn missing_facility_wins_over_authorization() {
    let registry = memory_registry();
    registry.register_facility(&ctx(OWNER), sample()).await.unwrap();

    let err = registry.update_facility(&ctx(STRANGER), 99, sample()).await.unwrap_err();
    assert_eq!(err.kind(), "not_found");
    let err = registry.reactivate_facility(&ctx(STRANGER), 99).await.unwrap_err();
    assert_eq!(err.kind(), "not_found");
    let err = registry.is_facility_owner(99, &principal(OWNER)).await.unwrap_err();
    assert_eq!(err.kind(), "not_found");
    assert_eq!(registry.get_facility(0).await.unwrap_err().kind(), "not_found");
}

#[tokio::test]
async fn invalid_update_leaves_record_unchanged() {
    let registry = memory_registry();
    let id = registry.register_facility(&ctx(OWNER), sample()).await.unwrap();

    let too_long = FacilityDetails::new("x".repeat(101), "", "", "");
    let err = registry.update_facility(&ctx(OWNER), id, too_long).await.unwrap_err();
    assert!(matches!(err, FacilityError::Validation { .. }));
    assert_eq!(registry.get_facility(id).await.unwrap().details(), sample());
}

#[tokio::test]
async fn deactivate_and_reactivate() {
    let registry = memory_registry();
    let id = registry.register_facility(&ctx(OWNER), sample()).await.unwrap();

    registry.deactivate_facility(&ctx(OWNER), id).await.unwrap();
    assert!(!registry.get_facility(id).await.unwrap().active);

    // Inactive facilities stay readable and counted.
    assert_eq!(registry.facility_count().await.unwrap(), 1);
    assert!(registry.is_facility_owner(id, &principal(OWNER)).await.unwrap());

    registry.reactivate_facility(&ctx(OWNER), id).await.unwrap();
    assert!(registry.get_facility(id).await.unwrap().active);
}

#[tokio::test]
async fn inactive_facility_can_still_be_updated() {
    let registry = memory_registry();
    let id = registry.register_facility(&ctx(OWNER), sample()).await.unwrap();
    registry.deactivate_facility(&ctx(OWNER), id).await.unwrap();

    let changed = FacilityDetails::new("Closed Depot", "", "", "");
    registry.update_facility(&ctx(OWNER), id, changed).await.unwrap();

    let facility = registry.get_facility(id).await.unwrap();
    assert_eq!(facility.name, "Closed Depot");
    assert!(!facility.active);
}

#[tokio::test]
async fn events_follow_state_changes() {
    let events = EventBus::new();
    let mut rx = events.subscribe::<FacilityEvent>().unwrap();
    let registry = FacilityRegistry::new(MemoryStore::new(), events);

    let id = registry.register_facility(&ctx(OWNER), sample()).await.unwrap();
    registry.update_facility(&ctx(OWNER), id, sample()).await.unwrap();
    registry.deactivate_facility(&ctx(OWNER), id).await.unwrap();
    registry.deactivate_facility(&ctx(OWNER), id).await.unwrap();
    registry.reactivate_facility(&ctx(OWNER), id).await.unwrap();
    registry.reactivate_facility(&ctx(OWNER), id).await.unwrap();
    let _ = registry.update_facility(&ctx(STRANGER), id, sample()).await;

    let expected = [
        FacilityEvent::Registered { id, owner: principal(OWNER) },
        FacilityEvent::Updated { id },
        FacilityEvent::Deactivated { id },
        FacilityEvent::Reactivated { id },
    ];
    for event in expected {
        assert_eq!(*rx.next_event().await.unwrap(), event);
    }

    let extra = tokio::time::timeout(Duration::from_millis(50), rx.next_event()).await;
    assert!(extra.is_err(), "no-op toggles and rejected calls must not publish");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_get_distinct_ids() {
    let registry = memory_registry();

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move { registry.register_facility(&ctx(OWNER), sample()).await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap());
    }
    ids.sort_unstable();

    assert_eq!(ids, (1..=32).collect::<Vec<_>>());
    assert_eq!(registry.store().len(), 32);
    assert_eq!(registry.facility_count().await.unwrap(), 32);
}

#[tokio::test]
async fn ledger_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();

    {
        let store = LedgerStore::open(tmp.path(), Compression::Lz4).await.unwrap();
        let registry = FacilityRegistry::new(store, EventBus::new());
        registry.register_facility(&ctx(OWNER), sample()).await.unwrap();
        let id = registry.register_facility(&ctx(OWNER), sample()).await.unwrap();
        registry.deactivate_facility(&ctx(OWNER), id).await.unwrap();
    }

    let store = LedgerStore::open(tmp.path(), Compression::Lz4).await.unwrap();
    let registry = FacilityRegistry::new(store, EventBus::new());

    assert_eq!(registry.facility_count().await.unwrap(), 2);
    assert!(registry.get_facility(1).await.unwrap().active);
    assert!(!registry.get_facility(2).await.unwrap().active);
    assert_eq!(registry.register_facility(&ctx(STRANGER), sample()).await.unwrap(), 3);
}

#[tokio::test]
async fn uncommitted_record_is_invisible_and_its_id_reused() {
    let tmp = tempfile::tempdir().unwrap();

    {
        let store = LedgerStore::open(tmp.path(), Compression::Lz4).await.unwrap();
        let registry = FacilityRegistry::new(store, EventBus::new());
        registry.register_facility(&ctx(OWNER), sample()).await.unwrap();

        // A registration interrupted after writing its record but before the mark.
        let orphan = Facility {
            id: 2,
            name: "Half Written".into(),
            address: "Nowhere".into(),
            contact_name: "Nobody".into(),
            contact_phone: "000".into(),
            registration_date: 1,
            active: true,
            owner: principal(STRANGER),
        };
        registry.store().save(&orphan).await.unwrap();
    }

    let store = LedgerStore::open(tmp.path(), Compression::Lz4).await.unwrap();
    let registry = FacilityRegistry::new(store, EventBus::new());

    assert_eq!(registry.facility_count().await.unwrap(), 1);
    assert_eq!(registry.get_facility(2).await.unwrap_err().kind(), "not_found");
    assert_eq!(
        registry.is_facility_owner(2, &principal(STRANGER)).await.unwrap_err().kind(),
        "not_found"
    );
    let err = registry.deactivate_facility(&ctx(STRANGER), 2).await.unwrap_err();
    assert_eq!(err.kind(), "not_found");

    let id = registry.register_facility(&ctx(OWNER), sample()).await.unwrap();
    assert_eq!(id, 2);
    let facility = registry.get_facility(2).await.unwrap();
    assert_eq!(facility.name, "Test Facility");
    assert_eq!(facility.owner.as_str(), OWNER);
    assert_eq!(registry.facility_count().await.unwrap(), 2);
}

#[tokio::test]
async fn slice_opens_configured_backend() {
    use freg_kernel::domain::config::{StorageBackend, StorageConfig};

    let tmp = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        backend: StorageBackend::Ledger,
        data_dir: tmp.path().to_path_buf(),
        ..StorageConfig::default()
    };

    let slice = freg_facility::init(&config, &EventBus::new()).await.unwrap();
    assert_eq!(slice.name(), freg_facility::Facilities::NAME);

    let facilities = freg_facility::Facilities::open(&config, &EventBus::new()).await.unwrap();
    assert_eq!(facilities.registry.store().kind(), "ledger");
}

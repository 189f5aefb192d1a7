//! Batch and single-record lookup integration tests.

mod common;

use uuid::Uuid;

use common::{PEOPLE, Person, PersonSort, PersonSortField, person_doc, person_service};
use meridian_query::backends::memory::MemoryStore;
use meridian_query::{ErrorCode, MAX_BATCH_KEYS, QueryError, QueryService};

fn seeded_ids(service: &QueryService<MemoryStore>, count: usize) -> Vec<String> {
    let store = service.store();
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let doc = person_doc(
            Some(&format!("Batch{:03}", i)),
            "Test",
            &format!("batch{:03}@example.com", i),
        );
        ids.push(doc.get_str("_id").unwrap().to_string());
        store.insert(PEOPLE, doc);
    }
    ids
}

// ============================================================================
// Batch Lookup
// ============================================================================

#[tokio::test]
async fn test_get_by_keys_returns_matching_records() {
    let service = person_service();
    let ids = seeded_ids(&service, 5);

    let people = service
        .get_by_keys::<Person>(&ids[1..4], None)
        .await
        .unwrap();

    assert_eq!(people.len(), 3);
    let fetched: Vec<_> = people.iter().map(|p| p.id.as_str()).collect();
    for id in &ids[1..4] {
        assert!(fetched.contains(&id.as_str()));
    }
}

#[tokio::test]
async fn test_get_by_keys_omits_missing_identifiers() {
    let service = person_service();
    let mut ids = seeded_ids(&service, 2);
    ids.push(Uuid::new_v4().to_string());

    let people = service.get_by_keys::<Person>(&ids, None).await.unwrap();

    // A partially-missing set is not an error.
    assert_eq!(people.len(), 2);
}

#[tokio::test]
async fn test_get_by_keys_deduplicates_input() {
    let service = person_service();
    let ids = seeded_ids(&service, 1);
    let repeated = vec![ids[0].clone(), ids[0].clone(), ids[0].clone()];

    let people = service.get_by_keys::<Person>(&repeated, None).await.unwrap();

    assert_eq!(people.len(), 1);
}

#[tokio::test]
async fn test_get_by_keys_empty_input_short_circuits() {
    let service = person_service();

    let people = service.get_by_keys::<Person>(&[], None).await.unwrap();

    assert!(people.is_empty());
}

#[tokio::test]
async fn test_get_by_keys_respects_the_sorter() {
    let service = person_service();
    let store = service.store();
    let z = person_doc(Some("Zimmerman"), "Zoe", "z@example.com");
    let a = person_doc(Some("Anderson"), "Amy", "a@example.com");
    let ids = vec![
        z.get_str("_id").unwrap().to_string(),
        a.get_str("_id").unwrap().to_string(),
    ];
    store.insert(PEOPLE, z);
    store.insert(PEOPLE, a);

    let sort = vec![PersonSort::asc(PersonSortField::LastName)];
    let people = service
        .get_by_keys::<Person>(&ids, Some(&sort))
        .await
        .unwrap();

    assert_eq!(people[0].last_name.as_deref(), Some("Anderson"));
    assert_eq!(people[1].last_name.as_deref(), Some("Zimmerman"));
}

#[tokio::test]
async fn test_get_by_keys_over_the_ceiling_is_rejected() {
    let service = person_service();
    let ids: Vec<String> = (0..MAX_BATCH_KEYS + 1)
        .map(|_| Uuid::new_v4().to_string())
        .collect();

    let err = service.get_by_keys::<Person>(&ids, None).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::InvalidInput);
    assert!(err.to_string().contains("101"));
}

#[tokio::test]
async fn test_get_by_keys_rejects_malformed_identifiers() {
    let service = person_service();
    let ids = vec!["not-a-uuid".to_string()];

    let err = service.get_by_keys::<Person>(&ids, None).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_get_by_keys_skips_soft_deleted_records() {
    let service = person_service();
    let store = service.store();
    let mut doc = person_doc(Some("Gone"), "Greg", "g@example.com");
    let id = doc.get_str("_id").unwrap().to_string();
    doc.insert("deleted", true);
    store.insert(PEOPLE, doc);

    let people = service
        .get_by_keys::<Person>(&[id], None)
        .await
        .unwrap();

    assert!(people.is_empty());
}

// ============================================================================
// Single-Record Lookup
// ============================================================================

#[tokio::test]
async fn test_get_returns_the_record() {
    let service = person_service();
    let ids = seeded_ids(&service, 1);

    let person = service.get::<Person>(&ids[0]).await.unwrap();

    assert_eq!(person.unwrap().id, ids[0]);
}

#[tokio::test]
async fn test_get_returns_none_for_absent_identifier() {
    let service = person_service();

    let person = service
        .get::<Person>(&Uuid::new_v4().to_string())
        .await
        .unwrap();

    assert!(person.is_none());
}

#[tokio::test]
async fn test_require_produces_not_found() {
    let service = person_service();
    let id = Uuid::new_v4().to_string();

    let err = service.require::<Person>(&id).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(matches!(err, QueryError::NotFound { .. }));
    assert!(err.to_string().contains(&id));
}

#[tokio::test]
async fn test_get_rejects_malformed_identifier() {
    let service = person_service();

    let err = service.get::<Person>("12345").await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_get_does_not_resurrect_soft_deleted_records() {
    let service = person_service();
    let store = service.store();
    let mut doc = person_doc(Some("Gone"), "Greg", "g@example.com");
    let id = doc.get_str("_id").unwrap().to_string();
    doc.insert("deleted", true);
    store.insert(PEOPLE, doc);

    let person = service.get::<Person>(&id).await.unwrap();
    assert!(person.is_none());

    let err = service.require::<Person>(&id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);

    // The raw document is still physically there.
    assert_eq!(store.collection_len(PEOPLE), 1);
}

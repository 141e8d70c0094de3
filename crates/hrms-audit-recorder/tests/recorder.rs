//! Recorder behaviour over the memory, SQLite and faulty stores.

use hrms_audit_recorder::{AuditRecorder, RecorderConfig};
use hrms_audit_types::{AuditAction, AuditError, AuditQueryFilter, EntryField, NewAuditLogEntry};
use hrms_common_config::{AuditConfig, StoreBackend};
use hrms_test_utils::{assert_err, assert_ok, entry, temp_db, FailingStore, SlowStore};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_append_only_entries_are_stable() {
    let recorder = AuditRecorder::in_memory();
    let a = assert_ok!(recorder.record(entry("u1", "CREATE", "employee")).await);
    let b = assert_ok!(recorder.record(entry("u1", "UPDATE", "employee")).await);
    assert_ne!(a.id, b.id);

    let first = recorder.query(&AuditQueryFilter::default()).await.unwrap();
    recorder.record(entry("u2", "LOGIN", "user")).await.unwrap();
    let second = recorder.query(&AuditQueryFilter::default()).await.unwrap();

    for earlier in &first {
        assert!(second.contains(earlier), "entry {} changed or vanished", earlier.id);
    }
}

#[tokio::test]
async fn test_filter_conjunction() {
    let recorder = AuditRecorder::in_memory();
    recorder.record(entry("u1", "CREATE", "employee")).await.unwrap();
    recorder.record(entry("u1", "DELETE", "employee")).await.unwrap();
    recorder.record(entry("u2", "DELETE", "employee")).await.unwrap();
    recorder.record(entry("u1", "UPDATE", "leave")).await.unwrap();

    let u1 = recorder.query(&AuditQueryFilter::new().user("u1")).await.unwrap();
    assert_eq!(u1.len(), 3);

    let u1_deletes = recorder
        .query(&AuditQueryFilter::new().user("u1").action("DELETE"))
        .await
        .unwrap();
    assert_eq!(u1_deletes.len(), 1);
    assert_eq!(u1_deletes[0].action, AuditAction::Delete);

    let all_deletes = recorder.query(&AuditQueryFilter::new().action("delete")).await.unwrap();
    assert!(u1_deletes.iter().all(|e| all_deletes.contains(e)));
    assert!(u1_deletes.iter().all(|e| u1.contains(e)));
}

#[tokio::test]
async fn test_empty_result_is_not_an_error() {
    let recorder = AuditRecorder::in_memory();
    recorder.record(entry("u1", "CREATE", "employee")).await.unwrap();

    let none = recorder
        .query(&AuditQueryFilter::new().user("nobody"))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_newest_first() {
    let recorder = AuditRecorder::in_memory();
    for i in 0..20 {
        let e = NewAuditLogEntry::builder("u1", "VIEW", "report")
            .resource_id(format!("r{i}"))
            .build();
        recorder.record(e).await.unwrap();
    }

    let all = recorder.query(&AuditQueryFilter::default()).await.unwrap();
    assert_eq!(all.len(), 20);
    for pair in all.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
        if pair[0].created_at == pair[1].created_at {
            assert!(pair[0].id > pair[1].id);
        }
    }
    assert_eq!(all[0].resource_id.as_deref(), Some("r19"));
}

#[tokio::test]
async fn test_invalid_entry_rejected_and_not_stored() {
    let recorder = AuditRecorder::in_memory();

    let err = assert_err!(recorder.record(entry("", "DELETE", "employee")).await);
    assert_eq!(err, AuditError::InvalidEntry { field: EntryField::UserId });

    let err = assert_err!(recorder.record(entry("u1", "DELETE", "   ")).await);
    assert_eq!(err, AuditError::InvalidEntry { field: EntryField::Resource });

    assert_eq!(recorder.count_unfiltered().await.unwrap(), 0);
}

#[tokio::test]
async fn test_invalid_entry_never_reaches_store() {
    let store = Arc::new(FailingStore::new());
    let recorder = AuditRecorder::new(store.clone());

    let err = assert_err!(recorder.record(entry("u1", "", "employee")).await);
    assert!(err.is_client_error());
    assert_eq!(store.append_attempts(), 0);
}

#[tokio::test]
async fn test_storage_failure_is_unavailable_and_not_retried() {
    let store = Arc::new(FailingStore::new());
    let recorder = AuditRecorder::new(store.clone());

    let err = assert_err!(recorder.record(entry("u1", "CREATE", "employee")).await);
    assert!(matches!(err, AuditError::StorageUnavailable { .. }));
    assert_eq!(store.append_attempts(), 1);

    let err = assert_err!(recorder.query(&AuditQueryFilter::default()).await);
    assert!(matches!(err, AuditError::StorageUnavailable { .. }));
}

#[tokio::test]
async fn test_timeout_is_unavailable() {
    let store = Arc::new(SlowStore::new(Duration::from_millis(500)));
    let recorder = AuditRecorder::with_config(
        store,
        RecorderConfig {
            operation_timeout: Duration::from_millis(20),
        },
    );

    let err = assert_err!(recorder.record(entry("u1", "CREATE", "employee")).await);
    match err {
        AuditError::StorageUnavailable { reason } => assert!(reason.contains("timed out")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_records_get_distinct_ids() {
    let recorder = AuditRecorder::in_memory();

    let mut handles = Vec::new();
    for task in 0..10 {
        let recorder = recorder.clone();
        handles.push(tokio::spawn(async move {
            let mut ids = Vec::new();
            for i in 0..10 {
                let e = NewAuditLogEntry::builder(format!("u{task}"), "VIEW", "report")
                    .resource_id(format!("{task}-{i}"))
                    .build();
                ids.push(recorder.record(e).await.unwrap().id);
            }
            ids
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        ids.extend(handle.await.unwrap());
    }
    assert_eq!(ids.len(), 100);

    let all = recorder.query(&AuditQueryFilter::default()).await.unwrap();
    assert_eq!(all.len(), 100);
    assert_eq!(recorder.distinct_users().await.unwrap().len(), 10);
}

#[tokio::test]
async fn test_counts_agree_with_query() {
    let recorder = AuditRecorder::in_memory();
    for (user, action) in [("u1", "DELETE"), ("u2", "CREATE"), ("u3", "DELETE"), ("u1", "LOGIN")] {
        recorder.record(entry(user, action, "employee")).await.unwrap();
    }

    let all = recorder.query(&AuditQueryFilter::default()).await.unwrap();
    assert_eq!(recorder.count_unfiltered().await.unwrap(), all.len() as u64);

    let deletes = all.iter().filter(|e| e.action == AuditAction::Delete).count();
    assert_eq!(recorder.count_by_action("DELETE").await.unwrap(), deletes as u64);

    let users: HashSet<_> = all.iter().map(|e| e.user_id.clone()).collect();
    assert_eq!(recorder.distinct_users().await.unwrap().len(), users.len());
}

#[tokio::test]
async fn test_sqlite_backend_from_config() {
    let (_dir, path) = temp_db();
    let config = AuditConfig {
        backend: StoreBackend::Sqlite,
        database_path: path.clone(),
        ..AuditConfig::default()
    };

    let recorder = AuditRecorder::from_config(&config).await.unwrap();
    assert_eq!(recorder.backend(), "sqlite");
    recorder.record(entry("u1", "CREATE", "employee")).await.unwrap();
    recorder.record(entry("u1", "DELETE", "employee")).await.unwrap();
    recorder.record(entry("u2", "DELETE", "leave")).await.unwrap();

    let deletes = recorder.query(&AuditQueryFilter::new().action("DELETE")).await.unwrap();
    assert_eq!(deletes.len(), 2);
    assert!(deletes[0].id > deletes[1].id);
    assert!(path.exists());

    let summary = recorder.summary().await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.deletes, 2);
    assert_eq!(summary.distinct_users, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sqlite_concurrent_records_visible_immediately() {
    let (_dir, path) = temp_db();
    let config = AuditConfig {
        backend: StoreBackend::Sqlite,
        database_path: path,
        ..AuditConfig::default()
    };
    let recorder = AuditRecorder::from_config(&config).await.unwrap();

    let mut handles = Vec::new();
    for task in 0..10 {
        let recorder = recorder.clone();
        handles.push(tokio::spawn(async move {
            let mut ids = Vec::new();
            for i in 0..10 {
                let e = NewAuditLogEntry::builder(format!("u{task}"), "VIEW", "report")
                    .resource_id(format!("{task}-{i}"))
                    .build();
                ids.push(recorder.record(e).await.unwrap().id);
            }
            ids
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        ids.extend(handle.await.unwrap());
    }
    assert_eq!(ids.len(), 100);

    let all = recorder.query(&AuditQueryFilter::default()).await.unwrap();
    assert_eq!(all.len(), 100);
    assert!(all.iter().all(|e| ids.contains(&e.id)));
    assert_eq!(recorder.count_unfiltered().await.unwrap(), 100);
}

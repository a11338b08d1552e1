//! RecordSink behavior shared by every store

use casebrief_core::{
    Category, CategoryDraft, CategoryOverride, RecordSink, RiskFlagDraft, RiskType, Severity,
    SuggestedWorkflow,
};
use casebrief_store::{open_store, JournalConfig, JournalStore, MemoryStore, StoreConfig};
use std::sync::Arc;
use tempfile::TempDir;

fn draft(severity: Severity, description: &str) -> RiskFlagDraft {
    RiskFlagDraft {
        risk_type: RiskType::Contradiction,
        severity,
        description: description.to_string(),
        affected_text: "References to: before, after".to_string(),
        explanation: "Contradictory statements can undermine the credibility of the document."
            .to_string(),
        suggestions: vec!["Review context of each usage".to_string()],
    }
}

#[tokio::test]
async fn flags_are_created_unresolved_in_order() {
    let store = MemoryStore::new();
    store.register_document(10).await.unwrap();

    let created = store
        .create_risk_flags(
            10,
            vec![draft(Severity::Critical, "first"), draft(Severity::Low, "second")],
        )
        .await
        .unwrap();

    assert_eq!(created.len(), 2);
    assert!(created.iter().all(|f| !f.is_resolved && f.document_id == 10));
    assert!(created.iter().all(|f| f.id.starts_with("risk_")));
    assert_ne!(created[0].id, created[1].id);

    let listed = store.list_risk_flags(10).await.unwrap();
    assert_eq!(listed, created);
    assert!(store.list_risk_flags(11).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_batch_creates_nothing() {
    let store = MemoryStore::new();
    store.register_document(1).await.unwrap();
    assert!(store.create_risk_flags(1, vec![]).await.unwrap().is_empty());
}

#[tokio::test]
async fn writes_for_unknown_documents_are_rejected() {
    let store = MemoryStore::new();

    let err = store
        .create_risk_flags(99, vec![draft(Severity::Low, "x")])
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = store
        .upsert_category(99, CategoryDraft::detected(Category::Other, None, 0.5))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = store
        .override_category(99, CategoryOverride::new(Category::Fir))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn resolving_is_idempotent() {
    let store = MemoryStore::new();
    store.register_document(1).await.unwrap();
    let created = store
        .create_risk_flags(1, vec![draft(Severity::Medium, "x")])
        .await
        .unwrap();

    let first = store.resolve_risk_flag(&created[0].id).await.unwrap();
    let second = store.resolve_risk_flag(&created[0].id).await.unwrap();
    assert!(first.is_resolved);
    assert_eq!(first, second);

    assert!(store
        .resolve_risk_flag("risk_unknown")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn manual_upsert_forces_full_confidence() {
    let store = MemoryStore::new();
    store.register_document(1).await.unwrap();
    store
        .upsert_category(1, CategoryDraft::detected(Category::Fir, Some("Criminal".into()), 0.92))
        .await
        .unwrap();

    let mut manual = CategoryDraft::detected(Category::Contract, None, 0.4);
    manual.auto_detected = false;
    store.upsert_category(1, manual).await.unwrap();

    let stored = store.get_category(1).await.unwrap().unwrap();
    assert_eq!(stored.category, Category::Contract);
    assert_eq!(stored.confidence_score, 1.0);
    assert!(!stored.auto_detected);
}

#[tokio::test]
async fn override_keeps_subcategory_and_workflow_unless_supplied() {
    let store = MemoryStore::new();
    store.register_document(1).await.unwrap();
    let detected = store
        .upsert_category(1, CategoryDraft::detected(Category::Contract, Some("Lease".into()), 0.9))
        .await
        .unwrap();

    let overridden = store
        .override_category(1, CategoryOverride::new(Category::CaseRecord))
        .await
        .unwrap();
    assert_eq!(overridden.id, detected.id);
    assert_eq!(overridden.category, Category::CaseRecord);
    assert_eq!(overridden.subcategory.as_deref(), Some("Lease"));
    assert_eq!(overridden.suggested_workflow, detected.suggested_workflow);
    assert_eq!(overridden.confidence_score, 1.0);
    assert!(!overridden.auto_detected);

    let workflow = SuggestedWorkflow::for_category(Category::CaseRecord, 1.0);
    let replaced = store
        .override_category(
            1,
            CategoryOverride {
                category: Category::CaseRecord,
                subcategory: Some("Civil".into()),
                suggested_workflow: Some(workflow.clone()),
            },
        )
        .await
        .unwrap();
    assert_eq!(replaced.subcategory.as_deref(), Some("Civil"));
    assert_eq!(replaced.suggested_workflow, workflow);
}

#[tokio::test]
async fn override_without_category_creates_one() {
    let store = MemoryStore::new();
    store.register_document(4).await.unwrap();

    let created = store
        .override_category(4, CategoryOverride::new(Category::WitnessStatement))
        .await
        .unwrap();
    assert_eq!(created.confidence_score, 1.0);
    assert!(!created.auto_detected);
    assert_eq!(created.subcategory, None);
    assert_eq!(created.suggested_workflow.steps[0], "Identify witness");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_upserts_leave_one_whole_record() {
    let store: Arc<dyn RecordSink> = Arc::new(MemoryStore::new());
    store.register_document(1).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..32 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                store
                    .upsert_category(1, CategoryDraft::detected(Category::Fir, Some("Criminal".into()), 0.92))
                    .await
            } else {
                store
                    .override_category(1, CategoryOverride::new(Category::ChargeSheet))
                    .await
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = store.get_category(1).await.unwrap().unwrap();
    match stored.category {
        Category::Fir => assert!(stored.auto_detected && stored.confidence_score == 0.92),
        Category::ChargeSheet => assert!(!stored.auto_detected && stored.confidence_score == 1.0),
        other => panic!("unexpected category {}", other),
    }
}

#[tokio::test]
async fn journal_replay_restores_records() {
    let temp_dir = TempDir::new().unwrap();
    let config = JournalConfig {
        path: temp_dir.path().join("records.jsonl"),
        sync_writes: false,
    };

    let (flag_id, category) = {
        let store = JournalStore::open(&config).unwrap();
        store.register_document(7).await.unwrap();
        let flags = store
            .create_risk_flags(7, vec![draft(Severity::High, "a"), draft(Severity::Low, "b")])
            .await
            .unwrap();
        store.resolve_risk_flag(&flags[1].id).await.unwrap();
        store
            .upsert_category(7, CategoryDraft::detected(Category::Contract, None, 0.9))
            .await
            .unwrap();
        let category = store
            .override_category(7, CategoryOverride::new(Category::Other))
            .await
            .unwrap();
        (flags[1].id.clone(), category)
    };

    let reopened = open_store(&StoreConfig::Journal(config)).unwrap();
    assert!(reopened.document_exists(7).await.unwrap());

    let flags = reopened.list_risk_flags(7).await.unwrap();
    assert_eq!(flags.len(), 2);
    assert!(!flags[0].is_resolved);
    assert!(flags[1].is_resolved);
    assert_eq!(flags[1].id, flag_id);

    assert_eq!(reopened.get_category(7).await.unwrap(), Some(category));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn synced_journal_under_concurrent_writers() {
    let temp_dir = TempDir::new().unwrap();
    let config = JournalConfig {
        path: temp_dir.path().join("synced.jsonl"),
        sync_writes: true,
    };

    let store: Arc<dyn RecordSink> = Arc::new(JournalStore::open(&config).unwrap());
    let mut handles = Vec::new();
    for document_id in 0..8u64 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.register_document(document_id).await?;
            store
                .create_risk_flags(document_id, vec![draft(Severity::Low, "synced")])
                .await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().len(), 1);
    }
    drop(store);

    let reopened = JournalStore::open(&config).unwrap();
    for document_id in 0..8u64 {
        assert_eq!(reopened.list_risk_flags(document_id).await.unwrap().len(), 1);
    }
}

#[test]
fn store_config_deserializes() {
    let memory: StoreConfig = serde_json::from_str(r#"{"kind":"memory"}"#).unwrap();
    assert_eq!(memory, StoreConfig::Memory);

    let journal: StoreConfig =
        serde_json::from_str(r#"{"kind":"journal","path":"/tmp/x.jsonl"}"#).unwrap();
    match journal {
        StoreConfig::Journal(config) => {
            assert_eq!(config.path, std::path::PathBuf::from("/tmp/x.jsonl"));
            assert!(!config.sync_writes);
        }
        other => panic!("unexpected config {:?}", other),
    }
}

//! End-to-end field workflow on an in-memory device

use async_trait::async_trait;
use auth_identity::{AuthError, IdentityProvider, Role, Session};
use chrono::NaiveDate;
use database_layer::{keys, MemorySlotStore, SlotStore};
use error_common::{codes, ErrorKind};
use healthwatch::cli::ResetArgs;
use healthwatch::commands::{file_record, is_corrupt_slot, reset_slots, FileOutcome};
use healthwatch::records::{CaseReport, FieldRecord, RecordEnvelope, ReportStatus, Severity};
use healthwatch::{AppConfig, AppContext};
use healthwatch_sync::{FlushOutcome, QueueItem, RemoteSubmitter, SyncError, SyncResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct FakeServer {
    down: AtomicBool,
    accepted: AtomicUsize,
}

#[async_trait]
impl RemoteSubmitter for FakeServer {
    async fn submit(&self, _item: &QueueItem) -> SyncResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(SyncError::Network("connection refused".to_string()));
        }
        self.accepted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FakeIdentity;

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn request_otp(&self, _phone: &str) -> auth_identity::Result<()> {
        Ok(())
    }

    async fn verify_otp(&self, phone: &str, otp: &str) -> auth_identity::Result<Session> {
        if otp == "000000" {
            return Err(AuthError::Rejected);
        }
        Ok(Session {
            user_id: "u-42".to_string(),
            display_name: "Sunita Devi".to_string(),
            role: Role::Asha,
            phone_number: phone.to_string(),
            preferred_language: "hi".to_string(),
            village_id: Some("V-007".to_string()),
            verified: true,
        })
    }
}

async fn device(online: bool) -> (Arc<FakeServer>, AppContext) {
    let server = Arc::new(FakeServer::default());
    let ctx = AppContext::assemble(
        AppConfig::default(),
        Arc::new(MemorySlotStore::new()),
        server.clone(),
        Arc::new(FakeIdentity),
        online,
    )
    .await
    .unwrap();
    (server, ctx)
}

fn case_report(status: ReportStatus) -> FieldRecord {
    FieldRecord::CaseReport(CaseReport {
        location: "Ward 4".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        symptoms: vec!["fever".to_string()],
        patient_count: 2,
        age_group: "0-5".to_string(),
        severity: Severity::Mild,
        description: String::new(),
        media: Vec::new(),
        status,
    })
}

#[tokio::test]
async fn test_offline_reports_queue_then_sync_on_reconnect() {
    let (server, ctx) = device(false).await;

    for _ in 0..3 {
        let outcome = file_record(&ctx, case_report(ReportStatus::Submitted), false).await.unwrap();
        assert!(matches!(outcome, FileOutcome::Queued(_)));
    }
    assert_eq!(ctx.queue.current_queue().await.len(), 3);

    ctx.connectivity.went_online();
    assert_eq!(ctx.queue.flush().await.unwrap(), FlushOutcome::Flushed { count: 3 });
    assert_eq!(ctx.queue.current_queue().await.len(), 0);
    assert_eq!(server.accepted.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_online_report_goes_straight_to_server() {
    let (server, ctx) = device(true).await;

    let outcome = file_record(&ctx, case_report(ReportStatus::Submitted), false).await.unwrap();

    assert!(matches!(outcome, FileOutcome::Submitted(_)));
    assert_eq!(server.accepted.load(Ordering::SeqCst), 1);
    assert_eq!(ctx.queue.pending_count().await, 0);
}

#[tokio::test]
async fn test_drafts_and_forced_records_are_queued_while_online() {
    let (server, ctx) = device(true).await;

    let draft = file_record(&ctx, case_report(ReportStatus::Draft), false).await.unwrap();
    let forced = file_record(&ctx, case_report(ReportStatus::Submitted), true).await.unwrap();

    assert!(matches!(draft, FileOutcome::Queued(_)));
    assert!(matches!(forced, FileOutcome::Queued(_)));
    assert_eq!(ctx.queue.pending_count().await, 2);
    assert_eq!(server.accepted.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_direct_submission_is_reported_not_queued() {
    let (server, ctx) = device(true).await;
    server.down.store(true, Ordering::SeqCst);

    let err = file_record(&ctx, case_report(ReportStatus::Submitted), false).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Sync);
    assert_eq!(err.code(), codes::sync::NETWORK_UNREACHABLE);
    assert_eq!(ctx.queue.pending_count().await, 0);
}

#[tokio::test]
async fn test_records_carry_the_reporter() {
    let (_server, ctx) = device(false).await;
    ctx.sessions.login("+911234567890", "123456").await.unwrap();

    let FileOutcome::Queued(item) = file_record(&ctx, case_report(ReportStatus::Submitted), false)
        .await
        .unwrap()
    else {
        panic!("offline record should be queued");
    };

    let envelope = RecordEnvelope::from_payload(&item.payload).unwrap();
    assert_eq!(envelope.reported_by.as_deref(), Some("u-42"));
    assert_eq!(envelope.record, case_report(ReportStatus::Submitted));
}

#[tokio::test]
async fn test_rejected_login_maps_to_auth_code() {
    let (_server, ctx) = device(true).await;

    let err: error_common::HealthWatchError =
        ctx.sessions.login("+911234567890", "000000").await.unwrap_err().into();

    assert_eq!(err.code(), codes::authentication::INVALID_CREDENTIALS);
    assert!(healthwatch::commands::is_rejection(&err));
    assert!(ctx.sessions.current_session().await.is_none());
}

async fn assemble_over(store: Arc<MemorySlotStore>) -> error_common::Result<AppContext> {
    AppContext::assemble(
        AppConfig::default(),
        store,
        Arc::new(FakeServer::default()),
        Arc::new(FakeIdentity),
        true,
    )
    .await
}

#[tokio::test]
async fn test_unreadable_slots_are_storage_errors_and_reset_recovers() {
    for (slot, args) in [
        (keys::SESSION, ResetArgs { session: true, queue: false }),
        (keys::SYNC_QUEUE, ResetArgs { session: false, queue: true }),
    ] {
        let store = Arc::new(MemorySlotStore::new());
        store.save(slot, b"{garbage").await.unwrap();

        let Err(err) = assemble_over(store.clone()).await else {
            panic!("context opened over an unreadable {} slot", slot);
        };
        assert_eq!(err.kind(), ErrorKind::Storage, "slot {}", slot);
        assert_eq!(err.code(), codes::storage::CORRUPT_SLOT, "slot {}", slot);
        assert!(is_corrupt_slot(&err));

        let cleared = reset_slots(&*store, &args).await.unwrap();
        assert_eq!(cleared, vec![slot]);

        let ctx = assemble_over(store).await.unwrap();
        assert_eq!(ctx.queue.pending_count().await, 0);
        assert_eq!(ctx.sessions.current_session().await, None);
    }
}

#[tokio::test]
async fn test_reset_leaves_other_slot_alone() {
    let store = Arc::new(MemorySlotStore::new());
    {
        let ctx = assemble_over(store.clone()).await.unwrap();
        ctx.sessions.login("+911234567890", "123456").await.unwrap();
    }
    store.save(keys::SYNC_QUEUE, b"{garbage").await.unwrap();

    reset_slots(&*store, &ResetArgs { session: false, queue: true }).await.unwrap();

    let ctx = assemble_over(store).await.unwrap();
    assert_eq!(ctx.reporter_id().await.as_deref(), Some("u-42"));
}

#[tokio::test]
async fn test_reset_without_target_is_rejected() {
    let store = MemorySlotStore::new();
    let err = reset_slots(&store, &ResetArgs { session: false, queue: false }).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(store.write_count(), 0);
}

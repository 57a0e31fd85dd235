//! Command handlers
//!
//! Handlers only talk to the components owned by [`AppContext`]; all state
//! lives there.

use auth_identity::{AuthError, ProfileUpdate, Session};
use chrono::Local;
use colored::*;
use database_layer::{keys, SlotStore};
use error_common::{codes, HealthWatchError, Result};
use healthwatch_sync::{FlushOutcome, QueueItem, SyncError};
use logger_redacted::redact_phone;
use uuid::Uuid;

use crate::cli::{CaseArgs, Command, ProfileArgs, ReportKind, ResetArgs, WaterArgs};
use crate::context::AppContext;
use crate::records::{
    CaseReport, FieldRecord, RecordEnvelope, ReportStatus, WaterQualityTest, WaterStatus,
};

/// Where a filed record ended up
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Stored on the device, waiting for the next sync
    Queued(QueueItem),
    /// Accepted by the server straight away
    Submitted(Uuid),
}

/// Routes a record: drafts, offline records and forced ones are queued;
/// anything else goes straight to the server.
///
/// A failed direct submission is returned to the caller and the record is not
/// queued behind their back.
pub async fn file_record(ctx: &AppContext, record: FieldRecord, force_queue: bool) -> Result<FileOutcome> {
    let envelope = RecordEnvelope::new(record, ctx.reporter_id().await);
    let payload = envelope
        .to_payload()
        .map_err(|e| HealthWatchError::ValidationError(format!("Record cannot be encoded: {}", e)))?;

    if force_queue || envelope.record.is_draft() || !ctx.connectivity.is_online() {
        let item = ctx.queue.enqueue(payload).await?;
        return Ok(FileOutcome::Queued(item));
    }

    let item = QueueItem::new(payload);
    let timeout = ctx.config.queue.submit_timeout();
    match tokio::time::timeout(timeout, ctx.submitter.submit(&item)).await {
        Ok(Ok(())) => {
            tracing::info!(operation_id = %item.id, "Record submitted directly");
            Ok(FileOutcome::Submitted(item.id))
        }
        Ok(Err(e)) => {
            tracing::warn!(operation_id = %item.id, error = %e, "Direct submission failed");
            Err(e.into())
        }
        Err(_) => Err(SyncError::Timeout(timeout).into()),
    }
}

pub fn case_record(args: CaseArgs) -> FieldRecord {
    FieldRecord::CaseReport(CaseReport {
        location: args.location,
        date: args.date.unwrap_or_else(|| Local::now().date_naive()),
        symptoms: args.symptoms,
        patient_count: args.patients,
        age_group: args.age_group,
        severity: args.severity,
        description: args.description,
        media: args.media,
        status: if args.draft { ReportStatus::Draft } else { ReportStatus::Submitted },
    })
}

pub fn water_record(args: WaterArgs) -> FieldRecord {
    let now = Local::now();
    FieldRecord::WaterQuality(WaterQualityTest {
        source: args.source,
        date: args.date.unwrap_or_else(|| now.date_naive()),
        time: args.time.unwrap_or_else(|| now.time()),
        test_type: args.test_type,
        ph: args.ph,
        turbidity_ntu: args.turbidity,
        temperature_c: args.temperature,
        ecoli_cfu: args.ecoli,
        chlorine_mg_l: args.chlorine,
        notes: args.notes,
    })
}

impl From<ProfileArgs> for ProfileUpdate {
    fn from(args: ProfileArgs) -> Self {
        ProfileUpdate {
            display_name: args.display_name,
            role: args.role,
            phone_number: args.phone_number,
            preferred_language: args.preferred_language,
            village_id: if args.clear_village { Some(None) } else { args.village_id.map(Some) },
        }
    }
}

/// Clears the chosen slots without decoding them, so it also works when the
/// context refuses to open. Discarding the queue loses unsynced records.
pub async fn reset_slots(store: &dyn SlotStore, args: &ResetArgs) -> Result<Vec<&'static str>> {
    if !args.session && !args.queue {
        return Err(HealthWatchError::ValidationError(
            "Nothing to reset; pass --session, --queue or both".to_string(),
        ));
    }

    let mut cleared = Vec::new();
    if args.session {
        store.clear(keys::SESSION).await?;
        cleared.push(keys::SESSION);
    }
    if args.queue {
        store.clear(keys::SYNC_QUEUE).await?;
        cleared.push(keys::SYNC_QUEUE);
    }

    tracing::warn!(slots = ?cleared, "Device slots reset");
    Ok(cleared)
}

/// Runs one command against the context
pub async fn run(ctx: &AppContext, command: Command) -> Result<()> {
    match command {
        Command::RequestOtp { phone } => {
            ctx.sessions.request_otp(&phone).await?;
            println!("{} One-time code sent to {}", "✓".green(), redact_phone(&phone));
        }
        Command::Login { phone, otp } => {
            let session = ctx.sessions.login(&phone, &otp).await?;
            println!("{} Signed in", "✓".green());
            print_session(&session);
        }
        Command::Logout => {
            ctx.sessions.logout().await?;
            println!("{} Signed out", "✓".green());
        }
        Command::Whoami => match ctx.sessions.current_session().await {
            Some(session) => print_session(&session),
            None => println!("{}", "Not signed in".yellow()),
        },
        Command::Profile(args) => {
            let update = ProfileUpdate::from(args);
            if update.is_empty() {
                return Err(HealthWatchError::ValidationError(
                    "Nothing to update; pass at least one profile field".to_string(),
                ));
            }
            let session = ctx.sessions.update_profile(update).await?;
            println!("{} Profile updated", "✓".green());
            print_session(&session);
        }
        Command::Report(report) => {
            let record = match report.kind {
                ReportKind::Case(args) => case_record(args),
                ReportKind::Water(args) => water_record(args),
            };

            if let FieldRecord::WaterQuality(test) = &record {
                print_water_status(test.assess());
            }

            match file_record(ctx, record, report.queue).await? {
                FileOutcome::Queued(item) => println!(
                    "{} Saved on device ({}), {} pending",
                    "●".yellow(),
                    short_id(&item.id),
                    ctx.queue.pending_count().await
                ),
                FileOutcome::Submitted(id) => {
                    println!("{} Submitted to server ({})", "✓".green(), short_id(&id))
                }
            }
        }
        Command::Queue { json } => {
            let items = ctx.queue.current_queue().await;
            if json {
                let rendered = serde_json::to_string_pretty(&items)
                    .map_err(|e| HealthWatchError::InternalError(e.to_string()))?;
                println!("{}", rendered);
            } else if items.is_empty() {
                println!("{}", "Nothing waiting to sync".green());
            } else {
                for item in &items {
                    println!("{}  {}  {}", short_id(&item.id).dimmed(), item.enqueued_at.format("%Y-%m-%d %H:%M"), describe(item));
                }
                println!("{} pending", items.len().to_string().bold());
            }
        }
        Command::Sync => match ctx.queue.flush().await? {
            FlushOutcome::Offline => println!("{}", "Offline, records stay on the device".yellow()),
            FlushOutcome::Empty => println!("{}", "Nothing to sync".green()),
            FlushOutcome::AlreadySyncing => println!("{}", "A sync is already in progress".yellow()),
            FlushOutcome::Flushed { count } => println!("{} Synced {} records", "✓".green(), count),
        },
        Command::Status => {
            let status = ctx.queue.status().await;
            let connectivity = if status.online { "online".green() } else { "offline".yellow() };
            println!("Connectivity: {}", connectivity);
            match ctx.sessions.current_session().await {
                Some(session) => println!("Signed in:    {} ({})", session.display_name, session.role),
                None => println!("Signed in:    {}", "no".yellow()),
            }
            println!("Pending:      {}", status.pending);
            if let Some(at) = status.last_flushed_at {
                println!("Last sync:    {}", at.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
            }
        }
        Command::Config => {
            let rendered = serde_yaml::to_string(&ctx.config)
                .map_err(|e| HealthWatchError::InternalError(e.to_string()))?;
            print!("{}", rendered);
        }
        Command::Reset(_) => {
            return Err(HealthWatchError::InternalError(
                "reset runs before the device context is opened".to_string(),
            ));
        }
    }

    Ok(())
}

/// True when the error is an authentication rejection worth re-prompting for
pub fn is_rejection(err: &HealthWatchError) -> bool {
    err.code() == AuthError::Rejected.code()
}

/// True when a device slot could not be decoded and `reset` is the way out
pub fn is_corrupt_slot(err: &HealthWatchError) -> bool {
    err.code() == codes::storage::CORRUPT_SLOT
}

fn print_session(session: &Session) {
    println!("  {} {}", "Name:".bold(), session.display_name);
    println!("  {} {}", "Role:".bold(), session.role);
    println!("  {} {}", "Phone:".bold(), redact_phone(&session.phone_number));
    println!("  {} {}", "Language:".bold(), session.preferred_language);
    if let Some(village) = &session.village_id {
        println!("  {} {}", "Village:".bold(), village);
    }
    if !session.verified {
        println!("  {}", "Phone number not verified".yellow());
    }
}

fn print_water_status(status: WaterStatus) {
    let label = match status {
        WaterStatus::Safe => "SAFE".green().bold(),
        WaterStatus::Caution => "CAUTION".yellow().bold(),
        WaterStatus::Unsafe => "UNSAFE".red().bold(),
    };
    println!("Water quality: {}", label);
}

fn describe(item: &QueueItem) -> String {
    RecordEnvelope::from_payload(&item.payload)
        .map(|envelope| envelope.record.summary())
        .unwrap_or_else(|| "unrecognised record".to_string())
}

fn short_id(id: &Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

use auth_identity::Role;
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::records::{Severity, TestType};

/// HealthWatch field client
#[derive(Parser, Debug)]
#[command(name = "healthwatch")]
#[command(about = "Record community health reports offline and sync them when connected")]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "HEALTHWATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Treat the device as offline for this run
    #[arg(long, global = true)]
    pub offline: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask the identity provider to text a one-time code
    RequestOtp {
        /// Mobile number, e.g. +911234567890
        phone: String,
    },

    /// Sign in with a phone number and one-time code
    Login {
        phone: String,
        otp: String,
    },

    /// End the current session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Update the signed-in user's profile
    Profile(ProfileArgs),

    /// File a field record
    Report(ReportArgs),

    /// List records waiting to be synced
    Queue {
        /// Print raw queue items as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send all pending records to the server
    Sync,

    /// Show connectivity, session and queue status
    Status,

    /// Print the effective configuration as YAML
    Config,

    /// Wipe unreadable device data so the client can start again
    Reset(ResetArgs),
}

#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub display_name: Option<String>,

    /// admin, district_officer, clinic, asha or volunteer
    #[arg(long)]
    pub role: Option<Role>,

    #[arg(long)]
    pub phone_number: Option<String>,

    #[arg(long = "language")]
    pub preferred_language: Option<String>,

    #[arg(long = "village")]
    pub village_id: Option<String>,

    /// Remove the village from the profile
    #[arg(long, conflicts_with = "village_id")]
    pub clear_village: bool,
}

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Sign out by discarding the stored session
    #[arg(long)]
    pub session: bool,

    /// Discard every record waiting to be synced
    #[arg(long)]
    pub queue: bool,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Always add the record to the sync queue, even when online
    #[arg(long, global = true)]
    pub queue: bool,

    #[command(subcommand)]
    pub kind: ReportKind,
}

#[derive(Subcommand, Debug)]
pub enum ReportKind {
    /// Disease case report
    Case(CaseArgs),

    /// Water quality test
    Water(WaterArgs),
}

#[derive(Args, Debug)]
pub struct CaseArgs {
    #[arg(long)]
    pub location: String,

    /// Date seen (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Comma-separated symptoms
    #[arg(long, value_delimiter = ',', required = true)]
    pub symptoms: Vec<String>,

    #[arg(long, default_value_t = 1)]
    pub patients: u32,

    #[arg(long, default_value = "all")]
    pub age_group: String,

    #[arg(long, value_enum)]
    pub severity: Severity,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Attached photo path; repeat for several
    #[arg(long)]
    pub media: Vec<String>,

    /// Save as a draft; drafts are always queued
    #[arg(long)]
    pub draft: bool,
}

#[derive(Args, Debug)]
pub struct WaterArgs {
    /// Water source, e.g. "Hand pump 2"
    #[arg(long)]
    pub source: String,

    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Time of test (HH:MM:SS), defaults to now
    #[arg(long)]
    pub time: Option<NaiveTime>,

    #[arg(long, value_enum, default_value_t = TestType::Manual)]
    pub test_type: TestType,

    #[arg(long)]
    pub ph: f64,

    #[arg(long)]
    pub turbidity: f64,

    #[arg(long, default_value_t = 25.0)]
    pub temperature: f64,

    /// E. coli, CFU per 100 ml
    #[arg(long, default_value_t = 0)]
    pub ecoli: u32,

    /// Residual chlorine, mg/l
    #[arg(long)]
    pub chlorine: Option<f64>,

    #[arg(long, default_value = "")]
    pub notes: String,
}

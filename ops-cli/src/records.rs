//! Field records filed by health workers
//!
//! The sync queue treats these as opaque JSON; only this module knows their
//! shape.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Draft,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    Manual,
    Sensor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
    pub location: String,
    pub date: NaiveDate,
    pub symptoms: Vec<String>,
    pub patient_count: u32,
    pub age_group: String,
    pub severity: Severity,
    pub description: String,
    /// Paths or references to photos attached on the device
    #[serde(default)]
    pub media: Vec<String>,
    pub status: ReportStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterQualityTest {
    pub source: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub test_type: TestType,
    pub ph: f64,
    pub turbidity_ntu: f64,
    pub temperature_c: f64,
    /// E. coli, CFU per 100 ml
    pub ecoli_cfu: u32,
    pub chlorine_mg_l: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterStatus {
    Safe,
    Caution,
    Unsafe,
}

impl fmt::Display for WaterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WaterStatus::Safe => "safe",
            WaterStatus::Caution => "caution",
            WaterStatus::Unsafe => "unsafe",
        };
        f.write_str(label)
    }
}

/// Drinking-water ranges
pub mod thresholds {
    pub const PH_SAFE_MIN: f64 = 6.5;
    pub const PH_SAFE_MAX: f64 = 8.5;
    pub const PH_UNSAFE_MIN: f64 = 6.0;
    pub const PH_UNSAFE_MAX: f64 = 9.0;
    pub const TURBIDITY_SAFE_MAX: f64 = 5.0;
    pub const TURBIDITY_UNSAFE_MAX: f64 = 10.0;
}

impl WaterQualityTest {
    /// Any E. coli, or a reading far outside the drinking range, is unsafe.
    /// Readings just outside the range are a caution.
    pub fn assess(&self) -> WaterStatus {
        use thresholds::*;

        if self.ecoli_cfu > 0
            || self.ph < PH_UNSAFE_MIN
            || self.ph > PH_UNSAFE_MAX
            || self.turbidity_ntu > TURBIDITY_UNSAFE_MAX
        {
            WaterStatus::Unsafe
        } else if self.ph < PH_SAFE_MIN
            || self.ph > PH_SAFE_MAX
            || self.turbidity_ntu >= TURBIDITY_SAFE_MAX
        {
            WaterStatus::Caution
        } else {
            WaterStatus::Safe
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldRecord {
    CaseReport(CaseReport),
    #[serde(rename = "water_quality")]
    WaterQuality(WaterQualityTest),
}

impl FieldRecord {
    pub fn is_draft(&self) -> bool {
        matches!(self, FieldRecord::CaseReport(report) if report.status == ReportStatus::Draft)
    }

    /// One-line description for listings
    pub fn summary(&self) -> String {
        match self {
            FieldRecord::CaseReport(report) => format!(
                "case report, {} ({} patients, {:?}){}",
                report.location,
                report.patient_count,
                report.severity,
                if report.status == ReportStatus::Draft { " [draft]" } else { "" }
            ),
            FieldRecord::WaterQuality(test) => format!(
                "water test, {} (pH {:.1}, {:.1} NTU, {})",
                test.source,
                test.ph,
                test.turbidity_ntu,
                test.assess()
            ),
        }
    }
}

/// What actually goes into the queue: the record plus who filed it and when
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEnvelope {
    pub reported_by: Option<String>,
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: FieldRecord,
}

impl RecordEnvelope {
    pub fn new(record: FieldRecord, reported_by: Option<String>) -> Self {
        Self {
            reported_by,
            recorded_at: Utc::now(),
            record,
        }
    }

    pub fn to_payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Reads back a queued payload; `None` for anything this client did not write
    pub fn from_payload(payload: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(payload.clone()).ok()
    }
}

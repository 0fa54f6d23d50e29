use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Growth parameters for a domain warmup run.
///
/// A config is immutable once a plan has been generated from it; changing any
/// field discards the plan and regenerates it from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarmupConfig {
    /// Contacts sent in stage 0.
    pub initial_batch_size: u64,
    /// Multiplicative growth applied per stage.
    pub increment_factor: f64,
    /// Wall-clock spacing between consecutive stages, in hours.
    #[serde(rename = "incrementInterval")]
    pub increment_interval_hours: f64,
    /// Ceiling the batch size grows towards.
    pub max_batch_size: u64,
    /// When stage 0 is sent. Strictly future at validation time.
    #[serde(rename = "warmupStartDate")]
    pub start_at: DateTime<Utc>,
}

impl WarmupConfig {
    /// Returns the stage spacing converted to days.
    pub fn interval_days(&self) -> f64 {
        self.increment_interval_hours / 24.0
    }
}

/// One send batch within a warmup plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmupStage {
    #[serde(rename = "stage")]
    pub index: u32,
    #[serde(rename = "batchSize")]
    pub batch_size: u64,
    /// Running total of contacts sent once this stage completes.
    #[serde(rename = "totalSent")]
    pub cumulative_sent: u64,
    /// Days since the warmup start; fractional for sub-daily intervals.
    #[serde(rename = "day")]
    pub day_offset: f64,
    #[serde(rename = "date")]
    pub scheduled_at: DateTime<Utc>,
}

/// Complete send schedule produced by the stage generator.
///
/// Stages are in execution order and never re-sorted. Individual stages are
/// not patchable; the plan is a derived value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarmupPlan {
    pub stages: Vec<WarmupStage>,
    pub total_contacts: u64,
    pub estimated_duration_days: u32,
}

impl WarmupPlan {
    /// Returns the plan for an empty audience.
    pub fn empty() -> Self {
        Self {
            stages: Vec::new(),
            total_contacts: 0,
            estimated_duration_days: 0,
        }
    }

    /// Returns `true` when the plan schedules nothing.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Summary statistics consumed by the UI and by structured logs.
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            stage_count: self.stages.len() as u32,
            total_contacts: self.total_contacts,
            estimated_duration_days: self.estimated_duration_days,
            first_send_at: self.stages.first().map(|stage| stage.scheduled_at),
            last_send_at: self.stages.last().map(|stage| stage.scheduled_at),
        }
    }
}

/// Derived statistics shown alongside a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub stage_count: u32,
    pub total_contacts: u64,
    pub estimated_duration_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_send_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_send_at: Option<DateTime<Utc>>,
}

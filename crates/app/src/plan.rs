use std::time::Instant;

use axum::{extract::State, Json};
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use sendwarm_contacts::AudienceSelection;
use sendwarm_core::{ScheduleValidator, WarmupConfig, WarmupPlan, WarmupStageGenerator};

use crate::problem::ProblemResponse;
use crate::router::AppState;

/// Body of `POST /warmup/plan`.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub schedule: WarmupConfig,
    #[serde(default)]
    pub audience: AudienceSelection,
}

/// Successful plan computation response.
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    #[serde(flatten)]
    pub plan: WarmupPlan,
    pub audience: AudienceSummary,
}

/// Provenance of the resolved audience total.
#[derive(Debug, Serialize)]
pub struct AudienceSummary {
    pub total: u64,
    /// `false` when the total is the non-deduplicated cached fallback and may
    /// overcount contacts present in more than one selected source.
    pub authoritative: bool,
}

/// Computes a warmup plan for the requested schedule and audience.
///
/// Validation failures block generation and are attributed to the offending
/// field. A degraded audience resolution does not block: the plan is
/// generated from the approximate total and flagged in the response.
pub async fn handle(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, ProblemResponse> {
    let start = Instant::now();

    if let Err(error) = ScheduleValidator::validate(&request.schedule, state.now()) {
        counter!("warmup_plan_requests_total", "result" => "invalid").increment(1);
        return Err(ProblemResponse::from_validation(&error));
    }

    let resolved = state.resolver().resolve(&request.audience).await;
    let path = if resolved.is_authoritative() {
        "authoritative"
    } else {
        "fallback"
    };
    counter!("audience_resolution_total", "path" => path).increment(1);
    if !resolved.is_authoritative() {
        warn!(
            stage = "plan",
            total = resolved.total(),
            "audience resolution degraded to cached sums; total may overcount"
        );
    }

    let plan = WarmupStageGenerator::generate(&request.schedule, resolved.total());
    let summary = plan.summary();
    info!(
        stage = "plan",
        stages = summary.stage_count,
        total_contacts = summary.total_contacts,
        duration_days = summary.estimated_duration_days,
        authoritative = resolved.is_authoritative(),
        "warmup plan generated"
    );

    counter!("warmup_plan_requests_total", "result" => "ok").increment(1);
    histogram!("warmup_plan_latency_seconds").record(start.elapsed().as_secs_f64());

    Ok(Json(PlanResponse {
        plan,
        audience: AudienceSummary {
            total: resolved.total(),
            authoritative: resolved.is_authoritative(),
        },
    }))
}

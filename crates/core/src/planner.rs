use crate::schedule;
use crate::types::{WarmupConfig, WarmupPlan, WarmupStage};

/// Generates warmup plans from a validated config and a resolved audience
/// size.
pub struct WarmupStageGenerator;

impl WarmupStageGenerator {
    /// Produces the ordered send schedule covering `total_contacts`.
    ///
    /// Expects `config` to have passed [`crate::ScheduleValidator`]; a zero
    /// audience yields an empty plan rather than an error. The computation is
    /// pure: identical inputs always produce identical plans, and a plan is
    /// regenerated from scratch whenever either input changes.
    pub fn generate(config: &WarmupConfig, total_contacts: u64) -> WarmupPlan {
        if total_contacts == 0 {
            return WarmupPlan::empty();
        }

        let interval_days = config.interval_days();
        let mut stages = Vec::new();
        let mut cumulative_sent = 0u64;
        let mut day_offset = 0f64;
        for size in batch_sizes(config, total_contacts) {
            cumulative_sent += size;
            stages.push(WarmupStage {
                index: stages.len() as u32,
                batch_size: size,
                cumulative_sent,
                day_offset,
                scheduled_at: schedule::send_time(config.start_at, day_offset),
            });
            day_offset += interval_days;
        }

        let estimated_duration_days = stages
            .last()
            .map(|stage| stage.day_offset.ceil() as u32)
            .unwrap_or(0);

        WarmupPlan {
            stages,
            total_contacts,
            estimated_duration_days,
        }
    }
}

/// Derives the batch-size sequence whose sum is exactly `total_contacts`.
///
/// Sizes grow by `floor(initial * factor^index)` clamped to the ceiling. Once
/// the ceiling is reached the remaining stages are laid out arithmetically
/// instead of stepping the growth loop once per stage, keeping the iteration
/// count bounded when the audience is much larger than the ceiling.
fn batch_sizes(config: &WarmupConfig, total_contacts: u64) -> Vec<u64> {
    let mut sizes = Vec::new();
    let mut sent = 0u64;
    let mut current = config.initial_batch_size;

    while sent < total_contacts {
        if current >= config.max_batch_size {
            let remaining = total_contacts - sent;
            let full_stages = remaining / config.max_batch_size;
            sizes.extend(std::iter::repeat(config.max_batch_size).take(full_stages as usize));
            let remainder = remaining % config.max_batch_size;
            if remainder > 0 {
                sizes.push(remainder);
            }
            break;
        }

        let size = current.min(total_contacts - sent);
        sizes.push(size);
        sent += size;
        current = grown_batch(config, sizes.len() as i32);
    }

    sizes
}

/// Floating-point growth floored to an integer and clamped to the ceiling.
///
/// The comparison happens in `f64` before the cast so values beyond the
/// ceiling never reach integer conversion.
fn grown_batch(config: &WarmupConfig, stage_index: i32) -> u64 {
    let grown =
        (config.initial_batch_size as f64 * config.increment_factor.powi(stage_index)).floor();
    if grown >= config.max_batch_size as f64 {
        config.max_batch_size
    } else {
        grown as u64
    }
}

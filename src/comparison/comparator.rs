//! Response comparison.
//!
//! # States
//! ```text
//! START → QUICK_STATS → SAMPLE_DECISION → [FULL_DIFF] → DONE
//! ```
//!
//! Quick stats are always computed. The full diff only runs when the draw
//! selects it and a secondary response exists, so its CPU cost is paid on the
//! sampled fraction only.

use std::time::Instant;

use crate::comparison::body_diff::first_difference;
use crate::comparison::key_diff::different_keys;
use crate::comparison::record::{ComparisonRecord, FirstDifference, KeyDifferences};
use crate::comparison::sampling::{is_full_comparison, Sampler};
use crate::comparison::stats::response_stats;
use crate::config::ComparisonConfig;
use crate::upstream::UpstreamResponse;

/// Compare a primary response with an optional secondary response.
pub fn compare(
    primary: &UpstreamResponse,
    secondary: Option<&UpstreamResponse>,
    settings: &ComparisonConfig,
    sampler: &dyn Sampler,
) -> ComparisonRecord {
    let start = Instant::now();

    let primary_stats = response_stats(primary);
    let secondary_stats = secondary.map(response_stats);

    let random_draw = sampler.draw();
    let sampled = is_full_comparison(random_draw, settings.sample_percent);

    let (first_difference, different_keys) = if sampled {
        let (body, keys) = full_diff(primary, secondary, settings);
        (Some(body), Some(keys))
    } else {
        (None, None)
    };

    ComparisonRecord {
        primary: primary_stats,
        secondary: secondary_stats,
        sampled,
        sample_percent: settings.sample_percent,
        random_draw,
        first_difference,
        different_keys,
        comparison_duration_seconds: start.elapsed().as_secs_f64(),
    }
}

fn full_diff(
    primary: &UpstreamResponse,
    secondary: Option<&UpstreamResponse>,
    settings: &ComparisonConfig,
) -> (FirstDifference, KeyDifferences) {
    match secondary {
        Some(secondary) => (
            first_difference(&primary.body, &secondary.body),
            different_keys(&primary.body, &secondary.body, settings),
        ),
        None => (FirstDifference::NotApplicable, KeyDifferences::NotApplicable),
    }
}

//! Scalar summary statistics over a windowed level series.

use serde::{Deserialize, Serialize};

use crate::services::aggregation::{ReportingWindow, TimeSeries};

/// Summary statistics for a reporting window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct LevelStatistics {
    /// Highest sampled level in the window, zeros included
    pub max: f64,

    /// Lowest strictly-positive sampled level; 0 when no sample is
    /// positive. Zeros are excluded so coverage gaps do not pin the
    /// minimum to a meaningless 0.
    pub min: f64,

    /// Sum of sampled levels divided by the nominal window length in
    /// days, so partial coverage shows a proportionally low average
    pub average: f64,
}

impl LevelStatistics {
    /// Statistics for a window with no data
    pub fn zero() -> Self {
        Self { max: 0.0, min: 0.0, average: 0.0 }
    }
}

/// Summarize a windowed series.
///
/// Defined for every input: an empty or all-zero series yields zeros, never
/// NaN or infinity. The divisor is the window's nominal day count, not the
/// number of samples present.
pub fn summarize(series: &TimeSeries, window: ReportingWindow) -> LevelStatistics {
    if series.is_empty() {
        return LevelStatistics::zero();
    }

    let mut max = 0.0_f64;
    let mut min_positive: Option<f64> = None;
    let mut sum = 0.0_f64;

    for level in series.values() {
        max = max.max(*level);
        sum += level;
        if *level > 0.0 {
            min_positive = Some(min_positive.map_or(*level, |current| current.min(*level)));
        }
    }

    // Window lengths are nonzero by construction of the enum
    let average = sum / window.days() as f64;

    LevelStatistics {
        max,
        min: min_positive.unwrap_or(0.0),
        average,
    }
}

//! First-order exponential decay model.
//!
//! Computes the residual level contributed by a single dose at a later
//! instant. Pure and side-effect free; callers compose it across the full
//! injection history.

use chrono::{DateTime, Utc};

/// Residual level of a single dose at instant `at`.
///
/// `level = dose_mg * 0.5 ^ (elapsed_minutes / half_life_minutes)`
///
/// Elapsed time and half-life are both in minutes. A dose contributes
/// nothing before it is administered. Non-positive (or NaN) dose or
/// half-life values make the dose inert, contributing zero at all times
/// rather than raising an error, since a single bad historical record must
/// not break the aggregate view.
pub fn residual_level(
    dose_mg: f64,
    half_life_minutes: f64,
    administered_at: DateTime<Utc>,
    at: DateTime<Utc>,
) -> f64 {
    if !(dose_mg > 0.0) || !(half_life_minutes > 0.0) {
        return 0.0;
    }
    if at < administered_at {
        return 0.0;
    }

    let elapsed_minutes = (at - administered_at).num_seconds() as f64 / 60.0;
    dose_mg * 0.5_f64.powf(elapsed_minutes / half_life_minutes)
}

//! Aggregation engine for active-level time series.
//!
//! Converts the full injection history into per-medication daily series
//! plus an optional per-class aggregate series (e.g. "Total T" summing all
//! testosterone esters). Decay is always integrated over the full fixed
//! horizon; reporting windows only truncate the result for display.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::injection::InjectionEvent;
use crate::services::decay;

/// Longest supported reporting window; the sample grid always spans this
/// many days so switching windows never changes computed levels.
pub const MAX_HORIZON_DAYS: i64 = 365;

/// Daily level series keyed by calendar date
pub type TimeSeries = BTreeMap<NaiveDate, f64>;

/// User-selectable trailing reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ReportingWindow {
    /// Trailing 7 days
    Week,
    /// Trailing 30 days
    Month,
    /// Trailing 90 days
    Quarter,
    /// Trailing 365 days
    Year,
}

impl ReportingWindow {
    /// Nominal window length in days
    pub fn days(&self) -> u32 {
        match self {
            ReportingWindow::Week => 7,
            ReportingWindow::Month => 30,
            ReportingWindow::Quarter => 90,
            ReportingWindow::Year => 365,
        }
    }

}

impl std::str::FromStr for ReportingWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" => Ok(ReportingWindow::Week),
            "month" => Ok(ReportingWindow::Month),
            "quarter" => Ok(ReportingWindow::Quarter),
            "year" => Ok(ReportingWindow::Year),
            _ => Err(format!("Unknown reporting window: {}", s)),
        }
    }
}

/// Grouping predicate deciding which medication series are summed into an
/// aggregate series. Configured with a label and an arbitrary name
/// predicate so new medications group correctly without code changes.
#[derive(Clone)]
pub struct MedicationClass {
    label: String,
    predicate: Arc<dyn Fn(&str) -> bool + Send + Sync>,
}

impl MedicationClass {
    /// Create a class from a label and an arbitrary name predicate
    pub fn new(label: impl Into<String>, predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Create a class matching names that contain `needle`, case-insensitive
    pub fn name_contains(label: impl Into<String>, needle: impl Into<String>) -> Self {
        let needle = needle.into().to_lowercase();
        Self::new(label, move |name: &str| name.to_lowercase().contains(&needle))
    }

    /// The testosterone ester class used by the dashboard
    pub fn testosterone() -> Self {
        Self::name_contains("Total T", "testosterone")
    }

    /// Label used for the aggregate series
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether a medication name belongs to this class
    pub fn matches(&self, medication_name: &str) -> bool {
        (self.predicate)(medication_name)
    }
}

impl fmt::Debug for MedicationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MedicationClass")
            .field("label", &self.label)
            .finish()
    }
}

/// Aggregate series for a medication class
#[derive(Debug, Clone)]
pub struct AggregateSeries {
    /// Display label for the aggregate (e.g. "Total T")
    pub label: String,

    /// Pointwise sum of the member medication series
    pub series: TimeSeries,
}

/// Per-medication and aggregate series over a common daily grid
#[derive(Debug, Clone)]
pub struct SeriesSet {
    /// One series per medication name observed anywhere in the history
    pub by_medication: BTreeMap<String, TimeSeries>,

    /// Aggregate class series, present only when two or more distinct
    /// medications belong to the class
    pub aggregate: Option<AggregateSeries>,

    /// Distinct medication names matching the class predicate
    class_members: Vec<String>,

    /// Last date of the sample grid (the as-of date)
    end_date: NaiveDate,
}

impl SeriesSet {
    /// Whether the history produced any series at all
    pub fn is_empty(&self) -> bool {
        self.by_medication.is_empty()
    }

    /// The series statistics should be derived from: the aggregate when it
    /// exists, else the single class member's own series.
    pub fn statistics_source(&self) -> Option<&TimeSeries> {
        if let Some(aggregate) = &self.aggregate {
            return Some(&aggregate.series);
        }
        match self.class_members.as_slice() {
            [only] => self.by_medication.get(only),
            _ => None,
        }
    }

    /// Truncate every series to the trailing window ending at the as-of
    /// date. A filter over the full-horizon grid; levels are never
    /// recomputed here.
    pub fn windowed(&self, window: ReportingWindow) -> SeriesSet {
        let start = self.end_date - Duration::days(window.days() as i64 - 1);

        let truncate = |series: &TimeSeries| -> TimeSeries {
            series
                .range(start..=self.end_date)
                .map(|(date, level)| (*date, *level))
                .collect()
        };

        SeriesSet {
            by_medication: self
                .by_medication
                .iter()
                .map(|(name, series)| (name.clone(), truncate(series)))
                .collect(),
            aggregate: self.aggregate.as_ref().map(|aggregate| AggregateSeries {
                label: aggregate.label.clone(),
                series: truncate(&aggregate.series),
            }),
            class_members: self.class_members.clone(),
            end_date: self.end_date,
        }
    }
}

/// A validated dosing record ready for decay computation
struct DoseRecord {
    medication_name: String,
    dosage_mg: f64,
    half_life_minutes: f64,
    administered_at: DateTime<Utc>,
}

/// Extract computable dose records from the history. Events with a
/// non-positive dose or half-life, or an unparsable timestamp, are inert:
/// they stay in history but contribute zero to every level.
fn normalize_history(history: &[InjectionEvent]) -> Vec<DoseRecord> {
    history
        .iter()
        .filter_map(|event| {
            if !(event.dosage_mg > 0.0) || !(event.half_life_minutes > 0.0) {
                debug!("Skipping inert injection event {}", event.id);
                return None;
            }
            match DateTime::parse_from_rfc3339(&event.timestamp) {
                Ok(timestamp) => Some(DoseRecord {
                    medication_name: event.medication_name.clone(),
                    dosage_mg: event.dosage_mg,
                    half_life_minutes: event.half_life_minutes,
                    administered_at: timestamp.with_timezone(&Utc),
                }),
                Err(e) => {
                    debug!("Skipping injection event {} with unparsable timestamp: {}", event.id, e);
                    None
                }
            }
        })
        .collect()
}

/// Instant a calendar day is sampled at. Every day is sampled at 12:00 UTC
/// uniformly, so a day's sample reflects doses administered that morning
/// while doses later the same day first appear on the following sample.
fn sample_instant(day: NaiveDate) -> DateTime<Utc> {
    let noon = day
        .and_hms_opt(12, 0, 0)
        .unwrap_or_else(|| day.and_time(NaiveTime::MIN));
    Utc.from_utc_datetime(&noon)
}

/// Compute per-medication daily series over the full fixed horizon, plus
/// the class aggregate when applicable.
///
/// Every medication name observed anywhere in the history appears in the
/// output, even with no dose inside any window, so charts stay continuous.
/// The grid spans `MAX_HORIZON_DAYS` days ending at `as_of`; doses before
/// the grid still contribute their residual level inside it.
pub fn compute_series(
    history: &[InjectionEvent],
    class: &MedicationClass,
    as_of: DateTime<Utc>,
) -> SeriesSet {
    let end_date = as_of.date_naive();
    let start_date = end_date - Duration::days(MAX_HORIZON_DAYS);

    let names: BTreeSet<String> = history
        .iter()
        .map(|event| event.medication_name.clone())
        .collect();
    let records = normalize_history(history);

    debug!(
        "Computing series for {} medications over {} dose records",
        names.len(),
        records.len()
    );

    // Zero-filled grid for every observed medication
    let mut by_medication: BTreeMap<String, TimeSeries> = names
        .iter()
        .map(|name| {
            let series: TimeSeries = start_date
                .iter_days()
                .take_while(|day| *day <= end_date)
                .map(|day| (day, 0.0))
                .collect();
            (name.clone(), series)
        })
        .collect();

    for record in &records {
        if let Some(series) = by_medication.get_mut(&record.medication_name) {
            for (day, level) in series.iter_mut() {
                *level += decay::residual_level(
                    record.dosage_mg,
                    record.half_life_minutes,
                    record.administered_at,
                    sample_instant(*day),
                );
            }
        }
    }

    let class_members: Vec<String> = names
        .iter()
        .filter(|name| class.matches(name))
        .cloned()
        .collect();

    // An aggregate only makes sense when there is something to sum
    let aggregate = if class_members.len() >= 2 {
        let mut summed: TimeSeries = start_date
            .iter_days()
            .take_while(|day| *day <= end_date)
            .map(|day| (day, 0.0))
            .collect();

        for member in &class_members {
            if let Some(series) = by_medication.get(member) {
                for (day, level) in series {
                    if let Some(total) = summed.get_mut(day) {
                        *total += level;
                    }
                }
            }
        }

        Some(AggregateSeries {
            label: class.label().to_string(),
            series: summed,
        })
    } else {
        None
    };

    SeriesSet {
        by_medication,
        aggregate,
        class_members,
        end_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const EPSILON: f64 = 1e-6;

    /// 24h in minutes
    const DAY_MINUTES: f64 = 1440.0;

    fn event(name: &str, dosage_mg: f64, half_life_days: f64, timestamp: &str) -> InjectionEvent {
        InjectionEvent {
            id: Uuid::new_v4().to_string(),
            medication_name: name.to_string(),
            dosage_mg,
            timestamp: timestamp.to_string(),
            half_life_minutes: half_life_days * DAY_MINUTES,
            site: None,
            notes: None,
            rating: None,
        }
    }

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_history_produces_empty_series() {
        let set = compute_series(&[], &MedicationClass::testosterone(), as_of());
        assert!(set.is_empty());
        assert!(set.aggregate.is_none());
        assert!(set.statistics_source().is_none());
    }

    #[test]
    fn test_single_medication_has_no_aggregate() {
        let history = vec![event("Testosterone Enanthate", 200.0, 5.0, "2024-06-20T12:00:00Z")];
        let set = compute_series(&history, &MedicationClass::testosterone(), as_of());

        assert_eq!(set.by_medication.len(), 1);
        assert!(set.aggregate.is_none());

        // Statistics fall back to the single class member's own series
        assert!(set.statistics_source().is_some());
    }

    #[test]
    fn test_levels_follow_half_life() {
        // Dose at noon June 20; half-life 5 days => ~100 on June 25, ~50 on June 30
        let history = vec![event("Testosterone Enanthate", 200.0, 5.0, "2024-06-20T12:00:00Z")];
        let set = compute_series(&history, &MedicationClass::testosterone(), as_of());

        let series = &set.by_medication["Testosterone Enanthate"];
        let day0 = NaiveDate::from_ymd_opt(2024, 6, 20).unwrap();
        let day5 = NaiveDate::from_ymd_opt(2024, 6, 25).unwrap();
        let day10 = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

        assert!((series[&day0] - 200.0).abs() < EPSILON);
        assert!((series[&day5] - 100.0).abs() < EPSILON);
        assert!((series[&day10] - 50.0).abs() < EPSILON);

        // The day before administration samples zero
        let before = NaiveDate::from_ymd_opt(2024, 6, 19).unwrap();
        assert_eq!(series[&before], 0.0);
    }

    #[test]
    fn test_aggregate_is_pointwise_sum_of_members() {
        let history = vec![
            event("TestA Testosterone", 100.0, 4.0, "2024-06-26T12:00:00Z"),
            event("TestB Testosterone", 150.0, 8.0, "2024-06-26T12:00:00Z"),
        ];
        let set = compute_series(&history, &MedicationClass::testosterone(), as_of());

        let aggregate = set.aggregate.as_ref().expect("two class members must aggregate");
        assert_eq!(aggregate.label, "Total T");

        let a = &set.by_medication["TestA Testosterone"];
        let b = &set.by_medication["TestB Testosterone"];
        for (day, total) in &aggregate.series {
            assert!((total - (a[day] + b[day])).abs() < EPSILON);
        }

        // Four days in: TestA at one full half-life, TestB at half of one
        let day4 = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert!((a[&day4] - 50.0).abs() < EPSILON);
        assert!((b[&day4] - 150.0 * 0.5_f64.powf(0.5)).abs() < EPSILON);
        assert!((aggregate.series[&day4] - (a[&day4] + b[&day4])).abs() < EPSILON);
    }

    #[test]
    fn test_dose_before_window_contributes_inside_window() {
        // Dosed 10 days before as_of; a week window still sees the residual
        let history = vec![event("Testosterone Cypionate", 200.0, 5.0, "2024-06-20T12:00:00Z")];
        let set = compute_series(&history, &MedicationClass::testosterone(), as_of());
        let windowed = set.windowed(ReportingWindow::Week);

        let series = &windowed.by_medication["Testosterone Cypionate"];
        assert_eq!(series.len(), 7);
        for level in series.values() {
            assert!(*level > 0.0, "residual level from an older dose must appear in the window");
        }
    }

    #[test]
    fn test_medication_without_window_doses_still_listed() {
        let history = vec![
            event("Testosterone Enanthate", 200.0, 5.0, "2024-06-29T12:00:00Z"),
            // Last dosed months ago, fully decayed by now
            event("Anastrozole", 1.0, 2.0, "2024-01-15T12:00:00Z"),
        ];
        let set = compute_series(&history, &MedicationClass::testosterone(), as_of());
        let windowed = set.windowed(ReportingWindow::Week);

        let series = windowed
            .by_medication
            .get("Anastrozole")
            .expect("medication with no dose in the window must still appear");
        assert_eq!(series.len(), 7);
        for level in series.values() {
            assert!(*level >= 0.0 && *level < 1e-3);
        }
    }

    #[test]
    fn test_inert_events_contribute_zero_but_name_appears() {
        let history = vec![
            event("Testosterone Enanthate", 200.0, 0.0, "2024-06-29T12:00:00Z"),
            event("Testosterone Enanthate", -10.0, 5.0, "2024-06-29T12:00:00Z"),
            event("Testosterone Enanthate", 100.0, 5.0, "not a timestamp"),
        ];
        let set = compute_series(&history, &MedicationClass::testosterone(), as_of());

        let series = &set.by_medication["Testosterone Enanthate"];
        assert!(series.values().all(|level| *level == 0.0));
    }

    #[test]
    fn test_delete_equals_never_inserted() {
        let kept = event("Testosterone Enanthate", 200.0, 5.0, "2024-06-20T12:00:00Z");
        let deleted = event("Testosterone Enanthate", 150.0, 5.0, "2024-06-25T12:00:00Z");

        let class = MedicationClass::testosterone();
        let with_both = compute_series(&[kept.clone(), deleted], &class, as_of());
        let recomputed = compute_series(&[kept.clone()], &class, as_of());
        let never_inserted = compute_series(&[kept], &class, as_of());

        assert_eq!(
            recomputed.by_medication["Testosterone Enanthate"],
            never_inserted.by_medication["Testosterone Enanthate"],
        );
        // And the deleted dose really did affect the original
        assert_ne!(
            with_both.by_medication["Testosterone Enanthate"],
            recomputed.by_medication["Testosterone Enanthate"],
        );
    }

    #[test]
    fn test_grid_spans_full_horizon() {
        let history = vec![event("Testosterone Enanthate", 200.0, 5.0, "2024-06-20T12:00:00Z")];
        let set = compute_series(&history, &MedicationClass::testosterone(), as_of());

        let series = &set.by_medication["Testosterone Enanthate"];
        assert_eq!(series.len(), MAX_HORIZON_DAYS as usize + 1);
        assert_eq!(*series.keys().next_back().unwrap(), as_of().date_naive());
    }

    #[test]
    fn test_windowed_truncates_without_recomputing() {
        let history = vec![event("Testosterone Enanthate", 200.0, 5.0, "2024-06-20T12:00:00Z")];
        let set = compute_series(&history, &MedicationClass::testosterone(), as_of());
        let windowed = set.windowed(ReportingWindow::Month);

        let full = &set.by_medication["Testosterone Enanthate"];
        let truncated = &windowed.by_medication["Testosterone Enanthate"];
        assert_eq!(truncated.len(), 30);
        for (day, level) in truncated {
            assert_eq!(level, &full[day]);
        }
    }

    #[test]
    fn test_reporting_window_parses_from_str() {
        assert_eq!("week".parse::<ReportingWindow>().unwrap(), ReportingWindow::Week);
        assert_eq!("MONTH".parse::<ReportingWindow>().unwrap(), ReportingWindow::Month);
        assert_eq!("quarter".parse::<ReportingWindow>().unwrap(), ReportingWindow::Quarter);
        assert_eq!("year".parse::<ReportingWindow>().unwrap(), ReportingWindow::Year);
        assert!("fortnight".parse::<ReportingWindow>().is_err());
    }

    #[test]
    fn test_class_predicate_is_configurable() {
        let class = MedicationClass::name_contains("Total E", "estradiol");
        assert!(class.matches("Estradiol Valerate"));
        assert!(!class.matches("Testosterone Enanthate"));

        let custom = MedicationClass::new("Short acting", |name| name.ends_with("Propionate"));
        assert!(custom.matches("Testosterone Propionate"));
        assert!(!custom.matches("Testosterone Enanthate"));
    }
}

//! Approximate progress percentages reported during runs.
//!
//! These formulas are indicative UX signals, not completion fractions other
//! components may rely on for correctness: the true item totals are unknown
//! while scrolling and sweeping.

/// Flat percent reported during the scroll-and-identify phase; the growing
/// unique-item count travels in the sub-status text instead.
pub const SCAN_PERCENT: f64 = 30.0;

const ANALYSIS_BASE: f64 = 50.0;
const ANALYSIS_SPAN: f64 = 40.0;

/// Percent reported while analyzing item `index` of `total` pending items.
/// The analysis phase occupies the 50-90 band.
pub fn analysis_percent(index: usize, total: usize) -> f64 {
    if total == 0 {
        return ANALYSIS_BASE;
    }
    ANALYSIS_BASE + (index as f64 / total as f64) * ANALYSIS_SPAN
}

/// Percent reported after `total_processed` sweep actions, capped at 98
/// because the true item count is unknown up front.
pub fn sweep_percent(total_processed: u64) -> f64 {
    (total_processed as f64 * 2.0).min(98.0)
}

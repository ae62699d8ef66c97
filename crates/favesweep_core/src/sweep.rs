use std::collections::HashSet;

/// Consecutive unchanged-extent passes required before an action-free pass
/// terminates the sweep.
pub const UNCHANGED_PASSES_TO_STOP: u32 = 2;

/// Accumulator owned by exactly one sweep run.
///
/// `processed` grows monotonically within the run. Together with the
/// caller's per-item "clicked" flag it prevents double-counting one logical
/// item when both the direct action and the removal fallback could apply.
#[derive(Debug, Clone, Default)]
pub struct SweepState {
    processed: HashSet<String>,
    total_processed: u64,
}

impl SweepState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an identity as handled. Returns true only the first time an id
    /// is seen; the removal fallback must not fire for ids seen before.
    pub fn mark_processed(&mut self, id: &str) -> bool {
        self.processed.insert(id.to_string())
    }

    /// Counts one performed action (direct interaction or remote removal).
    pub fn count_action(&mut self) {
        self.total_processed += 1;
    }

    /// Total actions performed over the whole run.
    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }
}

/// Pass-level termination rule for the sweep loop.
///
/// Removal can keep the visible set non-growing while new items are still
/// revealed underneath, so stopping requires both "zero actions this pass"
/// and an extent unchanged for at least [`UNCHANGED_PASSES_TO_STOP`]
/// consecutive passes. The baseline starts at zero, so a first pass over a
/// real surface never counts as unchanged.
#[derive(Debug, Clone, Default)]
pub struct SweepTracker {
    last_extent: f64,
    unchanged_passes: u32,
}

impl SweepTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the extent observed at the end of a pass and reports whether
    /// the sweep is finished.
    pub fn finish_pass(&mut self, actions_taken: u32, extent: f64) -> bool {
        if extent == self.last_extent {
            self.unchanged_passes += 1;
        } else {
            self.unchanged_passes = 0;
            self.last_extent = extent;
        }
        actions_taken == 0 && self.unchanged_passes >= UNCHANGED_PASSES_TO_STOP
    }

    /// Consecutive passes with unchanged extent so far.
    pub fn unchanged_passes(&self) -> u32 {
        self.unchanged_passes
    }
}

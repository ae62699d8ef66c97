/// Outcome of one extent measurement taken after a scroll advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollVerdict {
    /// The surface grew; baseline updated, idle count reset.
    Grew,
    /// Extent unchanged. When `nudge` is set the driver should wiggle the
    /// surface to break a lazy-load stall.
    Stalled { nudge: bool },
}

/// Consecutive-idle termination policy for the harvest scroll loop.
///
/// A single unchanged-extent check produces false positives on pages that
/// materialize content after a short delay, so scrolling only stops after
/// `max_idle_scrolls` consecutive idle measurements, with corrective nudges
/// requested from the second consecutive idle onward.
#[derive(Debug, Clone)]
pub struct IdleTracker {
    baseline: f64,
    idle_count: u32,
    max_idle_scrolls: u32,
}

impl IdleTracker {
    /// Starts tracking from the extent measured before the first advance.
    pub fn new(max_idle_scrolls: u32, initial_extent: f64) -> Self {
        Self {
            baseline: initial_extent,
            idle_count: 0,
            max_idle_scrolls,
        }
    }

    /// Whether the consecutive-idle threshold has been reached.
    pub fn exhausted(&self) -> bool {
        self.idle_count >= self.max_idle_scrolls
    }

    /// Applies one post-advance extent measurement.
    ///
    /// Every stall from the second consecutive idle onward requests a
    /// nudge, the measurement that reaches the threshold included.
    pub fn observe(&mut self, extent: f64) -> ScrollVerdict {
        if extent == self.baseline {
            self.idle_count += 1;
            ScrollVerdict::Stalled {
                nudge: self.idle_count > 1,
            }
        } else {
            self.idle_count = 0;
            self.baseline = extent;
            ScrollVerdict::Grew
        }
    }

    /// Consecutive idle measurements so far.
    pub fn idle_count(&self) -> u32 {
        self.idle_count
    }

    /// The threshold this tracker terminates at.
    pub fn max_idle_scrolls(&self) -> u32 {
        self.max_idle_scrolls
    }
}

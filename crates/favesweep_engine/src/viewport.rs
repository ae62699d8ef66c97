use std::time::Duration;

use engine_logging::engine_debug;

use crate::traits::{PageSurface, SurfaceRef};

/// Distance of the backward-then-forward nudge, in scroll units.
const NUDGE_DISTANCE: f64 = 100.0;
/// Pause between the two halves of a nudge, letting layout settle.
const NUDGE_PAUSE: Duration = Duration::from_millis(300);

/// Drives the scrollable surface for one run.
///
/// The surface handle is resolved once and reused. Advances move by half
/// the viewport height, so lazily rendered rows overlap between ticks
/// instead of being skipped past.
pub struct ViewportDriver<'a> {
    page: &'a dyn PageSurface,
    surface: SurfaceRef,
    step: f64,
}

impl<'a> ViewportDriver<'a> {
    pub async fn resolve(page: &'a dyn PageSurface) -> ViewportDriver<'a> {
        let surface = page.find_scroll_surface().await;
        let step = page.viewport_height().await / 2.0;
        engine_debug!("viewport: resolved {surface:?}, advance step {step}");
        Self {
            page,
            surface,
            step,
        }
    }

    pub async fn extent(&self) -> f64 {
        self.page.extent(self.surface).await
    }

    /// Scrolls forward by half the viewport height.
    pub async fn advance(&self) {
        self.page.scroll_by(self.surface, self.step).await;
    }

    /// Backward-then-forward wiggle that prods a stalled lazy loader into
    /// rendering the next rows.
    pub async fn nudge(&self) {
        engine_debug!("viewport: nudging stalled surface");
        self.page.scroll_by(self.surface, -NUDGE_DISTANCE).await;
        tokio::time::sleep(NUDGE_PAUSE).await;
        self.page.scroll_by(self.surface, NUDGE_DISTANCE).await;
    }
}

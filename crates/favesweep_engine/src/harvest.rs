use engine_logging::{engine_debug, engine_info};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use favesweep_core::{
    HarvestMode, HarvestState, IdleTracker, MediaRecord, ScrollVerdict, SCAN_PERCENT,
};

use crate::analysis::run_analysis;
use crate::settings::RunSettings;
use crate::traits::{AnalysisService, PageSurface, ProgressSink};
use crate::types::HarvestError;
use crate::viewport::ViewportDriver;

/// Two-phase harvest: scroll the feed to identify every item, then resolve
/// each identity through the analysis collaborator.
pub struct HarvestEngine<'a> {
    page: &'a dyn PageSurface,
    analysis: &'a dyn AnalysisService,
    progress: &'a dyn ProgressSink,
    settings: &'a RunSettings,
}

impl<'a> HarvestEngine<'a> {
    pub fn new(
        page: &'a dyn PageSurface,
        analysis: &'a dyn AnalysisService,
        progress: &'a dyn ProgressSink,
        settings: &'a RunSettings,
    ) -> Self {
        Self {
            page,
            analysis,
            progress,
            settings,
        }
    }

    /// Runs a full harvest and returns the media records kept by `mode`,
    /// in the order their URLs were first resolved.
    ///
    /// Cancellation during the scroll phase fails the run: identities
    /// without analysis are of no use. Cancellation during analysis stops
    /// between items and returns what resolved so far.
    pub async fn run(
        &self,
        mode: HarvestMode,
        cancel: &CancellationToken,
    ) -> Result<Vec<MediaRecord>, HarvestError> {
        let mut state = HarvestState::new();
        self.scan(&mut state, cancel).await?;

        let pending = state.take_pending();
        run_analysis(
            self.analysis,
            self.progress,
            self.settings,
            cancel,
            &pending,
            &mut state.ledger,
        )
        .await;

        engine_info!(
            "harvest done: {} media records from {} items",
            state.ledger.len(),
            pending.len()
        );
        Ok(state.ledger.into_mode(mode))
    }

    /// Scroll phase: enumerate rendered items, record first-seen
    /// identities, advance, and stop once the extent goes idle.
    async fn scan(
        &self,
        state: &mut HarvestState,
        cancel: &CancellationToken,
    ) -> Result<(), HarvestError> {
        let driver = ViewportDriver::resolve(self.page).await;
        let mut tracker = IdleTracker::new(self.settings.max_idle_scrolls, driver.extent().await);

        while !tracker.exhausted() {
            if cancel.is_cancelled() {
                engine_info!(
                    "scan cancelled after {} unique items",
                    state.unique_seen()
                );
                return Err(HarvestError::Cancelled);
            }

            for item in self.page.visible_items(&self.settings.selectors.item).await {
                if let Some(descriptor) = self.page.extract_identity(item).await {
                    state.observe(descriptor);
                }
            }

            self.progress.set_percent(SCAN_PERCENT);
            self.progress.set_sub_status(&format!(
                "Scanning... identified {} unique items",
                state.unique_seen()
            ));

            driver.advance().await;
            sleep(self.settings.scroll_delay).await;

            match tracker.observe(driver.extent().await) {
                ScrollVerdict::Grew => {}
                ScrollVerdict::Stalled { nudge } => {
                    engine_debug!(
                        "scan: extent unchanged ({}/{})",
                        tracker.idle_count(),
                        tracker.max_idle_scrolls()
                    );
                    if nudge {
                        driver.nudge().await;
                    }
                }
            }
        }

        engine_info!("scan complete: {} unique items queued", state.unique_seen());
        Ok(())
    }
}

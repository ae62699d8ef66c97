use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use favesweep_core::{sweep_percent, SweepState, SweepTracker};

use crate::settings::RunSettings;
use crate::traits::{PageSurface, ProgressSink, RemovalService};
use crate::viewport::ViewportDriver;

/// Settle time after invoking a direct action control, letting the feed
/// react before the next item is touched.
const CLICK_SETTLE: Duration = Duration::from_millis(300);

/// Destructive sweep: removes every item it encounters, preferring the
/// in-page action control and falling back to the removal collaborator.
pub struct SweepEngine<'a> {
    page: &'a dyn PageSurface,
    removal: &'a dyn RemovalService,
    progress: &'a dyn ProgressSink,
    settings: &'a RunSettings,
}

impl<'a> SweepEngine<'a> {
    pub fn new(
        page: &'a dyn PageSurface,
        removal: &'a dyn RemovalService,
        progress: &'a dyn ProgressSink,
        settings: &'a RunSettings,
    ) -> Self {
        Self {
            page,
            removal,
            progress,
            settings,
        }
    }

    /// Sweeps until a pass takes no actions while the extent has stopped
    /// changing, or until cancelled. Returns the number of removal actions
    /// taken; a sweep never fails outright.
    pub async fn run(&self, cancel: &CancellationToken) -> u64 {
        let driver = ViewportDriver::resolve(self.page).await;
        let mut state = SweepState::new();
        let mut tracker = SweepTracker::new();

        while !cancel.is_cancelled() {
            let items = self
                .page
                .visible_items(&self.settings.selectors.sweep_item)
                .await;
            let mut actions_this_pass: u32 = 0;

            for item in items {
                if cancel.is_cancelled() {
                    break;
                }

                let mut clicked = false;
                if let Some(control) = self
                    .page
                    .find_action_control(item, &self.settings.selectors.action_control)
                    .await
                {
                    self.page.invoke(control).await;
                    clicked = true;
                    actions_this_pass += 1;
                    state.count_action();
                    sleep(CLICK_SETTLE).await;
                }

                // The identity-keyed fallback fires once per id, and only
                // when no control handled the item directly.
                if let Some(descriptor) = self.page.extract_identity(item).await {
                    if !descriptor.id.is_empty() && state.mark_processed(&descriptor.id) {
                        if !clicked {
                            if let Err(err) = self.removal.remove(&descriptor.id).await {
                                engine_warn!("removal failed for {}: {err}", descriptor.id);
                            }
                            actions_this_pass += 1;
                            state.count_action();
                            sleep(self.settings.unfavorite_delay).await;
                        }
                    }
                }

                self.progress
                    .set_percent(sweep_percent(state.total_processed()));
                self.progress
                    .set_sub_status(&format!("Unfavorited {} items", state.total_processed()));
            }

            if tracker.finish_pass(actions_this_pass, driver.extent().await) {
                break;
            }

            driver.advance().await;
            sleep(self.settings.scroll_delay).await;
        }

        engine_info!("sweep finished: {} actions taken", state.total_processed());
        state.total_processed()
    }
}

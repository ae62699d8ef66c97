use engine_logging::{engine_info, engine_warn};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use favesweep_core::{analysis_percent, ItemDescriptor, MediaLedger, MediaRecord};

use crate::settings::RunSettings;
use crate::traits::{AnalysisService, ProgressSink};

/// Analysis phase: resolves queued descriptors one at a time, in
/// first-seen order, pacing every request.
///
/// A failed item is logged and contributes nothing. Cancellation stops
/// the pipeline between items; media already in the ledger stays.
pub(crate) async fn run_analysis(
    service: &dyn AnalysisService,
    progress: &dyn ProgressSink,
    settings: &RunSettings,
    cancel: &CancellationToken,
    pending: &[ItemDescriptor],
    ledger: &mut MediaLedger,
) {
    let total = pending.len();
    for (index, descriptor) in pending.iter().enumerate() {
        if cancel.is_cancelled() {
            engine_info!("analysis cancelled after {index} of {total} items");
            break;
        }

        progress.set_percent(analysis_percent(index, total));
        progress.set_sub_status(&format!(
            "Analyzing {} ({}/{})",
            descriptor.id,
            index + 1,
            total
        ));

        match service.analyze(&descriptor.id, &descriptor.url).await {
            Ok(hits) => {
                for hit in hits {
                    if hit.url.is_empty() {
                        continue;
                    }
                    ledger.insert(MediaRecord::new(hit.id, hit.url, hit.kind));
                }
            }
            Err(err) => {
                engine_warn!("analysis failed for {}: {err}", descriptor.id);
            }
        }

        // Pacing applies after failures as well.
        sleep(settings.analysis_delay).await;
    }
}

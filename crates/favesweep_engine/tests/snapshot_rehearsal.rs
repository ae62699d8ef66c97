use std::collections::HashMap;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use favesweep_core::HarvestMode;
use favesweep_engine::{
    HarvestEngine, LogProgressSink, OfflineAnalysis, OfflineRemoval, RunSettings, Selectors,
    SnapshotSurface, SweepEngine,
};

/// Captured feed markup: eight rows rendered lazily plus two deferred
/// rows that only a nudge shakes loose. One row carries no identity.
const FEED_FIXTURE: &str = r#"
<html>
<body data-initial-visible="3" data-reveal-batch="3">
  <main>
    <div data-item-id="p1" data-url="https://cdn.test/p1.jpg">
      <button data-action="unfavorite"></button>
    </div>
    <div data-item-id="p2" data-url="https://cdn.test/p2.jpg"></div>
    <div data-item-id="" data-url="https://cdn.test/ghost.jpg"></div>
    <div data-item-id="p3" data-url="https://cdn.test/p3.jpg">
      <button data-action="unfavorite"></button>
    </div>
    <div data-item-id="v1" data-url="https://cdn.test/v1.mp4"></div>
    <div data-item-id="p4" data-url="https://cdn.test/p4.jpg">
      <button data-action="unfavorite"></button>
    </div>
    <div data-item-id="p5" data-url="https://cdn.test/p5.jpg"></div>
    <div data-item-id="p6" data-url="https://cdn.test/p6.jpg">
      <button data-action="unfavorite"></button>
    </div>
    <div data-item-id="d1" data-url="https://cdn.test/d1.jpg" data-deferred>
      <button data-action="unfavorite"></button>
    </div>
    <div data-item-id="d2" data-url="https://cdn.test/d2.mp4" data-deferred></div>
  </main>
</body>
</html>
"#;

fn fast_settings() -> RunSettings {
    RunSettings {
        scroll_delay: Duration::from_millis(1),
        analysis_delay: Duration::from_millis(1),
        unfavorite_delay: Duration::from_millis(1),
        ..RunSettings::default()
    }
}

fn fixture_surface() -> SnapshotSurface {
    SnapshotSurface::from_html(FEED_FIXTURE, &Selectors::default()).expect("fixture parses")
}

#[tokio::test]
async fn harvest_reaches_deferred_rows_through_the_nudge() {
    let surface = fixture_surface();
    assert_eq!(surface.surface_label(), "main");

    let analysis = OfflineAnalysis;
    let sink = LogProgressSink;
    let settings = fast_settings();
    let engine = HarvestEngine::new(&surface, &analysis, &sink, &settings);

    let records = engine
        .run(HarvestMode::All, &CancellationToken::new())
        .await
        .expect("harvest ok");

    let filenames: HashMap<&str, &str> = records
        .iter()
        .map(|record| (record.id.as_str(), record.filename.as_str()))
        .collect();

    // Nine identified rows: the ghost row has no identity, and the two
    // deferred rows only rendered after the stall nudge.
    assert_eq!(records.len(), 9);
    assert_eq!(records[0].id, "p1");
    assert_eq!(filenames["d1"], "d1.jpg");
    assert_eq!(filenames["d2"], "d2.mp4");
    assert_eq!(filenames["v1"], "v1.mp4");
    assert_eq!(filenames["p1"], "p1.jpg");
}

#[tokio::test]
async fn harvest_video_mode_keeps_only_video_records() {
    let surface = fixture_surface();
    let analysis = OfflineAnalysis;
    let sink = LogProgressSink;
    let settings = fast_settings();
    let engine = HarvestEngine::new(&surface, &analysis, &sink, &settings);

    let records = engine
        .run(HarvestMode::Videos, &CancellationToken::new())
        .await
        .expect("harvest ok");

    let filenames: Vec<&str> = records.iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(filenames, vec!["v1.mp4", "d2.mp4"]);
}

#[tokio::test]
async fn sweep_clears_every_reachable_row_once() {
    let surface = fixture_surface();
    let removal = OfflineRemoval::new();
    let sink = LogProgressSink;
    let settings = fast_settings();
    let engine = SweepEngine::new(&surface, &removal, &sink, &settings);

    let total = engine.run(&CancellationToken::new()).await;

    // Four rows go through their own control, three through the removal
    // service. The ghost row is unreachable and the deferred rows never
    // render without a nudge, which sweeping does not perform.
    assert_eq!(total, 7);
    assert_eq!(removal.calls(), 3);
}

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use engine_logging::{engine_debug, engine_info, engine_warn};
use scraper::{Html, Selector};

use favesweep_core::{ItemDescriptor, MediaKind};

use crate::settings::Selectors;
use crate::traits::{
    AnalysisService, ControlRef, ItemRef, PageSurface, RemovalService, SurfaceRef,
};
use crate::types::{MediaHit, ServiceError};

/// Nominal rendered height of one feed row, in scroll units.
const ROW_HEIGHT: f64 = 220.0;
/// Rows rendered before any scrolling when the fixture does not say.
const DEFAULT_INITIAL_ROWS: usize = 6;
/// Rows each forward scroll reveals when the fixture does not say.
const DEFAULT_REVEAL_BATCH: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("invalid selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },
}

#[derive(Debug, Clone)]
struct SnapshotItem {
    id: String,
    url: String,
    has_action: bool,
    deferred: bool,
}

/// Mutable feed state: how far the lazy loader has rendered and which
/// rows have been removed.
#[derive(Debug, Default)]
struct Feed {
    cap: usize,
    released: bool,
    removed: HashSet<usize>,
    scroll_top: f64,
}

/// [`PageSurface`] over a static HTML snapshot, used to rehearse runs
/// against captured feed markup without a live page.
///
/// The snapshot is parsed once at construction; afterwards the binding
/// simulates lazy rendering. Items start `data-initial-visible` rows deep,
/// each forward scroll reveals `data-reveal-batch` more (both read from
/// `<body>`), and rows marked `data-deferred` stay unrendered until a
/// backward scroll nudges them loose. Item identity comes from
/// `data-item-id` and `data-url`; an empty id is an extraction miss.
pub struct SnapshotSurface {
    items: Vec<SnapshotItem>,
    selectors: Selectors,
    surface_ref: SurfaceRef,
    surface_label: String,
    viewport_height: f64,
    reveal_batch: usize,
    feed: Mutex<Feed>,
}

impl SnapshotSurface {
    pub fn from_html(html: &str, selectors: &Selectors) -> Result<Self, SnapshotError> {
        let item_sel = parse_selector(&selectors.item)?;
        let action_sel = parse_selector(&selectors.action_control)?;
        parse_selector(&selectors.sweep_item)?;

        let doc = Html::parse_document(html);

        let items: Vec<SnapshotItem> = doc
            .select(&item_sel)
            .map(|el| SnapshotItem {
                id: el
                    .value()
                    .attr("data-item-id")
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
                url: el.value().attr("data-url").unwrap_or_default().to_string(),
                has_action: el.select(&action_sel).next().is_some(),
                deferred: el.value().attr("data-deferred").is_some(),
            })
            .collect();

        let (initial_rows, reveal_batch) = rehearsal_knobs(&doc)?;
        let (surface_ref, surface_label) = pick_surface(&doc, &item_sel)?;

        engine_info!(
            "snapshot: {} items, surface {surface_label}, {initial_rows} initial rows",
            items.len()
        );

        Ok(Self {
            items,
            selectors: selectors.clone(),
            surface_ref,
            surface_label,
            viewport_height: 900.0,
            reveal_batch,
            feed: Mutex::new(Feed {
                cap: initial_rows,
                ..Feed::default()
            }),
        })
    }

    pub fn with_viewport_height(mut self, height: f64) -> Self {
        self.viewport_height = height;
        self
    }

    /// Human-readable description of the surface the binding chose.
    pub fn surface_label(&self) -> &str {
        &self.surface_label
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    fn feed(&self) -> MutexGuard<'_, Feed> {
        self.feed.lock().unwrap_or_else(|err| err.into_inner())
    }

    fn eligible_indices(&self, feed: &Feed) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(index, item)| {
                (!item.deferred || feed.released) && !feed.removed.contains(index)
            })
            .map(|(index, _)| index)
            .collect()
    }

    fn rendered_rows(&self, feed: &Feed) -> usize {
        self.eligible_indices(feed).len().min(feed.cap)
    }
}

#[async_trait::async_trait]
impl PageSurface for SnapshotSurface {
    async fn find_scroll_surface(&self) -> SurfaceRef {
        self.surface_ref
    }

    async fn extent(&self, _surface: SurfaceRef) -> f64 {
        let feed = self.feed();
        self.rendered_rows(&feed) as f64 * ROW_HEIGHT
    }

    async fn scroll_by(&self, _surface: SurfaceRef, delta: f64) {
        let mut feed = self.feed();
        if delta > 0.0 {
            feed.cap = feed.cap.saturating_add(self.reveal_batch);
            engine_debug!("snapshot: forward scroll, cap now {} rows", feed.cap);
        } else if delta < 0.0 && !feed.released {
            feed.released = true;
            engine_debug!("snapshot: backward scroll released deferred rows");
        }
        feed.scroll_top = (feed.scroll_top + delta).max(0.0);
    }

    async fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    async fn visible_items(&self, selector: &str) -> Vec<ItemRef> {
        if selector != self.selectors.item && selector != self.selectors.sweep_item {
            engine_warn!("snapshot: no items for unknown selector {selector:?}");
            return Vec::new();
        }
        let feed = self.feed();
        let mut indices = self.eligible_indices(&feed);
        indices.truncate(feed.cap);
        indices.into_iter().map(|i| ItemRef(i as u64)).collect()
    }

    async fn extract_identity(&self, item: ItemRef) -> Option<ItemDescriptor> {
        let entry = self.items.get(item.0 as usize)?;
        if entry.id.is_empty() {
            return None;
        }
        Some(ItemDescriptor::new(entry.id.clone(), entry.url.clone()))
    }

    async fn find_action_control(&self, item: ItemRef, selector: &str) -> Option<ControlRef> {
        if selector != self.selectors.action_control {
            engine_warn!("snapshot: no control for unknown selector {selector:?}");
            return None;
        }
        let index = item.0 as usize;
        let entry = self.items.get(index)?;
        let feed = self.feed();
        if entry.has_action && !feed.removed.contains(&index) {
            Some(ControlRef(item.0))
        } else {
            None
        }
    }

    async fn invoke(&self, control: ControlRef) {
        let mut feed = self.feed();
        if feed.removed.insert(control.0 as usize) {
            engine_debug!("snapshot: control {} removed its row", control.0);
        }
    }
}

/// Reads `data-initial-visible` and `data-reveal-batch` off `<body>`.
fn rehearsal_knobs(doc: &Html) -> Result<(usize, usize), SnapshotError> {
    let body_sel = parse_selector("body")?;
    let body = doc.select(&body_sel).next();
    let read = |attr: &str, fallback: usize| -> usize {
        body.and_then(|el| el.value().attr(attr))
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(fallback)
    };
    Ok((
        read("data-initial-visible", DEFAULT_INITIAL_ROWS),
        read("data-reveal-batch", DEFAULT_REVEAL_BATCH),
    ))
}

/// Applies the surface-selection policy to the snapshot: the candidate
/// with the greatest declared extent wins, first on ties, document root
/// when there are no candidates.
///
/// A candidate declares its extent with `data-extent`; without one it is
/// sized by the item rows it contains.
fn pick_surface(doc: &Html, item_sel: &Selector) -> Result<(SurfaceRef, String), SnapshotError> {
    let mut candidates: Vec<(String, f64)> = Vec::new();

    for (label, selector) in [
        ("main", "main"),
        ("[role=main]", "[role=\"main\"]"),
        (".overflow-y-auto", ".overflow-y-auto"),
        (".overflow-auto", ".overflow-auto"),
    ] {
        let sel = parse_selector(selector)?;
        for el in doc.select(&sel) {
            candidates.push((label.to_string(), declared_extent(&el, item_sel)));
        }
    }

    let styled_sel = parse_selector("[style]")?;
    for el in doc.select(&styled_sel) {
        let style = el
            .value()
            .attr("style")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .replace(' ', "");
        if style.contains("overflow-y:auto") || style.contains("overflow-y:scroll") {
            candidates.push((
                "overflow-styled container".to_string(),
                declared_extent(&el, item_sel),
            ));
        }
    }

    // First wins on equal extent, matching enumeration order.
    let mut chosen: Option<usize> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let better = match chosen {
            Some(best) => candidate.1 > candidates[best].1,
            None => true,
        };
        if better {
            chosen = Some(index);
        }
    }

    Ok(match chosen {
        Some(index) => (
            SurfaceRef(index as u64 + 1),
            candidates[index].0.clone(),
        ),
        None => (SurfaceRef(0), "document root".to_string()),
    })
}

fn declared_extent(el: &scraper::ElementRef<'_>, item_sel: &Selector) -> f64 {
    el.value()
        .attr("data-extent")
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_else(|| el.select(item_sel).count() as f64 * ROW_HEIGHT)
}

fn parse_selector(selector: &str) -> Result<Selector, SnapshotError> {
    Selector::parse(selector).map_err(|err| SnapshotError::InvalidSelector {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

/// Dry-run analysis stand-in: each item resolves to a single hit of its
/// own URL, tagged video when that URL ends in `.mp4`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineAnalysis;

#[async_trait::async_trait]
impl AnalysisService for OfflineAnalysis {
    async fn analyze(&self, id: &str, url: &str) -> Result<Vec<MediaHit>, ServiceError> {
        if url.is_empty() {
            return Ok(Vec::new());
        }
        let kind = if url.to_ascii_lowercase().ends_with(".mp4") {
            MediaKind::Video
        } else {
            MediaKind::Image
        };
        Ok(vec![MediaHit {
            id: id.to_string(),
            url: url.to_string(),
            kind,
        }])
    }
}

/// Dry-run removal stand-in that only counts the calls it absorbs.
#[derive(Debug, Default)]
pub struct OfflineRemoval {
    calls: AtomicU64,
}

impl OfflineRemoval {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl RemovalService for OfflineRemoval {
    async fn remove(&self, id: &str) -> Result<(), ServiceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        engine_debug!("offline removal absorbed {id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn surface(html: &str) -> SnapshotSurface {
        SnapshotSurface::from_html(html, &Selectors::default()).unwrap()
    }

    #[test]
    fn tallest_candidate_wins_over_main() {
        let html = r#"
            <body>
              <main data-extent="400"></main>
              <div class="overflow-y-auto" data-extent="2600">
                <div data-item-id="a" data-url="https://cdn.test/a.jpg"></div>
              </div>
            </body>"#;
        let surface = surface(html);
        assert_eq!(surface.surface_label(), ".overflow-y-auto");
    }

    #[test]
    fn styled_container_counts_as_candidate() {
        let html = r#"
            <body>
              <div style="height: 10px; overflow-y: scroll" data-extent="900"></div>
            </body>"#;
        let surface = surface(html);
        assert_eq!(surface.surface_label(), "overflow-styled container");
    }

    #[test]
    fn falls_back_to_document_root_without_candidates() {
        let surface = surface(r#"<body><div data-item-id="a"></div></body>"#);
        assert_eq!(surface.surface_label(), "document root");
        assert_eq!(surface.item_count(), 1);
    }

    #[test]
    fn candidate_without_declared_extent_is_sized_by_rows() {
        // Three rows beat a 500-unit declaration.
        let html = r#"
            <body>
              <div class="overflow-auto" data-extent="500"></div>
              <main>
                <div data-item-id="a"></div>
                <div data-item-id="b"></div>
                <div data-item-id="c"></div>
              </main>
            </body>"#;
        let surface = surface(html);
        assert_eq!(surface.surface_label(), "main");
    }

    #[tokio::test]
    async fn empty_identity_is_a_miss() {
        let html = r#"
            <body>
              <div data-item-id="" data-url="https://cdn.test/x.jpg"></div>
              <div data-item-id="ok" data-url="https://cdn.test/y.jpg"></div>
            </body>"#;
        let surface = surface(html);
        assert_eq!(surface.extract_identity(ItemRef(0)).await, None);
        let descriptor = surface.extract_identity(ItemRef(1)).await.unwrap();
        assert_eq!(descriptor.id, "ok");
        assert_eq!(descriptor.url, "https://cdn.test/y.jpg");
    }

    #[tokio::test]
    async fn deferred_rows_stay_hidden_until_backward_scroll() {
        let html = r#"
            <body data-initial-visible="2" data-reveal-batch="2">
              <div data-item-id="a"></div>
              <div data-item-id="b"></div>
              <div data-item-id="c" data-deferred></div>
            </body>"#;
        let surface = surface(html);
        let root = surface.find_scroll_surface().await;

        assert_eq!(surface.visible_items("[data-item-id]").await.len(), 2);
        surface.scroll_by(root, 450.0).await;
        // Forward scrolling alone never renders the deferred row.
        assert_eq!(surface.visible_items("[data-item-id]").await.len(), 2);

        surface.scroll_by(root, -100.0).await;
        surface.scroll_by(root, 100.0).await;
        assert_eq!(surface.visible_items("[data-item-id]").await.len(), 3);
    }

    #[tokio::test]
    async fn invoking_a_control_removes_its_row() {
        let html = r#"
            <body data-initial-visible="4">
              <div data-item-id="a"><button data-action="unfavorite"></button></div>
              <div data-item-id="b"></div>
            </body>"#;
        let surface = surface(html);
        let root = surface.find_scroll_surface().await;
        let before = surface.extent(root).await;

        let control = surface
            .find_action_control(ItemRef(0), "[data-action=unfavorite]")
            .await
            .unwrap();
        surface.invoke(control).await;

        assert_eq!(surface.visible_items("[data-item-id]").await, vec![ItemRef(1)]);
        assert!(surface.extent(root).await < before);
        // Identity survives removal, the way a detached element keeps its
        // attributes readable.
        assert!(surface.extract_identity(ItemRef(0)).await.is_some());
        // The control does not.
        assert_eq!(
            surface
                .find_action_control(ItemRef(0), "[data-action=unfavorite]")
                .await,
            None
        );
    }

    #[tokio::test]
    async fn items_without_action_control_report_none() {
        let html = r#"<body><div data-item-id="a"></div></body>"#;
        let surface = surface(html);
        assert_eq!(
            surface
                .find_action_control(ItemRef(0), "[data-action=unfavorite]")
                .await,
            None
        );
    }
}

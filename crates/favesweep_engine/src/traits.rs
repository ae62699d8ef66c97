use engine_logging::engine_debug;
use favesweep_core::ItemDescriptor;

use crate::types::{MediaHit, ServiceError};

/// Binding-issued handle to the scrollable surface, valid for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceRef(pub u64);

/// Binding-issued handle to a rendered list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemRef(pub u64);

/// Binding-issued handle to an action control inside an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlRef(pub u64);

/// Access to the rendered page: the scrollable surface, the items it
/// materializes, and the controls inside them.
///
/// Methods report last-known values instead of failing; a binding that
/// loses an element answers with an empty result and the drivers skip it.
#[async_trait::async_trait]
pub trait PageSurface: Send + Sync {
    /// Resolves the scrollable surface once per run. Candidates are the
    /// main content region, `role=main` elements and containers with
    /// vertical `auto`/`scroll` overflow; the candidate with the greatest
    /// scroll extent wins, falling back to the document root.
    async fn find_scroll_surface(&self) -> SurfaceRef;

    /// Total scrollable height of the surface, growing as rows render.
    async fn extent(&self, surface: SurfaceRef) -> f64;

    async fn scroll_by(&self, surface: SurfaceRef, delta: f64);

    async fn viewport_height(&self) -> f64;

    /// Item elements currently rendered, in document order.
    async fn visible_items(&self, selector: &str) -> Vec<ItemRef>;

    /// Identity of a rendered item, or `None` when the element carries no
    /// usable descriptor. Misses are skipped, never retried.
    async fn extract_identity(&self, item: ItemRef) -> Option<ItemDescriptor>;

    async fn find_action_control(&self, item: ItemRef, selector: &str) -> Option<ControlRef>;

    async fn invoke(&self, control: ControlRef);
}

/// Deep-analysis collaborator: resolves one identified item into the media
/// behind it. Calls fail individually; the pipeline recovers per item.
#[async_trait::async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, id: &str, url: &str) -> Result<Vec<MediaHit>, ServiceError>;
}

/// Remote removal collaborator, the fallback when an item exposes no
/// direct action control.
#[async_trait::async_trait]
pub trait RemovalService: Send + Sync {
    async fn remove(&self, id: &str) -> Result<(), ServiceError>;
}

pub trait ProgressSink: Send + Sync {
    fn set_percent(&self, percent: f64);
    fn set_sub_status(&self, text: &str);
}

/// Sink that forwards progress to the debug log, for runs without a UI.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn set_percent(&self, percent: f64) {
        engine_debug!("progress: {percent:.0}%");
    }

    fn set_sub_status(&self, text: &str) {
        engine_debug!("status: {text}");
    }
}

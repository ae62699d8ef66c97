//! Favesweep engine: viewport driving, media analysis and sweep execution.
mod analysis;
mod client;
mod harvest;
mod settings;
mod snapshot;
mod sweep;
mod traits;
mod types;
mod viewport;

pub use client::{HttpAnalysisClient, HttpRemovalClient};
pub use harvest::HarvestEngine;
pub use settings::{RunSettings, Selectors, ServiceSettings};
pub use snapshot::{OfflineAnalysis, OfflineRemoval, SnapshotError, SnapshotSurface};
pub use sweep::SweepEngine;
pub use traits::{
    AnalysisService, ControlRef, ItemRef, LogProgressSink, PageSurface, ProgressSink,
    RemovalService, SurfaceRef,
};
pub use types::{HarvestError, MediaHit, ServiceError};
pub use viewport::ViewportDriver;

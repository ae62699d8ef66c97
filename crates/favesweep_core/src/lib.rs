//! Favesweep core: pure harvesting and sweeping state machines.
mod harvest;
mod idle;
mod item;
mod media;
mod progress;
mod sweep;

pub use harvest::HarvestState;
pub use idle::{IdleTracker, ScrollVerdict};
pub use item::ItemDescriptor;
pub use media::{media_filename, HarvestMode, MediaKind, MediaLedger, MediaRecord};
pub use progress::{analysis_percent, sweep_percent, SCAN_PERCENT};
pub use sweep::{SweepState, SweepTracker, UNCHANGED_PASSES_TO_STOP};

use std::collections::HashSet;

use crate::{ItemDescriptor, MediaLedger};

/// Accumulator owned by exactly one harvest run and discarded at run end.
///
/// `seen` grows monotonically within the run and is never reset, so items
/// re-rendered across scroll passes dedup to a single pending entry.
#[derive(Debug, Clone, Default)]
pub struct HarvestState {
    /// Media resolved by deep analysis, keyed by URL.
    pub ledger: MediaLedger,
    pending: Vec<ItemDescriptor>,
    seen: HashSet<String>,
}

impl HarvestState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a descriptor observed during a scroll tick.
    ///
    /// Every first-seen identity is queued for deep analysis
    /// unconditionally; re-rendered duplicates are ignored. Returns true
    /// when the item was newly queued.
    pub fn observe(&mut self, descriptor: ItemDescriptor) -> bool {
        if self.seen.contains(&descriptor.id) {
            return false;
        }
        self.seen.insert(descriptor.id.clone());
        self.pending.push(descriptor);
        true
    }

    /// Number of distinct identities observed so far.
    pub fn unique_seen(&self) -> usize {
        self.seen.len()
    }

    /// Descriptors queued for analysis, in first-seen order.
    pub fn pending(&self) -> &[ItemDescriptor] {
        &self.pending
    }

    /// Takes the queued descriptors for the analysis phase, leaving the
    /// queue empty.
    pub fn take_pending(&mut self) -> Vec<ItemDescriptor> {
        std::mem::take(&mut self.pending)
    }
}

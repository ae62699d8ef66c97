/// Identity extracted from a rendered list item.
///
/// Ephemeral: reconstructed from current DOM state on every scroll pass and
/// never persisted. `id` is the deduplication key for both harvesting and
/// sweeping; elements that yield no usable identity are skipped upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemDescriptor {
    pub id: String,
    pub url: String,
}

impl ItemDescriptor {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

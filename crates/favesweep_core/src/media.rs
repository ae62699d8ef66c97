use std::collections::HashSet;

/// Media category, decided once at the analysis-collaborator boundary
/// instead of by string comparison inside the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// File extension used when deriving a filename for this kind.
    pub fn extension(self) -> &'static str {
        match self {
            MediaKind::Image => "jpg",
            MediaKind::Video => "mp4",
        }
    }
}

/// A resolved, downloadable media entity produced by deep analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRecord {
    pub url: String,
    pub filename: String,
    pub id: String,
}

impl MediaRecord {
    /// Builds a record, deriving the filename from the id and kind.
    pub fn new(id: impl Into<String>, url: impl Into<String>, kind: MediaKind) -> Self {
        let id = id.into();
        let filename = media_filename(&id, kind);
        Self {
            url: url.into(),
            filename,
            id,
        }
    }

    /// Whether the record resolves to a video, judged by its filename.
    pub fn is_video(&self) -> bool {
        self.filename.to_ascii_lowercase().ends_with(".mp4")
    }
}

/// Deterministic filename for a resolved media entity: `{id}.{ext}`.
pub fn media_filename(id: &str, kind: MediaKind) -> String {
    format!("{id}.{ext}", ext = kind.extension())
}

/// Which media categories a harvest run should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HarvestMode {
    /// Keep only records whose filename is not `.mp4`.
    Images,
    /// Keep only `.mp4` records.
    Videos,
    /// No filtering.
    #[default]
    All,
}

impl HarvestMode {
    /// Whether `record` survives this mode's final filter.
    pub fn keeps(self, record: &MediaRecord) -> bool {
        match self {
            HarvestMode::Images => !record.is_video(),
            HarvestMode::Videos => record.is_video(),
            HarvestMode::All => true,
        }
    }
}

/// Insertion-ordered, first-writer-wins accumulator of media records keyed
/// by URL.
///
/// Two analysis calls may resolve the same underlying asset; the first
/// resolution is kept and never overwritten. Keys are unique by
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaLedger {
    records: Vec<MediaRecord>,
    urls: HashSet<String>,
}

impl MediaLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a record unless its URL is already present.
    /// Returns true when the record was inserted.
    pub fn insert(&mut self, record: MediaRecord) -> bool {
        if self.urls.contains(&record.url) {
            return false;
        }
        self.urls.insert(record.url.clone());
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records admitted so far, in insertion order.
    pub fn records(&self) -> &[MediaRecord] {
        &self.records
    }

    /// Consumes the ledger, returning the records that survive `mode` in
    /// insertion order (first-resolved-first, not harvest order).
    pub fn into_mode(self, mode: HarvestMode) -> Vec<MediaRecord> {
        self.records
            .into_iter()
            .filter(|record| mode.keeps(record))
            .collect()
    }
}

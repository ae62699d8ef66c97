//! RON manifest of harvested media, written into the working directory
//! so a later download step can consume it.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use favesweep_core::{HarvestMode, MediaRecord};

#[derive(Debug, Serialize)]
struct ManifestRecord {
    id: String,
    url: String,
    filename: String,
}

#[derive(Debug, Serialize)]
struct Manifest {
    generated_at: String,
    mode: String,
    records: Vec<ManifestRecord>,
}

pub(crate) fn mode_label(mode: HarvestMode) -> &'static str {
    match mode {
        HarvestMode::Images => "images",
        HarvestMode::Videos => "videos",
        HarvestMode::All => "all",
    }
}

pub(crate) fn write_manifest(
    path: &Path,
    mode: HarvestMode,
    records: &[MediaRecord],
) -> io::Result<()> {
    let manifest = Manifest {
        generated_at: chrono::Utc::now().to_rfc3339(),
        mode: mode_label(mode).to_string(),
        records: records
            .iter()
            .map(|record| ManifestRecord {
                id: record.id.clone(),
                url: record.url.clone(),
                filename: record.filename.clone(),
            })
            .collect(),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(&manifest, pretty).map_err(io::Error::other)?;
    fs::write(path, content)
}

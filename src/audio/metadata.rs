use serde::{Deserialize, Serialize};
use std::path::Path;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::{MetadataOptions, MetadataRevision, StandardTagKey};
use symphonia::core::probe::Hint;

/// Song tags carried into the chart. Fields the container does not provide
/// stay `None` and are omitted from the serialized chart, never synthesized.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SongMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

/// Best-effort tag extraction. Failures are non-fatal: generation proceeds
/// with whatever fields could be read.
pub fn extract_metadata(path: &Path) -> SongMetadata {
    match read_tags(path) {
        Ok(meta) => meta,
        Err(err) => {
            log::warn!(
                "Failed to read metadata from {}: {}; continuing without tags",
                path.display(),
                err
            );
            SongMetadata::default()
        }
    }
}

fn read_tags(path: &Path) -> crate::Result<SongMetadata> {
    let file = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let mut probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut meta = SongMetadata::default();

    // Side metadata (e.g. ID3v2) is picked up by the probe; container-level
    // tags come from the format reader. Earlier finds win per field.
    if let Some(rev) = probed.metadata.get().as_ref().and_then(|m| m.current()) {
        apply_revision(&mut meta, rev);
    }
    if let Some(rev) = probed.format.metadata().current() {
        apply_revision(&mut meta, rev);
    }

    Ok(meta)
}

fn apply_revision(meta: &mut SongMetadata, rev: &MetadataRevision) {
    for tag in rev.tags() {
        match tag.std_key {
            Some(StandardTagKey::TrackTitle) if meta.title.is_none() => {
                meta.title = Some(tag.value.to_string());
            }
            Some(StandardTagKey::Artist) if meta.artist.is_none() => {
                meta.artist = Some(tag.value.to_string());
            }
            Some(StandardTagKey::Album) if meta.album.is_none() => {
                meta.album = Some(tag.value.to_string());
            }
            Some(StandardTagKey::Date) if meta.year.is_none() => {
                meta.year = parse_year(&tag.value.to_string());
            }
            Some(StandardTagKey::Genre) if meta.genre.is_none() => {
                meta.genre = Some(tag.value.to_string());
            }
            _ => {}
        }
    }
}

/// Tag dates arrive as "1984", "1984-06-25" and similar; the chart keeps
/// only the year.
fn parse_year(raw: &str) -> Option<u32> {
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() == 4 {
        digits.parse().ok()
    } else {
        None
    }
}

use std::fs;
use std::path::Path;

use crate::chart::Chart;
use crate::error::{ChartError, Result};

/// Serializes the chart to pretty JSON. The complete document is written to
/// a sibling temporary file and atomically renamed into place, so a failed
/// run never leaves a partial chart behind.
pub fn save(chart: &Chart, path: &Path) -> Result<()> {
    chart.validate()?;

    let json = serde_json::to_string_pretty(chart)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;

    log::info!(
        "Chart saved: {} ({} notes, {} BPM)",
        path.display(),
        chart.notes.len(),
        chart.bpm
    );
    Ok(())
}

/// Loads and validates a persisted chart. Malformed or incomplete JSON is
/// rejected here so a session never starts from a bad chart.
pub fn load(path: &Path) -> Result<Chart> {
    let raw = fs::read_to_string(path)?;
    let chart: Chart = serde_json::from_str(&raw)
        .map_err(|e| ChartError::Malformed(format!("{}: {}", path.display(), e)))?;
    chart.validate()?;
    Ok(chart)
}

use crate::error::Result;
use bindsim::engine::metrics::MetricsSeries;
use std::path::Path;
use tracing::debug;

const HEADER: [&str; 3] = ["tick", "normal_bound", "competitor_bound"];

/// Writes one CSV row per recorded tick. The header is written even for an empty series.
pub fn write_metrics_csv(path: &Path, series: &MetricsSeries) -> Result<()> {
    debug!("Writing {} metric samples to {:?}", series.len(), path);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(HEADER)?;
    for sample in series.samples() {
        writer.serialize(sample)?;
    }
    writer.flush()?;
    Ok(())
}

//! Prometheus metrics for a single CLI run

use anyhow::{Context, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use moodline_classifiers::batch;
use std::fs;
use std::path::Path;
use tracing::info;

/// Install the global Prometheus recorder and describe the batch counters
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    batch::describe_metrics();

    info!("Metrics recorder installed");
    Ok(handle)
}

/// Write the current metrics snapshot in the Prometheus text format
pub fn write_metrics(handle: &PrometheusHandle, path: &Path) -> Result<()> {
    fs::write(path, handle.render())
        .with_context(|| format!("failed to write metrics {}", path.display()))?;
    info!("Metrics written to {}", path.display());
    Ok(())
}

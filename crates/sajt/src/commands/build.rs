//! Static site build command.

use anyhow::{Context, Result};
use sajt_static::{BuildConfig, BuildResult, StaticBuilder};

/// Run one full rebuild cycle.
pub async fn run(config: BuildConfig) -> Result<BuildResult> {
    tracing::info!("Rebuilding everything.");

    let result = tokio::task::spawn_blocking(move || StaticBuilder::new(config).build())
        .await
        .context("Build task failed")?;

    match result {
        Ok(result) => {
            tracing::info!(
                "Built {} pages with {} assets in {}ms",
                result.pages,
                result.assets,
                result.duration_ms
            );
            tracing::info!("Output: {}", result.output_dir.display());
            Ok(result)
        }
        Err(e) => {
            tracing::error!("Build failed: {}", e);
            Err(e.into())
        }
    }
}

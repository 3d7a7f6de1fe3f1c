pub mod config;
pub mod error;
pub mod fluid;
pub mod logging;
pub mod merge;
pub mod pipeline;
pub mod storage;
pub mod theme;
pub mod tokens;
pub use error::{AppError, AppResult};
pub use fluid::{fluid_size, responsive_size, ViewportRange};
pub use merge::merge_documents;
pub use pipeline::{Stage, ThemePipeline};
pub use theme::map_tokens_to_config;

use std::path::PathBuf;

use config::BuildConfig;

/// Entrypoint used by the CLI: runs `stage` and returns the written paths.
pub fn run(stage: Stage, config: BuildConfig) -> AppResult<Vec<PathBuf>> {
    tracing::info!(?stage, system = %config.system, "starting theme-tokens");

    let written = ThemePipeline::new(config).run(stage)?;

    tracing::info!(files = written.len(), "theme-tokens finished");
    Ok(written)
}

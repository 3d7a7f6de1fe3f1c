use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::BuildConfig;
use crate::error::AppResult;
use crate::merge::{merge_documents, parse_document, DocumentSide};
use crate::storage::{
    read_document, render_document, stage_document, write_document, StorageError,
};
use crate::theme::map_tokens_to_config;
use crate::tokens::TokenDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Tokens to the generated theme document.
    Generate,
    /// Static base plus the generated document on disk to the final theme.
    Merge,
    /// Both stages in memory; nothing is written unless both succeed.
    Build,
}

pub struct ThemePipeline {
    config: BuildConfig,
}

impl ThemePipeline {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Runs `stage` and returns the paths it wrote, in write order.
    pub fn run(&self, stage: Stage) -> AppResult<Vec<PathBuf>> {
        match stage {
            Stage::Generate => {
                let generated = self.generated_document()?;
                self.persist(&self.config.generated_theme_path, &generated)?;
                Ok(vec![self.config.generated_theme_path.clone()])
            }
            Stage::Merge => {
                let generated = self.generated_document_from_disk()?;
                let merged = self.final_document(&generated)?;
                self.persist(&self.config.output_path, &merged)?;
                Ok(vec![self.config.output_path.clone()])
            }
            Stage::Build => {
                let generated = self.generated_document()?;
                let merged = self.final_document(&generated)?;
                let generated_src = render_document(&generated)?;
                let merged_src = render_document(&merged)?;

                // Stage both before replacing either.
                let generated_file =
                    stage_document(&self.config.generated_theme_path, &generated_src)?;
                let output_file = stage_document(&self.config.output_path, &merged_src)?;
                generated_file.commit()?;
                output_file.commit()?;
                tracing::info!(
                    generated = %self.config.generated_theme_path.display(),
                    output = %self.config.output_path.display(),
                    "theme build complete"
                );
                Ok(vec![
                    self.config.generated_theme_path.clone(),
                    self.config.output_path.clone(),
                ])
            }
        }
    }

    /// Computes the document `stage` would write without touching the disk.
    pub fn preview(&self, stage: Stage) -> AppResult<Value> {
        match stage {
            Stage::Generate => self.generated_document(),
            Stage::Merge => {
                let generated = self.generated_document_from_disk()?;
                self.final_document(&generated)
            }
            Stage::Build => {
                let generated = self.generated_document()?;
                self.final_document(&generated)
            }
        }
    }

    pub fn generated_document(&self) -> AppResult<Value> {
        let path = &self.config.tokens_path;
        tracing::debug!(path = %path.display(), "loading design tokens");
        let serialized = read_document(path)?;

        let options = self.config.generator_options();
        let tokens = TokenDocument::from_json_str(&serialized, &options.namespace_keys())?;
        let theme = map_tokens_to_config(&tokens, &options)?;
        Ok(theme.to_value().map_err(StorageError::from)?)
    }

    pub fn final_document(&self, generated: &Value) -> AppResult<Value> {
        let path = &self.config.static_theme_path;
        tracing::debug!(path = %path.display(), "loading static theme");
        let static_doc = parse_document(&read_document(path)?, DocumentSide::Static)?;
        Ok(merge_documents(&static_doc, generated)?)
    }

    fn generated_document_from_disk(&self) -> AppResult<Value> {
        let serialized = read_document(&self.config.generated_theme_path)?;
        Ok(parse_document(&serialized, DocumentSide::Dynamic)?)
    }

    fn persist(&self, path: &Path, document: &Value) -> AppResult<()> {
        write_document(path, &render_document(document)?)?;
        tracing::info!(path = %path.display(), "theme document written");
        Ok(())
    }
}

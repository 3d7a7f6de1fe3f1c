use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::fluid::ViewportRange;
use crate::theme::GeneratorOptions;
use crate::tokens::DEFAULT_SYSTEM;

pub const CONFIG_FILE: &str = "theme-tokens.json";

const DEFAULT_TOKENS_FILE: &str = "tokens.json";
const DEFAULT_STATIC_THEME_FILE: &str = "static-theme.json";
const DEFAULT_GENERATED_THEME_FILE: &str = "dynamic-theme.json";
const DEFAULT_OUTPUT_FILE: &str = "theme.json";

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read build config: {path}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse build config: {path}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid viewport range: min {min}px must be non-negative and below max {max}px")]
    InvalidViewport { min: f64, max: f64 },
}

/// On-disk shape of `theme-tokens.json`; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct BuildConfigFile {
    system: Option<String>,
    tokens: Option<PathBuf>,
    static_theme: Option<PathBuf>,
    generated_theme: Option<PathBuf>,
    output: Option<PathBuf>,
    viewport: Option<ViewportRange>,
}

/// Resolved build settings with absolute-or-cwd-relative paths.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    pub system: String,
    pub tokens_path: PathBuf,
    pub static_theme_path: PathBuf,
    pub generated_theme_path: PathBuf,
    pub output_path: PathBuf,
    pub viewport: ViewportRange,
}

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub system: Option<String>,
    pub tokens: Option<PathBuf>,
    pub static_theme: Option<PathBuf>,
    pub generated_theme: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl BuildConfig {
    /// Default file names placed next to each other in `root`.
    pub fn with_root(root: &Path) -> Self {
        Self {
            system: DEFAULT_SYSTEM.to_string(),
            tokens_path: root.join(DEFAULT_TOKENS_FILE),
            static_theme_path: root.join(DEFAULT_STATIC_THEME_FILE),
            generated_theme_path: root.join(DEFAULT_GENERATED_THEME_FILE),
            output_path: root.join(DEFAULT_OUTPUT_FILE),
            viewport: ViewportRange::default(),
        }
    }

    fn from_file(file: BuildConfigFile, root: &Path) -> Self {
        let defaults = Self::with_root(root);
        let resolve = |path: Option<PathBuf>, fallback: PathBuf| -> PathBuf {
            path.map(|path| root.join(path)).unwrap_or(fallback)
        };

        Self {
            system: file.system.unwrap_or(defaults.system),
            tokens_path: resolve(file.tokens, defaults.tokens_path),
            static_theme_path: resolve(file.static_theme, defaults.static_theme_path),
            generated_theme_path: resolve(file.generated_theme, defaults.generated_theme_path),
            output_path: resolve(file.output, defaults.output_path),
            viewport: file.viewport.unwrap_or(defaults.viewport),
        }
    }

    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(system) = overrides.system {
            self.system = system;
        }
        if let Some(path) = overrides.tokens {
            self.tokens_path = path;
        }
        if let Some(path) = overrides.static_theme {
            self.static_theme_path = path;
        }
        if let Some(path) = overrides.generated_theme {
            self.generated_theme_path = path;
        }
        if let Some(path) = overrides.output {
            self.output_path = path;
        }
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.viewport.is_valid() {
            return Err(ConfigError::InvalidViewport {
                min: self.viewport.min,
                max: self.viewport.max,
            });
        }
        Ok(())
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            system: self.system.clone(),
            viewport: self.viewport,
        }
    }
}

/// Loads the build config for `project_dir`.
///
/// An explicit path must exist and parse. Otherwise `theme-tokens.json` in the
/// project directory is optional, and a broken one falls back to defaults.
pub fn load_build_config(project_dir: &Path, explicit: Option<&Path>) -> ConfigResult<BuildConfig> {
    let config = match explicit {
        Some(path) => {
            let file = read_config_file(path)?;
            BuildConfig::from_file(file, config_root(path, project_dir))
        }
        None => load_implicit_config(project_dir),
    };
    config.validate()?;
    Ok(config)
}

fn load_implicit_config(project_dir: &Path) -> BuildConfig {
    let path = project_dir.join(CONFIG_FILE);
    if !path.exists() {
        return BuildConfig::with_root(project_dir);
    }
    match read_config_file(&path) {
        Ok(file) => BuildConfig::from_file(file, project_dir),
        Err(err) => {
            tracing::warn!(?err, path = %path.display(), "ignoring unusable build config; using defaults");
            BuildConfig::with_root(project_dir)
        }
    }
}

fn read_config_file(path: &Path) -> ConfigResult<BuildConfigFile> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// Relative entries in a config file resolve against the file's own directory.
fn config_root<'a>(config_path: &'a Path, project_dir: &'a Path) -> &'a Path {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => project_dir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_implicit_config_uses_defaults_in_project_dir() {
        let root = tempfile::tempdir().unwrap();
        let config = load_build_config(root.path(), None).unwrap();

        assert_eq!(config, BuildConfig::with_root(root.path()));
        assert_eq!(config.system, "wpvip");
        assert_eq!(config.tokens_path, root.path().join("tokens.json"));
        assert_eq!(config.generated_theme_path, root.path().join("dynamic-theme.json"));
        assert_eq!(config.output_path, root.path().join("theme.json"));
    }

    #[test]
    fn implicit_config_overrides_selected_fields() {
        let root = tempfile::tempdir().unwrap();
        fs::write(
            root.path().join(CONFIG_FILE),
            r#"{
                "system": "acme",
                "tokens": "design/tokens.json",
                "viewport": { "max": 1280 }
            }"#,
        )
        .unwrap();

        let config = load_build_config(root.path(), None).unwrap();
        assert_eq!(config.system, "acme");
        assert_eq!(config.tokens_path, root.path().join("design/tokens.json"));
        assert_eq!(config.static_theme_path, root.path().join("static-theme.json"));
        assert_eq!(config.viewport, ViewportRange::new(640.0, 1280.0).unwrap());
    }

    #[test]
    fn unparseable_implicit_config_falls_back_to_defaults() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join(CONFIG_FILE), "{ invalid ").unwrap();

        let config = load_build_config(root.path(), None).unwrap();
        assert_eq!(config, BuildConfig::with_root(root.path()));
    }

    #[test]
    fn explicit_config_resolves_paths_next_to_the_file() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("theme");
        fs::create_dir_all(&nested).unwrap();
        let path = nested.join("build.json");
        fs::write(&path, r#"{ "output": "out/theme.json" }"#).unwrap();

        let config = load_build_config(root.path(), Some(&path)).unwrap();
        assert_eq!(config.output_path, nested.join("out/theme.json"));
        assert_eq!(config.tokens_path, nested.join("tokens.json"));
    }

    #[test]
    fn explicit_config_must_exist() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("absent.json");
        let err = load_build_config(root.path(), Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn explicit_config_must_parse() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("build.json");
        fs::write(&path, r#"{ "viewport": "wide" }"#).unwrap();
        let err = load_build_config(root.path(), Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn inverted_viewport_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        fs::write(
            root.path().join(CONFIG_FILE),
            r#"{ "viewport": { "min": 1440, "max": 640 } }"#,
        )
        .unwrap();

        let err = load_build_config(root.path(), None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidViewport { min, max } if min == 1440.0 && max == 640.0
        ));
    }

    #[test]
    fn overrides_replace_resolved_values() {
        let config = BuildConfig::with_root(Path::new("/srv/theme")).apply(ConfigOverrides {
            system: Some("acme".to_string()),
            output: Some(PathBuf::from("build/theme.json")),
            ..ConfigOverrides::default()
        });

        assert_eq!(config.system, "acme");
        assert_eq!(config.output_path, PathBuf::from("build/theme.json"));
        assert_eq!(config.tokens_path, PathBuf::from("/srv/theme/tokens.json"));
        assert_eq!(config.generator_options().system, "acme");
    }
}

//! `theme-tokens`: builds a block theme `theme.json` from design tokens.
//!
//! ```bash
//! # tokens.json -> dynamic-theme.json
//! theme-tokens generate
//!
//! # static-theme.json + dynamic-theme.json -> theme.json
//! theme-tokens merge
//!
//! # both, writing nothing unless both succeed
//! theme-tokens --project-dir themes/marketing build
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use theme_tokens::config::{load_build_config, ConfigOverrides};
use theme_tokens::storage::render_document;
use theme_tokens::{logging, Stage, ThemePipeline};

#[derive(Parser)]
#[command(name = "theme-tokens")]
#[command(version)]
#[command(about = "Generate and merge theme.json from design tokens")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    paths: PathArgs,

    /// Print the resulting document to stdout instead of writing it
    #[arg(long, global = true)]
    stdout: bool,

    /// Increase log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Map design tokens to the generated theme document
    Generate,
    /// Merge the generated document over the static base theme
    Merge,
    /// Generate and merge in one pass
    Build,
}

impl From<Command> for Stage {
    fn from(command: Command) -> Self {
        match command {
            Command::Generate => Stage::Generate,
            Command::Merge => Stage::Merge,
            Command::Build => Stage::Build,
        }
    }
}

#[derive(Args)]
struct PathArgs {
    /// Directory holding theme-tokens.json and the default documents
    #[arg(long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Build config file (defaults to <project-dir>/theme-tokens.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Design token document
    #[arg(long, global = true)]
    tokens: Option<PathBuf>,

    /// Hand-authored base theme document
    #[arg(long, global = true)]
    static_theme: Option<PathBuf>,

    /// Generated theme document
    #[arg(long, global = true)]
    generated: Option<PathBuf>,

    /// Final merged theme.json
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    /// Token namespace prefix (e.g. `wpvip` for `wpvip/sizes/desktop`)
    #[arg(long, global = true)]
    system: Option<String>,
}

impl PathArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            system: self.system.clone(),
            tokens: self.tokens.clone(),
            static_theme: self.static_theme.clone(),
            generated_theme: self.generated.clone(),
            output: self.output.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> anyhow::Result<()> {
    let config = load_build_config(&cli.paths.project_dir, cli.paths.config.as_deref())
        .context("loading build config")?
        .apply(cli.paths.overrides());
    let stage = Stage::from(cli.command);

    let context = || format!("{stage:?} stage failed");

    if cli.stdout {
        let document = ThemePipeline::new(config)
            .preview(stage)
            .with_context(context)?;
        println!("{}", render_document(&document)?);
        return Ok(());
    }

    let written = theme_tokens::run(stage, config).with_context(context)?;
    for path in written {
        tracing::info!(path = %path.display(), "updated");
    }
    Ok(())
}

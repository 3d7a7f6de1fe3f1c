use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "theme_tokens=info";

/// Installs the stderr subscriber. `RUST_LOG` wins over `verbosity`.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive_for(verbosity)));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}

fn directive_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => DEFAULT_DIRECTIVE,
        1 => "theme_tokens=debug",
        _ => "theme_tokens=trace",
    }
}

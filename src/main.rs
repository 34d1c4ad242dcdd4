use anyhow::Result;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use include_graph::cli::Cli;
use include_graph::{Config, Engine};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_validated();

    // Initialize logging; stdout is reserved for answers
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    debug!("Starting include-graph v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    // Create the core engine with configuration
    let engine = Engine::new(config)?;

    // Execute the requested command
    cli.execute(engine).await
}

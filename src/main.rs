// Entrypoint for the CLI application.
// - With file arguments, uploads each one and exits (status 1 if any failed).
// - Without arguments, runs the interactive menu.
// Logging goes to stderr and is controlled by `RUST_LOG`.

use anyhow::Context;
use bucket_cli::{ui, BucketClient};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bucket_cli=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    // Environment first, then the saved key, then ask.
    let config = ui::resolve_config()?;
    let client = BucketClient::new(config).context("Failed to build HTTP client")?;

    if paths.is_empty() {
        // Blocks until the user picks "Exit".
        return ui::main_menu(client);
    }

    let failed = ui::upload_paths(&client, &paths);
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

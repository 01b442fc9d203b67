use clap::Parser;
use miette::IntoDiagnostic;
use satinv_client::SatelliteClient;
use satinv_config::SettingsLoader;
use satinv_inventory::InventoryService;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "satinv")]
#[command(about = "Dynamic inventory for hosts managed by Satellite/Foreman", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit the full grouped inventory as JSON (default mode)
    #[arg(long)]
    list: bool,

    /// Emit the named host's variables as JSON
    #[arg(long, value_name = "NAME", conflicts_with = "list")]
    host: Option<String>,

    /// Refresh the cache from the API before answering
    #[arg(long)]
    refresh_cache: bool,

    /// Path to the settings file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run(cli).await.into_diagnostic()
}

async fn run(cli: Cli) -> satinv_core::Result<()> {
    let mut loader = SettingsLoader::new();
    if let Some(path) = cli.config {
        loader = loader.path(path);
    }
    let settings = loader.load()?;

    let client = SatelliteClient::new(&settings)?;
    let service = InventoryService::new(
        client,
        settings.cache_path.clone(),
        settings.cache_max_age,
    );

    // Serialize fully before printing; stdout carries either one complete
    // JSON document or nothing.
    let output = match &cli.host {
        Some(name) => {
            let vars = service.host_vars(name, cli.refresh_cache).await?;
            serde_json::to_string_pretty(&vars)?
        }
        None => {
            let snapshot = service.get_inventory(cli.refresh_cache).await?;
            serde_json::to_string_pretty(&snapshot)?
        }
    };
    println!("{output}");

    Ok(())
}

/// Diagnostics go to stderr; stdout is reserved for the JSON contract
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .compact()
                .with_target(false),
        )
        .init();
}

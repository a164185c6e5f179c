use clap::Parser;
use tracing::{error, info};
use zonesync_domain::CliOverrides;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "zonesync")]
#[command(version)]
#[command(about = "Secondary DNS server keeping zones in sync with their primaries")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Database path
    #[arg(long)]
    database: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Primary server, e.g. 10.0.0.1 or tcp://ns1.example.net:5353 (repeatable)
    #[arg(short = 'p', long = "primary", value_name = "ADDR")]
    primaries: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        database_path: cli.database.clone(),
        log_level: cli.log_level.clone(),
        primaries: cli.primaries.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting zonesync v{}", env!("CARGO_PKG_VERSION"));

    let persistors = di::Persistors::new(&config.persistence).await?;
    let services = di::SecondaryServices::new(&config, persistors)?;

    for primary in services.topology.primaries() {
        info!(primary = %primary, protocol = primary.protocol.as_str(), "Primary configured");
    }

    let dns_addr = format!("{}:{}", config.server.bind_address, config.server.dns_port);
    let handler = services.server_handler();

    tokio::select! {
        result = server::start_dns_server(dns_addr, handler) => {
            if let Err(e) = &result {
                error!(error = %e, "DNS server error");
            }
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use devprofile_lib::{ProfileDb, ProfileStore};
use devprofile_server::start_webserver;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "devprofile")]
#[command(about = "Developer profile API server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Start the profile API server")]
    Start {
        #[arg(
            long,
            value_name = "API_SERVER_HOSTNAME",
            env = "DEVPROFILE_HOST",
            default_value = "0.0.0.0"
        )]
        api_server_hostname: IpAddr,

        #[arg(
            long,
            value_name = "API_SERVER_PORT",
            env = "PORT",
            default_value_t = 5000
        )]
        api_server_port: u16,

        #[arg(
            short,
            long,
            value_name = "DIR",
            env = "DEVPROFILE_DATA_DIR",
            default_value = "data"
        )]
        data_dir: PathBuf,

        /// Used when RUST_LOG is not set
        #[arg(long, value_name = "LEVEL", default_value = "info")]
        log_level: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            api_server_hostname,
            api_server_port,
            data_dir,
            log_level,
        } => {
            // Set up tracing
            let filter = EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&log_level))
                .context("Invalid log level")?;
            tracing_subscriber::fmt().with_env_filter(filter).init();

            std::fs::create_dir_all(&data_dir)
                .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
            let db_file = data_dir.join("profile.db");

            // Open or create the datastore
            let ds = ProfileDb::open(&db_file)
                .with_context(|| format!("Failed to open database {:?}", db_file))?;
            tracing::info!("Using database {:?}", db_file);

            let http_addr = SocketAddr::new(api_server_hostname, api_server_port);
            start_webserver(http_addr, ProfileStore::new(ds), async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for Ctrl+C: {}", e);
                    std::future::pending::<()>().await;
                }
                tracing::info!("Shutting down");
            })
            .await?;
        }
    }

    Ok(())
}

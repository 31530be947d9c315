//! Skillmatrix CLI and REST API entry point.
//!
//! Binary name: `skillmx`
//!
//! Parses CLI arguments, initializes the database and services, then starts
//! the REST API server.

mod http;
mod state;

use clap::{Parser, Subcommand};
use clap_complete::{generate, Shell};

use http::router::build_router;
use state::AppState;

#[derive(Parser)]
#[command(name = "skillmx", version, about = "Skill matrix claim workflow service")]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the REST API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1", env = "SKILLMATRIX_HOST")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value_t = 8084, env = "SKILLMATRIX_PORT")]
        port: u16,

        /// Export spans via OpenTelemetry (stdout exporter)
        #[arg(long)]
        otel: bool,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default log filter from verbosity; RUST_LOG overrides it.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "skillmx", &mut std::io::stdout());
        }

        Commands::Serve { host, port, otel } => {
            skillmatrix_observe::tracing_setup::init_tracing(filter, otel)
                .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

            let state = AppState::init().await?;
            tracing::info!(data_dir = %state.data_dir.display(), "state initialized");
            let app = build_router(state);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(%addr, "skillmatrix API listening");
            axum::serve(listener, app).await?;

            skillmatrix_observe::tracing_setup::shutdown_tracing();
        }
    }

    Ok(())
}

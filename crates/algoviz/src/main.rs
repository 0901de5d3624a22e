//! AlgoViz - Algorithm Trace Server
//!
//! Serves AVL insertion and Dijkstra traces over HTTP.

use algoviz::{Result, ServerConfig, TraceServer};
use clap::Parser;

/// Step-by-step algorithm trace server
#[derive(Parser, Debug)]
#[command(name = "algoviz")]
#[command(version)]
#[command(about = "Serves step-by-step traces of AVL insertion and Dijkstra's algorithm", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        enable_cors: !args.no_cors,
        enable_tracing: args.verbose > 0,
    };

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => log::info!("Shutdown signal received"),
            Err(e) => {
                log::error!("Failed to install CTRL+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    TraceServer::new(config).start_with_shutdown(shutdown).await
}

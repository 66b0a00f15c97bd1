//! Example to run the SEEGA server standalone
//!
//! Run with: cargo run -p seega-server --example run_server

use seega_server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = ServerConfig {
        port: 8002,
        ..ServerConfig::default()
    };

    println!("Starting SEEGA server on port {}", config.port);
    println!("Endpoint file: {}", config.endpoint_file.display());

    run_server(config).await
}

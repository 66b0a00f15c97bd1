//! Server command - host a game session over HTTP
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), start_server()
//! - Level 3: (delegated to seega-server crate)
//! - Level 4: configuration validation

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use seega_server::{run_server, ServerConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port number to listen on (0 picks a free port)
    #[arg(long, default_value = "8002")]
    pub port: u16,

    /// File the server endpoint is written to for clients to read
    #[arg(long, default_value = "seega_uri.txt")]
    pub endpoint_file: PathBuf,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run server command
///
/// This function reads like a table of contents:
/// 1. Configure server
/// 2. Start server (blocking)
pub fn run(args: ServerArgs) -> Result<()> {
    let config = configure_server(&args)?;

    tracing::info!(
        "Starting SEEGA server on {}:{}",
        config.host,
        config.port
    );

    start_server(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Configure server from command arguments
fn configure_server(args: &ServerArgs) -> Result<ServerConfig> {
    validate_endpoint_file(&args.endpoint_file)?;

    Ok(ServerConfig {
        host: args.host.clone(),
        port: args.port,
        endpoint_file: args.endpoint_file.clone(),
    })
}

/// Start the server (blocking)
fn start_server(config: ServerConfig) -> Result<()> {
    // Create tokio runtime for async server
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        run_server(config).await
    })
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Validate that the endpoint file can be written
fn validate_endpoint_file(path: &Path) -> Result<()> {
    if path.is_dir() {
        anyhow::bail!(
            "Endpoint file path is a directory: {}",
            path.display()
        );
    }

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            anyhow::bail!(
                "Directory for endpoint file does not exist: {}",
                parent.display()
            );
        }
        _ => {}
    }

    if path.exists() {
        tracing::warn!(
            "Endpoint file {} already exists and will be overwritten",
            path.display()
        );
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_server_defaults() {
        let args = ServerArgs {
            host: "127.0.0.1".to_string(),
            port: 8002,
            endpoint_file: PathBuf::from("seega_uri.txt"),
        };

        let config = configure_server(&args).unwrap();
        assert_eq!(config.port, 8002);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.endpoint_file, PathBuf::from("seega_uri.txt"));
    }

    #[test]
    fn test_validate_endpoint_file_missing_dir() {
        let result = validate_endpoint_file(Path::new("/nonexistent/path/seega_uri.txt"));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_endpoint_file_is_dir() {
        let result = validate_endpoint_file(&std::env::temp_dir());
        assert!(result.is_err());
    }
}

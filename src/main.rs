//! nexar-supply-mcp: MCP server for electronic component search.
//!
//! Exposes the Nexar Supply parts catalog as a `search_components` tool,
//! reachable over stdio (development) or streamable HTTP (deployment).

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use nexar_supply_mcp::config;
use nexar_supply_mcp::mcp::server::McpServer;
use nexar_supply_mcp::mcp::transport::{http, stdio};

/// MCP server for electronic component search via the Nexar Supply API.
///
/// Credentials are read from the NEXAR_CLIENT_ID and NEXAR_CLIENT_SECRET
/// environment variables.
#[derive(Parser, Debug)]
#[command(name = "nexar-supply-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Transport to serve on
    #[arg(short, long, value_enum, default_value = "stdio")]
    transport: TransportKind,

    /// Listening port for the HTTP transport (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Selectable transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TransportKind {
    /// Newline-delimited JSON-RPC on stdin/stdout.
    Stdio,
    /// Session-based streamable HTTP.
    Http,
}

/// Determines the log level from CLI arguments.
const fn get_log_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
///
/// Logs go to stderr; stdout belongs to the MCP channel.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point for the nexar-supply-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration from the environment
    let mut cfg = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            eprintln!("\nRequired environment variables: NEXAR_CLIENT_ID, NEXAR_CLIENT_SECRET");
            return ExitCode::FAILURE;
        }
    };

    if let Some(port) = args.port {
        cfg.port = port;
    }

    init_tracing(get_log_level(args.verbose, args.quiet));

    // Display GPL license notice (required by GPLv3 Section 5d)
    eprintln!(
        "nexar-supply-mcp {}  Copyright (C) 2026  The Embedded Society",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("This program comes with ABSOLUTELY NO WARRANTY.");
    eprintln!("This is free software, licensed under GPL-3.0-or-later.");
    eprintln!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
    eprintln!();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?args.transport,
        production = cfg.is_production,
        "Starting nexar-supply-mcp server"
    );

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    let result = match args.transport {
        TransportKind::Stdio => {
            let mut server = match McpServer::from_config(&cfg) {
                Ok(server) => server,
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    return ExitCode::FAILURE;
                }
            };
            info!("MCP server ready, waiting for client connection on stdio...");
            runtime.block_on(stdio::run(&mut server))
        }
        TransportKind::Http => runtime.block_on(http::serve(cfg)),
    };

    match result {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}

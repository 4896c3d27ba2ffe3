//! stdio transport for the MCP server.
//!
//! - Messages are UTF-8 encoded JSON-RPC, delimited by newlines
//! - Messages must not contain embedded newlines
//! - stdin receives messages from the client, stdout sends replies
//! - stderr carries logging only, never MCP messages

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::mcp::server::{McpServer, Outbound};

/// A stdio-based MCP transport.
///
/// Handles reading JSON-RPC messages from stdin and writing replies to
/// stdout.
pub struct StdioTransport {
    /// Buffered reader for stdin.
    reader: BufReader<tokio::io::Stdin>,
    /// Handle for stdout.
    writer: tokio::io::Stdout,
}

impl StdioTransport {
    /// Creates a new stdio transport.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
            writer: tokio::io::stdout(),
        }
    }

    /// Reads the next message line from stdin.
    ///
    /// Returns `None` if stdin is closed (EOF).
    ///
    /// # Errors
    ///
    /// Returns an error if reading from stdin fails.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            // EOF - stdin closed
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        Ok(Some(line))
    }

    /// Writes an outbound message to stdout, newline terminated.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_outbound(&mut self, outbound: &Outbound) -> io::Result<()> {
        let json = serde_json::to_string(outbound)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        // MCP spec: messages must not contain embedded newlines
        debug_assert!(
            !json.contains('\n'),
            "JSON message must not contain embedded newlines"
        );

        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        Ok(())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the MCP server over stdio until EOF or a termination signal.
///
/// # Errors
///
/// Returns an error if transport I/O fails.
pub async fn run(server: &mut McpServer) -> io::Result<()> {
    let mut transport = StdioTransport::new();
    run_with_shutdown(server, &mut transport).await
}

#[cfg(unix)]
async fn run_with_shutdown(
    server: &mut McpServer,
    transport: &mut StdioTransport,
) -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt()).map_err(io::Error::other)?;
    let mut sigterm = signal(SignalKind::terminate()).map_err(io::Error::other)?;

    loop {
        tokio::select! {
            _ = sigint.recv() => {
                tracing::info!("Received SIGINT, initiating graceful shutdown");
                server.begin_shutdown();
                return Ok(());
            }

            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown");
                server.begin_shutdown();
                return Ok(());
            }

            line_result = transport.read_line() => {
                if handle_line_result(server, transport, line_result).await? {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(windows)]
async fn run_with_shutdown(
    server: &mut McpServer,
    transport: &mut StdioTransport,
) -> io::Result<()> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown");
                server.begin_shutdown();
                return Ok(());
            }

            line_result = transport.read_line() => {
                if handle_line_result(server, transport, line_result).await? {
                    return Ok(());
                }
            }
        }
    }
}

/// Handles the result of one transport read.
///
/// Returns `true` if the server should shut down.
async fn handle_line_result(
    server: &mut McpServer,
    transport: &mut StdioTransport,
    line_result: io::Result<Option<String>>,
) -> io::Result<bool> {
    let Some(line) = line_result? else {
        server.begin_shutdown();
        return Ok(true);
    };

    if line.trim().is_empty() {
        return Ok(false);
    }

    if let Some(outbound) = server.handle_raw(&line).await {
        transport.write_outbound(&outbound).await?;
    }

    Ok(false)
}

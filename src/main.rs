//! MCP bridge to a remote Chroma tool gateway.
//!
//! Run with `chroma-mcp-bridge --remote-url https://gateway.example.com`.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use chroma_mcp_bridge::{
    logging, GatewayConfig, HttpGateway, McpServer, McpSession, DEFAULT_TOOL_PREFIX,
};

/// Stdio to HTTP bridge for a Chroma MCP gateway.
///
/// Reads JSON-RPC 2.0 messages from stdin, forwards tool calls to the
/// gateway and writes replies to stdout.
#[derive(Parser)]
#[command(name = "chroma-mcp-bridge")]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the remote tool gateway.
    #[arg(long, env = "MCP_BRIDGE_REMOTE_URL", value_name = "URL")]
    remote_url: String,

    /// Bearer token sent with every gateway request.
    #[arg(long, env = "MCP_BRIDGE_AUTH_TOKEN", value_name = "TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,

    /// Gateway request timeout in seconds.
    #[arg(
        long,
        env = "MCP_BRIDGE_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Tool names must start with this prefix to be forwarded.
    #[arg(long, env = "MCP_BRIDGE_TOOL_PREFIX", default_value = DEFAULT_TOOL_PREFIX)]
    tool_prefix: String,

    /// Log file. Defaults to ~/.mcp-bridge.log.
    #[arg(long, env = "MCP_BRIDGE_LOG_FILE", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    // Set up logging
    let log_file = args.log_file.or_else(logging::default_log_path);
    if let Err(e) = logging::init(args.debug, log_file.as_deref()) {
        eprintln!("Warning: {}", e);
    }

    let config = GatewayConfig::new(&args.remote_url)
        .with_auth_token(args.auth_token)
        .with_timeout(Duration::from_secs(args.timeout_secs));

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    let code = runtime.block_on(run(config, &args.tool_prefix));
    std::process::exit(code);
}

async fn run(config: GatewayConfig, tool_prefix: &str) -> i32 {
    let gateway = match HttpGateway::new(&config) {
        Ok(gateway) => gateway,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    info!(
        "Starting MCP Chroma Bridge connecting to {}",
        gateway.base_url()
    );
    let mut session = McpSession::with_prefix(gateway, tool_prefix);
    session.probe().await;

    // No handshake is sent; the host initializes.
    info!("Bridge ready, waiting for initialization");
    let mut server = McpServer::new(session);

    let outcome = tokio::select! {
        result = server.run_stdio() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Bridge shutting down...");
            Ok(())
        }
    };

    let code = match outcome {
        Ok(()) => 0,
        Err(e) => {
            error!("Error in message processing: {}", e);
            1
        }
    };

    server.shutdown();
    code
}

// # ddsyncd - Dynamic DNS Daemon
//
// Thin integration layer: reads configuration from environment variables,
// wires the HTTP IP resolver and the DNSPod gateway into the sync engine,
// and runs the scheduler loop until a shutdown signal arrives. All
// reconciliation logic lives in ddsync-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Provider credentials (required)
// - `TENCENTCLOUD_SECRET_ID`: provider secret ID
// - `TENCENTCLOUD_SECRET_KEY`: provider secret key
//
// ### Domains
// - `DDNS_DOMAINS`: comma-separated list of fully-qualified domains
// - `DDNS_DOMAIN`: single-domain fallback, used when DDNS_DOMAINS is unset
//
// ### Behavior
// - `DDNS_ENABLE_IPV4`: handle A records (default: true)
// - `DDNS_ENABLE_IPV6`: handle AAAA records (default: true)
// - `DDNS_TTL`: record TTL in seconds (default: 600)
// - `DDNS_INTERVAL`: seconds between rounds (default: 3600)
// - `DDNS_LOG_LEVEL`: trace|debug|info|warn|error (default: info)
//
// ## Example
//
// ```bash
// export TENCENTCLOUD_SECRET_ID=your_id
// export TENCENTCLOUD_SECRET_KEY=your_key
// export DDNS_DOMAINS=home.example.com,nas.example.com
//
// ddsyncd
// ```

use anyhow::Result;
use ddsync_core::config::{Credentials, SyncConfig, DEFAULT_INTERVAL_SECS, DEFAULT_TTL_SECS};
use ddsync_core::SyncEngine;
use ddsync_ip_http::HttpIpResolver;
use ddsync_provider_dnspod::DnspodGateway;
use std::env;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DdsyncExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdsyncExitCode> for ExitCode {
    fn from(code: DdsyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Read one boolean toggle, defaulting to enabled
fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v.trim().to_lowercase() == "true")
        .unwrap_or(true)
}

/// Read one numeric setting, falling back to its default when unset or unparsable
fn env_secs(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Build the immutable process configuration from the environment
///
/// Only missing credentials are fatal; everything else degrades to a
/// default or to a per-round diagnostic.
fn config_from_env() -> Result<SyncConfig> {
    let secret_id = env::var("TENCENTCLOUD_SECRET_ID").unwrap_or_default();
    let secret_key = env::var("TENCENTCLOUD_SECRET_KEY").unwrap_or_default();
    let credentials = Credentials::new(secret_id.trim(), secret_key.trim());
    credentials.validate()?;

    let domains = SyncConfig::parse_domains(
        &env::var("DDNS_DOMAINS").unwrap_or_default(),
        &env::var("DDNS_DOMAIN").unwrap_or_default(),
    );

    let mut config = SyncConfig::new(credentials, domains);
    config.enable_ipv4 = env_flag("DDNS_ENABLE_IPV4");
    config.enable_ipv6 = env_flag("DDNS_ENABLE_IPV6");
    config.ttl_secs = env_secs("DDNS_TTL", DEFAULT_TTL_SECS);
    config.interval_secs = env_secs("DDNS_INTERVAL", DEFAULT_INTERVAL_SECS);

    Ok(config)
}

fn main() -> ExitCode {
    // Load configuration from environment; missing credentials are the only
    // fatal startup condition
    let config = match config_from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DdsyncExitCode::ConfigError.into();
        }
    };

    // Initialize tracing
    let log_level = match env::var("DDNS_LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdsyncExitCode::ConfigError.into();
    }

    info!("Starting ddsyncd daemon");
    info!(
        "Configuration loaded: {} domain(s), interval {}s",
        config.domains.len(),
        config.interval_secs
    );

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdsyncExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run_daemon(config).await {
            Ok(()) => DdsyncExitCode::CleanShutdown,
            Err(e) => {
                error!("Daemon error: {}", e);
                DdsyncExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Wire up the engine and race the scheduler loop against shutdown signals
async fn run_daemon(config: SyncConfig) -> Result<()> {
    // Gateway construction re-validates credentials; the process never
    // reaches scheduling with an unusable gateway
    let gateway = DnspodGateway::new(&config.credentials)?;
    let resolver = HttpIpResolver::new();

    let (engine, _event_rx) = SyncEngine::new(Box::new(resolver), Box::new(gateway), config)?;

    tokio::select! {
        _ = engine.run() => {
            // The scheduler loop never returns under normal operation
            unreachable!("scheduler loop terminated");
        }
        signal = wait_for_shutdown() => {
            info!("Received {}, shutting down", signal?);
        }
    }

    Ok(())
}

/// Wait for SIGTERM or SIGINT
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for CTRL-C (fallback for non-Unix platforms)
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}

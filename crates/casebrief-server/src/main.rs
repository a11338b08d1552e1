//! casebrief
//!
//! Rule-based risk and category analysis for legal documents.

use anyhow::{Context, Result};
use casebrief_classifiers::{RuleEngines, RulesConfig};
use casebrief_server::cli::{AnalyzeArgs, Cli, Commands, OutputFormat, ServeArgs};
use casebrief_server::{
    analyze_document, create_router, render_report, AppState, ServerConfig,
};
use casebrief_store::MemoryStore;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Analyze(args) => analyze(args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    init_tracing(args.verbose);

    info!("Starting casebrief server");

    // Load configuration
    let config = ServerConfig::load(&args.config, &args)?;
    info!("Configuration loaded successfully");
    info!("Store: {:?}", config.store);
    match &config.rules_path {
        Some(path) => info!("Rules: {}", path.display()),
        None => info!("Rules: built-in"),
    }

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    let state = AppState::from_config(&config)?.with_metrics(metrics_handle);
    let app = create_router(state);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("casebrief listening on http://{}", addr);

    // Graceful shutdown handler
    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Analyze one file against a throwaway in-memory store
async fn analyze(args: AnalyzeArgs) -> Result<()> {
    init_tracing(args.verbose);

    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let rules = match &args.rules {
        Some(path) => RulesConfig::from_file(path)?,
        None => RulesConfig::default(),
    };
    let engines = RuleEngines::from_config(&rules)?;

    let store = MemoryStore::new();
    let analysis = analyze_document(&store, &engines, 1, &text, false).await?;

    let output = match args.format {
        OutputFormat::Text => render_report(&analysis),
        OutputFormat::Json if args.pretty => serde_json::to_string_pretty(&analysis)?,
        OutputFormat::Json => serde_json::to_string(&analysis)?,
    };
    println!("{}", output);
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
///
/// Logs go to stderr so `analyze` output stays valid JSON on stdout.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("casebrief=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("casebrief=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "casebrief_analyses_total",
        "Total number of analyses by mode"
    );
    metrics::describe_counter!(
        "casebrief_risk_flags_total",
        "Total number of risk flags detected by type and severity"
    );
    metrics::describe_histogram!(
        "casebrief_analysis_latency_us",
        metrics::Unit::Microseconds,
        "Analysis latency in microseconds by mode"
    );
    metrics::describe_counter!("casebrief_errors_total", "Total number of errors by type");

    info!("Metrics exporter initialized");
    Ok(handle)
}

//! Intake assistant entry point.
//!
//! Binary name: `intake`
//!
//! Parses CLI arguments, loads configuration, then either prints it,
//! generates shell completions, or starts the HTTP server.

mod cli;
mod http;
mod state;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use clap_complete::generate;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use intake_core::eviction::run_idle_sweep;
use intake_infra::config::{apply_process_env, load_config};
use intake_types::config::IntakeConfig;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "intake", &mut std::io::stdout());
        }

        Commands::Config => {
            let config = resolve_config(&cli.config).await?;
            cli::config::show_config(&config, cli.json)?;
        }

        Commands::Serve { port, host } => {
            let mut config = resolve_config(&cli.config).await?;
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            serve(config, cli.quiet).await?;
        }
    }

    Ok(())
}

fn init_tracing(cli: &Cli) {
    let level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn,intake_api=info,intake_core=info,intake_infra=info",
        1 => "info,intake_api=debug,intake_core=debug,intake_infra=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

async fn resolve_config(path: &std::path::Path) -> anyhow::Result<IntakeConfig> {
    let config = load_config(path).await;
    Ok(apply_process_env(config)?)
}

async fn serve(config: IntakeConfig, quiet: bool) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let idle_timeout = config.session.idle_timeout_secs.filter(|secs| *secs > 0);
    let sweep_interval = Duration::from_secs(config.session.sweep_interval_secs.max(1));

    let state = AppState::init(config)?;
    let cancel = CancellationToken::new();

    let sweep = idle_timeout.map(|secs| {
        tokio::spawn(run_idle_sweep(
            Arc::clone(&state.service),
            Duration::from_secs(secs),
            sweep_interval,
            cancel.clone(),
        ))
    });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "intake server listening");

    if !quiet {
        println!(
            "  {} Intake assistant listening on {}",
            console::style("⚡").bold(),
            console::style(format!("http://{addr}")).cyan()
        );
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }

    let router = http::router::build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cancel.cancel();
    if let Some(handle) = sweep {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "idle sweep task ended abnormally");
        }
    }

    if !quiet {
        println!("\n  Server stopped.");
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("shutdown signal received");
}

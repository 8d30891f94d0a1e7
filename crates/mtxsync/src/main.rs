mod cli;
mod error;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mtxsync_core::{ChannelSource, Reconciler};

use crate::cli::Cli;
use crate::error::AppError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let settings = mtxsync_config::load(&cli.config)?;
    tracing::debug!(?settings, config = %cli.config.display(), "settings loaded");
    let config = settings.into_sync_config()?;

    info!(
        vms = %config.vms_url,
        mediamtx = %config.media_url,
        "synchronizing VMS channels into MediaMTX"
    );
    let mut reconciler = Reconciler::from_config(&config)?;

    if cli.once {
        let report = reconciler.run_cycle().await;
        if let Err(e) = reconciler.source().close().await {
            tracing::debug!(error = %e, "failed to close VMS session");
        }
        let report = report?;
        info!(
            created = report.created.len(),
            deleted = report.deleted.len(),
            healthy = report.healthy,
            "cycle complete"
        );
        return Ok(());
    }

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            cancel.cancel();
        }
    });

    reconciler.run(cancel).await;
    Ok(())
}

/// Wait for SIGTERM or Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
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
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}

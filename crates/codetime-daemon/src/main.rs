//! Codetime Daemon
//!
//! Polls the focused window once per second, accumulates the time VS Code
//! holds focus, and writes a session log on exit.

use anyhow::Result;
use chrono::Utc;
use codetime_core::{format_hms, Session, SessionLog, TrackerConfig, WriteOutcome};
use std::io::Write;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the status line.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("codetime_daemon=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = TrackerConfig::default();
    let mut session = Session::begin(Utc::now(), config.target.clone());
    let log = SessionLog::create(&config.log_dir, session.id(), config.min_session_ms)?;

    info!(
        "tracking {} usage, log file {:?} (Ctrl+C to stop)",
        session.target().name(),
        log.path()
    );

    let mut ticker = time::interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Utc::now();
                match codetime_sampler::active_window() {
                    Ok(window) => session.record_sample(window, now),
                    // A failed sample carries no focus information; the
                    // open span must not be closed by a sampler hiccup.
                    Err(e) => {
                        warn!("window sampling failed: {}", e);
                        session.record_sample_failure(now);
                    }
                }

                print!(
                    "\rVS Code session time: {}",
                    format_hms(session.running_total_ms(now))
                );
                let _ = std::io::stdout().flush();
            }
            installed = &mut shutdown => {
                installed?;
                break;
            }
        }
    }

    println!();
    info!("saving session log...");

    // `finish` consumes the session: exactly one final flush can happen.
    let record = session.finish(Utc::now());
    match log.finalize(&record) {
        Ok(WriteOutcome::Written(path)) => {
            println!(
                "Session active time: {} ({})",
                record.session.total_active_human,
                path.display()
            );
        }
        Ok(WriteOutcome::SkippedShort { total_ms }) => {
            println!(
                "Session active time ({}) < 5 minutes, skipping log",
                format_hms(total_ms)
            );
        }
        Err(e) => {
            // The computed total must never be lost silently.
            eprintln!(
                "Session active time was {}; failed to write log: {}",
                record.session.total_active_human, e
            );
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Resolves when a termination request arrives. Interrupt and terminate
/// both route through the same single shutdown path.
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
            _ = sigint.recv() => info!("received SIGINT, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("received shutdown signal, shutting down");
    }

    Ok(())
}

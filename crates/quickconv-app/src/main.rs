// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quick Converter — local image, document and text tools.
//
// Entry point. Initialises logging, loads configuration, and dispatches the
// chosen tool.

mod cli;
mod commands;
mod services;
mod session;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use services::app_services::AppServices;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("Quick Converter starting");

    let init = match cli.data_dir.clone() {
        Some(dir) => AppServices::with_data_dir(dir),
        None => AppServices::init(),
    };
    let svc = match init {
        Ok(svc) => svc,
        Err(e) => {
            tracing::error!(error = %e, "configuration unreadable, using defaults");
            AppServices::fallback()
        }
    };

    tracing::debug!(data_dir = %svc.data_dir().display(), "services ready");

    match commands::run(&svc, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

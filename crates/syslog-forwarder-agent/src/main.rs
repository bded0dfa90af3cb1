// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use syslog_forwarder::{
    batch::send_file,
    constants::{DEFAULT_LOG_LEVEL, SHUTDOWN_TIMEOUT},
    framer::SystemClock,
    transport::UdpTransport,
    ForwarderConfig, ForwarderError, Pipeline, Protocol,
};

#[tokio::main]
pub async fn main() -> ExitCode {
    let log_level = env::var("SYSLOG_LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or(DEFAULT_LOG_LEVEL.to_string());

    let env_filter = format!("{log_level},syslog_forwarder={log_level}");
    let filter = match EnvFilter::try_new(env_filter) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("could not parse log level {log_level}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
        return ExitCode::FAILURE;
    }

    debug!("Logging subsystem enabled");

    let config = match ForwarderConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Error creating config on syslog forwarder startup: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match env::var("SYSLOG_SEND_FILE").ok().filter(|p| !p.trim().is_empty()) {
        Some(path) => send_once(&config, PathBuf::from(path)).await,
        None => run_pipeline(config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Syslog forwarder failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn send_once(config: &ForwarderConfig, path: PathBuf) -> Result<(), ForwarderError> {
    if config.syslog.protocol != Protocol::Udp {
        return Err(ForwarderError::UnsupportedProtocol(config.syslog.protocol));
    }
    let transport = UdpTransport::connect(&config.syslog.server_ip, config.syslog.port).await?;
    info!("Sending {} to udp://{}", path.display(), transport.peer_addr());

    let failed = send_file(&path, &config.syslog, &transport, &SystemClock).await?;
    println!("send failed num:{failed}");
    Ok(())
}

async fn run_pipeline(config: ForwarderConfig) -> Result<(), ForwarderError> {
    match &config.watch_dir {
        Some(dir) => info!("Tailing {}", dir.display()),
        None => info!("SYSLOG_WATCH_DIR not set, nothing will be forwarded"),
    }

    let pipeline = Pipeline::init(config).await?;
    let handle = pipeline.start();

    wait_for_shutdown_signal().await;
    info!("Shutting down syslog forwarder");

    handle.shutdown_and_wait(SHUTDOWN_TIMEOUT).await
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(e) => {
            error!("Failed to install SIGTERM handler: {e}");
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {e}");
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {e}");
    }
}

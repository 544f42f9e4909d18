// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level simulation driver — shared by `main` and integration tests.

use std::panic;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::agent;
use crate::config::Config;
use crate::controller::Controller;
use crate::descriptor::{self, Descriptor};
use crate::error::SimError;
use crate::tower::Tower;

/// Initialize tracing/logging from config.
///
/// Diagnostics go to stderr; stdout carries the simulation transcript.
/// Uses `try_init` so it's safe to call multiple times (e.g. from tests).
pub fn init_tracing(config: &Config) {
    use tracing_subscriber::fmt;

    // Priority: --log-level / RUNWAY_LOG_LEVEL > RUST_LOG > default ("warn").
    let filter = if std::env::var("RUNWAY_LOG_LEVEL").is_err() && config.log_level == "warn" {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    } else {
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let result = match config.log_format.as_str() {
        "json" => {
            fmt::fmt().with_env_filter(filter).with_writer(std::io::stderr).json().try_init()
        }
        _ => fmt::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init(),
    };
    drop(result);
}

/// Run a full simulation from an input file to completion.
pub async fn run(config: Config) -> anyhow::Result<()> {
    init_tracing(&config);

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let descriptors = descriptor::load(&config.input, &mut rng)?;
    info!(count = descriptors.len(), "schedule loaded");

    println!("Starting runway simulation with {} aircraft ...", descriptors.len());
    let tower = Arc::new(Tower::new());
    simulate(tower, descriptors, &config).await?;
    println!("Runway simulation done.");
    Ok(())
}

/// Drive one simulation over an in-memory schedule.
///
/// The tower is passed in so callers (tests, most of all) can subscribe to
/// its event channel before anything runs. Spawns the controller, releases
/// each aircraft after its inter-arrival delay, joins every aircraft in
/// schedule order, then cancels and joins the controller.
pub async fn simulate(
    tower: Arc<Tower>,
    descriptors: Vec<Descriptor>,
    config: &Config,
) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let controller = Controller::new(config, Arc::clone(&tower));
    let controller_handle = tokio::spawn(controller.run(shutdown.clone()));

    let mut aircraft = Vec::with_capacity(descriptors.len());
    for desc in descriptors {
        sleep(desc.inter_arrival).await;
        debug!(id = desc.id, class = ?desc.class, "aircraft arriving");
        aircraft.push((desc.id, tokio::spawn(agent::fly(Arc::clone(&tower), desc))));
    }

    for (id, handle) in aircraft {
        if let Err(e) = handle.await {
            shutdown.cancel();
            if e.is_panic() {
                // An invariant assertion fired inside the aircraft task;
                // surface it as the process-level failure it is.
                panic::resume_unwind(e.into_panic());
            }
            return Err(SimError::SpawnFailure { id }.into());
        }
    }

    shutdown.cancel();
    if let Err(e) = controller_handle.await {
        if e.is_panic() {
            panic::resume_unwind(e.into_panic());
        }
    }
    Ok(())
}

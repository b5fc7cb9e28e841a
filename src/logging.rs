// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Log output setup.

use anyhow::{anyhow, Result};
use tracing::Level;

/// Install the global `tracing` subscriber, writing to stderr.
///
/// Fails if a subscriber is already installed.
pub fn init(max_level: Level) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}

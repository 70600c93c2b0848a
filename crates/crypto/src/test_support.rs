// Copyright (C) Microsoft Corporation. All rights reserved.

//! Helpers shared by the unit tests.

use tracing::metadata::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;

/// Initializes `tracing` output for tests.
///
/// Honors `RUST_LOG` as a target list; defaults to `DEBUG` everywhere.
pub(crate) fn init_tracing() {
    static ONCE: std::sync::Once = std::sync::Once::new();

    ONCE.call_once(|| {
        let targets = match std::env::var("RUST_LOG") {
            Ok(var) => var.parse().unwrap_or_else(|_| Targets::new().with_default(LevelFilter::DEBUG)),
            Err(_) => Targets::new().with_default(LevelFilter::DEBUG),
        };
        // Another test harness may already own the global subscriber.
        let _ = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_test_writer()
            .with_max_level(LevelFilter::TRACE)
            .with_thread_ids(true)
            .finish()
            .with(targets)
            .try_init();
    });
}

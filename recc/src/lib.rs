//! recc — a compiler-command shim for Remote Execution API v2 clusters.
//!
//! Given an argv like `gcc -c foo.cpp -o foo.o`, the pipeline decides
//! whether the command can run remotely, discovers its input files with the
//! compiler's own dependency mode, packages everything into a
//! content-addressed Action, consults the Action Cache, executes remotely
//! on a miss, and materializes the outputs locally. Commands that can't go
//! remote run locally, unchanged.

pub mod actionbuilder;
pub mod actioncache;
pub mod auth;
pub mod cas;
pub mod channel;
pub mod config;
pub mod deps;
pub mod digest;
pub mod errors;
pub mod execution;
pub mod merkle;
pub mod parser;
pub mod pathutil;
pub mod retry;

pub use config::Config;
pub use digest::Digest;
pub use errors::{Error, Result};

use tracing_subscriber::prelude::*;

/// Initializes the global tracing subscriber. `RUST_LOG` always has
/// priority; otherwise `RECC_VERBOSE` raises the level to debug.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

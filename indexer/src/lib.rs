//! Driver: build the index, persist it, run queries, persist results and
//! optionally serve search over HTTP.

pub mod config;

pub use config::{Cli, Config};

use anyhow::{Context, Result};
use search_core::build::build_index;
use search_core::persist::{save_index, save_results};
use search_core::{InvertedIndex, QueryResults};
use std::net::SocketAddr;
use std::sync::Arc;

/// Output of the build and query stages.
pub struct Outcome {
    pub index: InvertedIndex,
    pub results: QueryResults,
}

/// Run every stage except serving. Each stage reports its own failure and
/// the run carries on with whatever state it has.
pub fn execute(config: &Config) -> Outcome {
    let index = match &config.input {
        Some(input) => build_index(input, config.threads).unwrap_or_else(|e| {
            tracing::error!(error = %format!("{e:#}"), input = %input.display(), "could not build index");
            InvertedIndex::new()
        }),
        None => {
            tracing::warn!("no input directory given; the index is empty");
            InvertedIndex::new()
        }
    };

    if let Some(path) = &config.index_output {
        match save_index(path, &index) {
            Ok(()) => tracing::info!(path = %path.display(), "wrote index"),
            Err(e) => tracing::error!(error = %format!("{e:#}"), "could not write index"),
        }
    }

    let mut results = QueryResults::new(config.mode);
    if let Some(path) = &config.queries {
        if let Err(e) = results.parse_file(path, &index, config.threads) {
            tracing::error!(error = %format!("{e:#}"), "could not process queries");
        }
        tracing::info!(queries = results.len(), mode = %config.mode, "ran queries");
    }

    if let Some(path) = &config.results_output {
        match save_results(path, &results) {
            Ok(()) => tracing::info!(path = %path.display(), "wrote results"),
            Err(e) => tracing::error!(error = %format!("{e:#}"), "could not write results"),
        }
    }

    Outcome { index, results }
}

/// Execute the pipeline and, when a port is configured, block serving search.
pub fn run(config: Config) -> Result<()> {
    let Outcome { index, .. } = execute(&config);

    let Some(port) = config.port else { return Ok(()) };
    let addr: SocketAddr = format!("{}:{}", config.host, port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.host, port))?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    runtime.block_on(server::serve(Arc::new(index), addr))
}

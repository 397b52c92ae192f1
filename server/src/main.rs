use anyhow::Result;
use clap::Parser;
use search_core::build::build_index;
use search_core::persist::load_index;
use server::serve;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// JSON index file written by the indexer
    #[arg(long, default_value = "index.json")]
    index: PathBuf,
    /// Build the index from this corpus instead of loading it
    #[arg(long)]
    input: Option<PathBuf>,
    /// Worker threads for building from --input
    #[arg(long)]
    threads: Option<usize>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let index = match &args.input {
        Some(input) => build_index(input, args.threads)?,
        None => load_index(&args.index)?,
    };

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    serve(Arc::new(index), addr).await
}

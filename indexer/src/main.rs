use anyhow::Result;
use indexer::{run, Cli, Config};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = match Cli::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };
    tracing::info!(?cli, "starting");
    run(Config::from(cli))
}

use clap::Parser;
use search_core::build::DEFAULT_THREADS;
use search_core::SearchMode;
use std::ffi::OsString;
use std::path::PathBuf;

pub const INDEX_DEFAULT: &str = "index.json";
pub const RESULTS_DEFAULT: &str = "results.json";
pub const PORT_DEFAULT: u16 = 8080;

#[derive(Parser, Debug)]
#[command(name = "indexer")]
#[command(about = "Build an inverted index over text files and run queries against it", long_about = None)]
pub struct Cli {
    /// Directory (or single file) of text to index
    #[arg(long, num_args = 0..=1)]
    pub input: Option<Option<PathBuf>>,
    /// Write the index as JSON
    #[arg(long, num_args = 0..=1, default_missing_value = INDEX_DEFAULT)]
    pub index: Option<PathBuf>,
    /// File of newline-delimited queries
    #[arg(long, num_args = 0..=1)]
    pub query: Option<Option<PathBuf>>,
    /// Write ranked query results as JSON
    #[arg(long, num_args = 0..=1, default_missing_value = RESULTS_DEFAULT)]
    pub results: Option<PathBuf>,
    /// Build and search with a worker pool
    #[arg(long, num_args = 0..=1)]
    pub threads: Option<Option<usize>>,
    /// Match query words exactly instead of as prefixes
    #[arg(long, default_value_t = false)]
    pub exact: bool,
    /// Seed URL for a crawled corpus (not supported)
    #[arg(long)]
    pub seed: Option<String>,
    /// Serve search over HTTP once the index is built
    #[arg(long, num_args = 0..=1)]
    pub port: Option<Option<u16>>,
    /// Address to bind when serving
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
}

impl Cli {
    /// Parse arguments, accepting single-dash long flags such as `-input`.
    pub fn parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(args.into_iter().map(Into::into).map(long_flag))
    }
}

fn long_flag(arg: OsString) -> OsString {
    match arg.to_str() {
        Some(s) if s.len() > 2 && s.starts_with('-') && !s.starts_with("--")
            && s[1..].starts_with(|c: char| c.is_ascii_alphabetic()) =>
        {
            OsString::from(format!("-{s}"))
        }
        _ => arg,
    }
}

/// Everything a run needs, fixed once arguments are parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: Option<PathBuf>,
    pub index_output: Option<PathBuf>,
    pub queries: Option<PathBuf>,
    pub results_output: Option<PathBuf>,
    pub threads: Option<usize>,
    pub mode: SearchMode,
    pub port: Option<u16>,
    pub host: String,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let input = cli.input.and_then(|value| {
            if value.is_none() {
                tracing::warn!("-input given without a directory; nothing will be indexed");
            }
            value
        });
        let queries = cli.query.and_then(|value| {
            if value.is_none() {
                tracing::warn!("-query given without a file; no queries will run");
            }
            value
        });
        let threads = cli.threads.map(|value| match value.unwrap_or(DEFAULT_THREADS) {
            0 => {
                tracing::warn!(default = DEFAULT_THREADS, "-threads must be positive; using the default");
                DEFAULT_THREADS
            }
            n => n,
        });
        if let Some(seed) = &cli.seed {
            tracing::warn!(%seed, "crawling a seed URL is not supported; ignoring -seed");
        }

        Config {
            input,
            index_output: cli.index,
            queries,
            results_output: cli.results,
            threads,
            mode: if cli.exact { SearchMode::Exact } else { SearchMode::Partial },
            port: cli.port.map(|value| value.unwrap_or(PORT_DEFAULT)),
            host: cli.host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Config {
        Cli::parse_args(std::iter::once("indexer").chain(args.iter().copied())).unwrap().into()
    }

    #[test]
    fn absent_flags_disable_stages() {
        let c = config(&[]);
        assert_eq!(c.input, None);
        assert_eq!(c.index_output, None);
        assert_eq!(c.queries, None);
        assert_eq!(c.results_output, None);
        assert_eq!(c.threads, None);
        assert_eq!(c.port, None);
        assert_eq!(c.mode, SearchMode::Partial);
    }

    #[test]
    fn valueless_flags_use_defaults() {
        let c = config(&["-index", "-results", "-threads", "-port"]);
        assert_eq!(c.index_output, Some(PathBuf::from(INDEX_DEFAULT)));
        assert_eq!(c.results_output, Some(PathBuf::from(RESULTS_DEFAULT)));
        assert_eq!(c.threads, Some(DEFAULT_THREADS));
        assert_eq!(c.port, Some(PORT_DEFAULT));
    }

    #[test]
    fn single_and_double_dash_flags_with_values() {
        let c = config(&["-input", "corpus", "--query", "queries.txt", "-threads", "3", "-exact"]);
        assert_eq!(c.input, Some(PathBuf::from("corpus")));
        assert_eq!(c.queries, Some(PathBuf::from("queries.txt")));
        assert_eq!(c.threads, Some(3));
        assert_eq!(c.mode, SearchMode::Exact);
    }

    #[test]
    fn valueless_input_is_ignored_and_zero_threads_fall_back() {
        let c = config(&["-input", "-query", "-threads", "0"]);
        assert_eq!(c.input, None);
        assert_eq!(c.queries, None);
        assert_eq!(c.threads, Some(DEFAULT_THREADS));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let c = config(&["-port", "9000", "-threads", "2"]);
        assert_eq!(c.port, Some(9000));
        assert_eq!(c.threads, Some(2));
    }

    #[test]
    fn negative_numbers_are_not_rewritten() {
        assert_eq!(long_flag(OsString::from("-5")), OsString::from("-5"));
        assert_eq!(long_flag(OsString::from("-x")), OsString::from("-x"));
        assert_eq!(long_flag(OsString::from("-port")), OsString::from("--port"));
    }
}

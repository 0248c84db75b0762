//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Find akakce.com product links for a list of search queries.
///
/// Reads queries from a CSV file (column "A", or the first column), searches
/// each one and writes a `Search,Link` CSV with the first akakce.com result.
#[derive(Parser, Debug, Clone)]
#[command(name = "akakce-search")]
#[command(author, version, about)]
pub struct Args {
    /// CSV file with one query per row
    pub input: PathBuf,

    /// Output CSV path (default: <input stem>-links.csv next to the input)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Proxy for plain-HTTP search requests
    #[arg(long, value_name = "URL")]
    pub http_proxy: Option<String>,

    /// Proxy for HTTPS search requests
    #[arg(long, value_name = "URL")]
    pub https_proxy: Option<String>,

    /// Log file path (default: automation.log)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Config file path (default: $XDG_CONFIG_HOME/akakce-search/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored console output
    #[arg(long)]
    pub no_color: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_minimal_args_parses_successfully() {
        let args = Args::try_parse_from(["akakce-search", "queries.csv"]).unwrap();
        assert_eq!(args.input, PathBuf::from("queries.csv"));
        assert!(args.output.is_none());
        assert!(args.http_proxy.is_none());
        assert!(args.https_proxy.is_none());
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(!args.no_color);
        assert!(!args.no_progress);
    }

    #[test]
    fn test_cli_missing_input_returns_error() {
        let err = Args::try_parse_from(["akakce-search"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["akakce-search", "q.csv", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["akakce-search", "q.csv", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let err = Args::try_parse_from(["akakce-search", "q.csv", "-q", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_output_short_and_long_flags() {
        let args = Args::try_parse_from(["akakce-search", "q.csv", "-o", "out.csv"]).unwrap();
        assert_eq!(args.output, Some(PathBuf::from("out.csv")));

        let args =
            Args::try_parse_from(["akakce-search", "q.csv", "--output", "links.csv"]).unwrap();
        assert_eq!(args.output, Some(PathBuf::from("links.csv")));
    }

    #[test]
    fn test_cli_proxy_flags() {
        let args = Args::try_parse_from([
            "akakce-search",
            "q.csv",
            "--http-proxy",
            "http://10.0.0.1:8080",
            "--https-proxy",
            "http://10.0.0.1:8443",
        ])
        .unwrap();
        assert_eq!(args.http_proxy.as_deref(), Some("http://10.0.0.1:8080"));
        assert_eq!(args.https_proxy.as_deref(), Some("http://10.0.0.1:8443"));
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["akakce-search", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["akakce-search", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Args::try_parse_from(["akakce-search", "q.csv", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}

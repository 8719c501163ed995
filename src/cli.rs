//! CLI argument parsing module for relcheck

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Default GitHub API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Parse a timeout given in whole seconds
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: u64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid timeout in seconds: {}", s))?;
    if secs == 0 {
        return Err("timeout must be at least 1 second".to_string());
    }
    Ok(Duration::from_secs(secs))
}

/// Check tracked dependencies for new upstream releases and file GitHub issues
#[derive(Parser, Debug, Clone)]
#[command(
    name = "relcheck",
    version,
    about = "Check tracked dependencies for new upstream releases",
    disable_version_flag = true
)]
pub struct CliArgs {
    /// GitHub username used when authenticating for API use
    pub username: String,

    /// Repository receiving notifications: <owner>/<repo>, or <owner>/<repo>#<issue> to comment
    pub notify_repo: String,

    /// Configuration file defining the dependencies to query
    #[arg(short, long, required = true)]
    pub config: PathBuf,

    /// Directory holding the reference version files
    #[arg(short, long, default_value = ".")]
    pub refdir: PathBuf,

    /// Print notifications to the console instead of posting them to GitHub
    #[arg(short, long)]
    pub dry_run: bool,

    /// Prompt for the password instead of reading RELEASECHECK_PW
    #[arg(short, long)]
    pub password: bool,

    /// GitHub API base URL
    #[arg(long, env = "RELEASECHECK_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// HTTP timeout in seconds
    #[arg(long, value_parser = parse_timeout, default_value = "30")]
    pub timeout: Duration,

    /// Output the run report in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable quiet mode - only errors are logged
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print version
    #[arg(long = "print-version", action = clap::ArgAction::Version)]
    pub print_version: Option<bool>,
}

impl CliArgs {
    /// Default log filter derived from the verbosity flags
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    /// Whether an interactive progress spinner should be drawn
    pub fn show_progress(&self) -> bool {
        !(self.quiet || self.verbose || self.json)
    }
}

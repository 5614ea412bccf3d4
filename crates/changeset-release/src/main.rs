mod error;
mod output;
mod repository;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use release_core::CommitMode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "changeset-release")]
#[command(version)]
#[command(
    about = "Open a version pull request from pending changesets, or publish and tag the released packages",
    long_about = None
)]
pub(crate) struct Cli {
    /// Path to start project discovery from (default: current directory)
    #[arg(long = "path", short = 'C')]
    pub(crate) path: Option<PathBuf>,

    /// Command that publishes packages, run when no changesets are pending
    #[arg(long)]
    pub(crate) publish: Option<String>,

    /// Command that applies changesets (default: `cargo changeset version`)
    #[arg(long)]
    pub(crate) version_command: Option<String>,

    /// Title of the version pull request
    #[arg(long)]
    pub(crate) title: Option<String>,

    /// Message of the version commit
    #[arg(long)]
    pub(crate) commit_message: Option<String>,

    /// How commits and tags reach the remote: `cli` (local git) or `api`
    #[arg(long)]
    pub(crate) commit_mode: Option<CommitMode>,

    /// Branch the version pull request targets (default: current branch)
    #[arg(long)]
    pub(crate) base_branch: Option<String>,

    /// Maximum length of the pull request description, in characters
    #[arg(long)]
    pub(crate) pr_body_max_chars: Option<usize>,

    /// Label to add to the version pull request (repeatable)
    #[arg(long = "label")]
    pub(crate) labels: Vec<String>,

    /// Do not create GitHub releases for published packages
    #[arg(long)]
    pub(crate) no_releases: bool,

    /// Do not configure the git user before committing
    #[arg(long)]
    pub(crate) no_setup_git_user: bool,

    /// Git user name for version commits (default: github-actions[bot])
    #[arg(long)]
    pub(crate) git_user_name: Option<String>,

    /// Git user email for version commits
    #[arg(long)]
    pub(crate) git_user_email: Option<String>,

    /// Compute the version pull request without pushing or calling GitHub
    #[arg(long)]
    pub(crate) dry_run: bool,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub(crate) github_token: Option<String>,

    /// Repository as `owner/name` (default: derived from the `origin` remote)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub(crate) repo: Option<String>,

    #[arg(long, env = "GITHUB_API_URL")]
    pub(crate) api_url: Option<String>,

    /// Web URL of the GitHub server, used for changelog links
    #[arg(long, env = "GITHUB_SERVER_URL", default_value = "https://github.com")]
    pub(crate) server_url: String,

    /// File to append `key=value` outputs to (default: print to stdout)
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub(crate) output_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    let start_path = match resolve_start_path(cli.path.clone()) {
        Ok(path) => path,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run::execute(&cli, &start_path) {
        print_error(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Logs go to stderr so stdout carries only outputs. `RUST_LOG` overrides
/// the default `info` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();
}

fn resolve_start_path(path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    match path {
        Some(p) => Ok(p),
        None => std::env::current_dir().map_err(CliError::CurrentDir),
    }
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}

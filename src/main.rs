pub mod config;
pub mod download;
pub mod error;
pub mod maven;
pub mod util;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::MvngetConfig;
use crate::download::Downloader;
use crate::error::MvngetError;
use crate::maven::coordinates::PackageResolver;
use crate::maven::locator::{ArtifactLocator, ResolvedArtifact};
use crate::maven::metadata_client::MetadataClient;
use crate::util::http_client::HttpClient;

/// Downloads the latest snapshot jar of a package from a Maven repository
#[derive(Parser, Debug)]
#[command(name = "mvnget", version)]
struct AppArgs {
    /// An alias from the configuration, 'group:artifact', or a bare artifact name in the default group
    package: String,

    /// Where to write the jar
    dest: PathBuf,

    /// TOML configuration file with repo, default_group and aliases
    #[arg(short, long, env = "MVNGET_CONFIG")]
    config: Option<PathBuf>,

    /// Repository root URL, overrides the configuration
    #[arg(long)]
    repo: Option<String>,

    /// Log progress to stderr (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = AppArgs::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => {
            println!("OK");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("mvnget: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// stdout is reserved for the "OK", so all logging goes to stderr
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

async fn run(args: AppArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref(), args.repo)?;
    fetch_latest_snapshot(&config, &args.package, &args.dest).await?;
    Ok(())
}

fn load_config(path: Option<&Path>, repo: Option<String>) -> Result<MvngetConfig, MvngetError> {
    let mut config = match path {
        Some(path) => MvngetConfig::load(path)?,
        None => MvngetConfig::default(),
    };

    if let Some(repo) = repo {
        config.repo = repo;
        config = config.validated("--repo")?;
    }
    Ok(config)
}

/// The whole run: package name -> coordinate -> latest version -> binary snapshot -> local file.
///  Each step needs the previous one's result, the first failure ends the run.
async fn fetch_latest_snapshot(config: &MvngetConfig, package: &str, dest: &Path) -> Result<ResolvedArtifact, MvngetError> {
    let coordinate = PackageResolver::new(&config.aliases, &config.default_group)
        .resolve(package)?;
    debug!("package {:?} is {}", package, coordinate);

    let http_client = HttpClient::new(config.user_agent.clone(), config.timeout());

    let metadata_client = MetadataClient::new(http_client.clone());
    let resolved = ArtifactLocator::new(&metadata_client, &config.repo)
        .locate(&coordinate)
        .await?;

    let url = resolved.download_url();
    info!("downloading {} to {}", url, dest.display());
    Downloader::new(http_client)
        .download(&url, dest)
        .await?;

    Ok(resolved)
}

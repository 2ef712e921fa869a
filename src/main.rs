//! droidstrap - Android SDK bootstrapper
//!
//! Command-line entry point: loads configuration, sets up logging and runs
//! the requested command.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use droidstrap::commands::{EnvCommand, InstallCommand, VerifyCommand};
use droidstrap::core::{AppConfig, APP_NAME, VERSION};
use droidstrap::toolchain::ToolContext;

#[derive(Parser, Debug)]
#[command(name = "droidstrap", version, about = "Make sure an Android SDK is ready to build with")]
struct Cli {
    /// Configuration file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory downloaded tools are cached in
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Host OS identifier to provision for (e.g. Windows, Darwin, Linux)
    #[arg(long, global = true)]
    host_os: Option<String>,

    /// Accept SDK licenses without prompting
    #[arg(long, short = 'y', global = true)]
    accept_licenses: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify the Android SDK, installing it when missing, and print its root
    Verify,
    /// Print ANDROID_HOME / ANDROID_SDK_ROOT for the verified SDK
    Env,
    /// Install SDK packages, e.g. `platform-tools` or `platforms;android-34`
    Install {
        packages: Vec<String>,
    },
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path).await?,
        None => AppConfig::load().await?,
    };
    if cli.cache_dir.is_some() {
        config.cache_dir = cli.cache_dir.clone();
    }
    if cli.host_os.is_some() {
        config.host_os = cli.host_os.clone();
    }
    if cli.accept_licenses {
        config.android.auto_accept_licenses = true;
    }

    init_logging(&config.log_level)?;
    debug!("{} v{} starting with {:?}", APP_NAME, VERSION, config);

    let ctx = ToolContext::from_config(&config)?;

    match cli.command {
        Commands::Verify => {
            VerifyCommand.execute(&ctx).await?;
        }
        Commands::Env => EnvCommand.execute(&ctx).await?,
        Commands::Install { packages } => InstallCommand { packages }.execute(&ctx).await?,
    }

    Ok(())
}

/// Logs go to stderr so command output on stdout stays scriptable
fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

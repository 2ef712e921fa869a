//! Android SDK verification
//!
//! Makes sure a usable SDK exists under the cache directory, downloading
//! and preparing one when it does not.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, debug, warn};

use crate::context::ToolContext;
use crate::downloader::DownloadError;
use crate::extract::UnpackError;
use crate::host::HostOs;
use crate::sdk::AndroidSdk;
use crate::sdk_manager::SdkManager;

/// Build of the SDK tools bundle that gets installed
pub const SDK_TOOLS_VERSION: &str = "4333796";

const ANDROID_DL_URL: &str = "https://dl.google.com/android/repository";

/// Errors surfaced to the user while verifying the SDK
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The SDK tools could not be fetched for lack of connectivity
    #[error("Unable to download the Android SDK from {url} ({reason}). Is your computer offline?")]
    NetworkFailure {
        /// URL that was being downloaded
        url: String,
        /// Underlying connection error
        reason: String,
    },
    /// Fatal; verification cannot continue
    #[error("{0}")]
    Command(String),
    /// Filesystem failure in the cache directory
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl VerifyError {
    /// Whether retrying once online may help
    pub fn is_network_failure(&self) -> bool {
        matches!(self, VerifyError::NetworkFailure { .. })
    }
}

/// Download URL of the SDK tools bundle for `host_os`
pub fn sdk_tools_url(host_os: &HostOs) -> String {
    format!(
        "{}/sdk-tools-{}-{}.zip",
        ANDROID_DL_URL,
        host_os.platform_token(),
        SDK_TOOLS_VERSION
    )
}

/// Root of the managed SDK inside `cache_dir`
pub fn sdk_root(cache_dir: &Path) -> PathBuf {
    cache_dir.join("tools").join("android_sdk")
}

/// Ensure an Android SDK is installed under the context's cache directory.
///
/// An existing install with an executable SDK manager and an accepted
/// license is returned untouched. Otherwise the SDK tools are downloaded,
/// unpacked, made executable and the license review is run.
pub async fn verify_android_sdk(ctx: &ToolContext) -> Result<AndroidSdk, VerifyError> {
    let sdk = AndroidSdk::new(sdk_root(&ctx.cache_dir), ctx.host_os.clone());

    if is_ready(&sdk) {
        debug!("Android SDK ready at {:?}", sdk.root_path());
        return Ok(sdk);
    }

    info!("Android SDK not found at {:?}; installing", sdk.root_path());
    install_sdk_tools(ctx, &sdk).await?;
    accept_license(ctx, &sdk).await?;

    info!("Android SDK installed at {:?}", sdk.root_path());
    Ok(sdk)
}

fn is_ready(sdk: &AndroidSdk) -> bool {
    let sdkmanager = sdk.sdkmanager_path();

    if !sdkmanager.exists() {
        debug!("{:?} does not exist", sdkmanager);
        return false;
    }
    if !sdk.host_os().is_windows() && !is_executable(&sdkmanager) {
        debug!("{:?} is not executable", sdkmanager);
        return false;
    }
    sdk.has_accepted_license()
}

async fn install_sdk_tools(ctx: &ToolContext, sdk: &AndroidSdk) -> Result<(), VerifyError> {
    let url = sdk_tools_url(&ctx.host_os);
    let download_path = ctx.cache_dir.join("tools");

    let archive = ctx
        .downloader
        .download(&url, &download_path)
        .await
        .map_err(|e| match e {
            DownloadError::Connection(reason) => VerifyError::NetworkFailure {
                url: url.clone(),
                reason,
            },
            DownloadError::Io(e) => VerifyError::Io(e),
            other => VerifyError::Command(format!("Unable to download the Android SDK: {}", other)),
        })?;

    ctx.unpacker
        .unpack(&archive, sdk.root_path())
        .await
        .map_err(|e| match e {
            UnpackError::InvalidArchive(reason) => VerifyError::Command(format!(
                "Unable to unpack the Android SDK archive {} ({}). The download may be \
                 corrupt; delete it and try again.",
                archive.display(),
                reason
            )),
            UnpackError::Io(e) => VerifyError::Io(e),
        })?;

    match tokio::fs::remove_file(&archive).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("Downloaded archive {:?} was already removed", archive);
        }
        Err(e) => return Err(e.into()),
    }

    // archives do not always preserve execute bits
    if !ctx.host_os.is_windows() {
        make_tools_executable(&sdk.tools_bin_dir()).await?;
    }

    Ok(())
}

async fn accept_license(ctx: &ToolContext, sdk: &AndroidSdk) -> Result<(), VerifyError> {
    SdkManager::new(sdk.clone(), ctx.runner.clone())
        .accept_licenses(ctx.auto_accept_licenses)
        .await
        .map_err(|e| {
            VerifyError::Command(format!("Error while reviewing Android SDK licenses: {}", e))
        })?;

    if !sdk.has_accepted_license() {
        return Err(VerifyError::Command(
            "You did not accept the Android SDK licenses. The license must be accepted \
             before the Android SDK can be used."
                .to_string(),
        ));
    }
    Ok(())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.exists()
}

#[cfg(unix)]
async fn make_tools_executable(bin_dir: &Path) -> io::Result<()> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    let mut entries = match tokio::fs::read_dir(bin_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("{:?} missing after unpacking", bin_dir);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if metadata.is_file() && metadata.permissions().mode() & 0o111 == 0 {
            debug!("Marking {:?} executable", entry.path());
            tokio::fs::set_permissions(entry.path(), Permissions::from_mode(0o755)).await?;
        }
    }
    Ok(())
}

#[cfg(not(unix))]
async fn make_tools_executable(_bin_dir: &Path) -> io::Result<()> {
    Ok(())
}

//! Android Toolchain Management
//!
//! Makes sure an Android SDK is present before a build proceeds:
//! - Detection of an existing, ready install
//! - Download and extraction of the SDK tools
//! - License acceptance through `sdkmanager`

#![warn(missing_docs)]

pub mod context;
pub mod downloader;
pub mod extract;
pub mod host;
pub mod runner;
pub mod sdk;
pub mod sdk_manager;
pub mod verifier;

#[cfg(test)]
mod testing;

pub use context::{ArchiveUnpacker, ContextError, Downloader, Invocation, ProcessOutcome, ProcessRunner, ToolContext};
pub use downloader::{DownloadError, HttpDownloader};
pub use extract::{ArchiveExtractor, UnpackError};
pub use host::HostOs;
pub use runner::SystemRunner;
pub use sdk::AndroidSdk;
pub use sdk_manager::{SdkComponent, SdkManager, SdkManagerError};
pub use verifier::{sdk_root, sdk_tools_url, verify_android_sdk, VerifyError, SDK_TOOLS_VERSION};

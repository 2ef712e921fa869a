//! droidstrap - Android SDK bootstrapper
//!
//! Guarantees that a usable Android SDK exists in the tool cache before a
//! build proceeds, downloading and preparing one when it is missing.
//!
//! ## Architecture
//!
//! - `droidstrap-core`: configuration and shared error types
//! - `droidstrap-android-toolchain`: SDK verification, download, extraction and `sdkmanager` access

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod commands;

pub use droidstrap_core as core;
pub use droidstrap_android_toolchain as toolchain;

/// Prelude module for convenient imports
pub mod prelude {
    pub use droidstrap_core::config::AppConfig;
    pub use droidstrap_android_toolchain::{verify_android_sdk, AndroidSdk, SdkManager, ToolContext};
}

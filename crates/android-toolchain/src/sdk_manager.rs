//! SDK Manager
//!
//! Wraps the Android SDK manager to accept licenses and install SDK components.

use std::sync::Arc;

use tracing::{info, warn};

use crate::context::{Invocation, ProcessRunner};
use crate::sdk::AndroidSdk;

/// Answers fed to `sdkmanager` prompts when licenses are accepted automatically
const AUTO_ACCEPT_ANSWERS: usize = 20;

/// SDK component types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkComponent {
    /// `platforms;android-XX`
    Platform(u32),
    /// `build-tools;XX.X.X`
    BuildTools(String),
    /// `platform-tools`
    PlatformTools,
    /// `cmdline-tools;XX.X`
    CmdlineTools(String),
    /// `sources;android-XX`
    Sources(u32),
    /// `system-images;android-XX;tag;abi`
    SystemImage(u32, String, String),
    /// `emulator`
    Emulator,
    /// `ndk;XX.X.XXXXX`
    Ndk(String),
    /// Any other package name, passed through as is
    Other(String),
}

impl SdkComponent {
    /// Get the SDK manager package name
    pub fn package_name(&self) -> String {
        match self {
            SdkComponent::Platform(api) => format!("platforms;android-{}", api),
            SdkComponent::BuildTools(version) => format!("build-tools;{}", version),
            SdkComponent::PlatformTools => "platform-tools".to_string(),
            SdkComponent::CmdlineTools(version) => format!("cmdline-tools;{}", version),
            SdkComponent::Sources(api) => format!("sources;android-{}", api),
            SdkComponent::SystemImage(api, abi, tag) => {
                format!("system-images;android-{};{};{}", api, tag, abi)
            }
            SdkComponent::Emulator => "emulator".to_string(),
            SdkComponent::Ndk(version) => format!("ndk;{}", version),
            SdkComponent::Other(name) => name.clone(),
        }
    }

    /// Parse an SDK manager package name; unrecognised names become `Other`
    pub fn parse(package: &str) -> Self {
        let api_level = |s: &str| s.strip_prefix("android-").and_then(|v| v.parse::<u32>().ok());
        let parts: Vec<&str> = package.split(';').collect();

        let parsed = match parts.as_slice() {
            ["platform-tools"] => Some(SdkComponent::PlatformTools),
            ["emulator"] => Some(SdkComponent::Emulator),
            ["platforms", api] => api_level(*api).map(SdkComponent::Platform),
            ["sources", api] => api_level(*api).map(SdkComponent::Sources),
            ["build-tools", version] => Some(SdkComponent::BuildTools(version.to_string())),
            ["cmdline-tools", version] => Some(SdkComponent::CmdlineTools(version.to_string())),
            ["ndk", version] => Some(SdkComponent::Ndk(version.to_string())),
            ["system-images", api, tag, abi] => api_level(*api)
                .map(|api| SdkComponent::SystemImage(api, abi.to_string(), tag.to_string())),
            _ => None,
        };

        parsed.unwrap_or_else(|| SdkComponent::Other(package.to_string()))
    }
}

/// SDK Manager errors
#[derive(Debug, thiserror::Error)]
pub enum SdkManagerError {
    /// `sdkmanager` could not be run or exited unsuccessfully
    #[error("Command failed: {0}")]
    CommandFailed(String),
    /// Filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Android SDK Manager wrapper
pub struct SdkManager {
    sdk: AndroidSdk,
    runner: Arc<dyn ProcessRunner>,
}

impl SdkManager {
    /// Manage `sdk`, running `sdkmanager` through `runner`
    pub fn new(sdk: AndroidSdk, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { sdk, runner }
    }

    /// The managed SDK
    pub fn sdk(&self) -> &AndroidSdk {
        &self.sdk
    }

    /// Build an `sdkmanager` invocation with the SDK environment
    fn invocation(&self, args: &[String], auto_accept: bool) -> Invocation {
        let mut invocation = Invocation::new(self.sdk.sdkmanager_path()).envs(self.sdk.env());
        invocation.args.extend(args.iter().cloned());

        if auto_accept {
            invocation = invocation.stdin(b"y\n".repeat(AUTO_ACCEPT_ANSWERS));
        }
        invocation
    }

    async fn run(&self, args: &[String], auto_accept: bool) -> Result<(), SdkManagerError> {
        let invocation = self.invocation(args, auto_accept);
        let outcome = self.runner.run(&invocation).await?;

        if !outcome.success {
            return Err(SdkManagerError::CommandFailed(format!(
                "sdkmanager {} exited with code {:?}",
                args.join(" "),
                outcome.code
            )));
        }
        Ok(())
    }

    /// Review (or, with `auto_accept`, accept) the SDK licenses
    pub async fn accept_licenses(&self, auto_accept: bool) -> Result<(), SdkManagerError> {
        info!("Reviewing Android SDK licenses...");
        self.run(&["--licenses".to_string()], auto_accept).await?;

        if !self.sdk.has_accepted_license() {
            warn!("sdkmanager finished but no license marker was written");
        }
        Ok(())
    }

    /// Install SDK components
    pub async fn install(
        &self,
        components: &[SdkComponent],
        auto_accept: bool,
    ) -> Result<(), SdkManagerError> {
        let packages: Vec<String> = components.iter().map(|c| c.package_name()).collect();

        info!("Installing SDK packages: {:?}", packages);
        self.run(&packages, auto_accept).await?;

        info!("SDK packages installed successfully");
        Ok(())
    }
}

//! CLI commands for droidstrap
//!
//! Each command verifies the SDK first; builds can rely on its presence
//! once any of them has succeeded.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tracing::info;

use droidstrap_android_toolchain::{
    verify_android_sdk, AndroidSdk, SdkComponent, SdkManager, ToolContext,
};

/// Verify (installing when needed) the Android SDK
pub struct VerifyCommand;

impl VerifyCommand {
    /// Execute the verify command, printing the SDK root
    pub async fn execute(&self, ctx: &ToolContext) -> Result<AndroidSdk> {
        let sdk = verify_android_sdk(ctx)
            .await
            .context("Android SDK verification failed")?;

        println!("{}", sdk.root_path().display());
        Ok(sdk)
    }
}

/// Print the environment pointing tools at the SDK
pub struct EnvCommand;

impl EnvCommand {
    /// Execute the env command
    pub async fn execute(&self, ctx: &ToolContext) -> Result<()> {
        let sdk = verify_android_sdk(ctx)
            .await
            .context("Android SDK verification failed")?;

        print!("{}", render_env(&sdk.env()));
        Ok(())
    }
}

/// `KEY=VALUE` lines, one per variable
pub fn render_env(env: &BTreeMap<String, String>) -> String {
    env.iter()
        .map(|(key, value)| format!("{}={}\n", key, value))
        .collect()
}

/// Install SDK packages through `sdkmanager`
pub struct InstallCommand {
    /// Package names as `sdkmanager` spells them
    pub packages: Vec<String>,
}

impl InstallCommand {
    /// Requested packages as SDK components
    pub fn components(&self) -> Vec<SdkComponent> {
        self.packages.iter().map(|p| SdkComponent::parse(p)).collect()
    }

    /// Execute the install command
    pub async fn execute(&self, ctx: &ToolContext) -> Result<()> {
        let sdk = verify_android_sdk(ctx)
            .await
            .context("Android SDK verification failed")?;

        let components = self.components();
        if components.is_empty() {
            info!("No packages requested");
            return Ok(());
        }

        SdkManager::new(sdk, ctx.runner.clone())
            .install(&components, ctx.auto_accept_licenses)
            .await
            .with_context(|| format!("Unable to install {}", self.packages.join(", ")))?;

        Ok(())
    }
}

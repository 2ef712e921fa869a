//! Handle to a verified Android SDK installation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::host::HostOs;

/// An Android SDK rooted at `root_path`.
///
/// Normally obtained from [`crate::verify_android_sdk`], which only returns
/// one once the SDK manager and the accepted license are in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndroidSdk {
    root_path: PathBuf,
    host_os: HostOs,
}

impl AndroidSdk {
    /// SDK rooted at `root_path`, laid out for `host_os`
    pub fn new(root_path: PathBuf, host_os: HostOs) -> Self {
        Self { root_path, host_os }
    }

    /// SDK root directory
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Host the SDK was provisioned for
    pub fn host_os(&self) -> &HostOs {
        &self.host_os
    }

    /// `tools/bin`, where the SDK manager and its sibling scripts live
    pub fn tools_bin_dir(&self) -> PathBuf {
        self.root_path.join("tools").join("bin")
    }

    /// The SDK manager launcher
    pub fn sdkmanager_path(&self) -> PathBuf {
        self.tools_bin_dir().join(self.host_os.script_name("sdkmanager"))
    }

    /// The AVD manager launcher
    pub fn avdmanager_path(&self) -> PathBuf {
        self.tools_bin_dir().join(self.host_os.script_name("avdmanager"))
    }

    /// `adb`, present once platform-tools is installed
    pub fn adb_path(&self) -> PathBuf {
        self.root_path
            .join("platform-tools")
            .join(self.host_os.exe_name("adb"))
    }

    /// The emulator binary, present once the emulator is installed
    pub fn emulator_path(&self) -> PathBuf {
        self.root_path
            .join("emulator")
            .join(self.host_os.exe_name("emulator"))
    }

    /// Marker written by `sdkmanager --licenses` once the license is accepted
    pub fn license_path(&self) -> PathBuf {
        self.root_path.join("licenses").join("android-sdk-license")
    }

    /// Whether the license marker exists
    pub fn has_accepted_license(&self) -> bool {
        self.license_path().exists()
    }

    /// Environment variables pointing Android tools at this SDK
    pub fn env(&self) -> BTreeMap<String, String> {
        let root = self.root_path.to_string_lossy().to_string();

        let mut vars = BTreeMap::new();
        vars.insert("ANDROID_HOME".to_string(), root.clone());
        vars.insert("ANDROID_SDK_ROOT".to_string(), root);
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_paths_on_linux() {
        let sdk = AndroidSdk::new(PathBuf::from("/cache/tools/android_sdk"), HostOs::new("Linux"));

        assert_eq!(
            sdk.sdkmanager_path(),
            PathBuf::from("/cache/tools/android_sdk/tools/bin/sdkmanager")
        );
        assert_eq!(
            sdk.avdmanager_path(),
            PathBuf::from("/cache/tools/android_sdk/tools/bin/avdmanager")
        );
        assert_eq!(
            sdk.adb_path(),
            PathBuf::from("/cache/tools/android_sdk/platform-tools/adb")
        );
        assert_eq!(
            sdk.license_path(),
            PathBuf::from("/cache/tools/android_sdk/licenses/android-sdk-license")
        );
    }

    #[test]
    fn test_tool_paths_on_windows() {
        let sdk = AndroidSdk::new(PathBuf::from("sdk"), HostOs::new("Windows"));

        assert!(sdk.sdkmanager_path().ends_with("sdkmanager.bat"));
        assert!(sdk.avdmanager_path().ends_with("avdmanager.bat"));
        assert!(sdk.adb_path().ends_with("adb.exe"));
        assert!(sdk.emulator_path().ends_with("emulator.exe"));
    }

    #[test]
    fn test_env_points_at_root() {
        let sdk = AndroidSdk::new(PathBuf::from("/sdk"), HostOs::new("Linux"));
        let env = sdk.env();

        assert_eq!(env.len(), 2);
        assert_eq!(env["ANDROID_HOME"], "/sdk");
        assert_eq!(env["ANDROID_SDK_ROOT"], "/sdk");
    }
}

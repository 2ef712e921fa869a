//! Host platform identification

use std::fmt;

/// Identifier of the operating system the tools will run on.
///
/// Only two things are derived from it: whether the host is Windows (which
/// changes executable names and skips permission handling) and the platform
/// token used in download URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostOs(String);

impl HostOs {
    /// Identifier reported for Windows hosts
    pub const WINDOWS: &'static str = "Windows";

    /// Wrap a host identifier as given
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Host OS of the running binary
    pub fn current() -> Self {
        let name = match std::env::consts::OS {
            "windows" => Self::WINDOWS,
            "macos" => "Darwin",
            "linux" => "Linux",
            other => other,
        };
        Self::new(name)
    }

    /// The identifier as given
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact match on `Windows`
    pub fn is_windows(&self) -> bool {
        self.0 == Self::WINDOWS
    }

    /// Lower-cased identifier, as used in Google's repository URLs
    pub fn platform_token(&self) -> String {
        self.0.to_lowercase()
    }

    /// Name of a launcher script (`.bat` on Windows)
    pub fn script_name(&self, base: &str) -> String {
        if self.is_windows() {
            format!("{}.bat", base)
        } else {
            base.to_string()
        }
    }

    /// Name of a native executable (`.exe` on Windows)
    pub fn exe_name(&self, base: &str) -> String {
        if self.is_windows() {
            format!("{}.exe", base)
        } else {
            base.to_string()
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HostOs {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_token_is_lowercased_verbatim() {
        assert_eq!(HostOs::new("Windows").platform_token(), "windows");
        assert_eq!(HostOs::new("Unknown").platform_token(), "unknown");
        assert_eq!(HostOs::new("Darwin").platform_token(), "darwin");
        assert_eq!(HostOs::new("ArbitraryNotWindows").platform_token(), "arbitrarynotwindows");
    }

    #[test]
    fn test_only_exact_windows_is_windows() {
        assert!(HostOs::new("Windows").is_windows());
        assert!(!HostOs::new("windows").is_windows());
        assert!(!HostOs::new("Linux").is_windows());
    }

    #[test]
    fn test_executable_names() {
        let windows = HostOs::new("Windows");
        let linux = HostOs::new("Linux");
        assert_eq!(windows.script_name("sdkmanager"), "sdkmanager.bat");
        assert_eq!(linux.script_name("sdkmanager"), "sdkmanager");
        assert_eq!(windows.exe_name("adb"), "adb.exe");
        assert_eq!(linux.exe_name("adb"), "adb");
    }

    #[test]
    fn test_current_matches_build_target() {
        assert_eq!(HostOs::current().is_windows(), cfg!(windows));
    }
}

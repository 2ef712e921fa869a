//! Tool context
//!
//! Everything the verifier needs from the outside world: where the cache
//! lives, which host it runs for, and the download, unpack and process
//! capabilities. Tests substitute their own capability implementations.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::BoxFuture;
use droidstrap_core::{AppConfig, DroidstrapError};

use crate::downloader::{DownloadError, HttpDownloader};
use crate::extract::{ArchiveExtractor, UnpackError};
use crate::host::HostOs;
use crate::runner::SystemRunner;

/// Fetches a URL into a directory
pub trait Downloader: Send + Sync {
    /// Download `url` into `download_path`, returning the path of the saved file
    fn download<'a>(
        &'a self,
        url: &'a str,
        download_path: &'a Path,
    ) -> BoxFuture<'a, Result<PathBuf, DownloadError>>;
}

/// Unpacks an archive into a directory
pub trait ArchiveUnpacker: Send + Sync {
    /// Extract `archive` into `extract_dir`
    fn unpack<'a>(
        &'a self,
        archive: &'a Path,
        extract_dir: &'a Path,
    ) -> BoxFuture<'a, Result<(), UnpackError>>;
}

/// Runs an external program to completion
pub trait ProcessRunner: Send + Sync {
    /// Run `invocation` and wait for it to exit
    fn run<'a>(&'a self, invocation: &'a Invocation) -> BoxFuture<'a, io::Result<ProcessOutcome>>;
}

/// A program to run, with its arguments and extra environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable to launch
    pub program: PathBuf,
    /// Command-line arguments
    pub args: Vec<String>,
    /// Variables added to the inherited environment
    pub env: BTreeMap<String, String>,
    /// Bytes written to stdin; `None` inherits the terminal
    pub stdin: Option<Vec<u8>>,
}

impl Invocation {
    /// Invocation of `program` with no arguments
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            stdin: None,
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add environment variables
    pub fn envs(mut self, env: BTreeMap<String, String>) -> Self {
        self.env.extend(env);
        self
    }

    /// Feed `input` to the process on stdin
    pub fn stdin(mut self, input: Vec<u8>) -> Self {
        self.stdin = Some(input);
        self
    }
}

/// How a finished process exited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Whether the process exited successfully
    pub success: bool,
    /// Exit code, absent when killed by a signal
    pub code: Option<i32>,
}

impl ProcessOutcome {
    /// Outcome of a process that exited with `code`
    pub fn from_code(code: i32) -> Self {
        Self {
            success: code == 0,
            code: Some(code),
        }
    }
}

/// Errors building a context from configuration
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// Cache directory could not be resolved
    #[error(transparent)]
    Config(#[from] DroidstrapError),
    /// HTTP client could not be built
    #[error(transparent)]
    Download(#[from] DownloadError),
}

/// Configuration and capabilities handed to the verifier
#[derive(Clone)]
pub struct ToolContext {
    /// Directory the SDK and downloads live in
    pub cache_dir: PathBuf,
    /// Host the SDK is provisioned for
    pub host_os: HostOs,
    /// Accept licenses without prompting
    pub auto_accept_licenses: bool,
    /// Network access
    pub downloader: Arc<dyn Downloader>,
    /// Archive extraction
    pub unpacker: Arc<dyn ArchiveUnpacker>,
    /// External processes
    pub runner: Arc<dyn ProcessRunner>,
}

impl ToolContext {
    /// Context with license prompting left to the user
    pub fn new(
        cache_dir: PathBuf,
        host_os: HostOs,
        downloader: Arc<dyn Downloader>,
        unpacker: Arc<dyn ArchiveUnpacker>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            cache_dir,
            host_os,
            auto_accept_licenses: false,
            downloader,
            unpacker,
            runner,
        }
    }

    /// Build a context backed by the real network, filesystem and processes
    pub fn from_config(config: &AppConfig) -> Result<Self, ContextError> {
        let host_os = config
            .host_os
            .as_deref()
            .map(HostOs::new)
            .unwrap_or_else(HostOs::current);

        let mut ctx = Self::new(
            config.resolve_cache_dir()?,
            host_os,
            Arc::new(HttpDownloader::new(&config.network)?),
            Arc::new(ArchiveExtractor),
            Arc::new(SystemRunner),
        );
        ctx.auto_accept_licenses = config.android.auto_accept_licenses;
        Ok(ctx)
    }

    /// Set whether licenses are accepted without prompting
    pub fn with_auto_accept_licenses(mut self, auto_accept: bool) -> Self {
        self.auto_accept_licenses = auto_accept;
        self
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("cache_dir", &self.cache_dir)
            .field("host_os", &self.host_os)
            .field("auto_accept_licenses", &self.auto_accept_licenses)
            .finish_non_exhaustive()
    }
}

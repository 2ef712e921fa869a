//! Recording fakes for the context capabilities.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;

use crate::context::{ArchiveUnpacker, Downloader, Invocation, ProcessOutcome, ProcessRunner, ToolContext};
use crate::downloader::DownloadError;
use crate::extract::UnpackError;
use crate::host::HostOs;

type DownloadFn = Box<dyn Fn(&str, &Path) -> Result<PathBuf, DownloadError> + Send + Sync>;
type UnpackFn = Box<dyn Fn(&Path, &Path) -> Result<(), UnpackError> + Send + Sync>;
type RunFn = Box<dyn Fn(&Invocation) -> io::Result<ProcessOutcome> + Send + Sync>;

/// Writes a small placeholder archive into the download path
pub fn write_placeholder_archive(url: &str, download_path: &Path) -> Result<PathBuf, DownloadError> {
    let name = crate::downloader::file_name_from_url(url)
        .ok_or_else(|| DownloadError::InvalidUrl(url.to_string()))?;
    std::fs::create_dir_all(download_path)?;
    let path = download_path.join(name);
    std::fs::write(&path, b"archive")?;
    Ok(path)
}

pub struct FakeDownloader {
    pub calls: Mutex<Vec<(String, PathBuf)>>,
    respond: DownloadFn,
}

impl FakeDownloader {
    pub fn new(
        respond: impl Fn(&str, &Path) -> Result<PathBuf, DownloadError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().clone()
    }
}

impl Default for FakeDownloader {
    fn default() -> Self {
        Self::new(write_placeholder_archive)
    }
}

impl Downloader for FakeDownloader {
    fn download<'a>(
        &'a self,
        url: &'a str,
        download_path: &'a Path,
    ) -> BoxFuture<'a, Result<PathBuf, DownloadError>> {
        self.calls
            .lock()
            .push((url.to_string(), download_path.to_path_buf()));
        let result = (self.respond)(url, download_path);
        async move { result }.boxed()
    }
}

pub struct FakeUnpacker {
    pub calls: Mutex<Vec<(PathBuf, PathBuf)>>,
    respond: UnpackFn,
}

impl FakeUnpacker {
    pub fn new(
        respond: impl Fn(&Path, &Path) -> Result<(), UnpackError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    pub fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.calls.lock().clone()
    }
}

impl Default for FakeUnpacker {
    fn default() -> Self {
        Self::new(|_, _| Ok(()))
    }
}

impl ArchiveUnpacker for FakeUnpacker {
    fn unpack<'a>(
        &'a self,
        archive: &'a Path,
        extract_dir: &'a Path,
    ) -> BoxFuture<'a, Result<(), UnpackError>> {
        self.calls
            .lock()
            .push((archive.to_path_buf(), extract_dir.to_path_buf()));
        let result = (self.respond)(archive, extract_dir);
        async move { result }.boxed()
    }
}

pub struct FakeRunner {
    pub calls: Mutex<Vec<Invocation>>,
    respond: RunFn,
}

impl FakeRunner {
    pub fn new(
        respond: impl Fn(&Invocation) -> io::Result<ProcessOutcome> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// A runner whose every process writes the license marker under `root`
    pub fn accepting_license(root: PathBuf) -> Self {
        Self::new(move |_| {
            let licenses = root.join("licenses");
            std::fs::create_dir_all(&licenses)?;
            std::fs::write(licenses.join("android-sdk-license"), b"\n24333f8a63b6825ea9c5514f83c2829b004d1fee")?;
            Ok(ProcessOutcome::from_code(0))
        })
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().clone()
    }
}

impl Default for FakeRunner {
    fn default() -> Self {
        Self::new(|_| Ok(ProcessOutcome::from_code(0)))
    }
}

impl ProcessRunner for FakeRunner {
    fn run<'a>(&'a self, invocation: &'a Invocation) -> BoxFuture<'a, io::Result<ProcessOutcome>> {
        self.calls.lock().push(invocation.clone());
        let result = (self.respond)(invocation);
        async move { result }.boxed()
    }
}

/// The fakes behind a context, kept so tests can inspect the recorded calls
pub struct Fakes {
    pub downloader: Arc<FakeDownloader>,
    pub unpacker: Arc<FakeUnpacker>,
    pub runner: Arc<FakeRunner>,
}

impl Fakes {
    pub fn new(downloader: FakeDownloader, unpacker: FakeUnpacker, runner: FakeRunner) -> Self {
        Self {
            downloader: Arc::new(downloader),
            unpacker: Arc::new(unpacker),
            runner: Arc::new(runner),
        }
    }

    pub fn context(&self, cache_dir: PathBuf, host_os: &str) -> ToolContext {
        ToolContext::new(
            cache_dir,
            HostOs::new(host_os),
            self.downloader.clone(),
            self.unpacker.clone(),
            self.runner.clone(),
        )
    }

    pub fn assert_untouched(&self) {
        assert!(self.downloader.calls().is_empty());
        assert!(self.unpacker.calls().is_empty());
        assert!(self.runner.calls().is_empty());
    }
}

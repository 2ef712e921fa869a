//! Toolchain Downloader
//!
//! Streams toolchain archives from the network into the cache directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Response};
use tokio::io::AsyncWriteExt;
use tracing::{info, debug, warn};

use droidstrap_core::NetworkConfig;

use crate::context::Downloader;

/// Download error types
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The server could not be reached or the transfer was cut off
    #[error("Connection failed: {0}")]
    Connection(String),
    /// The server answered with a non-success status
    #[error("HTTP {status} while downloading {url}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },
    /// The request could not be made or its response not understood
    #[error("Request failed: {0}")]
    Request(String),
    /// The URL has no file name to save the download under
    #[error("Invalid download URL: {0}")]
    InvalidUrl(String),
    /// The HTTP client could not be configured
    #[error("Unable to build HTTP client: {0}")]
    Client(String),
    /// Writing the download to disk failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            DownloadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else if err.is_connect() || err.is_timeout() || err.is_body() {
            DownloadError::Connection(err.to_string())
        } else {
            DownloadError::Request(err.to_string())
        }
    }

    /// Whether the failure is a connectivity problem
    pub fn is_connection(&self) -> bool {
        matches!(self, DownloadError::Connection(_))
    }
}

/// Last path segment of `url`, without query or fragment
pub fn file_name_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next()?;
    let (_, name) = path.rsplit_once('/')?;
    (!name.is_empty()).then_some(name)
}

/// Remove a partial download, logging when it cannot be removed
async fn discard_partial(partial: &Path) {
    match tokio::fs::remove_file(partial).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Unable to remove partial download {:?}: {}", partial, e),
    }
}

/// HTTP downloader writing into the cache directory
pub struct HttpDownloader {
    client: Client,
    show_progress: bool,
}

impl HttpDownloader {
    /// Create a new downloader
    pub fn new(config: &NetworkConfig) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("droidstrap/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DownloadError::Client(e.to_string()))?;

        Ok(Self {
            client,
            show_progress: true,
        })
    }

    /// Enable or disable the terminal progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn progress_bar(&self, total: Option<u64>) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        match total {
            Some(total) => {
                let bar = ProgressBar::new(total);
                if let Ok(style) = ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                ) {
                    bar.set_style(style.progress_chars("=> "));
                }
                bar
            }
            None => ProgressBar::new_spinner(),
        }
    }

    /// Download `url` into `download_path`, returning the saved file
    pub async fn fetch(&self, url: &str, download_path: &Path) -> Result<PathBuf, DownloadError> {
        let file_name =
            file_name_from_url(url).ok_or_else(|| DownloadError::InvalidUrl(url.to_string()))?;

        tokio::fs::create_dir_all(download_path).await?;
        let target = download_path.join(file_name);
        let partial = download_path.join(format!("{}.part", file_name));

        info!("Downloading {} to {:?}", url, target);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| DownloadError::from_reqwest(url, e))?;

        let bar = self.progress_bar(response.content_length());

        if let Err(e) = Self::write_body(url, response, &partial, &bar).await {
            bar.abandon();
            discard_partial(&partial).await;
            return Err(e);
        }
        bar.finish_and_clear();

        tokio::fs::rename(&partial, &target).await?;
        debug!("Download complete: {:?}", target);
        Ok(target)
    }

    /// Stream the response body into `partial`
    async fn write_body(
        url: &str,
        response: Response,
        partial: &Path,
        bar: &ProgressBar,
    ) -> Result<(), DownloadError> {
        let mut file = tokio::fs::File::create(partial).await?;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| DownloadError::from_reqwest(url, e))?;
            file.write_all(&chunk).await?;
            bar.inc(chunk.len() as u64);
        }

        file.flush().await?;
        Ok(())
    }
}

impl Downloader for HttpDownloader {
    fn download<'a>(
        &'a self,
        url: &'a str,
        download_path: &'a Path,
    ) -> BoxFuture<'a, Result<PathBuf, DownloadError>> {
        self.fetch(url, download_path).boxed()
    }
}

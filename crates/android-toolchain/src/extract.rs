//! Archive extraction for downloaded toolchain bundles.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use futures::future::{BoxFuture, FutureExt};
use tracing::{info, warn};

use crate::context::ArchiveUnpacker;

/// Errors unpacking an archive
#[derive(Debug, thiserror::Error)]
pub enum UnpackError {
    /// The file is not a readable archive of a supported format
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),
    /// The archive could not be read or its contents not written
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl UnpackError {
    /// Classify an error raised while decoding and writing archive entries.
    ///
    /// The decoders report bad data as invalid-data, invalid-input,
    /// unexpected-EOF or uncategorised errors; anything else comes from the
    /// filesystem.
    fn from_entry_error(context: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::InvalidData
            | io::ErrorKind::InvalidInput
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::Other => UnpackError::InvalidArchive(format!("{}: {}", context, err)),
            _ => UnpackError::Io(err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".zip") {
            Some(ArchiveFormat::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveFormat::TarGz)
        } else {
            None
        }
    }
}

/// Unpacks `.zip` and `.tar.gz` archives
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    /// Extract `archive` into `target_dir`, picking the format from the file name
    pub fn extract(archive: &Path, target_dir: &Path) -> Result<(), UnpackError> {
        match ArchiveFormat::detect(archive) {
            Some(ArchiveFormat::Zip) => Self::extract_zip(archive, target_dir),
            Some(ArchiveFormat::TarGz) => Self::extract_tar_gz(archive, target_dir),
            None => Err(UnpackError::InvalidArchive(format!(
                "unsupported archive format: {}",
                archive.display()
            ))),
        }
    }

    /// Extract a ZIP file
    pub fn extract_zip(archive: &Path, target_dir: &Path) -> Result<(), UnpackError> {
        info!("Extracting {:?} to {:?}", archive, target_dir);

        let file = File::open(archive)?;
        let mut zip = zip::ZipArchive::new(file)
            .map_err(|e| UnpackError::InvalidArchive(e.to_string()))?;

        for i in 0..zip.len() {
            let mut entry = zip
                .by_index(i)
                .map_err(|e| UnpackError::InvalidArchive(e.to_string()))?;

            let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
                warn!("Skipping archive entry with unsafe path: {}", entry.name());
                continue;
            };
            let outpath = target_dir.join(relative);

            if entry.is_dir() {
                std::fs::create_dir_all(&outpath)?;
            } else {
                if let Some(parent) = outpath.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                // replace rather than truncate, earlier installs may have left read-only files
                match std::fs::remove_file(&outpath) {
                    Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
                    _ => {}
                }
                let mut outfile = File::create(&outpath)?;
                io::copy(&mut entry, &mut outfile)
                    .map_err(|e| UnpackError::from_entry_error(entry.name(), e))?;
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
                }
            }
        }

        Ok(())
    }

    /// Extract a tar.gz file
    pub fn extract_tar_gz(archive: &Path, target_dir: &Path) -> Result<(), UnpackError> {
        info!("Extracting {:?} to {:?}", archive, target_dir);

        let file = File::open(archive)?;
        let gz = flate2::read::GzDecoder::new(file);
        let mut tar = tar::Archive::new(gz);

        std::fs::create_dir_all(target_dir)?;
        tar.unpack(target_dir)
            .map_err(|e| UnpackError::from_entry_error(&archive.display().to_string(), e))
    }
}

impl ArchiveUnpacker for ArchiveExtractor {
    fn unpack<'a>(
        &'a self,
        archive: &'a Path,
        extract_dir: &'a Path,
    ) -> BoxFuture<'a, Result<(), UnpackError>> {
        let archive: PathBuf = archive.to_path_buf();
        let extract_dir: PathBuf = extract_dir.to_path_buf();

        // zip and tar are synchronous
        async move {
            tokio::task::spawn_blocking(move || Self::extract(&archive, &extract_dir))
                .await
                .map_err(|e| UnpackError::Io(io::Error::new(io::ErrorKind::Other, e)))?
        }
        .boxed()
    }
}

//! Capture sink writing stills into the album directory
//!
//! Files land in `<root>/<album_path>/<name>.jpg`. Writes go through a temp
//! file in the same directory so a failed capture never leaves a partial JPEG
//! under the final name.

use anyhow::{Context, Result, bail};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::{CaptureRequest, FileLocator, JPEG_EXTENSION, JPEG_MIME_TYPE};

/// Upper bound on ` (n)` suffixes tried for one name
const MAX_NAME_COLLISIONS: u32 = 1000;

/// Persists encoded stills and reports where they went
pub trait CaptureSink: Send + Sync + 'static {
    fn save(&self, request: &CaptureRequest, image_bytes: &[u8]) -> Result<FileLocator>;
}

/// Sink rooted at a base directory (the home directory in production)
#[derive(Clone, Debug)]
pub struct AlbumSink {
    root: PathBuf,
}

impl AlbumSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Sink rooted at the user's home directory
    pub fn in_home() -> Result<Self> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(Self::new(home))
    }

    /// Directory the request's file goes into
    pub fn album_dir(&self, request: &CaptureRequest) -> PathBuf {
        self.root.join(&request.album_path)
    }

    /// Path for the n-th attempt at a name: `name.jpg`, `name (1).jpg`, ...
    fn candidate_path(dir: &Path, name: &str, attempt: u32) -> PathBuf {
        if attempt == 0 {
            dir.join(format!("{}.{}", name, JPEG_EXTENSION))
        } else {
            dir.join(format!("{} ({}).{}", name, attempt, JPEG_EXTENSION))
        }
    }
}

impl CaptureSink for AlbumSink {
    fn save(&self, request: &CaptureRequest, image_bytes: &[u8]) -> Result<FileLocator> {
        if request.mime_type != JPEG_MIME_TYPE {
            bail!("Unsupported capture MIME type: {}", request.mime_type);
        }

        let dir = self.album_dir(request);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create album directory: {}", dir.display()))?;

        let mut file = tempfile::Builder::new()
            .prefix(".capture-")
            .suffix(".jpg")
            .tempfile_in(&dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        file.write_all(image_bytes)
            .context("Failed to write capture data")?;
        file.as_file()
            .sync_all()
            .context("Failed to flush capture data")?;

        for attempt in 0..MAX_NAME_COLLISIONS {
            let path = Self::candidate_path(&dir, &request.name, attempt);
            match file.persist_noclobber(&path) {
                Ok(_) => {
                    log::info!(
                        "Saved capture: {} ({} bytes)",
                        path.display(),
                        image_bytes.len()
                    );
                    return Ok(FileLocator::from_path(&path));
                }
                Err(err) if err.error.kind() == std::io::ErrorKind::AlreadyExists => {
                    log::debug!("{} exists, trying next name", path.display());
                    file = err.file;
                }
                Err(err) => {
                    return Err(err.error)
                        .with_context(|| format!("Failed to persist capture: {}", path.display()));
                }
            }
        }

        bail!(
            "No free file name for {} in {}",
            request.file_name(),
            dir.display()
        )
    }
}

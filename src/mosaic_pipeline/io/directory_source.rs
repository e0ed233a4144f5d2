//! Frames dropped into a directory by the capture software.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::mosaic_pipeline::common::error::{MosaicError, Result};
use crate::mosaic_pipeline::frame::Image;
use crate::mosaic_pipeline::io::loader::decode_image;
use crate::mosaic_pipeline::io::source::FrameSource;

/// Yields the lexicographically first matching file in a directory on each
/// pull. By default a file is deleted once read, so the directory acts as a
/// queue; with `keep_inputs(true)` consumed names are remembered instead.
#[derive(Debug, Clone)]
pub struct DirectoryFrameSource {
    dir: PathBuf,
    marker: String,
    extensions: Vec<String>,
    delete_after_read: bool,
    consumed: HashSet<PathBuf>,
}

impl DirectoryFrameSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            marker: "Image".to_string(),
            extensions: vec!["png".to_string()],
            delete_after_read: true,
            consumed: HashSet::new(),
        }
    }

    /// Only file names containing `marker` are frames.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Accepted extensions, compared case-insensitively.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(|e| e.into().to_ascii_lowercase()).collect();
        self
    }

    pub fn keep_inputs(mut self, keep: bool) -> Self {
        self.delete_after_read = !keep;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Forgets which kept files were already consumed.
    pub fn restart(&mut self) {
        self.consumed.clear();
    }

    /// Matching files not yet consumed, in the order they will be read.
    pub fn pending(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() || self.consumed.contains(&path) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase())
                .unwrap_or_default();
            if name.contains(&self.marker) && self.extensions.contains(&extension) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl DirectoryFrameSource {
    /// Takes `path` off the queue whatever its fate, so a file that fails to
    /// read or decode is never handed out again. When it cannot be deleted
    /// it is remembered instead.
    fn consume(&mut self, path: PathBuf) {
        if self.delete_after_read {
            match std::fs::remove_file(&path) {
                Ok(()) => return,
                Err(e) => warn!(file = %path.display(), error = %e, "Could not delete consumed frame"),
            }
        }
        self.consumed.insert(path);
    }
}

impl FrameSource for DirectoryFrameSource {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    fn next_frame(&mut self) -> Result<Option<Image>> {
        let Some(path) = self.pending()?.into_iter().next() else {
            return Ok(None);
        };
        debug!(file = %path.display(), "Reading frame");

        let read = std::fs::read(&path);
        let message = path.display().to_string();
        self.consume(path);
        let data = read.map_err(|e| MosaicError::InputReadError(format!("{message}: {e}")))?;

        decode_image(&data).map(Some)
    }
}

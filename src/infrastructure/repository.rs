//! Source file access

use crate::error::{Result, TagsmithError};
use crate::infrastructure::overlay::{clean_path, parse_overlay_archive};
use std::collections::HashMap;
use std::fs;
use std::io::BufRead;
use std::path::Path;

/// Where Go sources are read from and written back to
pub trait SourceRepository {
    /// Read the full contents of the source at `path`
    fn read_source(&self, path: &str) -> Result<String>;

    /// Replace the contents of the source at `path`
    fn write_source(&self, path: &str, content: &str) -> Result<()>;
}

/// Sources on the local file system
#[derive(Debug, Clone, Default)]
pub struct FileSystemRepository;

impl FileSystemRepository {
    pub fn new() -> Self {
        FileSystemRepository
    }

    /// Write using a best-effort atomic replace:
    /// write to a temp file in the same directory, then rename into place.
    ///
    /// On Windows, `rename` does not overwrite existing files, so we remove the destination first.
    fn write_atomic(path: &Path, content: &str) -> Result<()> {
        let tmp_name = format!(
            "{}.tagsmith-tmp-{}",
            path.file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("source.go"),
            std::process::id()
        );
        let tmp_path = path.with_file_name(tmp_name);

        fs::write(&tmp_path, content)?;

        if cfg!(windows) && path.exists() {
            fs::remove_file(path)?;
        }

        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(TagsmithError::Io(e));
        }
        Ok(())
    }
}

impl SourceRepository for FileSystemRepository {
    fn read_source(&self, path: &str) -> Result<String> {
        fs::read_to_string(path).map_err(TagsmithError::Io)
    }

    fn write_source(&self, path: &str, content: &str) -> Result<()> {
        Self::write_atomic(Path::new(path), content)
    }
}

/// Unsaved editor buffers layered over the file system.
///
/// Reads come only from the archive; writes go to disk.
#[derive(Debug, Clone, Default)]
pub struct OverlayRepository {
    files: HashMap<String, String>,
    disk: FileSystemRepository,
}

impl OverlayRepository {
    pub fn new(files: HashMap<String, String>) -> Self {
        OverlayRepository {
            files: files
                .into_iter()
                .map(|(name, content)| (clean_path(&name), content))
                .collect(),
            disk: FileSystemRepository::new(),
        }
    }

    /// Build from an overlay archive stream
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Ok(Self::new(parse_overlay_archive(reader)?))
    }
}

impl SourceRepository for OverlayRepository {
    fn read_source(&self, path: &str) -> Result<String> {
        self.files
            .get(&clean_path(path))
            .cloned()
            .ok_or_else(|| TagsmithError::Parse(format!("couldn't find {} in archive", path)))
    }

    fn write_source(&self, path: &str, content: &str) -> Result<()> {
        self.disk.write_source(path, content)
    }
}

//! Overlay archive of unsaved editor buffers
//!
//! Each entry is a file name line, a decimal size line and then exactly that
//! many bytes of content.

use crate::error::{Result, TagsmithError};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Component, Path, PathBuf};

fn archive_error(message: String) -> TagsmithError {
    TagsmithError::Parse(format!("failed to parse --modified archive: {}", message))
}

/// Read a single `\n`-terminated line, or `None` at end of input.
fn read_line<R: BufRead>(reader: &mut R) -> std::io::Result<Option<String>> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Lexically normalise a file name: drop `.` segments, fold `..` into the
/// preceding segment and collapse repeated separators.
pub fn clean_path(name: &str) -> String {
    let mut parts: Vec<Component> = Vec::new();
    for component in Path::new(name).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return ".".to_string();
    }
    parts
        .iter()
        .collect::<PathBuf>()
        .to_string_lossy()
        .into_owned()
}

/// Parse an overlay archive into a map of cleaned file name to content.
pub fn parse_overlay_archive<R: BufRead>(mut reader: R) -> Result<HashMap<String, String>> {
    let mut overlay = HashMap::new();

    loop {
        let name = match read_line(&mut reader) {
            Ok(Some(name)) => name.trim().to_string(),
            Ok(None) => break,
            Err(e) => return Err(archive_error(format!("reading archive file name: {}", e))),
        };
        if name.is_empty() {
            continue;
        }

        let size_line = read_line(&mut reader)
            .map_err(|e| archive_error(format!("reading size of archive file {}: {}", name, e)))?
            .ok_or_else(|| {
                archive_error(format!("reading size of archive file {}: unexpected EOF", name))
            })?;
        let size: usize = size_line.trim().parse().map_err(|e| {
            archive_error(format!("parsing size of archive file {}: {}", name, e))
        })?;

        let mut content = vec![0u8; size];
        reader
            .read_exact(&mut content)
            .map_err(|e| archive_error(format!("reading archive file {}: {}", name, e)))?;
        let content = String::from_utf8(content).map_err(|e| {
            archive_error(format!("reading archive file {}: {}", name, e))
        })?;

        overlay.insert(clean_path(&name), content);
    }

    Ok(overlay)
}

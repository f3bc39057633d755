//! Gallery - result images available on disk

use std::io;
use std::path::{Path, PathBuf};

/// File names in `dir` with the given extension (case-sensitive), sorted.
/// A missing directory is an empty gallery.
/// A bare dotfile such as `.jpg` has no extension and is not listed.
pub async fn list_images(dir: &Path, extension: &str) -> io::Result<Vec<String>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut images = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_file = tokio::fs::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }

        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }

        if let Some(name) = entry.file_name().to_str() {
            images.push(name.to_string());
        }
    }

    images.sort();
    Ok(images)
}

/// True if `name` is a single path component (no separators, no `..`)
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name)
}

/// Path of `name` inside `dir` if it names an existing regular file
pub async fn find_image(dir: &Path, name: &str) -> Option<PathBuf> {
    if !is_plain_file_name(name) {
        return None;
    }

    let path = dir.join(name);
    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => Some(path),
        _ => None,
    }
}

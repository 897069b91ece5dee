//! Local filesystem adapter for fleet access.

use kuma_find_ports::{FileSystemDirEntry, FileSystemEntryKind, FleetFileSystemPort, SafeRelativePath};
use kuma_find_shared::{ErrorCode, ErrorEnvelope, Result};
use std::fs::{self, FileType};
use std::path::Path;

/// Local filesystem adapter using blocking `std::fs` calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    /// Build a local filesystem adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn kind_of(file_type: FileType) -> FileSystemEntryKind {
    if file_type.is_file() {
        FileSystemEntryKind::File
    } else if file_type.is_dir() {
        FileSystemEntryKind::Directory
    } else {
        FileSystemEntryKind::Other
    }
}

fn with_path(error: std::io::Error, path: &Path) -> ErrorEnvelope {
    ErrorEnvelope::from(error).with_metadata("path", path.display().to_string())
}

impl FleetFileSystemPort for LocalFileSystem {
    fn read_dir(&self, fleet_root: &Path, dir: &SafeRelativePath) -> Result<Vec<FileSystemDirEntry>> {
        let full_path = dir.to_path(fleet_root);
        let read_dir = fs::read_dir(&full_path).map_err(|error| with_path(error, &full_path))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|error| with_path(error, &full_path))?;
            let Ok(own_type) = entry.file_type() else {
                continue;
            };
            let is_symlink = own_type.is_symlink();
            let kind = if is_symlink {
                // Dangling or unreadable links resolve to `Other`.
                fs::metadata(entry.path())
                    .map_or(FileSystemEntryKind::Other, |meta| kind_of(meta.file_type()))
            } else {
                kind_of(own_type)
            };
            entries.push(FileSystemDirEntry {
                name: entry.file_name(),
                kind,
                is_symlink,
            });
        }
        Ok(entries)
    }

    fn read_file_text(&self, fleet_root: &Path, file: &SafeRelativePath) -> Result<Box<str>> {
        let full_path = file.to_path(fleet_root);
        let metadata = fs::metadata(&full_path).map_err(|error| with_path(error, &full_path))?;
        if !metadata.is_file() {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                "path is not a file",
            )
            .with_metadata("path", full_path.display().to_string()));
        }

        let bytes = fs::read(&full_path).map_err(|error| with_path(error, &full_path))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned().into_boxed_str())
    }
}

//! Fleet filesystem boundary contract.

use kuma_find_shared::{ErrorCode, ErrorEnvelope, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

/// A validated, normalized path relative to the fleet root.
///
/// Implementations MUST reject absolute paths and traversal (e.g. `..` segments).
/// Segments are kept as OS strings, so any name a directory listing returns
/// can be addressed. The root itself is the empty path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SafeRelativePath(PathBuf);

impl SafeRelativePath {
    /// Validate and normalize an untrusted relative path (`/` or `\` separated).
    pub fn new(input: &str) -> Result<Self> {
        let normalized = normalize_relative_path(input)?;
        if normalized == "." {
            return Ok(Self::root());
        }
        Ok(Self(normalized.split('/').collect()))
    }

    /// The fleet root itself.
    #[must_use]
    pub fn root() -> Self {
        Self(PathBuf::new())
    }

    /// Borrow the relative path (empty for the root).
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Returns true for the fleet root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    /// Number of segments below the root (the root is depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.components().count()
    }

    /// Append a single path segment, exactly as a directory listing names it.
    pub fn child(&self, segment: impl AsRef<OsStr>) -> Result<Self> {
        let segment = segment.as_ref();
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == segment => Ok(Self(self.0.join(segment))),
            _ => Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                "child must be a single path segment",
            )
            .with_metadata("segment", segment.to_string_lossy())),
        }
    }

    /// Resolve against an absolute root.
    #[must_use]
    pub fn to_path(&self, root: &Path) -> PathBuf {
        if self.is_root() {
            return root.to_path_buf();
        }
        root.join(&self.0)
    }
}

/// Borrowing filesystem session bound to a fleet root.
pub struct FleetSession<'a> {
    fs: &'a dyn FleetFileSystemPort,
    fleet_root: &'a Path,
}

impl<'a> FleetSession<'a> {
    /// Create a borrowing session for a fleet root.
    #[must_use]
    pub fn new(fs: &'a dyn FleetFileSystemPort, fleet_root: &'a Path) -> Self {
        Self { fs, fleet_root }
    }

    /// The absolute fleet root.
    #[must_use]
    pub const fn fleet_root(&self) -> &Path {
        self.fleet_root
    }

    /// Absolute path of a relative location.
    #[must_use]
    pub fn absolute(&self, path: &SafeRelativePath) -> PathBuf {
        path.to_path(self.fleet_root)
    }

    /// List directory entries relative to the fleet root.
    pub fn read_dir(&self, dir: &SafeRelativePath) -> Result<Vec<FileSystemDirEntry>> {
        self.fs.read_dir(self.fleet_root, dir)
    }

    /// Read a UTF-8 text file relative to the fleet root.
    pub fn read_file_text(&self, file: &SafeRelativePath) -> Result<Box<str>> {
        self.fs.read_file_text(self.fleet_root, file)
    }
}

/// Extension helpers for filesystem ports.
pub trait FleetFileSystemPortExt {
    /// Create a borrowing session for a fleet root.
    fn session<'a>(&'a self, fleet_root: &'a Path) -> FleetSession<'a>;
}

impl<T> FleetFileSystemPortExt for T
where
    T: FleetFileSystemPort,
{
    fn session<'a>(&'a self, fleet_root: &'a Path) -> FleetSession<'a> {
        FleetSession::new(self, fleet_root)
    }
}

fn normalize_relative_path(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(".".to_owned());
    }
    let replaced = trimmed.replace('\\', "/");
    let collapsed = collapse_forward_slashes(&replaced);
    if is_absolute_like(&collapsed) {
        return Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "absolute paths are not allowed",
        ));
    }
    let collapsed = collapsed.trim_start_matches("./");
    let collapsed = collapsed.trim_matches('/');

    if collapsed.is_empty() || collapsed == "." {
        return Ok(".".to_owned());
    }

    if collapsed.split('/').any(|segment| segment == "..") {
        return Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "path traversal is not allowed",
        ));
    }

    Ok(collapsed.to_owned())
}

fn is_absolute_like(path: &str) -> bool {
    if path.starts_with('/') {
        return true;
    }
    let bytes = path.as_bytes();
    matches!(bytes, [drive, b':', b'/', ..] if drive.is_ascii_alphabetic())
}

fn collapse_forward_slashes(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut previous_was_slash = false;

    for ch in input.chars() {
        if ch == '/' {
            if previous_was_slash {
                continue;
            }
            previous_was_slash = true;
        } else {
            previous_was_slash = false;
        }
        output.push(ch);
    }

    output
}

/// File system entry kind, resolved through symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSystemEntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Other / unknown (including dangling links).
    Other,
}

/// A directory listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemDirEntry {
    /// Entry name (single path segment), as the OS reports it.
    pub name: OsString,
    /// Entry kind, following symlinks.
    pub kind: FileSystemEntryKind,
    /// Whether the entry itself is a symbolic link.
    pub is_symlink: bool,
}

impl FileSystemDirEntry {
    /// Returns true when the entry is named exactly `name`.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_os_str() == OsStr::new(name)
    }

    /// Returns true for directories, including symlinked ones.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == FileSystemEntryKind::Directory
    }
}

/// Boundary contract for read-only fleet access.
///
/// Note: `fleet_root` is an absolute path owned by the caller/infra composition.
/// Listings are returned in no particular order.
pub trait FleetFileSystemPort: Send + Sync {
    /// Read and list directory entries.
    fn read_dir(
        &self,
        fleet_root: &Path,
        dir: &SafeRelativePath,
    ) -> Result<Vec<FileSystemDirEntry>>;

    /// Read a UTF-8 text file.
    fn read_file_text(&self, fleet_root: &Path, file: &SafeRelativePath) -> Result<Box<str>>;
}

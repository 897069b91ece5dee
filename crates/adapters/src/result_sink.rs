//! Result file read by the shell wrapper.

use kuma_find_ports::ResultSinkPort;
use kuma_find_shared::{ErrorEnvelope, Result};
use std::path::{Path, PathBuf};

/// Result sink backed by a single file holding the resolved path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempFileResultSink {
    path: PathBuf,
}

impl TempFileResultSink {
    /// Sink writing to `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location of the result file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn with_path(&self, error: std::io::Error) -> ErrorEnvelope {
        ErrorEnvelope::from(error).with_metadata("path", self.path.display().to_string())
    }
}

impl ResultSinkPort for TempFileResultSink {
    fn write_result(&self, directory: &Path) -> Result<()> {
        // No trailing newline: the wrapper reads the file verbatim.
        std::fs::write(&self.path, directory.as_os_str().as_encoded_bytes())
            .map_err(|error| self.with_path(error))
    }

    fn clear_result(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(self.with_path(error)),
        }
    }

    fn location(&self) -> Box<str> {
        self.path.display().to_string().into_boxed_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_file(label: &str) -> std::result::Result<PathBuf, Box<dyn std::error::Error>> {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
        let dir = std::env::temp_dir().join(format!("kuma-find-sink-{label}-{nanos}"));
        std::fs::create_dir_all(&dir)?;
        Ok(dir.join("kuma-find.tmp"))
    }

    #[test]
    fn writes_path_without_newline_and_overwrites() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let file = unique_file("write")?;
        let sink = TempFileResultSink::new(file.clone());

        sink.write_result(Path::new("/srv/webcom/old"))?;
        sink.write_result(Path::new("/srv/webcom/ops"))?;
        assert_eq!(std::fs::read_to_string(&file)?, "/srv/webcom/ops");
        Ok(())
    }

    #[test]
    fn clearing_is_idempotent() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let file = unique_file("clear")?;
        let sink = TempFileResultSink::new(file.clone());

        sink.clear_result()?;
        sink.write_result(Path::new("/srv/webcom/ops"))?;
        sink.clear_result()?;
        sink.clear_result()?;
        assert!(!file.exists());
        Ok(())
    }

    #[test]
    fn unwritable_location_reports_io_error() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let file = unique_file("missing-dir")?.join("nested").join("kuma-find.tmp");
        let sink = TempFileResultSink::new(file.clone());

        let error = sink.write_result(Path::new("/srv/webcom/ops")).err();
        assert_eq!(
            error.and_then(|error| error.metadata.get("path").cloned()),
            Some(file.display().to_string())
        );
        assert_eq!(sink.location().as_ref(), file.display().to_string());
        Ok(())
    }
}

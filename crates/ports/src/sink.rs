//! Result channel boundary contract.

use kuma_find_shared::Result;
use std::path::Path;

/// Boundary contract for the side channel read by the shell wrapper.
pub trait ResultSinkPort: Send + Sync {
    /// Persist `directory` as the sole content of the channel.
    fn write_result(&self, directory: &Path) -> Result<()>;

    /// Remove any previous result. Clearing an empty channel is not an error.
    fn clear_result(&self) -> Result<()>;

    /// Human-readable location of the channel, for logs.
    fn location(&self) -> Box<str>;
}

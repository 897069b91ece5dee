//! In-memory adapter implementations for port contracts.
//!
//! These implementations are intended for:
//! - Unit/integration tests
//! - Deterministic contract tests for the ports layer
//! - Scripted interactive sessions without a terminal

use kuma_find_ports::{
    FileSystemDirEntry, FileSystemEntryKind, FleetFileSystemPort, LogEvent, LogFields, LoggerPort,
    ResultSinkPort, SafeRelativePath, SelectionPromptPort,
};
use kuma_find_shared::{ErrorCode, ErrorEnvelope, Result};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A no-op logger implementation.
#[derive(Debug, Default)]
pub struct NoopLogger;

impl LoggerPort for NoopLogger {
    fn log(&self, _event: LogEvent) {}

    fn child(&self, _fields: LogFields) -> Box<dyn LoggerPort> {
        Box::new(Self)
    }
}

/// Logger capturing every event in memory (no level filtering).
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    events: Arc<Mutex<Vec<LogEvent>>>,
    base_fields: LogFields,
}

impl MemoryLogger {
    /// Create an empty logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of captured events.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().map(|guard| guard.clone()).unwrap_or_default()
    }

    /// Captured event names, in emission order.
    pub fn event_names(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|event| event.event.into_string())
            .collect()
    }

    /// Returns true when an event with `name` was captured.
    pub fn contains(&self, name: &str) -> bool {
        self.events().iter().any(|event| event.event.as_ref() == name)
    }
}

impl LoggerPort for MemoryLogger {
    fn log(&self, mut event: LogEvent) {
        if !self.base_fields.is_empty() {
            let mut fields = self.base_fields.clone();
            fields.extend(event.fields.take().unwrap_or_default());
            event.fields = Some(fields);
        }
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut merged = self.base_fields.clone();
        merged.extend(fields);
        Box::new(Self {
            events: Arc::clone(&self.events),
            base_fields: merged,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Dir,
    File(Box<str>),
    DirLink(String),
}

/// In-memory fleet tree keyed by paths relative to the fleet root.
///
/// The fleet root passed to the port is ignored: every root sees the same
/// tree. Parents are created implicitly.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFleet {
    nodes: BTreeMap<String, Node>,
    unreadable: BTreeSet<String>,
    missing_root: bool,
}

impl InMemoryFleet {
    /// Create an empty fleet (the root exists and is readable).
    pub fn new() -> Self {
        Self::default()
    }

    /// A fleet whose root does not exist.
    pub fn without_root() -> Self {
        Self {
            missing_root: true,
            ..Self::default()
        }
    }

    /// Add a directory.
    #[must_use]
    pub fn dir(mut self, path: &str) -> Self {
        self.ensure_parents(path);
        self.nodes.entry(path.to_owned()).or_insert(Node::Dir);
        self
    }

    /// Add a text file.
    #[must_use]
    pub fn file(mut self, path: &str, contents: &str) -> Self {
        self.ensure_parents(path);
        self.nodes
            .insert(path.to_owned(), Node::File(contents.into()));
        self
    }

    /// Add a symlink at `path` pointing to the directory `target`.
    #[must_use]
    pub fn dir_link(mut self, path: &str, target: &str) -> Self {
        self.ensure_parents(path);
        self.nodes
            .insert(path.to_owned(), Node::DirLink(target.to_owned()));
        self
    }

    /// Add a service directory with a configuration file (`.env`).
    #[must_use]
    pub fn service(self, path: &str, env: &str) -> Self {
        self.file(&format!("{path}/.env"), env)
    }

    /// Add a display name marker (`kuma/name`) under `path`.
    #[must_use]
    pub fn display_name(self, path: &str, name: &str) -> Self {
        self.file(&format!("{path}/kuma/name"), name)
    }

    /// Make listing `path` fail (use `.` for the root).
    #[must_use]
    pub fn unreadable(mut self, path: &str) -> Self {
        self.unreadable.insert(path.to_owned());
        self
    }

    fn ensure_parents(&mut self, path: &str) {
        let mut current = String::new();
        let segments: Vec<&str> = path.split('/').collect();
        for segment in segments.iter().take(segments.len().saturating_sub(1)) {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);
            self.nodes.entry(current.clone()).or_insert(Node::Dir);
        }
    }

    fn resolve(&self, path: &str) -> String {
        // Follow a single directory link at any prefix.
        let mut prefix = String::new();
        for (index, segment) in path.split('/').enumerate() {
            if index > 0 {
                prefix.push('/');
            }
            prefix.push_str(segment);
            if let Some(Node::DirLink(target)) = self.nodes.get(&prefix) {
                let rest = &path[prefix.len()..];
                return format!("{target}{rest}");
            }
        }
        path.to_owned()
    }

    fn entry_kind(&self, path: &str) -> (FileSystemEntryKind, bool) {
        match self.nodes.get(path) {
            Some(Node::Dir) => (FileSystemEntryKind::Directory, false),
            Some(Node::File(_)) => (FileSystemEntryKind::File, false),
            Some(Node::DirLink(target)) => match self.nodes.get(target) {
                Some(Node::Dir) => (FileSystemEntryKind::Directory, true),
                _ => (FileSystemEntryKind::Other, true),
            },
            None => (FileSystemEntryKind::Other, false),
        }
    }
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map_or(".", |(parent, _)| parent)
}

/// Tree key of a relative path (`.` for the root, `/`-joined otherwise).
fn key_of(path: &SafeRelativePath) -> String {
    if path.is_root() {
        return ".".to_owned();
    }
    path.as_path()
        .iter()
        .map(|segment| segment.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn not_found(path: &str) -> ErrorEnvelope {
    ErrorEnvelope::unexpected(ErrorCode::not_found(), format!("no such entry: {path}"))
        .with_metadata("path", path)
}

impl FleetFileSystemPort for InMemoryFleet {
    fn read_dir(&self, _fleet_root: &Path, dir: &SafeRelativePath) -> Result<Vec<FileSystemDirEntry>> {
        let requested = key_of(dir);
        let requested = requested.as_str();
        if self.unreadable.contains(requested) {
            return Err(ErrorEnvelope::unexpected(
                ErrorCode::permission_denied(),
                format!("permission denied: {requested}"),
            ));
        }
        if dir.is_root() {
            if self.missing_root {
                return Err(not_found(requested));
            }
        } else {
            let resolved = self.resolve(requested);
            if self.nodes.get(&resolved) != Some(&Node::Dir) {
                return Err(not_found(requested));
            }
        }

        let resolved = if dir.is_root() {
            ".".to_owned()
        } else {
            self.resolve(requested)
        };
        let entries = self
            .nodes
            .keys()
            .filter(|path| parent_of(path) == resolved)
            .map(|path| {
                let (kind, is_symlink) = self.entry_kind(path);
                let name = path.rsplit('/').next().unwrap_or(path);
                FileSystemDirEntry {
                    name: name.into(),
                    kind,
                    is_symlink,
                }
            })
            .rev()
            .collect();
        Ok(entries)
    }

    fn read_file_text(&self, _fleet_root: &Path, file: &SafeRelativePath) -> Result<Box<str>> {
        let requested = key_of(file);
        let resolved = self.resolve(&requested);
        if self.unreadable.contains(&requested) {
            return Err(ErrorEnvelope::unexpected(
                ErrorCode::permission_denied(),
                format!("permission denied: {requested}"),
            ));
        }
        match self.nodes.get(&resolved) {
            Some(Node::File(contents)) => Ok(contents.clone()),
            _ => Err(not_found(&requested)),
        }
    }
}

/// Prompt replaying scripted answers and recording every menu shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<Option<String>>>,
    menus: Mutex<Vec<(String, Vec<PathBuf>)>>,
}

impl ScriptedPrompt {
    /// Prompt answering with the given lines, then end of input.
    pub fn answering(lines: &[&str]) -> Self {
        Self {
            answers: Mutex::new(lines.iter().map(|line| Some((*line).to_owned())).collect()),
            menus: Mutex::default(),
        }
    }

    /// Prompt that immediately reports end of input.
    pub fn end_of_input() -> Self {
        Self::default()
    }

    /// Menus shown so far (query, candidates).
    pub fn menus(&self) -> Vec<(String, Vec<PathBuf>)> {
        self.menus.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

impl SelectionPromptPort for ScriptedPrompt {
    fn choose(&self, query: &str, candidates: &[PathBuf]) -> Result<Option<Box<str>>> {
        if let Ok(mut menus) = self.menus.lock() {
            menus.push((query.to_owned(), candidates.to_vec()));
        }
        let answer = self
            .answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .flatten();
        Ok(answer.map(String::into_boxed_str))
    }
}

/// Result sink keeping the last written path in memory.
#[derive(Debug, Default)]
pub struct MemoryResultSink {
    current: Mutex<Option<PathBuf>>,
    writes: Mutex<u32>,
    fail_writes: bool,
}

impl MemoryResultSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink pre-populated with a stale result from an earlier run.
    pub fn with_stale(path: &str) -> Self {
        Self {
            current: Mutex::new(Some(PathBuf::from(path))),
            ..Self::default()
        }
    }

    /// Sink whose writes always fail.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Current content, if any.
    pub fn current(&self) -> Option<PathBuf> {
        self.current.lock().ok().and_then(|guard| guard.clone())
    }

    /// Number of successful writes.
    pub fn writes(&self) -> u32 {
        self.writes.lock().map(|guard| *guard).unwrap_or_default()
    }
}

impl ResultSinkPort for MemoryResultSink {
    fn write_result(&self, directory: &Path) -> Result<()> {
        if self.fail_writes {
            return Err(ErrorEnvelope::unexpected(
                ErrorCode::io(),
                "result sink is read-only",
            ));
        }
        if let Ok(mut current) = self.current.lock() {
            *current = Some(directory.to_path_buf());
        }
        if let Ok(mut writes) = self.writes.lock() {
            *writes += 1;
        }
        Ok(())
    }

    fn clear_result(&self) -> Result<()> {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
        Ok(())
    }

    fn location(&self) -> Box<str> {
        "memory".into()
    }
}

//! Directory Indexer: one bounded walk of the fleet per run.

use kuma_find_config::parse_service_config;
use kuma_find_domain::{FleetIndices, ServiceDirectory, normalize_identifier};
use kuma_find_ports::{
    FileSystemDirEntry, FileSystemEntryKind, FleetFileSystemPort, FleetSession, LogFields,
    LoggerPort, SafeRelativePath,
};
use kuma_find_shared::{ErrorCode, ErrorEnvelope, Result};
use serde_json::Value;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

/// File-layout settings the indexer reads with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerSettings {
    /// Deepest directory level inspected (root = 0).
    pub max_depth: usize,
    /// Per-service configuration file name.
    pub service_config_file: Box<str>,
    /// Key with comma-separated notification emails.
    pub email_key: Box<str>,
    /// Key with the declared username.
    pub username_key: Box<str>,
    /// Marker directory name.
    pub marker_dir: Box<str>,
    /// Display-name file inside the marker directory.
    pub display_name_file: Box<str>,
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            max_depth: 3,
            service_config_file: ".env".into(),
            email_key: "MAIL_TO".into(),
            username_key: "USERNAME".into(),
            marker_dir: "kuma".into(),
            display_name_file: "name".into(),
        }
    }
}

/// Input payload for the indexer.
#[derive(Debug, Clone)]
pub struct BuildIndicesInput {
    /// Absolute fleet root.
    pub fleet_root: PathBuf,
    /// File-layout settings.
    pub settings: IndexerSettings,
}

/// Dependencies required by the indexer.
#[derive(Clone)]
pub struct BuildIndicesDeps {
    /// Read-only fleet access.
    pub filesystem: Arc<dyn FleetFileSystemPort>,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// Counters collected during the walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FleetScanStats {
    /// Directories listed successfully.
    pub directories_visited: u64,
    /// Directories whose listing failed (root excluded).
    pub directories_unreadable: u64,
    /// Service configuration files parsed.
    pub configs_read: u64,
    /// Service configuration or display-name files that could not be read.
    pub files_unreadable: u64,
    /// Marker directories with a usable display name.
    pub markers_found: u64,
}

/// Result of one fleet walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetScan {
    /// Directories declaring at least one identifier, in discovery order.
    pub directories: Vec<ServiceDirectory>,
    /// Indices built from `directories`.
    pub indices: FleetIndices,
    /// Walk counters.
    pub stats: FleetScanStats,
}

/// Indexer failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// The fleet root could not be listed.
    #[error("fleet root {} is not accessible: {reason}", root.display())]
    FleetRootUnavailable {
        /// Fleet root as configured.
        root: PathBuf,
        /// Underlying failure.
        reason: String,
    },
}

impl From<IndexError> for ErrorEnvelope {
    fn from(error: IndexError) -> Self {
        let message = error.to_string();
        match error {
            IndexError::FleetRootUnavailable { root, reason } => {
                Self::unexpected(ErrorCode::new("index", "fleet_root_unavailable"), message)
                    .with_metadata("fleet_root", root.display().to_string())
                    .with_metadata("reason", reason)
            },
        }
    }
}

struct PendingDir {
    path: SafeRelativePath,
    descend: bool,
}

/// Walk the fleet and build the email, username and name indices.
///
/// Directories are visited breadth-first with children in name order, so
/// index sequences are identical across runs over the same tree.
pub fn build_fleet_indices(deps: &BuildIndicesDeps, input: &BuildIndicesInput) -> Result<FleetScan> {
    let settings = &input.settings;
    let fs = FleetSession::new(deps.filesystem.as_ref(), &input.fleet_root);
    let logger = deps.logger.as_deref();

    if let Some(logger) = logger {
        logger.debug(
            "find.index.start",
            "Fleet walk started",
            Some(log_fields_start(input)),
        );
    }

    let mut scan = FleetScan::default();
    let mut pending = VecDeque::from([PendingDir {
        path: SafeRelativePath::root(),
        descend: true,
    }]);

    while let Some(dir) = pending.pop_front() {
        let mut entries = match fs.read_dir(&dir.path) {
            Ok(entries) => entries,
            Err(error) if dir.path.is_root() => {
                return Err(IndexError::FleetRootUnavailable {
                    root: input.fleet_root.clone(),
                    reason: error.message,
                }
                .into());
            },
            Err(error) => {
                scan.stats.directories_unreadable += 1;
                if let Some(logger) = logger {
                    logger.warn(
                        "find.index.dir_unreadable",
                        "Cannot read directory during fleet walk",
                        Some(log_fields_path(&fs, &dir.path, &error)),
                    );
                }
                continue;
            },
        };
        scan.stats.directories_visited += 1;
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let mut record = ServiceDirectory::new(fs.absolute(&dir.path));
        if dir.path.depth() == 1 {
            read_service_config(&fs, logger, settings, &dir.path, &entries, &mut record, &mut scan.stats);
        }
        read_display_name(&fs, logger, settings, &dir.path, &entries, &mut record, &mut scan.stats);

        if !record.has_no_identifiers() {
            scan.indices.register(&record);
            scan.directories.push(record);
        }

        let child_depth = dir.path.depth() + 1;
        if !dir.descend || child_depth > settings.max_depth {
            continue;
        }
        for entry in entries {
            if !entry.is_dir() || entry.is_named(&settings.marker_dir) {
                continue;
            }
            let Ok(path) = dir.path.child(&entry.name) else {
                continue;
            };
            pending.push_back(PendingDir {
                path,
                descend: !entry.is_symlink,
            });
        }
    }

    if let Some(logger) = logger {
        logger.debug(
            "find.index.done",
            "Fleet walk completed",
            Some(log_fields_done(&scan)),
        );
    }

    Ok(scan)
}

fn has_entry(entries: &[FileSystemDirEntry], name: &str, kind: FileSystemEntryKind) -> bool {
    entries
        .iter()
        .any(|entry| entry.is_named(name) && entry.kind == kind)
}

fn read_service_config(
    fs: &FleetSession<'_>,
    logger: Option<&dyn LoggerPort>,
    settings: &IndexerSettings,
    dir: &SafeRelativePath,
    entries: &[FileSystemDirEntry],
    record: &mut ServiceDirectory,
    stats: &mut FleetScanStats,
) {
    if !has_entry(entries, &settings.service_config_file, FileSystemEntryKind::File) {
        return;
    }
    let Ok(path) = dir.child(&*settings.service_config_file) else {
        return;
    };
    let text = match fs.read_file_text(&path) {
        Ok(text) => text,
        Err(error) => {
            stats.files_unreadable += 1;
            if let Some(logger) = logger {
                logger.warn(
                    "find.index.config_unreadable",
                    "Cannot read service configuration; treating it as empty",
                    Some(log_fields_path(fs, &path, &error)),
                );
            }
            return;
        },
    };
    stats.configs_read += 1;

    let config = parse_service_config(&text);
    for raw in config.list(&settings.email_key) {
        if let Some(email) = normalize_identifier(raw)
            && !record.declared_emails.contains(&email)
        {
            record.declared_emails.push(email);
        }
    }
    record.declared_username = config
        .get(&settings.username_key)
        .and_then(normalize_identifier);
}

fn read_display_name(
    fs: &FleetSession<'_>,
    logger: Option<&dyn LoggerPort>,
    settings: &IndexerSettings,
    dir: &SafeRelativePath,
    entries: &[FileSystemDirEntry],
    record: &mut ServiceDirectory,
    stats: &mut FleetScanStats,
) {
    if !has_entry(entries, &settings.marker_dir, FileSystemEntryKind::Directory) {
        return;
    }
    let Ok(path) = dir
        .child(&*settings.marker_dir)
        .and_then(|marker| marker.child(&*settings.display_name_file))
    else {
        return;
    };
    match fs.read_file_text(&path) {
        Ok(text) => {
            record.display_name = normalize_identifier(&text);
            if record.display_name.is_some() {
                stats.markers_found += 1;
            }
        },
        Err(error) if error.is_not_found() => {},
        Err(error) => {
            stats.files_unreadable += 1;
            if let Some(logger) = logger {
                logger.warn(
                    "find.index.config_unreadable",
                    "Cannot read display name; ignoring marker",
                    Some(log_fields_path(fs, &path, &error)),
                );
            }
        },
    }
}

fn log_fields_start(input: &BuildIndicesInput) -> LogFields {
    let mut fields = LogFields::new();
    fields.insert(
        "fleetRoot".into(),
        Value::String(input.fleet_root.display().to_string()),
    );
    fields.insert("maxDepth".into(), Value::from(input.settings.max_depth));
    fields
}

fn log_fields_path(fs: &FleetSession<'_>, path: &SafeRelativePath, error: &ErrorEnvelope) -> LogFields {
    let mut fields = LogFields::new();
    fields.insert(
        "path".into(),
        Value::String(fs.absolute(path).display().to_string()),
    );
    fields.insert("errorCode".into(), Value::String(error.code.to_string()));
    fields
}

fn log_fields_done(scan: &FleetScan) -> LogFields {
    let mut fields = LogFields::new();
    fields.insert(
        "directoriesVisited".into(),
        Value::from(scan.stats.directories_visited),
    );
    fields.insert(
        "directoriesUnreadable".into(),
        Value::from(scan.stats.directories_unreadable),
    );
    fields.insert("configsRead".into(), Value::from(scan.stats.configs_read));
    fields.insert("markersFound".into(), Value::from(scan.stats.markers_found));
    fields.insert("addressIndexSize".into(), Value::from(scan.indices.email.len()));
    fields.insert("usernameIndexSize".into(), Value::from(scan.indices.username.len()));
    fields.insert("nameIndexSize".into(), Value::from(scan.indices.name.len()));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuma_find_testkit::in_memory::{InMemoryFleet, MemoryLogger};
    use std::path::Path;

    fn run_scan(fleet: InMemoryFleet, settings: IndexerSettings) -> Result<(FleetScan, MemoryLogger)> {
        let logger = MemoryLogger::new();
        let deps = BuildIndicesDeps {
            filesystem: Arc::new(fleet),
            logger: Some(Arc::new(logger.clone())),
        };
        let input = BuildIndicesInput {
            fleet_root: PathBuf::from("/fleet"),
            settings,
        };
        let scan = build_fleet_indices(&deps, &input)?;
        Ok((scan, logger))
    }

    #[test]
    fn indexes_emails_usernames_and_names() -> Result<()> {
        let fleet = InMemoryFleet::new()
            .service("alice", "MAIL_TO=\" Alice@Example.com , ops@example.com,alice@example.com\"\nUSERNAME=1234567\n")
            .display_name("alice", "  Alice Jansen \n")
            .service("bob", "USERNAME=  \n");
        let (scan, _) = run_scan(fleet, IndexerSettings::default())?;

        assert_eq!(
            scan.indices.email.lookup("alice@example.com"),
            &[PathBuf::from("/fleet/alice")]
        );
        assert_eq!(scan.indices.email.len(), 2);
        assert_eq!(
            scan.indices.username.lookup("1234567"),
            &[PathBuf::from("/fleet/alice")]
        );
        assert_eq!(
            scan.indices.name.lookup("alice jansen"),
            &[PathBuf::from("/fleet/alice")]
        );
        assert_eq!(scan.directories.len(), 1, "bob declares nothing usable");
        assert_eq!(scan.stats.configs_read, 2);
        Ok(())
    }

    #[test]
    fn service_config_is_only_read_one_level_down() -> Result<()> {
        let fleet = InMemoryFleet::new()
            .service("group/nested", "USERNAME=99\n")
            .display_name("group/nested", "Nested");
        let (scan, _) = run_scan(fleet, IndexerSettings::default())?;

        assert!(scan.indices.username.is_empty());
        assert_eq!(
            scan.indices.name.lookup("nested"),
            &[PathBuf::from("/fleet/group/nested")]
        );
        Ok(())
    }

    #[test]
    fn depth_bound_prunes_deeper_markers() -> Result<()> {
        let fleet = InMemoryFleet::new()
            .display_name("a/b/c", "Depth Three")
            .display_name("a/b/c/d", "Depth Four");
        let (scan, _) = run_scan(fleet.clone(), IndexerSettings::default())?;
        assert_eq!(scan.indices.name.len(), 1);
        assert_eq!(
            scan.indices.name.lookup("depth three"),
            &[PathBuf::from("/fleet/a/b/c")]
        );

        let shallow = IndexerSettings {
            max_depth: 0,
            ..IndexerSettings::default()
        };
        let (scan, _) = run_scan(fleet.file("kuma/name", "Root").dir("a"), shallow)?;
        assert_eq!(scan.stats.directories_visited, 1);
        assert_eq!(scan.indices.name.lookup("root"), &[PathBuf::from("/fleet")]);
        Ok(())
    }

    #[test]
    fn collisions_keep_discovery_order() -> Result<()> {
        let fleet = InMemoryFleet::new()
            .display_name("ops", "Ops")
            .display_name("_old-ops", "ops");
        let (scan, _) = run_scan(fleet, IndexerSettings::default())?;

        assert_eq!(
            scan.indices.name.lookup("ops"),
            &[PathBuf::from("/fleet/_old-ops"), PathBuf::from("/fleet/ops")]
        );
        Ok(())
    }

    #[test]
    fn symlinked_services_are_inspected_but_not_descended() -> Result<()> {
        let fleet = InMemoryFleet::new()
            .service("real", "USERNAME=7\n")
            .display_name("real/inner", "Inner")
            .dir_link("alias", "real");
        let (scan, _) = run_scan(fleet, IndexerSettings::default())?;

        assert_eq!(
            scan.indices.username.lookup("7"),
            &[PathBuf::from("/fleet/alias"), PathBuf::from("/fleet/real")]
        );
        assert_eq!(
            scan.indices.name.lookup("inner"),
            &[PathBuf::from("/fleet/real/inner")]
        );
        Ok(())
    }

    #[test]
    fn unreadable_subdirectories_are_skipped_with_a_warning() -> Result<()> {
        let fleet = InMemoryFleet::new()
            .display_name("locked/svc", "Hidden")
            .unreadable("locked")
            .display_name("open", "Visible");
        let (scan, logger) = run_scan(fleet, IndexerSettings::default())?;

        assert!(scan.indices.name.lookup("hidden").is_empty());
        assert_eq!(scan.indices.name.len(), 1);
        assert_eq!(scan.stats.directories_unreadable, 1);
        assert!(logger.contains("find.index.dir_unreadable"));
        Ok(())
    }

    #[test]
    fn unreadable_config_is_treated_as_empty() -> Result<()> {
        let fleet = InMemoryFleet::new()
            .service("svc", "USERNAME=5\n")
            .unreadable("svc/.env")
            .display_name("svc", "Still Named");
        let (scan, logger) = run_scan(fleet, IndexerSettings::default())?;

        assert!(scan.indices.username.is_empty());
        assert_eq!(scan.indices.name.len(), 1);
        assert!(logger.contains("find.index.config_unreadable"));
        Ok(())
    }

    #[test]
    fn missing_root_is_fatal() {
        let deps = BuildIndicesDeps {
            filesystem: Arc::new(InMemoryFleet::without_root()),
            logger: None,
        };
        let input = BuildIndicesInput {
            fleet_root: PathBuf::from("/gone"),
            settings: IndexerSettings::default(),
        };
        let error = build_fleet_indices(&deps, &input).err();
        assert_eq!(
            error.as_ref().map(|error| &error.code),
            Some(&ErrorCode::new("index", "fleet_root_unavailable"))
        );
        assert_eq!(
            error.and_then(|error| error.metadata.get("fleet_root").cloned()),
            Some(Path::new("/gone").display().to_string())
        );
    }

    #[test]
    fn custom_layout_settings_are_honoured() -> Result<()> {
        let fleet = InMemoryFleet::new()
            .file("svc/service.conf", "OWNER=42\n")
            .file("svc/status/title", "Custom");
        let settings = IndexerSettings {
            service_config_file: "service.conf".into(),
            username_key: "OWNER".into(),
            marker_dir: "status".into(),
            display_name_file: "title".into(),
            ..IndexerSettings::default()
        };
        let (scan, _) = run_scan(fleet, settings)?;

        assert_eq!(scan.indices.username.lookup("42"), &[PathBuf::from("/fleet/svc")]);
        assert_eq!(scan.indices.name.lookup("custom"), &[PathBuf::from("/fleet/svc")]);
        Ok(())
    }
}

//! End-to-end wiring tests over a real temp fleet.

use kuma_find_adapters::{LocalFileSystem, MemoryLogSink};
use kuma_find_app::{BuildIndicesDeps, BuildIndicesInput, IndexerSettings, build_fleet_indices};
use kuma_find_config::{ENV_FLEET_ROOT, ENV_LOG_LEVEL, ENV_RESULT_FILE};
use kuma_find_domain::Resolution;
use kuma_find_infra::{FindRequest, RuntimeDirs, run_find_with};
use kuma_find_shared::ErrorCode;
use kuma_find_testkit::in_memory::ScriptedPrompt;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

struct TempFleet {
    root: PathBuf,
    result_file: PathBuf,
}

impl TempFleet {
    fn new(label: &str) -> Result<Self, Box<dyn Error>> {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
        let base = std::env::temp_dir().join(format!("kuma-find-infra-{label}-{nanos}"));
        let root = base.join("Webcom");
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            result_file: base.join("kuma-find.tmp"),
        })
    }

    fn service(&self, dir: &str, env: &str, name: Option<&str>) -> Result<(), Box<dyn Error>> {
        let path = self.root.join(dir);
        fs::create_dir_all(&path)?;
        fs::write(path.join(".env"), env)?;
        if let Some(name) = name {
            fs::create_dir_all(path.join("kuma"))?;
            fs::write(path.join("kuma/name"), name)?;
        }
        Ok(())
    }

    fn env(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (ENV_FLEET_ROOT.to_owned(), self.root.display().to_string()),
            (ENV_RESULT_FILE.to_owned(), self.result_file.display().to_string()),
            (ENV_LOG_LEVEL.to_owned(), "debug".to_owned()),
        ])
    }

    fn dirs(&self) -> RuntimeDirs {
        RuntimeDirs {
            home: None,
            temp_dir: std::env::temp_dir(),
        }
    }
}

fn request(query: &str) -> FindRequest {
    FindRequest {
        query: query.into(),
        interactive: true,
        log_level: None,
        config_path: None,
    }
}

#[test]
fn resolves_and_writes_the_result_file() -> Result<(), Box<dyn Error>> {
    let fleet = TempFleet::new("found")?;
    fleet.service("_alice-old", "USERNAME=1001\n", Some("Alice"))?;
    fleet.service("alice", "USERNAME=1001\nMAIL_TO=alice@example.com\n", Some("Alice"))?;

    let logs = Arc::new(MemoryLogSink::default());
    let report = run_find_with(
        &fleet.env(),
        &fleet.dirs(),
        &request("1001"),
        Arc::new(ScriptedPrompt::default()),
        logs.clone(),
    )?;

    assert!(matches!(report.output.resolution, Resolution::AutoSelected { .. }));
    assert_eq!(
        fs::read_to_string(&fleet.result_file)?,
        fleet.root.join("alice").display().to_string()
    );
    let lines = logs.take();
    assert!(lines.iter().any(|line| line.contains("\"find.index.done\"")));
    assert!(lines.iter().any(|line| line.contains("\"find.sink.written\"")));
    Ok(())
}

#[test]
fn no_match_removes_a_previous_result() -> Result<(), Box<dyn Error>> {
    let fleet = TempFleet::new("miss")?;
    fleet.service("billing", "USERNAME=3003\n", Some("Billing"))?;
    fs::write(&fleet.result_file, "/stale")?;

    let report = run_find_with(
        &fleet.env(),
        &fleet.dirs(),
        &request("biling"),
        Arc::new(ScriptedPrompt::default()),
        Arc::new(MemoryLogSink::default()),
    )?;

    let Resolution::NoMatch { suggestion } = &report.output.resolution else {
        return Err(format!("unexpected resolution {:?}", report.output.resolution).into());
    };
    assert_eq!(
        suggestion.as_ref().map(|found| found.name.as_ref()),
        Some("billing")
    );
    assert!(!Path::new(&fleet.result_file).exists());
    Ok(())
}

#[test]
fn missing_fleet_root_is_an_error() -> Result<(), Box<dyn Error>> {
    let fleet = TempFleet::new("gone")?;
    let mut env = fleet.env();
    env.insert(
        ENV_FLEET_ROOT.to_owned(),
        fleet.root.join("absent").display().to_string(),
    );

    let error = run_find_with(
        &env,
        &fleet.dirs(),
        &request("ops"),
        Arc::new(ScriptedPrompt::default()),
        Arc::new(MemoryLogSink::default()),
    )
    .err();
    assert_eq!(
        error.map(|error| error.code),
        Some(ErrorCode::new("index", "fleet_root_unavailable"))
    );
    Ok(())
}

#[test]
fn config_file_layout_overrides_apply() -> Result<(), Box<dyn Error>> {
    let fleet = TempFleet::new("layout")?;
    let svc = fleet.root.join("svc");
    fs::create_dir_all(svc.join("status"))?;
    fs::write(svc.join("status/title"), "Status Page")?;

    let config = fleet.root.with_file_name("finder.toml");
    fs::write(&config, "markerDir = \"status\"\ndisplayNameFile = \"title\"\n")?;

    let report = run_find_with(
        &fleet.env(),
        &fleet.dirs(),
        &FindRequest {
            config_path: Some(config),
            ..request("status page")
        },
        Arc::new(ScriptedPrompt::default()),
        Arc::new(MemoryLogSink::default()),
    )?;
    assert_eq!(report.output.resolution.directory(), Some(svc.as_path()));
    Ok(())
}

fn index_local(root: &Path) -> Result<kuma_find_app::FleetScan, Box<dyn Error>> {
    let deps = BuildIndicesDeps {
        filesystem: Arc::new(LocalFileSystem::new()),
        logger: None,
    };
    let input = BuildIndicesInput {
        fleet_root: root.to_path_buf(),
        settings: IndexerSettings::default(),
    };
    Ok(build_fleet_indices(&deps, &input)?)
}

#[cfg(unix)]
#[test]
fn backslash_directory_names_are_indexed() -> Result<(), Box<dyn Error>> {
    let fleet = TempFleet::new("backslash")?;
    fleet.service("ops\\east", "USERNAME=4242\n", Some("East Ops"))?;

    let scan = index_local(&fleet.root)?;
    let expected = vec![fleet.root.join("ops\\east")];
    assert_eq!(scan.indices.username.lookup("4242"), expected.as_slice());
    assert_eq!(scan.indices.name.lookup("east ops"), expected.as_slice());
    assert_eq!(scan.stats.directories_unreadable, 0);
    Ok(())
}

#[cfg(unix)]
#[test]
fn non_utf8_directory_names_are_indexed() -> Result<(), Box<dyn Error>> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fleet = TempFleet::new("latin1")?;
    let dir = fleet.root.join(OsStr::from_bytes(b"j\xf6rg"));
    fs::create_dir_all(dir.join("kuma"))?;
    fs::write(dir.join(".env"), "USERNAME=777\n")?;
    fs::write(dir.join("kuma/name"), "Joerg")?;

    let scan = index_local(&fleet.root)?;
    assert_eq!(scan.indices.username.lookup("777"), &[dir.clone()]);
    assert_eq!(scan.indices.name.lookup("joerg"), &[dir]);
    assert_eq!(scan.stats.directories_unreadable, 0);
    Ok(())
}

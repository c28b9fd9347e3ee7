//! Re-pack whenever an input changes.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use log::{debug, info, warn};
use notify::{Event, RecursiveMode, Watcher};

use crate::config::BundleConfig;
use crate::error::Result;
use crate::pack::pack;
use crate::report::PackReport;

/// Quiet period used to fold an editor's burst of events into one rebuild.
const SETTLE: Duration = Duration::from_millis(50);

/// A watched input, keyed by its directory and file name so events for
/// other files in the same directory (including the bundle itself) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct WatchedFile {
    dir: PathBuf,
    name: OsString,
}

impl WatchedFile {
    fn new(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_os_string();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let dir = dir.canonicalize().unwrap_or(dir);
        Some(Self { dir, name })
    }
}

fn is_relevant(event: &Event, inputs: &BTreeSet<WatchedFile>) -> bool {
    if !(event.kind.is_modify() || event.kind.is_create()) {
        return false;
    }
    event
        .paths
        .iter()
        .filter_map(|p| WatchedFile::new(p))
        .any(|f| inputs.contains(&f))
}

/// Pack once, then again after every change to the script, template or
/// auxiliary asset. Each outcome goes to `on_pack`; pack errors do not stop
/// the loop. Returns only when the watcher fails.
///
/// Inputs whose directory does not exist yet are not watched; create the
/// directory and restart to pick them up.
pub fn watch(config: &BundleConfig, mut on_pack: impl FnMut(Result<PackReport>)) -> Result<()> {
    let inputs: BTreeSet<WatchedFile> = config
        .input_paths()
        .iter()
        .filter_map(|p| WatchedFile::new(p))
        .collect();

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        // Receiver gone means the loop below has already returned.
        let _ = tx.send(res);
    })?;

    let dirs: BTreeSet<&Path> = inputs.iter().map(|f| f.dir.as_path()).collect();
    for dir in dirs {
        if !dir.is_dir() {
            warn!("{} does not exist, not watching it", dir.display());
            continue;
        }
        debug!("watching {}", dir.display());
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
    }

    on_pack(pack(config));
    info!("watching {} input(s) for changes", inputs.len());

    // `watcher` owns the sender and lives until we return, so `recv` never fails here.
    while let Ok(res) = rx.recv() {
        let event = res?;
        if !is_relevant(&event, &inputs) {
            continue;
        }
        debug!("change detected: {:?}", event.paths);

        std::thread::sleep(SETTLE);
        while let Ok(pending) = rx.try_recv() {
            pending?;
        }
        on_pack(pack(config));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, EventKind, ModifyKind, RemoveKind};

    fn inputs_in(dir: &Path) -> BTreeSet<WatchedFile> {
        ["index.html", "favicon.ico"]
            .iter()
            .filter_map(|name| WatchedFile::new(&dir.join(name)))
            .collect()
    }

    #[test]
    fn modify_of_watched_file_is_relevant() {
        let dir = tempfile::tempdir().expect("tempdir");
        let inputs = inputs_in(dir.path());
        let event = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(dir.path().join("index.html"));
        assert!(is_relevant(&event, &inputs));

        let created = Event::new(EventKind::Create(CreateKind::File))
            .add_path(dir.path().join("favicon.ico"));
        assert!(is_relevant(&created, &inputs));
    }

    #[test]
    fn neighbours_and_removals_are_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let inputs = inputs_in(dir.path());

        let neighbour = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(dir.path().join("notes.txt"));
        assert!(!is_relevant(&neighbour, &inputs));

        let removed = Event::new(EventKind::Remove(RemoveKind::File))
            .add_path(dir.path().join("index.html"));
        assert!(!is_relevant(&removed, &inputs));
    }

    #[test]
    fn same_name_in_other_dir_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("dist")).expect("create dist");
        let inputs = inputs_in(dir.path());
        let event = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(dir.path().join("dist/index.html"));
        assert!(!is_relevant(&event, &inputs));
    }

    #[test]
    fn loop_survives_pack_errors_and_repacks_on_create() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("dist")).expect("create dist");
        std::fs::write(dir.path().join("dist/main.roadroller.js"), "go()").expect("script");
        let config = BundleConfig {
            root: dir.path().to_path_buf(),
            ..BundleConfig::default()
        };

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let _ = watch(&config, |result| {
                let _ = tx.send(result.map(|r| r.substituted).map_err(|e| e.to_string()));
            });
        });

        let timeout = Duration::from_secs(10);
        let first = rx.recv_timeout(timeout).expect("initial pack");
        let err = first.expect_err("template is missing");
        assert!(err.contains("index.html"), "{err}");

        std::fs::write(dir.path().join("index.html"), "<script src=main.js></script>")
            .expect("write template");
        let second = rx.recv_timeout(timeout).expect("repack after create");
        assert_eq!(second, Ok(true));

        let bundle = std::fs::read_to_string(dir.path().join("dist/index.html")).expect("bundle");
        assert_eq!(bundle, "<script>go()</script>");
    }

    #[test]
    fn missing_input_directory_does_not_stop_the_first_pack() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = BundleConfig {
            root: dir.path().to_path_buf(),
            ..BundleConfig::default()
        };

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let _ = watch(&config, |result| {
                let _ = tx.send(result.is_ok());
            });
        });

        let first = rx
            .recv_timeout(Duration::from_secs(10))
            .expect("watch reaches the first pack without dist/");
        assert!(!first);
    }
}

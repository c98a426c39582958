//! Run coordination: validation, enumeration, the sequential transfer loop,
//! progress accounting, and cooperative cancellation.
//!
//! A run executes on one background worker thread. The controlling side
//! holds a [`RunHandle`]: progress is read through atomics, per-item log
//! events arrive on a channel, and cancellation is an advisory flag the
//! worker polls between items; a transfer already in flight always
//! finishes before the flag takes effect.

use crate::config::CompiledFilters;
use crate::file_category::{Category, ExtensionRegistry};
use crate::transfer::{self, TransferError, TransferMode};
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// Reasons a start request is rejected before anything is spawned.
#[derive(Debug)]
pub enum ValidationError {
    /// The source path is missing or not a directory.
    SourceMissing { path: PathBuf },
    /// No destination configured for a category.
    DestinationUnset { category: Category },
    /// A configured destination is missing or not a directory.
    DestinationMissing { category: Category, path: PathBuf },
    /// A configured destination exists but is read-only.
    DestinationNotWritable { category: Category, path: PathBuf },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceMissing { path } => {
                write!(f, "Source folder does not exist: {}", path.display())
            }
            Self::DestinationUnset { category } => {
                write!(f, "No destination folder set for {}", category.label())
            }
            Self::DestinationMissing { category, path } => write!(
                f,
                "Destination folder for {} does not exist: {}",
                category.label(),
                path.display()
            ),
            Self::DestinationNotWritable { category, path } => write!(
                f,
                "Destination folder for {} is not writable: {}",
                category.label(),
                path.display()
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// One destination directory per category.
///
/// Having a field per category makes "all six are mapped" structural; the
/// runtime check in [`DestinationMap::validate`] covers existence and
/// writability. The same directory may serve several categories.
#[derive(Debug, Clone)]
pub struct DestinationMap {
    pub images_videos: PathBuf,
    pub audio: PathBuf,
    pub setup: PathBuf,
    pub documents: PathBuf,
    pub compressed: PathBuf,
    pub other: PathBuf,
}

impl DestinationMap {
    /// The destination directory for a category.
    pub fn for_category(&self, category: Category) -> &Path {
        match category {
            Category::ImagesVideos => &self.images_videos,
            Category::Audio => &self.audio,
            Category::Setup => &self.setup,
            Category::Documents => &self.documents,
            Category::Compressed => &self.compressed,
            Category::Other => &self.other,
        }
    }

    /// Checks that every destination exists, is a directory, and is
    /// writable.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for category in Category::ALL {
            let path = self.for_category(category);
            if !path.is_dir() {
                return Err(ValidationError::DestinationMissing {
                    category,
                    path: path.to_path_buf(),
                });
            }
            if let Ok(metadata) = fs::metadata(path)
                && metadata.permissions().readonly()
            {
                return Err(ValidationError::DestinationNotWritable {
                    category,
                    path: path.to_path_buf(),
                });
            }
        }
        Ok(())
    }
}

/// Everything a run needs, captured at start and fixed for its duration.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: PathBuf,
    pub mode: TransferMode,
    pub destinations: DestinationMap,
    /// Entries matching these filters are dropped at enumeration and never
    /// counted. Defaults to excluding nothing.
    pub filters: CompiledFilters,
}

impl RunConfig {
    /// A config with no exclusion filters.
    pub fn new(source: PathBuf, mode: TransferMode, destinations: DestinationMap) -> Self {
        Self {
            source,
            mode,
            destinations,
            filters: CompiledFilters::default(),
        }
    }
}

/// One direct child of the source directory, snapshotted at enumeration.
///
/// Entries created in the source after the run starts are not seen.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// A successfully finished transfer.
#[derive(Debug)]
pub struct Completed {
    pub mode: TransferMode,
    pub target: PathBuf,
}

/// Per-item result. Failures are recorded here and the run continues.
#[derive(Debug)]
pub struct TransferOutcome {
    pub name: String,
    pub is_dir: bool,
    pub result: Result<Completed, TransferError>,
}

impl TransferOutcome {
    /// The human-readable log line for this item.
    pub fn log_line(&self) -> String {
        match &self.result {
            Ok(done) => {
                let verb = match done.mode {
                    TransferMode::Move => "Moved",
                    TransferMode::Copy => "Copied",
                };
                if self.is_dir {
                    format!("{verb} folder: {} -> {}", self.name, done.target.display())
                } else {
                    format!("{verb}: {} -> {}", self.name, done.target.display())
                }
            }
            Err(err) => format!("Error processing {}: {}", self.name, err),
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunTermination {
    /// Every enumerated item was processed (individual failures included).
    Completed { processed: usize },
    /// Cancellation was honored at an item boundary; the rest of the
    /// source is untouched.
    Cancelled { processed: usize },
    /// The source could not be enumerated after the start was accepted.
    /// No items were processed.
    Failed { reason: String },
}

impl RunTermination {
    /// The final summary log line.
    pub fn log_line(&self) -> String {
        match self {
            Self::Completed { processed } => {
                format!("Operation completed: {processed} items processed.")
            }
            Self::Cancelled { processed } => {
                format!("Operation stopped before completion: {processed} items processed.")
            }
            Self::Failed { reason } => format!("Run failed: {reason}"),
        }
    }
}

/// Events the worker emits, in processing order: one `Item` per entry, then
/// exactly one `Finished`.
#[derive(Debug)]
pub enum RunEvent {
    Item(TransferOutcome),
    Finished(RunTermination),
}

/// Shared run state: written by the worker, read by the controller.
#[derive(Debug, Default)]
pub(crate) struct RunState {
    total: AtomicUsize,
    processed: AtomicUsize,
    cancel: AtomicBool,
    running: AtomicBool,
    termination: Mutex<Option<RunTermination>>,
}

impl RunState {
    fn progress(&self) -> (usize, usize) {
        (
            self.processed.load(Ordering::Relaxed),
            self.total.load(Ordering::Relaxed),
        )
    }

    fn request_cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    fn cancel_requested(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    fn termination(&self) -> Option<RunTermination> {
        self.termination
            .lock()
            .ok()
            .and_then(|slot| slot.clone())
    }
}

/// Cloneable cancellation switch, detached from the handle so signal
/// handlers can own one.
#[derive(Clone)]
pub struct RunCanceller {
    state: Arc<RunState>,
}

impl RunCanceller {
    /// Requests cancellation. Safe to call at any time; a no-op once the
    /// run has ended.
    pub fn cancel(&self) {
        self.state.request_cancel();
    }
}

/// Handle to a running (or finished) run.
pub struct RunHandle {
    state: Arc<RunState>,
    events: Receiver<RunEvent>,
    thread: Option<thread::JoinHandle<()>>,
}

impl RunHandle {
    /// Requests cooperative cancellation; the current item still finishes.
    pub fn cancel(&self) {
        self.state.request_cancel();
    }

    /// A cloneable canceller for this run.
    pub fn canceller(&self) -> RunCanceller {
        RunCanceller {
            state: self.state.clone(),
        }
    }

    /// `(processed, total)`: non-blocking, safe to poll frequently.
    /// `total` is 0 until enumeration finishes.
    pub fn progress(&self) -> (usize, usize) {
        self.state.progress()
    }

    /// Whether the worker is still going.
    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Relaxed)
    }

    /// The ordered event stream: one `Item` per processed entry, then one
    /// `Finished`.
    pub fn events(&self) -> &Receiver<RunEvent> {
        &self.events
    }

    /// The terminal state, if the run has ended.
    pub fn termination(&self) -> Option<RunTermination> {
        self.state.termination()
    }

    /// Blocks until the run ends and returns its terminal state.
    pub fn wait(mut self) -> RunTermination {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        self.state.termination().unwrap_or_else(|| RunTermination::Failed {
            reason: "run ended without reporting a result".to_string(),
        })
    }
}

/// Validates the configuration and spawns the worker thread.
///
/// Rejection leaves the filesystem untouched and emits no events. The
/// handle does not join the worker on drop; an abandoned run keeps going
/// to its own terminal state.
pub fn start_run(config: RunConfig) -> Result<RunHandle, ValidationError> {
    if !config.source.is_dir() {
        return Err(ValidationError::SourceMissing {
            path: config.source.clone(),
        });
    }
    config.destinations.validate()?;

    let state = Arc::new(RunState::default());
    state.running.store(true, Ordering::Relaxed);
    let (events_tx, events_rx) = unbounded();

    let worker_state = state.clone();
    let thread = thread::Builder::new()
        .name("downsort-run".into())
        .spawn(move || run_worker(config, worker_state, events_tx))
        .expect("failed to spawn run worker thread");

    Ok(RunHandle {
        state,
        events: events_rx,
        thread: Some(thread),
    })
}

fn run_worker(config: RunConfig, state: Arc<RunState>, events: Sender<RunEvent>) {
    let termination = match enumerate_source(&config.source, &config.filters) {
        Ok(entries) => {
            state.total.store(entries.len(), Ordering::Relaxed);
            let registry = ExtensionRegistry::default();
            let mut sink = |outcome: TransferOutcome| {
                // The controller may have dropped the handle; keep going.
                let _ = events.send(RunEvent::Item(outcome));
            };
            let end = process_entries(&entries, &config, &registry, &state, &mut sink);
            let processed = state.processed.load(Ordering::Relaxed);
            match end {
                LoopEnd::Completed => RunTermination::Completed { processed },
                LoopEnd::Cancelled => RunTermination::Cancelled { processed },
            }
        }
        Err(err) => RunTermination::Failed {
            reason: format!("could not list {}: {}", config.source.display(), err),
        },
    };

    if let Ok(mut slot) = state.termination.lock() {
        *slot = Some(termination.clone());
    }
    state.running.store(false, Ordering::Relaxed);
    let _ = events.send(RunEvent::Finished(termination));
}

/// Snapshots the direct children of the source, sorted by name so the
/// processing (and log) order is deterministic.
fn enumerate_source(source: &Path, filters: &CompiledFilters) -> io::Result<Vec<SourceEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if filters.should_skip(&name) {
            continue;
        }
        // An unreadable file type is treated as a file: the transfer will
        // fail per-item instead of aborting the whole run.
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        entries.push(SourceEntry {
            name,
            path: entry.path(),
            is_dir,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

enum LoopEnd {
    Completed,
    Cancelled,
}

/// The sequential per-item loop. The cancellation flag is polled once per
/// item, before the item starts; `sink` receives one outcome per item, in
/// order, after the processed counter has been bumped.
fn process_entries(
    entries: &[SourceEntry],
    config: &RunConfig,
    registry: &ExtensionRegistry,
    state: &RunState,
    sink: &mut dyn FnMut(TransferOutcome),
) -> LoopEnd {
    for entry in entries {
        if state.cancel_requested() {
            return LoopEnd::Cancelled;
        }

        // Folders always go to the Other destination, whatever their name.
        let category = if entry.is_dir {
            Category::Other
        } else {
            registry.classify(&entry.name)
        };
        let dest_dir = config.destinations.for_category(category);
        let target = transfer::resolve_target(dest_dir, &entry.name, entry.is_dir);
        let result = transfer::transfer(&entry.path, &target, config.mode, entry.is_dir)
            .map(|()| Completed {
                mode: config.mode,
                target,
            });

        state.processed.fetch_add(1, Ordering::Relaxed);
        sink(TransferOutcome {
            name: entry.name.clone(),
            is_dir: entry.is_dir,
            result,
        });
    }
    LoopEnd::Completed
}

/// Outcome of an [`Organizer::start`] call that passed validation.
#[derive(Debug, PartialEq, Eq)]
pub enum StartReply {
    Started,
    /// A run is already active; the request was ignored.
    AlreadyRunning,
}

/// Controller-side facade owning at most one run at a time.
///
/// A start request while a run is active is a no-op, and cancellation
/// requests are ignored when nothing is running.
#[derive(Default)]
pub struct Organizer {
    current: Option<RunHandle>,
}

impl Organizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a run unless one is already active.
    pub fn start(&mut self, config: RunConfig) -> Result<StartReply, ValidationError> {
        if let Some(handle) = &self.current
            && handle.is_running()
        {
            return Ok(StartReply::AlreadyRunning);
        }
        self.current = Some(start_run(config)?);
        Ok(StartReply::Started)
    }

    /// Requests cancellation of the active run; no-op otherwise.
    pub fn request_cancel(&self) {
        if let Some(handle) = &self.current
            && handle.is_running()
        {
            handle.cancel();
        }
    }

    /// `(processed, total)` of the current run, `(0, 0)` when idle.
    pub fn progress(&self) -> (usize, usize) {
        self.current
            .as_ref()
            .map(|handle| handle.progress())
            .unwrap_or((0, 0))
    }

    /// The current run's handle, if any.
    pub fn handle(&self) -> Option<&RunHandle> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct RunFixture {
        source: TempDir,
        dests: TempDir,
    }

    impl RunFixture {
        fn new() -> Self {
            let fixture = Self {
                source: TempDir::new().expect("tempdir"),
                dests: TempDir::new().expect("tempdir"),
            };
            for name in [
                "images_videos",
                "audio",
                "setup",
                "documents",
                "compressed",
                "other",
            ] {
                fs::create_dir(fixture.dests.path().join(name)).expect("mkdir");
            }
            fixture
        }

        fn destinations(&self) -> DestinationMap {
            DestinationMap {
                images_videos: self.dests.path().join("images_videos"),
                audio: self.dests.path().join("audio"),
                setup: self.dests.path().join("setup"),
                documents: self.dests.path().join("documents"),
                compressed: self.dests.path().join("compressed"),
                other: self.dests.path().join("other"),
            }
        }

        fn config(&self, mode: TransferMode) -> RunConfig {
            RunConfig::new(
                self.source.path().to_path_buf(),
                mode,
                self.destinations(),
            )
        }

        fn add_file(&self, name: &str, content: &str) {
            fs::write(self.source.path().join(name), content).expect("write");
        }

        fn add_dir(&self, name: &str) {
            fs::create_dir(self.source.path().join(name)).expect("mkdir");
        }
    }

    fn drain_outcomes(handle: &RunHandle) -> (Vec<String>, Option<RunTermination>) {
        let mut lines = Vec::new();
        let mut termination = None;
        for event in handle.events().iter() {
            match event {
                RunEvent::Item(outcome) => lines.push(outcome.log_line()),
                RunEvent::Finished(t) => {
                    termination = Some(t);
                    break;
                }
            }
        }
        (lines, termination)
    }

    #[test]
    fn test_move_run_completes_and_empties_source() {
        let fixture = RunFixture::new();
        fixture.add_file("a.jpg", "img");
        fixture.add_file("b.txt", "doc");
        fixture.add_dir("notes");

        let handle = start_run(fixture.config(TransferMode::Move)).expect("start rejected");
        let (lines, termination) = drain_outcomes(&handle);

        assert_eq!(termination, Some(RunTermination::Completed { processed: 3 }));
        assert_eq!(handle.progress(), (3, 3));
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Moved: a.jpg -> "));
        assert!(lines[1].starts_with("Moved: b.txt -> "));
        assert!(lines[2].starts_with("Moved folder: notes -> "));

        let dests = fixture.destinations();
        assert!(dests.images_videos.join("a.jpg").exists());
        assert!(dests.documents.join("b.txt").exists());
        assert!(dests.other.join("notes").is_dir());
        assert_eq!(
            fs::read_dir(fixture.source.path()).expect("read_dir").count(),
            0,
            "source must be empty after a full move run"
        );
    }

    #[test]
    fn test_copy_run_keeps_source() {
        let fixture = RunFixture::new();
        fixture.add_file("song.mp3", "audio");

        let termination = start_run(fixture.config(TransferMode::Copy))
            .expect("start rejected")
            .wait();

        assert_eq!(termination, RunTermination::Completed { processed: 1 });
        assert!(fixture.source.path().join("song.mp3").exists());
        assert!(fixture.destinations().audio.join("song.mp3").exists());
    }

    #[test]
    fn test_directory_with_media_suffix_still_goes_to_other() {
        let fixture = RunFixture::new();
        fixture.add_dir("holiday.mp4");

        let termination = start_run(fixture.config(TransferMode::Move))
            .expect("start rejected")
            .wait();

        assert_eq!(termination, RunTermination::Completed { processed: 1 });
        assert!(fixture.destinations().other.join("holiday.mp4").is_dir());
        assert!(!fixture.destinations().images_videos.join("holiday.mp4").exists());
    }

    #[test]
    fn test_empty_source_completes_with_zero() {
        let fixture = RunFixture::new();
        let handle = start_run(fixture.config(TransferMode::Move)).expect("start rejected");
        let termination = handle.wait();
        assert_eq!(termination, RunTermination::Completed { processed: 0 });
    }

    #[test]
    fn test_missing_source_is_rejected_before_spawn() {
        let fixture = RunFixture::new();
        let mut config = fixture.config(TransferMode::Move);
        config.source = fixture.source.path().join("does-not-exist");

        match start_run(config) {
            Err(ValidationError::SourceMissing { path }) => {
                assert!(path.ends_with("does-not-exist"));
            }
            Err(other) => panic!("expected SourceMissing, got {other:?}"),
            Ok(_) => panic!("start must be rejected"),
        }
    }

    #[test]
    fn test_missing_destination_is_rejected() {
        let fixture = RunFixture::new();
        let mut config = fixture.config(TransferMode::Move);
        config.destinations.audio = fixture.dests.path().join("nope");

        match start_run(config) {
            Err(ValidationError::DestinationMissing { category, .. }) => {
                assert_eq!(category, Category::Audio);
            }
            Err(other) => panic!("expected DestinationMissing, got {other:?}"),
            Ok(_) => panic!("start must be rejected"),
        }
    }

    #[test]
    fn test_precancelled_loop_processes_nothing() {
        let fixture = RunFixture::new();
        fixture.add_file("a.jpg", "img");
        fixture.add_file("b.txt", "doc");
        let config = fixture.config(TransferMode::Move);
        let entries =
            enumerate_source(&config.source, &config.filters).expect("enumeration failed");
        let registry = ExtensionRegistry::default();
        let state = RunState::default();
        state.request_cancel();

        let mut outcomes = Vec::new();
        let end = process_entries(&entries, &config, &registry, &state, &mut |o| {
            outcomes.push(o)
        });

        assert!(matches!(end, LoopEnd::Cancelled));
        assert!(outcomes.is_empty());
        assert!(fixture.source.path().join("a.jpg").exists());
        assert!(fixture.source.path().join("b.txt").exists());
    }

    #[test]
    fn test_cancel_between_items_leaves_rest_untouched() {
        let fixture = RunFixture::new();
        fixture.add_file("a.jpg", "img");
        fixture.add_file("b.txt", "doc");
        fixture.add_file("c.zip", "zip");
        let config = fixture.config(TransferMode::Move);
        let entries =
            enumerate_source(&config.source, &config.filters).expect("enumeration failed");
        let registry = ExtensionRegistry::default();
        let state = RunState::default();

        // Request cancellation from the sink, i.e. right after the first
        // item completes and before the next boundary check.
        let mut outcomes = Vec::new();
        let end = process_entries(&entries, &config, &registry, &state, &mut |o| {
            outcomes.push(o);
            state.request_cancel();
        });

        assert!(matches!(end, LoopEnd::Cancelled));
        assert_eq!(outcomes.len(), 1, "exactly one item processed");
        assert_eq!(state.progress().0, 1);
        assert!(!fixture.source.path().join("a.jpg").exists());
        assert!(fixture.source.path().join("b.txt").exists());
        assert!(fixture.source.path().join("c.zip").exists());
    }

    #[test]
    fn test_item_failure_does_not_stop_the_loop() {
        let fixture = RunFixture::new();
        fixture.add_file("b.txt", "doc");
        let config = fixture.config(TransferMode::Move);
        let registry = ExtensionRegistry::default();
        let state = RunState::default();
        // First entry points at a path that no longer exists.
        let entries = vec![
            SourceEntry {
                name: "a.jpg".to_string(),
                path: fixture.source.path().join("a.jpg"),
                is_dir: false,
            },
            SourceEntry {
                name: "b.txt".to_string(),
                path: fixture.source.path().join("b.txt"),
                is_dir: false,
            },
        ];

        let mut outcomes = Vec::new();
        let end = process_entries(&entries, &config, &registry, &state, &mut |o| {
            outcomes.push(o)
        });

        assert!(matches!(end, LoopEnd::Completed));
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].result.is_err());
        assert!(outcomes[0].log_line().starts_with("Error processing a.jpg: "));
        assert!(outcomes[1].result.is_ok());
        assert!(fixture.destinations().documents.join("b.txt").exists());
    }

    #[test]
    fn test_cancel_after_completion_keeps_completed_state() {
        let fixture = RunFixture::new();
        fixture.add_file("a.jpg", "img");

        let handle = start_run(fixture.config(TransferMode::Move)).expect("start rejected");
        let (_, termination) = drain_outcomes(&handle);
        handle.cancel();

        assert_eq!(termination, Some(RunTermination::Completed { processed: 1 }));
        assert_eq!(handle.wait(), RunTermination::Completed { processed: 1 });
    }

    #[test]
    fn test_organizer_ignores_start_while_running() {
        let fixture = RunFixture::new();
        // A hand-built handle that claims to be running, no worker behind it.
        let state = Arc::new(RunState::default());
        state.running.store(true, Ordering::Relaxed);
        let (_tx, rx) = unbounded();
        let mut organizer = Organizer {
            current: Some(RunHandle {
                state: state.clone(),
                events: rx,
                thread: None,
            }),
        };

        let reply = organizer
            .start(fixture.config(TransferMode::Move))
            .expect("start rejected");
        assert_eq!(reply, StartReply::AlreadyRunning);

        // Once the previous run has ended, a new start goes through.
        state.running.store(false, Ordering::Relaxed);
        let reply = organizer
            .start(fixture.config(TransferMode::Move))
            .expect("start rejected");
        assert_eq!(reply, StartReply::Started);
    }

    #[test]
    fn test_organizer_cancel_when_idle_is_noop() {
        let organizer = Organizer::new();
        organizer.request_cancel();
        assert_eq!(organizer.progress(), (0, 0));
    }

    #[test]
    fn test_collision_resolution_within_a_run() {
        let fixture = RunFixture::new();
        fixture.add_file("a.jpg", "new");
        fs::write(fixture.destinations().images_videos.join("a.jpg"), "old")
            .expect("write");

        let termination = start_run(fixture.config(TransferMode::Move))
            .expect("start rejected")
            .wait();

        assert_eq!(termination, RunTermination::Completed { processed: 1 });
        let dests = fixture.destinations();
        assert_eq!(
            fs::read(dests.images_videos.join("a.jpg")).expect("read"),
            b"old",
            "pre-existing destination file must be untouched"
        );
        assert_eq!(
            fs::read(dests.images_videos.join("a(1).jpg")).expect("read"),
            b"new"
        );
    }

    #[test]
    fn test_termination_log_lines() {
        assert_eq!(
            RunTermination::Completed { processed: 3 }.log_line(),
            "Operation completed: 3 items processed."
        );
        assert_eq!(
            RunTermination::Cancelled { processed: 1 }.log_line(),
            "Operation stopped before completion: 1 items processed."
        );
        assert!(
            RunTermination::Failed {
                reason: "gone".to_string()
            }
            .log_line()
            .starts_with("Run failed: ")
        );
    }
}

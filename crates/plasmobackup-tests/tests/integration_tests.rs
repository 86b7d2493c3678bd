//! Integration tests for plasmobackup
//!
//! These run the copy passes and the liveness monitor together against real
//! temporary directories and scripted OS doubles.

use std::fs;
use std::sync::atomic::Ordering;
use std::time::Duration;

use plasmobackup_config::{paths, PathsConfig};
use plasmobackup_io::TreeCopier;
use plasmobackup_monitor::{EventLogger, LivenessMonitor};
use plasmobackup_sync::{collect, ChangeWatcher, InitialSync, Reporter};
use plasmobackup_tests::test_utils::{
    idle_snapshot, snapshot_with, ChannelChangeSource, Fixture, ScriptedProcessTable,
};
use plasmobackup_types::{CopyOrigin, LivenessEvent, OutcomeStatus};
use rstest::rstest;
use tokio::sync::mpsc;
use tokio::time::timeout;

const PROCESS: &str = "pA5.exe";
const POLL: Duration = Duration::from_secs(5);

fn copier(fixture: &Fixture) -> TreeCopier {
    TreeCopier::new(&fixture.source, &fixture.destination)
}

#[tokio::test]
async fn test_initial_sync_into_empty_destination() {
    let fixture = Fixture::new().unwrap();
    fixture.write_source("a.txt", b"hi").unwrap();
    fs::create_dir(fixture.source.join("sub")).unwrap();

    let stats = InitialSync::new(copier(&fixture), Reporter::disabled())
        .run()
        .await
        .unwrap();

    assert_eq!(fs::read(fixture.destination.join("a.txt")).unwrap(), b"hi");
    assert!(fixture.destination.join("sub").is_dir());
    assert_eq!(fs::read_dir(fixture.destination.join("sub")).unwrap().count(), 0);
    assert_eq!(stats.files_copied, 1);
    assert_eq!(stats.directories_created, 1);
    assert_eq!(stats.bytes_copied, 2);
    assert_eq!(stats.errors, 0);
}

#[tokio::test]
async fn test_initial_sync_keeps_existing_destination_files() {
    let fixture = Fixture::new().unwrap();
    fixture.write_source("a.txt", b"new").unwrap();
    fixture.write_destination("a.txt", b"old").unwrap();

    let (reporter, outcomes) = Reporter::channel();
    let stats = InitialSync::new(copier(&fixture), reporter)
        .run()
        .await
        .unwrap();

    assert_eq!(fs::read(fixture.destination.join("a.txt")).unwrap(), b"old");
    assert_eq!(stats.files_copied, 0);
    assert_eq!(collect(outcomes).await, stats);
}

#[tokio::test]
async fn test_second_initial_sync_changes_nothing() {
    let fixture = Fixture::new().unwrap();
    fixture.write_source("run1/deep/trace.dat", b"0123").unwrap();
    fs::create_dir_all(fixture.source.join("run2/empty")).unwrap();

    let sync = InitialSync::new(copier(&fixture), Reporter::disabled());
    let first = sync.run().await.unwrap();
    let second = sync.run().await.unwrap();

    assert_eq!(first.files_copied, 1);
    assert_eq!(first.directories_created, 4);
    assert_eq!(second.files_copied, 0);
    assert_eq!(second.directories_created, 0);
    assert_eq!(second.entries_skipped, first.entries_skipped + 5);
    assert!(fixture.destination.join("run2/empty").is_dir());
}

#[tokio::test]
async fn test_watch_event_overwrites_destination() {
    let fixture = Fixture::new().unwrap();
    fixture.write_destination("a.txt", b"old").unwrap();
    let changed = fixture.write_source("a.txt", b"new").unwrap();

    let (source, events) = ChannelChangeSource::new(4);
    let (reporter, mut outcomes) = Reporter::channel();
    let watcher = ChangeWatcher::new(copier(&fixture), reporter);

    events.send(changed.clone()).await.unwrap();
    drop(events);
    watcher.run(source).await.unwrap();

    let outcome = timeout(Duration::from_secs(5), outcomes.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.source, changed);
    assert_eq!(outcome.origin, CopyOrigin::Watch);
    assert!(matches!(outcome.status, OutcomeStatus::Copied(_)));
    assert_eq!(fs::read(fixture.destination.join("a.txt")).unwrap(), b"new");
}

#[rstest]
#[case("a.txt")]
#[case("2026/10/run.csv")]
#[case("session/deep/er/scan.bin")]
#[tokio::test]
async fn test_watch_creates_missing_parents(#[case] relative: &str) {
    let fixture = Fixture::new().unwrap();
    let changed = fixture.write_source(relative, b"1,2,3").unwrap();

    let (source, events) = ChannelChangeSource::new(4);
    let subscribed_root = source.subscribed_root();
    let (reporter, mut outcomes) = Reporter::channel();
    let watcher = ChangeWatcher::new(copier(&fixture), reporter);
    let running = tokio::spawn(async move { watcher.run(source).await });

    events.send(changed).await.unwrap();
    let outcome = timeout(Duration::from_secs(5), outcomes.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(!outcome.is_failure());
    assert_eq!(
        subscribed_root.lock().unwrap().as_deref(),
        Some(fixture.source.as_path())
    );
    assert_eq!(
        fs::read(fixture.destination.join(relative)).unwrap(),
        b"1,2,3"
    );

    drop(events);
    running.await.unwrap().unwrap();
    assert!(subscribed_root.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_initial_sync_then_watch() {
    let fixture = Fixture::new().unwrap();
    fixture.write_source("before.txt", b"first").unwrap();

    let copier = copier(&fixture);
    InitialSync::new(copier.clone(), Reporter::disabled())
        .run()
        .await
        .unwrap();

    let (source, events) = ChannelChangeSource::new(4);
    let (reporter, mut outcomes) = Reporter::channel();
    let watcher = ChangeWatcher::new(copier, reporter);

    let rewritten = fixture.write_source("before.txt", b"second").unwrap();
    events.send(rewritten).await.unwrap();
    drop(events);
    watcher.run(source).await.unwrap();
    outcomes.recv().await.unwrap();

    assert_eq!(
        fs::read(fixture.destination.join("before.txt")).unwrap(),
        b"second"
    );
}

#[tokio::test(start_paused = true)]
async fn test_process_start_and_stop_logged_once() {
    let table = ScriptedProcessTable::new(vec![
        idle_snapshot(),
        snapshot_with(PROCESS, 77),
        snapshot_with(PROCESS, 77),
        idle_snapshot(),
    ]);
    let monitor = LivenessMonitor::new(table, PROCESS, POLL);
    let (tx, mut rx) = mpsc::channel(1);
    let task = tokio::spawn(monitor.run(tx));

    assert_eq!(rx.recv().await, Some(LivenessEvent::Running));
    assert_eq!(rx.recv().await, Some(LivenessEvent::Stopped));

    tokio::time::sleep(POLL * 4).await;
    assert!(rx.try_recv().is_err());
    task.abort();
}

#[tokio::test(start_paused = true)]
async fn test_absent_process_produces_no_events() {
    let table = ScriptedProcessTable::new(vec![idle_snapshot()]);
    let queries = table.queries();
    let monitor = LivenessMonitor::new(table, PROCESS, POLL);
    let (tx, rx) = mpsc::channel(1);

    let task = tokio::spawn(monitor.run(tx));
    let logger = tokio::spawn(EventLogger::new("Plasmo").run(rx));
    tokio::time::sleep(POLL * 2 + Duration::from_millis(1)).await;

    assert_eq!(queries.load(Ordering::SeqCst), 3);
    task.abort();
    assert_eq!(logger.await.unwrap(), 0);
}

#[tokio::test]
async fn test_discovered_paths_feed_initial_sync() {
    let fixture = Fixture::new().unwrap();
    let drive = fixture.temp_dir.path().join("drive");
    let data = drive.join("PlasmoAdvancedData").join("Data");
    fs::create_dir_all(data.join("session")).unwrap();
    fs::write(data.join("session/scan.bin"), b"\x00\x01").unwrap();

    let config = PathsConfig {
        search_roots: vec![drive.clone()],
        ..PathsConfig::default()
    };
    let resolved = paths::resolve(&config).unwrap();
    resolved.prepare().unwrap();
    assert_eq!(resolved.output, drive.join("PlasmoMeasurementFiles"));

    InitialSync::new(
        TreeCopier::new(&resolved.source, &resolved.output),
        Reporter::disabled(),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(
        fs::read(resolved.output.join("session/scan.bin")).unwrap(),
        b"\x00\x01"
    );
}

use macroz::error::MacroError;
use macroz::model::{MacroRecord, MacroStore};
use macroz::store::fs::{load_store, save_store, FileBackend};
use macroz::store::{MacroBackend, StoreOptions};
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn greet_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("macros.json");
    let mut backend = FileBackend::new(&path);

    let mut store = backend.load().unwrap().store;
    assert!(store.is_empty());
    store.add(MacroRecord::new("greet", "ihello<Esc>", b"ihello\x1b"));
    backend.save(&store).unwrap();

    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert!(on_disk.contains("\"raw\":\"aWhlbGxvGw==\""));

    let mut reloaded = backend.load().unwrap().store;
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.list()[0].name, "greet");
    assert_eq!(reloaded.list()[0].raw_bytes().unwrap(), b"ihello\x1b".to_vec());

    let removed = reloaded.remove(0).unwrap();
    assert_eq!(removed.name, "greet");
    backend.save(&reloaded).unwrap();

    assert!(backend.load().unwrap().store.is_empty());
}

#[test]
fn corrupt_file_is_reported_and_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("macros.json");
    std::fs::write(&path, "not json").unwrap();

    let err = load_store(&path, &StoreOptions::default()).unwrap_err();
    assert!(matches!(err, MacroError::StoreCorrupt { .. }));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
}

#[test]
fn missing_file_loads_empty_and_is_not_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("macros.json");

    let loaded = load_store(&path, &StoreOptions::default()).unwrap();
    assert!(loaded.store.is_empty());
    assert!(loaded.formatter_error.is_none());
    assert!(!path.exists());
}

#[test]
fn binary_payloads_survive_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("macros.json");
    let all: Vec<u8> = (0..=255).collect();

    let mut store = MacroStore::new();
    store.add(MacroRecord::new("all", "every byte", &all));
    store.add(MacroRecord::new("nul", "<Nul>", b"\0"));
    store.add(MacroRecord::new("empty", "", b""));
    save_store(&path, &StoreOptions::default(), &store).unwrap();

    let loaded = load_store(&path, &StoreOptions::default()).unwrap().store;
    let payloads: Vec<Vec<u8>> = loaded
        .list()
        .iter()
        .map(|r| r.raw_bytes().unwrap())
        .collect();
    assert_eq!(payloads, vec![all, b"\0".to_vec(), Vec::new()]);
}

#[test]
fn second_writer_discards_first_writers_update() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("macros.json");
    save_store(&path, &StoreOptions::default(), &MacroStore::new()).unwrap();

    let mut a = FileBackend::new(&path);
    let mut b = FileBackend::new(&path);
    let mut from_a = a.load().unwrap().store;
    let mut from_b = b.load().unwrap().store;

    from_a.add(MacroRecord::new("X", "x", b"x"));
    a.save(&from_a).unwrap();
    from_b.add(MacroRecord::new("Y", "y", b"y"));
    b.save(&from_b).unwrap();

    let loaded = load_store(&path, &StoreOptions::default()).unwrap().store;
    let names: Vec<&str> = loaded.list().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Y"]);
    assert_no_temp_files(dir.path());
}

#[test]
fn racing_writers_leave_one_complete_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("macros.json");
    save_store(&path, &StoreOptions::default(), &MacroStore::new()).unwrap();

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = ["left", "right"]
        .into_iter()
        .map(|name| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut backend = FileBackend::new(&path);
                let mut store = backend.load().unwrap().store;
                barrier.wait();
                store.add(MacroRecord::new(name, name, name.as_bytes()));
                backend.save(&store).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let loaded = load_store(&path, &StoreOptions::default()).unwrap().store;
    assert_eq!(loaded.len(), 1);
    assert_no_temp_files(dir.path());
}

fn assert_no_temp_files(dir: &Path) {
    let leftovers: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

mod common;

use common::ScriptedBackend;
use exl_player::{Controller, PlaybackStatus, TrackStore, VolumeFile};
use std::fs;
use std::path::{Path, PathBuf};

#[test]
fn song_table_and_cursor_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("music.db");
    let volume = VolumeFile::new(dir.path().join("volume.txt"));

    {
        let store = TrackStore::open(&db).unwrap();
        let mut player = Controller::new(store, ScriptedBackend::new(), volume.clone()).unwrap();
        player.add_track(Path::new("/music/b.mp3")).unwrap();
        player.add_track(Path::new("/music/a.mp3")).unwrap();
        player.next();
    }

    let backend = ScriptedBackend::new();
    let store = TrackStore::open(&db).unwrap();
    let player = Controller::new(store, backend.clone(), volume).unwrap();

    let names: Vec<String> = player.tracks().iter().map(|t| t.display_name()).collect();
    assert_eq!(names, vec!["b.mp3", "a.mp3"]);
    // a fresh start always cues the first row, paused
    assert_eq!(player.current_index(), Some(0));
    assert_eq!(player.status(), PlaybackStatus::Paused);
    assert_eq!(backend.loaded(), Some(PathBuf::from("/music/b.mp3")));
}

#[test]
fn volume_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let volume_path = dir.path().join("volume.txt");

    {
        let store = TrackStore::open_in_memory().unwrap();
        let mut player =
            Controller::new(store, ScriptedBackend::with_volume(80), VolumeFile::new(&volume_path)).unwrap();
        assert_eq!(player.volume().get(), 80);
        assert_eq!(player.set_volume(42).get(), 42);
    }

    let backend = ScriptedBackend::with_volume(80);
    let store = TrackStore::open_in_memory().unwrap();
    let player = Controller::new(store, backend.clone(), VolumeFile::new(&volume_path)).unwrap();
    assert_eq!(player.volume().get(), 42);
    assert_eq!(backend.script.borrow().volume.get(), 42);
}

#[test]
fn out_of_range_volume_is_clamped_before_saving() {
    let dir = tempfile::tempdir().unwrap();
    let volume_path = dir.path().join("volume.txt");
    let store = TrackStore::open_in_memory().unwrap();
    let mut player =
        Controller::new(store, ScriptedBackend::with_volume(50), VolumeFile::new(&volume_path)).unwrap();

    assert_eq!(player.set_volume(150).get(), 100);
    assert_eq!(fs::read_to_string(&volume_path).unwrap(), "100");
    assert_eq!(player.set_volume(-20).get(), 0);
    assert_eq!(fs::read_to_string(&volume_path).unwrap(), "0");
}

#[test]
fn corrupt_volume_file_falls_back_to_backend_volume() {
    let dir = tempfile::tempdir().unwrap();
    let volume_path = dir.path().join("volume.txt");
    fs::write(&volume_path, "eleven").unwrap();

    let store = TrackStore::open_in_memory().unwrap();
    let player =
        Controller::new(store, ScriptedBackend::with_volume(35), VolumeFile::new(&volume_path)).unwrap();
    assert_eq!(player.volume().get(), 35);
}

#[test]
fn unwritable_volume_file_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    // a directory where the file should be makes every write fail
    let volume_path = dir.path().join("volume.txt");
    fs::create_dir(&volume_path).unwrap();

    let store = TrackStore::open_in_memory().unwrap();
    let mut player =
        Controller::new(store, ScriptedBackend::with_volume(35), VolumeFile::new(&volume_path)).unwrap();
    assert_eq!(player.set_volume(60).get(), 60);
    assert_eq!(player.volume().get(), 60);
}

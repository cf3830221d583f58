use tank_arcade::high_score;

use tempfile::tempdir;

#[test]
fn missing_file_reads_as_zero() {
    let dir = tempdir().unwrap();
    assert_eq!(high_score::load(&dir.path().join("nope")), 0);
}

#[test]
fn save_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("score");
    high_score::save(&path, 1234).unwrap();
    assert_eq!(high_score::load(&path), 1234);
}

#[test]
fn tolerates_whitespace_rejects_garbage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("score");
    std::fs::write(&path, " 42\n").unwrap();
    assert_eq!(high_score::load(&path), 42);
    std::fs::write(&path, "forty-two").unwrap();
    assert_eq!(high_score::load(&path), 0);
    std::fs::write(&path, "-5").unwrap();
    assert_eq!(high_score::load(&path), 0);
}

#[test]
fn reset_writes_zero() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("score");
    high_score::save(&path, 99).unwrap();
    high_score::reset(&path).unwrap();
    assert_eq!(high_score::load(&path), 0);
    assert!(path.exists());
}

#[test]
fn record_only_writes_improvements() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("score");

    assert_eq!(high_score::record(&path, 50, 30), 50);
    assert!(!path.exists());

    assert_eq!(high_score::record(&path, 50, 50), 50);
    assert!(!path.exists());

    assert_eq!(high_score::record(&path, 50, 80), 80);
    assert_eq!(high_score::load(&path), 80);
}

#[test]
fn record_survives_unwritable_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("score");
    assert_eq!(high_score::record(&path, 0, 10), 10);
    assert_eq!(high_score::load(&path), 0);
}

//! Share storage and validation working together

use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use smb_shares::models::ShareRecord;
use smb_shares::storage::{find_share_index, ShareStore};
use smb_shares::validation::ShareValidator;
use tempfile::TempDir;

fn setup() -> (TempDir, ShareStore, ShareValidator) {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("mnt");
    fs::create_dir_all(&root).unwrap();
    let store = ShareStore::new(temp_dir.path().join("config").join("shares.json"));
    let validator = ShareValidator::new(root);
    (temp_dir, store, validator)
}

fn mkdir(temp: &TempDir, rel: &str) -> String {
    let dir = temp.path().join("mnt").join(rel);
    fs::create_dir_all(&dir).unwrap();
    dir.to_string_lossy().to_string()
}

#[test]
fn rapid_sequential_saves() {
    let (temp, store, validator) = setup();
    let mut shares = Vec::new();

    for i in 0..10 {
        let path = mkdir(&temp, &format!("user/share{i}"));
        let mut share = ShareRecord::new(format!("Share{i}"), path);
        assert!(validator.validate(&mut share).is_empty());
        shares.push(share);
        store.save(&shares).unwrap();
    }

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 10);
    for (i, share) in loaded.iter().enumerate() {
        assert_eq!(share.name, format!("Share{i}"));
    }
}

#[test]
fn save_load_save_cycle() {
    let (temp, store, _validator) = setup();
    store
        .save(&[ShareRecord::with_comment(
            "Original",
            mkdir(&temp, "user/original"),
            "Original comment",
        )])
        .unwrap();

    let mut loaded = store.load().unwrap();
    loaded[0].comment = Some("Modified comment".into());
    store.save(&loaded).unwrap();

    let fin = store.load().unwrap();
    assert_eq!(fin.len(), 1);
    assert_eq!(fin[0].comment.as_deref(), Some("Modified comment"));
    assert_eq!(fin[0].name, "Original");
}

#[test]
fn find_index_tracks_removals() {
    let (_temp, store, _validator) = setup();
    store
        .save(&[
            ShareRecord::new("Alpha", "/mnt/user/share1"),
            ShareRecord::new("Beta", "/mnt/user/share2"),
            ShareRecord::new("Gamma", "/mnt/user/share3"),
        ])
        .unwrap();

    let mut loaded = store.load().unwrap();
    assert_eq!(find_share_index(&loaded, "Beta"), Some(1));

    loaded.remove(0);
    store.save(&loaded).unwrap();

    let reloaded = store.load().unwrap();
    assert_eq!(find_share_index(&reloaded, "Beta"), Some(0));
    assert_eq!(find_share_index(&reloaded, "Alpha"), None);
}

#[test]
fn empty_collection_round_trips() {
    let (_temp, store, _validator) = setup();

    store.save(&[]).unwrap();
    let loaded = store.load().unwrap();
    assert!(loaded.is_empty());
    assert_eq!(find_share_index(&loaded, "NonExistent"), None);
    assert_eq!(fs::read_to_string(store.path()).unwrap().trim(), "[]");
}

#[test]
fn readers_never_see_partial_documents() {
    let (_temp, store, _validator) = setup();
    let big: Vec<_> = (0..200)
        .map(|i| {
            ShareRecord::with_comment(
                format!("Share{i}"),
                format!("/mnt/user/{i}"),
                "x".repeat(200),
            )
        })
        .collect();
    let small = vec![ShareRecord::new("Only", "/mnt/user/only")];
    store.save(&small).unwrap();

    let done = Arc::new(AtomicBool::new(false));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut reads = 0;
                while !done.load(Ordering::Relaxed) || reads == 0 {
                    let loaded = store.load().expect("reader saw a corrupt document");
                    assert!(loaded.len() == 1 || loaded.len() == 200);
                    reads += 1;
                }
            })
        })
        .collect();

    for round in 0..50 {
        let shares = if round % 2 == 0 { &big } else { &small };
        store.save(shares).unwrap();
    }
    done.store(true, Ordering::Relaxed);

    for reader in readers {
        reader.join().unwrap();
    }
}

#[cfg(unix)]
#[test]
fn save_keeps_document_readable_by_other_tools() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, store, _validator) = setup();
    store.save(&[]).unwrap();
    fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

    store.save(&[]).unwrap();
    let mode = fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}

#[test]
fn validated_record_is_what_gets_persisted() {
    let (temp, store, validator) = setup();
    let real = mkdir(&temp, "user/realdir");
    let raw = format!("{}/../realdir", mkdir(&temp, "user/other"));

    let mut share = ShareRecord::new("Canonical", raw);
    assert!(validator.validate(&mut share).is_empty());
    store.save(std::slice::from_ref(&share)).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(
        loaded[0].path,
        fs::canonicalize(real).unwrap().to_string_lossy()
    );
}

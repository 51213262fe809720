// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The same calling code run against both backends.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use std::io::{Cursor, Seek, SeekFrom, Write};
use std::sync::Arc;
use storefs::testing::{FixedClock, MemoryTransport};
use storefs::{
    Error, FileSystem, LocalDiskBackend, ObjectStoreBackend, ObjectStoreConfig, decode_data_uri,
};
use tempfile::TempDir;

const GIF_URI: &[u8] =
    b"data:image/gif;base64,R0lGODlhAQABAIAAAP///////yH5BAEKAAEALAAAAAABAAEAAAICTAEAOw==";

fn object_backend() -> (ObjectStoreBackend, Arc<MemoryTransport>) {
    let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
    let transport = Arc::new(MemoryTransport::with_clock(clock.clone()));
    let fs = ObjectStoreBackend::with_transport(
        ObjectStoreConfig::new("eu-west-1", "media"),
        transport.clone(),
        clock,
    );
    (fs, transport)
}

/// Run `check` once per backend
fn each_backend(check: impl Fn(&dyn FileSystem)) {
    let dir = TempDir::new().unwrap();
    let local: &dyn FileSystem = &LocalDiskBackend::with_root(dir.path());
    check(local);

    let (remote, _transport) = object_backend();
    let remote: &dyn FileSystem = &remote;
    check(remote);
}

#[test]
fn test_round_trip() {
    let contents: [&[u8]; 3] = [b"", b"plain text", &[0u8, 255, 1, 254, 2, 253]];

    each_backend(|fs| {
        for (i, content) in contents.iter().enumerate() {
            let path = format!("round trip/item {}.bin", i);
            let handle = fs.put(&mut Cursor::new(content.to_vec()), &path).unwrap();
            let key = handle.stat().unwrap().key;
            handle.close().unwrap();

            let mut fetched = fs.get(&key).unwrap();
            assert_eq!(fetched.read_remaining().unwrap(), *content, "path {}", path);
            assert_eq!(fetched.stat().unwrap().size, content.len() as u64);
        }
    });
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_round_trip_any_content(content in prop::collection::vec(any::<u8>(), 0..4096)) {
        each_backend(|fs| {
            let handle = fs.put(&mut Cursor::new(content.clone()), "any/blob.bin").unwrap();
            let key = handle.stat().unwrap().key;
            handle.close().unwrap();

            let mut fetched = fs.get(&key).unwrap();
            assert_eq!(fetched.read_remaining().unwrap(), content);
        });
    }
}

#[test]
fn test_write_then_get_on_both_backends() {
    each_backend(|fs| {
        let handle = fs.put(&mut Cursor::new(b"draft".to_vec()), "notes/today.txt").unwrap();
        let key = handle.stat().unwrap().key;
        let mut handle = fs.get(&key).unwrap();
        handle.seek(SeekFrom::Start(0)).unwrap();
        write!(handle, "final {}", 2).unwrap();
        handle.close().unwrap();

        let mut fetched = fs.get(&key).unwrap();
        assert_eq!(fetched.read_remaining().unwrap(), b"final 2");
    });
}

#[test]
fn test_get_is_seekable() {
    each_backend(|fs| {
        let handle = fs.put(&mut Cursor::new(b"0123456789".to_vec()), "seek/digits.txt").unwrap();
        let key = handle.stat().unwrap().key;

        let mut fetched = fs.get(&key).unwrap();
        fetched.seek(SeekFrom::Start(6)).unwrap();
        assert_eq!(fetched.read_remaining().unwrap(), b"6789");
        fetched.seek(SeekFrom::Start(0)).unwrap();
        assert_eq!(fetched.read_remaining().unwrap(), b"0123456789");
    });
}

#[test]
fn test_malformed_paths_rejected() {
    each_backend(|fs| {
        for bad in ["", " \t ", "dir/", "no_extension"] {
            let result = fs.put(&mut Cursor::new(b"x".to_vec()), bad);
            assert!(matches!(result, Err(Error::PathFormat { .. })), "{:?}", bad);
        }
    });
}

#[test]
fn test_get_missing() {
    each_backend(|fs| {
        assert!(fs.get("missing/file.txt").is_err());
    });
}

#[test]
fn test_local_container_reuse() {
    let dir = TempDir::new().unwrap();
    let fs = LocalDiskBackend::with_root(dir.path());

    fs.put(&mut Cursor::new(b"one".to_vec()), "a/b/c.png").unwrap();
    assert!(dir.path().join("a/b").is_dir());

    fs.put(&mut Cursor::new(b"two".to_vec()), "a/b/d.png").unwrap();
    fs.put(&mut Cursor::new(b"three".to_vec()), "a/b/c.png").unwrap();

    assert_eq!(std::fs::read(dir.path().join("a/b/c.png")).unwrap(), b"three");
    assert_eq!(std::fs::read(dir.path().join("a/b/d.png")).unwrap(), b"two");
}

#[test]
fn test_local_absolute_path_ignores_root() {
    let root = TempDir::new().unwrap();
    let other = TempDir::new().unwrap();
    let fs = LocalDiskBackend::with_root(root.path());

    let target = other.path().join("abs/file.txt");
    let handle = fs
        .put(&mut Cursor::new(b"abs".to_vec()), target.to_str().unwrap())
        .unwrap();
    assert_eq!(handle.stat().unwrap().name, target.display().to_string());
    assert!(target.is_file());
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[test]
fn test_data_uri_upload() {
    let decoded = decode_data_uri(GIF_URI).unwrap();
    let (fs, transport) = object_backend();

    let handle = fs.put(&mut decoded.reader(), "avatars/pixel.gif").unwrap();
    let meta = handle.stat().unwrap();
    assert_eq!(meta.name, "https://s3-eu-west-1.amazonaws.com/media/avatars/pixel.gif");

    let stored = transport.object("media", "avatars/pixel.gif").unwrap();
    assert_eq!(stored.content_type, decoded.mime_type);
    assert_eq!(stored.body, decoded.content);
}

#[test]
fn test_object_write_back_round_trips() {
    let (fs, transport) = object_backend();

    let mut handle = fs.put(&mut Cursor::new(b"v1".to_vec()), "docs/page.html").unwrap();
    write!(handle, "<p>{}</p>", "v2").unwrap();
    handle.close().unwrap();

    let mut fetched = fs.get("docs/page.html").unwrap();
    assert_eq!(fetched.read_remaining().unwrap(), b"<p>v2</p>");
    assert_eq!(transport.object("media", "docs/page.html").unwrap().content_type, "text/html");
}

#[test]
fn test_concurrent_puts() {
    let dir = TempDir::new().unwrap();
    let local = LocalDiskBackend::with_root(dir.path());
    let (remote, transport) = object_backend();
    let backends: [&dyn FileSystem; 2] = [&local, &remote];

    for fs in backends {
        std::thread::scope(|scope| {
            for i in 0..8 {
                scope.spawn(move || {
                    let content = format!("worker {}", i).into_bytes();
                    fs.put(&mut Cursor::new(content), &format!("shared/w{}.txt", i))
                        .unwrap();
                });
            }
        });

        for i in 0..8 {
            let mut handle = fs.get(&format!("shared/w{}.txt", i)).unwrap();
            assert_eq!(handle.read_remaining().unwrap(), format!("worker {}", i).into_bytes());
        }
    }
    assert_eq!(transport.put_count(), 8);
}

// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};

/// Mode reported for remote objects, which expose no permission model
pub const OBJECT_MODE: u32 = 0o777;

/// Mode used when creating local container directories
pub const DIR_MODE: u32 = 0o755;

/// Metadata describing a stored file, as returned by `FileHandle::stat`
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetadata {
    /// Public URL for remote objects, resolved host path for local files
    pub name: String,

    /// Identifier to pass back to `FileSystem::get`
    pub key: String,

    /// Content length in bytes
    pub size: u64,

    /// Always false for remote objects
    pub is_dir: bool,

    /// Permission bits
    pub mode: u32,

    /// Modification time, None when the backend did not report one
    pub mod_time: Option<DateTime<Utc>>,
}

impl FileMetadata {
    /// Metadata for a remote object snapshot
    #[must_use]
    pub fn object(name: String, key: String, size: u64, mod_time: Option<DateTime<Utc>>) -> Self {
        Self {
            name,
            key,
            size,
            is_dir: false,
            mode: OBJECT_MODE,
            mod_time,
        }
    }

    /// Metadata for a local file from its host `std::fs::Metadata`
    #[must_use]
    pub fn host(name: String, key: String, metadata: &std::fs::Metadata) -> Self {
        Self {
            name,
            key,
            size: metadata.len(),
            is_dir: metadata.is_dir(),
            mode: host_mode(metadata),
            mod_time: metadata.modified().ok().map(DateTime::<Utc>::from),
        }
    }
}

#[cfg(unix)]
fn host_mode(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn host_mode(metadata: &std::fs::Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

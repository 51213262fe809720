// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::Result;
use crate::handle::FileHandle;
use std::io::{Read, Seek};

/// Readable and seekable put source
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek + ?Sized> ReadSeek for T {}

/// The storage contract shared by every backend.
///
/// Both calls are blocking and independent: a backend keeps no state
/// between calls and may be shared across threads.
pub trait FileSystem: Send + Sync {
    /// Store everything remaining in `source` at `path`.
    ///
    /// `path` is sanitized first and must end in a file name with an
    /// extension; otherwise `Error::PathFormat` is returned before any
    /// storage is touched.
    fn put(&self, source: &mut dyn ReadSeek, path: &str) -> Result<FileHandle>;

    /// Open the content stored at `path`, positioned at the start.
    ///
    /// `path` is used as given; pass the `key` reported by `stat()` on the
    /// handle returned from `put`.
    fn get(&self, path: &str) -> Result<FileHandle>;
}

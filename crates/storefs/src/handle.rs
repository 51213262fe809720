// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::Result;
use crate::local::LocalFile;
use crate::metadata::FileMetadata;
use crate::object::ObjectFile;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// A file returned by `FileSystem::put` or `FileSystem::get`
#[derive(Debug)]
pub enum FileHandle {
    /// Live descriptor on the local disk
    Local(LocalFile),
    /// In-memory snapshot of a remote object
    Object(ObjectFile),
}

impl FileHandle {
    pub fn stat(&self) -> Result<FileMetadata> {
        match self {
            FileHandle::Local(file) => file.stat(),
            FileHandle::Object(file) => Ok(file.stat()),
        }
    }

    /// Release the handle. Remote snapshots upload unsynced writes first.
    pub fn close(self) -> Result<()> {
        match self {
            FileHandle::Local(file) => file.close(),
            FileHandle::Object(file) => file.close(),
        }
    }

    /// Read from the current position to the end
    pub fn read_remaining(&mut self) -> Result<Vec<u8>> {
        let mut content = Vec::new();
        self.read_to_end(&mut content)?;
        Ok(content)
    }
}

impl Read for FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            FileHandle::Local(file) => file.read(buf),
            FileHandle::Object(file) => file.read(buf),
        }
    }
}

impl Seek for FileHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            FileHandle::Local(file) => file.seek(pos),
            FileHandle::Object(file) => file.seek(pos),
        }
    }
}

impl Write for FileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileHandle::Local(file) => file.write(buf),
            FileHandle::Object(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileHandle::Local(file) => file.flush(),
            FileHandle::Object(file) => file.flush(),
        }
    }
}

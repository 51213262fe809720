// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Local disk backend
//!
//! Files live under a root directory (the working directory unless one is
//! given). Container directories are created on demand with [`DIR_MODE`].
//! Handles wrap the open `std::fs::File`, so reads, writes and `stat` go
//! straight to the host.

use crate::error::Result;
use crate::fs::{FileSystem, ReadSeek};
use crate::handle::FileHandle;
use crate::metadata::{DIR_MODE, FileMetadata};
use crate::path::{sanitize, split};
use diagnostics::{debug, info};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Host filesystem calls made by [`LocalDiskBackend`]
pub trait HostFs: Send + Sync {
    /// Create `path` and any missing parents. Existing directories are fine.
    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Create or truncate `path` for reading and writing
    fn create(&self, path: &Path) -> io::Result<File>;

    /// Open an existing file
    fn open(&self, path: &Path) -> io::Result<File>;
}

/// [`HostFs`] over `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFs;

impl HostFs for OsFs {
    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()> {
        let mut builder = std::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;
        builder.create(path)
    }

    fn create(&self, path: &Path) -> io::Result<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
    }

    fn open(&self, path: &Path) -> io::Result<File> {
        // Read-only files still open, writes on the handle then fail
        match OpenOptions::new().read(true).write(true).open(path) {
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => File::open(path),
            result => result,
        }
    }
}

/// Storage on the local disk
#[derive(Clone)]
pub struct LocalDiskBackend {
    root: PathBuf,
    host: Arc<dyn HostFs>,
}

impl std::fmt::Debug for LocalDiskBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalDiskBackend")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Default for LocalDiskBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalDiskBackend {
    /// Relative paths resolve against the working directory
    #[must_use]
    pub fn new() -> Self {
        Self::with_root(".")
    }

    #[must_use]
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self::with_host(root, Arc::new(OsFs))
    }

    #[must_use]
    pub fn with_host<P: Into<PathBuf>>(root: P, host: Arc<dyn HostFs>) -> Self {
        Self {
            root: root.into(),
            host,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if path == Path::new(".") {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }
}

impl FileSystem for LocalDiskBackend {
    fn put(&self, source: &mut dyn ReadSeek, path: &str) -> Result<FileHandle> {
        let key = sanitize(path);
        let parts = split(&key)?;

        let container = self.resolve(&parts.container);
        self.host.create_dir_all(&container, DIR_MODE)?;
        debug!("container {path} ready", path: container.display().to_string());

        let target = container.join(&parts.file_name);
        let mut file = self.host.create(&target)?;
        let written = io::copy(source, &mut file)?;
        file.seek(SeekFrom::Start(0))?;

        info!("stored {written} bytes at {path}", written: written, path: target.display().to_string());

        Ok(FileHandle::Local(LocalFile::new(file, target, key)))
    }

    fn get(&self, path: &str) -> Result<FileHandle> {
        let target = self.resolve(Path::new(path));
        let file = self.host.open(&target)?;

        info!("opened {path}", path: target.display().to_string());

        Ok(FileHandle::Local(LocalFile::new(file, target, path.to_string())))
    }
}

/// An open file on the local disk
#[derive(Debug)]
pub struct LocalFile {
    file: File,
    path: PathBuf,
    key: String,
}

impl LocalFile {
    fn new(file: File, path: PathBuf, key: String) -> Self {
        Self { file, path, key }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stat(&self) -> Result<FileMetadata> {
        let metadata = self.file.metadata()?;
        Ok(FileMetadata::host(
            self.path.display().to_string(),
            self.key.clone(),
            &metadata,
        ))
    }

    pub fn close(self) -> Result<()> {
        drop(self.file);
        Ok(())
    }
}

impl Read for LocalFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for LocalFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

impl Write for LocalFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Object store backend
//!
//! Objects are addressed by key within one bucket. Every `put` buffers the
//! whole source (the store request needs a content length up front) and
//! issues a single request; every `get` buffers the whole body. Handles
//! are in-memory snapshots that remember their storage key. Writes edit the
//! snapshot; `flush` or `close` uploads the whole snapshot as the new object
//! under that key.

use crate::clock::{Clock, SystemClock};
use crate::config::ObjectStoreConfig;
use crate::credentials::CredentialProvider;
use crate::error::Result;
use crate::fs::{FileSystem, ReadSeek};
use crate::handle::FileHandle;
use crate::metadata::FileMetadata;
use crate::path::{content_type, sanitize, split};
use crate::transport::{Connector, PutObject, S3Connector, TransportClient};
use chrono::{DateTime, Utc};
use diagnostics::{debug, info, warn};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

/// Storage in one bucket of an S3-compatible object store
#[derive(Clone)]
pub struct ObjectStoreBackend {
    config: Arc<ObjectStoreConfig>,
    transport: Arc<dyn TransportClient>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ObjectStoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreBackend")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ObjectStoreBackend {
    /// Connect to S3 with credentials from `provider` and the system clock
    pub fn new(config: ObjectStoreConfig, provider: &dyn CredentialProvider) -> Result<Self> {
        Self::connect(config, provider, &S3Connector, Arc::new(SystemClock))
    }

    /// Establish a session through `connector`. The provider is consulted
    /// once, here.
    pub fn connect(
        config: ObjectStoreConfig,
        provider: &dyn CredentialProvider,
        connector: &dyn Connector,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let credentials = provider.credentials()?;
        let transport = connector.connect(&config, credentials)?;
        Ok(Self::with_transport(config, transport, clock))
    }

    /// Use an already bound transport client
    #[must_use]
    pub fn with_transport(
        config: ObjectStoreConfig,
        transport: Arc<dyn TransportClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            clock,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ObjectStoreConfig {
        &self.config
    }

    /// Public URL of the object at `key`
    #[must_use]
    pub fn file_url(&self, key: &str) -> String {
        self.config.public_url(key)
    }

    fn object_metadata(
        &self,
        key: &str,
        size: usize,
        mod_time: Option<DateTime<Utc>>,
    ) -> FileMetadata {
        FileMetadata::object(self.file_url(key), key.to_string(), size as u64, mod_time)
    }

    /// Store `content` as the whole object at `key`
    fn upload(&self, key: &str, content: &[u8]) -> Result<FileMetadata> {
        let content_type = content_type(key);
        let request = PutObject {
            bucket: &self.config.bucket,
            key,
            body: content,
            content_type: &content_type,
        };

        if let Err(e) = self.transport.put_object(&request) {
            warn!("put {key} failed: {error}", key: key, error: e.to_string());
            return Err(e.into());
        }

        info!(
            "stored {size} bytes at {key} as {content_type}",
            size: request.content_length(),
            key: key,
            content_type: content_type.as_str()
        );

        Ok(self.object_metadata(key, content.len(), Some(self.clock.now())))
    }
}

impl FileSystem for ObjectStoreBackend {
    fn put(&self, source: &mut dyn ReadSeek, path: &str) -> Result<FileHandle> {
        let sanitized = sanitize(path);
        split(&sanitized)?;
        let key = sanitized.trim_start_matches('/');

        let mut content = Vec::new();
        source.read_to_end(&mut content)?;

        let metadata = self.upload(key, &content)?;
        Ok(FileHandle::Object(ObjectFile::new(self.clone(), content, metadata)))
    }

    fn get(&self, path: &str) -> Result<FileHandle> {
        let object = match self.transport.get_object(&self.config.bucket, path) {
            Ok(object) => object,
            Err(e) => {
                warn!("get {key} failed: {error}", key: path, error: e.to_string());
                return Err(e.into());
            }
        };

        info!("fetched {size} bytes from {key}", size: object.body.len(), key: path);

        let metadata = self.object_metadata(path, object.body.len(), object.last_modified);
        Ok(FileHandle::Object(ObjectFile::new(self.clone(), object.body, metadata)))
    }
}

/// Snapshot of a remote object.
///
/// Reads, seeks and writes work on the bytes captured when the handle was
/// made, the way they would on a `Cursor`. Written bytes stay local until
/// [`ObjectFile::sync`] (also reached through `flush` and
/// `FileHandle::close`) uploads the whole snapshot under the retained key.
/// Dropping a handle with unsynced writes makes one last attempt and logs
/// a failure.
pub struct ObjectFile {
    backend: ObjectStoreBackend,
    cursor: Cursor<Vec<u8>>,
    metadata: FileMetadata,
    dirty: bool,
}

impl std::fmt::Debug for ObjectFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectFile")
            .field("metadata", &self.metadata)
            .field("position", &self.cursor.position())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl ObjectFile {
    fn new(backend: ObjectStoreBackend, content: Vec<u8>, metadata: FileMetadata) -> Self {
        Self {
            backend,
            cursor: Cursor::new(content),
            metadata,
            dirty: false,
        }
    }

    /// Metadata of the last upload or fetch, sized to the current snapshot
    #[must_use]
    pub fn stat(&self) -> FileMetadata {
        FileMetadata {
            size: self.cursor.get_ref().len() as u64,
            ..self.metadata.clone()
        }
    }

    /// Storage key writes are sent to
    #[must_use]
    pub fn key(&self) -> &str {
        &self.metadata.key
    }

    #[must_use]
    pub fn content(&self) -> &[u8] {
        self.cursor.get_ref()
    }

    /// True when the snapshot holds writes not yet uploaded
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Upload the snapshot as the complete object if it has unsynced
    /// writes. On failure the writes stay pending.
    pub fn sync(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let metadata = self
            .backend
            .upload(&self.metadata.key, self.cursor.get_ref())?;
        debug!("synced {key}", key: metadata.key.as_str());

        self.metadata = metadata;
        self.dirty = false;
        Ok(())
    }

    /// Sync and release. A failed upload is returned, not retried on drop.
    pub fn close(mut self) -> Result<()> {
        let result = self.sync();
        self.dirty = false;
        result
    }
}

impl Read for ObjectFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for ObjectFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl Write for ObjectFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.cursor.write(buf)?;
        if written > 0 {
            self.dirty = true;
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sync().map_err(io::Error::other)
    }
}

impl Drop for ObjectFile {
    fn drop(&mut self) {
        if let Err(e) = self.sync() {
            warn!(
                "discarding unsynced writes to {key}: {error}",
                key: self.metadata.key.as_str(),
                error: e.to_string()
            );
        }
    }
}

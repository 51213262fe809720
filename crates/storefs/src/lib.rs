// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! storefs -- one put/get contract over local disk and S3 object storage
//!
//! Callers depend on the [`FileSystem`] trait. Two backends implement it:
//!
//! - [`LocalDiskBackend`] writes under a root directory, creating parent
//!   directories as needed, and hands back live file descriptors.
//! - [`ObjectStoreBackend`] stores objects in one bucket through a
//!   [`TransportClient`], and hands back in-memory snapshots. Writes edit
//!   the snapshot; `flush` or `close` re-uploads the whole object under the
//!   same key.
//!
//! Paths are sanitized (whitespace runs become `-`) and must end in a file
//! name with an extension. The handle's [`FileMetadata::key`] is the
//! identifier to pass back to [`FileSystem::get`].
//!
//! ```no_run
//! use std::io::Cursor;
//! use storefs::{FileSystem, LocalDiskBackend};
//!
//! # fn example() -> storefs::Result<()> {
//! let fs = LocalDiskBackend::new();
//! let handle = fs.put(&mut Cursor::new(b"hello".to_vec()), "notes/hello world.txt")?;
//! let key = handle.stat()?.key; // "notes/hello-world.txt"
//! handle.close()?;
//!
//! let mut again = fs.get(&key)?;
//! assert_eq!(again.read_remaining()?, b"hello");
//! # Ok(())
//! # }
//! ```

mod clock;
mod config;
mod credentials;
mod error;
mod fs;
mod handle;
mod local;
mod metadata;
mod mime;
mod object;
pub mod path;
pub mod testing;
mod transport;

pub use clock::{Clock, SystemClock};
pub use config::{ObjectStoreConfig, StorageConfig};
pub use credentials::{CredentialProvider, Credentials, EnvCredentials, StaticCredentials};
pub use error::{Error, Result, TransportError};
pub use fs::{FileSystem, ReadSeek};
pub use handle::FileHandle;
pub use local::{HostFs, LocalDiskBackend, LocalFile, OsFs};
pub use metadata::{DIR_MODE, FileMetadata, OBJECT_MODE};
pub use mime::{BuiltinMimeTable, DEFAULT_BINARY_TYPE, DEFAULT_TEXT_TYPE, MimeTable};
pub use object::{ObjectFile, ObjectStoreBackend};
pub use path::{DataUri, content_type, decode_data_uri, sanitize};
pub use transport::{
    Connector, ObjectBody, PutObject, S3Connector, S3Transport, TransportClient, parse_http_date,
};

/// Set up logging from `STOREFS_LOG`
pub fn init_logging() {
    diagnostics::init_diagnostics();
}

// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Deterministic stand-ins for the injected collaborators
//!
//! [`FixedClock`] always reports the same instant. [`MemoryTransport`]
//! keeps objects in a map and can be switched into a failing mode, which
//! makes backend behavior reproducible without a network.

use crate::clock::{Clock, SystemClock};
use crate::error::TransportError;
use crate::transport::{ObjectBody, PutObject, TransportClient};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

/// A clock stuck at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// An object held by [`MemoryTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
    pub last_modified: Option<DateTime<Utc>>,
}

/// In-memory object store keyed by (bucket, key)
pub struct MemoryTransport {
    objects: Mutex<BTreeMap<(String, String), StoredObject>>,
    failure: Mutex<Option<String>>,
    puts: Mutex<usize>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Stored objects get their last-modified time from `clock`
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            failure: Mutex::new(None),
            puts: Mutex::new(0),
            clock,
        }
    }

    /// A transport whose every request fails with `message`
    #[must_use]
    pub fn failing(message: &str) -> Self {
        let transport = Self::new();
        transport.fail_with(message);
        transport
    }

    /// Fail all following requests with `message`
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.to_string());
    }

    /// Seed an object without counting it as a put
    pub fn insert(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        last_modified: Option<DateTime<Utc>>,
    ) {
        let object = StoredObject {
            content_type: crate::path::content_type(key),
            body,
            last_modified,
        };
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((bucket.to_string(), key.to_string()), object);
    }

    #[must_use]
    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Number of put requests received, failed ones included
    #[must_use]
    pub fn put_count(&self) -> usize {
        *self.puts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_failure(&self) -> Result<(), TransportError> {
        match &*self.failure.lock().unwrap_or_else(PoisonError::into_inner) {
            Some(message) => Err(TransportError::Other(message.clone())),
            None => Ok(()),
        }
    }
}

impl TransportClient for MemoryTransport {
    fn put_object(&self, request: &PutObject<'_>) -> Result<(), TransportError> {
        *self.puts.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        self.check_failure()?;

        let object = StoredObject {
            body: request.body.to_vec(),
            content_type: request.content_type.to_string(),
            last_modified: Some(self.clock.now()),
        };
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((request.bucket.to_string(), request.key.to_string()), object);
        Ok(())
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody, TransportError> {
        self.check_failure()?;
        self.object(bucket, key)
            .map(|object| ObjectBody {
                body: object.body,
                last_modified: object.last_modified,
            })
            .ok_or_else(|| TransportError::NotFound {
                key: key.to_string(),
            })
    }
}

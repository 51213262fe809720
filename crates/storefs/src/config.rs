// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Backend configuration
//!
//! Configuration is plain serde data. A YAML document such as
//!
//! ```yaml
//! backend: s3
//! region: eu-west-1
//! bucket: media
//! ```
//!
//! or `backend: local` (with an optional `root`) selects and builds a
//! backend through [`StorageConfig::open`].

use crate::credentials::CredentialProvider;
use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::local::LocalDiskBackend;
use crate::object::ObjectStoreBackend;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const REGION_ENV: &str = "STOREFS_S3_REGION";
pub const BUCKET_ENV: &str = "STOREFS_S3_BUCKET";
pub const ENDPOINT_ENV: &str = "STOREFS_S3_ENDPOINT";

/// Object store location: one region, one bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStoreConfig {
    pub region: String,

    pub bucket: String,

    /// Custom endpoint for S3-compatible services (MinIO, R2, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl ObjectStoreConfig {
    pub fn new<R: Into<String>, B: Into<String>>(region: R, bucket: B) -> Self {
        Self {
            region: region.into(),
            bucket: bucket.into(),
            endpoint: None,
        }
    }

    #[must_use]
    pub fn with_endpoint<E: Into<String>>(mut self, endpoint: E) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(Error::config("region is required"));
        }
        if self.bucket.trim().is_empty() {
            return Err(Error::config("bucket is required"));
        }
        Ok(())
    }

    /// Custom endpoint without its trailing `/`
    fn custom_endpoint(&self) -> Option<String> {
        self.endpoint
            .as_deref()
            .map(|endpoint| endpoint.trim_end_matches('/').to_string())
    }

    /// Endpoint requests are sent to
    #[must_use]
    pub fn service_endpoint(&self) -> String {
        self.custom_endpoint()
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", self.region))
    }

    /// Public URL of the object stored at `key`
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        // Published URLs use the dash host form even though requests go to
        // the dotted regional endpoint.
        let base = self
            .custom_endpoint()
            .unwrap_or_else(|| format!("https://s3-{}.amazonaws.com", self.region));
        format!("{}/{}/{}", base, self.bucket, key.trim_start_matches('/'))
    }

    pub fn from_yaml_bytes(bytes: &[u8]) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_slice(bytes)
            .map_err(|e| Error::config(format!("invalid YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read `STOREFS_S3_REGION`, `STOREFS_S3_BUCKET` and the optional
    /// `STOREFS_S3_ENDPOINT`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            region: lookup(REGION_ENV).unwrap_or_default(),
            bucket: lookup(BUCKET_ENV).unwrap_or_default(),
            endpoint: lookup(ENDPOINT_ENV).filter(|e| !e.is_empty()),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Backend selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    Local {
        /// Root for relative paths, the working directory when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        root: Option<PathBuf>,
    },
    S3(ObjectStoreConfig),
}

impl StorageConfig {
    pub fn from_yaml_bytes(bytes: &[u8]) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_slice(bytes)
            .map_err(|e| Error::config(format!("invalid YAML: {}", e)))?;
        if let StorageConfig::S3(s3) = &config {
            s3.validate()?;
        }
        Ok(config)
    }

    /// Build the configured backend. The credential provider is only
    /// consulted for the S3 backend.
    pub fn open(&self, provider: &dyn CredentialProvider) -> Result<Box<dyn FileSystem>> {
        match self {
            StorageConfig::Local { root: None } => Ok(Box::new(LocalDiskBackend::new())),
            StorageConfig::Local { root: Some(root) } => {
                Ok(Box::new(LocalDiskBackend::with_root(root.clone())))
            }
            StorageConfig::S3(config) => Ok(Box::new(ObjectStoreBackend::new(
                config.clone(),
                provider,
            )?)),
        }
    }
}

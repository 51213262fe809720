// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Object storage transport
//!
//! [`TransportClient`] is the only thing the object store backend knows
//! about the network. A [`Connector`] turns configuration plus credentials
//! into a bound client once, at backend construction. [`S3Connector`]
//! produces clients built on the blocking `rust-s3` API.

use crate::config::ObjectStoreConfig;
use crate::credentials::Credentials;
use crate::error::TransportError;
use chrono::{DateTime, Utc};
use s3::bucket::Bucket;
use s3::region::Region;
use std::sync::Arc;

/// A single store request
#[derive(Debug, Clone, Copy)]
pub struct PutObject<'a> {
    pub bucket: &'a str,
    pub key: &'a str,
    pub body: &'a [u8],
    pub content_type: &'a str,
}

impl PutObject<'_> {
    #[must_use]
    pub fn content_length(&self) -> u64 {
        self.body.len() as u64
    }
}

/// A fully buffered object body
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectBody {
    pub body: Vec<u8>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Blocking request/response access to an object store.
///
/// Implementations are shared between threads and must tolerate
/// concurrent calls.
pub trait TransportClient: Send + Sync {
    fn put_object(&self, request: &PutObject<'_>) -> Result<(), TransportError>;
    fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody, TransportError>;
}

/// Establishes a session and returns a client bound to it
pub trait Connector: Send + Sync {
    fn connect(
        &self,
        config: &ObjectStoreConfig,
        credentials: Credentials,
    ) -> Result<Arc<dyn TransportClient>, TransportError>;
}

/// Connector for AWS S3 and S3-compatible services
#[derive(Debug, Default, Clone, Copy)]
pub struct S3Connector;

impl Connector for S3Connector {
    fn connect(
        &self,
        config: &ObjectStoreConfig,
        credentials: Credentials,
    ) -> Result<Arc<dyn TransportClient>, TransportError> {
        let s3_credentials = s3::creds::Credentials::new(
            Some(credentials.access_key.as_str()),
            Some(credentials.secret_key.as_str()),
            credentials.session_token.as_deref(),
            None,
            None,
        )
        .map_err(|e| TransportError::Session(e.to_string()))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.service_endpoint(),
        };

        Ok(Arc::new(S3Transport {
            region,
            credentials: s3_credentials,
            path_style: config.endpoint.is_some(),
        }))
    }
}

/// `rust-s3` backed transport. Bucket handles are cheap and built per call.
pub struct S3Transport {
    region: Region,
    credentials: s3::creds::Credentials,
    path_style: bool,
}

impl S3Transport {
    fn with_bucket<T>(
        &self,
        name: &str,
        f: impl FnOnce(&Bucket) -> Result<T, TransportError>,
    ) -> Result<T, TransportError> {
        let bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())?;
        let bucket = if self.path_style {
            bucket.with_path_style()
        } else {
            bucket
        };
        f(&bucket)
    }
}

impl TransportClient for S3Transport {
    fn put_object(&self, request: &PutObject<'_>) -> Result<(), TransportError> {
        self.with_bucket(request.bucket, |bucket| {
            let response = bucket.put_object_with_content_type(
                request.key,
                request.body,
                request.content_type,
            )?;
            TransportError::check_status(request.key, response.status_code())
        })
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody, TransportError> {
        self.with_bucket(bucket, |bucket| {
            let response = bucket.get_object(key)?;
            TransportError::check_status(key, response.status_code())?;

            let headers = response.headers();
            let last_modified = headers
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case("last-modified"))
                .and_then(|(_, value)| parse_http_date(value));

            Ok(ObjectBody {
                body: response.bytes().to_vec(),
                last_modified,
            })
        })
    }
}

/// Parse an HTTP `Last-Modified` value (RFC 2822 / IMF-fixdate)
#[must_use]
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_http_date() {
        let parsed = parse_http_date("Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap());
        assert_eq!(parse_http_date("yesterday"), None);
    }

    #[test]
    fn test_put_object_content_length() {
        let request = PutObject {
            bucket: "bucket",
            key: "some/file.jpg",
            body: b"some content",
            content_type: "image/jpeg",
        };
        assert_eq!(request.content_length(), 12);
    }

    #[test]
    fn test_s3_connector_builds_client_without_network() {
        let config = ObjectStoreConfig::new("us-west-2", "bucket");
        let credentials = Credentials::new("AKIDEXAMPLE", "secret");
        assert!(S3Connector.connect(&config, credentials).is_ok());
    }
}

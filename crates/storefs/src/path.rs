// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Storage path normalization and content helpers
//!
//! Every backend runs a path through [`sanitize`] and [`split`] before it
//! touches storage. [`content_type`] and [`decode_data_uri`] are pure
//! helpers for callers preparing content.

use crate::error::{Error, Result};
use crate::mime::{BuiltinMimeTable, DEFAULT_BINARY_TYPE, DEFAULT_TEXT_TYPE, MimeTable};
use base64::Engine;
use regex::Regex;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static whitespace pattern"));

static DATA_URI_PREFIX: LazyLock<regex::bytes::Regex> = LazyLock::new(|| {
    regex::bytes::Regex::new(r"^data:([^;,]+);base64,").expect("static data URI pattern")
});

/// Trim a path and collapse each inner whitespace run to a single `-`.
///
/// `sanitize(sanitize(p)) == sanitize(p)` for every input.
#[must_use]
pub fn sanitize(path: &str) -> String {
    WHITESPACE.replace_all(path.trim(), "-").into_owned()
}

/// A sanitized path split into the container that must exist and the file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPath {
    /// Parent directory, `.` when the path has no directory part
    pub container: PathBuf,
    /// Final component, always `<stem>.<extension>`
    pub file_name: String,
}

/// Split an already sanitized path into container and file name.
///
/// Fails with [`Error::PathFormat`] unless the final component has both a
/// non-empty stem and a non-empty extension.
pub fn split(path: &str) -> Result<SplitPath> {
    if path.is_empty() || path.ends_with('/') {
        return Err(Error::path_format(path));
    }

    let p = Path::new(path);
    let has_stem = p.file_stem().is_some_and(|s| !s.is_empty());
    let has_extension = p.extension().is_some_and(|e| !e.is_empty());
    let file_name = match p.file_name().and_then(|n| n.to_str()) {
        Some(name) if has_stem && has_extension => name.to_string(),
        _ => return Err(Error::path_format(path)),
    };

    let container = match p.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok(SplitPath {
        container,
        file_name,
    })
}

/// MIME type for a path, resolved from its trailing extension
#[must_use]
pub fn content_type(path: &str) -> String {
    content_type_with(&BuiltinMimeTable, path)
}

/// Like [`content_type`] with a caller supplied table
#[must_use]
pub fn content_type_with(table: &dyn MimeTable, path: &str) -> String {
    match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => table.lookup(ext).unwrap_or(DEFAULT_BINARY_TYPE).to_string(),
        _ => DEFAULT_TEXT_TYPE.to_string(),
    }
}

/// Content decoded from a `data:<mime>;base64,<payload>` URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub content: Vec<u8>,
    pub mime_type: String,
}

impl DataUri {
    /// A seekable reader over the decoded bytes, usable as a `put` source
    #[must_use]
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(&self.content)
    }
}

/// Decode a base64 data URI and extract its declared MIME type
pub fn decode_data_uri(input: &[u8]) -> Result<DataUri> {
    let captures = DATA_URI_PREFIX
        .captures(input)
        .ok_or_else(|| Error::InvalidDataUri("missing data:<type>;base64, prefix".to_string()))?;

    let mime_type = std::str::from_utf8(&captures[1])
        .map_err(|e| Error::InvalidDataUri(format!("mime type is not UTF-8: {}", e)))?
        .to_string();

    let payload = strip_data_uri_prefix(input).trim_ascii();
    let content = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| Error::InvalidDataUri(format!("invalid base64 payload: {}", e)))?;

    Ok(DataUri { content, mime_type })
}

/// The payload of a data URI with its `data:<type>;base64,` prefix removed.
///
/// Input without the prefix is returned unchanged.
#[must_use]
pub fn strip_data_uri_prefix(input: &[u8]) -> &[u8] {
    match DATA_URI_PREFIX.find(input) {
        Some(m) => &input[m.end()..],
        None => input,
    }
}

// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Extension to MIME type lookup

/// Returned when a path has no extension
pub const DEFAULT_TEXT_TYPE: &str = "text/plain";

/// Returned when an extension is not in the table
pub const DEFAULT_BINARY_TYPE: &str = "application/octet-stream";

/// A MIME database keyed by file extension (without the leading dot)
pub trait MimeTable: Send + Sync {
    fn lookup(&self, extension: &str) -> Option<&str>;
}

/// Static table of the common web and document types
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinMimeTable;

impl MimeTable for BuiltinMimeTable {
    fn lookup(&self, extension: &str) -> Option<&str> {
        let mime = match extension.to_ascii_lowercase().as_str() {
            "txt" | "text" | "log" => "text/plain",
            "md" | "markdown" => "text/markdown",
            "html" | "htm" => "text/html",
            "css" => "text/css",
            "csv" => "text/csv",
            "xml" => "text/xml",
            "js" | "mjs" => "text/javascript",
            "json" => "application/json",
            "yaml" | "yml" => "application/yaml",
            "pdf" => "application/pdf",
            "zip" => "application/zip",
            "gz" => "application/gzip",
            "tar" => "application/x-tar",
            "wasm" => "application/wasm",
            "parquet" => "application/vnd.apache.parquet",
            "png" => "image/png",
            "jpg" | "jpeg" | "jpe" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "svg" => "image/svg+xml",
            "ico" => "image/vnd.microsoft.icon",
            "bmp" => "image/bmp",
            "tif" | "tiff" => "image/tiff",
            "avif" => "image/avif",
            "mp3" => "audio/mpeg",
            "wav" => "audio/wav",
            "ogg" => "audio/ogg",
            "flac" => "audio/flac",
            "mp4" => "video/mp4",
            "webm" => "video/webm",
            "mov" => "video/quicktime",
            "woff" => "font/woff",
            "woff2" => "font/woff2",
            _ => return None,
        };
        Some(mime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(BuiltinMimeTable.lookup("jpg"), Some("image/jpeg"));
        assert_eq!(BuiltinMimeTable.lookup("JPG"), Some("image/jpeg"));
        assert_eq!(BuiltinMimeTable.lookup("Png"), Some("image/png"));
    }

    #[test]
    fn test_lookup_unknown() {
        assert_eq!(BuiltinMimeTable.lookup("nope"), None);
        assert_eq!(BuiltinMimeTable.lookup(""), None);
    }
}

//! Cache keys.

use std::fmt;

use crate::barcode::SanitizedCode;

/// Deterministic key for one rendered barcode.
///
/// The literal form `BARCODE-{code}-{width}x{height}.png`, with unspecified
/// dimensions rendered as empty strings, is both the cache file name and the
/// seed of the ETag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheFingerprint(String);

impl CacheFingerprint {
    pub fn new(code: &SanitizedCode, width: Option<u32>, height: Option<u32>) -> Self {
        Self(format!(
            "BARCODE-{}-{}x{}.png",
            code,
            dimension(width),
            dimension(height)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strong validator for this fingerprint: the quoted MD5 of the key.
    ///
    /// The hash covers the key, not the stored bytes. That holds because a
    /// key always renders to the same image.
    pub fn etag(&self) -> String {
        format!("\"{:x}\"", md5::compute(self.0.as_bytes()))
    }
}

impl fmt::Display for CacheFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheFingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn dimension(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

//! Locating the client's `If-None-Match` validator.
//!
//! Depending on how a request reaches us, headers arrive either as a parsed
//! [`HeaderMap`] or as flat transport metadata in the CGI style, where a
//! header such as `If-None-Match` appears as `HTTP_IF_NONE_MATCH`. Lookup
//! prefers the parsed form, then the exact transport field, then a scan of
//! every `HTTP_`-prefixed field with the name rebuilt.

use std::collections::{BTreeMap, HashMap};

use http::header::IF_NONE_MATCH;
use http::HeaderMap;

/// Prefix carried by header fields in transport metadata.
pub const TRANSPORT_HEADER_PREFIX: &str = "HTTP_";

/// Transport field normally carrying `If-None-Match`.
pub const TRANSPORT_IF_NONE_MATCH: &str = "HTTP_IF_NONE_MATCH";

/// Where request headers can be read from.
#[derive(Debug, Clone, Copy)]
pub enum ValidatorSource<'a> {
    /// Headers already parsed by the HTTP stack.
    Headers(&'a HeaderMap),

    /// Flat transport metadata such as CGI variables.
    Transport(&'a HashMap<String, String>),
}

impl ValidatorSource<'_> {
    /// The client's `If-None-Match` value, if it sent one.
    ///
    /// Parsed headers are authoritative when present: no transport fallback
    /// is attempted for them.
    pub fn if_none_match(&self) -> Option<String> {
        match self {
            ValidatorSource::Headers(headers) => headers
                .get(IF_NONE_MATCH)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            ValidatorSource::Transport(vars) => vars
                .get(TRANSPORT_IF_NONE_MATCH)
                .cloned()
                .or_else(|| {
                    reconstruct_headers(vars)
                        .get("If-None-Match")
                        .cloned()
                }),
        }
    }
}

/// Rebuild header names from transport metadata.
///
/// Every field starting with [`TRANSPORT_HEADER_PREFIX`] becomes a header:
/// the prefix is stripped and the underscore separated tokens are joined
/// with hyphens in title case, so `HTTP_IF_NONE_MATCH` becomes
/// `If-None-Match`.
pub fn reconstruct_headers(vars: &HashMap<String, String>) -> BTreeMap<String, String> {
    vars.iter()
        .filter_map(|(key, value)| {
            let name = key.strip_prefix(TRANSPORT_HEADER_PREFIX)?;
            Some((title_case(name), value.clone()))
        })
        .collect()
}

/// `IF_NONE_MATCH` -> `If-None-Match`
pub fn title_case(name: &str) -> String {
    name.split('_')
        .map(|token| {
            let lower = token.to_ascii_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

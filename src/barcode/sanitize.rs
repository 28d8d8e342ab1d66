//! Input normalization.
//!
//! Only `A-Z` and `0-9` survive: letters are uppercased first, everything
//! else is dropped. An input with nothing left is rejected outright.

use std::fmt;

use crate::error::RenderError;

/// A non-empty string of `[A-Z0-9]` characters.
///
/// The only way to obtain one is through [`sanitize`], so holders can rely on
/// the invariant without re-checking it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SanitizedCode(String);

impl SanitizedCode {
    /// The normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the code contains any of the given characters.
    pub fn contains_any(&self, chars: &[char]) -> bool {
        self.0.chars().any(|c| chars.contains(&c))
    }
}

impl fmt::Display for SanitizedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SanitizedCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize raw input into an encodable code.
///
/// # Errors
///
/// Returns [`RenderError::EmptyCode`] when no character of `raw` is an ASCII
/// letter or digit.
pub fn sanitize(raw: &str) -> Result<SanitizedCode, RenderError> {
    let code: String = raw
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect();

    if code.is_empty() {
        return Err(RenderError::EmptyCode);
    }

    Ok(SanitizedCode(code))
}

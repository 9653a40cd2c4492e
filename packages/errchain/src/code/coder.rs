//! Error code descriptors

use serde::Serialize;
use std::fmt;

/// Code reserved for the built-in unknown coder
pub const UNKNOWN_CODE: i32 = 0;

const UNKNOWN_STATUS: u16 = 500;
const UNKNOWN_TEXT: &str = "An internal server error occurred";

/// Metadata attached to a numeric error code
///
/// A coder maps a business error code onto what an external caller is allowed
/// to see: an HTTP status, a safe message and a reference to documentation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Coder {
    code: i32,
    http_status: u16,
    external_text: String,
    reference: String,
}

impl Coder {
    /// Describe a code
    pub fn new(
        code: i32,
        http_status: u16,
        external_text: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            code,
            http_status,
            external_text: external_text.into(),
            reference: reference.into(),
        }
    }

    /// The coder every unregistered code falls back to
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_CODE, UNKNOWN_STATUS, UNKNOWN_TEXT, "")
    }

    /// The numeric code
    #[must_use]
    pub fn code(&self) -> i32 {
        self.code
    }

    /// HTTP status for this code, 500 when none was declared
    #[must_use]
    pub fn http_status(&self) -> u16 {
        if self.http_status == 0 {
            UNKNOWN_STATUS
        } else {
            self.http_status
        }
    }

    /// Message safe to show to external callers
    #[must_use]
    pub fn external_text(&self) -> &str {
        &self.external_text
    }

    /// Documentation reference for this code
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Whether this is the reserved unknown coder
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.code == UNKNOWN_CODE
    }
}

impl fmt::Display for Coder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.external_text)
    }
}

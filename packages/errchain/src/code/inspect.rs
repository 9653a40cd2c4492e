//! Code classification of error chains

use super::coder::Coder;
use super::registry::{registry, CodeRegistry};
use crate::error::Error;
use std::sync::Arc;

impl CodeRegistry {
    /// Resolve the coder of an error against this registry
    ///
    /// The outermost coded link of the chain decides; an error without any
    /// coded link resolves to the unknown coder. No error yields `None`.
    pub fn parse_coder<'a>(&self, err: impl Into<Option<&'a Error>>) -> Option<Arc<Coder>> {
        let err = err.into()?;
        let coder = match err.chain().find_map(Error::code) {
            Some(code) => self.lookup(code),
            None => self.unknown(),
        };
        Some(coder)
    }
}

/// Resolve the coder of an error against the process-wide registry
///
/// See [`CodeRegistry::parse_coder`].
pub fn parse_coder<'a>(err: impl Into<Option<&'a Error>>) -> Option<Arc<Coder>> {
    registry().parse_coder(err)
}

/// Whether a coded link of `err` carries `code`
///
/// Only consecutive coded links are followed: the walk stops at the first
/// link that carries no code, even if a coded link sits further down. Use
/// [`crate::is`] to match through every kind of link.
pub fn is_code<'a>(err: impl Into<Option<&'a Error>>, code: i32) -> bool {
    let mut current = err.into();
    while let Some(link) = current {
        match link.code() {
            Some(found) if found == code => return true,
            Some(_) => current = link.cause(),
            None => return false,
        }
    }
    false
}

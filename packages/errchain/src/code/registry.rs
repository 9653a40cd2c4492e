//! Process-wide registry of error codes
//!
//! Writers take a single lock, copy the current map, insert and publish the
//! new map atomically. Readers load the published map without locking, so a
//! lookup racing a registration sees either the old or the new map, never a
//! half-built entry.

use super::coder::{Coder, UNKNOWN_CODE};
use arc_swap::ArcSwap;
use log::debug;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

type CodeMap = HashMap<i32, Arc<Coder>>;

static REGISTRY: Lazy<CodeRegistry> = Lazy::new(CodeRegistry::new);

/// Registration misuse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Code `0` belongs to the unknown coder
    #[error("code `0` is reserved as the unknown error code")]
    ReservedCode,

    /// The code was registered before
    #[error("code {code} is already registered")]
    DuplicateCode {
        /// The conflicting code
        code: i32,
    },
}

/// Mapping from error code to [`Coder`]
#[derive(Debug)]
pub struct CodeRegistry {
    codes: ArcSwap<CodeMap>,
    writer: Mutex<()>,
    unknown: Arc<Coder>,
}

impl Default for CodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeRegistry {
    /// Create a registry holding only the unknown coder
    #[must_use]
    pub fn new() -> Self {
        let unknown = Arc::new(Coder::unknown());
        let mut codes = CodeMap::new();
        codes.insert(UNKNOWN_CODE, Arc::clone(&unknown));
        Self {
            codes: ArcSwap::from_pointee(codes),
            writer: Mutex::new(()),
            unknown,
        }
    }

    /// Register a coder, replacing any coder already holding its code
    ///
    /// Returns the replaced coder, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ReservedCode`] for code `0`.
    pub fn try_register(&self, coder: Coder) -> Result<Option<Arc<Coder>>, RegistryError> {
        if coder.code() == UNKNOWN_CODE {
            return Err(RegistryError::ReservedCode);
        }
        self.publish(coder, false)
    }

    /// Register a coder whose code must not be registered yet
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ReservedCode`] for code `0` and
    /// [`RegistryError::DuplicateCode`] when the code is taken.
    pub fn try_must_register(&self, coder: Coder) -> Result<(), RegistryError> {
        if coder.code() == UNKNOWN_CODE {
            return Err(RegistryError::ReservedCode);
        }
        self.publish(coder, true).map(|_| ())
    }

    /// Register a coder, replacing any coder already holding its code
    ///
    /// # Panics
    ///
    /// Panics when the coder uses the reserved code `0`.
    #[track_caller]
    pub fn register(&self, coder: Coder) {
        if let Err(e) = self.try_register(coder) {
            panic!("{e}");
        }
    }

    /// Register a coder whose code must not be registered yet
    ///
    /// # Panics
    ///
    /// Panics on the reserved code `0` and on a code registered before.
    #[track_caller]
    pub fn must_register(&self, coder: Coder) {
        if let Err(e) = self.try_must_register(coder) {
            panic!("{e}");
        }
    }

    fn publish(&self, coder: Coder, exclusive: bool) -> Result<Option<Arc<Coder>>, RegistryError> {
        // The guarded map is replaced wholesale, so a poisoned lock left nothing half written.
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let code = coder.code();
        let current = self.codes.load();
        if exclusive && current.contains_key(&code) {
            return Err(RegistryError::DuplicateCode { code });
        }

        let mut next = (**current).clone();
        let previous = next.insert(code, Arc::new(coder));
        self.codes.store(Arc::new(next));

        if previous.is_some() {
            debug!("Replaced coder for error code {code}");
        } else {
            debug!("Registered error code {code}");
        }
        Ok(previous)
    }

    /// The coder registered for `code`, if any
    #[must_use]
    pub fn get(&self, code: i32) -> Option<Arc<Coder>> {
        self.codes.load().get(&code).cloned()
    }

    /// The coder registered for `code`, or the unknown coder
    #[must_use]
    pub fn lookup(&self, code: i32) -> Arc<Coder> {
        self.get(code).unwrap_or_else(|| self.unknown())
    }

    /// Whether `code` has a coder
    #[must_use]
    pub fn contains(&self, code: i32) -> bool {
        self.codes.load().contains_key(&code)
    }

    /// The reserved unknown coder
    #[must_use]
    pub fn unknown(&self) -> Arc<Coder> {
        Arc::clone(&self.unknown)
    }

    /// All registered codes in ascending order, including `0`
    #[must_use]
    pub fn codes(&self) -> Vec<i32> {
        let mut codes: Vec<i32> = self.codes.load().keys().copied().collect();
        codes.sort_unstable();
        codes
    }
}

/// The process-wide registry
pub fn registry() -> &'static CodeRegistry {
    &REGISTRY
}

/// Register a coder in the process-wide registry, replacing any previous one
///
/// # Panics
///
/// Panics when the coder uses the reserved code `0`.
#[track_caller]
pub fn register(coder: Coder) {
    registry().register(coder);
}

/// Register a coder in the process-wide registry exactly once
///
/// # Panics
///
/// Panics on the reserved code `0` and on a code registered before.
#[track_caller]
pub fn must_register(coder: Coder) {
    registry().must_register(coder);
}

/// Fallible form of [`register`]
///
/// # Errors
///
/// See [`CodeRegistry::try_register`].
pub fn try_register(coder: Coder) -> Result<Option<Arc<Coder>>, RegistryError> {
    registry().try_register(coder)
}

/// Fallible form of [`must_register`]
///
/// # Errors
///
/// See [`CodeRegistry::try_must_register`].
pub fn try_must_register(coder: Coder) -> Result<(), RegistryError> {
    registry().try_must_register(coder)
}

/// Look up `code` in the process-wide registry, falling back to unknown
pub fn lookup(code: i32) -> Arc<Coder> {
    registry().lookup(code)
}

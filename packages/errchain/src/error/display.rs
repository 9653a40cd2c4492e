//! Display and trait implementations for Error

use super::types::{Error, Repr};
use crate::code::registry;
use crate::format::{plain_text, Flags, Renderer};
use std::error::Error as StdError;
use std::fmt;
use std::ops::Deref;

impl fmt::Display for Error {
    /// Plain text by default; `{:-}` adds detail, `{:+}` renders the whole
    /// trace and `{:#}` switches to JSON records
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = Flags::from_formatter(f);
        if flags.is_plain() {
            return fmt::Display::fmt(&*self.inner, f);
        }
        f.write_str(&Renderer::new(flags).render(self))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Renderer::new(Flags::TRACE).text(self))?;

        if f.alternate() {
            let origin = self
                .chain()
                .filter_map(Error::stack)
                .filter(|stack| !stack.is_empty())
                .last();
            if let Some(stack) = origin {
                write!(f, "\n\nStack backtrace:{stack:#}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repr::Foreign(error) => fmt::Display::fmt(error, f),
            Repr::Aggregate(aggregate) => fmt::Display::fmt(aggregate, f),
            Repr::Link(_) => f.write_str(&plain_text(self, registry())),
        }
    }
}

impl StdError for Repr {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Repr::Link(link) => link
                .cause()
                .map(|cause| &*cause.inner as &(dyn StdError + 'static)),
            Repr::Foreign(error) => error.source(),
            Repr::Aggregate(_) => None,
        }
    }
}

impl Deref for Error {
    type Target = dyn StdError + Send + Sync + 'static;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl AsRef<dyn StdError + Send + Sync + 'static> for Error {
    fn as_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.inner
    }
}

impl AsRef<dyn StdError + 'static> for Error {
    fn as_ref(&self) -> &(dyn StdError + 'static) {
        &*self.inner
    }
}

/// Owned std error handed out by the `Box` conversions
struct Boxed(Error);

impl fmt::Debug for Boxed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Boxed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for Boxed {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.inner.source()
    }
}

impl From<Error> for Box<dyn StdError + Send + Sync + 'static> {
    fn from(error: Error) -> Self {
        Box::new(Boxed(error))
    }
}

impl From<Error> for Box<dyn StdError + 'static> {
    fn from(error: Error) -> Self {
        Box::new(Boxed(error))
    }
}

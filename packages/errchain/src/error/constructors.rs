//! Error constructors and annotation
//!
//! Every entry point that records a stack captures it in its own body with a
//! skip of one, so the entry point itself never shows up as the innermost
//! frame. They are kept out of line for the same reason.

use super::types::{Error, Link, Repr};
use crate::aggregate::Aggregate;
use crate::stack::StackCapture;
use std::sync::Arc;

impl Error {
    pub(crate) fn from_link(link: Link) -> Self {
        Self {
            inner: Arc::new(Repr::Link(link)),
        }
    }

    /// Create a leaf error from a message
    #[inline(never)]
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        let stack = StackCapture::capture(1);
        Self::fundamental(message.into(), stack)
    }

    /// Create a coded leaf error
    ///
    /// `message` is internal text; external callers see the text of the
    /// coder registered for `code`.
    #[inline(never)]
    #[must_use]
    pub fn with_code(code: i32, message: impl Into<String>) -> Self {
        let stack = StackCapture::capture(1);
        Self::coded_leaf(code, message.into(), stack)
    }

    /// Wrap a boxed foreign error
    #[must_use]
    pub fn from_boxed(error: Box<dyn std::error::Error + Send + Sync + 'static>) -> Self {
        Self {
            inner: Arc::new(Repr::Foreign(error)),
        }
    }

    /// Record the current stack on top of this error
    ///
    /// A coded error is re-stacked as a new coded link with the same code and
    /// text instead of being wrapped in a plain stack link.
    #[inline(never)]
    #[must_use]
    pub fn with_stack(self) -> Self {
        let stack = StackCapture::capture(1);
        self.restacked(stack)
    }

    /// Annotate this error with a message, without capturing a stack
    #[must_use]
    pub fn with_message(self, message: impl Into<String>) -> Self {
        Self::from_link(Link::WithMessage {
            cause: self,
            message: message.into(),
        })
    }

    /// Annotate this error with a message and the current stack
    ///
    /// A coded error gains one coded link that keeps its code and carries
    /// `message` as text. Any other error gains two links: the message, then
    /// the stack on top of it.
    #[inline(never)]
    #[must_use]
    pub fn wrap(self, message: impl Into<String>) -> Self {
        let stack = StackCapture::capture(1);
        self.wrapped(message.into(), stack)
    }

    /// Attach a code to this error, keeping it as the cause
    #[inline(never)]
    #[must_use]
    pub fn wrap_c(self, code: i32, message: impl Into<String>) -> Self {
        let stack = StackCapture::capture(1);
        self.coded(code, message.into(), stack)
    }

    pub(crate) fn fundamental(message: String, stack: StackCapture) -> Self {
        Self::from_link(Link::Fundamental { message, stack })
    }

    pub(crate) fn coded_leaf(code: i32, text: String, stack: StackCapture) -> Self {
        Self::from_link(Link::WithCode {
            text,
            code,
            cause: None,
            stack,
        })
    }

    pub(crate) fn restacked(self, stack: StackCapture) -> Self {
        let recoded = match self.link() {
            Some(Link::WithCode { text, code, .. }) => Some((text.clone(), *code)),
            _ => None,
        };
        match recoded {
            Some((text, code)) => Self::from_link(Link::WithCode {
                text,
                code,
                cause: Some(self),
                stack,
            }),
            None => Self::from_link(Link::WithStack { cause: self, stack }),
        }
    }

    pub(crate) fn wrapped(self, message: String, stack: StackCapture) -> Self {
        match self.code() {
            Some(code) => Self::from_link(Link::WithCode {
                text: message,
                code,
                cause: Some(self),
                stack,
            }),
            None => Self::from_link(Link::WithStack {
                cause: self.with_message(message),
                stack,
            }),
        }
    }

    pub(crate) fn coded(self, code: i32, message: String, stack: StackCapture) -> Self {
        Self::from_link(Link::WithCode {
            text: message,
            code,
            cause: Some(self),
            stack,
        })
    }
}

impl<E> From<E> for Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self {
            inner: Arc::new(Repr::Foreign(Box::new(error))),
        }
    }
}

impl From<Aggregate> for Error {
    fn from(aggregate: Aggregate) -> Self {
        Self {
            inner: Arc::new(Repr::Aggregate(aggregate)),
        }
    }
}

/// Record the current stack on top of an error, if there is one
///
/// See [`Error::with_stack`].
#[inline(never)]
pub fn with_stack<E: Into<Error>>(err: Option<E>) -> Option<Error> {
    let err: Error = err?.into();
    let stack = StackCapture::capture(1);
    Some(err.restacked(stack))
}

/// Annotate an error with a message, if there is one
///
/// See [`Error::with_message`].
pub fn with_message<E: Into<Error>>(err: Option<E>, message: impl Into<String>) -> Option<Error> {
    let err: Error = err?.into();
    Some(err.with_message(message))
}

/// Annotate an error with a message and the current stack, if there is one
///
/// See [`Error::wrap`].
#[inline(never)]
pub fn wrap<E: Into<Error>>(err: Option<E>, message: impl Into<String>) -> Option<Error> {
    let err: Error = err?.into();
    let stack = StackCapture::capture(1);
    Some(err.wrapped(message.into(), stack))
}

/// Attach a code to an error, if there is one
///
/// See [`Error::wrap_c`].
#[inline(never)]
pub fn wrap_c<E: Into<Error>>(
    err: Option<E>,
    code: i32,
    message: impl Into<String>,
) -> Option<Error> {
    let err: Error = err?.into();
    let stack = StackCapture::capture(1);
    Some(err.coded(code, message.into(), stack))
}

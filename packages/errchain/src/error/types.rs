//! Core error types and definitions

use crate::aggregate::Aggregate;
use crate::stack::StackCapture;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Stands in for a cause detached while a chain is dropped
static DETACHED: Lazy<Arc<Repr>> = Lazy::new(|| {
    Arc::new(Repr::Link(Link::Fundamental {
        message: String::new(),
        stack: StackCapture::default(),
    }))
});

/// Error value carrying an annotated cause chain
///
/// Cloning is cheap and clones share identity, see [`Error::ptr_eq`].
#[derive(Clone)]
pub struct Error {
    /// The shared representation
    pub(crate) inner: Arc<Repr>,
}

/// Everything an [`Error`] can stand for
#[derive(Debug)]
pub(crate) enum Repr {
    /// One of the four chainable links
    Link(Link),
    /// A non-chain error, ends the chain
    Foreign(Box<dyn std::error::Error + Send + Sync + 'static>),
    /// Several errors reported as one
    Aggregate(Aggregate),
}

impl Repr {
    /// Take the cause out of this link, leaving a shared placeholder behind
    fn detach_cause(&mut self) -> Option<Error> {
        let placeholder = || Error {
            inner: Arc::clone(&DETACHED),
        };
        match self {
            Repr::Link(Link::WithStack { cause, .. } | Link::WithMessage { cause, .. }) => {
                Some(std::mem::replace(cause, placeholder()))
            }
            Repr::Link(Link::WithCode { cause, .. }) => cause.take(),
            Repr::Link(Link::Fundamental { .. }) | Repr::Foreign(_) | Repr::Aggregate(_) => None,
        }
    }
}

impl Drop for Repr {
    // Unlinks the chain one cause at a time, stopping at a shared link.
    fn drop(&mut self) {
        let mut next = self.detach_cause();
        while let Some(mut err) = next {
            next = Arc::get_mut(&mut err.inner).and_then(Repr::detach_cause);
        }
    }
}

/// A chain link
#[derive(Debug)]
pub(crate) enum Link {
    /// Leaf with its own message
    Fundamental {
        message: String,
        stack: StackCapture,
    },
    /// Stack annotation over a cause
    WithStack { cause: Error, stack: StackCapture },
    /// Message annotation over a cause, without a stack
    WithMessage { cause: Error, message: String },
    /// Code annotation, optionally over a cause
    WithCode {
        text: String,
        code: i32,
        cause: Option<Error>,
        stack: StackCapture,
    },
}

/// Discriminant of a chain link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Leaf created from a message
    Fundamental,
    /// Stack annotation
    WithStack,
    /// Message annotation
    WithMessage,
    /// Code annotation
    WithCode,
}

impl Link {
    pub(crate) fn kind(&self) -> LinkKind {
        match self {
            Link::Fundamental { .. } => LinkKind::Fundamental,
            Link::WithStack { .. } => LinkKind::WithStack,
            Link::WithMessage { .. } => LinkKind::WithMessage,
            Link::WithCode { .. } => LinkKind::WithCode,
        }
    }

    pub(crate) fn cause(&self) -> Option<&Error> {
        match self {
            Link::Fundamental { .. } => None,
            Link::WithStack { cause, .. } | Link::WithMessage { cause, .. } => Some(cause),
            Link::WithCode { cause, .. } => cause.as_ref(),
        }
    }

    pub(crate) fn stack(&self) -> Option<&StackCapture> {
        match self {
            Link::Fundamental { stack, .. }
            | Link::WithStack { stack, .. }
            | Link::WithCode { stack, .. } => Some(stack),
            Link::WithMessage { .. } => None,
        }
    }
}

/// Result type alias using our Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Walking and inspecting a cause chain

use super::types::{Error, Link, LinkKind, Repr};
use crate::aggregate::Aggregate;
use crate::stack::StackCapture;
use std::error::Error as StdError;
use std::iter::FusedIterator;
use std::sync::Arc;

impl Error {
    pub(crate) fn link(&self) -> Option<&Link> {
        match &*self.inner {
            Repr::Link(link) => Some(link),
            Repr::Foreign(_) | Repr::Aggregate(_) => None,
        }
    }

    /// The immediate cause, `None` for leaves, foreign errors and aggregates
    #[must_use]
    pub fn cause(&self) -> Option<&Error> {
        self.link().and_then(Link::cause)
    }

    /// This error followed by its causes, outermost first
    #[must_use]
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// The innermost error of the chain
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        while let Some(cause) = current.cause() {
            current = cause;
        }
        current
    }

    /// The kind of this link, `None` for foreign errors and aggregates
    #[must_use]
    pub fn kind(&self) -> Option<LinkKind> {
        self.link().map(Link::kind)
    }

    /// The code of this link, when it is a coded link
    #[must_use]
    pub fn code(&self) -> Option<i32> {
        match self.link() {
            Some(Link::WithCode { code, .. }) => Some(*code),
            _ => None,
        }
    }

    /// The stack recorded by this link
    #[must_use]
    pub fn stack(&self) -> Option<&StackCapture> {
        self.link().and_then(Link::stack)
    }

    /// The internal text carried by this link itself
    ///
    /// Stack links, foreign errors and aggregates carry none.
    #[must_use]
    pub fn raw_message(&self) -> Option<&str> {
        match self.link()? {
            Link::Fundamental { message, .. } | Link::WithMessage { message, .. } => Some(message),
            Link::WithCode { text, .. } => Some(text),
            Link::WithStack { .. } => None,
        }
    }

    /// The wrapped foreign error, when this is one
    #[must_use]
    pub fn foreign(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match &*self.inner {
            Repr::Foreign(error) => Some(error.as_ref()),
            Repr::Link(_) | Repr::Aggregate(_) => None,
        }
    }

    /// The aggregate, when this error is one
    #[must_use]
    pub fn aggregate(&self) -> Option<&Aggregate> {
        match &*self.inner {
            Repr::Aggregate(aggregate) => Some(aggregate),
            Repr::Link(_) | Repr::Foreign(_) => None,
        }
    }

    /// The errors contained in an aggregate, shallow
    #[must_use]
    pub fn errors(&self) -> Option<&[Error]> {
        self.aggregate().map(Aggregate::errors)
    }

    /// Whether both handles point to the same error
    #[must_use]
    pub fn ptr_eq(&self, other: &Error) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether `target` is part of this chain, see [`is`]
    #[must_use]
    pub fn is(&self, target: &Error) -> bool {
        is(self, target)
    }

    /// Whether a coded link of this chain carries `code`, see [`crate::is_code`]
    #[must_use]
    pub fn is_code(&self, code: i32) -> bool {
        crate::code::is_code(self, code)
    }

    /// The first foreign error of type `T` in this chain, see [`extract`]
    #[must_use]
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        extract(self)
    }
}

/// Iterator over an error and its causes
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a Error>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Error;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.cause();
        Some(current)
    }
}

impl FusedIterator for Chain<'_> {}

/// Whether `target` appears in the chain of `err`
///
/// A link matches when it is the same error as `target` (clones share
/// identity) or when it is an aggregate containing `target`.
#[must_use]
pub fn is(err: &Error, target: &Error) -> bool {
    err.chain().any(|link| {
        link.ptr_eq(target) || link.aggregate().is_some_and(|aggregate| aggregate.is(target))
    })
}

/// The first foreign error of type `T` in the chain of `err`
///
/// Foreign errors are searched through their own `source` chain as well.
#[must_use]
pub fn extract<T: StdError + 'static>(err: &Error) -> Option<&T> {
    err.chain().find_map(|link| {
        let mut current: Option<&(dyn StdError + 'static)> = match link.foreign() {
            Some(foreign) => Some(foreign),
            None => return None,
        };
        while let Some(error) = current {
            if let Some(found) = error.downcast_ref::<T>() {
                return Some(found);
            }
            current = error.source();
        }
        None
    })
}

//! Annotation helpers on `Result` and `Option`
//!
//! `Ok` values pass through untouched, which is what makes annotating an
//! absent error a no-op.

use super::types::{Error, Result};
use crate::stack::StackCapture;

/// Annotate the error side of a `Result`
pub trait ResultExt<T> {
    /// See [`Error::with_stack`]
    fn with_stack(self) -> Result<T>;

    /// See [`Error::with_message`]
    fn with_message<M: Into<String>>(self, message: M) -> Result<T>;

    /// See [`Error::wrap`]
    fn wrap<M: Into<String>>(self, message: M) -> Result<T>;

    /// Like [`ResultExt::wrap`], building the message only on error
    fn wrap_with<M, F>(self, message: F) -> Result<T>
    where
        M: Into<String>,
        F: FnOnce() -> M;

    /// See [`Error::wrap_c`]
    fn wrap_c<M: Into<String>>(self, code: i32, message: M) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    #[inline(never)]
    fn with_stack(self) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(error) => {
                let error: Error = error.into();
                let stack = StackCapture::capture(1);
                Err(error.restacked(stack))
            }
        }
    }

    fn with_message<M: Into<String>>(self, message: M) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(error) => {
                let error: Error = error.into();
                Err(error.with_message(message))
            }
        }
    }

    #[inline(never)]
    fn wrap<M: Into<String>>(self, message: M) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(error) => {
                let error: Error = error.into();
                let stack = StackCapture::capture(1);
                Err(error.wrapped(message.into(), stack))
            }
        }
    }

    #[inline(never)]
    fn wrap_with<M, F>(self, message: F) -> Result<T>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => {
                let error: Error = error.into();
                let stack = StackCapture::capture(1);
                Err(error.wrapped(message().into(), stack))
            }
        }
    }

    #[inline(never)]
    fn wrap_c<M: Into<String>>(self, code: i32, message: M) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(error) => {
                let error: Error = error.into();
                let stack = StackCapture::capture(1);
                Err(error.coded(code, message.into(), stack))
            }
        }
    }
}

/// Turn a missing value into an error
pub trait OptionExt<T> {
    /// `None` becomes a leaf error, see [`Error::new`]
    fn ok_or_error<M: Into<String>>(self, message: M) -> Result<T>;

    /// `None` becomes a coded leaf error, see [`Error::with_code`]
    fn ok_or_code<M: Into<String>>(self, code: i32, message: M) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    #[inline(never)]
    fn ok_or_error<M: Into<String>>(self, message: M) -> Result<T> {
        match self {
            Some(value) => Ok(value),
            None => {
                let stack = StackCapture::capture(1);
                Err(Error::fundamental(message.into(), stack))
            }
        }
    }

    #[inline(never)]
    fn ok_or_code<M: Into<String>>(self, code: i32, message: M) -> Result<T> {
        match self {
            Some(value) => Ok(value),
            None => {
                let stack = StackCapture::capture(1);
                Err(Error::coded_leaf(code, message.into(), stack))
            }
        }
    }
}

//! Error chains with captured stacks, registered codes and flag-driven rendering
//!
//! This crate provides:
//! - Error chaining where every annotation is a new immutable link
//! - Stack capture with lazy symbol resolution
//! - A process-wide registry mapping business error codes to HTTP status,
//!   external text and documentation
//! - Rendering of a chain as plain text, detailed trace or JSON records
//! - Aggregation of several errors into one, with filtering
//!
//! ```
//! use errchain::{Coder, Error, Flags, ResultExt};
//!
//! const ERR_PAYMENT_DECLINED: i32 = 120_004;
//! errchain::register(Coder::new(ERR_PAYMENT_DECLINED, 402, "Payment declined", ""));
//!
//! fn charge() -> errchain::Result<()> {
//!     Err(Error::with_code(ERR_PAYMENT_DECLINED, "gateway answered 05"))
//! }
//!
//! let err = charge().wrap("checkout").unwrap_err();
//! // External callers see the coder text; logs get the whole story.
//! assert_eq!(err.to_string(), "Payment declined");
//! assert!(errchain::is_code(&err, ERR_PAYMENT_DECLINED));
//! assert!(err.render(Flags::TRACE).contains("gateway answered 05"));
//! ```

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod code;
pub mod config;
pub mod error;
pub mod format;
pub mod stack;

pub use aggregate::{filter_out, new_aggregate, Aggregate, Matcher};
pub use code::{
    is_code, lookup, must_register, parse_coder, register, registry, try_must_register,
    try_register, CodeRegistry, Coder, RegistryError, UNKNOWN_CODE,
};
pub use error::{
    extract, is, with_message, with_stack, wrap, wrap_c, Chain, Error, LinkKind, OptionExt,
    Result, ResultExt,
};
pub use format::{Flags, Record, Renderer};
pub use stack::{func_name_short, Frame, FrameInfo, StackCapture};

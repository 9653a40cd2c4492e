//! Error chains
//!
//! An [`Error`] is either one of four chain links, a foreign error that ends
//! the chain, or an aggregate of several errors:
//! - a fundamental leaf holds a message and the stack of its creation
//! - a stack link records where an existing error passed by
//! - a message link adds text without the cost of a stack
//! - a coded link attaches a registered error code, with or without a cause
//!
//! Links are immutable. Annotating an error always builds a new outer link,
//! and annotating no error yields no error.

pub mod chain;
pub mod constructors;
pub mod display;
pub mod extensions;
pub mod macros;
pub mod types;

pub use chain::{extract, is, Chain};
pub use constructors::{with_message, with_stack, wrap, wrap_c};
pub use extensions::{OptionExt, ResultExt};
pub use types::{Error, LinkKind, Result};

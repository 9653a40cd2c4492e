//! Rendering of error chains
//!
//! ```
//! use errchain::{Error, Flags};
//!
//! let err = Error::new("disk full").wrap("saving profile");
//! assert_eq!(err.to_string(), "saving profile");
//! assert_eq!(err.render(Flags::PLAIN), "saving profile");
//!
//! // One entry per link, innermost numbered #0
//! let trace = format!("{err:+}");
//! assert!(trace.starts_with("saving profile - #2 ["));
//! assert!(trace.contains("; disk full - #0 ["));
//! ```

pub(crate) mod info;
pub mod render;

pub(crate) use info::plain_text;
pub use render::{Flags, Record, Renderer};

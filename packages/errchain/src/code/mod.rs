//! Error codes
//!
//! Feature modules declare their codes once, typically at startup, and the
//! renderer consults the registry whenever it meets a coded link:
//!
//! ```
//! use errchain::{Coder, Error};
//!
//! errchain::register(Coder::new(110001, 404, "User not found", "https://example.com/errors/110001"));
//!
//! let err = Error::with_code(110001, "no row for user 7");
//! assert_eq!(err.to_string(), "User not found");
//! assert_eq!(errchain::parse_coder(&err).map(|c| c.http_status()), Some(404));
//! ```

pub mod coder;
pub mod inspect;
pub mod registry;

pub use coder::{Coder, UNKNOWN_CODE};
pub use inspect::{is_code, parse_coder};
pub use registry::{
    lookup, must_register, register, registry, try_must_register, try_register, CodeRegistry,
    RegistryError,
};

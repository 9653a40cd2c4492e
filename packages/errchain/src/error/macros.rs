//! Formatting shorthands for error creation and annotation

/// Create a leaf error from a format string
///
/// `errorf!("user {} not found", id)` is `Error::new(format!(..))`.
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)*) => {
        $crate::Error::new(::std::format!($($arg)*))
    };
}

/// Create a coded leaf error from a format string
#[macro_export]
macro_rules! with_code {
    ($code:expr, $($arg:tt)*) => {
        $crate::Error::with_code($code, ::std::format!($($arg)*))
    };
}

/// Annotate an optional error with a formatted message
#[macro_export]
macro_rules! with_messagef {
    ($err:expr, $($arg:tt)*) => {
        $crate::with_message($err, ::std::format!($($arg)*))
    };
}

/// Annotate an optional error with a formatted message and the current stack
#[macro_export]
macro_rules! wrapf {
    ($err:expr, $($arg:tt)*) => {
        $crate::wrap($err, ::std::format!($($arg)*))
    };
}

/// Attach a code and a formatted message to an optional error
#[macro_export]
macro_rules! wrap_c {
    ($err:expr, $code:expr, $($arg:tt)*) => {
        $crate::wrap_c($err, $code, ::std::format!($($arg)*))
    };
}

/// Return early with a leaf error built from a format string
#[doc(hidden)]
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return ::std::result::Result::Err($crate::errorf!($($arg)*).into())
    };
}

/// Return early with a leaf error unless the condition holds
#[doc(hidden)]
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::bail!($($arg)*);
        }
    };
}

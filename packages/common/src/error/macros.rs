//! Error macros that record where the error was raised
//!
//! The message is a format string with arguments; the call site is appended
//! as ` at file:line`.

/// Build an error of the given kind with a located message
#[macro_export]
macro_rules! err {
    ($kind:ident) => {
        $crate::error::Error::$kind().located(::std::format_args!(""), file!(), line!())
    };
    ($kind:ident, $($msg:tt)+) => {
        $crate::error::Error::$kind().located(::std::format_args!($($msg)+), file!(), line!())
    };
}

/// Return early with a located error
#[macro_export]
macro_rules! bail {
    ($kind:ident $(, $($msg:tt)+)?) => {
        return ::std::result::Result::Err($crate::err!($kind $(, $($msg)+)?))
    };
}

/// Return a located error unless the condition holds
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $kind:ident $(, $($msg:tt)+)?) => {
        if !($cond) {
            $crate::bail!($kind $(, $($msg)+)?);
        }
    };
}

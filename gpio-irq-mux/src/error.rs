// SPDX-License-Identifier: MPL-2.0

//! The error types used in this crate.

use core::fmt;

/// The error types used in this crate.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Errno {
    /// Every shared line in the pool is in use.
    ResourceExhausted,
    /// The pin has no active shared-line binding.
    UnknownBinding,
    /// The pin is already claimed for general-purpose I/O.
    OwnershipConflict,
    /// The hardware description is incomplete or the parent-domain
    /// registration failed. Fatal to bringing the subsystem up.
    InitFailed,
    /// A call delegated to the parent interrupt controller failed.
    DelegationFailed,
    /// Invalid arguments, e.g. an out-of-range pin or an unsupported
    /// trigger encoding.
    InvalidArgs,
}

/// The error with an error type and an error message used in this crate.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Error {
    errno: Errno,
    msg: Option<&'static str>,
}

impl Error {
    /// Creates a new error with the given error type and no error message.
    pub const fn new(errno: Errno) -> Self {
        Error { errno, msg: None }
    }

    /// Creates a new error with the given error type and the error message.
    pub const fn with_msg(errno: Errno, msg: &'static str) -> Self {
        Error {
            errno,
            msg: Some(msg),
        }
    }

    /// Returns the error type.
    pub fn errno(&self) -> Errno {
        self.errno
    }
}

impl From<Errno> for Error {
    fn from(errno: Errno) -> Self {
        Error::new(errno)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.msg {
            Some(msg) => write!(f, "{}: {}", self.errno, msg),
            None => write!(f, "{}", self.errno),
        }
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A specialized [`Result`] type for this crate.
///
/// [`Result`]: core::result::Result
pub type Result<T> = core::result::Result<T, Error>;

/// Returns an [`Error`] with the given error type.
#[macro_export]
macro_rules! return_errno {
    ($errno: expr) => {
        return core::result::Result::Err($crate::Error::new($errno))
    };
}

/// Returns an [`Error`] with the given error type and message.
#[macro_export]
macro_rules! return_errno_with_msg {
    ($errno: expr, $msg: expr) => {
        return core::result::Result::Err($crate::Error::with_msg($errno, $msg))
    };
}

use snafu::Snafu;

pub type Result<T, E = Error> = ::std::result::Result<T, E>;

pub use crate::parsing::{Error as ParsingError, RemainingError};

/// Error types
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Well formed data that does not hold up, e.g. a checksum mismatch.
    #[snafu(display("structural error: {message}"))]
    Structural { message: String },
    /// Signals algorithms, packet versions and parameters we don't support.
    #[snafu(display("unsupported: {message}"))]
    Unsupported { message: String },
    /// The caller used the API in a way that can not produce valid output.
    #[snafu(display("invalid argument: {message}"))]
    InvalidArgument { message: String },
    #[snafu(display("invalid input"))]
    InvalidInput,
    #[snafu(transparent)]
    Parsing { source: ParsingError },
    #[snafu(transparent)]
    IO { source: std::io::Error },
    #[snafu(transparent)]
    Rsa { source: rsa::errors::Error },
    #[snafu(display("cfb: invalid key iv length"))]
    CfbInvalidKeyIvLength,
    #[snafu(transparent)]
    TryFromInt { source: std::num::TryFromIntError },
}

/// Coarse classification of [`Error`], following the wire protocol's error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ErrorKind {
    /// Invalid or truncated data, including failed integrity checks.
    Structural,
    /// Unknown or unusable algorithms and format features.
    Unsupported,
    /// Misuse of the API.
    InvalidArgument,
    /// Failure of the underlying reader or writer.
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Structural { .. }
            | Error::InvalidInput
            | Error::Parsing { .. }
            | Error::Rsa { .. }
            | Error::TryFromInt { .. } => ErrorKind::Structural,
            Error::Unsupported { .. } | Error::CfbInvalidKeyIvLength => ErrorKind::Unsupported,
            Error::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Error::IO { .. } => ErrorKind::Io,
        }
    }

    /// Returns true for the error produced when decrypted secret material fails its
    /// integrity check. Wrong passphrases end up here as well.
    pub fn is_checksum_failure(&self) -> bool {
        matches!(self, Error::Structural { message } if message == CHECKSUM_FAILURE)
    }
}

pub(crate) const CHECKSUM_FAILURE: &str = "private key checksum failure";

impl From<cipher::InvalidLength> for Error {
    fn from(_: cipher::InvalidLength) -> Error {
        Error::CfbInvalidKeyIvLength
    }
}

macro_rules! unsupported_err {
    ($e:expr) => {
        return Err($crate::errors::Error::Unsupported { message: $e.to_string() })
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::Unsupported { message: format!($fmt, $($arg)+) })
    };
}

macro_rules! invalid_argument_err {
    ($e:expr) => {
        return Err($crate::errors::Error::InvalidArgument { message: $e.to_string() })
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::InvalidArgument { message: format!($fmt, $($arg)+) })
    };
}

macro_rules! bail {
    ($e:expr) => {
        return Err($crate::errors::Error::Structural { message: $e.to_string() })
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::Structural { message: format!($fmt, $($arg)+) })
    };
}

macro_rules! format_err {
    ($e:expr) => {
        $crate::errors::Error::Structural { message: $e.to_string() }
    };
    ($fmt:expr, $($arg:tt)+) => {
        $crate::errors::Error::Structural { message: format!($fmt, $($arg)+) }
    };
}

macro_rules! ensure {
    ($cond:expr, $e:expr) => {
        if !($cond) {
            $crate::errors::bail!($e);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)+) => {
        if !($cond) {
            $crate::errors::bail!($fmt, $($arg)+);
        }
    };
}

macro_rules! ensure_eq {
    ($left:expr, $right:expr, $e:expr) => {
        match (&($left), &($right)) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    $crate::errors::bail!($e);
                }
            }
        }
    };
}

pub(crate) use {bail, ensure, ensure_eq, format_err, invalid_argument_err, unsupported_err};

//! Develop error codes.

use quick_error::quick_error;

pub type DevelopResult<T> = Result<T, DevelopError>;

/// Coarse classification of a [`DevelopError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The source image is not valid, or a requested size is zero.
    InvalidInput,
    /// Odd bytes-per-row, or a sensor that is not one of the four Bayer layouts.
    UnsupportedLayout,
    /// A pixel format other than raw.
    UnsupportedFormat,
}

quick_error! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum DevelopError {
        InvalidInput(msg: String) {
            display("Invalid input: {}", msg)
        }

        UnsupportedLayout(msg: String) {
            display("Unsupported layout: {}", msg)
        }

        UnsupportedFormat(msg: String) {
            display("Unsupported format: {}", msg)
        }
    }
}

impl DevelopError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DevelopError::InvalidInput(_) => ErrorKind::InvalidInput,
            DevelopError::UnsupportedLayout(_) => ErrorKind::UnsupportedLayout,
            DevelopError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
        }
    }
}

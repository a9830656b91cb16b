use std::fmt;

/// Errors raised by the pipeline itself.
///
/// Functions in this crate return [`anyhow::Result`]; these
/// values are the root cause and can be recovered with
/// [`anyhow::Error::downcast_ref`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The image could not be decoded, or its samples are
    /// neither 8 nor 16 bits wide.
    UnsupportedFormat(String),

    /// A sampled coordinate lies outside the image.
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat(reason) => write!(f, "unsupported image format: {}", reason),
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "coordinate ({}, {}) outside {}x{} image",
                x, y, width, height
            ),
        }
    }
}

impl std::error::Error for Error {}

//! Error types.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::str::Utf8Error;

use thiserror::Error;

/// Result conditions reported by the renderer.
///
/// Each kind has a stable integer code, compatible with the result codes of the
/// resvg C API.  Zero means success and has no kind; see [`ErrorKind::from_code`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input document is not valid UTF-8 text.
    NotUtf8,

    /// The source file could not be opened.
    FileOpenFailed,

    /// The destination file could not be written.
    FileWriteFailed,

    /// The file extension is neither `svg` nor `svgz`.
    InvalidFileSuffix,

    /// A `.svgz` file is not valid gzip.
    MalformedGzip,

    /// The SVG content failed to parse.
    ParsingFailed,

    /// The drawing surface could not be allocated.
    NoCanvas,

    /// The caller's [`Options`](crate::Options) could not be translated.
    InvalidOptions,

    /// Anything else.
    Unknown,
}

impl ErrorKind {
    /// Translates an integer result code.
    ///
    /// Returns `None` for 0, which means success.  Codes that are not recognized
    /// map to [`ErrorKind::Unknown`].
    pub fn from_code(code: i32) -> Option<ErrorKind> {
        use ErrorKind::*;

        let kind = match code {
            0 => return None,
            1 => NotUtf8,
            2 => FileOpenFailed,
            3 => FileWriteFailed,
            4 => InvalidFileSuffix,
            5 => MalformedGzip,
            6 => ParsingFailed,
            7 => NoCanvas,
            8 => InvalidOptions,
            _ => Unknown,
        };

        Some(kind)
    }

    /// The integer result code for this kind.  Never returns 0.
    pub fn code(self) -> i32 {
        use ErrorKind::*;

        match self {
            NotUtf8 => 1,
            FileOpenFailed => 2,
            FileWriteFailed => 3,
            InvalidFileSuffix => 4,
            MalformedGzip => 5,
            ParsingFailed => 6,
            NoCanvas => 7,
            InvalidOptions => 8,
            Unknown => -1,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match *self {
            ErrorKind::NotUtf8 => "only UTF-8 content is supported",
            ErrorKind::FileOpenFailed => "failed to open the provided file",
            ErrorKind::FileWriteFailed => "failed to write to the provided file",
            ErrorKind::InvalidFileSuffix => "only svg and svgz suffixes are supported",
            ErrorKind::MalformedGzip => "compressed SVG must use the GZip algorithm",
            ErrorKind::ParsingFailed => "failed to parse SVG data",
            ErrorKind::NoCanvas => "failed to allocate an image",
            ErrorKind::InvalidOptions => "invalid rendering options",
            ErrorKind::Unknown => "unknown error",
        };

        f.write_str(msg)
    }
}

/// Errors returned by the rendering functions.
///
/// Use [`Error::kind`] to classify an error without looking at its details.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// The document is not valid UTF-8.
    #[error("only UTF-8 content is supported: {0}")]
    NotUtf8(#[source] Utf8Error),

    /// The SVG file could not be opened or read.
    #[error("failed to open {}: {source}", path.display())]
    FileOpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The PNG file could not be created or written.
    #[error("failed to write to {}: {source}", path.display())]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The SVG file name does not end in `.svg` or `.svgz`.
    #[error("only svg and svgz suffixes are supported: {}", .0.display())]
    InvalidFileSuffix(PathBuf),

    /// A `.svgz` file is not gzip-compressed, or compressed data is corrupt.
    #[error("compressed SVG must use the GZip algorithm: {0}")]
    MalformedGzip(String),

    /// The SVG engine could not parse the document.
    #[error("failed to parse SVG data: {0}")]
    ParsingFailed(String),

    /// The drawing surface could not be allocated.
    #[error("failed to allocate an image: {0}")]
    NoCanvas(String),

    /// The SVG engine or the drawing library failed while drawing.
    #[error("rendering error: {0}")]
    Rendering(String),

    /// The background color is not of the form `#RRGGBB`.
    #[error("invalid hex color: {0:?}")]
    InvalidHexColor(String),

    /// An in-memory render was requested with a zero or oversized dimension.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The DPI is not a positive finite number.
    #[error("invalid DPI: {0}")]
    InvalidDpi(f64),

    /// The zoom factor is not a positive finite number.
    #[error("invalid zoom factor: {0}")]
    InvalidZoom(f64),
}

impl Error {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match *self {
            Error::NotUtf8(_) => ErrorKind::NotUtf8,
            Error::FileOpenFailed { .. } => ErrorKind::FileOpenFailed,
            Error::FileWriteFailed { .. } => ErrorKind::FileWriteFailed,
            Error::InvalidFileSuffix(_) => ErrorKind::InvalidFileSuffix,
            Error::MalformedGzip(_) => ErrorKind::MalformedGzip,
            Error::ParsingFailed(_) => ErrorKind::ParsingFailed,
            Error::NoCanvas(_) => ErrorKind::NoCanvas,
            Error::Rendering(_) => ErrorKind::Unknown,
            Error::InvalidHexColor(_)
            | Error::InvalidDimensions { .. }
            | Error::InvalidDpi(_)
            | Error::InvalidZoom(_) => ErrorKind::InvalidOptions,
        }
    }

    /// The integer result code for this error; see [`ErrorKind::code`].
    pub fn code(&self) -> i32 {
        self.kind().code()
    }

    pub(crate) fn write_failed(path: PathBuf, e: cairo::IoError) -> Error {
        let source = match e {
            cairo::IoError::Io(e) => e,
            cairo::IoError::Cairo(e) => io::Error::other(e.to_string()),
        };

        Error::FileWriteFailed { path, source }
    }
}

impl From<rsvg::LoadingError> for Error {
    fn from(e: rsvg::LoadingError) -> Error {
        Error::ParsingFailed(e.to_string())
    }
}

impl From<rsvg::RenderingError> for Error {
    fn from(e: rsvg::RenderingError) -> Error {
        match e {
            rsvg::RenderingError::OutOfMemory(s) => Error::NoCanvas(s),
            e => Error::Rendering(e.to_string()),
        }
    }
}

impl From<cairo::Error> for Error {
    fn from(e: cairo::Error) -> Error {
        Error::Rendering(format!("{e:?}"))
    }
}

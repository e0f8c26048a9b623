// MIT/Apache2 License

use chalkclip_geometry::TessellationError;
use std::fmt;

/// Sum error type for chalkclip operations.
///
/// Clip stack operations never fail on their own; errors come from the
/// rasterizer backends and from tessellating clip silhouettes.
pub struct Error {
    kind: Kind,
}

enum Kind {
    Unsupported,
    Tessellation(TessellationError),
    Display(String),
}

impl Error {
    /// Create a new error from an error-like type.
    pub fn from_display(f: impl fmt::Display) -> Self {
        Error {
            kind: Kind::Display(f.to_string()),
        }
    }

    /// Create a new unsupported error.
    pub fn unsupported() -> Self {
        Error {
            kind: Kind::Unsupported,
        }
    }

    /// Is this error an unsupported error?
    pub fn is_unsupported(&self) -> bool {
        matches!(self.kind, Kind::Unsupported)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct KindFmt<'a>(&'a Kind);

        impl<'a> fmt::Debug for KindFmt<'a> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.0 {
                    Kind::Unsupported => f.write_str("Unsupported"),
                    Kind::Tessellation(t) => fmt::Debug::fmt(t, f),
                    Kind::Display(s) => write!(f, r#""{}""#, s),
                }
            }
        }

        f.debug_tuple("Error")
            .field(&KindFmt(&self.kind))
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Kind::Unsupported => f.write_str("Attempted to run an unsupported operation"),
            Kind::Tessellation(ref t) => write!(f, "Failed to tessellate clip shape: {:?}", t),
            Kind::Display(ref msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<TessellationError> for Error {
    fn from(te: TessellationError) -> Self {
        Error {
            kind: Kind::Tessellation(te),
        }
    }
}

/// Convenience result type.
pub type Result<T = ()> = std::result::Result<T, Error>;

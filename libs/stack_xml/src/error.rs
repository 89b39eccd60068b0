use alloc::string::String;
use core::fmt;

/// Fatal parse errors. Any of these ends the parse session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    IoError(embedded_io::ErrorKind),
    /// Not even one character could be read from the source.
    EmptyDocument,
    /// The source ran out in the middle of a tag, comment or marked section,
    /// or while elements were still open.
    UnexpectedEndOfInput,
    /// `<!` followed by something other than `--` or `[`.
    MalformedTag,
    /// A `>` or `?` was required at the end of a tag.
    ExpectedCharacter(char),
    /// End tag found while no element is open.
    UnbalancedEndTag(String),
    MismatchedEndTag { found: String, expected: String },
    /// Non-whitespace text while no element is open.
    UnexpectedContentOutsideTags(String),
}

impl Error {
    pub(crate) fn from_io_error(error: impl embedded_io::Error) -> Self {
        Error::IoError(error.kind())
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::from_io_error(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IoError(kind) => write!(f, "I/O error: {kind:?}"),
            Error::EmptyDocument => f.write_str("Empty document. No XML tags found."),
            Error::UnexpectedEndOfInput => f.write_str("Unexpected end of input."),
            Error::MalformedTag => f.write_str("Malformed tag beginning with '!'"),
            Error::ExpectedCharacter(c) => write!(f, "Expected '{c}' at end of tag."),
            Error::UnbalancedEndTag(name) => {
                write!(f, "Unexpected end tag outside of all tags: {name}")
            }
            Error::MismatchedEndTag { found, expected } => {
                write!(f, "Mismatched end tag, found '{found}', expected '{expected}'")
            }
            Error::UnexpectedContentOutsideTags(text) => {
                write!(f, "Unexpected data outside of all tags: '{text}'")
            }
        }
    }
}

impl core::error::Error for Error {}

impl embedded_io::Error for Error {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Error::IoError(kind) => *kind,
            Error::EmptyDocument | Error::UnexpectedEndOfInput => {
                embedded_io::ErrorKind::InvalidInput
            }
            _ => embedded_io::ErrorKind::InvalidData,
        }
    }
}

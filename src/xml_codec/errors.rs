use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

#[derive(Debug)]
pub enum XmlCodecError {
    // Reading or writing the XML file itself failed
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Write {
        source: quick_xml::Error,
    },
    Encoding {
        source: FromUtf8Error,
    },
    // The document is not well-formed XML
    Parse {
        position: usize,
        source: quick_xml::Error,
    },
    MissingRootElement,
    UnexpectedRootElement {
        tag: String,
    },
    MissingField {
        record: usize,
        field: &'static str,
    },
    InvalidContent {
        position: usize,
        message: &'static str,
    },
}
pub type Result<T> = std::result::Result<T, XmlCodecError>;

impl XmlCodecError {
    /// True if the document itself is broken (as opposed to the file being inaccessible).
    pub fn is_format_error(&self) -> bool {
        !matches!(
            self,
            Self::Io { .. } | Self::Write { .. } | Self::Encoding { .. }
        )
    }
}

// Error Boilerplate (Error display, conversion and source)
impl fmt::Display for XmlCodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "could not access '{}': {}", path.display(), source),
            Self::Write { source } => write!(f, "could not write XML: {}", source),
            Self::Encoding { source } => write!(f, "encoded XML is not UTF-8: {}", source),
            Self::Parse { position, source } => {
                write!(f, "malformed XML at byte {}: {}", position, source)
            }
            Self::MissingRootElement => write!(f, "document has no <trains> root element"),
            Self::UnexpectedRootElement { tag } => {
                write!(f, "expected <trains> root element, found <{}>", tag)
            }
            Self::MissingField { record, field } => {
                write!(f, "train #{} has no <{}> element", record + 1, field)
            }
            Self::InvalidContent { position, message } => {
                write!(f, "invalid document at byte {}: {}", position, message)
            }
        }
    }
}
impl Error for XmlCodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { ref source, .. } => Some(source),
            Self::Write { ref source } => Some(source),
            Self::Encoding { ref source } => Some(source),
            Self::Parse { ref source, .. } => Some(source),
            Self::MissingRootElement => None,
            Self::UnexpectedRootElement { .. } => None,
            Self::MissingField { .. } => None,
            Self::InvalidContent { .. } => None,
        }
    }
}

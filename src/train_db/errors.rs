use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum TrainDBError {
    CreateDataDirError {
        path: PathBuf,
        source: io::Error,
    },
    InvalidDBPath {
        path: PathBuf,
    },
    DBConnectionError {
        source: diesel::result::ConnectionError,
    },
    SchemaSetupError {
        source: diesel::result::Error,
    },
    // A train with the given number is already registered
    Conflict {
        number: String,
    },
    GenericSQLError {
        source: diesel::result::Error,
    },
}
pub type Result<T> = std::result::Result<T, TrainDBError>;

impl TrainDBError {
    /// True for all errors that prevent the database from being opened at all.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::CreateDataDirError { .. }
                | Self::InvalidDBPath { .. }
                | Self::DBConnectionError { .. }
                | Self::SchemaSetupError { .. }
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

// Error Boilerplate (Error display, conversion and source)
impl fmt::Display for TrainDBError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDataDirError { path, source } => write!(
                f,
                "could not create data directory '{}': {}",
                path.display(),
                source
            ),
            Self::InvalidDBPath { path } => {
                write!(f, "database path '{}' is not valid UTF-8", path.display())
            }
            Self::DBConnectionError { source } => {
                write!(f, "could not connect to the database: {}", source)
            }
            Self::SchemaSetupError { source } => {
                write!(f, "could not set up the database schema: {}", source)
            }
            Self::Conflict { number } => {
                write!(f, "a train with number {} already exists", number)
            }
            Self::GenericSQLError { source } => write!(f, "database error: {}", source),
        }
    }
}
impl From<diesel::result::Error> for TrainDBError {
    fn from(error: diesel::result::Error) -> Self {
        Self::GenericSQLError { source: error }
    }
}
impl From<diesel::result::ConnectionError> for TrainDBError {
    fn from(error: diesel::result::ConnectionError) -> Self {
        Self::DBConnectionError { source: error }
    }
}
impl Error for TrainDBError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDataDirError { ref source, .. } => Some(source),
            Self::DBConnectionError { ref source } => Some(source),
            Self::SchemaSetupError { ref source } => Some(source),
            Self::GenericSQLError { ref source } => Some(source),
            Self::InvalidDBPath { .. } => None,
            Self::Conflict { .. } => None,
        }
    }
}

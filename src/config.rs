use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DB_NAME: &str = "trains";
const DB_FILE_EXTENSION: &str = "db";

/// Settings of one invocation of the registry.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub db_name: String,
    pub logging: LoggingConfig,
}

impl Config {
    /// The database file backing this configuration (<data_dir>/<db_name>.db).
    pub fn db_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", self.db_name, DB_FILE_EXTENSION))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            db_name: DEFAULT_DB_NAME.to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Installs the global tracing subscriber. RUST_LOG takes precedence over the
    /// configured level. Must only be called once per process.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        // stdout belongs to command output
        match self.format.as_str() {
            "compact" => fmt()
                .compact()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init(),
            _ => fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn default_db_path() {
        let config = Config::default();
        assert_eq!(config.db_path(), Path::new("data").join("trains.db"));
    }

    #[test]
    fn custom_db_path() {
        let config = Config {
            data_dir: PathBuf::from("/tmp/registry"),
            db_name: "test_trains".to_string(),
            ..Config::default()
        };
        assert_eq!(config.db_path(), Path::new("/tmp/registry/test_trains.db"));
    }
}

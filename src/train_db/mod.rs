mod db_setup;
// Database schema - must be kept up to date manually
mod entity;
use self::entity::*;
mod errors;
pub use self::errors::*;
mod schema;


use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::sqlite::SqliteConnection;
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::train::Train;

// (number, destination, time, station_name) as produced by the trains/stations join.
type JoinedTrain = (String, String, String, Option<String>);

pub struct TrainDB {
    conn: SqliteConnection,
}

impl TrainDB {
    /// Opens the database described by the config, creating the data directory,
    /// the database file and its tables on first use.
    pub fn open(config: &Config) -> Result<TrainDB> {
        if let Err(source) = fs::create_dir_all(&config.data_dir) {
            error!(
                path = %config.data_dir.display(),
                error = %source,
                "could not create data directory"
            );
            return Err(TrainDBError::CreateDataDirError {
                path: config.data_dir.clone(),
                source,
            });
        }

        Self::open_file(&config.db_path())
    }

    /// Opens the database file at exactly the given path (':memory:' is allowed).
    pub fn open_file(path: &Path) -> Result<TrainDB> {
        let result = Self::establish(path);
        match &result {
            Ok(_) => info!(path = %path.display(), "connected to train database"),
            Err(err) => error!(path = %path.display(), error = %err, "could not open train database"),
        }

        result
    }

    fn establish(path: &Path) -> Result<TrainDB> {
        let url = path.to_str().ok_or_else(|| TrainDBError::InvalidDBPath {
            path: path.to_path_buf(),
        })?;

        let result = TrainDB {
            conn: SqliteConnection::establish(url)?,
        };
        db_setup::setup(&result.conn).map_err(|source| TrainDBError::SchemaSetupError { source })?;

        Ok(result)
    }

    /// Registers a new train together with its departure station.
    /// Both rows are written in one transaction, a duplicate number leaves the
    /// database untouched and reports a Conflict.
    pub fn add_train(
        &self,
        destination_p: &str,
        number_p: &str,
        time_p: &str,
        station_name_p: &str,
    ) -> Result<Train> {
        use self::schema::{stations, trains};
        use diesel::dsl::{exists, select};

        let result = self.conn.transaction::<_, TrainDBError, _>(|| {
            let already_exists: bool = select(exists(trains::table.filter(trains::number.eq(number_p))))
                .get_result(&self.conn)?;
            if already_exists {
                return Err(TrainDBError::Conflict {
                    number: number_p.to_string(),
                });
            }

            diesel::insert_into(trains::table)
                .values(&train::InsertFull {
                    destination: destination_p,
                    number: number_p,
                    time: time_p,
                })
                .execute(&self.conn)?;
            let train_row = trains::table
                .filter(trains::number.eq(number_p))
                .first::<TrainRow>(&self.conn)?;

            diesel::insert_into(stations::table)
                .values(&station::InsertFull {
                    station_name: station_name_p,
                    train_id: Some(train_row.id),
                })
                .execute(&self.conn)?;

            Ok(train_row)
        });

        match result.map_err(|err| Self::unique_violation_as_conflict(err, number_p)) {
            Ok(train_row) => {
                info!(
                    number = %train_row.number,
                    destination = %train_row.destination,
                    time = %train_row.time,
                    "added train"
                );
            }
            Err(err @ TrainDBError::Conflict { .. }) => {
                warn!(number = number_p, "train already exists");
                return Err(err);
            }
            Err(err) => {
                error!(number = number_p, error = %err, "could not add train");
                return Err(err);
            }
        }

        self.find_train(number_p)?.ok_or(TrainDBError::GenericSQLError {
            source: diesel::result::Error::NotFound,
        })
    }

    /// Lists all trains joined with their station in insertion order.
    /// A train without station row is reported with an empty station name.
    pub fn list_trains(&self) -> Result<Vec<Train>> {
        use self::schema::{stations, trains};

        let result: Vec<_> = trains::table
            .left_join(stations::table)
            .select((
                trains::number,
                trains::destination,
                trains::time,
                stations::station_name.nullable(),
            ))
            .order(trains::id.asc())
            .load::<JoinedTrain>(&self.conn)
            .map_err(|err| Self::log_query_error("list trains", err))?
            .into_iter()
            .map(Self::train_from_join_tuple)
            .collect();

        debug!(count = result.len(), "listed trains");
        Ok(result)
    }

    /// Looks up a single train by its number.
    /// A number that is not registered is not an error, the result is simply None.
    pub fn find_train(&self, number_p: &str) -> Result<Option<Train>> {
        use self::schema::{stations, trains};

        let result = trains::table
            .left_join(stations::table)
            .filter(trains::number.eq(number_p))
            .select((
                trains::number,
                trains::destination,
                trains::time,
                stations::station_name.nullable(),
            ))
            .first::<JoinedTrain>(&self.conn)
            .optional()
            .map_err(|err| Self::log_query_error("find train", err))?;

        match result {
            Some(joined) => {
                debug!(number = number_p, "found train");
                Ok(Some(Self::train_from_join_tuple(joined)))
            }
            None => {
                debug!(number = number_p, "train not found");
                Ok(None)
            }
        }
    }

    pub fn count_trains(&self) -> Result<i64> {
        use self::schema::trains;

        Ok(trains::table
            .count()
            .get_result::<i64>(&self.conn)
            .map_err(|err| Self::log_query_error("count trains", err))?)
    }

    fn train_from_join_tuple(joined: JoinedTrain) -> Train {
        let (number, destination, time, station_name) = joined;
        Train {
            number,
            destination,
            time,
            station_name: station_name.unwrap_or_default(),
        }
    }

    fn unique_violation_as_conflict(err: TrainDBError, number_p: &str) -> TrainDBError {
        match err {
            TrainDBError::GenericSQLError {
                source: diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _),
            } => TrainDBError::Conflict {
                number: number_p.to_string(),
            },
            err => err,
        }
    }

    fn log_query_error(action: &str, err: diesel::result::Error) -> TrainDBError {
        error!(error = %err, "could not {}", action);
        TrainDBError::GenericSQLError { source: err }
    }
}

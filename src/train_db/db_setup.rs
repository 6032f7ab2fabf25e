//! Brings a freshly opened connection into a usable state.
//! All statements are idempotent, running them against an existing database is a no-op.
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sqlite::SqliteConnection;

pub fn setup(conn: &SqliteConnection) -> QueryResult<()> {
    default_db_settings(conn)?;
    create_table_trains(conn)?;
    create_table_stations(conn)?;

    Ok(())
}

fn default_db_settings(conn: &SqliteConnection) -> QueryResult<()> {
    sql_query("PRAGMA foreign_keys = 1").execute(conn)?;

    Ok(())
}

// A train is identified by its number, the surrogate id only links it to its station.
fn create_table_trains(conn: &SqliteConnection) -> QueryResult<()> {
    sql_query(
        "CREATE TABLE IF NOT EXISTS trains(
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                destination     TEXT NOT NULL,
                number          TEXT NOT NULL UNIQUE,
                time            TEXT NOT NULL
             )",
    )
    .execute(conn)?;

    Ok(())
}

// The departure station of a train. Exactly one row per train is written,
// the schema itself would allow more.
fn create_table_stations(conn: &SqliteConnection) -> QueryResult<()> {
    sql_query(
        "CREATE TABLE IF NOT EXISTS stations(
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                station_name    TEXT NOT NULL,
                train_id        INTEGER,

                FOREIGN KEY(train_id)   REFERENCES trains(id)
             )",
    )
    .execute(conn)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_connection() -> SqliteConnection {
        SqliteConnection::establish(":memory:").unwrap()
    }

    fn query_table_names(conn: &SqliteConnection) -> Vec<String> {
        use diesel::sql_types::Text;
        #[derive(Debug, QueryableByName)]
        struct Test {
            #[sql_type = "Text"]
            name: String,
        }

        let result: Vec<Test> = sql_query("SELECT name FROM sqlite_master WHERE type = 'table'")
            .load(conn)
            .unwrap();
        result.iter().map(|test| test.name.clone()).collect()
    }

    #[test]
    fn creates_both_tables() {
        let conn = open_connection();

        setup(&conn).unwrap();

        let table_names = query_table_names(&conn);
        assert!(table_names.contains(&"trains".to_string()));
        assert!(table_names.contains(&"stations".to_string()));
    }

    #[test]
    fn setup_is_idempotent() {
        let conn = open_connection();

        setup(&conn).unwrap();
        setup(&conn).unwrap();

        let table_names = query_table_names(&conn);
        assert_eq!(
            table_names
                .iter()
                .filter(|name| name.as_str() == "trains")
                .count(),
            1
        );
    }
}

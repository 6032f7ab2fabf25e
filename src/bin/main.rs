extern crate clap;
extern crate registry;
use clap::{App, Arg, ArgMatches, SubCommand};
use registry::config::{Config, LoggingConfig, DEFAULT_DATA_DIR, DEFAULT_DB_NAME};
use registry::train_db::{TrainDB, TrainDBError};
use registry::{xml_codec, Train};
use std::path::{Path, PathBuf};
use tracing::error;

fn main() {
    let data_dir_arg = Arg::with_name("data-dir")
        .long("data-dir")
        .help("Directory holding the database files (created on first use).")
        .takes_value(true)
        .env("TRAINS_DATA_DIR")
        .default_value(DEFAULT_DATA_DIR);
    let db_name_arg = Arg::with_name("db-name")
        .long("db-name")
        .help("Name of the database inside the data directory (without '.db').")
        .takes_value(true)
        .env("TRAINS_DB_NAME")
        .default_value(DEFAULT_DB_NAME);
    let log_level_arg = Arg::with_name("log-level")
        .long("log-level")
        .help("Log level/filter used when RUST_LOG is not set.")
        .takes_value(true)
        .default_value("info");
    let log_format_arg = Arg::with_name("log-format")
        .long("log-format")
        .help("Format of the log output written to stderr.")
        .takes_value(true)
        .possible_values(&["pretty", "compact"])
        .default_value("pretty");

    let add_cmd = SubCommand::with_name("add")
        .about("adds a new train")
        .arg(
            Arg::with_name("destination")
                .long("destination")
                .short("d")
                .help("Destination of the train.")
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("number")
                .long("number")
                .short("n")
                .help("Unique number of the train.")
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("time")
                .long("time")
                .short("t")
                .help("Departure time (hh:mm).")
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("station")
                .long("station")
                .short("s")
                .help("Name of the departure station.")
                .required(true)
                .takes_value(true),
        );

    let list_cmd = SubCommand::with_name("list").about("shows all registered trains");

    let find_cmd = SubCommand::with_name("find")
        .about("finds a train by its number")
        .arg(
            Arg::with_name("NUMBER")
                .required(true)
                .index(1)
                .help("Number of the train to look for"),
        );

    let save_xml_cmd = SubCommand::with_name("save-xml")
        .about("exports all trains to an XML file")
        .arg(
            Arg::with_name("FILE")
                .required(true)
                .index(1)
                .help("Path of the XML file to write"),
        );

    let load_xml_cmd = SubCommand::with_name("load-xml")
        .about("imports all trains of an XML file (already known numbers are skipped)")
        .arg(
            Arg::with_name("FILE")
                .required(true)
                .index(1)
                .help("Path of the XML file to read"),
        );

    let cli = App::new("Trains")
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("Keeps a list of train departures and exchanges it as XML")
        .arg(data_dir_arg)
        .arg(db_name_arg)
        .arg(log_level_arg)
        .arg(log_format_arg)
        .subcommand(add_cmd)
        .subcommand(list_cmd)
        .subcommand(find_cmd)
        .subcommand(save_xml_cmd)
        .subcommand(load_xml_cmd)
        .get_matches();

    if cli.subcommand_name().is_none() {
        println!("Please specify the command you want to perform on the train list.");
        println!("See --help for more information.");
        return;
    }

    let config = config_from_cli(&cli);
    config.logging.init();

    let train_db = match TrainDB::open(&config) {
        Ok(train_db) => train_db,
        Err(err) => {
            eprintln!("Error: {}", err);
            return;
        }
    };

    if let Some(add_cli) = cli.subcommand_matches("add") {
        add_train(&train_db, &add_cli);
    } else if cli.subcommand_matches("list").is_some() {
        list_trains(&train_db);
    } else if let Some(find_cli) = cli.subcommand_matches("find") {
        find_train(&train_db, &find_cli);
    } else if let Some(save_cli) = cli.subcommand_matches("save-xml") {
        save_xml(&train_db, &save_cli);
    } else if let Some(load_cli) = cli.subcommand_matches("load-xml") {
        load_xml(&train_db, &load_cli);
    }

    // Closes the connection
    drop(train_db);
}

fn config_from_cli(cli: &ArgMatches) -> Config {
    let defaults = Config::default();

    Config {
        data_dir: cli
            .value_of("data-dir")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir),
        db_name: cli
            .value_of("db-name")
            .map(str::to_string)
            .unwrap_or(defaults.db_name),
        logging: LoggingConfig {
            level: cli
                .value_of("log-level")
                .map(str::to_string)
                .unwrap_or(defaults.logging.level),
            format: cli
                .value_of("log-format")
                .map(str::to_string)
                .unwrap_or(defaults.logging.format),
        },
    }
}

// Required arguments are enforced by clap before we get here.
fn required_value<'a>(cmd_cli: &'a ArgMatches, name: &str) -> &'a str {
    cmd_cli.value_of(name).unwrap_or_default()
}

fn describe(train: &Train) -> String {
    format!(
        "Train {} departs to {} at {}, station: {}.",
        train.number, train.destination, train.time, train.station_name
    )
}

fn add_train(train_db: &TrainDB, cmd_cli: &ArgMatches) {
    let number = required_value(cmd_cli, "number");
    let result = train_db.add_train(
        required_value(cmd_cli, "destination"),
        number,
        required_value(cmd_cli, "time"),
        required_value(cmd_cli, "station"),
    );

    match result {
        Ok(train) => println!("Train {} to {} added.", train.number, train.destination),
        Err(TrainDBError::Conflict { number }) => {
            eprintln!("Error: a train with number {} already exists.", number)
        }
        Err(err) => eprintln!("Error while adding train {}: {}", number, err),
    }
}

fn list_trains(train_db: &TrainDB) {
    match train_db.list_trains() {
        Ok(trains) if trains.is_empty() => println!("No trains registered."),
        Ok(trains) => {
            for train in trains {
                println!("{}", describe(&train));
            }
        }
        Err(err) => eprintln!("Error while listing trains: {}", err),
    }
}

fn find_train(train_db: &TrainDB, cmd_cli: &ArgMatches) {
    let number = required_value(cmd_cli, "NUMBER");

    match train_db.find_train(number) {
        Ok(Some(train)) => println!("{}", describe(&train)),
        Ok(None) => println!("Train with number {} not found.", number),
        Err(err) => eprintln!("Error while searching train {}: {}", number, err),
    }
}

fn save_xml(train_db: &TrainDB, cmd_cli: &ArgMatches) {
    let file = Path::new(required_value(cmd_cli, "FILE"));

    let trains = match train_db.list_trains() {
        Ok(trains) => trains,
        Err(err) => {
            eprintln!("Error while listing trains: {}", err);
            return;
        }
    };

    match xml_codec::write_file(file, &trains) {
        Ok(()) => println!("Saved {} trains to {}.", trains.len(), file.display()),
        Err(err) => {
            error!(error = %err, "could not save XML file");
            eprintln!("Error while saving {}: {}", file.display(), err);
        }
    }
}

fn load_xml(train_db: &TrainDB, cmd_cli: &ArgMatches) {
    let file = Path::new(required_value(cmd_cli, "FILE"));

    // The whole document is decoded before the first train is added
    let trains = match xml_codec::read_file(file) {
        Ok(trains) => trains,
        Err(err) => {
            error!(error = %err, "could not load XML file");
            eprintln!("Error while loading {}: {}", file.display(), err);
            return;
        }
    };

    let mut imported = 0;
    let mut skipped = 0;
    for train in &trains {
        let result = train_db.add_train(
            &train.destination,
            &train.number,
            &train.time,
            &train.station_name,
        );
        match result {
            Ok(_) => imported += 1,
            Err(TrainDBError::Conflict { number }) => {
                skipped += 1;
                eprintln!("Skipped train {}: number already exists.", number);
            }
            Err(err) => {
                skipped += 1;
                eprintln!("Skipped train {}: {}", train.number, err);
            }
        }
    }

    println!(
        "Loaded {}: {} trains imported, {} skipped.",
        file.display(),
        imported,
        skipped
    );
}

/// A single train departure as seen by users of the registry.
/// The station is flattened into the record even though the database keeps it
/// in its own table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Train {
    pub number: String,
    pub destination: String,
    pub time: String,
    pub station_name: String,
}

impl Train {
    pub fn new(number: &str, destination: &str, time: &str, station_name: &str) -> Self {
        Self {
            number: number.to_string(),
            destination: destination.to_string(),
            time: time.to_string(),
            station_name: station_name.to_string(),
        }
    }
}

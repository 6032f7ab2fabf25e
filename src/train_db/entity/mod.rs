use super::schema;

// Basic entity mappings on database tables (1:1 copies of our schema).
pub mod station;
pub mod train;
pub use self::train::TrainRow;

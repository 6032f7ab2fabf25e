#[macro_use]
extern crate diesel;
extern crate quick_xml;
extern crate tracing;
extern crate tracing_subscriber;

pub mod config;
pub mod train;
pub mod train_db;
pub mod xml_codec;

pub use crate::train::Train;

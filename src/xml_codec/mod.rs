//! Converts lists of trains to and from their XML file representation:
//!
//! <?xml version="1.0" encoding="utf-8"?>
//! <trains>
//!   <train>
//!     <number>001A</number>
//!     <destination>Moscow</destination>
//!     <time>10:30</time>
//!     <station_name>Leningradsky</station_name>
//!   </train>
//! </trains>
//!
//! Fields are written in the order above, but read by tag name.
mod errors;
pub use self::errors::*;


use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::train::Train;

const ROOT_TAG: &str = "trains";
const TRAIN_TAG: &str = "train";
const NUMBER_TAG: &str = "number";
const DESTINATION_TAG: &str = "destination";
const TIME_TAG: &str = "time";
const STATION_NAME_TAG: &str = "station_name";

/// Encodes the trains into a complete XML document (including the declaration).
pub fn encode(trains: &[Train]) -> Result<String> {
    let mut buffer = Vec::new();
    encode_to(trains, &mut buffer)?;

    String::from_utf8(buffer).map_err(|source| XmlCodecError::Encoding { source })
}

pub fn encode_to<W: Write>(trains: &[Train], output: W) -> Result<()> {
    let mut writer = Writer::new_with_indent(output, b' ', 2);
    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    write_event(&mut writer, Event::Start(BytesStart::new(ROOT_TAG)))?;
    for train in trains {
        write_event(&mut writer, Event::Start(BytesStart::new(TRAIN_TAG)))?;
        write_text_element(&mut writer, NUMBER_TAG, &train.number)?;
        write_text_element(&mut writer, DESTINATION_TAG, &train.destination)?;
        write_text_element(&mut writer, TIME_TAG, &train.time)?;
        write_text_element(&mut writer, STATION_NAME_TAG, &train.station_name)?;
        write_event(&mut writer, Event::End(BytesEnd::new(TRAIN_TAG)))?;
    }
    write_event(&mut writer, Event::End(BytesEnd::new(ROOT_TAG)))?;

    Ok(())
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, value: &str) -> Result<()> {
    write_event(writer, Event::Start(BytesStart::new(tag)))?;
    write_event(writer, Event::Text(BytesText::new(value)))?;
    write_event(writer, Event::End(BytesEnd::new(tag)))?;

    Ok(())
}

fn write_event<W: Write>(writer: &mut Writer<W>, event: Event) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|source| XmlCodecError::Write { source })
}

/// Collects the field values of the <train> element currently being read.
#[derive(Default)]
struct TrainFields {
    number: Option<String>,
    destination: Option<String>,
    time: Option<String>,
    station_name: Option<String>,
}

impl TrainFields {
    fn set(&mut self, tag: &[u8], value: String) {
        match tag {
            b"number" => self.number = Some(value),
            b"destination" => self.destination = Some(value),
            b"time" => self.time = Some(value),
            b"station_name" => self.station_name = Some(value),
            // Unknown fields are ignored
            _ => (),
        }
    }

    fn is_known_field(tag: &[u8]) -> bool {
        matches!(tag, b"number" | b"destination" | b"time" | b"station_name")
    }

    fn into_train(self, record: usize) -> Result<Train> {
        let missing = |field| XmlCodecError::MissingField { record, field };

        Ok(Train {
            number: self.number.ok_or_else(|| missing(NUMBER_TAG))?,
            destination: self.destination.ok_or_else(|| missing(DESTINATION_TAG))?,
            time: self.time.ok_or_else(|| missing(TIME_TAG))?,
            station_name: self.station_name.ok_or_else(|| missing(STATION_NAME_TAG))?,
        })
    }
}

/// Text of the known field element currently being read.
struct OpenField {
    tag: Vec<u8>,
    text: String,
}

/// Decodes a complete XML document into trains, preserving document order.
/// Fails if the document is not well-formed or any <train> lacks one of its fields.
pub fn decode(document: &str) -> Result<Vec<Train>> {
    let mut reader = Reader::from_str(document);

    let mut trains = Vec::new();
    let mut root_seen = false;
    // Number of currently open elements
    let mut depth = 0usize;
    let mut current_train: Option<TrainFields> = None;
    let mut current_field: Option<OpenField> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(source) => {
                return Err(XmlCodecError::Parse {
                    position: reader.buffer_position(),
                    source,
                })
            }
        };

        match event {
            Event::Start(element) => {
                let tag = element.name().as_ref().to_vec();
                open_element(
                    &tag,
                    depth,
                    reader.buffer_position(),
                    &mut root_seen,
                    &mut current_train,
                    &mut current_field,
                )?;
                depth += 1;
            }
            Event::Empty(element) => {
                // <tag/> is handled as an immediately closed <tag></tag>
                let tag = element.name().as_ref().to_vec();
                open_element(
                    &tag,
                    depth,
                    reader.buffer_position(),
                    &mut root_seen,
                    &mut current_train,
                    &mut current_field,
                )?;
                close_element(depth + 1, &mut trains, &mut current_train, &mut current_field)?;
            }
            Event::End(_) => {
                if depth == 0 {
                    return Err(XmlCodecError::InvalidContent {
                        position: reader.buffer_position(),
                        message: "closing tag without matching opening tag",
                    });
                }
                close_element(depth, &mut trains, &mut current_train, &mut current_field)?;
                depth -= 1;
            }
            Event::Text(text) => {
                let position = reader.buffer_position();
                let unescaped = text
                    .unescape()
                    .map_err(|source| XmlCodecError::Parse { position, source })?;

                if let Some(field) = current_field.as_mut() {
                    field.text.push_str(&unescaped);
                } else if depth == 0 && !unescaped.trim().is_empty() {
                    return Err(XmlCodecError::InvalidContent {
                        position,
                        message: "text outside of the root element",
                    });
                }
            }
            Event::CData(data) => {
                if let Some(field) = current_field.as_mut() {
                    field.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            // Declaration, comments, processing instructions and doctype carry no data
            _ => (),
        }
    }

    if depth != 0 {
        return Err(XmlCodecError::InvalidContent {
            position: reader.buffer_position(),
            message: "unexpected end of document",
        });
    }
    if !root_seen {
        return Err(XmlCodecError::MissingRootElement);
    }

    debug!(count = trains.len(), "decoded trains");
    Ok(trains)
}

// `depth` is the number of elements open before this one.
fn open_element(
    tag: &[u8],
    depth: usize,
    position: usize,
    root_seen: &mut bool,
    current_train: &mut Option<TrainFields>,
    current_field: &mut Option<OpenField>,
) -> Result<()> {
    match depth {
        0 => {
            if *root_seen {
                return Err(XmlCodecError::InvalidContent {
                    position,
                    message: "more than one root element",
                });
            }
            if tag != ROOT_TAG.as_bytes() {
                return Err(XmlCodecError::UnexpectedRootElement {
                    tag: String::from_utf8_lossy(tag).into_owned(),
                });
            }
            *root_seen = true;
        }
        1 => {
            if tag == TRAIN_TAG.as_bytes() {
                *current_train = Some(TrainFields::default());
            }
        }
        2 => {
            if current_train.is_some() && TrainFields::is_known_field(tag) {
                *current_field = Some(OpenField {
                    tag: tag.to_vec(),
                    text: String::new(),
                });
            }
        }
        _ => {
            if current_field.is_some() {
                return Err(XmlCodecError::InvalidContent {
                    position,
                    message: "train fields must only contain text",
                });
            }
        }
    }

    Ok(())
}

// `depth` is the number of open elements including the one being closed.
fn close_element(
    depth: usize,
    trains: &mut Vec<Train>,
    current_train: &mut Option<TrainFields>,
    current_field: &mut Option<OpenField>,
) -> Result<()> {
    match depth {
        3 => {
            if let (Some(train), Some(field)) = (current_train.as_mut(), current_field.take()) {
                train.set(&field.tag, field.text);
            }
        }
        2 => {
            if let Some(train) = current_train.take() {
                let record = trains.len();
                trains.push(train.into_train(record)?);
            }
        }
        _ => (),
    }

    Ok(())
}

/// Writes the trains as XML document to the given file, replacing its content.
pub fn write_file(path: &Path, trains: &[Train]) -> Result<()> {
    let io_error = |source| XmlCodecError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = fs::File::create(path).map_err(io_error)?;
    let mut output = BufWriter::new(file);
    encode_to(trains, &mut output)?;
    output.write_all(b"\n").map_err(io_error)?;
    output.flush().map_err(io_error)?;

    info!(path = %path.display(), count = trains.len(), "saved trains to XML file");
    Ok(())
}

/// Reads and decodes the XML document stored in the given file.
pub fn read_file(path: &Path) -> Result<Vec<Train>> {
    let content = fs::read(path).map_err(|source| XmlCodecError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = String::from_utf8(content).map_err(|err| XmlCodecError::InvalidContent {
        position: err.utf8_error().valid_up_to(),
        message: "document is not valid UTF-8",
    })?;

    let trains = decode(&document)?;
    info!(path = %path.display(), count = trains.len(), "loaded trains from XML file");
    Ok(trains)
}

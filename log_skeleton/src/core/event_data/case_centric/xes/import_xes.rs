use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use flate2::bufread::GzDecoder;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event as XMLEvent};
use quick_xml::Reader;
use thiserror::Error;

use crate::core::event_data::case_centric::{
    Attribute, AttributeValue, Event, EventLog, Trace,
};

///
/// Error encountered while parsing XES
///
#[derive(Debug, Error)]
pub enum XESParseError {
    /// There is no top-level `<log>`
    #[error("Failed to parse XES: no top-level <log> tag")]
    NoTopLevelLog,
    /// An `<event>` was encountered outside of a `<trace>`
    #[error("Failed to parse XES: <event> outside of <trace>")]
    EventOutsideTrace,
    /// IO error
    #[error("Failed to parse XES: {0}")]
    IOError(#[from] std::io::Error),
    /// XML error (e.g., incorrect XML format)
    #[error("Failed to parse XES: {0}")]
    XMLParsingError(#[from] quick_xml::Error),
}

/// Where attributes encountered next belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Log,
    Trace,
    Event,
}

/// Parse XES from the given reader
///
/// Only the typed attributes directly attached to the log, its traces and their events are kept.
/// Nested attributes, global attribute declarations, extensions and classifiers are skipped.
pub fn import_xes<T>(reader: T) -> Result<EventLog, XESParseError>
where
    T: BufRead,
{
    let mut reader = Reader::from_reader(reader);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut log = EventLog::default();
    let mut encountered_log = false;
    let mut mode = Mode::Log;
    let mut current_trace: Option<Trace> = None;
    // > 0 while inside an element whose children are ignored (nested attributes, <global>)
    let mut skip_depth: usize = 0;

    loop {
        match reader.read_event_into(&mut buf)? {
            XMLEvent::Start(t) => {
                if skip_depth > 0 {
                    skip_depth += 1;
                } else {
                    match t.name().as_ref() {
                        b"log" => encountered_log = true,
                        b"trace" => {
                            if !encountered_log {
                                return Err(XESParseError::NoTopLevelLog);
                            }
                            current_trace = Some(Trace::default());
                            mode = Mode::Trace;
                        }
                        b"event" => {
                            start_event(&mut current_trace)?;
                            mode = Mode::Event;
                        }
                        _ => {
                            if !encountered_log {
                                return Err(XESParseError::NoTopLevelLog);
                            }
                            add_attribute(&t, mode, &mut log, &mut current_trace);
                            skip_depth = 1;
                        }
                    }
                }
            }
            XMLEvent::Empty(t) => {
                if skip_depth == 0 {
                    match t.name().as_ref() {
                        b"log" => encountered_log = true,
                        b"trace" => {
                            if !encountered_log {
                                return Err(XESParseError::NoTopLevelLog);
                            }
                            log.traces.push(Trace::default());
                        }
                        b"event" => {
                            start_event(&mut current_trace)?;
                        }
                        _ => {
                            if !encountered_log {
                                return Err(XESParseError::NoTopLevelLog);
                            }
                            add_attribute(&t, mode, &mut log, &mut current_trace);
                        }
                    }
                }
            }
            XMLEvent::End(t) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                } else {
                    match t.name().as_ref() {
                        b"event" => mode = Mode::Trace,
                        b"trace" => {
                            if let Some(trace) = current_trace.take() {
                                log.traces.push(trace);
                            }
                            mode = Mode::Log;
                        }
                        _ => {}
                    }
                }
            }
            XMLEvent::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !encountered_log {
        return Err(XESParseError::NoTopLevelLog);
    }
    tracing::debug!(traces = log.traces.len(), "imported XES event log");
    Ok(log)
}

fn start_event(current_trace: &mut Option<Trace>) -> Result<(), XESParseError> {
    match current_trace {
        Some(trace) => {
            trace.events.push(Event {
                attributes: Vec::new(),
            });
            Ok(())
        }
        None => Err(XESParseError::EventOutsideTrace),
    }
}

fn add_attribute(t: &BytesStart<'_>, mode: Mode, log: &mut EventLog, trace: &mut Option<Trace>) {
    let Some(attr) = parse_attribute_from_tag(t) else {
        return;
    };
    match (mode, trace) {
        (Mode::Event, Some(trace)) => {
            if let Some(event) = trace.events.last_mut() {
                event.attributes.push(attr);
            }
        }
        (Mode::Trace, Some(trace)) => trace.attributes.push(attr),
        _ => log.attributes.push(attr),
    }
}

fn get_attribute_string(t: &BytesStart<'_>, key: &'static str) -> Option<String> {
    t.try_get_attribute(key)
        .ok()
        .flatten()
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Resolve XML escapes (e.g., `&amp;`), keeping the raw text if it is not valid
fn unescape_lossy(raw: String) -> String {
    let unescaped = unescape(&raw).ok().map(|s| s.into_owned());
    unescaped.unwrap_or(raw)
}

fn parse_date_from_str(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }
    // Some logs omit the offset; interpret those as UTC
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc().fixed_offset())
}

/// Parse a typed XES attribute tag (e.g., `<string key="concept:name" value="A"/>`)
///
/// Returns `None` for tags which are not attributes (e.g., `<global>`, `<extension>`)
fn parse_attribute_from_tag(t: &BytesStart<'_>) -> Option<Attribute> {
    let tag = t.name();
    let tag = tag.as_ref();
    if !matches!(
        tag,
        b"string" | b"id" | b"date" | b"int" | b"float" | b"boolean" | b"list" | b"container"
    ) {
        return None;
    }
    let key = unescape_lossy(get_attribute_string(t, "key")?);
    let value = get_attribute_string(t, "value").unwrap_or_default();
    let attribute_val = match tag {
        b"string" | b"id" => AttributeValue::String(unescape_lossy(value)),
        b"date" => match parse_date_from_str(&value) {
            Some(dt) => AttributeValue::Date(dt),
            None => {
                tracing::warn!(key = %key, value = %value, "could not parse XES date");
                AttributeValue::None()
            }
        },
        b"int" => value.parse::<i64>().map_or_else(
            |e| {
                tracing::warn!(key = %key, value = %value, "could not parse XES int: {e}");
                AttributeValue::None()
            },
            AttributeValue::Int,
        ),
        b"float" => value.parse::<f64>().map_or_else(
            |e| {
                tracing::warn!(key = %key, value = %value, "could not parse XES float: {e}");
                AttributeValue::None()
            },
            AttributeValue::Float,
        ),
        b"boolean" => value.parse::<bool>().map_or_else(
            |e| {
                tracing::warn!(key = %key, value = %value, "could not parse XES boolean: {e}");
                AttributeValue::None()
            },
            AttributeValue::Boolean,
        ),
        // Children of lists/containers are skipped
        _ => AttributeValue::None(),
    };
    Some(Attribute::new(key, attribute_val))
}

///
/// Import a XES [`EventLog`] from a file path
///
/// Paths ending in `.gz` are decompressed on the fly.
pub fn import_xes_file<P: AsRef<Path>>(path: P) -> Result<EventLog, XESParseError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    if path.to_string_lossy().ends_with(".gz") {
        let dec = GzDecoder::new(BufReader::new(file));
        import_xes(BufReader::new(dec))
    } else {
        import_xes(BufReader::new(file))
    }
}

///
/// Import a XES [`EventLog`] directly from a string
///
pub fn import_xes_str(xes_str: &str) -> Result<EventLog, XESParseError> {
    import_xes(BufReader::new(xes_str.as_bytes()))
}

///
/// Import a XES [`EventLog`] from a byte slice (&\[u8\])
///
/// * `is_compressed_gz`: Parse the passed `xes_data` as a compressed .gz archive
///
pub fn import_xes_slice(xes_data: &[u8], is_compressed_gz: bool) -> Result<EventLog, XESParseError> {
    if is_compressed_gz {
        let gz: GzDecoder<&[u8]> = GzDecoder::new(xes_data);
        return import_xes(BufReader::new(gz));
    }
    import_xes(BufReader::new(xes_data))
}

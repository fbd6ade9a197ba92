//! OSM XML reader using quick-xml
//!
//! Streams the file once. Node locations are indexed as they go by, so ways
//! can only resolve nodes that appear before them, which is the ordering
//! every OSM export uses.

use super::SourceError;
use crate::feature::{Feature, Point, Provenance};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::BufRead;

/// Yields one feature per `<way>`
pub struct OsmXmlSource<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    nodes: HashMap<i64, Point>,
    way: Option<WayBuilder>,
    done: bool,
}

/// A way being assembled between its start and end tags
#[derive(Default)]
struct WayBuilder {
    feature: Feature,
    error: Option<String>,
}

impl WayBuilder {
    fn finish(self) -> Result<Feature, SourceError> {
        match self.error {
            Some(reason) => Err(SourceError::Malformed {
                record: format!("way {}", self.feature.id),
                reason,
            }),
            None => Ok(self.feature),
        }
    }
}

/// Collect the attributes of an element as owned strings
fn attributes(e: &BytesStart<'_>) -> Result<HashMap<String, String>, String> {
    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value().map_err(|err| err.to_string())?;
        attrs.insert(key, value.into_owned());
    }
    Ok(attrs)
}

fn parse_attr<T: std::str::FromStr>(
    attrs: &HashMap<String, String>,
    name: &str,
) -> Result<Option<T>, String> {
    match attrs.get(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| format!("invalid {} attribute '{}'", name, raw)),
    }
}

impl<R: BufRead> OsmXmlSource<R> {
    pub fn new(reader: R) -> Self {
        let mut reader = Reader::from_reader(reader);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            nodes: HashMap::new(),
            way: None,
            done: false,
        }
    }

    /// Number of node locations indexed so far
    pub fn indexed_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn index_node(&mut self, attrs: &HashMap<String, String>) {
        let parsed = (|| -> Result<Option<(i64, Point)>, String> {
            let id = parse_attr::<i64>(attrs, "id")?;
            let lat = parse_attr::<f64>(attrs, "lat")?;
            let lon = parse_attr::<f64>(attrs, "lon")?;
            Ok(match (id, lat, lon) {
                (Some(id), Some(lat), Some(lon)) => Some((id, Point::new(lon, lat))),
                _ => None,
            })
        })();

        match parsed {
            Ok(Some((id, point))) => {
                self.nodes.insert(id, point);
            }
            Ok(None) => {}
            Err(reason) => log::debug!("skipping node: {}", reason),
        }
    }

    fn start_way(attrs: &HashMap<String, String>) -> WayBuilder {
        let mut way = WayBuilder::default();
        let header = (|| -> Result<(), String> {
            way.feature.id = parse_attr(attrs, "id")?.ok_or("missing id attribute")?;
            way.feature.provenance = Provenance {
                user: attrs.get("user").cloned().unwrap_or_default(),
                changeset: parse_attr(attrs, "changeset")?.unwrap_or_default(),
                timestamp: attrs.get("timestamp").cloned().unwrap_or_default(),
                version: parse_attr(attrs, "version")?.unwrap_or_default(),
            };
            Ok(())
        })();
        way.error = header.err();
        way
    }

    /// Handle a child element of the current way
    fn way_child(&mut self, name: &[u8], attrs: Result<HashMap<String, String>, String>) {
        let Some(way) = self.way.as_mut() else {
            return;
        };
        let attrs = match attrs {
            Ok(attrs) => attrs,
            Err(reason) => {
                way.error.get_or_insert(reason);
                return;
            }
        };

        match name {
            b"nd" => match parse_attr::<i64>(&attrs, "ref") {
                Ok(Some(id)) => way.feature.nodes.push(self.nodes.get(&id).copied()),
                Ok(None) => {
                    way.error.get_or_insert_with(|| "nd without ref".to_string());
                }
                Err(reason) => {
                    way.error.get_or_insert(reason);
                }
            },
            b"tag" => match (attrs.get("k"), attrs.get("v")) {
                (Some(k), Some(v)) => {
                    way.feature.tags.insert(k.clone(), v.clone());
                }
                _ => {
                    way.error.get_or_insert_with(|| "tag without k or v".to_string());
                }
            },
            _ => {}
        }
    }
}

impl<R: BufRead> Iterator for OsmXmlSource<R> {
    type Item = Result<Feature, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(e) => {
                    self.done = true;
                    return Some(Err(SourceError::Xml {
                        position: self.reader.error_position(),
                        message: e.to_string(),
                    }));
                }
            };

            match event {
                Event::Start(e) | Event::Empty(e)
                    if self.way.is_none() && e.name().as_ref() == b"node" =>
                {
                    if let Ok(attrs) = attributes(&e) {
                        self.index_node(&attrs);
                    }
                }
                Event::Start(e) if self.way.is_none() && e.name().as_ref() == b"way" => {
                    self.way = Some(match attributes(&e) {
                        Ok(attrs) => Self::start_way(&attrs),
                        Err(reason) => WayBuilder {
                            error: Some(reason),
                            ..WayBuilder::default()
                        },
                    });
                }
                Event::Empty(e) if self.way.is_none() && e.name().as_ref() == b"way" => {
                    let way = match attributes(&e) {
                        Ok(attrs) => Self::start_way(&attrs),
                        Err(reason) => WayBuilder {
                            error: Some(reason),
                            ..WayBuilder::default()
                        },
                    };
                    return Some(way.finish());
                }
                Event::Start(e) | Event::Empty(e) if self.way.is_some() => {
                    let name = e.name().as_ref().to_vec();
                    let attrs = attributes(&e);
                    self.way_child(&name, attrs);
                }
                Event::End(e) if e.name().as_ref() == b"way" => {
                    if let Some(way) = self.way.take() {
                        return Some(way.finish());
                    }
                }
                Event::Eof => {
                    self.done = true;
                    if self.way.take().is_some() {
                        return Some(Err(SourceError::Xml {
                            position: self.reader.buffer_position(),
                            message: "unexpected end of file inside <way>".to_string(),
                        }));
                    }
                    return None;
                }
                _ => {}
            }
        }
    }
}

//! Structured markup parsing for retrieved metadata files.
//!
//! Documents are reduced to a key -> values mapping: every child element is
//! stored under its tag name in a list, so a tag that appears once is still a
//! single-element list. Elements without child elements collapse to their
//! text. Attributes are ignored.

use indexmap::IndexMap;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use thiserror::Error;

/// Child elements of one element, grouped by tag name in document order.
pub type MarkupElement = IndexMap<String, Vec<MarkupValue>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupValue {
    Text(String),
    Element(MarkupElement),
}

impl MarkupValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MarkupValue::Text(text) => Some(text),
            MarkupValue::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&MarkupElement> {
        match self {
            MarkupValue::Element(element) => Some(element),
            MarkupValue::Text(_) => None,
        }
    }

    /// Text of the first `key` child, e.g. `fullName` of a field declaration.
    pub fn first_text(&self, key: &str) -> Option<&str> {
        self.as_element()?.get(key)?.first()?.as_text()
    }
}

/// A parsed document: root tag name plus its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupDocument {
    pub root: String,
    pub body: MarkupElement,
}

#[derive(Error, Debug)]
pub enum MarkupError {
    #[error("Malformed markup at byte {position}: {reason}")]
    Malformed { position: u64, reason: String },

    #[error("Document has no root element")]
    Empty,
}

/// Parses a file body into a [`MarkupDocument`].
pub trait MarkupParser: Send + Sync {
    fn parse(&self, body: &str) -> Result<MarkupDocument, MarkupError>;
}

/// Default parser for XML metadata files.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlMarkupParser;

struct Frame {
    name: String,
    text: String,
    children: MarkupElement,
}

impl Frame {
    fn new(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            text: String::new(),
            children: MarkupElement::new(),
        }
    }

    fn into_value(self) -> (String, MarkupValue) {
        let value = if self.children.is_empty() {
            MarkupValue::Text(self.text)
        } else {
            MarkupValue::Element(self.children)
        };
        (self.name, value)
    }
}

fn close(frame: Frame, stack: &mut [Frame], root: &mut Option<(String, MarkupValue)>) {
    let (name, value) = frame.into_value();
    match stack.last_mut() {
        Some(parent) => parent.children.entry(name).or_default().push(value),
        None => *root = Some((name, value)),
    }
}

impl MarkupParser for XmlMarkupParser {
    fn parse(&self, body: &str) -> Result<MarkupDocument, MarkupError> {
        let mut reader = Reader::from_str(body);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Frame> = Vec::new();
        let mut root = None;

        loop {
            let malformed = |reader: &Reader<&[u8]>, reason: String| MarkupError::Malformed {
                position: reader.error_position(),
                reason,
            };

            match reader.read_event() {
                Ok(Event::Start(e)) => stack.push(Frame::new(e.local_name().as_ref())),
                Ok(Event::Empty(e)) => close(Frame::new(e.local_name().as_ref()), &mut stack, &mut root),
                Ok(Event::End(_)) => {
                    let frame = stack
                        .pop()
                        .ok_or_else(|| malformed(&reader, "unbalanced end tag".to_string()))?;
                    close(frame, &mut stack, &mut root);
                }
                Ok(Event::Text(t)) => {
                    let text = t.unescape().map_err(|e| malformed(&reader, e.to_string()))?;
                    if let Some(frame) = stack.last_mut() {
                        frame.text.push_str(&text);
                    }
                }
                Ok(Event::CData(c)) => {
                    if let Some(frame) = stack.last_mut() {
                        frame.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(malformed(&reader, e.to_string())),
            }
        }

        if let Some(open) = stack.last() {
            return Err(MarkupError::Malformed {
                position: body.len() as u64,
                reason: format!("unclosed element <{}>", open.name),
            });
        }

        let (root, value) = root.ok_or(MarkupError::Empty)?;
        let body = match value {
            MarkupValue::Element(children) => children,
            MarkupValue::Text(_) => MarkupElement::new(),
        };
        Ok(MarkupDocument { root, body })
    }
}

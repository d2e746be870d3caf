//! Stream parser for TCK audit documents.
//!
//! The audit is XML with the vocabulary `section`, `group`, `assertion`, `text` and `note`.
//! Reader events are pushed into [`AuditHandler`], a small state machine that builds the
//! section list as the document streams past:
//!
//! ```text
//! idle -> in-section -> in-group -> in-assertion -> in-text | in-note
//!                    \-----------> in-assertion -> in-text | in-note
//! ```
//!
//! Inside a group the first `<text>` to close is the group's preamble; every later one belongs
//! to the open assertion. A single flag, set when a group opens, tells the two apart.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::audit::{Assertion, Group, Section};
use crate::error::MapperError;
use crate::source;

/// Characters removed from `<text>` content before it is stored.
const STRIPPED: &[char] = &['|', '_', '~'];

/// Reads and parses the audit document at `location` (path or URL).
///
/// # Errors
///
/// Returns [`MapperError::AuditParse`] if the document cannot be read or is malformed.
pub fn parse_location(location: &str) -> Result<Vec<Section>, MapperError> {
    debug!(location, "starting parsing of audit file");
    let xml = source::read_to_string(location).map_err(|detail| MapperError::AuditParse {
        location: location.to_string(),
        offset: None,
        detail,
    })?;
    parse_str(&xml, location)
}

/// Parses an audit document held in memory; `location` only labels errors.
///
/// # Errors
///
/// Returns [`MapperError::AuditParse`] naming the byte offset of the first malformed event.
pub fn parse_str(xml: &str, location: &str) -> Result<Vec<Section>, MapperError> {
    let mut reader = Reader::from_str(xml);
    let mut handler = AuditHandler::default();

    let fail = |offset: u64, detail: String| MapperError::AuditParse {
        location: location.to_string(),
        offset: Some(offset),
        detail,
    };

    loop {
        let position = to_offset(reader.buffer_position());
        let event = reader
            .read_event()
            .map_err(|e| fail(to_offset(reader.error_position()), e.to_string()))?;
        match event {
            Event::Start(start) => handler.start(&start).map_err(|d| fail(position, d))?,
            Event::Empty(start) => {
                handler.start(&start).map_err(|d| fail(position, d))?;
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                handler.end(&name).map_err(|d| fail(position, d))?;
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                handler.end(&name).map_err(|d| fail(position, d))?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| fail(position, e.to_string()))?;
                handler.characters(&text);
            }
            Event::CData(data) => {
                handler.characters(&String::from_utf8_lossy(&data.into_inner()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let sections = handler.finish().map_err(|d| fail(to_offset(xml.len()), d))?;
    debug!(sections = sections.len(), "finished parsing of audit file");
    Ok(sections)
}

fn to_offset<T: TryInto<u64>>(position: T) -> u64 {
    position.try_into().unwrap_or(u64::MAX)
}

/// Parser state carried between reader events.
#[derive(Default)]
pub struct AuditHandler {
    sections: Vec<Section>,
    current_section: Option<Section>,
    current_group: Option<Group>,
    current_assertion: Option<Assertion>,
    group_text_pending: bool,
    buffer: String,
}

impl AuditHandler {
    /// Handles an opening tag.
    ///
    /// # Errors
    ///
    /// Returns a description of the schema violation.
    pub fn start(&mut self, element: &BytesStart<'_>) -> Result<(), String> {
        self.buffer.clear();
        let name = String::from_utf8_lossy(element.name().as_ref()).to_ascii_lowercase();
        match name.as_str() {
            "section" => {
                if self.current_section.is_some() {
                    return Err("nested <section>".to_string());
                }
                let id = required_attribute(element, "section", "id")?;
                let title = required_attribute(element, "section", "title")?;
                let level = match attribute(element, "level")? {
                    Some(level) => level
                        .trim()
                        .parse()
                        .map_err(|_| format!("section '{id}' has non-integer level '{level}'"))?,
                    None => 0,
                };
                self.current_section = Some(Section::new(id, title, level));
            }
            "group" => {
                let section = self
                    .current_section
                    .as_ref()
                    .ok_or("<group> outside a <section>")?;
                if self.current_group.is_some() {
                    return Err("nested <group>".to_string());
                }
                self.current_group = Some(Group::new(section.next_group_ref()));
                self.group_text_pending = true;
            }
            "assertion" => {
                if self.current_section.is_none() {
                    return Err("<assertion> outside a <section>".to_string());
                }
                let mut assertion = Assertion::new(attribute(element, "id")?.unwrap_or_default());
                if let Some(testable) = attribute(element, "testable")? {
                    assertion.testable = testable.trim().eq_ignore_ascii_case("true");
                }
                self.current_assertion = Some(assertion);
            }
            _ => {}
        }
        Ok(())
    }

    /// Accumulates character content; chunks between two tags are concatenated.
    pub fn characters(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Handles a closing tag.
    ///
    /// # Errors
    ///
    /// Returns a description of the schema violation.
    pub fn end(&mut self, name: &str) -> Result<(), String> {
        let text = std::mem::take(&mut self.buffer);
        match name.to_ascii_lowercase().as_str() {
            "section" => {
                if let Some(section) = self.current_section.take() {
                    self.sections.push(section);
                }
            }
            "group" => {
                if let Some(group) = self.current_group.take() {
                    self.section_mut("group")?.push_group(group);
                }
                self.group_text_pending = false;
            }
            "assertion" => {
                if let Some(assertion) = self.current_assertion.take() {
                    if let Some(group) = self.current_group.as_mut() {
                        group.push_assertion(assertion);
                    } else {
                        self.section_mut("assertion")?.push_assertion(assertion);
                    }
                }
            }
            "text" if self.group_text_pending && self.current_group.is_some() => {
                if let Some(group) = self.current_group.as_mut() {
                    group.text = strip(&text);
                }
                self.group_text_pending = false;
            }
            "text" => {
                self.assertion_mut("text")?.text = strip(&text);
            }
            "note" => {
                self.assertion_mut("note")?.note = Some(text);
            }
            _ => {}
        }
        Ok(())
    }

    /// Returns the parsed sections once the document has been fully read.
    ///
    /// # Errors
    ///
    /// Returns a description of the element left open at end of input.
    pub fn finish(self) -> Result<Vec<Section>, String> {
        if let Some(section) = self.current_section {
            return Err(format!("section '{}' is not closed", section.id));
        }
        Ok(self.sections)
    }

    fn section_mut(&mut self, element: &str) -> Result<&mut Section, String> {
        self.current_section
            .as_mut()
            .ok_or_else(|| format!("<{element}> outside a <section>"))
    }

    fn assertion_mut(&mut self, element: &str) -> Result<&mut Assertion, String> {
        self.current_assertion
            .as_mut()
            .ok_or_else(|| format!("<{element}> outside an <assertion>"))
    }
}

fn strip(text: &str) -> String {
    text.replace(STRIPPED, "")
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>, String> {
    element
        .try_get_attribute(name)
        .map_err(|e| e.to_string())?
        .map(|attribute| {
            attribute
                .unescape_value()
                .map(std::borrow::Cow::into_owned)
                .map_err(|e| e.to_string())
        })
        .transpose()
}

fn required_attribute(
    element: &BytesStart<'_>,
    tag: &str,
    name: &str,
) -> Result<String, String> {
    attribute(element, name)?
        .filter(|value| !value.is_empty())
        .ok_or_else(|| format!("<{tag}> is missing its '{name}' attribute"))
}

#[cfg(test)]
#[path = "tests/audit_parser.rs"]
mod tests;

//! # XML Tokenizer
//!
//! A pull reader over `xml-rs` events that exposes exactly the node kinds
//! the codec cares about: start elements, stop elements, text, and the two
//! ends of the input. Comments, processing instructions and the XML
//! declaration are skipped; CDATA sections surface as text.
//!
//! ## Namespace Policy
//!
//! Every start and stop element must belong to the namespace of the model.
//! A missing or different namespace turns into an [`Node::Error`], as does
//! an attribute on a start element unless additional attributes are
//! allowed. `xmlns` declarations are not attributes.
//!
//! ## Terminal Nodes
//!
//! [`Node::EndOfInput`] and [`Node::Error`] are terminal. Reading past a
//! terminal node is a caller defect, reported as [`DefectError`].

use std::fmt;
use std::io::Read;

use typecodec_core::{DefectError, XmlOptions};
use xml::common::Position;
use xml::name::OwnedName;
use xml::reader::{EventReader, ParserConfig, XmlEvent};

/// A tokenizer failure, located by 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingError {
    pub cause: String,
    pub line: u64,
    pub column: u64,
}

impl fmt::Display for ReadingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {}, column {})", self.cause, self.line, self.column)
    }
}

/// One node of the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    BeginningOfInput,
    /// A start element, by local name.
    Start(String),
    /// A stop element, by local name.
    Stop(String),
    Text(String),
    EndOfInput,
    Error(ReadingError),
}

impl Node {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::EndOfInput | Self::Error(_))
    }

    /// The defect of reading past this node, if it is terminal.
    pub(crate) fn read_past(&self) -> Option<DefectError> {
        match self {
            Self::EndOfInput => Some(DefectError::ReadPastEnd),
            Self::Error(error) => Some(DefectError::ReadAfterError(error.to_string())),
            _ => None,
        }
    }

    /// Human-readable rendering used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::BeginningOfInput => "the beginning-of-input".to_string(),
            Self::Start(name) => format!("a start element <{name}>"),
            Self::Stop(name) => format!("a stop element </{name}>"),
            Self::Text(text) => format!("the text {text:?}"),
            Self::EndOfInput => "the end-of-input".to_string(),
            Self::Error(error) => format!("an error: {error}"),
        }
    }
}

/// Namespace-checking pull tokenizer.
pub struct Reader<R: Read> {
    events: EventReader<R>,
    namespace: String,
    additional_attributes_allowed: bool,
    terminal: Option<Node>,
}

impl<R: Read> Reader<R> {
    pub fn new(source: R, namespace: impl Into<String>, options: &XmlOptions) -> Self {
        let config = ParserConfig::new()
            .trim_whitespace(false)
            .whitespace_to_characters(true)
            .cdata_to_characters(true)
            .ignore_comments(true)
            .coalesce_characters(false);
        Self {
            events: EventReader::new_with_config(source, config),
            namespace: namespace.into(),
            additional_attributes_allowed: options.additional_attributes_allowed,
            terminal: None,
        }
    }

    /// Pull the next node.
    pub fn read(&mut self) -> Result<Node, DefectError> {
        if let Some(defect) = self.terminal.as_ref().and_then(Node::read_past) {
            return Err(defect);
        }
        let node = self.next_node();
        if node.is_terminal() {
            tracing::trace!(node = %node.describe(), "XML tokenizer reached a terminal node");
            self.terminal = Some(node.clone());
        }
        Ok(node)
    }

    fn next_node(&mut self) -> Node {
        loop {
            let event = match self.events.next() {
                Ok(event) => event,
                Err(error) => {
                    let position = error.position();
                    return Node::Error(ReadingError {
                        cause: error.msg().to_string(),
                        line: position.row + 1,
                        column: position.column + 1,
                    });
                }
            };
            match event {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => {
                    if let Some(cause) = self.check_namespace(&name, "start element") {
                        return self.error(cause);
                    }
                    if let Some(attribute) = attributes.first() {
                        if !self.additional_attributes_allowed {
                            return self.error(format!(
                                "Additional attributes are not allowed, but the attribute {} was read in the start element <{}>",
                                qualified(&attribute.name),
                                name.local_name
                            ));
                        }
                    }
                    return Node::Start(name.local_name);
                }
                XmlEvent::EndElement { name } => {
                    if let Some(cause) = self.check_namespace(&name, "stop element") {
                        return self.error(cause);
                    }
                    return Node::Stop(name.local_name);
                }
                XmlEvent::Characters(text) | XmlEvent::CData(text) | XmlEvent::Whitespace(text) => {
                    return Node::Text(text);
                }
                XmlEvent::EndDocument => return Node::EndOfInput,
                _ => continue,
            }
        }
    }

    fn check_namespace(&self, name: &OwnedName, kind: &str) -> Option<String> {
        match name.namespace.as_deref() {
            None | Some("") => Some(format!(
                "The namespace is missing in the {kind} <{}>",
                name.local_name
            )),
            Some(namespace) if namespace != self.namespace => Some(format!(
                "We expected the XML namespace {}, but we got the namespace {namespace} in the {kind} <{}>",
                self.namespace, name.local_name
            )),
            Some(_) => None,
        }
    }

    fn error(&self, cause: String) -> Node {
        let position = self.events.position();
        Node::Error(ReadingError {
            cause,
            line: position.row + 1,
            column: position.column + 1,
        })
    }
}

fn qualified(name: &OwnedName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{prefix}:{}", name.local_name),
        None => name.local_name.clone(),
    }
}

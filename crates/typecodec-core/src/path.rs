//! # Error Paths
//!
//! An [`ErrorPath`] locates a failure inside a document. It is built inside
//! out: the innermost codec creates the error with an empty path, and each
//! enclosing level prepends its own segment while the error propagates.
//!
//! ## Rendering
//!
//! - JSON: `items[1].x`. The first property is bare, later properties are
//!   prefixed with `.`, indices are bracketed.
//! - XML: `items/*[1]/Item/x`. Segments are joined with `/`, indices are
//!   rendered as `*[i]`, and element names escape `& / < > " '`.

use std::collections::VecDeque;
use std::fmt::Write as _;

use crate::error::WireFormat;

/// One step of an [`ErrorPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A JSON object key.
    Property(String),
    /// A position within a list.
    Index(usize),
    /// An XML element name.
    Element(String),
}

/// Ordered sequence of segments, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ErrorPath {
    segments: VecDeque<Segment>,
}

impl ErrorPath {
    /// The empty path, denoting the document root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a segment in front of all existing ones.
    pub fn prepend(&mut self, segment: Segment) {
        self.segments.push_front(segment);
    }

    /// Segments from the outermost to the innermost.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render in the notation of the given format.
    pub fn render(&self, format: WireFormat) -> String {
        match format {
            WireFormat::Json => self.render_json(),
            WireFormat::Xml => self.render_xml(),
        }
    }

    /// Render as a JSON accessor chain, e.g. `items[1].x`.
    pub fn render_json(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Property(name) | Segment::Element(name) => {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                Segment::Index(index) => {
                    let _ = write!(out, "[{index}]");
                }
            }
        }
        out
    }

    /// Render as an XPath-like chain, e.g. `items/*[1]/Item/x`.
    pub fn render_xml(&self) -> String {
        let parts: Vec<String> = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Property(name) | Segment::Element(name) => escape_element_name(name),
                Segment::Index(index) => format!("*[{index}]"),
            })
            .collect();
        parts.join("/")
    }
}

fn escape_element_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '/' => out.push_str("&#47;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

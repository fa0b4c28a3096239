//! Text-merging layer over [`Reader`].
//!
//! The tokenizer may split one run of character data into several text
//! nodes (around entity references, CDATA sections, or skipped comments).
//! [`MergingReader`] concatenates consecutive text nodes into one, keeping
//! the node that ended the run as a one-node look-ahead.

use std::io::Read;

use typecodec_core::DefectError;

use crate::reader::{Node, Reader};

pub struct MergingReader<R: Read> {
    inner: Reader<R>,
    node: Node,
    look_ahead: Option<Node>,
}

impl<R: Read> MergingReader<R> {
    /// Starts positioned at [`Node::BeginningOfInput`].
    pub fn new(inner: Reader<R>) -> Self {
        Self {
            inner,
            node: Node::BeginningOfInput,
            look_ahead: None,
        }
    }

    /// The current node.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Advance to the next node. Fails if the current node is terminal.
    pub fn read(&mut self) -> Result<(), DefectError> {
        if let Some(defect) = self.node.read_past() {
            return Err(defect);
        }
        let next = match self.look_ahead.take() {
            Some(node) => node,
            None => self.inner.read()?,
        };
        self.node = match next {
            Node::Text(mut text) => {
                loop {
                    match self.inner.read()? {
                        Node::Text(more) => text.push_str(&more),
                        other => {
                            self.look_ahead = Some(other);
                            break;
                        }
                    }
                }
                Node::Text(text)
            }
            other => other,
        };
        Ok(())
    }
}

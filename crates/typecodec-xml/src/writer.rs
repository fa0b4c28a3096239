//! # Self-Closing XML Writer
//!
//! Writes start elements lazily. A start element stays queued until the next
//! operation decides its form:
//!
//! - the matching stop element collapses it to `<name />`;
//! - a nested start element or any text write (even an empty one) flushes
//!   it as `<name>`.
//!
//! As a consequence an empty string written as text yields `<name></name>`,
//! while an element with no content at all yields `<name />`.

use std::io::{self, Write};

#[derive(Debug)]
struct PendingStart {
    name: String,
    namespace: Option<String>,
}

pub struct SelfClosingWriter<W: Write> {
    sink: W,
    pending: Option<PendingStart>,
}

impl<W: Write> SelfClosingWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            pending: None,
        }
    }

    pub fn start_element(&mut self, name: &str) -> io::Result<()> {
        self.queue(name, None)
    }

    /// A start element carrying an `xmlns` declaration.
    pub fn start_element_with_namespace(&mut self, name: &str, namespace: &str) -> io::Result<()> {
        self.queue(name, Some(namespace))
    }

    pub fn stop_element(&mut self, name: &str) -> io::Result<()> {
        match self.pending.take() {
            Some(pending) => {
                debug_assert_eq!(pending.name, name, "stop element does not match the queued start");
                self.write_start(&pending, " />")
            }
            None => write!(self.sink, "</{name}>"),
        }
    }

    /// Write escaped character data.
    pub fn text(&mut self, text: &str) -> io::Result<()> {
        self.flush_pending()?;
        self.sink.write_all(escape(text).as_bytes())
    }

    /// Flush any queued start element and hand back the sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.flush_pending()?;
        self.sink.flush()?;
        Ok(self.sink)
    }

    fn queue(&mut self, name: &str, namespace: Option<&str>) -> io::Result<()> {
        self.flush_pending()?;
        self.pending = Some(PendingStart {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
        });
        Ok(())
    }

    fn flush_pending(&mut self) -> io::Result<()> {
        match self.pending.take() {
            Some(pending) => self.write_start(&pending, ">"),
            None => Ok(()),
        }
    }

    fn write_start(&mut self, pending: &PendingStart, close: &str) -> io::Result<()> {
        match &pending.namespace {
            Some(namespace) => write!(
                self.sink,
                "<{} xmlns=\"{}\"{close}",
                pending.name,
                escape(namespace)
            ),
            None => write!(self.sink, "<{}{close}", pending.name),
        }
    }
}

/// Escape the five predefined entities.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(build: impl FnOnce(&mut SelfClosingWriter<Vec<u8>>) -> io::Result<()>) -> String {
        let mut writer = SelfClosingWriter::new(Vec::new());
        build(&mut writer).unwrap();
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_empty_element_self_closes() {
        assert_eq!(
            written(|w| {
                w.start_element("a")?;
                w.stop_element("a")
            }),
            "<a />"
        );
    }

    #[test]
    fn test_empty_text_prevents_self_closing() {
        assert_eq!(
            written(|w| {
                w.start_element("a")?;
                w.text("")?;
                w.stop_element("a")
            }),
            "<a></a>"
        );
    }

    #[test]
    fn test_nested_elements() {
        assert_eq!(
            written(|w| {
                w.start_element_with_namespace("root", "urn:x")?;
                w.start_element("b")?;
                w.text("1 < 2 & 'q'")?;
                w.stop_element("b")?;
                w.start_element("c")?;
                w.stop_element("c")?;
                w.stop_element("root")
            }),
            r#"<root xmlns="urn:x"><b>1 &lt; 2 &amp; &apos;q&apos;</b><c /></root>"#
        );
    }

    #[test]
    fn test_namespace_on_self_closing_root() {
        assert_eq!(
            written(|w| {
                w.start_element_with_namespace("root", "urn:x")?;
                w.stop_element("root")
            }),
            r#"<root xmlns="urn:x" />"#
        );
    }

    #[test]
    fn test_finish_flushes_dangling_start() {
        assert_eq!(written(|w| w.start_element("a")), "<a>");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<"&'>"#), "&lt;&quot;&amp;&apos;&gt;");
    }
}

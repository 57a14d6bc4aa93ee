//! A single body alternative: a content type plus a streaming writer,
//! with an optional per-part encoding override.

use crate::encoding::BodyEncoding;
use crate::error::{MailComposeError, Result};
use std::io::Write;
use std::sync::Arc;

#[derive(Clone)]
pub struct Part {
    content_type: String,
    encoding: Option<BodyEncoding>,
    writer: Arc<dyn Fn(&mut dyn Write) -> std::io::Result<()> + Send + Sync>,
}

impl Part {
    /// Builds a part whose body is the fixed byte buffer `body`.
    pub fn new(content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        let body: Arc<Vec<u8>> = Arc::new(body.into());
        Self {
            content_type: content_type.into(),
            encoding: None,
            writer: Arc::new(move |w| w.write_all(&body)),
        }
    }

    /// Builds a part whose body is produced by a re-invocable writer
    /// closure, invoked fresh on every serialization.
    pub fn from_writer(
        content_type: impl Into<String>,
        writer: impl Fn(&mut dyn Write) -> std::io::Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            encoding: None,
            writer: Arc::new(writer),
        }
    }

    /// `SetPartEncoding(e)`: overrides the encoding just for this part.
    pub fn with_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn encoding_override(&self) -> Option<BodyEncoding> {
        self.encoding
    }

    pub fn write_body(&self, sink: &mut dyn Write) -> Result<()> {
        (self.writer)(sink).map_err(|source| MailComposeError::PartWriter {
            content_type: self.content_type.clone(),
            source,
        })
    }
}

impl std::fmt::Debug for Part {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Part")
            .field("content_type", &self.content_type)
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn writer_is_reinvocable() {
        let p = Part::new("text/plain", "hello");
        let mut a = Vec::new();
        let mut b = Vec::new();
        p.write_body(&mut a).unwrap();
        p.write_body(&mut b).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, b"hello");
    }
}

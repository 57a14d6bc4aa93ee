//! Content-Transfer-Encoding implementations.

mod base64;
mod qp;

pub use base64::Base64Writer;
pub use qp::QuotedPrintableWriter;

use std::io::{self, Write};

/// The three body encodings this library supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    QuotedPrintable,
    Base64,
    Unencoded,
}

impl BodyEncoding {
    /// The `Content-Transfer-Encoding` header value for this encoding.
    pub fn header_value(self) -> &'static str {
        match self {
            BodyEncoding::QuotedPrintable => "quoted-printable",
            BodyEncoding::Base64 => "base64",
            BodyEncoding::Unencoded => "8bit",
        }
    }
}

/// A sink that accepts arbitrary byte writes and, once finished,
/// hands back the underlying writer. Unifies the three encoders behind
/// one type so the composer can select at runtime.
pub enum BodyEncoder<W: Write> {
    QuotedPrintable(QuotedPrintableWriter<W>),
    Base64(Base64Writer<W>),
    Unencoded(W),
}

impl<W: Write> BodyEncoder<W> {
    pub fn new(encoding: BodyEncoding, inner: W) -> Self {
        match encoding {
            BodyEncoding::QuotedPrintable => {
                BodyEncoder::QuotedPrintable(QuotedPrintableWriter::new(inner))
            }
            BodyEncoding::Base64 => BodyEncoder::Base64(Base64Writer::new(inner)),
            BodyEncoding::Unencoded => BodyEncoder::Unencoded(inner),
        }
    }

    pub fn finish(self) -> io::Result<W> {
        match self {
            BodyEncoder::QuotedPrintable(w) => w.finish(),
            BodyEncoder::Base64(w) => w.finish(),
            BodyEncoder::Unencoded(w) => Ok(w),
        }
    }
}

impl<W: Write> Write for BodyEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            BodyEncoder::QuotedPrintable(w) => w.write(buf),
            BodyEncoder::Base64(w) => w.write(buf),
            BodyEncoder::Unencoded(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            BodyEncoder::QuotedPrintable(w) => w.flush(),
            BodyEncoder::Base64(w) => w.flush(),
            BodyEncoder::Unencoded(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn header_values_use_standard_names() {
        assert_eq!(
            BodyEncoding::QuotedPrintable.header_value(),
            "quoted-printable"
        );
        assert_eq!(BodyEncoding::Base64.header_value(), "base64");
        assert_eq!(BodyEncoding::Unencoded.header_value(), "8bit");
    }

    #[test]
    fn unencoded_is_pure_passthrough() {
        let mut enc = BodyEncoder::new(BodyEncoding::Unencoded, Vec::new());
        enc.write_all(b"raw \x00 bytes \xff").unwrap();
        let out = enc.finish().unwrap();
        assert_eq!(out, b"raw \x00 bytes \xff");
    }
}

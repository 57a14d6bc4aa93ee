//! The `Message` builder: headers, body parts, attachments, and
//! serialization.
//!
//! Grounded on `crates/mailparsing/src/builder.rs`'s `MessageBuilder`
//! (header map storage, auto `Mime-Version`/`Date` insertion, `build()`
//! assembling the MIME tree) extended with the envelope-oriented
//! operations (`SetAddressHeader`, `Reset`, per-message charset/encoding
//! configuration) that a parser-oriented builder doesn't need.

use crate::address::{extract_addr_specs, format_address, join_addresses};
use crate::clock;
use crate::compose;
use crate::date::format_date;
use crate::encodeword::{encode_words, is_plain_ascii, WordEncoder};
use crate::encoding::BodyEncoding;
use crate::error::{MailComposeError, Result};
use crate::file::File;
use crate::headermap::HeaderMap;
use crate::part::Part;
use std::io::Write;

/// In-memory RFC 5322 / MIME message under construction.
pub struct Message {
    headers: HeaderMap,
    parts: Vec<Part>,
    attachments: Vec<File>,
    embedded: Vec<File>,
    charset: String,
    encoding: BodyEncoding,
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

impl Message {
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
            parts: Vec::new(),
            attachments: Vec::new(),
            embedded: Vec::new(),
            charset: "UTF-8".to_string(),
            encoding: BodyEncoding::QuotedPrintable,
        }
    }

    /// `Charset(s)` configuration option.
    pub fn set_charset(&mut self, charset: impl Into<String>) -> &mut Self {
        self.charset = charset.into();
        self
    }

    /// `Encoding(...)` configuration option.
    pub fn set_encoding(&mut self, encoding: BodyEncoding) -> &mut Self {
        self.encoding = encoding;
        self
    }

    fn header_word_encoder(&self) -> WordEncoder {
        WordEncoder::for_charset(&self.charset)
    }

    /// Renders `value` as a header field body: verbatim if plain ASCII
    /// with no CR/LF, else one or more RFC 2047 encoded words.
    fn render_unstructured(&self, value: &str) -> String {
        if is_plain_ascii(value) {
            value.to_string()
        } else {
            encode_words(value, &self.charset, self.header_word_encoder())
        }
    }

    /// `SetHeader(name, values...)`: replaces all prior values. Address
    /// headers set this way are not re-parsed as address lists; use
    /// `set_address_header` for RFC 2047 display-name handling.
    pub fn set_header(&mut self, name: &str, values: &[&str]) -> &mut Self {
        let rendered = values.iter().map(|v| self.render_unstructured(v)).collect();
        self.headers.set(name, rendered);
        self
    }

    /// `SetHeaders(map)`: applies `SetHeader` for each entry, preserving
    /// the order of the provided iterator.
    pub fn set_headers<'a, I>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (&'a str, Vec<&'a str>)>,
    {
        for (name, values) in entries {
            self.set_header(name, &values);
        }
        self
    }

    /// Appends a value without clearing prior ones under `name`.
    pub fn add_header(&mut self, name: &str, value: &str) -> &mut Self {
        let rendered = self.render_unstructured(value);
        self.headers.add(name, rendered);
        self
    }

    /// `GetHeader(name) -> values`. Returns the already-rendered
    /// (possibly RFC 2047 encoded) values.
    pub fn get_header(&self, name: &str) -> Vec<String> {
        self.headers.get(name).map(|v| v.to_vec()).unwrap_or_default()
    }

    /// `SetAddressHeader(name, addr, display)`.
    pub fn set_address_header(&mut self, name: &str, addr: &str, display: Option<&str>) -> &mut Self {
        let formatted = format_address(addr, display, &self.charset);
        self.headers.set(name, vec![formatted]);
        self
    }

    /// Appends one more address to an address-list header, joined with
    /// `", "`, as RFC 5322 address-list fields require.
    pub fn add_address(&mut self, name: &str, addr: &str, display: Option<&str>) -> &mut Self {
        let formatted = format_address(addr, display, &self.charset);
        match self.headers.get(name) {
            Some(existing) if !existing.is_empty() => {
                let joined = join_addresses(existing.iter().cloned().chain([formatted]));
                self.headers.set(name, vec![joined]);
            }
            _ => {
                self.headers.set(name, vec![formatted]);
            }
        }
        self
    }

    /// `SetDateHeader(name, t)`.
    pub fn set_date_header<Tz: chrono::TimeZone>(&mut self, name: &str, t: chrono::DateTime<Tz>) -> &mut Self
    where
        Tz::Offset: std::fmt::Display,
    {
        self.headers.set(name, vec![format_date(t)]);
        self
    }

    /// `FormatAddress(addr, display) -> string`.
    pub fn format_address(&self, addr: &str, display: Option<&str>) -> String {
        format_address(addr, display, &self.charset)
    }

    /// `FormatDate(t) -> string`.
    pub fn format_date<Tz: chrono::TimeZone>(&self, t: chrono::DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format_date(t)
    }

    /// `SetBody(contentType, body, opts...)`: resets parts to a single part.
    pub fn set_body(&mut self, content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> &mut Self {
        self.parts = vec![Part::new(content_type, body)];
        self
    }

    /// `AddAlternative(contentType, body, opts...)`: appends; call order
    /// is emission order: the earliest added alternative is the
    /// least-preferred one a `multipart/alternative`-aware reader picks.
    pub fn add_alternative(&mut self, content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> &mut Self {
        self.parts.push(Part::new(content_type, body));
        self
    }

    /// `AddAlternativeWriter(contentType, writer, opts...)`.
    pub fn add_alternative_writer(
        &mut self,
        content_type: impl Into<String>,
        writer: impl Fn(&mut dyn Write) -> std::io::Result<()> + Send + Sync + 'static,
    ) -> &mut Self {
        self.parts.push(Part::from_writer(content_type, writer));
        self
    }

    /// Appends an already-built `Part`, honoring any per-part encoding
    /// override it carries.
    pub fn add_part(&mut self, part: Part) -> &mut Self {
        self.parts.push(part);
        self
    }

    /// `Attach(file, opts...)`.
    pub fn attach(&mut self, file: File) -> &mut Self {
        self.attachments.push(file);
        self
    }

    /// `Embed(file, opts...)`.
    pub fn embed(&mut self, file: File) -> &mut Self {
        self.embedded.push(file);
        self
    }

    /// `Reset()`: clears parts/files/headers, keeps charset/encoding.
    pub fn reset(&mut self) -> &mut Self {
        self.headers.clear();
        self.parts.clear();
        self.attachments.clear();
        self.embedded.clear();
        self
    }

    /// The envelope sender: the first address parsed out of `From`.
    pub fn envelope_from(&self) -> Option<String> {
        self.headers
            .get("From")
            .and_then(|values| values.first())
            .and_then(|v| extract_addr_specs(v).into_iter().next())
    }

    /// Envelope recipients: `To` + `Cc` + `Bcc`, in that order, in
    /// insertion order within each, not deduplicated.
    pub fn envelope_recipients(&self) -> Vec<String> {
        let mut out = Vec::new();
        for header in ["To", "Cc", "Bcc"] {
            if let Some(values) = self.headers.get(header) {
                for value in values {
                    out.extend(extract_addr_specs(value));
                }
            }
        }
        out
    }

    /// Serializes the message to `sink`, returning the number of bytes
    /// written. `Bcc` is stripped from the header block before writing;
    /// `Mime-Version` and `Date` are inserted if absent.
    pub fn write_to<W: Write>(&self, sink: W) -> Result<(u64, W)> {
        let mut counting = CountingWriter::new(sink);
        let plan = compose::plan_message(&self.parts, &self.embedded, &self.attachments);
        self.write_headers(&plan, &mut counting)?;
        plan.write_body(&self.charset, self.encoding, &mut counting)?;
        Ok((counting.count, counting.inner))
    }

    fn write_headers<W: Write>(&self, plan: &compose::Plan<'_>, out: &mut W) -> Result<()> {
        write_header_line(out, "Mime-Version", "1.0")?;
        if !self.headers.contains("Date") {
            write_header_line(out, "Date", &format_date(clock::now()))?;
        }

        for (name, value) in plan.headers(&self.charset, self.encoding) {
            write_header_line(out, name, &value)?;
        }

        for slot in self.headers.iter() {
            if slot.name().eq_ignore_ascii_case("Bcc") {
                continue; // never part of the serialized header block
            }
            let joined = slot.values().join(", ");
            write_header_line(out, slot.name(), &joined)?;
        }
        out.write_all(b"\r\n").map_err(MailComposeError::Write)
    }
}

fn write_header_line<W: Write>(out: &mut W, name: &str, value: &str) -> Result<()> {
    out.write_all(name.as_bytes())
        .and_then(|_| out.write_all(b": "))
        .and_then(|_| out.write_all(value.as_bytes()))
        .and_then(|_| out.write_all(b"\r\n"))
        .map_err(MailComposeError::Write)
}

struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

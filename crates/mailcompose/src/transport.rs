//! A minimal blocking SMTP dialer.
//!
//! Grounded on `crates/rfc5321/src/client.rs`'s command shape
//! (`MAIL FROM` / `RCPT TO` / `DATA` / dot-stuffing / response-code
//! checking) but reduced to a single blocking `TcpStream`, one recipient
//! loop, no pipelining, no `STARTTLS`, and no connection reuse -- all of
//! which this module does not attempt to provide.

use crate::error::{MailComposeError, Result};
use crate::message::Message;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};

/// The SMTP envelope derived from a `Message`'s address headers: the
/// sender plus the deduplication-free list of `To`+`Cc`+`Bcc`
/// recipients.
pub struct Envelope {
    pub from: String,
    pub recipients: Vec<String>,
}

impl Envelope {
    /// Builds the envelope from a message's `From`/`To`/`Cc`/`Bcc`
    /// headers. Fails if there is no usable `From` address.
    pub fn from_message(message: &Message) -> Result<Self> {
        let from = message
            .envelope_from()
            .ok_or_else(|| MailComposeError::InvalidAddress("From".to_string()))?;
        Ok(Self {
            from,
            recipients: message.envelope_recipients(),
        })
    }
}

/// A connected SMTP session. One instance talks to one server over one
/// connection and is good for exactly one `send` (no pipelining, no
/// connection reuse across messages).
pub struct Transport {
    stream: BufReader<TcpStream>,
}

impl Transport {
    /// Connects to `addr` and reads the server's greeting.
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr).map_err(MailComposeError::Dial)?;
        let mut transport = Self {
            stream: BufReader::new(stream),
        };
        let greeting = transport.read_response()?;
        tracing::trace!("recv<-: {greeting}");
        Ok(transport)
    }

    /// Sends `message` to `envelope.recipients`, one `RCPT TO` at a time.
    pub fn send(&mut self, helo_domain: &str, envelope: &Envelope, message: &Message) -> Result<()> {
        self.command(&format!("EHLO {helo_domain}"), "EHLO")?;
        self.command(&format!("MAIL FROM:<{}>", envelope.from), "MAIL FROM")?;
        for recipient in &envelope.recipients {
            self.command(&format!("RCPT TO:<{recipient}>"), "RCPT TO")?;
        }
        self.command("DATA", "DATA")?;

        let (n, buf) = message.write_to(Vec::new())?;
        tracing::trace!("message body is {n} bytes");
        let stuffed = dot_stuff(&buf);
        self.write_raw(&stuffed)?;
        self.write_raw(b".\r\n")?;
        let response = self.read_response()?;
        tracing::trace!("recv<-: {response}");

        self.command("QUIT", "QUIT")?;
        Ok(())
    }

    fn command(&mut self, line: &str, label: &str) -> Result<()> {
        tracing::trace!("send->: {line}");
        self.write_raw(line.as_bytes())?;
        self.write_raw(b"\r\n")?;
        let response = self.read_response()?;
        tracing::trace!("recv<-: {response}");
        if !response.starts_with("2") && !(label == "DATA" && response.starts_with("354")) {
            return Err(MailComposeError::Rejected {
                command: label.to_string(),
                response,
            });
        }
        Ok(())
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream
            .get_mut()
            .write_all(bytes)
            .map_err(MailComposeError::Dial)
    }

    /// Reads one SMTP response, following multi-line `250-...` / `250 ...`
    /// continuation, and returns the last line's full text.
    fn read_response(&mut self) -> Result<String> {
        let mut last = String::new();
        loop {
            let mut line = String::new();
            self.stream
                .read_line(&mut line)
                .map_err(MailComposeError::Dial)?;
            let trimmed = line.trim_end_matches(['\r', '\n']).to_string();
            let is_last = trimmed.len() < 4 || trimmed.as_bytes()[3] != b'-';
            last = trimmed;
            if is_last {
                return Ok(last);
            }
        }
    }
}

/// RFC 5321 §4.5.2 transparency: a line beginning with `.` gets an extra
/// leading `.`, so the terminating `.\r\n` marker can never be confused
/// with message content.
fn dot_stuff(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut at_line_start = true;
    for &b in data {
        if at_line_start && b == b'.' {
            out.push(b'.');
        }
        out.push(b);
        at_line_start = b == b'\n';
    }
    out
}

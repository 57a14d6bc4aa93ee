//! Streaming base64 encoder: standard alphabet, `=` padding, CRLF every
//! 76 output characters, no trailing CRLF after the final (possibly
//! partial) line.
//!
//! The alphabet lookup itself is delegated to `data_encoding`; only the
//! streaming 3-byte-group buffering and line-wrap bookkeeping is new,
//! because `data_encoding`'s own wrap support operates on a whole buffer
//! rather than an incremental `Write` sink.

use data_encoding::{BASE64, BASE64_NOPAD};
use std::io::{self, Write};

const WRAP_COL: usize = 76;

pub struct Base64Writer<W: Write> {
    inner: W,
    pending: Vec<u8>,
    col: usize,
}

impl<W: Write> Base64Writer<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            pending: Vec::with_capacity(2),
            col: 0,
        }
    }

    fn emit_group(&mut self, chars: &str) -> io::Result<()> {
        if self.col >= WRAP_COL {
            self.inner.write_all(b"\r\n")?;
            self.col = 0;
        }
        self.inner.write_all(chars.as_bytes())?;
        self.col += chars.len();
        Ok(())
    }

    pub fn finish(mut self) -> io::Result<W> {
        if !self.pending.is_empty() {
            let chars = BASE64.encode(&self.pending);
            self.emit_group(&chars)?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for Base64Writer<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut offset = 0;
        // Top up the pending buffer to a full 3-byte group first.
        while self.pending.len() < 3 && offset < buf.len() {
            self.pending.push(buf[offset]);
            offset += 1;
        }
        if self.pending.len() == 3 {
            let chars = BASE64_NOPAD.encode(&self.pending);
            self.emit_group(&chars)?;
            self.pending.clear();
        }

        let remaining = &buf[offset..];
        let whole_groups = remaining.len() / 3;
        for chunk in remaining[..whole_groups * 3].chunks_exact(3) {
            let chars = BASE64_NOPAD.encode(chunk);
            self.emit_group(&chars)?;
        }
        self.pending
            .extend_from_slice(&remaining[whole_groups * 3..]);

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn encode(input: &[u8]) -> Vec<u8> {
        let mut w = Base64Writer::new(Vec::new());
        w.write_all(input).unwrap();
        w.finish().unwrap()
    }

    #[test]
    fn wraps_at_76_columns_with_partial_final_group() {
        let input = vec![b'0'; 58];
        let out = encode(&input);
        let mut expected = "MDAw".repeat(19);
        expected.push_str("\r\nMA==");
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn empty_input_produces_empty_output() {
        assert_eq!(encode(b""), b"");
    }

    #[test]
    fn short_input_no_wrap() {
        assert_eq!(encode(b"hello"), b"aGVsbG8=");
    }

    #[test]
    fn lines_are_exactly_76_chars_except_last() {
        let input = vec![b'x'; 1000];
        let out = encode(&input);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.split("\r\n").collect();
        for line in &lines[..lines.len() - 1] {
            assert_eq!(line.len(), 76);
        }
        assert!(lines.last().unwrap().len() <= 76);
    }

    #[test]
    fn roundtrips_arbitrary_bytes() {
        let input: Vec<u8> = (0u16..256).map(|b| b as u8).collect();
        let encoded = encode(&input);
        let joined: String = String::from_utf8(encoded)
            .unwrap()
            .split("\r\n")
            .collect();
        let decoded = BASE64.decode(joined.as_bytes()).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn incremental_writes_match_single_write() {
        let input = vec![b'q'; 200];
        let mut w = Base64Writer::new(Vec::new());
        for chunk in input.chunks(7) {
            w.write_all(chunk).unwrap();
        }
        let incremental = w.finish().unwrap();
        assert_eq!(incremental, encode(&input));
    }
}

//! RFC 2047 encoded-word production.
//!
//! `Q` and `B` word encoders share the same folding discipline: each
//! encoded-word's `=?CHARSET?E?payload?=` form must not exceed 75 octets,
//! and a fold never splits a UTF-8 multi-byte sequence.

const MAX_WORD_LEN: usize = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordEncoder {
    Q,
    B,
}

impl WordEncoder {
    /// Picks the header word encoder for a charset: `Q` for UTF-8,
    /// `B` otherwise.
    pub fn for_charset(charset: &str) -> Self {
        if charset.eq_ignore_ascii_case("UTF-8") {
            WordEncoder::Q
        } else {
            WordEncoder::B
        }
    }

    fn tag(self) -> &'static str {
        match self {
            WordEncoder::Q => "q",
            WordEncoder::B => "b",
        }
    }
}

/// True when every byte is printable US-ASCII (0x20-0x7E) and there is no
/// CR or LF -- such a value is emitted verbatim.
pub fn is_plain_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// Q-encodes a single byte: printable ASCII passes through verbatim
/// except the three characters with syntactic meaning inside an
/// encoded-word (`=`, `?`, `_`), space becomes `_`, and everything
/// outside printable ASCII (including all non-ASCII bytes) is `=HH`.
fn q_encode_byte(b: u8, out: &mut String) {
    if b == b' ' {
        out.push('_');
    } else if (0x21..=0x7E).contains(&b) && !matches!(b, b'=' | b'?' | b'_') {
        out.push(b as char);
    } else {
        out.push_str(&format!("={:02X}", b));
    }
}

fn q_payload_len(b: u8) -> usize {
    if b == b' ' {
        1
    } else if (0x21..=0x7E).contains(&b) && !matches!(b, b'=' | b'?' | b'_') {
        1
    } else {
        3
    }
}

/// Renders `value` as one or more RFC 2047 encoded-words, folded with
/// `"\r\n "` between words when a single word would exceed 75 octets.
/// Multi-byte UTF-8 sequences are never split across a fold.
pub fn encode_words(value: &str, charset: &str, encoder: WordEncoder) -> String {
    let overhead = 2 + charset.len() + 1 + 1 + 1 + 2; // "=?" CHARSET "?" E "?" ... "?="
    let budget = MAX_WORD_LEN.saturating_sub(overhead);

    let chunks = match encoder {
        WordEncoder::Q => split_q_chunks(value, budget),
        WordEncoder::B => split_b_chunks(value, budget),
    };

    let words: Vec<String> = chunks
        .into_iter()
        .map(|chunk| match encoder {
            WordEncoder::Q => {
                let mut payload = String::new();
                for b in chunk.as_bytes() {
                    q_encode_byte(*b, &mut payload);
                }
                format!("=?{}?{}?{}?=", charset, encoder.tag(), payload)
            }
            WordEncoder::B => {
                let payload = data_encoding::BASE64.encode(chunk.as_bytes());
                format!("=?{}?{}?{}?=", charset, encoder.tag(), payload)
            }
        })
        .collect();

    words.join("\r\n ")
}

/// Splits `value` into chunks whose Q-encoded payload fits within
/// `budget` octets, never splitting a UTF-8 scalar's bytes across chunks.
fn split_q_chunks(value: &str, budget: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for ch in value.chars() {
        let mut buf = [0u8; 4];
        let encoded_bytes = ch.encode_utf8(&mut buf).as_bytes();
        let ch_len: usize = encoded_bytes.iter().map(|b| q_payload_len(*b)).sum();

        if current_len + ch_len > budget && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push(ch);
        current_len += ch_len;
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Splits `value` into chunks whose base64-encoded payload fits within
/// `budget` octets (4 output chars per 3 input bytes), never splitting a
/// UTF-8 scalar's bytes across chunks.
fn split_b_chunks(value: &str, budget: usize) -> Vec<String> {
    // Base64 output length for n input bytes: ceil(n/3)*4.
    let max_input_bytes = (budget / 4) * 3;
    let max_input_bytes = max_input_bytes.max(3); // always make forward progress

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_bytes = 0usize;

    for ch in value.chars() {
        let ch_bytes = ch.len_utf8();
        if current_bytes + ch_bytes > max_input_bytes && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_bytes = 0;
        }
        current.push(ch);
        current_bytes += ch_bytes;
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

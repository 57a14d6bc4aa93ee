//! Attachments and inline-embedded resources.

use crate::encodeword::{encode_words, WordEncoder};
use crate::error::{MailComposeError, Result};
use std::io::Write;
use std::sync::Arc;

/// A `(name, header overrides, copier)` file. The copier must be
/// re-invocable, since a `Message` may be serialized more than once
/// across its lifetime (though at most once per `write_to` call).
#[derive(Clone)]
pub struct File {
    name: String,
    content_type: Option<String>,
    content_disposition: Option<String>,
    content_id: Option<String>,
    encoding: Option<crate::encoding::BodyEncoding>,
    copier: Arc<dyn Fn(&mut dyn Write) -> std::io::Result<()> + Send + Sync>,
}

impl File {
    /// Creates a file whose content is the fixed byte buffer `data`.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let data: Arc<Vec<u8>> = Arc::new(data.into());
        Self {
            name: name.into(),
            content_type: None,
            content_disposition: None,
            content_id: None,
            encoding: None,
            copier: Arc::new(move |w| w.write_all(&data)),
        }
    }

    /// Creates a file backed by an arbitrary re-invocable copier
    /// rather than a fixed byte buffer.
    pub fn from_copier(
        name: impl Into<String>,
        copier: impl Fn(&mut dyn Write) -> std::io::Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            content_disposition: None,
            content_id: None,
            encoding: None,
            copier: Arc::new(copier),
        }
    }

    /// Reads `path` eagerly into memory and returns a file that replays
    /// those bytes. The basename of `path` becomes the display filename.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self::from_bytes(name, data))
    }

    /// `Rename(newName)`: overrides the display filename without
    /// affecting the copier.
    pub fn rename(mut self, new_name: impl Into<String>) -> Self {
        self.name = new_name.into();
        self
    }

    pub fn set_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn set_content_disposition(mut self, disposition: impl Into<String>) -> Self {
        self.content_disposition = Some(disposition.into());
        self
    }

    pub fn set_content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }

    pub fn set_encoding(mut self, encoding: crate::encoding::BodyEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The basename used for `Content-Type; name=` / `Content-Disposition;
    /// filename=`.
    pub fn basename(&self) -> &str {
        self.name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.name)
    }

    fn extension(&self) -> Option<&str> {
        self.basename().rsplit_once('.').map(|(_, ext)| ext)
    }

    /// Resolves the `Content-Type` to use for this file: the caller
    /// override if set, else a guess from the filename extension via the
    /// platform's extension/media-type table, else
    /// `application/octet-stream`.
    pub fn resolved_content_type(&self) -> String {
        if let Some(ct) = &self.content_type {
            return ct.clone();
        }
        self.extension()
            .and_then(guess_media_type)
            .unwrap_or_else(|| "application/octet-stream".to_string())
    }

    pub fn content_disposition_override(&self) -> Option<&str> {
        self.content_disposition.as_deref()
    }

    pub fn content_id_override(&self) -> Option<&str> {
        self.content_id.as_deref()
    }

    pub fn encoding_override(&self) -> Option<crate::encoding::BodyEncoding> {
        self.encoding
    }

    /// Invokes the copier, writing the file's content to `sink`.
    pub fn copy_to(&self, sink: &mut dyn Write) -> Result<()> {
        (self.copier)(sink).map_err(|source| MailComposeError::FileCopier {
            name: self.name.clone(),
            source,
        })
    }
}

impl std::fmt::Debug for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("File")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

fn guess_media_type(extension: &str) -> Option<String> {
    file_type::FileType::from_extension(extension)
        .first()
        .and_then(|ft| ft.media_types().first().map(|mt| mt.to_string()))
}

/// Encodes `filename` for `Content-Disposition`/`Content-Type` per the
/// teacher's own attachment-naming behavior: plain `filename="..."` for
/// ASCII names, RFC 2231 `filename*0*=UTF-8''...` percent-encoded
/// continuation for non-ASCII names (grounded on
/// `crates/mailparsing/src/mimepart.rs`'s `utf8_attachment_name` test).
pub fn encode_filename_parameter(param: &str, filename: &str) -> String {
    if filename.is_ascii() {
        format!("{param}=\"{filename}\"")
    } else {
        let encoded = percent_encode(filename);
        // RFC 2231 continuations are capped per-segment; 40 octets of
        // percent-encoded payload per line keeps folded output readable
        // without implementing full parameter folding.
        const SEGMENT: usize = 40;
        let mut segments = Vec::new();
        let mut current = String::new();
        for triplet in encoded.as_bytes().chunks(3) {
            if current.len() + triplet.len() > SEGMENT && !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            current.push_str(std::str::from_utf8(triplet).unwrap());
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
            .into_iter()
            .enumerate()
            .map(|(i, seg)| {
                if i == 0 {
                    format!("{param}*0*=UTF-8''{seg}")
                } else {
                    format!("{param}*{i}*={seg}")
                }
            })
            .collect::<Vec<_>>()
            .join(";\r\n\t")
    }
}

/// Encodes `filename` for the `Content-Type; name=` parameter: plain
/// quoted for ASCII, an RFC 2047 encoded-word in quotes otherwise.
/// Pairs with an RFC 2231 `filename*` for the same non-ASCII name in
/// `Content-Disposition`.
pub fn encode_name_parameter(filename: &str, charset: &str) -> String {
    if filename.is_ascii() {
        format!("name=\"{filename}\"")
    } else {
        let word = encode_words(filename, charset, WordEncoder::for_charset(charset));
        format!("name=\"{word}\"")
    }
}

fn percent_encode(s: &str) -> String {
    let mut out = String::new();
    for b in s.as_bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(*b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn basename_strips_directories() {
        let f = File::from_bytes("dir/sub/report.pdf", b"x".to_vec());
        assert_eq!(f.basename(), "report.pdf");
    }

    #[test]
    fn default_content_type_is_octet_stream_for_unknown_extension() {
        let f = File::from_bytes("file.zzzzqqqq", b"x".to_vec());
        assert_eq!(f.resolved_content_type(), "application/octet-stream");
    }

    #[test]
    fn caller_override_wins_over_guess() {
        let f = File::from_bytes("x.txt", b"x".to_vec()).set_content_type("application/custom");
        assert_eq!(f.resolved_content_type(), "application/custom");
    }

    #[test]
    fn rename_changes_display_name_only() {
        let f = File::from_bytes("a.txt", b"hello".to_vec()).rename("b.txt");
        assert_eq!(f.basename(), "b.txt");
        let mut out = Vec::new();
        f.copy_to(&mut out).unwrap();
        assert_eq!(out, b"hello");
    }

    #[test]
    fn ascii_filename_is_plain_quoted() {
        assert_eq!(
            encode_filename_parameter("filename", "report.pdf"),
            "filename=\"report.pdf\""
        );
    }

    #[test]
    fn non_ascii_filename_uses_rfc2231_continuation() {
        let encoded = encode_filename_parameter("filename", "日本語.txt");
        assert!(encoded.starts_with("filename*0*=UTF-8''"));
        assert!(encoded.contains("%E6%97%A5"));
    }

    #[test]
    fn non_ascii_name_param_is_encoded_word() {
        let param = encode_name_parameter("日本語.txt", "UTF-8");
        assert!(param.starts_with("name=\"=?UTF-8?q?"));
        assert!(param.ends_with("?=\""));
    }

    #[test]
    fn copier_is_reinvocable() {
        let f = File::from_bytes("a.txt", b"hi".to_vec());
        let mut first = Vec::new();
        let mut second = Vec::new();
        f.copy_to(&mut first).unwrap();
        f.copy_to(&mut second).unwrap();
        assert_eq!(first, second);
    }
}

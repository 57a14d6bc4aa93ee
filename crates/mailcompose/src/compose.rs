//! Multipart tree selection and serialization.
//!
//! Grounded on `crates/mailparsing/src/builder.rs`'s `MessageBuilder::build`,
//! which nests `multipart/alternative` under `multipart/related` under
//! `multipart/mixed` for its fixed `(text, html, amp_html)` + inline +
//! attached slots. This module generalizes the same nesting shape to the
//! ordered `parts`/`embedded`/`attachments` vectors, driven by a small
//! decision table on their counts rather than a fixed three-slot match.

use crate::boundary;
use crate::encoding::{BodyEncoder, BodyEncoding};
use crate::error::Result;
use crate::file::{self, File};
use crate::part::Part;
use std::io::Write;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Embedded,
    Attached,
}

enum Leaf<'a> {
    Part(&'a Part),
    File(&'a File, FileRole),
}

enum Node<'a> {
    Empty,
    Single(Leaf<'a>),
    Multipart {
        subtype: &'static str,
        boundary: String,
        children: Vec<Node<'a>>,
    },
}

/// Builds the MIME tree from the parts/embedded/attachments counts. The
/// nesting falls directly out of the construction, via `match` arms,
/// rather than being chosen by an explicit if/else on `(T, E, A)`.
fn plan<'a>(parts: &'a [Part], embedded: &'a [File], attachments: &'a [File]) -> Node<'a> {
    let content_node = match parts.len() {
        0 => None,
        1 => Some(Node::Single(Leaf::Part(&parts[0]))),
        _ => Some(Node::Multipart {
            subtype: "alternative",
            boundary: boundary::generate(),
            children: parts.iter().map(|p| Node::Single(Leaf::Part(p))).collect(),
        }),
    };

    let related_node = if !embedded.is_empty() {
        let mut children = Vec::new();
        if let Some(n) = content_node {
            children.push(n);
        }
        children.extend(
            embedded
                .iter()
                .map(|f| Node::Single(Leaf::File(f, FileRole::Embedded))),
        );
        Some(Node::Multipart {
            subtype: "related",
            boundary: boundary::generate(),
            children,
        })
    } else {
        content_node
    };

    if !attachments.is_empty() {
        let mut children = Vec::new();
        if let Some(n) = related_node {
            children.push(n);
        }
        children.extend(
            attachments
                .iter()
                .map(|f| Node::Single(Leaf::File(f, FileRole::Attached))),
        );
        Node::Multipart {
            subtype: "mixed",
            boundary: boundary::generate(),
            children,
        }
    } else {
        related_node.unwrap_or(Node::Empty)
    }
}

/// The planned MIME tree for a message, built once and then used both to
/// derive the top-level header block and to write the body, so the two
/// never disagree on a multipart boundary.
pub struct Plan<'a>(Node<'a>);

/// Plans the MIME tree for the given parts/embedded/attachments.
pub fn plan_message<'a>(parts: &'a [Part], embedded: &'a [File], attachments: &'a [File]) -> Plan<'a> {
    Plan(plan(parts, embedded, attachments))
}

impl<'a> Plan<'a> {
    /// The `(name, value)` headers this message's top-level node
    /// contributes to the header block: just `Content-Type` for a
    /// multipart container, or the full leaf header set
    /// (`Content-Type`, `Content-Disposition`, `Content-ID`,
    /// `Content-Transfer-Encoding`) when the whole message is one part.
    /// Empty when there is no body at all.
    pub fn headers(&self, charset: &str, default_part_encoding: BodyEncoding) -> Vec<(&'static str, String)> {
        match &self.0 {
            Node::Empty => Vec::new(),
            Node::Multipart { .. } => {
                vec![("Content-Type", content_type_of(&self.0, charset).unwrap())]
            }
            Node::Single(leaf) => leaf_headers(leaf, charset, default_part_encoding),
        }
    }

    /// Writes everything after the header block's blank line: the
    /// top-level node's own body with no further header emission (those
    /// headers were already written via `headers()`), recursing into any
    /// nested containers with their own `Content-Type` header included.
    pub fn write_body(
        &self,
        charset: &str,
        default_part_encoding: BodyEncoding,
        out: &mut dyn Write,
    ) -> Result<()> {
        write_node(&self.0, charset, default_part_encoding, out, true)
    }
}

/// The top-level `Content-Type` header value for the message, or `None`
/// when there is no body at all (no parts, no embedded files, no
/// attachments).
pub fn top_level_content_type(
    parts: &[Part],
    embedded: &[File],
    attachments: &[File],
    charset: &str,
) -> Option<String> {
    content_type_of(&plan(parts, embedded, attachments), charset)
}

fn content_type_of(node: &Node, charset: &str) -> Option<String> {
    match node {
        Node::Empty => None,
        Node::Multipart {
            subtype, boundary, ..
        } => Some(format!("multipart/{subtype}; boundary=\"{boundary}\"")),
        Node::Single(leaf) => Some(leaf_content_type(leaf, charset)),
    }
}

fn leaf_content_type(leaf: &Leaf, charset: &str) -> String {
    match leaf {
        Leaf::Part(p) => {
            if p.content_type().starts_with("text/") {
                format!("{}; charset=\"{}\"", p.content_type(), charset)
            } else {
                p.content_type().to_string()
            }
        }
        Leaf::File(f, _) => {
            format!(
                "{}; {}",
                f.resolved_content_type(),
                file::encode_name_parameter(f.basename(), charset)
            )
        }
    }
}

fn leaf_encoding(leaf: &Leaf, default_part_encoding: BodyEncoding) -> BodyEncoding {
    match leaf {
        Leaf::Part(p) => p.encoding_override().unwrap_or(default_part_encoding),
        Leaf::File(f, _) => f.encoding_override().unwrap_or(BodyEncoding::Base64),
    }
}

fn leaf_content_disposition(leaf: &Leaf) -> Option<String> {
    match leaf {
        Leaf::Part(_) => None,
        Leaf::File(f, role) => Some(match f.content_disposition_override() {
            Some(cd) => cd.to_string(),
            None => {
                let kind = match role {
                    FileRole::Attached => "attachment",
                    FileRole::Embedded => "inline",
                };
                format!(
                    "{kind}; {}",
                    file::encode_filename_parameter("filename", f.basename())
                )
            }
        }),
    }
}

fn leaf_content_id(leaf: &Leaf) -> Option<String> {
    match leaf {
        Leaf::Part(_) => None,
        Leaf::File(f, FileRole::Attached) => f.content_id_override().map(|s| s.to_string()),
        Leaf::File(f, FileRole::Embedded) => Some(
            f.content_id_override()
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("<{}>", f.basename())),
        ),
    }
}

/// The `(name, value)` headers a leaf contributes to whatever header
/// block precedes it: `Content-Type`, then an optional
/// `Content-Disposition`, then an optional `Content-ID`, then always
/// `Content-Transfer-Encoding`.
fn leaf_headers(leaf: &Leaf, charset: &str, default_part_encoding: BodyEncoding) -> Vec<(&'static str, String)> {
    let mut headers = vec![("Content-Type", leaf_content_type(leaf, charset))];
    if let Some(cd) = leaf_content_disposition(leaf) {
        headers.push(("Content-Disposition", cd));
    }
    if let Some(cid) = leaf_content_id(leaf) {
        headers.push(("Content-ID", cid));
    }
    let encoding = leaf_encoding(leaf, default_part_encoding);
    headers.push(("Content-Transfer-Encoding", encoding.header_value().to_string()));
    headers
}

fn write_leaf_body(leaf: &Leaf, default_part_encoding: BodyEncoding, out: &mut dyn Write) -> Result<()> {
    let encoding = leaf_encoding(leaf, default_part_encoding);
    let mut encoder = BodyEncoder::new(encoding, out);
    match leaf {
        Leaf::Part(p) => p.write_body(&mut encoder)?,
        Leaf::File(f, _) => f.copy_to(&mut encoder)?,
    }
    encoder
        .finish()
        .map_err(crate::error::MailComposeError::Write)?;
    Ok(())
}

fn write_leaf(
    leaf: &Leaf,
    charset: &str,
    default_part_encoding: BodyEncoding,
    out: &mut dyn Write,
) -> Result<()> {
    for (name, value) in leaf_headers(leaf, charset, default_part_encoding) {
        write_crlf_line(out, &format!("{name}: {value}"))?;
    }
    out.write_all(b"\r\n")
        .map_err(crate::error::MailComposeError::Write)?;
    write_leaf_body(leaf, default_part_encoding, out)
}

fn write_crlf_line(out: &mut dyn Write, line: &str) -> Result<()> {
    out.write_all(line.as_bytes())
        .and_then(|_| out.write_all(b"\r\n"))
        .map_err(crate::error::MailComposeError::Write)
}

/// `is_top` marks the node whose own headers (a single leaf's full
/// header set, or a container's `Content-Type`) were already written by
/// the caller as part of the message's header block; every other node
/// writes its own headers in place, immediately before its body or its
/// first child boundary line.
fn write_node(
    node: &Node,
    charset: &str,
    default_part_encoding: BodyEncoding,
    out: &mut dyn Write,
    is_top: bool,
) -> Result<()> {
    match node {
        Node::Empty => Ok(()),
        Node::Single(leaf) => {
            if is_top {
                write_leaf_body(leaf, default_part_encoding, out)
            } else {
                write_leaf(leaf, charset, default_part_encoding, out)
            }
        }
        Node::Multipart {
            boundary, children, ..
        } => {
            if !is_top {
                let content_type = content_type_of(node, charset).unwrap();
                write_crlf_line(out, &format!("Content-Type: {content_type}"))?;
                out.write_all(b"\r\n")
                    .map_err(crate::error::MailComposeError::Write)?;
            }
            for child in children {
                write_crlf_line(out, &format!("--{boundary}"))?;
                write_node(child, charset, default_part_encoding, out, false)?;
                out.write_all(b"\r\n")
                    .map_err(crate::error::MailComposeError::Write)?;
            }
            write_crlf_line(out, &format!("--{boundary}--"))
        }
    }
}

/// Writes the message body (everything after the header block's blank
/// line) for the given parts/embedded/attachments. The caller is
/// responsible for having already written the blank line that separates
/// headers from body; for `Node::Empty` that blank line is the entire
/// body. With no parts, embedded files, or attachments, that blank
/// line is the entire body.
pub fn write_body(
    parts: &[Part],
    embedded: &[File],
    attachments: &[File],
    charset: &str,
    default_part_encoding: BodyEncoding,
    out: &mut dyn Write,
) -> Result<()> {
    let node = plan(parts, embedded, attachments);
    write_node(&node, charset, default_part_encoding, out, true)
}

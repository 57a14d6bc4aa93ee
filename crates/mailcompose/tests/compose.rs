use mailcompose::{BodyEncoding, File, Message, Part};

fn render(msg: &Message) -> String {
    let (written, buf) = msg.write_to(Vec::new()).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(written as usize, text.len());
    text
}

#[test]
fn plain_text_message_round_trips_headers_and_body() {
    let mut msg = Message::new();
    msg.set_header("Subject", &["hello there"]);
    msg.set_address_header("From", "me@example.com", Some("Me"));
    msg.set_address_header("To", "you@example.com", None);
    msg.set_body("text/plain", "hi there");

    let out = render(&msg);
    assert!(out.contains("Subject: hello there\r\n"));
    assert!(out.contains("From: Me <me@example.com>\r\n"));
    assert!(out.contains("To: you@example.com\r\n"));
    assert!(out.contains("Content-Type: text/plain; charset=\"UTF-8\"\r\n"));
    assert!(out.contains("Content-Transfer-Encoding: quoted-printable\r\n"));
    assert!(out.ends_with("\r\n\r\nhi there"));
}

#[test]
fn alternative_text_and_html_with_embedded_image_and_attachment() {
    let mut msg = Message::new();
    msg.set_address_header("From", "me@example.com", None);
    msg.set_address_header("To", "you@example.com", None);
    msg.set_header("Subject", &["report"]);
    msg.set_body("text/plain", "see attached");
    msg.add_alternative("text/html", "<p>see <img src=\"cid:logo.png\"></p>");
    msg.embed(File::from_bytes("logo.png", b"\x89PNG\r\n".to_vec()));
    msg.attach(File::from_bytes("report.pdf", b"%PDF-1.4 ...".to_vec()));

    let out = render(&msg);

    assert!(out.contains("Content-Type: multipart/mixed; boundary=\""));
    assert!(out.contains("Content-Type: multipart/related; boundary=\""));
    assert!(out.contains("Content-Type: multipart/alternative; boundary=\""));
    assert!(out.contains("Content-Disposition: inline; filename=\"logo.png\""));
    assert!(out.contains("Content-ID: <logo.png>"));
    assert!(out.contains("Content-Disposition: attachment; filename=\"report.pdf\""));
    assert!(out.contains("Content-Type: application/pdf; name=\"report.pdf\""));

    // three nested multipart boundaries, each opened and closed exactly once
    for marker in ["mixed", "related", "alternative"] {
        let content_type_needle = format!("multipart/{marker}; boundary=\"");
        let start = out.find(&content_type_needle).unwrap() + content_type_needle.len();
        let boundary: String = out[start..].chars().take_while(|&c| c != '"').collect();
        let opener = format!("--{boundary}\r\n");
        let closer = format!("--{boundary}--\r\n");
        assert!(out.matches(&opener).count() >= 1);
        assert_eq!(out.matches(&closer).count(), 1);
    }
}

#[test]
fn bcc_never_appears_in_the_serialized_header_block() {
    let mut msg = Message::new();
    msg.set_address_header("From", "me@example.com", None);
    msg.set_header("To", &["you@example.com"]);
    msg.set_header("Bcc", &["shadow@example.com"]);
    msg.set_body("text/plain", "hi");

    assert_eq!(
        msg.envelope_recipients(),
        vec!["you@example.com".to_string(), "shadow@example.com".to_string()]
    );
    let out = render(&msg);
    assert!(!out.to_lowercase().contains("bcc"));
}

#[test]
fn non_ascii_subject_is_q_encoded_without_breaking_a_multibyte_char() {
    let mut msg = Message::new();
    msg.set_header(
        "Subject",
        &["a very long subject line meant to force RFC 2047 folding across words señor"],
    );
    msg.set_body("text/plain", "hi");
    let out = render(&msg);
    let subject_line = out.lines().find(|l| l.starts_with("Subject:")).unwrap();
    assert!(subject_line.starts_with("Subject: =?UTF-8?q?"));
    // every encoded word must stand alone as valid UTF-8 once decoded,
    // i.e. no '=XY' escape got split across two encoded words.
    for word in subject_line.split_whitespace().filter(|w| w.starts_with("=?UTF-8?q?")) {
        assert!(word.ends_with("?="));
    }
}

#[test]
fn base64_attachment_body_wraps_at_76_columns() {
    let mut msg = Message::new();
    msg.set_address_header("From", "me@example.com", None);
    msg.set_body("text/plain", "see attached");
    msg.attach(File::from_bytes("data.bin", vec![0u8; 300]));

    let out = render(&msg);
    let body_start = out.find("Content-Transfer-Encoding: base64\r\n\r\n").unwrap()
        + "Content-Transfer-Encoding: base64\r\n\r\n".len();
    let rest = &out[body_start..];
    let body_end = rest.find("\r\n--").unwrap_or(rest.len());
    for line in rest[..body_end].split("\r\n") {
        assert!(line.len() <= 76, "line too long: {} chars", line.len());
    }
}

#[test]
fn caller_supplied_part_encoding_override_is_honored() {
    let mut msg = Message::new();
    msg.add_part(Part::new("text/plain", "raw 8bit body é".as_bytes().to_vec()).with_encoding(BodyEncoding::Unencoded));
    let out = render(&msg);
    assert!(out.contains("Content-Transfer-Encoding: 8bit\r\n"));
}

#[test]
fn reset_allows_reusing_a_message_builder_for_a_second_message() {
    let mut msg = Message::new();
    msg.set_header("Subject", &["first"]);
    msg.set_body("text/plain", "first body");
    let first = render(&msg);
    assert!(first.contains("first body"));

    msg.reset();
    msg.set_header("Subject", &["second"]);
    msg.set_body("text/plain", "second body");
    let second = render(&msg);
    assert!(second.contains("second body"));
    assert!(!second.contains("first"));
}

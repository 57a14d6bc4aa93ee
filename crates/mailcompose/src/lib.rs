//! RFC 5322 / MIME message composition.
//!
//! Builds an [`Message`] header-by-header and part-by-part, then
//! serializes it as SMTP-ready bytes via [`Message::write_to`], choosing
//! the right `multipart/*` nesting and header encodings along the way.
//! With the `transport` feature (on by default), [`transport::Transport`]
//! adds a minimal blocking dialer for handing the result to an SMTP
//! server.

mod address;
mod boundary;
mod clock;
mod compose;
mod date;
mod encodeword;
mod encoding;
mod error;
mod file;
mod headermap;
mod message;
mod part;

#[cfg(feature = "transport")]
mod transport;

pub use encoding::BodyEncoding;
pub use error::{MailComposeError, Result};
pub use file::File;
pub use message::Message;
pub use part::Part;

#[cfg(feature = "transport")]
pub use transport::{Envelope, Transport};

use thiserror::Error;

/// Errors surfaced by message composition, serialization and transport.
#[derive(Error, Debug)]
pub enum MailComposeError {
    #[error("error writing to the output sink")]
    Write(#[source] std::io::Error),

    #[error("part '{content_type}' writer failed: {source}")]
    PartWriter {
        content_type: String,
        #[source]
        source: std::io::Error,
    },

    #[error("file '{name}' copier failed: {source}")]
    FileCopier {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("message has no body and no attachments to serialize a Content-Type for")]
    EmptyBody,

    #[error("address '{0}' has no local/domain part")]
    InvalidAddress(String),

    #[cfg(feature = "transport")]
    #[error("transport dial failed: {0}")]
    Dial(#[source] std::io::Error),

    #[cfg(feature = "transport")]
    #[error("SMTP server rejected {command}: {response}")]
    Rejected { command: String, response: String },
}

pub type Result<T> = std::result::Result<T, MailComposeError>;

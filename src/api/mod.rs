pub mod http;

#[cfg(test)]
pub(crate) mod fake;

use thiserror::Error;

use crate::domain::email::{Email, EmailId, EmailPatch, Mailbox, OutgoingEmail};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server answered {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// The mail server's HTTP surface.
pub trait MailApi: Send + Sync {
    /// `GET /emails/{mailbox}`, in server order.
    fn list_mailbox(&self, mailbox: Mailbox) -> Result<Vec<Email>, ApiError>;

    /// `GET /emails/{id}`
    fn get_email(&self, id: EmailId) -> Result<Email, ApiError>;

    /// `PUT /emails/{id}`
    fn update_email(&self, id: EmailId, patch: EmailPatch) -> Result<(), ApiError>;

    /// `POST /emails`
    fn send_email(&self, email: &OutgoingEmail) -> Result<(), ApiError>;
}

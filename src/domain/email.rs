use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub type EmailId = u64;

const REPLY_PREFIX: &str = "Re: ";

/// An email as the server returns it. Never cached between views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub id: EmailId,
    pub sender: String,
    #[serde(deserialize_with = "recipients_from_str_or_list")]
    pub recipients: String,
    pub subject: String,
    pub body: String,
    pub timestamp: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Recipients {
    Joined(String),
    List(Vec<String>),
}

fn recipients_from_str_or_list<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Recipients::deserialize(de)? {
        Recipients::Joined(s) => s,
        Recipients::List(v) => v.join(", "),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mailbox {
    #[default]
    Inbox,
    Sent,
    Archive,
}

impl Mailbox {
    pub const ALL: [Mailbox; 3] = [Mailbox::Inbox, Mailbox::Sent, Mailbox::Archive];

    /// Path segment used in `GET /emails/{mailbox}`.
    pub fn as_str(self) -> &'static str {
        match self {
            Mailbox::Inbox => "inbox",
            Mailbox::Sent => "sent",
            Mailbox::Archive => "archive",
        }
    }

    /// Panel header text.
    pub fn title(self) -> String {
        capitalize(self.as_str())
    }

    /// Rows listed from this mailbox render as read regardless of the flag.
    pub fn always_read(self) -> bool {
        matches!(self, Mailbox::Sent | Mailbox::Archive)
    }

    /// Sent mail cannot be archived from the detail view.
    pub fn allows_archive(self) -> bool {
        self != Mailbox::Sent
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown mailbox '{0}' (expected inbox, sent or archive)")]
pub struct UnknownMailbox(pub String);

impl FromStr for Mailbox {
    type Err = UnknownMailbox;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inbox" => Ok(Mailbox::Inbox),
            "sent" => Ok(Mailbox::Sent),
            "archive" | "archived" => Ok(Mailbox::Archive),
            _ => Err(UnknownMailbox(s.to_string())),
        }
    }
}

/// Uppercases the first character, leaves the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Body of `POST /emails`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub recipients: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    /// Draft answering `original`: addressed to its sender, subject prefixed
    /// with "Re: " once, body quoting the original on one line.
    pub fn reply_to(original: &Email) -> Self {
        let subject = if original.subject.starts_with(REPLY_PREFIX) {
            original.subject.clone()
        } else {
            format!("{REPLY_PREFIX}{}", original.subject)
        };
        Self {
            recipients: original.sender.clone(),
            subject,
            body: format!(
                "On {} {} wrote: {}",
                original.timestamp, original.sender, original.body
            ),
        }
    }
}

/// Partial body of `PUT /emails/{id}`; only the changed flag is sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

impl EmailPatch {
    pub fn mark_read() -> Self {
        Self {
            read: Some(true),
            archived: None,
        }
    }

    pub fn set_archived(archived: bool) -> Self {
        Self {
            read: None,
            archived: Some(archived),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_email(id: EmailId) -> Email {
    Email {
        id,
        sender: "alice@example.com".into(),
        recipients: "bob@example.com".into(),
        subject: "Meeting".into(),
        body: "See you at 10".into(),
        timestamp: "Jan 02 2024, 10:00 AM".into(),
        read: false,
        archived: false,
    }
}

use anyhow::{Result, anyhow};
use log::debug;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use crate::api::{ApiError, MailApi};
use crate::domain::email::{Email, EmailId, EmailPatch, Mailbox, OutgoingEmail};

/// Identifies the view generation a request was issued from.
pub type RequestToken = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    ListMailbox(Mailbox),
    FetchEmail { id: EmailId, mailbox: Mailbox },
    MarkRead(EmailId),
    SetArchived { id: EmailId, archived: bool },
    Send(OutgoingEmail),
}

/// A job plus the token of the view that queued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub token: RequestToken,
    pub job: Job,
}

/// Typed result of each job kind.
#[derive(Debug)]
pub enum Completion {
    Listed {
        mailbox: Mailbox,
        result: Result<Vec<Email>, ApiError>,
    },
    Fetched {
        mailbox: Mailbox,
        result: Result<Email, ApiError>,
    },
    MarkedRead {
        id: EmailId,
        result: Result<(), ApiError>,
    },
    Archived {
        id: EmailId,
        archived: bool,
        result: Result<(), ApiError>,
    },
    Sent {
        result: Result<(), ApiError>,
    },
}

#[derive(Debug)]
pub struct Reply {
    pub token: RequestToken,
    pub completion: Completion,
}

impl Ticket {
    /// Runs the job to completion on the calling thread.
    pub fn run(self, api: &dyn MailApi) -> Reply {
        debug!("running {:?} (token {})", self.job, self.token);
        let completion = match self.job {
            Job::ListMailbox(mailbox) => Completion::Listed {
                mailbox,
                result: api.list_mailbox(mailbox),
            },
            Job::FetchEmail { id, mailbox } => Completion::Fetched {
                mailbox,
                result: api.get_email(id),
            },
            Job::MarkRead(id) => Completion::MarkedRead {
                id,
                result: api.update_email(id, EmailPatch::mark_read()),
            },
            Job::SetArchived { id, archived } => Completion::Archived {
                id,
                archived,
                result: api.update_email(id, EmailPatch::set_archived(archived)),
            },
            Job::Send(email) => Completion::Sent {
                result: api.send_email(&email),
            },
        };
        Reply {
            token: self.token,
            completion,
        }
    }
}

/// Background thread executing tickets one at a time, in submission order.
pub struct Worker {
    tx: Sender<Ticket>,
    rx: Receiver<Reply>,
}

impl Worker {
    pub fn spawn(api: Box<dyn MailApi>) -> Result<Self> {
        let (ticket_tx, ticket_rx) = mpsc::channel::<Ticket>();
        let (reply_tx, reply_rx) = mpsc::channel::<Reply>();

        thread::Builder::new()
            .name("mail-worker".into())
            .spawn(move || {
                for ticket in ticket_rx {
                    if reply_tx.send(ticket.run(api.as_ref())).is_err() {
                        break;
                    }
                }
                debug!("mail worker stopped");
            })?;

        Ok(Self {
            tx: ticket_tx,
            rx: reply_rx,
        })
    }

    pub fn submit(&self, ticket: Ticket) -> Result<()> {
        self.tx
            .send(ticket)
            .map_err(|_| anyhow!("mail worker is gone"))
    }

    /// Next finished reply, if any, without blocking.
    pub fn try_recv(&self) -> Result<Option<Reply>> {
        match self.rx.try_recv() {
            Ok(reply) => Ok(Some(reply)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(anyhow!("mail worker is gone")),
        }
    }
}

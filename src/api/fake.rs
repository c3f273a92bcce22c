use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::{ApiError, MailApi};
use crate::domain::email::{Email, EmailId, EmailPatch, Mailbox, OutgoingEmail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(Mailbox),
    Get(EmailId),
    Put(EmailId, EmailPatch),
    Post(OutgoingEmail),
}

/// In-memory server that records every call it receives.
#[derive(Default)]
pub struct FakeMailApi {
    pub mailboxes: HashMap<Mailbox, Vec<Email>>,
    pub fail_mutations: bool,
    pub fail_listing: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeMailApi {
    pub fn with_mailbox(mut self, mailbox: Mailbox, emails: Vec<Email>) -> Self {
        self.mailboxes.insert(mailbox, emails);
        self
    }

    pub fn failing_mutations(mut self) -> Self {
        self.fail_mutations = true;
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn puts(&self) -> Vec<(EmailId, EmailPatch)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Put(id, patch) => Some((id, patch)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn mutation_result(&self) -> Result<(), ApiError> {
        if self.fail_mutations {
            Err(ApiError::Status {
                status: 500,
                message: "Internal Server Error".into(),
            })
        } else {
            Ok(())
        }
    }
}

impl MailApi for FakeMailApi {
    fn list_mailbox(&self, mailbox: Mailbox) -> Result<Vec<Email>, ApiError> {
        self.record(Call::List(mailbox));
        if self.fail_listing {
            return Err(ApiError::Status {
                status: 500,
                message: "Internal Server Error".into(),
            });
        }
        Ok(self.mailboxes.get(&mailbox).cloned().unwrap_or_default())
    }

    fn get_email(&self, id: EmailId) -> Result<Email, ApiError> {
        self.record(Call::Get(id));
        self.mailboxes
            .values()
            .flatten()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: "Email not found.".into(),
            })
    }

    fn update_email(&self, id: EmailId, patch: EmailPatch) -> Result<(), ApiError> {
        self.record(Call::Put(id, patch));
        self.mutation_result()
    }

    fn send_email(&self, email: &OutgoingEmail) -> Result<(), ApiError> {
        self.record(Call::Post(email.clone()));
        self.mutation_result()
    }
}

use log::{debug, error, info};
use ratatui::widgets::ListState;

use crate::api::ApiError;
use crate::domain::email::{Email, EmailId, Mailbox, OutgoingEmail};
use crate::terminal::compose::ComposeForm;
use crate::worker::{Completion, Job, Reply, RequestToken, Ticket};

/// The three mutually exclusive panels; exactly one is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Emails,
    Compose,
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxRow {
    pub email: Email,
    /// Local flag, flipped on open without waiting for the server.
    pub read: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailAction {
    Reply,
    Archive,
    Unarchive,
}

impl DetailAction {
    pub fn label(self) -> &'static str {
        match self {
            DetailAction::Reply => "Reply",
            DetailAction::Archive => "Archive",
            DetailAction::Unarchive => "Unarchive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub email: Email,
    /// Mailbox the email was opened from.
    pub mailbox: Mailbox,
    pub actions: Vec<DetailAction>,
    pub scroll: u16,
}

impl DetailView {
    fn new(email: Email, mailbox: Mailbox) -> Self {
        let mut actions = vec![DetailAction::Reply];
        if mailbox.allows_archive() {
            // label reflects the flag at fetch time
            actions.push(if email.archived {
                DetailAction::Unarchive
            } else {
                DetailAction::Archive
            });
        }
        Self {
            email,
            mailbox,
            actions,
            scroll: 0,
        }
    }

    pub fn archive_action(&self) -> Option<DetailAction> {
        self.actions
            .iter()
            .copied()
            .find(|a| *a != DetailAction::Reply)
    }
}

/// Mailbox view controller: panel switching, listing, detail, compose.
///
/// Operations never touch the network themselves. They queue [`Ticket`]s
/// (see [`AppState::take_outbox`]) stamped with the current view token, and
/// the results come back through [`AppState::apply`]. Every view change
/// bumps the token, so replies issued for a view the user already left are
/// dropped.
pub struct AppState {
    pub panel: Panel,
    /// Mailbox of the last listing.
    pub mailbox: Mailbox,
    pub header: String,
    pub rows: Vec<MailboxRow>,
    pub list_state: ListState,

    pub detail: Option<DetailView>,
    pub compose: ComposeForm,

    /// A request for the active view is in flight.
    pub loading: bool,
    /// Last failure shown to the user.
    pub banner: Option<String>,

    token: RequestToken,
    outbox: Vec<Ticket>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            panel: Panel::Emails,
            mailbox: Mailbox::Inbox,
            header: Mailbox::Inbox.title(),
            rows: vec![],
            list_state: ListState::default(),
            detail: None,
            compose: ComposeForm::default(),
            loading: false,
            banner: None,
            token: 0,
            outbox: vec![],
        }
    }

    pub fn token(&self) -> RequestToken {
        self.token
    }

    /// Tickets queued since the last call, oldest first.
    pub fn take_outbox(&mut self) -> Vec<Ticket> {
        std::mem::take(&mut self.outbox)
    }

    pub fn show_view(&mut self, panel: Panel) {
        self.panel = panel;
    }

    fn next_view(&mut self) {
        self.token += 1;
        self.banner = None;
        self.loading = false;
    }

    fn queue(&mut self, job: Job) {
        debug!("queue {job:?} (token {})", self.token);
        self.outbox.push(Ticket {
            token: self.token,
            job,
        });
    }

    // ----- Listing -----

    pub fn load_mailbox(&mut self, mailbox: Mailbox) {
        self.next_view();
        self.show_view(Panel::Emails);
        self.mailbox = mailbox;
        self.header = mailbox.title();
        self.rows.clear();
        self.list_state.select(None);
        self.detail = None;
        self.loading = true;
        self.queue(Job::ListMailbox(mailbox));
    }

    pub fn reload(&mut self) {
        self.load_mailbox(self.mailbox);
    }

    fn show_listing(&mut self, mailbox: Mailbox, emails: Vec<Email>) {
        // server order is kept as-is
        self.rows = emails
            .into_iter()
            .map(|email| MailboxRow {
                read: email.read || mailbox.always_read(),
                email,
            })
            .collect();
        self.list_state
            .select(if self.rows.is_empty() { None } else { Some(0) });
    }

    pub fn move_selection(&mut self, delta: i32) {
        if self.rows.is_empty() {
            self.list_state.select(None);
            return;
        }
        let cur = self.list_state.selected().unwrap_or(0) as i32;
        let len = self.rows.len() as i32;
        let next = (cur + delta).clamp(0, len - 1) as usize;
        self.list_state.select(Some(next));
    }

    pub fn select_first(&mut self) {
        if !self.rows.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.rows.is_empty() {
            self.list_state.select(Some(self.rows.len() - 1));
        }
    }

    // ----- Detail -----

    pub fn open_selected(&mut self) {
        let Some(idx) = self.list_state.selected() else {
            return;
        };
        let Some(row) = self.rows.get_mut(idx) else {
            return;
        };
        row.read = true;
        let id = row.email.id;
        self.view_email(id, self.mailbox);
    }

    pub fn view_email(&mut self, id: EmailId, mailbox: Mailbox) {
        self.next_view();
        self.loading = true;
        self.queue(Job::FetchEmail { id, mailbox });
    }

    fn show_detail(&mut self, email: Email, mailbox: Mailbox) {
        self.show_view(Panel::Detail);
        let unread = (!email.read).then_some(email.id);
        self.detail = Some(DetailView::new(email, mailbox));
        // rendering does not wait for this
        if let Some(id) = unread {
            self.mark_as_read(id);
        }
    }

    pub fn mark_as_read(&mut self, id: EmailId) {
        self.queue(Job::MarkRead(id));
    }

    pub fn toggle_archive(&mut self) {
        if self.panel != Panel::Detail || self.loading {
            return;
        }
        let Some(detail) = &self.detail else {
            return;
        };
        if detail.archive_action().is_none() {
            return;
        }
        let job = Job::SetArchived {
            id: detail.email.id,
            archived: !detail.email.archived,
        };
        self.loading = true;
        self.queue(job);
    }

    pub fn scroll_body(&mut self, delta: i32) {
        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        if delta < 0 {
            detail.scroll = detail.scroll.saturating_sub(delta.unsigned_abs() as u16);
        } else {
            detail.scroll = detail.scroll.saturating_add(delta as u16);
        }
    }

    /// Leaves detail or compose for the mailbox the user came from.
    pub fn back(&mut self) {
        let mailbox = self
            .detail
            .as_ref()
            .map(|d| d.mailbox)
            .unwrap_or(self.mailbox);
        self.load_mailbox(mailbox);
    }

    // ----- Compose -----

    pub fn compose_email(&mut self) {
        self.next_view();
        self.show_view(Panel::Compose);
        self.detail = None;
        self.compose.clear();
    }

    pub fn reply(&mut self) {
        let Some(draft) = self
            .detail
            .as_ref()
            .map(|d| OutgoingEmail::reply_to(&d.email))
        else {
            return;
        };
        self.compose_email();
        self.compose.prefill(draft);
    }

    pub fn send_email(&mut self) {
        if self.panel != Panel::Compose || self.loading {
            return;
        }
        self.banner = None;
        self.loading = true;
        self.queue(Job::Send(self.compose.draft.clone()));
    }

    // ----- Replies -----

    fn is_stale(&self, token: RequestToken) -> bool {
        if token == self.token {
            return false;
        }
        debug!(
            "dropping reply for token {token}, active view is {}",
            self.token
        );
        true
    }

    fn fail(&mut self, context: String, err: &ApiError) {
        self.banner = Some(format!("{context}: {err}"));
    }

    pub fn apply(&mut self, reply: Reply) {
        let token = reply.token;
        match reply.completion {
            Completion::MarkedRead { id, result } => match result {
                Ok(()) => info!("Email {id} marked as read"),
                Err(e) => error!("Failed to mark email {id} as read: {e}"),
            },

            Completion::Listed { mailbox, result } => {
                if let Err(e) = &result {
                    error!("Error loading {mailbox}: {e}");
                }
                if self.is_stale(token) {
                    return;
                }
                self.loading = false;
                match result {
                    Ok(emails) => self.show_listing(mailbox, emails),
                    Err(e) => self.fail(format!("Could not load {}", mailbox.title()), &e),
                }
            }

            Completion::Fetched { mailbox, result } => {
                if let Err(e) = &result {
                    error!("Error loading email: {e}");
                }
                if self.is_stale(token) {
                    return;
                }
                self.loading = false;
                match result {
                    Ok(email) => self.show_detail(email, mailbox),
                    Err(e) => self.fail("Could not open email".into(), &e),
                }
            }

            Completion::Archived {
                id,
                archived,
                result,
            } => {
                let verb = if archived { "archive" } else { "unarchive" };
                match &result {
                    Ok(()) => info!("Email {id} {verb}d"),
                    Err(e) => error!("Failed to {verb} email {id}: {e}"),
                }
                if self.is_stale(token) {
                    return;
                }
                self.loading = false;
                match result {
                    Ok(()) => self.load_mailbox(Mailbox::Archive),
                    Err(e) => self.fail(format!("Could not {verb} email"), &e),
                }
            }

            Completion::Sent { result } => {
                match &result {
                    Ok(()) => info!("Email sent successfully"),
                    Err(e) => error!("Error sending email: {e}"),
                }
                if self.is_stale(token) {
                    return;
                }
                self.loading = false;
                match result {
                    Ok(()) => self.load_mailbox(Mailbox::Sent),
                    Err(e) => self.fail("Could not send email".into(), &e),
                }
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

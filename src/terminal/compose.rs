use crate::domain::email::OutgoingEmail;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeField {
    #[default]
    Recipients,
    Subject,
    Body,
}

impl ComposeField {
    pub const ALL: [ComposeField; 3] = [
        ComposeField::Recipients,
        ComposeField::Subject,
        ComposeField::Body,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ComposeField::Recipients => "To",
            ComposeField::Subject => "Subject",
            ComposeField::Body => "Body",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ComposeField::Recipients => ComposeField::Subject,
            ComposeField::Subject => ComposeField::Body,
            ComposeField::Body => ComposeField::Recipients,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ComposeField::Recipients => ComposeField::Body,
            ComposeField::Subject => ComposeField::Recipients,
            ComposeField::Body => ComposeField::Subject,
        }
    }
}

/// What a key press in the form asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Escape,
}

/// The three compose inputs and which one has the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeForm {
    pub draft: OutgoingEmail,
    pub focus: ComposeField,
}

impl ComposeForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Replaces every field; the cursor goes to the body for replies.
    pub fn prefill(&mut self, draft: OutgoingEmail) {
        self.draft = draft;
        self.focus = ComposeField::Body;
    }

    pub fn value(&self, field: ComposeField) -> &str {
        match field {
            ComposeField::Recipients => &self.draft.recipients,
            ComposeField::Subject => &self.draft.subject,
            ComposeField::Body => &self.draft.body,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            ComposeField::Recipients => &mut self.draft.recipients,
            ComposeField::Subject => &mut self.draft.subject,
            ComposeField::Body => &mut self.draft.body,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    /// Newline in the body, next field elsewhere.
    pub fn enter(&mut self) {
        if self.focus == ComposeField::Body {
            self.draft.body.push('\n');
        } else {
            self.focus = self.focus.next();
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = ComposeForm::default();
        "a@b.com".chars().for_each(|c| form.insert_char(c));
        form.enter();
        "Hi".chars().for_each(|c| form.insert_char(c));
        form.enter();
        "Hello".chars().for_each(|c| form.insert_char(c));
        form.enter();
        form.insert_char('!');

        assert_eq!(form.draft.recipients, "a@b.com");
        assert_eq!(form.draft.subject, "Hi");
        assert_eq!(form.draft.body, "Hello\n!");
        assert_eq!(form.focus, ComposeField::Body);
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = ComposeForm::default();
        form.focus_prev();
        assert_eq!(form.focus, ComposeField::Body);
        form.focus_next();
        assert_eq!(form.focus, ComposeField::Recipients);
    }

    #[test]
    fn clear_resets_everything() {
        let mut form = ComposeForm::default();
        form.prefill(OutgoingEmail {
            recipients: "x@y.z".into(),
            subject: "s".into(),
            body: "b".into(),
        });
        form.backspace();
        assert_eq!(form.draft.body, "");

        form.clear();
        assert_eq!(form, ComposeForm::default());
    }
}

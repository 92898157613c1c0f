use crate::domain::models::Task;

/// Long-lived modal state: which task, if any, is currently being authored.
///
/// `Editing` holds a snapshot cloned at open time, never a reference into the
/// store's live collection, so a background refresh or mutation cannot change
/// a form mid-edit. Every state is reachable from every other; opening over
/// an existing session simply replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Closed,
    Creating,
    Editing(Task),
}

impl EditSession {
    pub fn open_create(&mut self) {
        *self = EditSession::Creating;
    }

    pub fn open_edit(&mut self, task: &Task) {
        *self = EditSession::Editing(task.clone());
    }

    pub fn close(&mut self) {
        *self = EditSession::Closed;
    }

    /// Called after a save or delete is confirmed. A failed submission must
    /// NOT call this; the form keeps its pre-submit state.
    pub fn finish(&mut self) {
        *self = EditSession::Closed;
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, EditSession::Closed)
    }

    pub fn editing(&self) -> Option<&Task> {
        match self {
            EditSession::Editing(task) => Some(task),
            _ => None,
        }
    }
}

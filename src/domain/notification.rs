//! Mutation outcomes and the text sent to connected clients for each.

use std::fmt;

use serde::Serialize;

use super::EntityKind;

/// Outcome of a write attempt against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationEvent {
    /// A record was inserted.
    Created,
    /// A record was updated.
    Updated,
    /// A record was removed.
    Deleted,
    /// An update was attempted but did not apply.
    UpdateFailed,
    /// A delete was attempted but did not apply.
    DeleteFailed,
}

/// What the notification talks about: the record's name when the record
/// is at hand, otherwise the id the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// Record name.
    Name(String),
    /// Requested id.
    Id(i64),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// One notification, rendered to text by [`Notification::message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Mutation outcome.
    pub event: MutationEvent,
    /// Kind of the record involved.
    pub kind: EntityKind,
    /// Name or id of the record involved.
    pub subject: Subject,
}

impl Notification {
    /// Builds a notification.
    #[must_use]
    pub const fn new(event: MutationEvent, kind: EntityKind, subject: Subject) -> Self {
        Self {
            event,
            kind,
            subject,
        }
    }

    /// Renders the human-readable text broadcast to clients.
    #[must_use]
    pub fn message(&self) -> String {
        let Self {
            event,
            kind,
            subject,
        } = self;
        match event {
            MutationEvent::Created => {
                format!("{kind} {subject} successfully added to {kind} list")
            }
            MutationEvent::Updated => format!("{kind} {subject} successfully updated"),
            MutationEvent::Deleted => format!("{kind} {subject} successfully deleted"),
            MutationEvent::UpdateFailed => format!("Failed to update {kind} {subject}"),
            MutationEvent::DeleteFailed => format!("Failed to delete {kind} {subject}"),
        }
    }
}

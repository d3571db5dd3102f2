//! Stored record snapshots and the inputs that produce them.

use chrono::{DateTime, Utc};

use super::EntityKind;

/// Immutable snapshot of one stored row, as returned by the store.
///
/// `parent_id` is `None` for countries and holds `country_id` / `city_id`
/// for cities and streets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Kind of the row.
    pub kind: EntityKind,
    /// Store-assigned identifier, unique within the kind.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Parent reference, if the kind has one.
    pub parent_id: Option<i64>,
    /// Set once on insert.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every update.
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied on create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    /// Display name.
    pub name: String,
    /// Parent reference. Required for cities and streets, ignored for
    /// countries.
    pub parent_id: Option<i64>,
}

/// Partial update. A `None` field leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement parent reference.
    pub parent_id: Option<i64>,
}

impl RecordPatch {
    /// Applies the present fields to `record` and bumps `updated_at`.
    pub fn apply_to(&self, record: &mut Record, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            record.name.clone_from(name);
        }
        if record.kind.parent().is_some()
            && let Some(parent_id) = self.parent_id
        {
            record.parent_id = Some(parent_id);
        }
        record.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city() -> Record {
        let at = Utc::now();
        Record {
            kind: EntityKind::City,
            id: 3,
            name: "Roma".to_string(),
            parent_id: Some(1),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut record = city();
        let before = record.clone();
        let patch = RecordPatch {
            name: Some("Rome".to_string()),
            parent_id: None,
        };
        let later = before.updated_at + chrono::Duration::seconds(5);
        patch.apply_to(&mut record, later);

        assert_eq!(record.name, "Rome");
        assert_eq!(record.parent_id, before.parent_id);
        assert_eq!(record.created_at, before.created_at);
        assert_eq!(record.updated_at, later);
    }

    #[test]
    fn parent_ignored_for_country() {
        let at = Utc::now();
        let mut record = Record {
            kind: EntityKind::Country,
            id: 1,
            name: "Italy".to_string(),
            parent_id: None,
            created_at: at,
            updated_at: at,
        };
        let patch = RecordPatch {
            name: None,
            parent_id: Some(9),
        };
        patch.apply_to(&mut record, at);
        assert_eq!(record.parent_id, None);
    }
}

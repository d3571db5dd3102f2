//! Entity kind discriminator and its table mapping.
//!
//! [`EntityKind`] is the single place that knows how a kind maps onto a
//! table, which kind is its parent, and which column holds the parent
//! reference. The store and the API layer are written once against it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three record types in the hierarchy
/// (country → city → street).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Top-level record, no parent.
    Country,
    /// Belongs to a country.
    City,
    /// Belongs to a city.
    Street,
}

impl EntityKind {
    /// All kinds, parents before children.
    pub const ALL: [Self; 3] = [Self::Country, Self::City, Self::Street];

    /// Lower-case label used in routes, notifications and log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::City => "city",
            Self::Street => "street",
        }
    }

    /// Backing table name.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Country => "countries",
            Self::City => "cities",
            Self::Street => "streets",
        }
    }

    /// Kind referenced by this kind's parent column, if any.
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::Country => None,
            Self::City => Some(Self::Country),
            Self::Street => Some(Self::City),
        }
    }

    /// Kind whose parent column references this kind, if any.
    #[must_use]
    pub const fn child(self) -> Option<Self> {
        match self {
            Self::Country => Some(Self::City),
            Self::City => Some(Self::Street),
            Self::Street => None,
        }
    }

    /// Name of the parent reference column (`country_id` / `city_id`).
    #[must_use]
    pub const fn parent_column(self) -> Option<&'static str> {
        match self {
            Self::Country => None,
            Self::City => Some("country_id"),
            Self::Street => Some("city_id"),
        }
    }

    /// Whether names must be unique within this kind.
    #[must_use]
    pub const fn has_unique_name(self) -> bool {
        matches!(self, Self::Country | Self::City)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_and_child_are_inverse() {
        for kind in EntityKind::ALL {
            if let Some(parent) = kind.parent() {
                assert_eq!(parent.child(), Some(kind));
            }
            if let Some(child) = kind.child() {
                assert_eq!(child.parent(), Some(kind));
            }
        }
    }

    #[test]
    fn parent_column_present_iff_parent() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.parent().is_some(), kind.parent_column().is_some());
        }
    }

    #[test]
    fn display_matches_label() {
        assert_eq!(EntityKind::Country.to_string(), "country");
        assert_eq!(EntityKind::Street.table(), "streets");
    }
}

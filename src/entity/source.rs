// ABOUTME: ObjectSource provenance tag for entities
// ABOUTME: Encodes id-presence, divergence-from-store, and persistence-state facts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Provenance of an entity, fixed at construction.
///
/// The tag encodes three orthogonal facts: whether an id must already be
/// assigned, whether the entity may differ from what the store holds, and
/// whether a row for it is actually present in the store. Save dispatch
/// keys off this tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ObjectSource {
    /// Loaded verbatim from a database row
    Database,
    /// Built from an external import source; id not yet assigned
    Import,
    /// Built from a backup being restored; keeps its original id
    Restore,
    /// Created from user input; id not yet assigned
    UserNew,
    /// An edit of an existing row
    DbEdit,
    /// Derived, non-persisted aggregate
    Computed,
    /// Shipped with the application, present in the store from first run
    Inbuilt,
}

impl ObjectSource {
    /// Whether an assigned id is required at construction
    #[must_use]
    pub const fn requires_id(&self) -> bool {
        matches!(
            self,
            Self::Database | Self::Restore | Self::DbEdit | Self::Inbuilt
        )
    }

    /// Whether the entity may differ from what the store holds
    #[must_use]
    pub const fn may_differ_from_store(&self) -> bool {
        !matches!(self, Self::Database | Self::Inbuilt)
    }

    /// Whether a row for this entity is already present in the store
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        matches!(self, Self::Database | Self::DbEdit | Self::Inbuilt)
    }

    /// Convert to string for logs and storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Import => "import",
            Self::Restore => "restore",
            Self::UserNew => "user_new",
            Self::DbEdit => "db_edit",
            Self::Computed => "computed",
            Self::Inbuilt => "inbuilt",
        }
    }
}

impl Display for ObjectSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ObjectSource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "database" => Ok(Self::Database),
            "import" => Ok(Self::Import),
            "restore" => Ok(Self::Restore),
            "user_new" => Ok(Self::UserNew),
            "db_edit" => Ok(Self::DbEdit),
            "computed" => Ok(Self::Computed),
            "inbuilt" => Ok(Self::Inbuilt),
            _ => Err(AppError::invalid_input(format!(
                "Invalid object source: {s}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_presence_matches_provenance() {
        for source in [
            ObjectSource::Database,
            ObjectSource::Restore,
            ObjectSource::DbEdit,
            ObjectSource::Inbuilt,
        ] {
            assert!(source.requires_id(), "{source} should require an id");
        }
        for source in [
            ObjectSource::UserNew,
            ObjectSource::Import,
            ObjectSource::Computed,
        ] {
            assert!(!source.requires_id(), "{source} should not require an id");
        }
    }

    #[test]
    fn round_trips_through_str() {
        for source in [
            ObjectSource::Database,
            ObjectSource::Import,
            ObjectSource::Restore,
            ObjectSource::UserNew,
            ObjectSource::DbEdit,
            ObjectSource::Computed,
            ObjectSource::Inbuilt,
        ] {
            assert_eq!(source.as_str().parse::<ObjectSource>().unwrap(), source);
        }
    }
}

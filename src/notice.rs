// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Non-fatal diagnostics raised while citing repositories.
///
/// Notices never change the outcome of a citation request. Each one is
/// logged through `tracing` when raised and returned to the caller.
use std::fmt;

use serde::Serialize;
use tracing::warn;

/// Non-fatal diagnostic surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// A requested alias resolved to a repository that was already selected.
    DuplicateAlias {
        /// Redundant alias.
        alias:      String,
        /// Repository both aliases refer to.
        repository: String
    },
    /// The fetched metadata has no `type` key.
    MissingType {
        /// Repository whose metadata lacks a type.
        repository: String
    },
    /// A metadata key is not used by the entry type being built.
    UnusedField {
        /// Repository the metadata came from.
        repository: String,
        /// Dropped key.
        field:      String,
        /// Entry type that was built.
        entry_type: String
    },
    /// A repository was left out of a best-effort batch.
    Skipped {
        /// Repository that failed.
        repository: String,
        /// Rendered error message.
        reason:     String
    }
}

impl Notice {
    /// Logs the notice at warning level and returns it.
    pub(crate) fn emit(self) -> Self {
        warn!("{self}");
        self
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateAlias {
                alias,
                repository
            } => write!(
                f,
                "'{alias}' refers to {repository}, which is already being cited; ignoring the \
                 duplicate"
            ),
            Self::MissingType {
                repository
            } => write!(
                f,
                "{repository} has no citation type data; the reference may not be generated \
                 correctly"
            ),
            Self::UnusedField {
                repository,
                field,
                entry_type
            } => write!(
                f,
                "{repository}: the key {field} is not used for entries of type {entry_type}"
            ),
            Self::Skipped {
                repository,
                reason
            } => write!(f, "skipping {repository}: {reason}")
        }
    }
}

#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the citation crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.

use std::path::{Path, PathBuf};

/// Unified error type returned by entry construction, rendering, repository
/// resolution, and the CLI.
///
/// Variants in the first group are citation failures and abort the citation
/// of the repository in question. The remaining variants wrap I/O, decoding,
/// and remote-service failures around the citation core.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// The citation key contains characters outside `[A-Za-z0-9_:-]`.
    #[error(
        "citation key '{key}' is not valid; citation keys may only contain alphanumeric \
         characters, '_', '-', and ':'"
    )]
    InvalidCiteKey {
        /// Rejected key.
        key: String
    },
    /// The raw mapping declares a type that differs from the schema in use.
    #[error("attempting to read reference of type '{found}' into '{expected}'")]
    TypeMismatch {
        /// Tag of the schema being built.
        expected: String,
        /// Tag declared by the metadata.
        found:    String
    },
    /// A schema-mandated field has no value.
    #[error("did not receive value for required field: {field}")]
    MissingRequiredField {
        /// Name of the missing field.
        field: String
    },
    /// Author data is neither a mapping nor a sequence of mappings.
    #[error("invalid author format: {message}")]
    InvalidAuthorFormat {
        /// Description of the offending shape and, for sequences, its index.
        message: String
    },
    /// No schema or renderer is registered for the requested type.
    #[error("no renderer available for citation type '{entry_type}'")]
    UnsupportedEntryType {
        /// The unsupported tag, or `<none>` when the metadata had no type.
        entry_type: String
    },
    /// More than one repository claims the same tool alias.
    #[error("tool alias '{alias}' is claimed by multiple repositories: {repositories}")]
    AmbiguousAlias {
        /// Requested alias.
        alias:        String,
        /// Comma separated names of the claiming repositories.
        repositories: String
    },
    /// No repository is known by the requested alias.
    #[error("no citable repository is known by '{alias}'")]
    UnknownTool {
        /// Requested alias.
        alias: String
    },
    /// The requested output format or output file extension is not known.
    #[error("unsupported output format: {message}")]
    UnsupportedFormat {
        /// Human readable description of the rejected format.
        message: String
    },
    /// A fatal error raised while citing a specific repository.
    #[error("failed to cite {repository}: {source}")]
    Citation {
        /// Repository whose citation failed.
        repository: String,
        /// Underlying failure.
        source:     Box<Error>
    },
    /// Wraps I/O errors that occur while reading or writing files.
    #[error("failed to access {path:?}: {source}")]
    Io {
        /// Location of the file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse YAML: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Wraps serialization errors when writing machine-readable output.
    #[error("failed to serialize listing: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Wraps I/O errors raised while writing to standard output.
    #[error("failed to write output: {source}")]
    Write {
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Returned when a configuration document violates invariants.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Failures reported by the remote citation source.
    #[error("failed to fetch citation metadata: {message}")]
    Fetch {
        /// Human readable message describing the failure.
        message: String
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a fetch error from the provided displayable value.
    pub fn fetch<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Fetch {
            message: message.into()
        }
    }

    /// Constructs an author format error from the provided displayable value.
    pub fn invalid_author<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::InvalidAuthorFormat {
            message: message.into()
        }
    }

    /// Constructs an unsupported format error from the provided displayable
    /// value.
    pub fn unsupported_format<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::UnsupportedFormat {
            message: message.into()
        }
    }

    /// Attaches the name of the repository being cited.
    pub fn in_repository(self, repository: &str) -> Self {
        Self::Citation {
            repository: repository.to_owned(),
            source:     Box::new(self)
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// This method is primarily intended for CLI contexts where the variant
    /// name does not add value to end users. The returned string matches the
    /// [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

impl From<masterror::AppError> for Error {
    fn from(error: masterror::AppError) -> Self {
        Self::Fetch {
            message: error.to_string()
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

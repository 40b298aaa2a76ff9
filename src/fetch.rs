// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Retrieval of citation metadata for repositories.
///
/// [`GitHubSource`] reads the citation file through the GitHub contents API.
/// [`InMemorySource`] serves pre-loaded documents, which keeps the
/// orchestrator usable offline and in tests.
use std::{collections::HashMap, future::Future};

use masterror::AppError;
use octocrab::Octocrab;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::{author::shape_of, error::Error, repository::Repository};

/// Provider of raw citation metadata.
///
/// Implementations perform a single attempt per call; retries are not part
/// of the contract.
pub trait CitationSource {
    /// Fetches and decodes the citation metadata of `repository`.
    fn fetch(&self, repository: &Repository) -> impl Future<Output = Result<Mapping, Error>>;
}

/// Reads citation files from GitHub.
#[derive(Debug, Clone)]
pub struct GitHubSource {
    client: Octocrab
}

impl GitHubSource {
    /// Creates an unauthenticated GitHub client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] when the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, Error> {
        let client = Octocrab::builder().build().map_err(|e| {
            AppError::service(format!("failed to initialize GitHub client: {e}"))
        })?;
        Ok(Self::with_client(client))
    }

    /// Wraps an existing client.
    pub fn with_client(client: Octocrab) -> Self {
        Self {
            client
        }
    }
}

impl CitationSource for GitHubSource {
    async fn fetch(&self, repository: &Repository) -> Result<Mapping, Error> {
        debug!("Fetching {}", repository.citation_url());

        let contents = self
            .client
            .repos(repository.org(), repository.name())
            .get_content()
            .path(repository.path())
            .r#ref(repository.branch())
            .send()
            .await
            .map_err(|e| {
                AppError::service(format!(
                    "failed to fetch {} from {}@{}: {e}",
                    repository.path(),
                    repository.url(),
                    repository.branch()
                ))
            })?;

        let document = contents
            .items
            .into_iter()
            .next()
            .and_then(|item| item.decoded_content())
            .ok_or_else(|| {
                Error::fetch(format!(
                    "{} has no readable {} on branch {}",
                    repository.url(),
                    repository.path(),
                    repository.branch()
                ))
            })?;

        parse_citation(&document)
    }
}

/// Serves citation documents held in memory, keyed by repository name.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    documents: HashMap<String, Mapping>
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the metadata returned for the named repository.
    pub fn insert(&mut self, repository: impl Into<String>, metadata: Mapping) {
        self.documents.insert(repository.into(), metadata);
    }

    /// Parses `document` as YAML and registers it for the named repository.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`parse_citation`].
    pub fn insert_yaml(&mut self, repository: impl Into<String>, document: &str) -> Result<(), Error> {
        let metadata = parse_citation(document)?;
        self.insert(repository, metadata);
        Ok(())
    }
}

impl CitationSource for InMemorySource {
    async fn fetch(&self, repository: &Repository) -> Result<Mapping, Error> {
        self.documents
            .get(repository.name())
            .cloned()
            .ok_or_else(|| Error::fetch(format!("no citation metadata for {}", repository.name())))
    }
}

/// Decodes a citation document, which must be a YAML mapping.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed YAML and [`Error::Fetch`] when the
/// document is valid YAML but not a mapping.
///
/// # Examples
///
/// ```
/// use citeref::parse_citation;
///
/// let metadata = parse_citation("type: software\ntitle: demo\n").expect("mapping");
/// assert_eq!(metadata.get("type").and_then(|value| value.as_str()), Some("software"));
/// assert!(parse_citation("- not\n- a mapping\n").is_err());
/// ```
pub fn parse_citation(document: &str) -> Result<Mapping, Error> {
    match serde_yaml::from_str::<Value>(document)? {
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(Error::fetch(format!(
            "citation metadata must be a mapping, not a {}",
            shape_of(&other)
        )))
    }
}

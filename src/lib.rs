//! Reference generation for BrainGlobe tools from their `CITATION.cff`
//! metadata.
//!
//! The library resolves requested tool aliases to GitHub repositories, fetches
//! their citation metadata, validates it against per-type field schemas, and
//! renders BibTeX blocks or plain-text references. Construction errors are
//! reported through a single [`Error`] type, while recoverable diagnostics are
//! collected as [`Notice`] values alongside the rendered output.

mod author;
mod cite;
mod cite_key;
mod config;
mod entry;
mod error;
mod fetch;
mod format;
mod notice;
mod registry;
mod render;
mod repository;
mod schema;

pub use author::{AUTHOR_SEPARATOR, normalize_authors};
pub use cite::{
    BatchPolicy, CitationReport, CiteOptions, DEFAULT_NEWLINE_SEPARATIONS, PREFERRED_CITATION_KEY,
    cite, cite_mapping, render_citations,
};
pub use cite_key::CiteKey;
pub use config::{CatalogConfig, RepositoryEntry, load_catalog, parse_repositories};
pub use entry::{BuildOptions, CitationEntry, FieldValue, TYPE_KEY};
pub use error::{Error, io_error};
pub use fetch::{CitationSource, GitHubSource, InMemorySource, parse_citation};
pub use format::{OutputFormat, OutputTarget, resolve_output};
pub use notice::Notice;
pub use registry::{EntryType, lookup, supported_types};
pub use render::{BIBTEX_INDENT, render_bibtex, render_text};
pub use repository::{
    DEFAULT_BRANCH, DEFAULT_CITATION_PATH, DEFAULT_ORG, Repository, RepositoryCatalog, Resolution,
};
pub use schema::{ARTICLE, MISC, SOFTWARE, Schema, schema_for};

// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Explicit table of the entry types that can be cited.
//!
//! Adding a new entry type means defining its [`Schema`] and appending a row
//! to [`REGISTERED`]; nothing else dispatches on the tag.

use std::collections::BTreeSet;

use serde_yaml::Mapping;

use crate::{
    entry::{BuildOptions, CitationEntry},
    error::Error,
    schema::{ARTICLE, SOFTWARE, Schema},
};

/// Registered entry type bundling its tag and schema.
#[derive(Debug,)]
pub struct EntryType
{
    /// Tag matched against the `type` key of citation metadata.
    pub tag:    &'static str,
    /// Schema used to validate and render entries of this type.
    pub schema: &'static Schema,
}

impl EntryType
{
    /// Builds a citation entry of this type from raw metadata.
    ///
    /// # Errors
    ///
    /// Propagates every construction error of [`CitationEntry::build`].
    pub fn build(
        &self,
        raw: &Mapping,
        cite_key: &str,
        options: BuildOptions,
    ) -> Result<CitationEntry, Error,>
    {
        CitationEntry::build(raw, cite_key, self.schema, options,)
    }
}

static REGISTERED: &[EntryType] = &[
    EntryType {
        tag: ARTICLE.entry_type, schema: &ARTICLE,
    },
    EntryType {
        tag: SOFTWARE.entry_type, schema: &SOFTWARE,
    },
];

/// Returns the entry type registered under `tag`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedEntryType`] naming the tag when nothing is
/// registered for it.
pub fn lookup(tag: &str,) -> Result<&'static EntryType, Error,>
{
    REGISTERED.iter().find(|entry_type| entry_type.tag == tag,).ok_or_else(|| {
        Error::UnsupportedEntryType {
            entry_type: tag.to_owned(),
        }
    },)
}

/// Enumerates every registered entry type tag.
///
/// # Examples
///
/// ```
/// use citeref::supported_types;
///
/// let tags: Vec<_> = supported_types().into_iter().collect();
/// assert_eq!(tags, ["article", "software"]);
/// ```
pub fn supported_types() -> BTreeSet<&'static str,>
{
    REGISTERED.iter().map(|entry_type| entry_type.tag,).collect()
}

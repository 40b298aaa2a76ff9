// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Field schemas for the citation entry types.
//!
//! Each schema lists the required and optional field names of one entry type
//! in the order they are rendered. Schemas are plain data; the set of
//! schemas that can actually be requested is the entry type registry.

use crate::registry;

/// Required and optional field names of one citation entry type.
#[derive(Debug, PartialEq, Eq,)]
pub struct Schema
{
    /// Entry type tag, also used as the BibTeX entry type.
    pub entry_type: &'static str,
    /// Fields that must be present, in rendering order.
    pub required:   &'static [&'static str],
    /// Fields that may be present, in rendering order.
    pub optional:   &'static [&'static str],
}

impl Schema
{
    /// Returns `true` when the field is required or optional in this schema.
    pub fn accepts(&self, field: &str,) -> bool
    {
        self.required.contains(&field,) || self.optional.contains(&field,)
    }

    /// Iterates over every field, required fields first.
    pub fn fields(&self,) -> impl Iterator<Item = &'static str,> + '_
    {
        self.required.iter().chain(self.optional.iter(),).copied()
    }
}

/// Journal and magazine articles.
pub const ARTICLE: Schema = Schema {
    entry_type: "article",
    required:   &["author", "title", "journal", "year",],
    optional:   &[
        "volume",
        "number",
        "pages",
        "month",
        "note",
        "doi",
        "issn",
        "zblnumber",
        "eprint",
    ],
};

/// Software packages and source repositories.
pub const SOFTWARE: Schema = Schema {
    entry_type: "software",
    required:   &["author", "title", "url", "year",],
    optional:   &[
        "abstract",
        "date",
        "doi",
        "eprint",
        "eprintclass",
        "eprinttype",
        "file",
        "hal_id",
        "hal_version",
        "institution",
        "license",
        "month",
        "note",
        "organization",
        "publisher",
        "related",
        "relatedtype",
        "relatedstring",
        "repository",
        "swhid",
        "urldate",
        "version",
    ],
};

/// Type-agnostic schema used by the text format when metadata has no type.
///
/// Not registered: BibTeX output always needs a declared entry type.
pub const MISC: Schema = Schema {
    entry_type: "misc",
    required:   &["author", "title", "year",],
    optional:   &[
        "journal",
        "volume",
        "number",
        "pages",
        "publisher",
        "organization",
        "institution",
        "version",
        "doi",
        "url",
    ],
};

/// Returns the schema registered for the entry type tag.
///
/// # Examples
///
/// ```
/// use citeref::schema_for;
///
/// let schema = schema_for("article",).expect("article is registered",);
/// assert_eq!(schema.required, &["author", "title", "journal", "year"]);
/// assert!(schema_for("book",).is_none());
/// ```
pub fn schema_for(entry_type: &str,) -> Option<&'static Schema,>
{
    registry::lookup(entry_type,).ok().map(|registered| registered.schema,)
}

#[cfg(test)]
mod tests
{
    use std::collections::HashSet;

    use super::{ARTICLE, MISC, SOFTWARE, Schema, schema_for};

    fn assert_disjoint(schema: &Schema,)
    {
        let required: HashSet<_,> = schema.required.iter().collect();
        for field in schema.optional {
            assert!(
                !required.contains(field),
                "{} lists {field} as both required and optional",
                schema.entry_type
            );
        }
        assert!(!schema.required.is_empty());
    }

    #[test]
    fn schemas_keep_required_and_optional_disjoint()
    {
        assert_disjoint(&ARTICLE,);
        assert_disjoint(&SOFTWARE,);
        assert_disjoint(&MISC,);
    }

    #[test]
    fn schema_for_returns_registered_schemas()
    {
        assert_eq!(schema_for("article"), Some(&ARTICLE));
        assert_eq!(schema_for("software"), Some(&SOFTWARE));
    }

    #[test]
    fn schema_for_ignores_unregistered_tags()
    {
        assert!(schema_for("misc").is_none());
        assert!(schema_for("Article").is_none());
    }

    #[test]
    fn fields_lists_required_before_optional()
    {
        let fields: Vec<_,> = ARTICLE.fields().collect();
        assert_eq!(&fields[..4], ARTICLE.required);
        assert_eq!(fields.len(), ARTICLE.required.len() + ARTICLE.optional.len());
        assert!(ARTICLE.accepts("doi"));
        assert!(!ARTICLE.accepts("url"));
    }
}

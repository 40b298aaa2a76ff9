// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Normalization of CITATION.cff author records into a display string.
//!
//! CFF stores authors as a mapping (one author) or a sequence of mappings,
//! each carrying `given-names` and `family-names` for people or `name` for
//! entities. BibTeX expects a single string with authors separated by
//! `" and "`.

use serde_yaml::Value;

use crate::error::Error;

/// Separator placed between authors, as BibTeX expects.
pub const AUTHOR_SEPARATOR: &str = " and ";

/// Converts a raw author value into the joined display string.
///
/// # Errors
///
/// Returns [`Error::InvalidAuthorFormat`] when the value is neither a mapping
/// nor a sequence of mappings, when a sequence element is not a mapping, or
/// when an author record carries no usable name.
///
/// # Examples
///
/// ```
/// use citeref::normalize_authors;
///
/// let single: serde_yaml::Value =
///     serde_yaml::from_str("{given-names: T., family-names: Ester}",).expect("valid YAML",);
/// assert_eq!(normalize_authors(&single,).expect("valid author",), "T. Ester");
/// ```
pub fn normalize_authors(value: &Value,) -> Result<String, Error,>
{
    match value {
        Value::Mapping(_,) => format_author(value, None,),
        Value::Sequence(authors,) => {
            let mut names = Vec::with_capacity(authors.len(),);
            for (index, author,) in authors.iter().enumerate() {
                if !author.is_mapping() {
                    return Err(Error::invalid_author(format!(
                        "expected author {index} to be a mapping but it was a {}",
                        shape_of(author,)
                    ),),);
                }
                names.push(format_author(author, Some(index,),)?,);
            }
            Ok(names.join(AUTHOR_SEPARATOR,),)
        }
        other => Err(Error::invalid_author(format!(
            "expected author to be either a mapping or a sequence of mappings, not {}",
            shape_of(other,)
        ),),),
    }
}

fn format_author(author: &Value, index: Option<usize,>,) -> Result<String, Error,>
{
    let given = name_part(author, "given-names",);
    let family = name_part(author, "family-names",);

    match (given, family,) {
        (Some(given,), Some(family,),) => Ok(format!("{given} {family}"),),
        (None, Some(family,),) => Ok(family,),
        _ => name_part(author, "name",).ok_or_else(|| {
            let position = index.map_or_else(String::new, |index| format!(" {index}"),);
            Error::invalid_author(format!(
                "author{position} has neither given-names and family-names nor a name"
            ),)
        },),
    }
}

fn name_part(author: &Value, key: &str,) -> Option<String,>
{
    match author.get(key,)? {
        Value::String(text,) => {
            let trimmed = text.trim();
            if trimmed.is_empty() { None } else { Some(trimmed.to_owned(),) }
        }
        Value::Number(number,) => Some(number.to_string(),),
        _ => None,
    }
}

/// Short name of a YAML value's shape, used in error messages.
pub(crate) fn shape_of(value: &Value,) -> &'static str
{
    match value {
        Value::Null => "null",
        Value::Bool(_,) => "bool",
        Value::Number(_,) => "number",
        Value::String(_,) => "string",
        Value::Sequence(_,) => "sequence",
        Value::Mapping(_,) => "mapping",
        Value::Tagged(_,) => "tagged value",
    }
}

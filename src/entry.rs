// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Validated citation entries built from raw CITATION.cff mappings.
//!
//! Construction is staged: the raw mapping is validated against a
//! [`Schema`], every field is resolved, and only then is an immutable
//! [`CitationEntry`] returned. A failing build never exposes a partially
//! populated entry.

use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::{
    author::{normalize_authors, shape_of},
    cite_key::CiteKey,
    error::Error,
    schema::Schema,
};

/// Metadata key carrying the entry type tag.
pub const TYPE_KEY: &str = "type";
const AUTHOR_FIELD: &str = "author";
/// CFF spelling of the author list.
const CFF_AUTHORS_KEY: &str = "authors";
const YEAR_FIELD: &str = "year";
/// CFF release date, used to derive `year` when it is not given explicitly.
const CFF_DATE_RELEASED_KEY: &str = "date-released";

/// Value of one schema field.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub enum FieldValue
{
    /// The field was supplied. The string may be empty.
    Present(String,),
    /// The field was not supplied and is omitted from rendered output.
    Absent,
}

impl FieldValue
{
    /// Returns the value when present.
    pub fn as_deref(&self,) -> Option<&str,>
    {
        match self {
            Self::Present(value,) => Some(value.as_str(),),
            Self::Absent => None,
        }
    }

    /// Returns `true` for [`FieldValue::Absent`].
    pub fn is_absent(&self,) -> bool
    {
        matches!(self, Self::Absent)
    }
}

/// Options controlling entry construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq,)]
pub struct BuildOptions
{
    /// Warn about metadata keys that no schema field uses.
    pub warn_on_unused: bool,
}

/// Immutable, validated citation entry.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct CitationEntry
{
    schema:   &'static Schema,
    cite_key: CiteKey,
    /// One value per schema field, aligned with [`Schema::fields`].
    values:   Vec<FieldValue,>,
    ignored:  Vec<String,>,
}

impl CitationEntry
{
    /// Builds an entry from raw metadata.
    ///
    /// The `type` key, when present, must equal the schema tag and is not
    /// stored. Keys the schema does not know are dropped; with
    /// [`BuildOptions::warn_on_unused`] each one is logged and recorded in
    /// [`ignored_fields`](Self::ignored_fields).
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidCiteKey`] when the key has disallowed characters.
    /// * [`Error::TypeMismatch`] when `type` names another entry type.
    /// * [`Error::MissingRequiredField`] naming the first required field
    ///   without a value.
    /// * [`Error::InvalidAuthorFormat`] when the author value cannot be
    ///   normalized.
    ///
    /// # Examples
    ///
    /// ```
    /// use citeref::{ARTICLE, BuildOptions, CitationEntry};
    ///
    /// let raw: serde_yaml::Mapping = serde_yaml::from_str(
    ///     "{author: {given-names: T., family-names: Ester}, title: testing, journal: tested, year: 2000}",
    /// )
    /// .expect("valid YAML",);
    /// let entry = CitationEntry::build(&raw, "TESTING123", &ARTICLE, BuildOptions::default(),)
    ///     .expect("valid entry",);
    /// assert_eq!(entry.value("author"), Some("T. Ester"));
    /// ```
    pub fn build(
        raw: &Mapping,
        cite_key: &str,
        schema: &'static Schema,
        options: BuildOptions,
    ) -> Result<Self, Error,>
    {
        let cite_key = CiteKey::parse(cite_key,)?;
        let fields: Vec<&'static str,> = schema.fields().collect();
        let mut assigned: Vec<Option<&Value,>,> = vec![None; fields.len()];
        let mut ignored = Vec::new();
        let has_explicit_author = raw.contains_key(AUTHOR_FIELD,);

        for (key, value,) in raw {
            let Some(key,) = key.as_str() else {
                record_unused(&mut ignored, &describe_key(key,), schema, options,);
                continue;
            };

            if key == TYPE_KEY {
                check_type(value, schema,)?;
                continue;
            }

            let field = if key == CFF_AUTHORS_KEY && !has_explicit_author {
                AUTHOR_FIELD
            } else {
                key
            };

            match fields.iter().position(|candidate| *candidate == field,) {
                Some(index,) if !value.is_null() => assigned[index] = Some(value,),
                Some(_,) => debug!("{field} is null, treating it as not supplied"),
                None if key == CFF_DATE_RELEASED_KEY && schema.accepts(YEAR_FIELD,) => {}
                None => record_unused(&mut ignored, key, schema, options,),
            }
        }

        let derived_year = derive_year(raw, &fields, &assigned,);
        if derived_year.is_none()
            && schema.accepts(YEAR_FIELD,)
            && raw.contains_key(CFF_DATE_RELEASED_KEY,)
        {
            record_unused(&mut ignored, CFF_DATE_RELEASED_KEY, schema, options,);
        }

        let mut values = Vec::with_capacity(fields.len(),);
        for (index, field,) in fields.iter().enumerate() {
            let required = index < schema.required.len();
            let fallback = derived_year.as_ref().filter(|_| *field == YEAR_FIELD,);
            let value = match (assigned[index], fallback,) {
                (Some(value,), _,) => FieldValue::Present(render_field(field, value,)?,),
                (None, Some(year,),) => FieldValue::Present(year.clone(),),
                (None, None,) if required => {
                    return Err(Error::MissingRequiredField {
                        field: (*field).to_owned(),
                    },);
                }
                (None, None,) => FieldValue::Absent,
            };
            values.push(value,);
        }

        Ok(Self {
            schema,
            cite_key,
            values,
            ignored,
        },)
    }

    /// Entry type tag of the schema this entry was built with.
    pub fn entry_type(&self,) -> &'static str
    {
        self.schema.entry_type
    }

    /// Schema this entry was built with.
    pub fn schema(&self,) -> &'static Schema
    {
        self.schema
    }

    /// Citation key of the entry.
    pub fn cite_key(&self,) -> &CiteKey
    {
        &self.cite_key
    }

    /// Returns the value slot of a schema field.
    pub fn get(&self, field: &str,) -> Option<&FieldValue,>
    {
        self.schema.fields().position(|candidate| candidate == field,).map(|index| &self.values[index],)
    }

    /// Returns the value of a field when it is present.
    pub fn value(&self, field: &str,) -> Option<&str,>
    {
        self.get(field,).and_then(FieldValue::as_deref,)
    }

    /// Iterates over schema fields and their values in rendering order.
    pub fn fields(&self,) -> impl Iterator<Item = (&'static str, &FieldValue,),> + '_
    {
        self.schema.fields().zip(self.values.iter(),)
    }

    /// Metadata keys that were dropped while building with
    /// [`BuildOptions::warn_on_unused`].
    pub fn ignored_fields(&self,) -> &[String]
    {
        &self.ignored
    }
}

fn check_type(value: &Value, schema: &Schema,) -> Result<(), Error,>
{
    if value.is_null() {
        return Ok((),);
    }

    match value.as_str() {
        Some(tag,) if tag == schema.entry_type => Ok((),),
        Some(tag,) => Err(Error::TypeMismatch {
            expected: schema.entry_type.to_owned(),
            found:    tag.to_owned(),
        },),
        None => Err(Error::TypeMismatch {
            expected: schema.entry_type.to_owned(),
            found:    shape_of(value,).to_owned(),
        },),
    }
}

fn record_unused(ignored: &mut Vec<String,>, key: &str, schema: &Schema, options: BuildOptions,)
{
    if options.warn_on_unused {
        warn!("The key {} is not used for entries of type {}", key, schema.entry_type);
        ignored.push(key.to_owned(),);
    }
}

fn describe_key(key: &Value,) -> String
{
    serde_json::to_string(key,).unwrap_or_else(|_| shape_of(key,).to_owned(),)
}

/// Year taken from `date-released` when the schema wants a year that was not
/// supplied.
fn derive_year(raw: &Mapping, fields: &[&'static str], assigned: &[Option<&Value,>],) -> Option<String,>
{
    let year_index = fields.iter().position(|field| *field == YEAR_FIELD,)?;
    if assigned[year_index].is_some() {
        return None;
    }

    let released = raw.get(CFF_DATE_RELEASED_KEY,)?.as_str()?;
    let year = released.get(..4,)?;
    let rest = &released[4..];
    if year.chars().all(|ch| ch.is_ascii_digit(),) && (rest.is_empty() || rest.starts_with('-',)) {
        debug!("deriving year {year} from {CFF_DATE_RELEASED_KEY}");
        Some(year.to_owned(),)
    } else {
        None
    }
}

fn render_field(field: &str, value: &Value,) -> Result<String, Error,>
{
    if field == AUTHOR_FIELD {
        return normalize_authors(value,);
    }

    match value {
        Value::String(text,) => Ok(text.clone(),),
        Value::Number(number,) => Ok(number.to_string(),),
        Value::Bool(flag,) => Ok(flag.to_string(),),
        other => serde_json::to_string(other,).map_err(|error| {
            Error::validation(format!("field {field} cannot be rendered as text: {error}"),)
        },),
    }
}

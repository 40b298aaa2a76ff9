// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Validated citation keys.
//!
//! A citation key labels a reference in rendered output. Keys contain only
//! ASCII alphanumeric characters, underscores, dashes, and colons, which keeps
//! them valid inside BibTeX entry headers.

use std::{fmt, sync::LazyLock};

use regex::Regex;

use crate::error::Error;

static CITE_KEY_PATTERN: LazyLock<Regex,> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_:-]+$",).expect("cite key pattern is a valid regex",)
},);

/// Citation key that has passed character validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash,)]
pub struct CiteKey(String,);

impl CiteKey
{
    /// Validates the provided key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCiteKey`] when the key is empty or contains a
    /// character outside `[A-Za-z0-9_:-]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use citeref::CiteKey;
    ///
    /// assert!(CiteKey::parse("bg-atlasapi",).is_ok());
    /// assert!(CiteKey::parse("no spaces",).is_err());
    /// ```
    pub fn parse(key: &str,) -> Result<Self, Error,>
    {
        if CITE_KEY_PATTERN.is_match(key,) {
            Ok(Self(key.to_owned(),),)
        } else {
            Err(Error::InvalidCiteKey {
                key: key.to_owned(),
            },)
        }
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self,) -> &str
    {
        &self.0
    }
}

impl fmt::Display for CiteKey
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str(&self.0,)
    }
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::CiteKey;
    use crate::Error;

    proptest! {
        #[test]
        fn keys_from_allowed_class_are_accepted(input in "[A-Za-z0-9_:-]{1,48}") {
            let key = CiteKey::parse(&input);
            prop_assert!(key.is_ok());
            prop_assert_eq!(key.map(|value| value.as_str().to_owned()).ok(), Some(input));
        }

        #[test]
        fn keys_with_foreign_characters_are_rejected(
            prefix in "[A-Za-z0-9_:-]{0,12}",
            bad in "[^A-Za-z0-9_:-]",
            suffix in "[A-Za-z0-9_:-]{0,12}",
        ) {
            let input = format!("{prefix}{bad}{suffix}");
            let is_invalid = matches!(CiteKey::parse(&input), Err(Error::InvalidCiteKey { .. }));
            prop_assert!(is_invalid);
        }
    }

    #[test]
    fn rejects_empty_key()
    {
        assert!(matches!(CiteKey::parse(""), Err(Error::InvalidCiteKey { .. })));
    }

    #[test]
    fn rejects_key_with_parenthesis()
    {
        let error = CiteKey::parse("a11g00dt111n0w:(",).expect_err("expected invalid key",);
        assert!(error.to_string().contains("a11g00dt111n0w:("));
    }

    #[test]
    fn rejects_trailing_newline()
    {
        assert!(CiteKey::parse("TESTING123\n").is_err());
    }

    #[test]
    fn display_matches_source()
    {
        let key = CiteKey::parse("brainglobe-meta",).expect("valid key",);
        assert_eq!(key.to_string(), "brainglobe-meta");
    }
}

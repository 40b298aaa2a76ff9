// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Output formats and output file naming.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Serialize;

use crate::{
    entry::CitationEntry,
    error::Error,
    render::{render_bibtex, render_text},
};

/// Reference formats the renderer can produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize,)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat
{
    /// BibTeX entries.
    #[default]
    Bibtex,
    /// Plain-text reference sentences.
    Text,
}

impl OutputFormat
{
    /// Every supported format.
    pub const ALL: [Self; 2] = [Self::Bibtex, Self::Text,];

    /// Name used on the command line.
    pub fn name(self,) -> &'static str
    {
        match self {
            Self::Bibtex => "bibtex",
            Self::Text => "text",
        }
    }

    /// Canonical file extension, without the leading dot.
    pub fn extension(self,) -> &'static str
    {
        match self {
            Self::Bibtex => "tex",
            Self::Text => "txt",
        }
    }

    /// Maps a file extension to the format it unambiguously denotes.
    ///
    /// Matching ignores ASCII case. `bib` is accepted for BibTeX alongside
    /// the canonical `tex`.
    pub fn from_extension(extension: &str,) -> Option<Self,>
    {
        match extension.to_ascii_lowercase().as_str() {
            "tex" | "bib" => Some(Self::Bibtex,),
            "txt" => Some(Self::Text,),
            _ => None,
        }
    }

    /// Renders a built entry in this format.
    pub fn render(self, entry: &CitationEntry,) -> String
    {
        match self {
            Self::Bibtex => render_bibtex(entry,),
            Self::Text => render_text(entry,),
        }
    }
}

impl fmt::Display for OutputFormat
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str(self.name(),)
    }
}

impl FromStr for OutputFormat
{
    type Err = Error;

    fn from_str(value: &str,) -> Result<Self, Self::Err,>
    {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|format| format.name() == normalized,).ok_or_else(|| {
            Error::unsupported_format(format!(
                "'{value}' is not a known format (expected one of: bibtex, text)"
            ),)
        },)
    }
}

/// Output destination after format inference and extension normalization.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct OutputTarget
{
    /// Format the references are rendered in.
    pub format: OutputFormat,
    /// File the references are written to, when one was requested.
    pub path:   Option<PathBuf,>,
}

/// Resolves the output format and file path from user input.
///
/// * An explicit format keeps a path whose extension already denotes that
///   format, replaces an extension denoting the other format, and appends its
///   canonical extension otherwise.
/// * Without an explicit format, the format is inferred from the path
///   extension. A path without extension gets the default format (BibTeX)
///   and its extension.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] when no format is given and the path
/// extension does not denote a known format.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
///
/// use citeref::{OutputFormat, resolve_output};
///
/// let target = resolve_output(None, Some(Path::new("refs.txt",),),).expect("known extension",);
/// assert_eq!(target.format, OutputFormat::Text);
///
/// let target = resolve_output(Some(OutputFormat::Bibtex,), Some(Path::new("refs",),),)
///     .expect("explicit format",);
/// assert_eq!(target.path, Some(PathBuf::from("refs.tex")));
/// ```
pub fn resolve_output(
    format: Option<OutputFormat,>,
    path: Option<&Path,>,
) -> Result<OutputTarget, Error,>
{
    let Some(path,) = path else {
        return Ok(OutputTarget {
            format: format.unwrap_or_default(), path: None,
        },);
    };

    let extension = path.extension().and_then(|extension| extension.to_str(),);
    let implied = extension.and_then(OutputFormat::from_extension,);

    let format = match (format, extension, implied,) {
        (Some(format,), ..,) => format,
        (None, _, Some(implied,),) => implied,
        (None, None, None,) => OutputFormat::default(),
        (None, Some(extension,), None,) => {
            return Err(Error::unsupported_format(format!(
                "cannot infer a format from the extension '.{extension}' of {}; pass --format \
                 explicitly",
                path.display()
            ),),);
        }
    };

    let path = match (extension, implied,) {
        (_, Some(implied,),) if implied == format => path.to_path_buf(),
        (Some(_,), Some(_,),) | (None, _,) => path.with_extension(format.extension(),),
        (Some(_,), None,) => {
            let mut appended = path.as_os_str().to_owned();
            appended.push(".",);
            appended.push(format.extension(),);
            PathBuf::from(appended,)
        }
    };

    Ok(OutputTarget {
        format,
        path: Some(path,),
    },)
}

#[cfg(test)]
mod tests
{
    use std::path::{Path, PathBuf};

    use super::{OutputFormat, resolve_output};
    use crate::Error;

    #[test]
    fn parses_known_format_names()
    {
        assert_eq!("bibtex".parse::<OutputFormat>().ok(), Some(OutputFormat::Bibtex));
        assert_eq!(" Text ".parse::<OutputFormat>().ok(), Some(OutputFormat::Text));
    }

    #[test]
    fn rejects_unknown_format_names()
    {
        let error = "ris".parse::<OutputFormat>().expect_err("expected unsupported format",);
        assert!(matches!(error, Error::UnsupportedFormat { .. }));
        assert!(error.to_string().contains("'ris'"));
    }

    #[test]
    fn no_path_uses_requested_or_default_format()
    {
        let target = resolve_output(None, None,).expect("default format",);
        assert_eq!(target.format, OutputFormat::Bibtex);
        assert!(target.path.is_none());

        let target = resolve_output(Some(OutputFormat::Text,), None,).expect("explicit format",);
        assert_eq!(target.format, OutputFormat::Text);
    }

    #[test]
    fn infers_format_from_extension()
    {
        let target = resolve_output(None, Some(Path::new("out/refs.TXT",),),).expect("txt",);
        assert_eq!(target.format, OutputFormat::Text);
        assert_eq!(target.path, Some(PathBuf::from("out/refs.TXT")));

        let target = resolve_output(None, Some(Path::new("refs.bib",),),).expect("bib",);
        assert_eq!(target.format, OutputFormat::Bibtex);
        assert_eq!(target.path, Some(PathBuf::from("refs.bib")));
    }

    #[test]
    fn unknown_extension_without_format_fails_fast()
    {
        let error =
            resolve_output(None, Some(Path::new("refs.docx",),),).expect_err("expected failure",);
        assert!(matches!(error, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn path_without_extension_gets_canonical_one()
    {
        let target = resolve_output(None, Some(Path::new("refs",),),).expect("default",);
        assert_eq!(target.path, Some(PathBuf::from("refs.tex")));

        let target =
            resolve_output(Some(OutputFormat::Text,), Some(Path::new("refs",),),).expect("text",);
        assert_eq!(target.path, Some(PathBuf::from("refs.txt")));
    }

    #[test]
    fn explicit_format_replaces_conflicting_extension()
    {
        let target = resolve_output(Some(OutputFormat::Bibtex,), Some(Path::new("refs.txt",),),)
            .expect("explicit format",);
        assert_eq!(target.format, OutputFormat::Bibtex);
        assert_eq!(target.path, Some(PathBuf::from("refs.tex")));
    }

    #[test]
    fn explicit_format_appends_to_unknown_extension()
    {
        let target = resolve_output(Some(OutputFormat::Text,), Some(Path::new("refs.v2",),),)
            .expect("explicit format",);
        assert_eq!(target.path, Some(PathBuf::from("refs.v2.txt")));
    }
}

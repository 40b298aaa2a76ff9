// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Citation orchestration: from requested tools to rendered references.
//!
//! For every distinct repository the orchestrator fetches the metadata,
//! swaps a software self-citation for its `preferred-citation` when asked to,
//! selects the entry type, builds the entry, and renders it. Repositories are
//! processed one after another and their blocks joined in request order.

use std::{fs, path::PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::{
    author::shape_of,
    entry::{BuildOptions, CitationEntry, TYPE_KEY},
    error::{self, Error},
    fetch::CitationSource,
    format::{OutputFormat, resolve_output},
    notice::Notice,
    registry,
    repository::RepositoryCatalog,
    schema::MISC,
};

/// Metadata key holding the citation that should replace a software
/// self-citation.
pub const PREFERRED_CITATION_KEY: &str = "preferred-citation";
/// Entry type whose metadata may defer to a preferred citation.
const SOFTWARE_TYPE: &str = "software";
/// Newline characters placed between references by default.
pub const DEFAULT_NEWLINE_SEPARATIONS: usize = 2;
/// Placeholder naming the missing type in [`Error::UnsupportedEntryType`].
const NO_TYPE: &str = "<none>";

/// Behaviour of a batch when one repository cannot be cited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq,)]
pub enum BatchPolicy
{
    /// The first failing repository aborts the whole request.
    #[default]
    AllOrNothing,
    /// Failing repositories are skipped with a [`Notice::Skipped`]; the
    /// request fails only when every repository failed.
    BestEffort,
}

/// Options of one citation request.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct CiteOptions
{
    /// Format the references are rendered in.
    pub format:              OutputFormat,
    /// File receiving the rendered references. The extension is normalized
    /// to the format's canonical one.
    pub outfile:             Option<PathBuf,>,
    /// Cite the software itself even when it names a preferred citation.
    pub prefer_software:     bool,
    /// Newline characters placed between consecutive references.
    pub newline_separations: usize,
    /// Report metadata keys that the selected entry type does not use.
    pub warn_on_unused:      bool,
    /// Failure handling across repositories.
    pub batch:               BatchPolicy,
}

impl Default for CiteOptions
{
    fn default() -> Self
    {
        Self {
            format:              OutputFormat::default(),
            outfile:             None,
            prefer_software:     false,
            newline_separations: DEFAULT_NEWLINE_SEPARATIONS,
            warn_on_unused:      false,
            batch:               BatchPolicy::default(),
        }
    }
}

/// Outcome of a citation request.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct CitationReport
{
    /// Rendered references, without a trailing separator.
    pub text:    String,
    /// Non-fatal diagnostics raised while citing.
    pub notices: Vec<Notice,>,
    /// File the references were written to.
    pub output:  Option<PathBuf,>,
}

/// Cites the repositories behind the requested tool aliases.
///
/// Aliases are resolved first, so each repository is fetched and rendered
/// once regardless of how many aliases named it. When
/// [`CiteOptions::outfile`] is set the text is also written to the
/// normalized path.
///
/// # Errors
///
/// * [`Error::UnknownTool`] / [`Error::AmbiguousAlias`] from alias
///   resolution.
/// * [`Error::Citation`] wrapping the fetch, type, or construction failure of
///   a repository (every repository under [`BatchPolicy::BestEffort`]).
/// * [`Error::Io`] when the output file cannot be written.
///
/// # Examples
///
/// ```
/// use citeref::{CiteOptions, InMemorySource, RepositoryCatalog, cite};
///
/// # async fn example() -> Result<(), citeref::Error> {
/// let mut source = InMemorySource::new();
/// source.insert_yaml(
///     "bg-atlasapi",
///     "type: article\nauthor: {given-names: F., family-names: Claudi}\ntitle: AtlasAPI\njournal: JOSS\nyear: 2020\n",
/// )?;
/// let report =
///     cite(&RepositoryCatalog::builtin(), &source, &["AtlasAPI"], &CiteOptions::default()).await?;
/// assert!(report.text.starts_with("@article{bg-atlasapi,"));
/// # Ok(())
/// # }
/// ```
pub async fn cite<S, T,>(
    catalog: &RepositoryCatalog,
    source: &S,
    tools: &[T],
    options: &CiteOptions,
) -> Result<CitationReport, Error,>
where
    S: CitationSource,
    T: AsRef<str,>,
{
    let target = resolve_output(Some(options.format,), options.outfile.as_deref(),)?;
    let resolution = catalog.resolve(tools,)?;

    let mut batch = Batch::new(options, resolution.duplicates,);
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.yellow} [{elapsed_precise}] {msg}",)
            .unwrap_or_else(|_| ProgressStyle::default_spinner(),),
    );

    for repository in &resolution.repositories {
        progress.set_message(format!("Fetching citation for {}...", repository.name()),);
        info!("Citing {} from {}", repository.name(), repository.citation_url());

        let outcome = match source.fetch(repository,).await {
            Ok(raw,) => cite_mapping(repository.name(), &raw, options, &mut batch.notices,),
            Err(error,) => Err(error,),
        };
        if let Err(error,) = batch.record(repository.name(), outcome,) {
            progress.finish_and_clear();
            return Err(error,);
        }
    }
    progress.finish_and_clear();

    let mut report = batch.finish()?;
    if let Some(path,) = target.path {
        fs::write(&path, &report.text,).map_err(|source| error::io_error(&path, source,),)?;
        info!("Wrote references to {}", path.display());
        report.output = Some(path,);
    }

    Ok(report,)
}

/// Renders already fetched metadata, keyed by repository name, in order.
///
/// This is the synchronous core of [`cite`]; no alias resolution or output
/// file handling takes place.
///
/// # Errors
///
/// Returns the failure of the first repository under
/// [`BatchPolicy::AllOrNothing`], or the first failure when every
/// repository failed under [`BatchPolicy::BestEffort`].
pub fn render_citations<'a, I,>(fetched: I, options: &CiteOptions,) -> Result<CitationReport, Error,>
where
    I: IntoIterator<Item = (&'a str, &'a Mapping,),>,
{
    let mut batch = Batch::new(options, Vec::new(),);
    for (repository, raw,) in fetched {
        let outcome = cite_mapping(repository, raw, options, &mut batch.notices,);
        batch.record(repository, outcome,)?;
    }
    batch.finish()
}

/// Renders the metadata of a single repository.
///
/// The repository name becomes the cite key. Notices raised along the way
/// are appended to `notices`.
///
/// # Errors
///
/// * [`Error::UnsupportedEntryType`] when the type is not registered, or is
///   missing and the format is BibTeX.
/// * [`Error::Fetch`] when `preferred-citation` is not a mapping.
/// * Every construction error of [`CitationEntry::build`].
pub fn cite_mapping(
    repository: &str,
    raw: &Mapping,
    options: &CiteOptions,
    notices: &mut Vec<Notice,>,
) -> Result<String, Error,>
{
    let mut metadata = raw;
    let mut citation_type = read_type(metadata,)?;
    if citation_type.is_none() {
        notices.push(Notice::MissingType {
            repository: repository.to_owned(),
        }
        .emit(),);
    }

    if citation_type == Some(SOFTWARE_TYPE,)
        && !options.prefer_software
        && let Some(preferred,) = metadata.get(PREFERRED_CITATION_KEY,)
    {
        let Value::Mapping(preferred,) = preferred else {
            return Err(Error::fetch(format!(
                "{PREFERRED_CITATION_KEY} must be a mapping, not a {}",
                shape_of(preferred,)
            ),),);
        };
        debug!("{} names a preferred citation, using it instead of the software entry", repository);
        metadata = preferred;
        citation_type = read_type(metadata,)?;
        if citation_type.is_none() {
            notices.push(Notice::MissingType {
                repository: repository.to_owned(),
            }
            .emit(),);
        }
    }

    let build_options = BuildOptions {
        warn_on_unused: options.warn_on_unused,
    };
    let entry = match (citation_type, options.format,) {
        (Some(tag,), _,) => registry::lookup(tag,)?.build(metadata, repository, build_options,)?,
        (None, OutputFormat::Text,) => {
            CitationEntry::build(metadata, repository, &MISC, build_options,)?
        }
        (None, OutputFormat::Bibtex,) => {
            return Err(Error::UnsupportedEntryType {
                entry_type: NO_TYPE.to_owned(),
            },);
        }
    };
    notices.extend(entry.ignored_fields().iter().map(|field| Notice::UnusedField {
        repository: repository.to_owned(),
        field:      field.clone(),
        entry_type: entry.entry_type().to_owned(),
    },),);

    Ok(options.format.render(&entry,),)
}

fn read_type(metadata: &Mapping,) -> Result<Option<&str,>, Error,>
{
    match metadata.get(TYPE_KEY,) {
        None | Some(Value::Null,) => Ok(None,),
        Some(Value::String(tag,),) => Ok(Some(tag.as_str(),),),
        Some(other,) => Err(Error::UnsupportedEntryType {
            entry_type: format!("<{}>", shape_of(other,)),
        },),
    }
}

/// Accumulates rendered blocks and applies the batch policy.
struct Batch<'options,>
{
    options:       &'options CiteOptions,
    blocks:        Vec<String,>,
    notices:       Vec<Notice,>,
    first_failure: Option<Error,>,
}

impl<'options,> Batch<'options,>
{
    fn new(options: &'options CiteOptions, notices: Vec<Notice,>,) -> Self
    {
        Self {
            options,
            blocks: Vec::new(),
            notices,
            first_failure: None,
        }
    }

    fn record(&mut self, repository: &str, outcome: Result<String, Error,>,) -> Result<(), Error,>
    {
        let error = match outcome {
            Ok(block,) => {
                self.blocks.push(block,);
                return Ok((),);
            }
            Err(error,) => error,
        };

        match self.options.batch {
            BatchPolicy::AllOrNothing => Err(error.in_repository(repository,),),
            BatchPolicy::BestEffort => {
                self.notices.push(
                    Notice::Skipped {
                        repository: repository.to_owned(),
                        reason:     error.to_display_string(),
                    }
                    .emit(),
                );
                if self.first_failure.is_none() {
                    self.first_failure = Some(error.in_repository(repository,),);
                }
                Ok((),)
            }
        }
    }

    fn finish(self,) -> Result<CitationReport, Error,>
    {
        if self.blocks.is_empty()
            && let Some(error,) = self.first_failure
        {
            return Err(error,);
        }

        let separator = "\n".repeat(self.options.newline_separations,);
        Ok(CitationReport {
            text:    self.blocks.join(&separator,),
            notices: self.notices,
            output:  None,
        },)
    }
}

//! Command-line interface for the citeref binary.
//!
//! The CLI resolves the requested tools against the repository catalog,
//! fetches their citation metadata from GitHub, and prints or writes the
//! rendered references.

use std::{
    collections::BTreeSet,
    io::{self, Write},
    path::PathBuf,
    process,
};

use clap::{ArgAction, Parser};
use citeref::{
    BatchPolicy, CiteOptions, DEFAULT_NEWLINE_SEPARATIONS, Error, GitHubSource, OutputFormat,
    Repository, RepositoryCatalog, cite, load_catalog, resolve_output, supported_types,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Generate BibTeX or plain-text references for BrainGlobe tools.
#[derive(Debug, Parser,)]
#[command(name = "citeref", version, about = "Generate references for BrainGlobe tools")]
struct Cli
{
    /// Tools to cite, by repository name or alias.
    #[arg(value_name = "TOOLS", required_unless_present = "list")]
    tools: Vec<String,>,

    /// Output format; inferred from the output file extension when omitted.
    #[arg(short = 'f', long = "format", value_name = "FORMAT")]
    format: Option<OutputFormat,>,

    /// Write the references to this file instead of stdout.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf,>,

    /// Cite the software itself even when it names a preferred citation.
    #[arg(short = 's', long = "software", action = ArgAction::SetTrue)]
    software: bool,

    /// Newline characters placed between references.
    #[arg(long = "newlines", value_name = "N", default_value_t = DEFAULT_NEWLINE_SEPARATIONS)]
    newlines: usize,

    /// Skip repositories that cannot be cited instead of aborting.
    #[arg(long = "best-effort", action = ArgAction::SetTrue)]
    best_effort: bool,

    /// Warn about metadata keys that the entry type does not use.
    #[arg(long = "warn-unused", action = ArgAction::SetTrue)]
    warn_unused: bool,

    /// YAML file listing repositories to add to the built-in catalog.
    #[arg(long = "repositories", value_name = "PATH", env = "CITEREF_REPOSITORIES")]
    repositories: Option<PathBuf,>,

    /// List citable repositories, entry types, and formats, then exit.
    #[arg(short = 'l', long = "list", action = ArgAction::SetTrue)]
    list: bool,

    /// Print the listing as JSON.
    #[arg(long = "json", action = ArgAction::SetTrue, requires = "list")]
    json: bool,
}

/// Everything that can be cited, as printed by `--list`.
#[derive(Debug, Serialize,)]
struct Listing<'catalog,>
{
    repositories: &'catalog [Repository],
    entry_types:  BTreeSet<&'static str,>,
    formats:      [OutputFormat; 2],
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main(flavor = "current_thread")]
async fn main()
{
    init_tracing();

    let cli = Cli::parse();
    if let Err(error,) = run(cli,).await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the `warn`
/// default.
fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn",),);
    tracing_subscriber::fmt()
        .with_env_filter(filter,)
        .with_writer(io::stderr,)
        .with_target(false,)
        .init();
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates catalog loading, output resolution, and citation errors.
async fn run(cli: Cli,) -> Result<(), Error,>
{
    let catalog = match cli.repositories.as_deref() {
        Some(path,) => load_catalog(path,)?,
        None => RepositoryCatalog::builtin(),
    };

    if cli.list {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        return write_listing(&mut handle, &catalog, cli.json,);
    }

    let options = cite_options(&cli,)?;
    let source = GitHubSource::new()?;
    let report = cite(&catalog, &source, &cli.tools, &options,).await?;

    match report.output {
        Some(path,) => info!("References written to {}", path.display()),
        None => println!("{}", report.text),
    }

    Ok((),)
}

/// Translates CLI flags into citation options, inferring the format from the
/// output path when `--format` is absent.
fn cite_options(cli: &Cli,) -> Result<CiteOptions, Error,>
{
    let target = resolve_output(cli.format, cli.output.as_deref(),)?;
    let batch = if cli.best_effort {
        BatchPolicy::BestEffort
    } else {
        BatchPolicy::AllOrNothing
    };

    Ok(CiteOptions {
        format: target.format,
        outfile: target.path,
        prefer_software: cli.software,
        newline_separations: cli.newlines,
        warn_on_unused: cli.warn_unused,
        batch,
    },)
}

fn write_listing<W: io::Write,>(writer: &mut W, catalog: &RepositoryCatalog, json: bool,) -> Result<(), Error,>
{
    let listing = Listing {
        repositories: catalog.repositories(),
        entry_types:  supported_types(),
        formats:      OutputFormat::ALL,
    };

    if json {
        serde_json::to_writer(&mut *writer, &listing,)?;
        return writeln!(writer).map_err(|source| Error::Write {
            source,
        },);
    }

    let mut text = String::from("Citable repositories:\n",);
    for repository in listing.repositories {
        text.push_str(&format!(
            "  {} ({}/{}@{}): {}\n",
            repository.name(),
            repository.org(),
            repository.name(),
            repository.branch(),
            repository.aliases().join(", ")
        ),);
    }
    text.push_str(&format!(
        "Entry types: {}\n",
        listing.entry_types.iter().copied().collect::<Vec<_,>>().join(", ")
    ),);
    text.push_str(&format!(
        "Formats: {}\n",
        listing
            .formats
            .iter()
            .map(|format| format!("{} (.{})", format.name(), format.extension()))
            .collect::<Vec<_,>>()
            .join(", ")
    ),);

    writer.write_all(text.as_bytes(),).map_err(|source| Error::Write {
        source,
    },)
}

#[cfg(test)]
mod tests
{
    use std::{io::Cursor, path::PathBuf};

    use citeref::{BatchPolicy, OutputFormat, RepositoryCatalog};
    use clap::Parser;

    use super::{Cli, cite_options, write_listing};

    #[test]
    fn cli_defaults_to_bibtex_on_stdout()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "brainglobe",],)
            .expect("failed to parse CLI",);

        assert_eq!(cli.tools, vec!["brainglobe".to_owned()]);
        assert_eq!(cli.newlines, 2);
        let options = cite_options(&cli,).expect("valid options",);
        assert_eq!(options.format, OutputFormat::Bibtex);
        assert_eq!(options.outfile, None);
        assert_eq!(options.batch, BatchPolicy::AllOrNothing);
        assert!(!options.prefer_software);
    }

    #[test]
    fn cli_requires_tools_unless_listing()
    {
        assert!(Cli::try_parse_from([env!("CARGO_PKG_NAME")],).is_err());

        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "--list", "--json",],)
            .expect("failed to parse CLI",);
        assert!(cli.list);
        assert!(cli.json);
    }

    #[test]
    fn json_flag_requires_list()
    {
        assert!(Cli::try_parse_from([env!("CARGO_PKG_NAME"), "--json", "brainglobe",]).is_err());
    }

    #[test]
    fn cli_rejects_unknown_format()
    {
        let result =
            Cli::try_parse_from([env!("CARGO_PKG_NAME"), "--format", "pdf", "brainglobe",],);
        assert!(result.is_err());
    }

    #[test]
    fn format_is_inferred_from_output_extension()
    {
        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "-o",
            "references.txt",
            "-s",
            "--newlines",
            "1",
            "--best-effort",
            "--warn-unused",
            "AtlasAPI",
        ],)
        .expect("failed to parse CLI",);

        let options = cite_options(&cli,).expect("valid options",);
        assert_eq!(options.format, OutputFormat::Text);
        assert_eq!(options.outfile, Some(PathBuf::from("references.txt")));
        assert_eq!(options.newline_separations, 1);
        assert_eq!(options.batch, BatchPolicy::BestEffort);
        assert!(options.prefer_software);
        assert!(options.warn_on_unused);
    }

    #[test]
    fn explicit_format_normalizes_output_extension()
    {
        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "--format",
            "bibtex",
            "--output",
            "references.txt",
            "brainglobe",
        ],)
        .expect("failed to parse CLI",);

        let options = cite_options(&cli,).expect("valid options",);
        assert_eq!(options.outfile, Some(PathBuf::from("references.tex")));
    }

    #[test]
    fn unknown_output_extension_without_format_fails()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "-o", "refs.pdf", "brainglobe",],)
            .expect("failed to parse CLI",);

        let error = cite_options(&cli,).expect_err("expected unsupported format",);
        assert!(matches!(error, citeref::Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn listing_names_repositories_types_and_formats()
    {
        let mut buffer = Cursor::new(Vec::new(),);
        write_listing(&mut buffer, &RepositoryCatalog::builtin(), false,)
            .expect("failed to write listing",);

        let output = String::from_utf8(buffer.into_inner(),).expect("invalid UTF-8",);
        assert!(output.contains(
            "  bg-atlasapi (brainglobe/bg-atlasapi@add-citation-file): BrainGlobe AtlasAPI, \
             AtlasAPI, Atlas API, bg-atlasapi\n"
        ));
        assert!(output.contains("Entry types: article, software\n"));
        assert!(output.ends_with("Formats: bibtex (.tex), text (.txt)\n"));
    }

    #[test]
    fn json_listing_is_machine_readable()
    {
        let mut buffer = Cursor::new(Vec::new(),);
        write_listing(&mut buffer, &RepositoryCatalog::builtin(), true,)
            .expect("failed to write listing",);

        let output = String::from_utf8(buffer.into_inner(),).expect("invalid UTF-8",);
        let value: serde_json::Value = serde_json::from_str(&output,).expect("valid JSON",);
        assert_eq!(value["entry_types"], serde_json::json!(["article", "software"]));
        assert_eq!(value["formats"], serde_json::json!(["bibtex", "text"]));
        assert_eq!(value["repositories"][0]["name"], "brainglobe-meta");
    }
}

//! Configuration documents describing additional citable repositories.
//!
//! The types in this module mirror the YAML documents accepted by the CLI's
//! `--repositories` option. Optional values fall back to the defaults of
//! [`Repository`], and every entry is validated before it joins the catalog.

use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{self, Error},
    repository::{Repository, RepositoryCatalog},
};

/// Root configuration document listing repositories to add to the catalog.
///
/// # Examples
///
/// ```
/// use citeref::CatalogConfig;
///
/// let yaml = r#"
/// repositories:
///   - name: brainreg
///     aliases: [BrainReg]
/// "#;
/// let config: CatalogConfig = serde_yaml::from_str(yaml,).expect("valid configuration",);
/// assert_eq!(config.repositories.len(), 1);
/// ```
#[derive(Debug, Deserialize, Serialize, Default,)]
pub struct CatalogConfig
{
    /// Repositories to make citable.
    #[serde(default)]
    pub repositories: Vec<RepositoryEntry,>,
}

/// Raw configuration entry describing a single repository before validation.
#[derive(Debug, Deserialize, Serialize, Clone,)]
#[serde(deny_unknown_fields)]
pub struct RepositoryEntry
{
    /// Repository name on GitHub.
    pub name: String,

    /// Additional names the tool may be requested by.
    #[serde(default, alias = "tool_aliases", alias = "tool-aliases")]
    pub aliases: Vec<String,>,

    /// Optional organisation or user owning the repository.
    #[serde(default, alias = "owner", alias = "organization", alias = "organisation")]
    pub org: Option<String,>,

    /// Optional branch holding the citation file.
    #[serde(default, alias = "cff_branch", alias = "cff-branch")]
    pub branch: Option<String,>,

    /// Optional location of the citation file within the repository.
    #[serde(default, alias = "cff_path", alias = "cff-path")]
    pub path: Option<String,>,
}

/// Loads the built-in catalog extended with the repositories listed in the
/// YAML file at `path`.
///
/// # Errors
///
/// Returns an [`Error`] when the file cannot be read, the YAML cannot be
/// deserialized, or an entry violates the validation rules of
/// [`parse_repositories`].
pub fn load_catalog(path: &Path,) -> Result<RepositoryCatalog, Error,>
{
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    let repositories = parse_repositories(&contents,)?;

    let mut catalog = RepositoryCatalog::builtin();
    if let Some(existing,) = repositories.iter().find(|repository| catalog.contains(repository,),) {
        return Err(Error::validation(format!(
            "repository '{}/{}' is already part of the built-in catalog",
            existing.org(),
            existing.name()
        ),),);
    }

    info!("Loaded {} repositories from {}", repositories.len(), path.display());
    catalog.extend(repositories,);
    Ok(catalog,)
}

/// Parses and validates repository descriptors from a YAML document.
///
/// # Errors
///
/// Propagates [`Error::Parse`](Error::Parse) when the YAML cannot be decoded
/// and [`Error::Validation`](Error::Validation) when the document lists no
/// repositories, an identifier is blank or contains whitespace, an alias is
/// blank, or a repository appears twice.
pub fn parse_repositories(contents: &str,) -> Result<Vec<Repository,>, Error,>
{
    let config: CatalogConfig = serde_yaml::from_str(contents,)?;
    if config.repositories.is_empty() {
        return Err(Error::validation("configuration must include at least one repository",),);
    }

    let mut seen = HashSet::with_capacity(config.repositories.len(),);
    let mut repositories = Vec::with_capacity(config.repositories.len(),);
    for entry in &config.repositories {
        let repository = normalize_entry(entry,)?;
        let key = (repository.org().to_lowercase(), repository.name().to_lowercase(),);
        if !seen.insert(key,) {
            return Err(Error::validation(format!(
                "duplicate repository '{}/{}'",
                repository.org(),
                repository.name()
            ),),);
        }
        repositories.push(repository,);
    }

    Ok(repositories,)
}

fn normalize_entry(entry: &RepositoryEntry,) -> Result<Repository, Error,>
{
    let name = normalize_identifier(&entry.name, "name",)?;

    let mut aliases = Vec::with_capacity(entry.aliases.len(),);
    for alias in &entry.aliases {
        let trimmed = alias.trim();
        if trimmed.is_empty() {
            return Err(Error::validation(format!("aliases of '{name}' cannot be empty"),),);
        }
        aliases.push(trimmed.to_owned(),);
    }

    let mut repository = Repository::new(name, aliases,);
    if let Some(org,) = entry.org.as_deref() {
        repository = repository.with_org(normalize_identifier(org, "org",)?,);
    }
    if let Some(branch,) = entry.branch.as_deref() {
        repository = repository.with_branch(normalize_identifier(branch, "branch",)?,);
    }
    if let Some(path,) = entry.path.as_deref() {
        repository = repository.with_path(normalize_path_like(path,)?,);
    }

    Ok(repository,)
}

/// Validates identifier-like fields such as names, organisations, or
/// branches.
///
/// # Errors
///
/// Returns [`Error::Validation`](Error::Validation) when the value is empty or
/// contains whitespace.
fn normalize_identifier(input: &str, field: &str,) -> Result<String, Error,>
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} cannot be empty"),),);
    }
    if trimmed.chars().any(char::is_whitespace,) {
        return Err(Error::validation(format!("{field} cannot contain whitespace"),),);
    }
    Ok(trimmed.to_owned(),)
}

fn normalize_path_like(input: &str,) -> Result<String, Error,>
{
    let trimmed = input.trim().trim_start_matches('/',);
    if trimmed.is_empty() {
        return Err(Error::validation("path override cannot be empty",),);
    }
    Ok(trimmed.to_owned(),)
}

#[cfg(test)]
mod tests
{
    use std::fs;

    use tempfile::tempdir;

    use super::{load_catalog, parse_repositories};
    use crate::Error;

    #[test]
    fn parses_entries_with_defaults_and_overrides()
    {
        let yaml = r#"
repositories:
  - name: brainreg
    aliases: [BrainReg, " registration "]
  - name: morphapi
    owner: brainglobe-labs
    cff_branch: develop
    path: /docs/CITATION.cff
"#;
        let repositories = parse_repositories(yaml,).expect("valid configuration",);

        assert_eq!(repositories.len(), 2);
        assert_eq!(repositories[0].branch(), "main");
        assert_eq!(repositories[0].org(), "brainglobe");
        assert!(repositories[0].is_known_as("registration"));
        assert!(repositories[0].is_known_as("BRAINREG"));
        assert_eq!(repositories[1].org(), "brainglobe-labs");
        assert_eq!(repositories[1].branch(), "develop");
        assert_eq!(repositories[1].path(), "docs/CITATION.cff");
    }

    #[test]
    fn rejects_empty_document()
    {
        let error = parse_repositories("repositories: []\n",).expect_err("expected failure",);
        assert!(matches!(error, Error::Validation { .. }));
    }

    #[test]
    fn rejects_whitespace_in_names()
    {
        let error = parse_repositories("repositories:\n  - name: two words\n",)
            .expect_err("expected failure",);
        assert!(error.to_string().contains("name cannot contain whitespace"));
    }

    #[test]
    fn rejects_blank_alias()
    {
        let error = parse_repositories("repositories:\n  - name: repo\n    aliases: ['  ']\n",)
            .expect_err("expected failure",);
        assert!(error.to_string().contains("aliases of 'repo' cannot be empty"));
    }

    #[test]
    fn rejects_duplicate_repositories()
    {
        let yaml = "repositories:\n  - name: repo\n  - name: Repo\n";
        let error = parse_repositories(yaml,).expect_err("expected failure",);
        assert!(error.to_string().contains("duplicate repository"));
    }

    #[test]
    fn rejects_unknown_keys()
    {
        let yaml = "repositories:\n  - name: repo\n    stars: 5\n";
        assert!(matches!(parse_repositories(yaml), Err(Error::Parse { .. })));
    }

    #[test]
    fn load_catalog_extends_builtin_repositories()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("repositories.yaml",);
        fs::write(&path, "repositories:\n  - name: brainreg\n",).expect("failed to write config",);

        let catalog = load_catalog(&path,).expect("valid catalog",);
        let resolution = catalog.resolve(&["brainreg", "brainglobe",],).expect("known aliases",);
        assert_eq!(resolution.repositories.len(), 2);
    }

    #[test]
    fn load_catalog_rejects_builtin_duplicates()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("repositories.yaml",);
        fs::write(&path, "repositories:\n  - name: bg-atlasapi\n",).expect("failed to write config",);

        let error = load_catalog(&path,).expect_err("expected duplicate",);
        assert!(error.to_string().contains("built-in catalog"));
    }

    #[test]
    fn load_catalog_reports_missing_file()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let error = load_catalog(&temp.path().join("missing.yaml",),).expect_err("expected io error",);
        assert!(matches!(error, Error::Io { .. }));
    }
}

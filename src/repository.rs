//! Citable repositories and resolution of the tool aliases users request.
//!
//! Each [`Repository`] describes where a `CITATION.cff` file lives on GitHub
//! and the names its tool may be requested by. The [`RepositoryCatalog`]
//! turns requested aliases into the distinct repositories to cite, reporting
//! redundant aliases and rejecting unknown or ambiguous ones.

use serde::Serialize;
use tracing::debug;

use crate::{error::Error, notice::Notice};

/// Organisation that owns repositories unless configured otherwise.
pub const DEFAULT_ORG: &str = "brainglobe";
/// Branch holding the citation file unless configured otherwise.
pub const DEFAULT_BRANCH: &str = "main";
/// Location of the citation file unless configured otherwise.
pub const DEFAULT_CITATION_PATH: &str = "CITATION.cff";

/// GitHub repository that provides citation metadata.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Repository {
    name: String,
    aliases: Vec<String>,
    org: String,
    branch: String,
    path: String,
}

impl Repository {
    /// Creates a descriptor in the default organisation.
    ///
    /// The repository name is always added to the aliases, so a tool can be
    /// requested by its repository name.
    ///
    /// # Examples
    ///
    /// ```
    /// use citeref::Repository;
    ///
    /// let repository = Repository::new("BrainGlobe", ["BG"]);
    /// assert!(repository.is_known_as("bG"));
    /// assert!(repository.is_known_as("brainglobe"));
    /// assert!(!repository.is_known_as("not-an-alias"));
    /// ```
    pub fn new<N, I, A>(name: N, aliases: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let name = name.into();
        let mut aliases: Vec<String> = aliases.into_iter().map(Into::into).collect();
        if !aliases.iter().any(|alias| alias == &name) {
            aliases.push(name.clone());
        }

        Self {
            name,
            aliases,
            org: DEFAULT_ORG.to_owned(),
            branch: DEFAULT_BRANCH.to_owned(),
            path: DEFAULT_CITATION_PATH.to_owned(),
        }
    }

    /// Sets the owning organisation or user.
    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.org = org.into();
        self
    }

    /// Sets the branch holding the citation file.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Sets the citation file location within the repository.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// URL of the repository on GitHub.
    pub fn url(&self) -> String {
        format!("https://github.com/{}/{}", self.org, self.name)
    }

    /// URL of the raw citation file.
    pub fn citation_url(&self) -> String {
        format!(
            "https://raw.githubusercontent.com/{}/{}/{}/{}",
            self.org, self.name, self.branch, self.path
        )
    }

    /// Returns `true` when the repository answers to `alias`, ignoring case.
    pub fn is_known_as(&self, alias: &str) -> bool {
        let alias = alias.trim().to_lowercase();
        self.aliases.iter().any(|candidate| candidate.to_lowercase() == alias)
    }

    fn same_source(&self, other: &Self) -> bool {
        self.org.eq_ignore_ascii_case(&other.org) && self.name.eq_ignore_ascii_case(&other.name)
    }
}

/// Distinct repositories selected for one citation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Repositories in the order they were first requested.
    pub repositories: Vec<Repository>,
    /// One notice per alias that pointed at an already selected repository.
    pub duplicates: Vec<Notice>,
}

/// Set of repositories that can be cited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryCatalog {
    repositories: Vec<Repository>,
}

impl RepositoryCatalog {
    /// Creates a catalog from explicit descriptors.
    pub fn new(repositories: Vec<Repository>) -> Self {
        Self { repositories }
    }

    /// Repositories shipped with the tool.
    pub fn builtin() -> Self {
        Self::new(vec![
            Repository::new("brainglobe-meta", ["brainglobe", "BrainGlobe meta-package"]),
            Repository::new(
                "bg-atlasapi",
                ["BrainGlobe AtlasAPI", "AtlasAPI", "Atlas API"],
            )
            .with_branch("add-citation-file"),
        ])
    }

    /// Appends descriptors, typically loaded from a configuration file.
    pub fn extend<I>(&mut self, repositories: I)
    where
        I: IntoIterator<Item = Repository>,
    {
        self.repositories.extend(repositories);
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Returns `true` when a descriptor for the same organisation and name
    /// exists.
    pub fn contains(&self, repository: &Repository) -> bool {
        self.repositories.iter().any(|known| known.same_source(repository))
    }

    /// Resolves requested aliases into distinct repositories.
    ///
    /// Aliases that select an already chosen repository produce a
    /// [`Notice::DuplicateAlias`] instead of a second entry.
    ///
    /// # Errors
    ///
    /// * [`Error::UnknownTool`] when no repository answers to an alias.
    /// * [`Error::AmbiguousAlias`] when several repositories claim it.
    pub fn resolve<S>(&self, tools: &[S]) -> Result<Resolution, Error>
    where
        S: AsRef<str>,
    {
        let mut repositories: Vec<Repository> = Vec::with_capacity(tools.len());
        let mut duplicates = Vec::new();

        for tool in tools {
            let alias = tool.as_ref();
            let claimants: Vec<&Repository> = self
                .repositories
                .iter()
                .filter(|repository| repository.is_known_as(alias))
                .collect();

            let repository = match claimants.as_slice() {
                [] => {
                    return Err(Error::UnknownTool {
                        alias: alias.to_owned(),
                    });
                }
                [single] => *single,
                many => {
                    return Err(Error::AmbiguousAlias {
                        alias: alias.to_owned(),
                        repositories: many
                            .iter()
                            .map(|repository| repository.name())
                            .collect::<Vec<_>>()
                            .join(", "),
                    });
                }
            };

            if repositories.iter().any(|selected| selected.same_source(repository)) {
                duplicates.push(
                    Notice::DuplicateAlias {
                        alias: alias.to_owned(),
                        repository: repository.name().to_owned(),
                    }
                    .emit(),
                );
            } else {
                debug!("'{}' resolved to {}", alias, repository.url());
                repositories.push(repository.clone());
            }
        }

        Ok(Resolution {
            repositories,
            duplicates,
        })
    }
}

impl Default for RepositoryCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

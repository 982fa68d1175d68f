// ABOUTME: GitHub repository slug in `owner/name` form.
// ABOUTME: Parses the GITHUB_REPOSITORY-style value and exposes both halves.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepoSlugError {
    #[error("repository must be in owner/name form, got '{0}'")]
    Malformed(String),

    #[error("repository '{slug}' does not belong to owner '{owner}'")]
    OwnerMismatch { slug: String, owner: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    owner: String,
    name: String,
}

impl RepoSlug {
    pub fn parse(value: &str) -> Result<Self, RepoSlugError> {
        let malformed = || RepoSlugError::Malformed(value.to_string());
        let (owner, name) = value.trim().split_once('/').ok_or_else(malformed)?;

        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(malformed());
        }
        if owner.chars().chain(name.chars()).any(char::is_whitespace) {
            return Err(malformed());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Parse a slug and check it belongs to `owner`. GitHub logins are
    /// case-insensitive, so the comparison is too.
    pub fn parse_for_owner(value: &str, owner: &str) -> Result<Self, RepoSlugError> {
        let slug = Self::parse(value)?;
        if !slug.owner.eq_ignore_ascii_case(owner.trim()) {
            return Err(RepoSlugError::OwnerMismatch {
                slug: value.to_string(),
                owner: owner.to_string(),
            });
        }
        Ok(slug)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

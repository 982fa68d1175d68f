// ABOUTME: Repository-root pattern for the cPanel side of a deployment.
// ABOUTME: Expands `{owner}` and `{repo}` placeholders; `{{` and `}}` escape braces.

use super::RepoSlug;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RootPatternError {
    #[error("repository root pattern cannot be empty")]
    Empty,

    #[error("unknown placeholder '{{{0}}}' in repository root pattern")]
    UnknownPlaceholder(String),

    #[error("unbalanced brace in repository root pattern at byte {0}")]
    Unbalanced(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Owner,
    Repo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Placeholder),
}

/// A parsed pattern such as `/home/{owner}/repositories/{repo}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPattern {
    segments: Vec<Segment>,
}

impl RootPattern {
    pub fn parse(pattern: &str) -> Result<Self, RootPatternError> {
        if pattern.trim().is_empty() {
            return Err(RootPatternError::Empty);
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, '{')) | None => return Err(RootPatternError::Unbalanced(pos)),
                            Some((_, ch)) => name.push(ch),
                        }
                    }
                    let field = match name.as_str() {
                        "owner" => Placeholder::Owner,
                        "repo" => Placeholder::Repo,
                        _ => return Err(RootPatternError::UnknownPlaceholder(name)),
                    };
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' => return Err(RootPatternError::Unbalanced(pos)),
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Expand the pattern for a repository.
    pub fn render(&self, slug: &RepoSlug) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Field(Placeholder::Owner) => slug.owner(),
                Segment::Field(Placeholder::Repo) => slug.name(),
            })
            .collect()
    }
}

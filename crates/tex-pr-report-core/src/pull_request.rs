//! Identifying the pull request to comment on.

use std::fmt;
use std::str::FromStr;

use crate::error::ArgumentError;

/// Value CI systems pass instead of a number for non-pull-request builds.
pub const NOT_A_PULL_REQUEST: &str = "false";

/// An `owner/repo` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    /// Organization or user that owns the repository.
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

impl FromStr for RepoSlug {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(ArgumentError::RepoSlug(s.to_string())),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// The pull-request argument: a number, or `false` outside pull-request builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestArg {
    /// The build is not for a pull request.
    NotAPullRequest,
    /// Pull request number.
    Number(u64),
}

impl FromStr for PullRequestArg {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == NOT_A_PULL_REQUEST {
            return Ok(Self::NotAPullRequest);
        }
        s.parse()
            .map(Self::Number)
            .map_err(|_| ArgumentError::PullRequest(s.to_string()))
    }
}

impl fmt::Display for PullRequestArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAPullRequest => f.write_str(NOT_A_PULL_REQUEST),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

//! What to clean up: one PR or every tracked branch

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// A single PR named on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrSelector {
    /// PR/MR number (`123`, `#123`, or a PR/MR URL)
    Number(u64),
    /// Head branch name of the PR
    Branch(String),
}

impl FromStr for PrSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidSelection("empty selector".to_string()));
        }

        if let Ok(number) = s.trim_start_matches('#').parse::<u64>() {
            return Ok(Self::Number(number));
        }

        if let Ok(url) = Url::parse(s)
            && matches!(url.scheme(), "http" | "https")
        {
            return number_from_url(&url).map(Self::Number).ok_or_else(|| {
                Error::InvalidSelection(format!("'{s}' is not a pull request URL"))
            });
        }

        Ok(Self::Branch(s.to_string()))
    }
}

/// Extract the number from `.../pull/123` or `.../-/merge_requests/123`
fn number_from_url(url: &Url) -> Option<u64> {
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    segments
        .windows(2)
        .rev()
        .find(|pair| matches!(pair[0], "pull" | "pulls" | "merge_requests"))
        .and_then(|pair| pair[1].parse().ok())
}

impl fmt::Display for PrSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "#{n}"),
            Self::Branch(name) => write!(f, "branch '{name}'"),
        }
    }
}

/// Cleanup scope chosen by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every tracked branch
    All,
    /// Branches matching one PR
    Single(PrSelector),
}

impl Selection {
    /// Validate the selector / `--all` combination
    ///
    /// Exactly one of the two must be given.
    pub fn from_args(selector: Option<&str>, all: bool) -> Result<Self> {
        match (selector, all) {
            (Some(_), true) => Err(Error::InvalidSelection(
                "cannot set both PR and --all".to_string(),
            )),
            (None, false) => Err(Error::InvalidSelection(
                "must set either PR or --all".to_string(),
            )),
            (None, true) => Ok(Self::All),
            (Some(s), false) => Ok(Self::Single(s.parse()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers() {
        assert_eq!("42".parse::<PrSelector>().unwrap(), PrSelector::Number(42));
        assert_eq!("#42".parse::<PrSelector>().unwrap(), PrSelector::Number(42));
    }

    #[test]
    fn test_parse_urls() {
        assert_eq!(
            "https://github.com/o/r/pull/17".parse::<PrSelector>().unwrap(),
            PrSelector::Number(17)
        );
        assert_eq!(
            "https://github.com/o/r/pull/17/files".parse::<PrSelector>().unwrap(),
            PrSelector::Number(17)
        );
        assert_eq!(
            "https://gitlab.com/g/sub/r/-/merge_requests/5"
                .parse::<PrSelector>()
                .unwrap(),
            PrSelector::Number(5)
        );
    }

    #[test]
    fn test_parse_non_pr_url_rejected() {
        let err = "https://github.com/o/r/issues/3"
            .parse::<PrSelector>()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSelection(_)));
    }

    #[test]
    fn test_parse_branch() {
        assert_eq!(
            "feature/login".parse::<PrSelector>().unwrap(),
            PrSelector::Branch("feature/login".to_string())
        );
    }

    #[test]
    fn test_selection_requires_exactly_one() {
        assert!(matches!(
            Selection::from_args(Some("1"), true),
            Err(Error::InvalidSelection(_))
        ));
        assert!(matches!(
            Selection::from_args(None, false),
            Err(Error::InvalidSelection(_))
        ));
        assert_eq!(Selection::from_args(None, true).unwrap(), Selection::All);
        assert_eq!(
            Selection::from_args(Some("9"), false).unwrap(),
            Selection::Single(PrSelector::Number(9))
        );
    }
}

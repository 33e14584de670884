//! Policy for capture files whose name is already taken

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidChoiceError;

/// What to do when `sample_<HH_MM_SS>.pcm` already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Append `_1`, `_2`, ... until the name is free
    #[default]
    Uniquify,
    /// Truncate the existing file
    Overwrite,
    /// Refuse to start the session
    Fail,
}

impl CollisionPolicy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uniquify => "uniquify",
            Self::Overwrite => "overwrite",
            Self::Fail => "fail",
        }
    }
}

impl FromStr for CollisionPolicy {
    type Err = InvalidChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uniquify" => Ok(Self::Uniquify),
            "overwrite" => Ok(Self::Overwrite),
            "fail" => Ok(Self::Fail),
            _ => Err(InvalidChoiceError {
                what: "collision policy",
                input: s.to_string(),
                valid: "uniquify, overwrite, fail",
            }),
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_policies() {
        assert_eq!("uniquify".parse::<CollisionPolicy>().unwrap(), CollisionPolicy::Uniquify);
        assert_eq!("Overwrite".parse::<CollisionPolicy>().unwrap(), CollisionPolicy::Overwrite);
        assert_eq!(" fail ".parse::<CollisionPolicy>().unwrap(), CollisionPolicy::Fail);
        assert!("rename".parse::<CollisionPolicy>().is_err());
    }

    #[test]
    fn default_uniquifies() {
        assert_eq!(CollisionPolicy::default(), CollisionPolicy::Uniquify);
    }
}

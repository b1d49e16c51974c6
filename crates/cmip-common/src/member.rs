//! Ensemble member keys (`r<run>i<init>p<physics>f<forcing>`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Run/initialisation/physics/forcing indices identifying one ensemble member.
///
/// Equality is on the parsed integers, so `r01i1p1f1` and `r1i1p1f1` are the
/// same member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnsembleMemberKey {
    pub run: u32,
    pub init: u32,
    pub physics: u32,
    pub forcing: u32,
}

impl EnsembleMemberKey {
    pub fn new(run: u32, init: u32, physics: u32, forcing: u32) -> Self {
        Self {
            run,
            init,
            physics,
            forcing,
        }
    }

    /// Parse a member token.
    ///
    /// Hindcast tokens carry a start-year prefix (`s1960-r1i1p1f1`); the key
    /// is read from the text after the last `-`.
    pub fn parse(token: &str) -> Result<Self, MemberKeyParseError> {
        let key = token.rsplit('-').next().unwrap_or(token);
        let invalid = || MemberKeyParseError::InvalidFormat(token.to_string());

        let rest = key.strip_prefix('r').ok_or_else(invalid)?;
        let (run, rest) = rest.split_once('i').ok_or_else(invalid)?;
        let (init, rest) = rest.split_once('p').ok_or_else(invalid)?;
        let (physics, forcing) = rest.split_once('f').ok_or_else(invalid)?;

        Ok(Self {
            run: parse_index(run, token)?,
            init: parse_index(init, token)?,
            physics: parse_index(physics, token)?,
            forcing: parse_index(forcing, token)?,
        })
    }

    /// Value of a single component.
    pub fn component(&self, component: MemberComponent) -> u32 {
        match component {
            MemberComponent::Run => self.run,
            MemberComponent::Init => self.init,
            MemberComponent::Physics => self.physics,
            MemberComponent::Forcing => self.forcing,
        }
    }
}

fn parse_index(digits: &str, token: &str) -> Result<u32, MemberKeyParseError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MemberKeyParseError::InvalidIndex {
            token: token.to_string(),
            index: digits.to_string(),
        });
    }
    digits.parse().map_err(|_| MemberKeyParseError::InvalidIndex {
        token: token.to_string(),
        index: digits.to_string(),
    })
}

impl FromStr for EnsembleMemberKey {
    type Err = MemberKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EnsembleMemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "r{}i{}p{}f{}",
            self.run, self.init, self.physics, self.forcing
        )
    }
}

/// One of the four indices of a member key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberComponent {
    Run,
    Init,
    Physics,
    Forcing,
}

impl MemberComponent {
    pub const ALL: [MemberComponent; 4] = [
        MemberComponent::Run,
        MemberComponent::Init,
        MemberComponent::Physics,
        MemberComponent::Forcing,
    ];
}

/// Error parsing a member token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemberKeyParseError {
    #[error("Invalid member key format: {0}. Expected 'r<n>i<n>p<n>f<n>'")]
    InvalidFormat(String),

    #[error("Invalid index '{index}' in member key {token}")]
    InvalidIndex { token: String, index: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let key = EnsembleMemberKey::parse("r1i1p1f1").unwrap();
        assert_eq!(key, EnsembleMemberKey::new(1, 1, 1, 1));
    }

    #[test]
    fn test_parse_multi_digit() {
        for run in [1u32, 10, 99] {
            for other in [1u32, 12, 250] {
                let token = format!("r{}i{}p{}f{}", run, other, other + 1, other + 2);
                let key: EnsembleMemberKey = token.parse().unwrap();
                assert_eq!(key.run, run);
                assert_eq!(key.init, other);
                assert_eq!(key.physics, other + 1);
                assert_eq!(key.forcing, other + 2);
                assert_eq!(key.to_string(), token);
            }
        }
    }

    #[test]
    fn test_parse_hindcast_prefix() {
        let key = EnsembleMemberKey::parse("s1960-r10i1p1f2").unwrap();
        assert_eq!(key, EnsembleMemberKey::new(10, 1, 1, 2));
    }

    #[test]
    fn test_zero_padded_tokens_collapse() {
        let a = EnsembleMemberKey::parse("r01i1p1f1").unwrap();
        let b = EnsembleMemberKey::parse("r1i1p1f1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            EnsembleMemberKey::parse("i1p1f1"),
            Err(MemberKeyParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            EnsembleMemberKey::parse("r1i1p1"),
            Err(MemberKeyParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            EnsembleMemberKey::parse("rxi1p1f1"),
            Err(MemberKeyParseError::InvalidIndex { .. })
        ));
        assert!(EnsembleMemberKey::parse("r1i1p1f").is_err());
    }

    #[test]
    fn test_component() {
        let key = EnsembleMemberKey::new(3, 5, 7, 9);
        let values: Vec<u32> = MemberComponent::ALL
            .iter()
            .map(|c| key.component(*c))
            .collect();
        assert_eq!(values, vec![3, 5, 7, 9]);
    }
}

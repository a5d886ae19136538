//! The verdict vocabulary produced by a predicate evaluation.

use serde::{Deserialize, Serialize};

/// Direction of travel on the vertical lattice guide.
///
/// Produced once per predicate evaluation and consumed exactly once by the
/// engine. `Independent`, `Lub`, `Glb` and `Set` are reserved for lattice
/// topologies beyond a linear chain; the engine treats them as explicitly
/// unsupported outcomes, not as errors to guess semantics for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LatticeDirection {
    /// An error has occurred; abort the call frame.
    Error,
    /// No effect; stay at the current node and execute its operation.
    Neutral,
    /// Next node up the lattice, towards the top.
    Up,
    /// Next node down the lattice, towards the bottom.
    Down,
    /// Reserved: adjacent node that is neither up nor down.
    Independent,
    /// Reserved: least upper bound of the nodes considered.
    Lub,
    /// Reserved: greatest lower bound of the nodes considered.
    Glb,
    /// Reserved: a set of next nodes.
    Set,
}

impl LatticeDirection {
    /// The directions a linear chain can actually follow.
    pub const SUPPORTED: [LatticeDirection; 4] = [
        LatticeDirection::Error,
        LatticeDirection::Neutral,
        LatticeDirection::Up,
        LatticeDirection::Down,
    ];

    /// Whether this outcome is reserved for non-chain lattices.
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            LatticeDirection::Independent
                | LatticeDirection::Lub
                | LatticeDirection::Glb
                | LatticeDirection::Set
        )
    }

    fn name(self) -> &'static str {
        match self {
            LatticeDirection::Error => "error",
            LatticeDirection::Neutral => "neutral",
            LatticeDirection::Up => "up",
            LatticeDirection::Down => "down",
            LatticeDirection::Independent => "independent",
            LatticeDirection::Lub => "lub",
            LatticeDirection::Glb => "glb",
            LatticeDirection::Set => "set",
        }
    }
}

impl std::fmt::Display for LatticeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error from parsing a direction name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "unknown lattice direction `{0}`: expected error, neutral, up, down, independent, lub, glb, or set"
)]
pub struct ParseDirectionError(pub String);

impl std::str::FromStr for LatticeDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(LatticeDirection::Error),
            "neutral" => Ok(LatticeDirection::Neutral),
            "up" => Ok(LatticeDirection::Up),
            "down" => Ok(LatticeDirection::Down),
            "independent" => Ok(LatticeDirection::Independent),
            "lub" => Ok(LatticeDirection::Lub),
            "glb" => Ok(LatticeDirection::Glb),
            "set" => Ok(LatticeDirection::Set),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_outcomes() {
        assert!(LatticeDirection::Independent.is_reserved());
        assert!(LatticeDirection::Lub.is_reserved());
        assert!(LatticeDirection::Glb.is_reserved());
        assert!(LatticeDirection::Set.is_reserved());
        for dir in LatticeDirection::SUPPORTED {
            assert!(!dir.is_reserved());
        }
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for dir in [
            LatticeDirection::Error,
            LatticeDirection::Neutral,
            LatticeDirection::Up,
            LatticeDirection::Down,
            LatticeDirection::Independent,
            LatticeDirection::Lub,
            LatticeDirection::Glb,
            LatticeDirection::Set,
        ] {
            assert_eq!(dir.to_string().parse::<LatticeDirection>(), Ok(dir));
        }
    }

    #[test]
    fn rejects_unknown_names() {
        assert!("sideways".parse::<LatticeDirection>().is_err());
    }
}

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifies one addend of the combined operator.
///
/// Ordering places the analytic part first, followed by prime parts in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentId {
    Analytic,
    Prime(u64),
}

impl ComponentId {
    pub fn prime(&self) -> Option<u64> {
        match *self {
            ComponentId::Analytic => None,
            ComponentId::Prime(p) => Some(p),
        }
    }

    pub fn is_analytic(&self) -> bool {
        matches!(self, ComponentId::Analytic)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentId::Analytic => write!(f, "analytic"),
            ComponentId::Prime(p) => write!(f, "p={}", p),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unrecognized component label '{0}'. Expected 'analytic' or 'p=<prime>'.")]
pub struct ParseComponentIdError(String);

impl FromStr for ComponentId {
    type Err = ParseComponentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("analytic") {
            return Ok(ComponentId::Analytic);
        }
        trimmed
            .strip_prefix("p=")
            .and_then(|p| p.trim().parse::<u64>().ok())
            .map(ComponentId::Prime)
            .ok_or_else(|| ParseComponentIdError(s.to_string()))
    }
}

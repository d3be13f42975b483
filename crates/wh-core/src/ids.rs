use core::fmt;
use core::str::FromStr;
use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Human-readable component identifier (`X1`, `CB2`, `W14`).
///
/// Any non-empty token without whitespace or `.` is accepted; `.` is reserved
/// for cable-core connection keys. The canonical shape `<prefix><n>` (letters
/// followed by a positive integer without leading zeros) is what the allocator
/// produces and what the validator expects.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Designator(String);

impl Designator {
    pub fn new(value: impl Into<String>) -> CoreResult<Self> {
        let value = value.into();
        if value.is_empty() || value.contains('.') || value.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidDesignator(value));
        }
        Ok(Self(value))
    }

    pub(crate) fn from_parts(prefix: &str, number: u32) -> Self {
        Self(format!("{prefix}{number}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a canonical designator into prefix and number.
    ///
    /// Returns `None` for anything that is not `<letters><positive integer>`.
    pub fn split(&self) -> Option<(&str, u32)> {
        let digits_at = self.0.find(|c: char| c.is_ascii_digit())?;
        let (prefix, digits) = self.0.split_at(digits_at);
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        if digits.starts_with('0') || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let number = digits.parse::<u32>().ok()?;
        Some((prefix, number))
    }

    pub fn prefix(&self) -> Option<&str> {
        self.split().map(|(prefix, _)| prefix)
    }

    pub fn number(&self) -> Option<u32> {
        self.split().map(|(_, n)| n)
    }
}

impl fmt::Debug for Designator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Designator({})", self.0)
    }
}

impl fmt::Display for Designator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Designator {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Designator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Designator {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Designator {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Designator {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Designator> for String {
    fn from(value: Designator) -> Self {
        value.0
    }
}

impl PartialEq<str> for Designator {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Designator {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// External identity of a connection.
///
/// Simple connections are keyed by their wire designator (`W1`); cable-core
/// connections by `<cable>.<core_no>` (`C1.2`, core numbers 1-indexed). The two
/// shapes never collide because designators cannot contain `.`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ConnectionKey {
    Wire(Designator),
    Core { cable: Designator, core_no: u32 },
}

impl ConnectionKey {
    pub fn wire(designator: Designator) -> Self {
        Self::Wire(designator)
    }

    pub fn core(cable: Designator, core_no: u32) -> Self {
        Self::Core { cable, core_no }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s.rsplit_once('.') {
            None => Designator::new(s)
                .map(Self::Wire)
                .map_err(|_| CoreError::InvalidConnectionKey(s.to_string())),
            Some((cable, core)) => {
                let cable = Designator::new(cable)
                    .map_err(|_| CoreError::InvalidConnectionKey(s.to_string()))?;
                if core.is_empty() || !core.chars().all(|c| c.is_ascii_digit()) {
                    return Err(CoreError::InvalidConnectionKey(s.to_string()));
                }
                let core_no = core
                    .parse::<u32>()
                    .map_err(|_| CoreError::InvalidConnectionKey(s.to_string()))?;
                Ok(Self::Core { cable, core_no })
            }
        }
    }

    /// The wire designator, or the cable designator for core keys.
    pub fn designator(&self) -> &Designator {
        match self {
            Self::Wire(d) => d,
            Self::Core { cable, .. } => cable,
        }
    }

    pub fn is_core(&self) -> bool {
        matches!(self, Self::Core { .. })
    }

    pub fn cable_core(&self) -> Option<(&Designator, u32)> {
        match self {
            Self::Core { cable, core_no } => Some((cable, *core_no)),
            Self::Wire(_) => None,
        }
    }
}

impl fmt::Debug for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionKey({self})")
    }
}

impl fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(d) => write!(f, "{d}"),
            Self::Core { cable, core_no } => write!(f, "{cable}.{core_no}"),
        }
    }
}

impl FromStr for ConnectionKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ConnectionKey {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ConnectionKey> for String {
    fn from(value: ConnectionKey) -> Self {
        value.to_string()
    }
}

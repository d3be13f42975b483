//! Closed vocabularies shared across the model and the exchange format.
//!
//! Serialized names are the lowercase snake_case strings the exchange document uses.

use core::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    Connector,
    Terminal,
    Wire,
    Cable,
    Assembly,
}

impl PartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PartKind::Connector => "connector",
            PartKind::Terminal => "terminal",
            PartKind::Wire => "wire",
            PartKind::Cable => "cable",
            PartKind::Assembly => "assembly",
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactGender {
    Male,
    Female,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorShape {
    Circular,
    Rectangular,
    Dsub,
    TerminalBlock,
    Ferrule,
    #[serde(rename = "quickdisconnect")]
    QuickDisconnect,
    Ring,
    Button,
    #[default]
    Other,
}

/// Specialized connector categories; each selects its own designator prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorCategory {
    PowerSupply,
    CircuitBreaker,
    Fuse,
    Fan,
    PushButton,
    Switch,
    Relay,
    Contactor,
    Timer,
    Pcb,
    Motor,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConductorType {
    Solid,
    #[default]
    Stranded,
}

/// Unit a BOM line is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    #[default]
    Each,
    Ft,
    M,
}

impl Unit {
    /// Wires are bought by length, everything else by count.
    pub fn default_for(kind: PartKind) -> Self {
        match kind {
            PartKind::Wire => Unit::Ft,
            _ => Unit::Each,
        }
    }
}

/// Side of a connector or cable a conductor leaves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Left,
    Right,
}

/// How a flying lead is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationType {
    #[default]
    Bare,
    Tinned,
    HeatShrink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    #[default]
    Auto,
    Manual,
}

/// Which end of a cable a bundle label sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CableEnd {
    Start,
    End,
    Both,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_defaults_to_feet() {
        assert_eq!(Unit::default_for(PartKind::Wire), Unit::Ft);
        assert_eq!(Unit::default_for(PartKind::Cable), Unit::Each);
        assert_eq!(Unit::default_for(PartKind::Connector), Unit::Each);
    }

    #[test]
    fn exchange_names() {
        let shape = serde_json::to_value(ConnectorShape::QuickDisconnect).unwrap();
        assert_eq!(shape, "quickdisconnect");
        let cat = serde_json::to_value(ConnectorCategory::CircuitBreaker).unwrap();
        assert_eq!(cat, "circuit_breaker");
        let term: TerminationType = serde_json::from_str("\"heat_shrink\"").unwrap();
        assert_eq!(term, TerminationType::HeatShrink);
    }
}

//! Connection endpoints.
//!
//! An endpoint is one of three closed variants; the graph, the validator and
//! the serializer all match on it exhaustively.

use wh_core::{Designator, Extras, RoutingMode, Side, TerminationType};

use crate::registry::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    ConnectorPin(PinEnd),
    CableCore(CoreEnd),
    FlyingLead(LeadEnd),
}

/// A 1-indexed pin on a connector instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PinEnd {
    pub connector: Designator,
    pub pin: u32,
    pub side: Side,
    pub terminal: Option<Designator>,
    pub routing: Option<Routing>,
    pub extras: Extras,
}

/// A 1-indexed core of a cable instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreEnd {
    pub cable: Designator,
    pub core_no: u32,
    pub side: Side,
    pub shield: Option<bool>,
    pub routing: Option<Routing>,
    pub extras: Extras,
}

/// An unterminated wire end.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadEnd {
    pub termination_type: TerminationType,
    pub strip_length_mm: Option<f64>,
    pub tin_length_mm: Option<f64>,
    pub terminal: Option<Designator>,
    pub routing: Option<Routing>,
    pub extras: Extras,
}

/// Routing hints for the visual editor. Unknown keys are carried in `extras`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Routing {
    pub mode: RoutingMode,
    pub waypoints: Option<Vec<Position>>,
    pub bundle_side: Option<Side>,
    pub extras: Extras,
}

impl Endpoint {
    pub fn pin(connector: Designator, pin: u32, side: Side) -> Self {
        Endpoint::ConnectorPin(PinEnd {
            connector,
            pin,
            side,
            terminal: None,
            routing: None,
            extras: Extras::new(),
        })
    }

    pub fn core(cable: Designator, core_no: u32, side: Side) -> Self {
        Endpoint::CableCore(CoreEnd {
            cable,
            core_no,
            side,
            shield: None,
            routing: None,
            extras: Extras::new(),
        })
    }

    pub fn flying_lead(termination_type: TerminationType) -> Self {
        Endpoint::FlyingLead(LeadEnd {
            termination_type,
            strip_length_mm: None,
            tin_length_mm: None,
            terminal: None,
            routing: None,
            extras: Extras::new(),
        })
    }

    /// Attach a terminal crimp. Cable cores carry no terminal and are returned unchanged.
    pub fn with_terminal(mut self, terminal: Designator) -> Self {
        match &mut self {
            Endpoint::ConnectorPin(p) => p.terminal = Some(terminal),
            Endpoint::FlyingLead(l) => l.terminal = Some(terminal),
            Endpoint::CableCore(_) => {}
        }
        self
    }

    pub fn with_routing(mut self, routing: Routing) -> Self {
        match &mut self {
            Endpoint::ConnectorPin(p) => p.routing = Some(routing),
            Endpoint::CableCore(c) => c.routing = Some(routing),
            Endpoint::FlyingLead(l) => l.routing = Some(routing),
        }
        self
    }

    /// Exchange-format discriminant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Endpoint::ConnectorPin(_) => "connector_pin",
            Endpoint::CableCore(_) => "cable_core",
            Endpoint::FlyingLead(_) => "flying_lead",
        }
    }

    /// The connector or cable this endpoint sits on.
    pub fn component(&self) -> Option<&Designator> {
        match self {
            Endpoint::ConnectorPin(p) => Some(&p.connector),
            Endpoint::CableCore(c) => Some(&c.cable),
            Endpoint::FlyingLead(_) => None,
        }
    }

    pub fn terminal(&self) -> Option<&Designator> {
        match self {
            Endpoint::ConnectorPin(p) => p.terminal.as_ref(),
            Endpoint::CableCore(_) => None,
            Endpoint::FlyingLead(l) => l.terminal.as_ref(),
        }
    }

    pub fn routing(&self) -> Option<&Routing> {
        match self {
            Endpoint::ConnectorPin(p) => p.routing.as_ref(),
            Endpoint::CableCore(c) => c.routing.as_ref(),
            Endpoint::FlyingLead(l) => l.routing.as_ref(),
        }
    }

    pub fn references(&self, designator: &str) -> bool {
        self.component().is_some_and(|d| d == designator)
            || self.terminal().is_some_and(|d| d == designator)
    }

    pub fn cable_core(&self) -> Option<(&Designator, u32)> {
        match self {
            Endpoint::CableCore(c) => Some((&c.cable, c.core_no)),
            _ => None,
        }
    }

    pub fn is_pin(&self) -> bool {
        matches!(self, Endpoint::ConnectorPin(_))
    }

    /// Unrecognised keys carried by this endpoint in the exchange document.
    pub fn extras(&self) -> &Extras {
        match self {
            Endpoint::ConnectorPin(p) => &p.extras,
            Endpoint::CableCore(c) => &c.extras,
            Endpoint::FlyingLead(l) => &l.extras,
        }
    }
}

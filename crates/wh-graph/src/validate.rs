//! Whole-harness validation.
//!
//! `validate` never mutates and never fails; it returns every finding in a fixed
//! order so reports are reproducible:
//!
//! 1. references resolve to live components of the right kind
//! 2. connector pins within `1..=positions`
//! 3. cable cores within `1..=core_count`
//! 4. every cable core connected exactly once, and anything joined to a core
//!    ends at connector pins
//! 5. `pin_mapping` keys are 0-indexed positions
//! 6. designators look like `<prefix><n>` with the prefix for their kind
//! 7. twisted-pair groups
//!
//! Errors make a harness invalid. Warnings never block export.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use wh_core::{ConnectionKey, Designator, PartKind, prefix_for};

use crate::endpoint::Endpoint;
use crate::graph::{Connection, ConnectionGraph, core_misterminations};
use crate::registry::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// Structural findings break the harness; format findings are advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingClass {
    Structural,
    Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FindingCode {
    DanglingReference,
    WrongComponentKind,
    PinOutOfRange,
    CoreOutOfRange,
    MissingCoreConnection,
    DuplicateCoreConnection,
    UnsupportedCoreTermination,
    InvalidPinMappingKey,
    DesignatorMismatch,
    TwistedPairMisuse,
}

impl FindingCode {
    pub fn class(self) -> FindingClass {
        match self {
            FindingCode::InvalidPinMappingKey
            | FindingCode::DesignatorMismatch
            | FindingCode::TwistedPairMisuse => FindingClass::Format,
            _ => FindingClass::Structural,
        }
    }

    pub fn severity(self) -> Severity {
        match self.class() {
            FindingClass::Structural => Severity::Error,
            FindingClass::Format => Severity::Warning,
        }
    }
}

impl fmt::Display for FindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub code: FindingCode,
    pub message: String,
    /// Designator or connection key the finding is about.
    pub subject: String,
}

impl Finding {
    fn new(code: FindingCode, subject: impl ToString, message: String) -> Self {
        Self {
            severity: code.severity(),
            code,
            message,
            subject: subject.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.subject, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    /// True when no finding has error severity.
    pub fn is_valid(&self) -> bool {
        !self.findings.iter().any(Finding::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Warning)
    }

    pub fn with_code(&self, code: FindingCode) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.code == code)
    }

    pub fn count(&self, code: FindingCode) -> usize {
        self.with_code(code).count()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

pub fn validate(registry: &Registry, graph: &ConnectionGraph) -> ValidationReport {
    let mut out = Vec::new();

    check_references(registry, graph, &mut out);
    check_pins(registry, graph, &mut out);
    check_core_ranges(registry, graph, &mut out);
    check_core_coverage(registry, graph, &mut out);
    check_pin_mappings(registry, &mut out);
    check_designators(registry, &mut out);
    check_twisted_pairs(registry, graph, &mut out);

    let report = ValidationReport { findings: out };
    tracing::debug!(
        components = registry.len(),
        connections = graph.len(),
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "validated harness"
    );
    report
}

/// Every designator a connection names, with the kind it must have.
fn references(conn: &Connection) -> Vec<(&'static str, &Designator, PartKind)> {
    let mut refs = Vec::with_capacity(5);
    match &conn.key {
        ConnectionKey::Wire(w) => refs.push(("wire", w, PartKind::Wire)),
        ConnectionKey::Core { cable, .. } => refs.push(("cable", cable, PartKind::Cable)),
    }
    for (_, ep) in conn.endpoints() {
        match ep {
            Endpoint::ConnectorPin(p) => refs.push(("connector", &p.connector, PartKind::Connector)),
            Endpoint::CableCore(c) => refs.push(("cable", &c.cable, PartKind::Cable)),
            Endpoint::FlyingLead(_) => {}
        }
        if let Some(t) = ep.terminal() {
            refs.push(("terminal", t, PartKind::Terminal));
        }
    }
    refs
}

fn check_references(registry: &Registry, graph: &ConnectionGraph, out: &mut Vec<Finding>) {
    for conn in graph.all() {
        for (role, designator, expected) in references(conn) {
            match registry.find(designator.as_str()) {
                None => out.push(Finding::new(
                    FindingCode::DanglingReference,
                    &conn.key,
                    format!("{role} {designator} is not in the BOM"),
                )),
                Some(inst) if inst.kind() != expected => out.push(Finding::new(
                    FindingCode::WrongComponentKind,
                    &conn.key,
                    format!("{role} {designator} is a {}, expected a {expected}", inst.kind()),
                )),
                Some(_) => {}
            }
        }
    }
}

fn check_pins(registry: &Registry, graph: &ConnectionGraph, out: &mut Vec<Finding>) {
    for conn in graph.all() {
        for (end, ep) in conn.endpoints() {
            let Endpoint::ConnectorPin(p) = ep else { continue };
            let Some(spec) = registry
                .find(p.connector.as_str())
                .and_then(|i| i.part.as_connector())
            else {
                continue;
            };
            if !spec.has_pin(p.pin) {
                out.push(Finding::new(
                    FindingCode::PinOutOfRange,
                    &conn.key,
                    format!(
                        "{end} pin {} on {} outside 1-{}",
                        p.pin, p.connector, spec.positions
                    ),
                ));
            }
        }
    }
}

fn check_core_ranges(registry: &Registry, graph: &ConnectionGraph, out: &mut Vec<Finding>) {
    for conn in graph.all() {
        let mut seen = Vec::new();
        for (cable, core_no) in conn.claimed_cores() {
            if seen.contains(&(cable, core_no)) {
                continue;
            }
            seen.push((cable, core_no));
            let Some(spec) = registry
                .find(cable.as_str())
                .and_then(|i| i.part.as_cable())
            else {
                continue;
            };
            if !spec.has_core(core_no) {
                out.push(Finding::new(
                    FindingCode::CoreOutOfRange,
                    &conn.key,
                    format!(
                        "core {core_no} does not exist on {cable} (core_count {})",
                        spec.core_count
                    ),
                ));
            }
        }
    }
}

fn check_core_coverage(registry: &Registry, graph: &ConnectionGraph, out: &mut Vec<Finding>) {
    for conn in graph.all() {
        for (end, ep) in core_misterminations(&conn.key, &conn.end1, &conn.end2) {
            out.push(Finding::new(
                FindingCode::UnsupportedCoreTermination,
                &conn.key,
                format!("{end} is a {}; cable cores must end at connector pins", ep.type_name()),
            ));
        }
    }

    for inst in registry.all() {
        let Some(spec) = inst.part.as_cable() else { continue };
        let cable = inst.designator.as_str();
        for core_no in 1..=spec.core_count {
            let claimants: Vec<&ConnectionKey> = graph
                .all()
                .filter(|c| c.claims_core(cable, core_no))
                .map(|c| &c.key)
                .collect();
            match claimants.as_slice() {
                [] => {
                    let half = graph.pending().any(|h| h.claims_core(cable, core_no));
                    let message = if half {
                        format!("core {core_no} of {cable} has only one end connected")
                    } else {
                        format!("core {core_no} of {cable} has no connection")
                    };
                    out.push(Finding::new(FindingCode::MissingCoreConnection, cable, message));
                }
                [_] => {}
                many => {
                    let keys: Vec<String> = many.iter().map(|k| k.to_string()).collect();
                    out.push(Finding::new(
                        FindingCode::DuplicateCoreConnection,
                        cable,
                        format!(
                            "core {core_no} of {cable} is claimed by {}",
                            keys.join(", ")
                        ),
                    ));
                }
            }
        }
    }
}

fn check_pin_mappings(registry: &Registry, out: &mut Vec<Finding>) {
    for inst in registry.all() {
        let Some(spec) = inst.part.as_connector() else { continue };
        for key in spec.pin_mapping.keys() {
            let index = if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
                key.parse::<u32>().ok()
            } else {
                None
            };
            match index {
                Some(i) if i < spec.positions => {}
                Some(_) => out.push(Finding::new(
                    FindingCode::InvalidPinMappingKey,
                    &inst.designator,
                    format!(
                        "pin_mapping key \"{key}\" out of range (valid keys 0-{})",
                        spec.positions.saturating_sub(1)
                    ),
                )),
                None => out.push(Finding::new(
                    FindingCode::InvalidPinMappingKey,
                    &inst.designator,
                    format!("pin_mapping key \"{key}\" is not a pin index"),
                )),
            }
        }
    }
}

fn check_designators(registry: &Registry, out: &mut Vec<Finding>) {
    for inst in registry.all() {
        let expected = prefix_for(inst.kind(), inst.part.category());
        match inst.designator.split() {
            Some((prefix, _)) if prefix == expected => {}
            Some((prefix, _)) => out.push(Finding::new(
                FindingCode::DesignatorMismatch,
                &inst.designator,
                format!("prefix {prefix} does not match {} (expected {expected})", inst.kind()),
            )),
            None => out.push(Finding::new(
                FindingCode::DesignatorMismatch,
                &inst.designator,
                format!("not of the form {expected}<n>"),
            )),
        }
    }
}

fn check_twisted_pairs(registry: &Registry, graph: &ConnectionGraph, out: &mut Vec<Finding>) {
    let mut groups: IndexMap<&str, Vec<&Connection>> = IndexMap::new();
    for conn in graph.all() {
        if let Some(id) = conn.twisted_pair_id.as_deref() {
            groups.entry(id).or_default().push(conn);
        }
    }

    for (id, members) in groups {
        if members.len() < 2 {
            out.push(Finding::new(
                FindingCode::TwistedPairMisuse,
                id,
                format!("twisted pair {id} has a single member"),
            ));
        }
        for conn in members {
            // Core-keyed members are exempt.
            let ConnectionKey::Wire(wire) = &conn.key else { continue };
            if let Some(inst) = registry.find(wire.as_str())
                && inst.kind() != PartKind::Wire
            {
                out.push(Finding::new(
                    FindingCode::TwistedPairMisuse,
                    id,
                    format!("member {wire} is a {}, not a wire", inst.kind()),
                ));
            }
        }
    }
}

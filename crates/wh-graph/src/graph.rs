//! Connection graph.
//!
//! Connections are keyed by wire designator (`W1`) or by cable core (`C1.2`).
//! Every `connect` call is checked against the registry on the spot; a
//! connection that would reference a missing component, an out-of-range pin or
//! an already claimed core is never stored.
//!
//! Anything joined to a cable core must end at a connector pin. A core-keyed
//! connection has a pin at both ends; a cable-core endpoint is only accepted
//! opposite a pin. Core connections can also be built from two pin-to-core
//! halves with [`ConnectionGraph::connect_half`].

use indexmap::IndexMap;
use wh_core::{ConnectionKey, Designator, Extras, PartKind};

use crate::endpoint::Endpoint;
use crate::error::{GraphError, GraphResult};
use crate::registry::{ComponentInstance, Registry};

#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub key: ConnectionKey,
    pub end1: Endpoint,
    pub end2: Endpoint,
    pub length_mm: Option<f64>,
    pub label_end1: Option<String>,
    pub label_end2: Option<String>,
    /// Deprecated single label as read from an older document. Never written.
    pub legacy_label: Option<String>,
    pub twisted_pair_id: Option<String>,
    pub extras: Extras,
}

impl Connection {
    pub fn endpoints(&self) -> [(&'static str, &Endpoint); 2] {
        [("end1", &self.end1), ("end2", &self.end2)]
    }

    /// Every `(cable, core_no)` this connection occupies: its own key if it is
    /// a core connection, plus any cable-core endpoints.
    pub fn claimed_cores(&self) -> impl Iterator<Item = (&Designator, u32)> {
        self.key
            .cable_core()
            .into_iter()
            .chain(self.end1.cable_core())
            .chain(self.end2.cable_core())
    }

    pub fn claims_core(&self, cable: &str, core_no: u32) -> bool {
        self.claimed_cores()
            .any(|(c, n)| c == cable && n == core_no)
    }

    /// Whether the key or any endpoint names `designator`.
    pub fn references(&self, designator: &str) -> bool {
        self.key.designator() == designator
            || self.end1.references(designator)
            || self.end2.references(designator)
    }
}

/// Optional attributes supplied with `connect`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectionAttrs {
    pub length_mm: Option<f64>,
    pub label_end1: Option<String>,
    pub label_end2: Option<String>,
    pub legacy_label: Option<String>,
    pub twisted_pair_id: Option<String>,
    /// Unrecognised keys of the mapping entry.
    pub extras: Extras,
}

impl ConnectionAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length_mm(mut self, length_mm: f64) -> Self {
        self.length_mm = Some(length_mm);
        self
    }

    pub fn label_end1(mut self, label: impl Into<String>) -> Self {
        self.label_end1 = Some(label.into());
        self
    }

    pub fn label_end2(mut self, label: impl Into<String>) -> Self {
        self.label_end2 = Some(label.into());
        self
    }

    pub fn twisted_pair(mut self, id: impl Into<String>) -> Self {
        self.twisted_pair_id = Some(id.into());
        self
    }
}

/// A connector pin joined to one end of a cable core, waiting for the pin at
/// the core's far end.
#[derive(Debug, Clone, PartialEq)]
pub struct HalfConnection {
    /// `<cable>.<core_no>` key the completed connection will carry.
    pub key: ConnectionKey,
    pub pin: Endpoint,
    /// Label at the pin.
    pub label: Option<String>,
    pub attrs: ConnectionAttrs,
}

impl HalfConnection {
    pub fn claims_core(&self, cable: &str, core_no: u32) -> bool {
        self.key
            .cable_core()
            .is_some_and(|(c, n)| c == cable && n == core_no)
    }

    pub fn references(&self, designator: &str) -> bool {
        self.key.designator() == designator || self.pin.references(designator)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionGraph {
    connections: IndexMap<ConnectionKey, Connection>,
    pending: IndexMap<ConnectionKey, HalfConnection>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check and store a connection.
    pub fn connect(
        &mut self,
        registry: &Registry,
        key: ConnectionKey,
        end1: Endpoint,
        end2: Endpoint,
        attrs: ConnectionAttrs,
    ) -> GraphResult<&Connection> {
        if self.connections.contains_key(&key) {
            return Err(GraphError::DuplicateConnection(key));
        }

        if let ConnectionKey::Wire(wire) = &key {
            resolve(registry, wire, PartKind::Wire, "wire")?;
        }
        if let Some(&(end, ep)) = core_misterminations(&key, &end1, &end2).first() {
            return Err(GraphError::UnsupportedCoreTermination {
                key: key.clone(),
                end,
                found: ep.type_name(),
            });
        }
        if let Some((cable, core_no)) = key.cable_core() {
            self.check_core(registry, cable, core_no)?;
        }

        for ep in [&end1, &end2] {
            self.check_endpoint(registry, ep)?;
        }
        if let (Some(a), Some(b)) = (end1.cable_core(), end2.cable_core())
            && a == b
        {
            return Err(GraphError::CoreAlreadyConnected {
                cable: a.0.clone(),
                core_no: a.1,
                existing: key,
            });
        }

        tracing::debug!(key = %key, end1 = end1.type_name(), end2 = end2.type_name(), "connect");

        let connection = Connection {
            key: key.clone(),
            end1,
            end2,
            length_mm: attrs.length_mm,
            label_end1: attrs.label_end1,
            label_end2: attrs.label_end2,
            legacy_label: attrs.legacy_label,
            twisted_pair_id: attrs.twisted_pair_id,
            extras: attrs.extras,
        };
        let (index, _) = self.connections.insert_full(key, connection);
        Ok(&self.connections[index])
    }

    /// Join a connector pin to a cable core.
    ///
    /// One end must be a cable core and the other a connector pin. The first
    /// half for a core is held back; the second completes the core's
    /// `<cable>.<core_no>` connection with the first pin as `end1`, and that
    /// connection is returned. Each half's label is the one given for its pin.
    pub fn connect_half(
        &mut self,
        registry: &Registry,
        end1: Endpoint,
        end2: Endpoint,
        mut attrs: ConnectionAttrs,
    ) -> GraphResult<Option<&Connection>> {
        let (core, pin, pin_end, label) = match (end1, end2) {
            (Endpoint::CableCore(core), pin) => (core, pin, "end2", attrs.label_end2.take()),
            (pin, Endpoint::CableCore(core)) => (core, pin, "end1", attrs.label_end1.take()),
            _ => return Err(GraphError::NoCoreEnd),
        };
        let key = ConnectionKey::core(core.cable.clone(), core.core_no);
        if !pin.is_pin() {
            return Err(GraphError::UnsupportedCoreTermination {
                key,
                end: pin_end,
                found: pin.type_name(),
            });
        }

        self.check_core_exists(registry, &core.cable, core.core_no)?;
        if let Some(existing) = self
            .connections
            .values()
            .find(|c| c.claims_core(core.cable.as_str(), core.core_no))
        {
            return Err(GraphError::CoreAlreadyConnected {
                cable: core.cable.clone(),
                core_no: core.core_no,
                existing: existing.key.clone(),
            });
        }
        self.check_endpoint(registry, &pin)?;

        let Some(first) = self.pending.shift_remove(&key) else {
            tracing::debug!(key = %key, "connect first half");
            let half = HalfConnection {
                key: key.clone(),
                pin,
                label,
                attrs,
            };
            self.pending.insert(key, half);
            return Ok(None);
        };

        let mut extras = first.attrs.extras.clone();
        extras.extend(attrs.extras);
        let merged = ConnectionAttrs {
            length_mm: first.attrs.length_mm.or(attrs.length_mm),
            label_end1: first.label.clone(),
            label_end2: label,
            legacy_label: None,
            twisted_pair_id: first
                .attrs
                .twisted_pair_id
                .clone()
                .or(attrs.twisted_pair_id),
            extras,
        };
        let connected = self
            .connect(registry, key.clone(), first.pin.clone(), pin, merged)
            .map(|_| ());
        if let Err(e) = connected {
            self.pending.insert(key, first);
            return Err(e);
        }
        Ok(self.connections.get(&key))
    }

    /// Remove a connection. Components are left untouched.
    pub fn disconnect(&mut self, key: &ConnectionKey) -> GraphResult<Connection> {
        let removed = self
            .connections
            .shift_remove(key)
            .ok_or_else(|| GraphError::ConnectionNotFound(key.clone()))?;
        tracing::debug!(key = %key, "disconnect");
        Ok(removed)
    }

    /// Drop a half connection that was never completed.
    pub fn cancel_half(&mut self, key: &ConnectionKey) -> GraphResult<HalfConnection> {
        let removed = self
            .pending
            .shift_remove(key)
            .ok_or_else(|| GraphError::ConnectionNotFound(key.clone()))?;
        tracing::debug!(key = %key, "cancel half connection");
        Ok(removed)
    }

    pub fn get(&self, key: &ConnectionKey) -> Option<&Connection> {
        self.connections.get(key)
    }

    /// All connections in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Half connections still waiting for their far pin.
    pub fn pending(&self) -> impl Iterator<Item = &HalfConnection> {
        self.pending.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ConnectionKey> {
        self.connections.keys()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Key of the first connection or half connection naming `designator`.
    pub fn first_referencing(&self, designator: &str) -> Option<&ConnectionKey> {
        self.connections
            .values()
            .find(|c| c.references(designator))
            .map(|c| &c.key)
            .or_else(|| {
                self.pending
                    .values()
                    .find(|h| h.references(designator))
                    .map(|h| &h.key)
            })
    }

    /// Key of the connection or half connection occupying a cable core.
    pub fn core_claimant(&self, cable: &str, core_no: u32) -> Option<&ConnectionKey> {
        self.connections
            .values()
            .find(|c| c.claims_core(cable, core_no))
            .map(|c| &c.key)
            .or_else(|| {
                self.pending
                    .values()
                    .find(|h| h.claims_core(cable, core_no))
                    .map(|h| &h.key)
            })
    }

    /// Store a connection without any checks, to build states `connect` refuses.
    #[cfg(test)]
    pub(crate) fn insert_unchecked(&mut self, connection: Connection) {
        self.connections.insert(connection.key.clone(), connection);
    }

    fn check_core_exists(
        &self,
        registry: &Registry,
        cable: &Designator,
        core_no: u32,
    ) -> GraphResult<()> {
        let instance = resolve(registry, cable, PartKind::Cable, "cable")?;
        if let Some(spec) = instance.part.as_cable()
            && !spec.has_core(core_no)
        {
            return Err(GraphError::CoreOutOfRange {
                cable: cable.clone(),
                core_no,
                core_count: spec.core_count,
            });
        }
        Ok(())
    }

    fn check_core(&self, registry: &Registry, cable: &Designator, core_no: u32) -> GraphResult<()> {
        self.check_core_exists(registry, cable, core_no)?;
        if let Some(existing) = self.core_claimant(cable.as_str(), core_no) {
            return Err(GraphError::CoreAlreadyConnected {
                cable: cable.clone(),
                core_no,
                existing: existing.clone(),
            });
        }
        Ok(())
    }

    fn check_endpoint(&self, registry: &Registry, endpoint: &Endpoint) -> GraphResult<()> {
        match endpoint {
            Endpoint::ConnectorPin(p) => {
                let instance = resolve(registry, &p.connector, PartKind::Connector, "connector")?;
                if let Some(spec) = instance.part.as_connector()
                    && !spec.has_pin(p.pin)
                {
                    return Err(GraphError::PinOutOfRange {
                        connector: p.connector.clone(),
                        pin: p.pin,
                        positions: spec.positions,
                    });
                }
            }
            Endpoint::CableCore(c) => self.check_core(registry, &c.cable, c.core_no)?,
            Endpoint::FlyingLead(_) => {}
        }
        if let Some(terminal) = endpoint.terminal() {
            resolve(registry, terminal, PartKind::Terminal, "terminal")?;
        }
        Ok(())
    }
}

/// Ends that are not connector pins although they must be: both ends of a
/// core-keyed connection, and the end opposite any cable-core endpoint.
pub(crate) fn core_misterminations<'a>(
    key: &ConnectionKey,
    end1: &'a Endpoint,
    end2: &'a Endpoint,
) -> Vec<(&'static str, &'a Endpoint)> {
    [("end1", end1, end2), ("end2", end2, end1)]
        .into_iter()
        .filter(|(_, ep, other)| (key.is_core() || other.cable_core().is_some()) && !ep.is_pin())
        .map(|(end, ep, _)| (end, ep))
        .collect()
}

/// Look up a component and insist on its kind.
fn resolve<'r>(
    registry: &'r Registry,
    designator: &Designator,
    expected: PartKind,
    role: &'static str,
) -> GraphResult<&'r ComponentInstance> {
    let instance = registry
        .find(designator.as_str())
        .ok_or_else(|| GraphError::DanglingReference {
            designator: designator.clone(),
            role,
        })?;
    if instance.kind() != expected {
        return Err(GraphError::WrongKind {
            designator: designator.clone(),
            expected,
            actual: instance.kind(),
        });
    }
    Ok(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wh_core::{CableSpec, ConnectorSpec, Part, Side, TerminalSpec, TerminationType, WireSpec};

    struct Fixture {
        registry: Registry,
        graph: ConnectionGraph,
    }

    fn fixture() -> Fixture {
        let mut registry = Registry::new();
        registry
            .add(Part::new("CONN-3", "Test", ConnectorSpec::new(3)), None)
            .unwrap(); // X1
        registry
            .add(Part::new("CONN-4", "Test", ConnectorSpec::new(4)), None)
            .unwrap(); // X2
        registry
            .add(Part::new("WIRE-20", "Test", WireSpec::new(20)), None)
            .unwrap(); // W1
        registry
            .add(Part::new("CBL-2", "Test", CableSpec::uniform(2)), None)
            .unwrap(); // C1
        registry
            .add(Part::new("CRIMP", "Test", TerminalSpec::new(18, 22)), None)
            .unwrap(); // T1
        Fixture {
            registry,
            graph: ConnectionGraph::new(),
        }
    }

    fn d(s: &str) -> Designator {
        Designator::new(s).unwrap()
    }

    fn key(s: &str) -> ConnectionKey {
        ConnectionKey::parse(s).unwrap()
    }

    #[test]
    fn connect_pin_to_pin() {
        let mut f = fixture();
        let conn = f
            .graph
            .connect(
                &f.registry,
                key("W1"),
                Endpoint::pin(d("X1"), 1, Side::Right),
                Endpoint::pin(d("X2"), 1, Side::Left),
                ConnectionAttrs::new().length_mm(300.0).label_end1("POWER"),
            )
            .unwrap();
        assert_eq!(conn.length_mm, Some(300.0));
        assert_eq!(conn.label_end1.as_deref(), Some("POWER"));
        assert_eq!(f.graph.len(), 1);
    }

    #[test]
    fn pin_zero_and_past_end_fail_immediately() {
        let mut f = fixture();
        for pin in [0, 4] {
            let err = f
                .graph
                .connect(
                    &f.registry,
                    key("W1"),
                    Endpoint::pin(d("X1"), pin, Side::Right),
                    Endpoint::pin(d("X2"), 1, Side::Left),
                    ConnectionAttrs::new(),
                )
                .unwrap_err();
            assert_eq!(
                err,
                GraphError::PinOutOfRange {
                    connector: d("X1"),
                    pin,
                    positions: 3
                }
            );
        }
        assert!(f.graph.is_empty());
    }

    #[test]
    fn unknown_component_is_dangling() {
        let mut f = fixture();
        let err = f
            .graph
            .connect(
                &f.registry,
                key("W1"),
                Endpoint::pin(d("X9"), 1, Side::Right),
                Endpoint::flying_lead(TerminationType::Bare),
                ConnectionAttrs::new(),
            )
            .unwrap_err();
        assert!(matches!(err, GraphError::DanglingReference { role: "connector", .. }));
    }

    #[test]
    fn wire_key_must_name_a_wire() {
        let mut f = fixture();
        let err = f
            .graph
            .connect(
                &f.registry,
                key("X2"),
                Endpoint::pin(d("X1"), 1, Side::Right),
                Endpoint::flying_lead(TerminationType::Bare),
                ConnectionAttrs::new(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::WrongKind {
                designator: d("X2"),
                expected: PartKind::Wire,
                actual: PartKind::Connector
            }
        );
    }

    #[test]
    fn terminal_must_be_a_terminal() {
        let mut f = fixture();
        let err = f
            .graph
            .connect(
                &f.registry,
                key("W1"),
                Endpoint::pin(d("X1"), 1, Side::Right).with_terminal(d("X2")),
                Endpoint::pin(d("X2"), 1, Side::Left),
                ConnectionAttrs::new(),
            )
            .unwrap_err();
        assert!(matches!(err, GraphError::WrongKind { expected: PartKind::Terminal, .. }));

        f.graph
            .connect(
                &f.registry,
                key("W1"),
                Endpoint::pin(d("X1"), 1, Side::Right).with_terminal(d("T1")),
                Endpoint::pin(d("X2"), 1, Side::Left),
                ConnectionAttrs::new(),
            )
            .unwrap();
    }

    #[test]
    fn core_connection_claims_core_once() {
        let mut f = fixture();
        f.graph
            .connect(
                &f.registry,
                key("C1.1"),
                Endpoint::pin(d("X1"), 1, Side::Right),
                Endpoint::pin(d("X2"), 1, Side::Left),
                ConnectionAttrs::new(),
            )
            .unwrap();

        // Same core through a wire connection's cable-core endpoint.
        let err = f
            .graph
            .connect(
                &f.registry,
                key("W1"),
                Endpoint::pin(d("X1"), 2, Side::Right),
                Endpoint::core(d("C1"), 1, Side::Left),
                ConnectionAttrs::new(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::CoreAlreadyConnected {
                cable: d("C1"),
                core_no: 1,
                existing: key("C1.1")
            }
        );
    }

    #[test]
    fn duplicate_key_rejected() {
        let mut f = fixture();
        let ends = || {
            (
                Endpoint::pin(d("X1"), 1, Side::Right),
                Endpoint::pin(d("X2"), 1, Side::Left),
            )
        };
        let (a, b) = ends();
        f.graph
            .connect(&f.registry, key("C1.2"), a, b, ConnectionAttrs::new())
            .unwrap();
        let (a, b) = ends();
        assert_eq!(
            f.graph
                .connect(&f.registry, key("C1.2"), a, b, ConnectionAttrs::new())
                .unwrap_err(),
            GraphError::DuplicateConnection(key("C1.2"))
        );
    }

    #[test]
    fn core_out_of_range() {
        let mut f = fixture();
        let err = f
            .graph
            .connect(
                &f.registry,
                key("C1.3"),
                Endpoint::pin(d("X1"), 1, Side::Right),
                Endpoint::pin(d("X2"), 1, Side::Left),
                ConnectionAttrs::new(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::CoreOutOfRange {
                cable: d("C1"),
                core_no: 3,
                core_count: 2
            }
        );
    }

    #[test]
    fn core_connection_rejects_non_pin_ends() {
        let mut f = fixture();
        let err = f
            .graph
            .connect(
                &f.registry,
                key("C1.1"),
                Endpoint::pin(d("X1"), 1, Side::Right),
                Endpoint::flying_lead(TerminationType::Tinned),
                ConnectionAttrs::new(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::UnsupportedCoreTermination {
                key: key("C1.1"),
                end: "end2",
                found: "flying_lead"
            }
        );
    }

    #[test]
    fn disconnect_then_remove_component() {
        let mut f = fixture();
        f.graph
            .connect(
                &f.registry,
                key("W1"),
                Endpoint::pin(d("X1"), 1, Side::Right),
                Endpoint::pin(d("X2"), 1, Side::Left),
                ConnectionAttrs::new(),
            )
            .unwrap();

        let err = f.registry.remove("X2", &f.graph).unwrap_err();
        assert_eq!(
            err,
            GraphError::ReferencedByConnection {
                designator: d("X2"),
                key: key("W1")
            }
        );

        f.graph.disconnect(&key("W1")).unwrap();
        f.registry.remove("X2", &f.graph).unwrap();
        assert!(f.graph.disconnect(&key("W1")).is_err());
    }

    #[test]
    fn wire_joining_core_to_core_is_refused() {
        let mut f = fixture();
        f.registry
            .add(Part::new("CBL-2", "Test", CableSpec::uniform(2)), None)
            .unwrap(); // C2
        let err = f
            .graph
            .connect(
                &f.registry,
                key("W1"),
                Endpoint::core(d("C1"), 1, Side::Right),
                Endpoint::core(d("C2"), 1, Side::Left),
                ConnectionAttrs::new(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::UnsupportedCoreTermination {
                key: key("W1"),
                end: "end1",
                found: "cable_core"
            }
        );
        assert!(f.graph.is_empty());
    }

    #[test]
    fn wire_joining_core_to_lead_is_refused() {
        let mut f = fixture();
        let err = f
            .graph
            .connect(
                &f.registry,
                key("W1"),
                Endpoint::core(d("C1"), 1, Side::Right),
                Endpoint::flying_lead(TerminationType::Bare),
                ConnectionAttrs::new(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::UnsupportedCoreTermination {
                key: key("W1"),
                end: "end2",
                found: "flying_lead"
            }
        );
        assert_eq!(f.graph.core_claimant("C1", 1), None);
    }

    #[test]
    fn two_halves_merge_into_one_core_connection() {
        let mut f = fixture();
        let first = f
            .graph
            .connect_half(
                &f.registry,
                Endpoint::pin(d("X1"), 1, Side::Right),
                Endpoint::core(d("C1"), 1, Side::Left),
                ConnectionAttrs::new().label_end1("V+").label_end2("ignored"),
            )
            .unwrap();
        assert!(first.is_none());
        assert!(f.graph.is_empty());
        assert_eq!(f.graph.core_claimant("C1", 1), Some(&key("C1.1")));

        let merged = f
            .graph
            .connect_half(
                &f.registry,
                Endpoint::core(d("C1"), 1, Side::Right),
                Endpoint::pin(d("X2"), 4, Side::Left),
                ConnectionAttrs::new().label_end2("V+ OUT").length_mm(500.0),
            )
            .unwrap()
            .unwrap();
        assert_eq!(merged.key, key("C1.1"));
        assert_eq!(merged.end1, Endpoint::pin(d("X1"), 1, Side::Right));
        assert_eq!(merged.end2, Endpoint::pin(d("X2"), 4, Side::Left));
        assert_eq!(merged.label_end1.as_deref(), Some("V+"));
        assert_eq!(merged.label_end2.as_deref(), Some("V+ OUT"));
        assert_eq!(merged.length_mm, Some(500.0));
        assert_eq!(f.graph.pending().count(), 0);
        assert_eq!(f.graph.len(), 1);

        let err = f
            .graph
            .connect_half(
                &f.registry,
                Endpoint::pin(d("X1"), 2, Side::Right),
                Endpoint::core(d("C1"), 1, Side::Left),
                ConnectionAttrs::new(),
            )
            .unwrap_err();
        assert!(matches!(err, GraphError::CoreAlreadyConnected { core_no: 1, .. }));
    }

    #[test]
    fn half_connection_needs_a_core_and_a_pin() {
        let mut f = fixture();
        let err = f
            .graph
            .connect_half(
                &f.registry,
                Endpoint::pin(d("X1"), 1, Side::Right),
                Endpoint::pin(d("X2"), 1, Side::Left),
                ConnectionAttrs::new(),
            )
            .unwrap_err();
        assert_eq!(err, GraphError::NoCoreEnd);

        let err = f
            .graph
            .connect_half(
                &f.registry,
                Endpoint::flying_lead(TerminationType::Bare),
                Endpoint::core(d("C1"), 2, Side::Left),
                ConnectionAttrs::new(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::UnsupportedCoreTermination {
                key: key("C1.2"),
                end: "end1",
                found: "flying_lead"
            }
        );
        assert_eq!(f.graph.pending().count(), 0);
    }

    #[test]
    fn pending_half_blocks_other_claims_and_removal() {
        let mut f = fixture();
        f.graph
            .connect_half(
                &f.registry,
                Endpoint::pin(d("X1"), 1, Side::Right),
                Endpoint::core(d("C1"), 2, Side::Left),
                ConnectionAttrs::new(),
            )
            .unwrap();

        let err = f
            .graph
            .connect(
                &f.registry,
                key("C1.2"),
                Endpoint::pin(d("X1"), 2, Side::Right),
                Endpoint::pin(d("X2"), 2, Side::Left),
                ConnectionAttrs::new(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::CoreAlreadyConnected {
                cable: d("C1"),
                core_no: 2,
                existing: key("C1.2")
            }
        );
        assert!(matches!(
            f.registry.remove("X1", &f.graph),
            Err(GraphError::ReferencedByConnection { .. })
        ));

        let half = f.graph.cancel_half(&key("C1.2")).unwrap();
        assert_eq!(half.pin, Endpoint::pin(d("X1"), 1, Side::Right));
        f.registry.remove("X1", &f.graph).unwrap();
    }
}

//! Harness session: one design under construction.
//!
//! Owns the registry, the connection graph, the label overlay and the design
//! notes. Independent harnesses share nothing.

use uuid::Uuid;
use wh_core::{ConnectionKey, CoreError, Designator, Extras, Part, PartKind};

use crate::endpoint::Endpoint;
use crate::error::{GraphError, GraphResult};
use crate::graph::{Connection, ConnectionAttrs, ConnectionGraph, HalfConnection};
use crate::labels::{BundleLabel, LabelOverlay, LabelSettings, LabelTarget};
use crate::registry::{ComponentInstance, Position, Registry};
use crate::validate::{ValidationReport, validate};

/// A free-text sticky note on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignNote {
    pub id: Uuid,
    pub x: f64,
    pub y: f64,
    pub title: String,
    pub content: Vec<String>,
    pub extras: Extras,
}

impl DesignNote {
    pub fn new(x: f64, y: f64, title: impl Into<String>, content: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            title: title.into(),
            content,
            extras: Extras::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Harness {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Editor wire-anchor state, stored as read.
    pub wire_anchors: Extras,
    /// Unrecognised document-level keys, re-emitted on export.
    pub extras: Extras,
    registry: Registry,
    graph: ConnectionGraph,
    labels: LabelOverlay,
    notes: Vec<DesignNote>,
}

impl Harness {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn graph(&self) -> &ConnectionGraph {
        &self.graph
    }

    pub fn labels(&self) -> &LabelOverlay {
        &self.labels
    }

    pub fn label_settings(&self) -> &LabelSettings {
        &self.labels.settings
    }

    /// Applies to labels created afterwards; existing labels keep their style.
    pub fn set_label_settings(&mut self, settings: LabelSettings) {
        self.labels.settings = settings;
    }

    pub fn notes(&self) -> &[DesignNote] {
        &self.notes
    }

    // -- components --

    pub fn add_component(&mut self, part: Part) -> GraphResult<Designator> {
        self.registry.add(part, None)
    }

    pub fn add_component_as(&mut self, part: Part, designator: &str) -> GraphResult<Designator> {
        self.registry.add(part, Some(designator))
    }

    pub fn component(&self, designator: &str) -> GraphResult<&ComponentInstance> {
        self.registry.get(designator)
    }

    pub fn component_mut(&mut self, designator: &str) -> GraphResult<&mut ComponentInstance> {
        self.registry.get_mut(designator)
    }

    pub fn set_position(&mut self, designator: &str, position: Position) -> GraphResult<()> {
        self.registry.get_mut(designator)?.position = Some(position);
        Ok(())
    }

    /// Remove a component no connection or label refers to.
    pub fn remove_component(&mut self, designator: &str) -> GraphResult<ComponentInstance> {
        if let Some(label) = self.labels.first_referencing(designator) {
            let instance = self.registry.get(designator)?;
            return Err(GraphError::ReferencedByLabel {
                designator: instance.designator.clone(),
                label,
            });
        }
        self.registry.remove(designator, &self.graph)
    }

    // -- connections --

    pub fn connect(
        &mut self,
        key: ConnectionKey,
        end1: Endpoint,
        end2: Endpoint,
        attrs: ConnectionAttrs,
    ) -> GraphResult<&Connection> {
        self.graph.connect(&self.registry, key, end1, end2, attrs)
    }

    /// Connect one core of a registered cable.
    pub fn connect_core(
        &mut self,
        cable: &str,
        core_no: u32,
        end1: Endpoint,
        end2: Endpoint,
        attrs: ConnectionAttrs,
    ) -> GraphResult<&Connection> {
        let cable = self.registry.get(cable)?.designator.clone();
        self.connect(ConnectionKey::core(cable, core_no), end1, end2, attrs)
    }

    /// Join a connector pin to a cable core, one half of a core connection.
    ///
    /// Call once per pin, e.g. `X1.1 -> C1 core 1` then `C1 core 1 -> X2.1`;
    /// the second call stores the merged `C1.1` connection and returns it.
    pub fn connect_half(
        &mut self,
        end1: Endpoint,
        end2: Endpoint,
        attrs: ConnectionAttrs,
    ) -> GraphResult<Option<&Connection>> {
        self.graph.connect_half(&self.registry, end1, end2, attrs)
    }

    pub fn cancel_half(&mut self, key: &ConnectionKey) -> GraphResult<HalfConnection> {
        self.graph.cancel_half(key)
    }

    /// Register `wire` under the next free `W<n>` and connect it.
    ///
    /// If the connection is refused the wire is not kept.
    pub fn connect_wire(
        &mut self,
        wire: Part,
        end1: Endpoint,
        end2: Endpoint,
        attrs: ConnectionAttrs,
    ) -> GraphResult<ConnectionKey> {
        if wire.kind() != PartKind::Wire {
            return Err(CoreError::InvalidPart {
                what: "wire",
                reason: format!("connect_wire needs a wire part, got {}", wire.kind()),
            }
            .into());
        }
        let designator = self.registry.add(wire, None)?;
        let key = ConnectionKey::wire(designator.clone());
        let connected = self
            .graph
            .connect(&self.registry, key.clone(), end1, end2, attrs)
            .map(|_| ());
        if let Err(e) = connected {
            self.registry.discard(&designator);
            return Err(e);
        }
        Ok(key)
    }

    pub fn disconnect(&mut self, key: &ConnectionKey) -> GraphResult<Connection> {
        self.graph.disconnect(key)
    }

    // -- notes --

    pub fn add_note(
        &mut self,
        x: f64,
        y: f64,
        title: impl Into<String>,
        content: Vec<String>,
    ) -> Uuid {
        self.add_note_with(DesignNote::new(x, y, title, content))
    }

    pub fn add_note_with(&mut self, note: DesignNote) -> Uuid {
        let id = note.id;
        self.notes.push(note);
        id
    }

    // -- labels --

    /// Label a connector or cable. Without text the designator is used.
    pub fn add_label(&mut self, target: LabelTarget, text: Option<&str>) -> GraphResult<Uuid> {
        self.labels.add(&self.registry, target, text)
    }

    pub fn insert_label(&mut self, label: BundleLabel) -> GraphResult<Uuid> {
        self.labels.insert(&self.registry, label)
    }

    pub fn remove_label(&mut self, id: Uuid) -> GraphResult<BundleLabel> {
        self.labels.remove(id)
    }

    pub fn labels_for<'a>(&'a self, designator: &'a str) -> impl Iterator<Item = &'a BundleLabel> {
        self.labels.for_component(designator)
    }

    pub fn validate(&self) -> ValidationReport {
        validate(&self.registry, &self.graph)
    }
}

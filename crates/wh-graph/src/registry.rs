//! Component registry (the BOM).

use indexmap::IndexMap;
use wh_core::{CoreError, Designator, Extras, Part, PartKind, Unit, allocate, claim, prefix_for};

use crate::error::{GraphError, GraphResult};
use crate::graph::ConnectionGraph;

/// Canvas coordinates. Used for component placement and routing waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            width: None,
            height: None,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// One placed part in a harness.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentInstance {
    pub designator: Designator,
    pub part: Part,
    pub unit: Unit,
    pub position: Option<Position>,
    /// Unrecognised BOM-item keys.
    pub extras: Extras,
}

impl ComponentInstance {
    pub fn kind(&self) -> PartKind {
        self.part.kind()
    }
}

/// Designator → component map, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    items: IndexMap<Designator, ComponentInstance>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a part, allocating a designator unless one is given.
    ///
    /// The unit defaults by kind (`ft` for wires, `each` otherwise).
    pub fn add(&mut self, part: Part, explicit: Option<&str>) -> GraphResult<Designator> {
        part.validate()?;

        let designator = match explicit {
            Some(explicit) => claim(explicit, self.items.keys()).map_err(|e| match e {
                CoreError::DuplicateDesignator(d) => GraphError::DuplicateDesignator(d),
                other => other.into(),
            })?,
            None => allocate(prefix_for(part.kind(), part.category()), self.items.keys()),
        };

        let unit = Unit::default_for(part.kind());
        tracing::debug!(designator = %designator, kind = %part.kind(), mpn = %part.mpn, "add component");
        self.items.insert(
            designator.clone(),
            ComponentInstance {
                designator: designator.clone(),
                part,
                unit,
                position: None,
                extras: Extras::new(),
            },
        );
        Ok(designator)
    }

    pub fn get(&self, designator: &str) -> GraphResult<&ComponentInstance> {
        self.items
            .get(designator)
            .ok_or_else(|| GraphError::NotFound(designator.to_string()))
    }

    pub fn get_mut(&mut self, designator: &str) -> GraphResult<&mut ComponentInstance> {
        self.items
            .get_mut(designator)
            .ok_or_else(|| GraphError::NotFound(designator.to_string()))
    }

    pub fn find(&self, designator: &str) -> Option<&ComponentInstance> {
        self.items.get(designator)
    }

    pub fn contains(&self, designator: &str) -> bool {
        self.items.contains_key(designator)
    }

    /// Remove a component that no connection in `graph` still names.
    ///
    /// Connections are never cascaded away; disconnect them first.
    pub fn remove(
        &mut self,
        designator: &str,
        graph: &ConnectionGraph,
    ) -> GraphResult<ComponentInstance> {
        let Some(existing) = self.items.get(designator) else {
            return Err(GraphError::NotFound(designator.to_string()));
        };
        if let Some(key) = graph.first_referencing(designator) {
            return Err(GraphError::ReferencedByConnection {
                designator: existing.designator.clone(),
                key: key.clone(),
            });
        }
        tracing::debug!(designator, "remove component");
        self.items
            .shift_remove(designator)
            .ok_or_else(|| GraphError::NotFound(designator.to_string()))
    }

    /// Drop a component that was added within a failed compound operation.
    pub(crate) fn discard(&mut self, designator: &Designator) {
        self.items.shift_remove(designator);
    }

    /// All components in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &ComponentInstance> {
        self.items.values()
    }

    pub fn designators(&self) -> impl Iterator<Item = &Designator> {
        self.items.keys()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

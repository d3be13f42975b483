//! Bundle-label overlay.
//!
//! Print labels attach to exactly one connector or one cable. Styling fields are
//! stored as given and never interpreted.

use indexmap::IndexMap;
use uuid::Uuid;
use wh_core::{CableEnd, Designator, Extras, PartKind};

use crate::error::{GraphError, GraphResult};
use crate::registry::Registry;

/// Harness-wide label configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelSettings {
    pub show_labels_on_canvas: bool,
    pub default_width_mm: f64,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            show_labels_on_canvas: true,
            default_width_mm: 9.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub width_mm: f64,
    pub font_size: f64,
    pub text_color: String,
    pub background_color: String,
}

impl LabelStyle {
    pub fn from_settings(settings: &LabelSettings) -> Self {
        Self {
            width_mm: settings.default_width_mm,
            ..Self::default()
        }
    }
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            width_mm: 9.0,
            font_size: 10.0,
            text_color: "#000000".to_string(),
            background_color: "#FFFFFF".to_string(),
        }
    }
}

/// What a label is stuck to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelTarget {
    Connector(Designator),
    Cable(Designator),
}

impl LabelTarget {
    pub fn designator(&self) -> &Designator {
        match self {
            LabelTarget::Connector(d) | LabelTarget::Cable(d) => d,
        }
    }

    fn expected_kind(&self) -> PartKind {
        match self {
            LabelTarget::Connector(_) => PartKind::Connector,
            LabelTarget::Cable(_) => PartKind::Cable,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BundleLabel {
    pub id: Uuid,
    pub label_text: String,
    pub is_auto_generated: bool,
    pub target: LabelTarget,
    pub cable_end: Option<CableEnd>,
    /// Connection keys the label bundles, as written by the editor.
    pub wire_keys: Vec<String>,
    pub style: LabelStyle,
    pub extras: Extras,
}

impl BundleLabel {
    pub fn new(target: LabelTarget, label_text: impl Into<String>, style: LabelStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            label_text: label_text.into(),
            is_auto_generated: false,
            target,
            cable_end: None,
            wire_keys: Vec::new(),
            style,
            extras: Extras::new(),
        }
    }

    pub fn with_cable_end(mut self, end: CableEnd) -> Self {
        self.cable_end = Some(end);
        self
    }

    pub fn with_wire_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wire_keys = keys.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelOverlay {
    labels: IndexMap<Uuid, BundleLabel>,
    pub settings: LabelSettings,
}

impl LabelOverlay {
    pub fn new(settings: LabelSettings) -> Self {
        Self {
            labels: IndexMap::new(),
            settings,
        }
    }

    /// Create a label for `target`. Without explicit text the designator is used
    /// and the label is marked auto-generated.
    pub fn add(
        &mut self,
        registry: &Registry,
        target: LabelTarget,
        text: Option<&str>,
    ) -> GraphResult<Uuid> {
        let style = LabelStyle::from_settings(&self.settings);
        let label = match text {
            Some(text) => BundleLabel::new(target, text, style),
            None => {
                let text = target.designator().to_string();
                let mut label = BundleLabel::new(target, text, style);
                label.is_auto_generated = true;
                label
            }
        };
        self.insert(registry, label)
    }

    /// Store a fully built label after checking its target.
    pub fn insert(&mut self, registry: &Registry, label: BundleLabel) -> GraphResult<Uuid> {
        if self.labels.contains_key(&label.id) {
            return Err(GraphError::DuplicateLabel(label.id));
        }
        let designator = label.target.designator();
        let instance = registry
            .find(designator.as_str())
            .ok_or_else(|| GraphError::DanglingReference {
                designator: designator.clone(),
                role: "label target",
            })?;
        let expected = label.target.expected_kind();
        if instance.kind() != expected {
            return Err(GraphError::WrongKind {
                designator: designator.clone(),
                expected,
                actual: instance.kind(),
            });
        }

        let id = label.id;
        self.labels.insert(id, label);
        Ok(id)
    }

    pub fn remove(&mut self, id: Uuid) -> GraphResult<BundleLabel> {
        self.labels
            .shift_remove(&id)
            .ok_or(GraphError::LabelNotFound(id))
    }

    pub fn get(&self, id: Uuid) -> Option<&BundleLabel> {
        self.labels.get(&id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut BundleLabel> {
        self.labels.get_mut(&id)
    }

    pub fn all(&self) -> impl Iterator<Item = &BundleLabel> {
        self.labels.values()
    }

    pub fn for_component<'a>(&'a self, designator: &'a str) -> impl Iterator<Item = &'a BundleLabel> {
        self.labels
            .values()
            .filter(move |l| l.target.designator() == designator)
    }

    pub fn first_referencing(&self, designator: &str) -> Option<Uuid> {
        self.for_component(designator).next().map(|l| l.id)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

//! Immutable part specifications.
//!
//! A [`Part`] is what you would order from a distributor; a component instance
//! in a harness owns exactly one. Specs only check their own field shapes here;
//! cross-references are the registry's and the validator's business.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use uuid::Uuid;

use crate::enums::{ConductorType, ConnectorCategory, ConnectorShape, ContactGender, PartKind};
use crate::error::{CoreError, CoreResult};

/// Fields a consumer of the exchange format wrote that this model does not know.
/// Carried verbatim so they survive an import/export cycle.
pub type Extras = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub id: Uuid,
    pub mpn: String,
    pub manufacturer: String,
    pub description: Option<String>,
    pub spec: PartSpec,
    /// Unrecognised part-level keys.
    pub extras: Extras,
}

impl Part {
    /// Create a part with a fresh random id.
    pub fn new(mpn: impl Into<String>, manufacturer: impl Into<String>, spec: impl Into<PartSpec>) -> Self {
        Self {
            id: Uuid::new_v4(),
            mpn: mpn.into(),
            manufacturer: manufacturer.into(),
            description: None,
            spec: spec.into(),
            extras: Extras::new(),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn kind(&self) -> PartKind {
        self.spec.kind()
    }

    /// Connector category, if this is a categorized connector.
    pub fn category(&self) -> Option<ConnectorCategory> {
        match &self.spec {
            PartSpec::Connector(c) => c.category,
            _ => None,
        }
    }

    pub fn as_connector(&self) -> Option<&ConnectorSpec> {
        match &self.spec {
            PartSpec::Connector(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_cable(&self) -> Option<&CableSpec> {
        match &self.spec {
            PartSpec::Cable(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> Option<&WireSpec> {
        match &self.spec {
            PartSpec::Wire(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_terminal(&self) -> Option<&TerminalSpec> {
        match &self.spec {
            PartSpec::Terminal(t) => Some(t),
            _ => None,
        }
    }

    /// Check field shapes of the spec.
    pub fn validate(&self) -> CoreResult<()> {
        match &self.spec {
            PartSpec::Connector(c) => c.validate(),
            PartSpec::Cable(c) => c.validate(),
            PartSpec::Wire(_) | PartSpec::Terminal(_) | PartSpec::Assembly(_) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartSpec {
    Connector(ConnectorSpec),
    Terminal(TerminalSpec),
    Wire(WireSpec),
    Cable(CableSpec),
    Assembly(AssemblySpec),
}

impl PartSpec {
    pub fn kind(&self) -> PartKind {
        match self {
            PartSpec::Connector(_) => PartKind::Connector,
            PartSpec::Terminal(_) => PartKind::Terminal,
            PartSpec::Wire(_) => PartKind::Wire,
            PartSpec::Cable(_) => PartKind::Cable,
            PartSpec::Assembly(_) => PartKind::Assembly,
        }
    }

    pub fn extras(&self) -> &Extras {
        match self {
            PartSpec::Connector(c) => &c.extras,
            PartSpec::Terminal(t) => &t.extras,
            PartSpec::Wire(w) => &w.extras,
            PartSpec::Cable(c) => &c.extras,
            PartSpec::Assembly(a) => &a.extras,
        }
    }
}

impl From<ConnectorSpec> for PartSpec {
    fn from(spec: ConnectorSpec) -> Self {
        PartSpec::Connector(spec)
    }
}

impl From<TerminalSpec> for PartSpec {
    fn from(spec: TerminalSpec) -> Self {
        PartSpec::Terminal(spec)
    }
}

impl From<WireSpec> for PartSpec {
    fn from(spec: WireSpec) -> Self {
        PartSpec::Wire(spec)
    }
}

impl From<CableSpec> for PartSpec {
    fn from(spec: CableSpec) -> Self {
        PartSpec::Cable(spec)
    }
}

impl From<AssemblySpec> for PartSpec {
    fn from(spec: AssemblySpec) -> Self {
        PartSpec::Assembly(spec)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectorSpec {
    /// Number of pin positions, at least 1. Pins are addressed 1..=positions.
    pub positions: u32,
    pub contact_gender: ContactGender,
    pub shape: ConnectorShape,
    pub category: Option<ConnectorCategory>,
    /// Sparse display names keyed by 0-indexed position (`"0"` names pin 1).
    /// Keys are kept as written; out-of-range or non-numeric keys are reported
    /// by the validator, not rejected here.
    pub pin_mapping: BTreeMap<String, String>,
    pub color: Option<String>,
    pub features: BTreeSet<String>,
    pub extras: Extras,
}

impl ConnectorSpec {
    pub fn new(positions: u32) -> Self {
        Self {
            positions,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: ConnectorCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_gender(mut self, gender: ContactGender) -> Self {
        self.contact_gender = gender;
        self
    }

    pub fn with_shape(mut self, shape: ConnectorShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.insert(feature.into());
        self
    }

    pub fn with_pin_mapping<K, V>(mut self, mapping: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.pin_mapping
            .extend(mapping.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Display name for a 1-indexed pin, if the mapping names it.
    pub fn pin_name(&self, pin: u32) -> Option<&str> {
        let key = pin.checked_sub(1)?.to_string();
        self.pin_mapping.get(&key).map(String::as_str)
    }

    pub fn has_pin(&self, pin: u32) -> bool {
        (1..=self.positions).contains(&pin)
    }

    fn validate(&self) -> CoreResult<()> {
        if self.positions < 1 {
            return Err(CoreError::InvalidPart {
                what: "connector",
                reason: format!("positions must be at least 1, got {}", self.positions),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WireSpec {
    pub awg: u32,
    pub conductor_type: ConductorType,
    pub color: Option<String>,
    pub stripe: Option<String>,
    pub stranding: Option<String>,
    pub extras: Extras,
}

impl WireSpec {
    pub fn new(awg: u32) -> Self {
        Self {
            awg,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_stripe(mut self, stripe: impl Into<String>) -> Self {
        self.stripe = Some(stripe.into());
        self
    }

    pub fn with_stranding(mut self, stranding: impl Into<String>) -> Self {
        self.stranding = Some(stranding.into());
        self
    }

    pub fn with_conductor(mut self, conductor_type: ConductorType) -> Self {
        self.conductor_type = conductor_type;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoreSpec {
    /// 1-indexed, unique within the cable, at most `core_count`.
    pub core_no: u32,
    pub awg: Option<u32>,
    pub core_color: Option<String>,
    pub conductor_type: Option<ConductorType>,
    pub extras: Extras,
}

impl CoreSpec {
    pub fn new(core_no: u32) -> Self {
        Self {
            core_no,
            ..Self::default()
        }
    }

    pub fn with_awg(mut self, awg: u32) -> Self {
        self.awg = Some(awg);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.core_color = Some(color.into());
        self
    }

    pub fn with_conductor(mut self, conductor_type: ConductorType) -> Self {
        self.conductor_type = Some(conductor_type);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CableSpec {
    pub core_count: u32,
    pub cores: Vec<CoreSpec>,
    pub extras: Extras,
}

impl CableSpec {
    /// Build a cable spec whose `core_count` is the number of cores given.
    ///
    /// A list longer than `u32::MAX` saturates the count and fails `validate`.
    pub fn new(cores: Vec<CoreSpec>) -> Self {
        Self {
            core_count: u32::try_from(cores.len()).unwrap_or(u32::MAX),
            cores,
            extras: Extras::new(),
        }
    }

    /// Cores numbered 1..=count with no further attributes.
    pub fn uniform(count: u32) -> Self {
        Self::new((1..=count).map(CoreSpec::new).collect())
    }

    pub fn core(&self, core_no: u32) -> Option<&CoreSpec> {
        self.cores.iter().find(|c| c.core_no == core_no)
    }

    pub fn has_core(&self, core_no: u32) -> bool {
        (1..=self.core_count).contains(&core_no) && self.core(core_no).is_some()
    }

    fn validate(&self) -> CoreResult<()> {
        if self.core_count < 1 {
            return Err(CoreError::InvalidPart {
                what: "cable",
                reason: "core_count must be at least 1".to_string(),
            });
        }
        if usize::try_from(self.core_count).ok() != Some(self.cores.len()) {
            return Err(CoreError::InvalidPart {
                what: "cable",
                reason: format!(
                    "core_count is {} but {} cores are listed",
                    self.core_count,
                    self.cores.len()
                ),
            });
        }
        let mut seen = HashSet::new();
        for core in &self.cores {
            if core.core_no < 1 || core.core_no > self.core_count {
                return Err(CoreError::InvalidPart {
                    what: "cable",
                    reason: format!(
                        "core_no {} outside 1..={}",
                        core.core_no, self.core_count
                    ),
                });
            }
            if !seen.insert(core.core_no) {
                return Err(CoreError::InvalidPart {
                    what: "cable",
                    reason: format!("duplicate core_no {}", core.core_no),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TerminalSpec {
    pub wire_awg_min: u32,
    pub wire_awg_max: u32,
    pub plating: Option<String>,
    pub extras: Extras,
}

impl TerminalSpec {
    pub fn new(wire_awg_min: u32, wire_awg_max: u32) -> Self {
        Self {
            wire_awg_min,
            wire_awg_max,
            ..Self::default()
        }
    }

    pub fn with_plating(mut self, plating: impl Into<String>) -> Self {
        self.plating = Some(plating.into());
        self
    }
}

/// Assemblies have no modelled attributes; whatever the document carries is kept.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssemblySpec {
    pub extras: Extras,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_mapping_is_zero_indexed() {
        let spec = ConnectorSpec::new(3).with_pin_mapping([("0", "VCC"), ("2", "SIG")]);
        assert_eq!(spec.pin_name(1), Some("VCC"));
        assert_eq!(spec.pin_name(2), None);
        assert_eq!(spec.pin_name(3), Some("SIG"));
        assert_eq!(spec.pin_name(0), None);
    }

    #[test]
    fn connector_needs_positions() {
        let part = Part::new("EMPTY", "Acme", ConnectorSpec::new(0));
        assert!(matches!(
            part.validate(),
            Err(CoreError::InvalidPart { what: "connector", .. })
        ));
    }

    #[test]
    fn cable_core_count_must_match_cores() {
        let mut spec = CableSpec::uniform(2);
        spec.core_count = 3;
        let part = Part::new("CBL", "Acme", spec);
        assert!(part.validate().is_err());
    }

    #[test]
    fn cable_rejects_duplicate_and_out_of_range_cores() {
        let dup = CableSpec::new(vec![CoreSpec::new(1), CoreSpec::new(1)]);
        assert!(Part::new("CBL", "Acme", dup).validate().is_err());

        let oob = CableSpec::new(vec![CoreSpec::new(1), CoreSpec::new(3)]);
        assert!(Part::new("CBL", "Acme", oob).validate().is_err());

        let zero = CableSpec::new(vec![CoreSpec::new(0)]);
        assert!(Part::new("CBL", "Acme", zero).validate().is_err());
    }

    #[test]
    fn saturated_core_count_fails_validation() {
        let mut spec = CableSpec::uniform(2);
        spec.core_count = u32::MAX;
        let err = Part::new("CBL", "Acme", spec).validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidPart { what: "cable", .. }));
        assert_eq!(CableSpec::uniform(3).core_count, 3);
    }

    #[test]
    fn cable_core_lookup() {
        let spec = CableSpec::new(vec![
            CoreSpec::new(1).with_awg(18).with_color("red"),
            CoreSpec::new(2).with_awg(18).with_color("black"),
        ]);
        assert!(spec.has_core(2));
        assert!(!spec.has_core(3));
        assert_eq!(spec.core(1).and_then(|c| c.core_color.as_deref()), Some("red"));
        assert!(Part::new("CBL", "Acme", spec).validate().is_ok());
    }

    #[test]
    fn part_accessors_follow_spec() {
        let part = Part::new(
            "0312.500",
            "Littelfuse",
            ConnectorSpec::new(2).with_category(ConnectorCategory::Fuse),
        )
        .with_description("500mA fuse holder");
        assert_eq!(part.kind(), PartKind::Connector);
        assert_eq!(part.category(), Some(ConnectorCategory::Fuse));
        assert!(part.as_connector().is_some());
        assert!(part.as_cable().is_none());
    }
}

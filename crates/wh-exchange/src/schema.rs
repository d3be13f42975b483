//! Exchange-document schema definitions.
//!
//! These types mirror the JSON the visual editor reads and writes. They carry
//! no invariants of their own; `import` checks everything while rebuilding a
//! `Harness`.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wh_core::{
    CableEnd, ConductorType, ConnectorCategory, ConnectorShape, ContactGender, Extras, PartKind,
    RoutingMode, Side, TerminationType, Unit,
};

use crate::number::Real;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExchangeDocument {
    pub bom: IndexMap<String, BomItemDef>,
    pub data: DataDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BomItemDef {
    pub instance_id: String,
    pub part: PartDef,
    pub unit: Unit,
    #[serde(flatten)]
    pub extras: Extras,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartDef {
    pub id: Uuid,
    pub kind: PartKind,
    pub mpn: String,
    pub manufacturer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Flat, kind-specific spec. Decoded once `kind` is known.
    pub spec: serde_json::Value,
    #[serde(flatten)]
    pub extras: Extras,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectorSpecDef {
    pub positions: u32,
    #[serde(default)]
    pub contact_gender: ContactGender,
    #[serde(default)]
    pub shape: ConnectorShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ConnectorCategory>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pin_mapping: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub features: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_id: Option<Uuid>,
    #[serde(flatten)]
    pub extras: Extras,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireSpecDef {
    pub awg: u32,
    #[serde(default)]
    pub conductor_type: ConductorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Always written, as `null` when absent.
    #[serde(default)]
    pub stripe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stranding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_id: Option<Uuid>,
    #[serde(flatten)]
    pub extras: Extras,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoreSpecDef {
    pub core_no: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awg: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conductor_type: Option<ConductorType>,
    #[serde(flatten)]
    pub extras: Extras,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CableSpecDef {
    pub core_count: u32,
    pub cores: Vec<CoreSpecDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_id: Option<Uuid>,
    #[serde(flatten)]
    pub extras: Extras,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TerminalSpecDef {
    pub wire_awg_min: u32,
    pub wire_awg_max: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_id: Option<Uuid>,
    #[serde(flatten)]
    pub extras: Extras,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssemblySpecDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_id: Option<Uuid>,
    #[serde(flatten)]
    pub extras: Extras,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub mapping: IndexMap<String, ConnectionDef>,
    #[serde(default)]
    pub connector_positions: IndexMap<String, PositionDef>,
    #[serde(default)]
    pub cable_positions: IndexMap<String, PositionDef>,
    #[serde(default)]
    pub wire_anchors: Extras,
    #[serde(default)]
    pub design_notes: Vec<DesignNoteDef>,
    #[serde(default)]
    pub bundle_labels: IndexMap<String, BundleLabelDef>,
    #[serde(default)]
    pub label_settings: LabelSettingsDef,
    #[serde(flatten)]
    pub extras: Extras,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionDef {
    pub end1: EndpointDef,
    pub end2: EndpointDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_mm: Option<Real>,
    /// Deprecated single label. Read, never written.
    #[serde(default, skip_serializing)]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_end1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_end2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twisted_pair_id: Option<String>,
    #[serde(flatten)]
    pub extras: Extras,
}

/// Connection endpoint, discriminated by `type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EndpointDef {
    ConnectorPin(PinEndDef),
    CableCore(CoreEndDef),
    FlyingLead(LeadEndDef),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PinEndDef {
    pub connector_instance: String,
    pub pin: u32,
    #[serde(default)]
    pub side: Side,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<RoutingDef>,
    #[serde(flatten)]
    pub extras: Extras,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoreEndDef {
    pub cable_instance: String,
    pub core_no: u32,
    #[serde(default)]
    pub side: Side,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shield: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<RoutingDef>,
    #[serde(flatten)]
    pub extras: Extras,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadEndDef {
    #[serde(default)]
    pub termination_type: TerminationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_length_mm: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tin_length_mm: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<RoutingDef>,
    #[serde(flatten)]
    pub extras: Extras,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutingDef {
    #[serde(default)]
    pub mode: RoutingMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoints: Option<Vec<PositionDef>>,
    #[serde(
        rename = "bundleSide",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bundle_side: Option<Side>,
    #[serde(flatten)]
    pub extras: Extras,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PositionDef {
    pub x: Real,
    pub y: Real,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Real>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DesignNoteDef {
    pub id: Uuid,
    pub x: Real,
    pub y: Real,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Vec<String>,
    #[serde(flatten)]
    pub extras: Extras,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BundleLabelDef {
    pub id: Uuid,
    pub label_text: String,
    #[serde(default)]
    pub is_auto_generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_instance_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cable_instance_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cable_end: Option<CableEnd>,
    #[serde(default)]
    pub wire_keys: Vec<String>,
    #[serde(default = "default_width_mm")]
    pub width_mm: Real,
    #[serde(default = "default_font_size")]
    pub font_size: Real,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(flatten)]
    pub extras: Extras,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LabelSettingsDef {
    #[serde(default = "default_true")]
    pub show_labels_on_canvas: bool,
    #[serde(default = "default_width_mm")]
    pub default_width_mm: Real,
}

impl Default for LabelSettingsDef {
    fn default() -> Self {
        Self {
            show_labels_on_canvas: true,
            default_width_mm: default_width_mm(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_width_mm() -> Real {
    Real(9.0)
}

fn default_font_size() -> Real {
    Real(10.0)
}

fn default_text_color() -> String {
    "#000000".to_string()
}

fn default_background_color() -> String {
    "#FFFFFF".to_string()
}

//! Harness → exchange document.

use indexmap::IndexMap;
use serde_json::Value;
use wh_core::{Part, PartKind, PartSpec};
use wh_graph::{
    BundleLabel, Connection, DesignNote, Endpoint, Harness, LabelSettings, LabelTarget, Position,
    Routing,
};

use crate::{ExchangeError, ExchangeResult};
use crate::number::Real;
use crate::schema::*;

/// Build the exchange document. Designators appear in registry insertion
/// order; the legacy `label` field is never written.
///
/// A cable core with only one half connected has no representation in the
/// document and is refused.
pub fn to_document(harness: &Harness) -> ExchangeResult<ExchangeDocument> {
    if let Some(half) = harness.graph().pending().next() {
        return Err(ExchangeError::IncompleteCoreConnection(half.key.clone()));
    }
    let registry = harness.registry();

    let mut bom = IndexMap::with_capacity(registry.len());
    let mut connector_positions = IndexMap::new();
    let mut cable_positions = IndexMap::new();
    for inst in registry.all() {
        let designator = inst.designator.to_string();
        if let Some(pos) = inst.position {
            let positions = if inst.kind() == PartKind::Cable {
                &mut cable_positions
            } else {
                &mut connector_positions
            };
            positions.insert(designator.clone(), position_def(&pos));
        }
        bom.insert(
            designator.clone(),
            BomItemDef {
                instance_id: designator,
                part: part_def(&inst.part)?,
                unit: inst.unit,
                extras: inst.extras.clone(),
            },
        );
    }

    let mapping = harness
        .graph()
        .all()
        .map(|c| (c.key.to_string(), connection_def(c)))
        .collect();

    let bundle_labels = harness
        .labels()
        .all()
        .map(|l| (l.id.to_string(), label_def(l)))
        .collect();

    let document = ExchangeDocument {
        bom,
        data: DataDef {
            name: harness.name.clone(),
            description: harness.description.clone(),
            mapping,
            connector_positions,
            cable_positions,
            wire_anchors: harness.wire_anchors.clone(),
            design_notes: harness.notes().iter().map(note_def).collect(),
            bundle_labels,
            label_settings: settings_def(harness.label_settings()),
            extras: harness.extras.clone(),
        },
    };

    tracing::info!(
        components = document.bom.len(),
        connections = document.data.mapping.len(),
        labels = document.data.bundle_labels.len(),
        "exported harness document"
    );
    Ok(document)
}

fn part_def(part: &Part) -> ExchangeResult<PartDef> {
    let part_id = Some(part.id);
    let spec = match &part.spec {
        PartSpec::Connector(s) => serde_json::to_value(ConnectorSpecDef {
            positions: s.positions,
            contact_gender: s.contact_gender,
            shape: s.shape,
            category: s.category,
            pin_mapping: s.pin_mapping.clone(),
            color: s.color.clone(),
            features: s.features.clone(),
            part_id,
            extras: s.extras.clone(),
        })?,
        PartSpec::Wire(s) => serde_json::to_value(WireSpecDef {
            awg: s.awg,
            conductor_type: s.conductor_type,
            color: s.color.clone(),
            stripe: s.stripe.clone(),
            stranding: s.stranding.clone(),
            part_id,
            extras: s.extras.clone(),
        })?,
        PartSpec::Cable(s) => serde_json::to_value(CableSpecDef {
            core_count: s.core_count,
            cores: s
                .cores
                .iter()
                .map(|c| CoreSpecDef {
                    core_no: c.core_no,
                    awg: c.awg,
                    core_color: c.core_color.clone(),
                    conductor_type: c.conductor_type,
                    extras: c.extras.clone(),
                })
                .collect(),
            part_id,
            extras: s.extras.clone(),
        })?,
        PartSpec::Terminal(s) => serde_json::to_value(TerminalSpecDef {
            wire_awg_min: s.wire_awg_min,
            wire_awg_max: s.wire_awg_max,
            plating: s.plating.clone(),
            part_id,
            extras: s.extras.clone(),
        })?,
        PartSpec::Assembly(s) => serde_json::to_value(AssemblySpecDef {
            part_id,
            extras: s.extras.clone(),
        })?,
    };

    Ok(PartDef {
        id: part.id,
        kind: part.kind(),
        mpn: part.mpn.clone(),
        manufacturer: part.manufacturer.clone(),
        description: part.description.clone(),
        spec,
        extras: part.extras.clone(),
    })
}

fn connection_def(conn: &Connection) -> ConnectionDef {
    ConnectionDef {
        end1: endpoint_def(&conn.end1),
        end2: endpoint_def(&conn.end2),
        length_mm: conn.length_mm.map(Real),
        label: None,
        label_end1: conn.label_end1.clone(),
        label_end2: conn.label_end2.clone(),
        twisted_pair_id: conn.twisted_pair_id.clone(),
        extras: conn.extras.clone(),
    }
}

fn endpoint_def(end: &Endpoint) -> EndpointDef {
    match end {
        Endpoint::ConnectorPin(p) => EndpointDef::ConnectorPin(PinEndDef {
            connector_instance: p.connector.to_string(),
            pin: p.pin,
            side: p.side,
            terminal_instance: p.terminal.as_ref().map(ToString::to_string),
            routing: p.routing.as_ref().map(routing_def),
            extras: p.extras.clone(),
        }),
        Endpoint::CableCore(c) => EndpointDef::CableCore(CoreEndDef {
            cable_instance: c.cable.to_string(),
            core_no: c.core_no,
            side: c.side,
            shield: c.shield,
            routing: c.routing.as_ref().map(routing_def),
            extras: c.extras.clone(),
        }),
        Endpoint::FlyingLead(l) => EndpointDef::FlyingLead(LeadEndDef {
            termination_type: l.termination_type,
            strip_length_mm: l.strip_length_mm.map(Real),
            tin_length_mm: l.tin_length_mm.map(Real),
            terminal_instance: l.terminal.as_ref().map(ToString::to_string),
            routing: l.routing.as_ref().map(routing_def),
            extras: l.extras.clone(),
        }),
    }
}

fn routing_def(routing: &Routing) -> RoutingDef {
    RoutingDef {
        mode: routing.mode,
        waypoints: routing
            .waypoints
            .as_ref()
            .map(|w| w.iter().map(position_def).collect()),
        bundle_side: routing.bundle_side,
        extras: routing.extras.clone(),
    }
}

fn position_def(pos: &Position) -> PositionDef {
    PositionDef {
        x: Real(pos.x),
        y: Real(pos.y),
        width: pos.width.map(Real),
        height: pos.height.map(Real),
    }
}

fn note_def(note: &DesignNote) -> DesignNoteDef {
    DesignNoteDef {
        id: note.id,
        x: Real(note.x),
        y: Real(note.y),
        title: note.title.clone(),
        content: note.content.clone(),
        extras: note.extras.clone(),
    }
}

fn label_def(label: &BundleLabel) -> BundleLabelDef {
    let (connector_instance_id, cable_instance_id) = match &label.target {
        LabelTarget::Connector(d) => (Some(d.to_string()), None),
        LabelTarget::Cable(d) => (None, Some(d.to_string())),
    };
    BundleLabelDef {
        id: label.id,
        label_text: label.label_text.clone(),
        is_auto_generated: label.is_auto_generated,
        connector_instance_id,
        cable_instance_id,
        cable_end: label.cable_end,
        wire_keys: label.wire_keys.clone(),
        width_mm: Real(label.style.width_mm),
        font_size: Real(label.style.font_size),
        text_color: label.style.text_color.clone(),
        background_color: label.style.background_color.clone(),
        extras: label.extras.clone(),
    }
}

fn settings_def(settings: &LabelSettings) -> LabelSettingsDef {
    LabelSettingsDef {
        show_labels_on_canvas: settings.show_labels_on_canvas,
        default_width_mm: Real(settings.default_width_mm),
    }
}

/// Document as a JSON value tree.
pub fn to_value(harness: &Harness) -> ExchangeResult<Value> {
    Ok(serde_json::to_value(to_document(harness)?)?)
}

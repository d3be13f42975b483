//! Exchange document → harness.
//!
//! The harness is rebuilt through its public operations, so every check that
//! guards interactive construction also guards import. The first violation
//! aborts with the JSON path of the offending entry.

use serde::de::DeserializeOwned;
use serde_json::Value;
use wh_core::{
    AssemblySpec, CableSpec, ConnectionKey, ConnectorSpec, CoreSpec, Designator, Part, PartKind,
    PartSpec, TerminalSpec, WireSpec,
};
use wh_graph::{
    BundleLabel, ConnectionAttrs, CoreEnd, DesignNote, Endpoint, GraphError, Harness, LabelSettings,
    LabelStyle, LabelTarget, LeadEnd, PinEnd, Position, Routing,
};

use crate::schema::*;
use crate::{ExchangeError, ExchangeResult};

pub fn from_document(document: ExchangeDocument) -> ExchangeResult<Harness> {
    let ExchangeDocument { bom, data } = document;
    let mut harness = Harness::default();

    for (key, item) in bom {
        let path = format!("bom.{key}");
        if item.instance_id != key {
            return Err(schema(
                format!("{path}.instance_id"),
                format!("instance_id '{}' does not match its key", item.instance_id),
            ));
        }
        let part = part_from_def(item.part, &format!("{path}.part"))?;
        harness
            .add_component_as(part, &key)
            .map_err(|e| model(&path, e))?;
        let instance = harness
            .component_mut(&key)
            .map_err(|e| model(&path, e))?;
        instance.unit = item.unit;
        instance.extras = item.extras;
    }

    for (field, positions) in [
        ("connector_positions", &data.connector_positions),
        ("cable_positions", &data.cable_positions),
    ] {
        for (designator, pos) in positions {
            harness
                .set_position(designator, position(pos))
                .map_err(|e| model(&format!("data.{field}.{designator}"), e))?;
        }
    }

    harness.set_label_settings(LabelSettings {
        show_labels_on_canvas: data.label_settings.show_labels_on_canvas,
        default_width_mm: data.label_settings.default_width_mm.into(),
    });

    for (key, def) in data.mapping {
        let path = format!("data.mapping.{key}");
        let conn_key = ConnectionKey::parse(&key).map_err(|e| model(&path, e.into()))?;
        let end1 = endpoint(def.end1, &format!("{path}.end1"))?;
        let end2 = endpoint(def.end2, &format!("{path}.end2"))?;

        let label_end1 = match (def.label_end1, def.label.as_deref()) {
            (Some(explicit), Some(legacy)) => {
                if explicit != legacy {
                    tracing::warn!(
                        connection = %key,
                        label_end1 = %explicit,
                        label = legacy,
                        "ignoring legacy label; label_end1 takes precedence"
                    );
                }
                Some(explicit)
            }
            (Some(explicit), None) => Some(explicit),
            (None, legacy) => legacy.map(str::to_string),
        };

        let attrs = ConnectionAttrs {
            length_mm: def.length_mm.map(f64::from),
            label_end1,
            label_end2: def.label_end2,
            legacy_label: def.label,
            twisted_pair_id: def.twisted_pair_id,
            extras: def.extras,
        };
        harness
            .connect(conn_key, end1, end2, attrs)
            .map_err(|e| model(&path, e))?;
    }

    for def in data.design_notes {
        harness.add_note_with(DesignNote {
            id: def.id,
            x: def.x.into(),
            y: def.y.into(),
            title: def.title,
            content: def.content,
            extras: def.extras,
        });
    }

    for (key, def) in data.bundle_labels {
        let path = format!("data.bundle_labels.{key}");
        if def.id.to_string() != key.to_ascii_lowercase() {
            return Err(schema(
                format!("{path}.id"),
                format!("label id {} does not match its key", def.id),
            ));
        }
        let target = match (def.connector_instance_id, def.cable_instance_id) {
            (Some(c), None) => LabelTarget::Connector(designator(&c, &path)?),
            (None, Some(c)) => LabelTarget::Cable(designator(&c, &path)?),
            _ => {
                return Err(schema(
                    path,
                    "exactly one of connector_instance_id and cable_instance_id must be set"
                        .to_string(),
                ));
            }
        };
        let label = BundleLabel {
            id: def.id,
            label_text: def.label_text,
            is_auto_generated: def.is_auto_generated,
            target,
            cable_end: def.cable_end,
            wire_keys: def.wire_keys,
            style: LabelStyle {
                width_mm: def.width_mm.into(),
                font_size: def.font_size.into(),
                text_color: def.text_color,
                background_color: def.background_color,
            },
            extras: def.extras,
        };
        harness.insert_label(label).map_err(|e| model(&path, e))?;
    }

    harness.name = data.name;
    harness.description = data.description;
    harness.wire_anchors = data.wire_anchors;
    harness.extras = data.extras;

    tracing::info!(
        components = harness.registry().len(),
        connections = harness.graph().len(),
        labels = harness.labels().len(),
        notes = harness.notes().len(),
        "imported harness document"
    );
    Ok(harness)
}

/// Typed decode of a JSON value, reporting failures at `prefix` + the inner path.
pub(crate) fn decode<T: DeserializeOwned>(value: Value, prefix: &str) -> ExchangeResult<T> {
    serde_path_to_error::deserialize(value).map_err(|e| {
        let inner = e.path().to_string();
        let path = match (prefix.is_empty(), inner.as_str()) {
            (true, _) => inner.clone(),
            (false, ".") => prefix.to_string(),
            (false, _) => format!("{prefix}.{inner}"),
        };
        schema(path, e.into_inner().to_string())
    })
}

fn schema(path: impl Into<String>, message: String) -> ExchangeError {
    ExchangeError::Schema {
        path: path.into(),
        message,
    }
}

fn model(path: &str, source: GraphError) -> ExchangeError {
    ExchangeError::Model {
        path: path.to_string(),
        source,
    }
}

fn designator(value: &str, path: &str) -> ExchangeResult<Designator> {
    Designator::new(value).map_err(|e| model(path, e.into()))
}

fn part_from_def(def: PartDef, path: &str) -> ExchangeResult<Part> {
    let spec_path = format!("{path}.spec");
    let (spec, part_id): (PartSpec, _) = match def.kind {
        PartKind::Connector => {
            let s: ConnectorSpecDef = decode(def.spec, &spec_path)?;
            let spec = ConnectorSpec {
                positions: s.positions,
                contact_gender: s.contact_gender,
                shape: s.shape,
                category: s.category,
                pin_mapping: s.pin_mapping,
                color: s.color,
                features: s.features,
                extras: s.extras,
            };
            (spec.into(), s.part_id)
        }
        PartKind::Wire => {
            let s: WireSpecDef = decode(def.spec, &spec_path)?;
            let spec = WireSpec {
                awg: s.awg,
                conductor_type: s.conductor_type,
                color: s.color,
                stripe: s.stripe,
                stranding: s.stranding,
                extras: s.extras,
            };
            (spec.into(), s.part_id)
        }
        PartKind::Cable => {
            let s: CableSpecDef = decode(def.spec, &spec_path)?;
            let cores = s
                .cores
                .into_iter()
                .map(|c| CoreSpec {
                    core_no: c.core_no,
                    awg: c.awg,
                    core_color: c.core_color,
                    conductor_type: c.conductor_type,
                    extras: c.extras,
                })
                .collect();
            let spec = CableSpec {
                core_count: s.core_count,
                cores,
                extras: s.extras,
            };
            (spec.into(), s.part_id)
        }
        PartKind::Terminal => {
            let s: TerminalSpecDef = decode(def.spec, &spec_path)?;
            let spec = TerminalSpec {
                wire_awg_min: s.wire_awg_min,
                wire_awg_max: s.wire_awg_max,
                plating: s.plating,
                extras: s.extras,
            };
            (spec.into(), s.part_id)
        }
        PartKind::Assembly => {
            let s: AssemblySpecDef = decode(def.spec, &spec_path)?;
            (AssemblySpec { extras: s.extras }.into(), s.part_id)
        }
    };

    if let Some(part_id) = part_id
        && part_id != def.id
    {
        return Err(schema(
            format!("{spec_path}.part_id"),
            format!("part_id {part_id} does not match part id {}", def.id),
        ));
    }

    Ok(Part {
        id: def.id,
        mpn: def.mpn,
        manufacturer: def.manufacturer,
        description: def.description,
        spec,
        extras: def.extras,
    })
}

fn endpoint(def: EndpointDef, path: &str) -> ExchangeResult<Endpoint> {
    let terminal = |t: Option<String>| t.map(|t| designator(&t, path)).transpose();
    Ok(match def {
        EndpointDef::ConnectorPin(p) => Endpoint::ConnectorPin(PinEnd {
            connector: designator(&p.connector_instance, path)?,
            pin: p.pin,
            side: p.side,
            terminal: terminal(p.terminal_instance)?,
            routing: p.routing.map(routing),
            extras: p.extras,
        }),
        EndpointDef::CableCore(c) => Endpoint::CableCore(CoreEnd {
            cable: designator(&c.cable_instance, path)?,
            core_no: c.core_no,
            side: c.side,
            shield: c.shield,
            routing: c.routing.map(routing),
            extras: c.extras,
        }),
        EndpointDef::FlyingLead(l) => Endpoint::FlyingLead(LeadEnd {
            termination_type: l.termination_type,
            strip_length_mm: l.strip_length_mm.map(f64::from),
            tin_length_mm: l.tin_length_mm.map(f64::from),
            terminal: terminal(l.terminal_instance)?,
            routing: l.routing.map(routing),
            extras: l.extras,
        }),
    })
}

fn routing(def: RoutingDef) -> Routing {
    Routing {
        mode: def.mode,
        waypoints: def
            .waypoints
            .map(|w| w.iter().map(position).collect()),
        bundle_side: def.bundle_side,
        extras: def.extras,
    }
}

fn position(def: &PositionDef) -> Position {
    Position {
        x: def.x.into(),
        y: def.y.into(),
        width: def.width.map(f64::from),
        height: def.height.map(f64::from),
    }
}

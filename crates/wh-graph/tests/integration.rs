//! Integration tests for wh-graph.

use wh_core::{
    CableSpec, ConnectionKey, ConnectorSpec, Designator, Part, Side, TerminationType, WireSpec,
};
use wh_graph::{ConnectionAttrs, Endpoint, FindingCode, GraphError, Harness, Severity};

fn d(s: &str) -> Designator {
    Designator::new(s).unwrap()
}

fn key(s: &str) -> ConnectionKey {
    ConnectionKey::parse(s).unwrap()
}

fn x1_x2() -> Harness {
    let mut h = Harness::new("scenario");
    h.add_component(Part::new("C3", "Acme", ConnectorSpec::new(3)))
        .unwrap();
    h.add_component(Part::new("C4", "Acme", ConnectorSpec::new(4)))
        .unwrap();
    h
}

#[test]
fn simple_wire_is_valid() {
    let mut h = x1_x2();
    h.add_component(Part::new("W20", "Acme", WireSpec::new(20)))
        .unwrap();
    let conn = h
        .connect(
            key("W1"),
            Endpoint::pin(d("X1"), 1, Side::Right),
            Endpoint::pin(d("X2"), 1, Side::Left),
            ConnectionAttrs::new().length_mm(300.0).label_end1("POWER"),
        )
        .unwrap();
    assert_eq!(conn.key, key("W1"));

    let report = h.validate();
    assert_eq!(report.errors().count(), 0);
    assert!(report.is_valid());
}

#[test]
fn cable_with_one_core_connected() {
    let mut h = x1_x2();
    let c1 = h
        .add_component(Part::new("CBL-2", "Acme", CableSpec::uniform(2)))
        .unwrap();
    h.connect_core(
        c1.as_str(),
        1,
        Endpoint::pin(d("X1"), 1, Side::Right),
        Endpoint::pin(d("X2"), 1, Side::Left),
        ConnectionAttrs::new(),
    )
    .unwrap();

    let report = h.validate();
    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, FindingCode::MissingCoreConnection);
    assert_eq!(errors[0].subject, "C1");
    assert!(errors[0].message.contains("core 2"));

    h.connect_core(
        "C1",
        2,
        Endpoint::pin(d("X1"), 2, Side::Right),
        Endpoint::pin(d("X2"), 2, Side::Left),
        ConnectionAttrs::new(),
    )
    .unwrap();
    assert!(h.validate().is_valid());
}

#[test]
fn pin_range_is_checked_at_connect_time() {
    let mut h = x1_x2();
    h.add_component(Part::new("W20", "Acme", WireSpec::new(20)))
        .unwrap();
    for pin in [0, 4] {
        let err = h
            .connect(
                key("W1"),
                Endpoint::pin(d("X1"), pin, Side::Right),
                Endpoint::flying_lead(TerminationType::Tinned),
                ConnectionAttrs::new(),
            )
            .unwrap_err();
        assert!(matches!(err, GraphError::PinOutOfRange { positions: 3, .. }));
    }
    assert!(h.graph().is_empty());
}

#[test]
fn pin_mapping_zero_names_pin_one() {
    let mut h = Harness::new("mapping");
    h.add_component(Part::new(
        "C3",
        "Acme",
        ConnectorSpec::new(3).with_pin_mapping([("0", "VCC")]),
    ))
    .unwrap();
    h.add_component(Part::new("W20", "Acme", WireSpec::new(20)))
        .unwrap();
    h.connect(
        key("W1"),
        Endpoint::pin(d("X1"), 1, Side::Right),
        Endpoint::flying_lead(TerminationType::Bare),
        ConnectionAttrs::new(),
    )
    .unwrap();

    let spec = h.component("X1").unwrap().part.as_connector().unwrap();
    assert_eq!(spec.pin_name(1), Some("VCC"));
    assert!(h.validate().warnings().next().is_none());

    let mut bad = Harness::new("mapping");
    bad.add_component(Part::new(
        "C3",
        "Acme",
        ConnectorSpec::new(3).with_pin_mapping([("3", "X")]),
    ))
    .unwrap();
    let report = bad.validate();
    let warnings: Vec<_> = report.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, FindingCode::InvalidPinMappingKey);
    assert_eq!(warnings[0].severity, Severity::Warning);
    assert!(report.is_valid());
}

#[test]
fn referenced_component_removal_is_rejected() {
    let mut h = x1_x2();
    h.connect_wire(
        Part::new("W20", "Acme", WireSpec::new(20)),
        Endpoint::pin(d("X1"), 1, Side::Right),
        Endpoint::pin(d("X2"), 3, Side::Left),
        ConnectionAttrs::new(),
    )
    .unwrap();

    assert!(matches!(
        h.remove_component("X1"),
        Err(GraphError::ReferencedByConnection { .. })
    ));
    assert!(matches!(
        h.remove_component("W1"),
        Err(GraphError::ReferencedByConnection { .. })
    ));

    h.disconnect(&key("W1")).unwrap();
    h.remove_component("W1").unwrap();
    h.remove_component("X1").unwrap();

    // Freed numbers are handed out again.
    assert_eq!(
        h.add_component(Part::new("C3", "Acme", ConnectorSpec::new(3)))
            .unwrap(),
        d("X1")
    );
}

#[test]
fn independent_harnesses_do_not_share_designators() {
    let mut a = x1_x2();
    let mut b = Harness::new("other");
    assert_eq!(
        b.add_component(Part::new("C3", "Acme", ConnectorSpec::new(3)))
            .unwrap(),
        d("X1")
    );
    assert_eq!(
        a.add_component(Part::new("C3", "Acme", ConnectorSpec::new(3)))
            .unwrap(),
        d("X3")
    );
}

#[test]
fn cable_core_to_flying_lead_is_refused() {
    let mut h = x1_x2();
    h.add_component(Part::new("CBL-1", "Acme", CableSpec::uniform(1)))
        .unwrap();
    let err = h
        .connect_core(
            "C1",
            1,
            Endpoint::flying_lead(TerminationType::HeatShrink),
            Endpoint::pin(d("X2"), 1, Side::Left),
            ConnectionAttrs::new(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        GraphError::UnsupportedCoreTermination { end: "end1", .. }
    ));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn missing_cores_match_unconnected_set(
            core_count in 1u32..8,
            connected in proptest::collection::btree_set(1u32..8, 0..5),
        ) {
            let mut h = Harness::new("cores");
            h.add_component(Part::new("CONN", "Acme", ConnectorSpec::new(8))).unwrap();
            h.add_component(Part::new("CBL", "Acme", CableSpec::uniform(core_count))).unwrap();

            let connected: Vec<u32> = connected.into_iter().filter(|n| *n <= core_count).collect();
            for &n in &connected {
                h.connect_core(
                    "C1",
                    n,
                    Endpoint::pin(d("X1"), n, Side::Left),
                    Endpoint::pin(d("X1"), n, Side::Right),
                    ConnectionAttrs::new(),
                )
                .unwrap();
            }

            let report = h.validate();
            let missing = report.count(FindingCode::MissingCoreConnection);
            prop_assert_eq!(missing, (core_count as usize) - connected.len());
            prop_assert_eq!(report.is_valid(), connected.len() == core_count as usize);
        }
    }
}

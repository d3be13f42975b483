//! wh-graph: the in-memory harness model.
//!
//! Provides:
//! - Component registry (the BOM) with designator allocation
//! - Connection graph with fail-fast endpoint checks
//! - Bundle-label overlay
//! - Whole-harness validator
//! - `Harness`, the session object tying them together
//!
//! # Example
//!
//! ```
//! use wh_core::{ConnectorSpec, Part, Side, WireSpec};
//! use wh_graph::{ConnectionAttrs, Endpoint, Harness};
//!
//! let mut h = Harness::new("demo");
//! let x1 = h.add_component(Part::new("C3", "Acme", ConnectorSpec::new(3))).unwrap();
//! let x2 = h.add_component(Part::new("C4", "Acme", ConnectorSpec::new(4))).unwrap();
//! let w1 = h
//!     .connect_wire(
//!         Part::new("W20", "Acme", WireSpec::new(20)),
//!         Endpoint::pin(x1, 1, Side::Right),
//!         Endpoint::pin(x2, 1, Side::Left),
//!         ConnectionAttrs::new().length_mm(300.0),
//!     )
//!     .unwrap();
//!
//! assert_eq!(w1.to_string(), "W1");
//! assert!(h.validate().is_valid());
//! ```

pub mod endpoint;
pub mod error;
pub mod graph;
pub mod harness;
pub mod labels;
pub mod registry;
pub mod validate;

pub use endpoint::{CoreEnd, Endpoint, LeadEnd, PinEnd, Routing};
pub use error::{GraphError, GraphResult};
pub use graph::{Connection, ConnectionAttrs, ConnectionGraph, HalfConnection};
pub use harness::{DesignNote, Harness};
pub use labels::{BundleLabel, LabelOverlay, LabelSettings, LabelStyle, LabelTarget};
pub use registry::{ComponentInstance, Position, Registry};
pub use validate::{Finding, FindingClass, FindingCode, Severity, ValidationReport, validate};

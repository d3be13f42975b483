//! wh-core: stable foundation for wire-harness designs.
//!
//! Contains:
//! - parts (immutable part specifications: connector, terminal, wire, cable, assembly)
//! - enums (closed vocabularies shared by parts, endpoints and the exchange format)
//! - ids (designators and connection keys)
//! - designator (prefix table + gap-filling allocator)
//! - error (shared error types)

pub mod designator;
pub mod enums;
pub mod error;
pub mod ids;
pub mod parts;

// Re-exports: nice ergonomics for downstream crates
pub use designator::{allocate, claim, prefix_for};
pub use enums::*;
pub use error::{CoreError, CoreResult};
pub use ids::{ConnectionKey, Designator};
pub use parts::*;

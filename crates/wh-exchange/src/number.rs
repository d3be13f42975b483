//! JSON number handling for measured values.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Largest integer an f64 holds exactly.
const EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// A real number that is written as a JSON integer when it has no fractional
/// part (`300`, not `300.0`), matching what the editor writes.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Real(pub f64);

impl Serialize for Real {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.is_finite() && v.fract() == 0.0 && v.abs() < EXACT_INT {
            serializer.serialize_i64(v as i64)
        } else {
            serializer.serialize_f64(v)
        }
    }
}

impl<'de> Deserialize<'de> for Real {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Real)
    }
}

impl From<f64> for Real {
    fn from(v: f64) -> Self {
        Real(v)
    }
}

impl From<Real> for f64 {
    fn from(v: Real) -> Self {
        v.0
    }
}

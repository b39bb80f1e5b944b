use std::fmt;

use serde::{Deserialize, Serialize};

use super::Sign;

/// A numeric magnitude with a unit.
///
/// Quantities with different units never compare; unit conversion is the
/// business of whatever resolved the source text, not of this engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quantity {
    pub magnitude: f64,
    pub unit: String,
}

pub(crate) const DIMENSIONLESS: &str = "dimensionless";

impl Quantity {
    pub fn new(magnitude: f64, unit: impl Into<String>) -> Self {
        Self {
            magnitude,
            unit: unit.into(),
        }
    }

    /// A bare number with no unit.
    pub fn dimensionless(magnitude: f64) -> Self {
        Self::new(magnitude, DIMENSIONLESS)
    }

    pub fn same_unit(&self, other: &Quantity) -> bool {
        self.unit == other.unit
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit && self.magnitude == other.magnitude
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.magnitude.fract() == 0.0 && self.magnitude.abs() < 1e15 {
            write!(f, "{}", self.magnitude as i64)?;
        } else {
            write!(f, "{}", self.magnitude)?;
        }
        if self.unit != DIMENSIONLESS {
            write!(f, " {}", self.unit)?;
        }
        Ok(())
    }
}

/// Whether every value satisfying `sign_a value_a` also satisfies
/// `sign_b value_b`: literal containment of the solution sets.
pub(crate) fn range_implies(sign_a: Sign, a: f64, sign_b: Sign, b: f64) -> bool {
    use Sign::*;
    match (sign_a, sign_b) {
        (Equal, Equal) => a == b,
        (Equal, NotEqual) => a != b,
        (Equal, GreaterOrEqual) => a >= b,
        (Equal, Greater) => a > b,
        (Equal, LessOrEqual) => a <= b,
        (Equal, Less) => a < b,
        (NotEqual, NotEqual) => a == b,
        (GreaterOrEqual, GreaterOrEqual) => a >= b,
        (GreaterOrEqual, Greater) => a > b,
        (GreaterOrEqual, NotEqual) => b < a,
        (Greater, Greater) | (Greater, GreaterOrEqual) => a >= b,
        (Greater, NotEqual) => b <= a,
        (LessOrEqual, LessOrEqual) => a <= b,
        (LessOrEqual, Less) => a < b,
        (LessOrEqual, NotEqual) => b > a,
        (Less, Less) | (Less, LessOrEqual) => a <= b,
        (Less, NotEqual) => b >= a,
        _ => false,
    }
}

fn point_in(point: f64, sign: Sign, value: f64) -> bool {
    use Sign::*;
    match sign {
        Equal => point == value,
        NotEqual => point != value,
        GreaterOrEqual => point >= value,
        Greater => point > value,
        LessOrEqual => point <= value,
        Less => point < value,
    }
}

/// Whether the solution sets of `sign_a value_a` and `sign_b value_b` have
/// no value in common.
pub(crate) fn ranges_disjoint(sign_a: Sign, a: f64, sign_b: Sign, b: f64) -> bool {
    use Sign::*;
    match (sign_a, sign_b) {
        (Equal, _) => !point_in(a, sign_b, b),
        (_, Equal) => !point_in(b, sign_a, a),
        (NotEqual, _) | (_, NotEqual) => false,
        (GreaterOrEqual, LessOrEqual) => b < a,
        (GreaterOrEqual, Less) | (Greater, LessOrEqual) | (Greater, Less) => b <= a,
        (LessOrEqual, GreaterOrEqual) => a < b,
        (LessOrEqual, Greater) | (Less, GreaterOrEqual) | (Less, Greater) => a <= b,
        _ => false,
    }
}

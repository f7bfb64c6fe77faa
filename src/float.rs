use crate::width::Width;
use std::{convert::TryFrom, fmt};

/// A decoded floating point value, kept as its raw bit pattern so that items stay
/// `Eq` and `Hash`.
#[derive(Copy, Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug)]
pub enum Float {
    Single(u32),
    Double(u64),
}

use Float::*;

impl Float {
    /// Number of bytes the value occupied after its header byte, 4 or 8.
    pub fn size(&self) -> usize { self.width().byte_len() }

    pub fn width(&self) -> Width {
        match self {
            Single(_) => Width::Four,
            Double(_) => Width::Eight,
        }
    }

    /// The value widened to `f64`.
    pub fn value(&self) -> f64 {
        match self {
            Single(n) => f64::from(f32::from_bits(*n)),
            Double(n) => f64::from_bits(*n),
        }
    }
}

from_fn!(Float, f32, |f: f32| Single(f.to_bits()));
from_fn!(Float, f64, |f: f64| Double(f.to_bits()));

impl TryFrom<Float> for f32 {
    type Error = Float;

    fn try_from(f: Float) -> Result<Self, Float> {
        match f {
            Single(n) => Ok(f32::from_bits(n)),
            _ => Err(f),
        }
    }
}

impl TryFrom<Float> for f64 {
    type Error = Float;

    fn try_from(f: Float) -> Result<Self, Float> {
        match f {
            Double(n) => Ok(f64::from_bits(n)),
            _ => Err(f),
        }
    }
}

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let v = self.value();
        if v.is_nan() {
            write!(f, "NaN")
        } else if v.is_infinite() {
            write!(f, "{}Infinity", if v < 0.0 { "-" } else { "" })
        } else {
            write!(f, "{:?}", v)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(Float::from(1f32).size(), 4);
        assert_eq!(Float::from(1f64).size(), 8);
    }

    #[test]
    fn widening() {
        assert_eq!(Float::from(1.5f32).value(), 1.5);
        assert_eq!(Float::from(-0.25f64).value(), -0.25);
    }

    #[test]
    fn narrowing() {
        assert_eq!(f32::try_from(Float::from(2f32)), Ok(2f32));
        assert!(f32::try_from(Float::from(2f64)).is_err());
        assert_eq!(f64::try_from(Float::from(2f64)), Ok(2f64));
    }

    #[test]
    fn diagnostic() {
        assert_eq!(Float::from(1.0f64).to_string(), "1.0");
        assert_eq!(Float::from(f32::NAN).to_string(), "NaN");
        assert_eq!(Float::from(f64::NEG_INFINITY).to_string(), "-Infinity");
    }
}

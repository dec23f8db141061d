use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// An amount of pounds sterling held to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gbp(Decimal);

impl Gbp {
    /// Rounds the double itself to two places, ties to even, so a value
    /// sitting just under `.xx5` in binary rounds down. `None` for
    /// non-finite input or anything too large to hold.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Decimal::from_str(&format!("{value:.2}")).ok().map(Gbp)
    }

    /// Nearest `f64` to the two-place value. Goes through the decimal text so
    /// `38123.28` comes back as the literal `38123.28`, not a neighbour.
    pub fn to_f64(self) -> f64 {
        self.0.to_string().parse().unwrap_or(f64::NAN)
    }
}

// Feature tables carry salaries as plain floats.
impl Serialize for Gbp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Gbp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Gbp::from_f64(value)
            .ok_or_else(|| serde::de::Error::custom(format!("not a finite amount: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gbp(value: f64) -> Gbp {
        Gbp::from_f64(value).unwrap()
    }

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(gbp(2512.894275).to_f64(), 2512.89);
        assert_eq!(gbp(4890918470.702).to_f64(), 4890918470.7);
        assert_eq!(gbp(16486.0).to_f64(), 16486.0);
    }

    #[test]
    fn rounds_the_binary_value_not_the_decimal_text() {
        // 768457 * 0.015 is a hair under 11526.855 as a double
        assert_eq!(gbp(768457.0 * 0.015).to_f64(), 11526.85);
        // exact binary ties go to even
        assert_eq!(gbp(0.125).to_f64(), 0.12);
        assert_eq!(gbp(0.375).to_f64(), 0.38);
    }

    #[test]
    fn to_f64_matches_literal() {
        assert_eq!(gbp(38123.28).to_f64(), 38123.28);
        assert_eq!(gbp(2066029308.21).to_f64(), 2066029308.21);
    }

    #[test]
    fn non_finite_or_huge_is_none() {
        assert!(Gbp::from_f64(f64::NAN).is_none());
        assert!(Gbp::from_f64(f64::INFINITY).is_none());
        assert!(Gbp::from_f64(1e40).is_none());
    }

    #[test]
    fn serializes_as_float() {
        let json = serde_json::to_string(&gbp(37759.5)).unwrap();
        assert_eq!(json, "37759.5");
        let back: Gbp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, gbp(37759.5));
    }
}

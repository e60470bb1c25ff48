//! Ingredient measurement units
//!
//! Ingredient facts are declared against a unit basis: mass and volume
//! units per 100 (g or ml), count units per single unit (one piece, one
//! handful, ...). The factor turns an amount in that unit into a
//! multiplier for the declared facts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit an ingredient amount is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MeasureUnit {
    #[default]
    Gram,
    Milliliter,
    Piece,
    Handful,
    Slice,
    Tablespoon,
    Teaspoon,
    Scoop,
}

impl MeasureUnit {
    pub const ALL: [MeasureUnit; 8] = [
        MeasureUnit::Gram,
        MeasureUnit::Milliliter,
        MeasureUnit::Piece,
        MeasureUnit::Handful,
        MeasureUnit::Slice,
        MeasureUnit::Tablespoon,
        MeasureUnit::Teaspoon,
        MeasureUnit::Scoop,
    ];

    /// Whether facts for this unit are declared per 100 units
    pub fn is_per_hundred(&self) -> bool {
        matches!(self, MeasureUnit::Gram | MeasureUnit::Milliliter)
    }

    /// Multiplier applied to the declared facts for `amount` of this unit
    pub fn factor(&self, amount: f64) -> f64 {
        if self.is_per_hundred() {
            amount / 100.0
        } else {
            amount
        }
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            MeasureUnit::Gram => "g",
            MeasureUnit::Milliliter => "ml",
            MeasureUnit::Piece => "stuk",
            MeasureUnit::Handful => "handje",
            MeasureUnit::Slice => "plak",
            MeasureUnit::Tablespoon => "el",
            MeasureUnit::Teaspoon => "tl",
            MeasureUnit::Scoop => "schep",
        }
    }

    /// Label describing the basis the facts are declared against
    pub fn per_label(&self) -> String {
        if self.is_per_hundred() {
            format!("per 100 {}", self.abbreviation())
        } else {
            format!("per {}", self.abbreviation())
        }
    }
}

impl fmt::Display for MeasureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for MeasureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "g" | "gr" | "gram" | "grams" | "grammen" => Ok(MeasureUnit::Gram),
            "ml" | "milliliter" | "milliliters" | "millilitre" => Ok(MeasureUnit::Milliliter),
            "stuk" | "stuks" | "piece" | "pieces" | "pc" | "pcs" => Ok(MeasureUnit::Piece),
            "handje" | "handjes" | "handful" | "handfuls" => Ok(MeasureUnit::Handful),
            "plak" | "plakje" | "plakken" | "slice" | "slices" => Ok(MeasureUnit::Slice),
            "el" | "eetlepel" | "eetlepels" | "tbsp" | "tablespoon" => Ok(MeasureUnit::Tablespoon),
            "tl" | "theelepel" | "theelepels" | "tsp" | "teaspoon" => Ok(MeasureUnit::Teaspoon),
            "schep" | "scheppen" | "scoop" | "scoops" => Ok(MeasureUnit::Scoop),
            _ => Err(format!("Unknown unit: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("g", MeasureUnit::Gram)]
    #[case("Gram", MeasureUnit::Gram)]
    #[case("ml", MeasureUnit::Milliliter)]
    #[case("stuks", MeasureUnit::Piece)]
    #[case("piece", MeasureUnit::Piece)]
    #[case("handje", MeasureUnit::Handful)]
    #[case("Handful", MeasureUnit::Handful)]
    #[case("eetlepel", MeasureUnit::Tablespoon)]
    #[case("tsp", MeasureUnit::Teaspoon)]
    #[case(" scoop ", MeasureUnit::Scoop)]
    fn test_parse_units(#[case] input: &str, #[case] expected: MeasureUnit) {
        assert_eq!(input.parse::<MeasureUnit>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_unit() {
        assert!("bucket".parse::<MeasureUnit>().is_err());
    }

    #[test]
    fn test_known_factors() {
        assert_eq!(MeasureUnit::Gram.factor(100.0), 1.0);
        assert_eq!(MeasureUnit::Gram.factor(250.0), 2.5);
        assert_eq!(MeasureUnit::Milliliter.factor(50.0), 0.5);
        assert_eq!(MeasureUnit::Piece.factor(2.0), 2.0);
        assert_eq!(MeasureUnit::Handful.factor(1.5), 1.5);
    }

    #[test]
    fn test_per_label() {
        assert_eq!(MeasureUnit::Gram.per_label(), "per 100 g");
        assert_eq!(MeasureUnit::Piece.per_label(), "per stuk");
    }

    #[test]
    fn test_abbreviation_parses_back() {
        for unit in MeasureUnit::ALL {
            assert_eq!(unit.abbreviation().parse::<MeasureUnit>().unwrap(), unit);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: count units are direct multipliers
        #[test]
        fn prop_count_units_are_direct(amount in 0.0f64..100.0) {
            for unit in MeasureUnit::ALL.iter().filter(|u| !u.is_per_hundred()) {
                prop_assert_eq!(unit.factor(amount), amount);
            }
        }

        /// Property: per-hundred factor is linear in the amount
        #[test]
        fn prop_per_hundred_is_linear(a in 0.0f64..5000.0, b in 0.0f64..5000.0) {
            let combined = MeasureUnit::Gram.factor(a + b);
            let separate = MeasureUnit::Gram.factor(a) + MeasureUnit::Gram.factor(b);
            prop_assert!((combined - separate).abs() < 1e-9);
        }
    }
}

use crate::Error;
use serde::Serialize;
use std::fmt;

/// Visual category of a bus line, encoded in the feed as the line's color.
///
/// The color and label mappings are total over the variants; an unrecognized
/// color in the feed is a row-level error ([Error::UnknownCategory]), never a
/// silent default.
#[derive(Debug, Serialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BusCategory {
    /// High-frequency trunk line (green, `97BF0D`)
    MetroBus,
    /// Regular line (blue, `013888`)
    RegularBus,
    /// Express line (orange, `E04503`)
    Express,
    /// Late-night line (black `1A171B`, or the legacy blue `003888`)
    LateNight,
    /// Line announced but not yet in service (white, `FFFFFF`)
    Upcoming,
}

impl BusCategory {
    /// Maps a feed color code to its category.
    ///
    /// Two colors denote the late-night category: the black one and a legacy
    /// blue one that older feed seasons still carry.
    pub fn from_color(color: &str) -> Result<BusCategory, Error> {
        match color {
            "97BF0D" => Ok(BusCategory::MetroBus),
            "013888" => Ok(BusCategory::RegularBus),
            "E04503" => Ok(BusCategory::Express),
            "1A171B" | "003888" => Ok(BusCategory::LateNight),
            "FFFFFF" => Ok(BusCategory::Upcoming),
            _ => Err(Error::UnknownCategory(color.to_owned())),
        }
    }

    /// The canonical color code of this category
    pub fn color(self) -> &'static str {
        match self {
            BusCategory::MetroBus => "97BF0D",
            BusCategory::RegularBus => "013888",
            BusCategory::Express => "E04503",
            BusCategory::LateNight => "1A171B",
            BusCategory::Upcoming => "FFFFFF",
        }
    }

    /// Human-readable label of this category
    pub fn label(self) -> &'static str {
        match self {
            BusCategory::MetroBus => "metro-bus",
            BusCategory::RegularBus => "regular-bus",
            BusCategory::Express => "express",
            BusCategory::LateNight => "late-night",
            BusCategory::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for BusCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_to_category() {
        assert_eq!(BusCategory::Express, BusCategory::from_color("E04503").unwrap());
        assert_eq!(BusCategory::LateNight, BusCategory::from_color("1A171B").unwrap());
        assert_eq!(BusCategory::LateNight, BusCategory::from_color("003888").unwrap());
    }

    #[test]
    fn unknown_color_is_an_error() {
        assert!(matches!(
            BusCategory::from_color("BADA55"),
            Err(Error::UnknownCategory(c)) if c == "BADA55"
        ));
    }

    #[test]
    fn round_trips_through_canonical_color() {
        for cat in [
            BusCategory::MetroBus,
            BusCategory::RegularBus,
            BusCategory::Express,
            BusCategory::LateNight,
            BusCategory::Upcoming,
        ] {
            assert_eq!(cat, BusCategory::from_color(cat.color()).unwrap());
        }
    }
}
